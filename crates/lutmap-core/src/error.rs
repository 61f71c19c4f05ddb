//! Error types for lutmap-core operations.
//!
//! Covers the failure modes of describing and allocating frames:
//! - Pixel type validation (bit depth, subsampling, packed layouts)
//! - Frame geometry (dimensions, plane counts, buffer sizes)
//! - Frame providers ([`crate::Clip`] implementations)
//!
//! # Usage
//!
//! ```rust
//! use lutmap_core::{Error, Result};
//!
//! fn check_plane(index: usize, count: usize) -> Result<()> {
//!     if index >= count {
//!         return Err(Error::PlaneOutOfRange { index, count });
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Used By
//!
//! - `lutmap-lut` - wraps core errors while building LUT frames
//! - `lutmap-ops` - propagates frame-provider failures unchanged

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while describing, allocating or fetching frames.
#[derive(Debug, Error)]
pub enum Error {
    /// Bit depth is not one of the supported integer depths.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(u32),

    /// Pixel type combination is not representable.
    ///
    /// Returned for packed layouts at depths other than 8/16 bits and for
    /// subsampling requested on a family that has no chroma planes.
    #[error("unsupported pixel type: {0}")]
    UnsupportedPixelType(String),

    /// Subsampling ratio is not 1, 2 or 4 on some axis.
    #[error("invalid subsampling ratio {horizontal}x{vertical} (each axis must be 1, 2 or 4)")]
    InvalidSubsampling {
        /// Horizontal divisor
        horizontal: u32,
        /// Vertical divisor
        vertical: u32,
    },

    /// Invalid frame dimensions.
    ///
    /// Returned when width or height is zero, or not divisible by the
    /// chroma subsampling divisors.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Plane index outside the frame's plane list.
    #[error("plane {index} out of range for a frame with {count} planes")]
    PlaneOutOfRange {
        /// Requested plane
        index: usize,
        /// Planes in the frame
        count: usize,
    },

    /// Buffer does not match the geometry it is supposed to hold.
    #[error("buffer size mismatch: expected {expected} samples, got {got}")]
    BufferSize {
        /// Samples required by the geometry
        expected: usize,
        /// Samples actually provided
        got: usize,
    },

    /// Sample storage type differs from what the caller asked for.
    #[error("sample width mismatch: expected {expected}, got {got}")]
    SampleWidthMismatch {
        /// Requested storage
        expected: crate::SampleWidth,
        /// Actual storage
        got: crate::SampleWidth,
    },

    /// Frame index beyond the end of a clip.
    #[error("frame {index} out of range for a clip of {count} frames")]
    FrameOutOfRange {
        /// Requested frame
        index: usize,
        /// Frames in the clip
        count: usize,
    },

    /// I/O error from a file-backed frame provider.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedPixelType`] error.
    #[inline]
    pub fn unsupported_pixel_type(msg: impl Into<String>) -> Self {
        Self::UnsupportedPixelType(msg.into())
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this error came from reading a file.
    #[inline]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
