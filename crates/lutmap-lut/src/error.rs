//! LUT error types.

use thiserror::Error;

/// Result type for LUT operations.
pub type LutResult<T> = Result<T, LutError>;

/// Errors that can occur while building a LUT.
#[derive(Debug, Error)]
pub enum LutError {
    /// Bit depth outside {8, 10, 12, 14, 16, 32}.
    #[error("invalid bit depth: {0}")]
    InvalidBitDepth(u32),

    /// 32-bit tables were requested.
    #[error("only integer pixel types (with a bit depth of 8, 10, 12, 14 or 16) are supported")]
    FloatNotSupported,

    /// Plane selector is not one of Y, YUV, YUVA, RGB, RGBA.
    #[error("invalid selection of planes: '{0}'")]
    InvalidPlanes(String),

    /// Dimensions outside 1..=3.
    #[error("dimensions must be either 1, 2 or 3, got {0}")]
    InvalidDimensions(u32),

    /// Table would exceed the size bound for its dimensionality.
    #[error("cannot prepare a {dimensions}D LUT for bit depths higher than {max_bits} (got {bits})")]
    TooLarge {
        /// Requested dimensionality
        dimensions: u32,
        /// Requested bit depth
        bits: u32,
        /// Highest depth allowed for this dimensionality
        max_bits: u32,
    },

    /// Axis selector outside the range allowed for the dimensionality.
    #[error("({dimensions}D) axis selector must be in {min}..={max}, got {selector}")]
    InvalidAxis {
        /// Requested selector
        selector: u32,
        /// LUT dimensionality
        dimensions: u32,
        /// Lowest valid selector
        min: u32,
        /// Highest valid selector
        max: u32,
    },

    /// Frame construction failed.
    #[error(transparent)]
    Core(#[from] lutmap_core::Error),
}

impl LutError {
    /// Whether this error comes from a parameter check rather than from
    /// frame allocation.
    pub fn is_parameter_error(&self) -> bool {
        !matches!(self, LutError::Core(_))
    }
}
