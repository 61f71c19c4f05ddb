//! Error types for LUT application.
//!
//! Every configuration problem is detected while resolving, before any
//! pixel is touched. Per-frame failures only come from the frame provider
//! and are carried unchanged in [`ApplyError::Core`].

use thiserror::Error;

/// Error type for LUT application.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// Unsupported mode, LUT dimensionality, bit depth or plane-count combination.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Sources disagree in bit depth or resolution, or no legal output
    /// subsampling can be derived from them.
    #[error("format mismatch: {0}")]
    FormatMismatch(String),

    /// A packed (interleaved) layout, or a color family the mode cannot
    /// produce, on the source or destination side.
    #[error("unsupported colorspace: {0}")]
    UnsupportedColorspace(String),

    /// Frame provider or buffer failure.
    #[error(transparent)]
    Core(#[from] lutmap_core::Error),
}

/// Result type for LUT application.
pub type ApplyResult<T> = Result<T, ApplyError>;

impl ApplyError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn mismatch(msg: impl Into<String>) -> Self {
        Self::FormatMismatch(msg.into())
    }

    pub(crate) fn colorspace(msg: impl Into<String>) -> Self {
        Self::UnsupportedColorspace(msg.into())
    }

    /// Whether this is a [`ApplyError::Configuration`] error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Whether this is a [`ApplyError::FormatMismatch`] error.
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Self::FormatMismatch(_))
    }

    /// Whether this is a [`ApplyError::UnsupportedColorspace`] error.
    pub fn is_unsupported_colorspace(&self) -> bool {
        matches!(self, Self::UnsupportedColorspace(_))
    }
}
