//! # lutmap-core
//!
//! Core types for applying N-dimensional lookup tables to video frames.
//!
//! - [`BitDepth`], [`SampleWidth`], [`Sample`] - integer sample formats
//! - [`ColorFamily`], [`PlaneRole`], [`Subsampling`] - the color-family registry
//! - [`PixelType`], [`FrameFormat`] - frame descriptions with per-plane geometry
//! - [`Plane`], [`Frame`] - reference-counted planar and packed buffers
//! - [`Clip`] - the frame-provider interface filters consume and implement
//!
//! ## Crate Structure
//!
//! ```text
//! lutmap-core (this crate)
//!    ^
//!    |
//!    +-- lutmap-lut (LUT generation)
//!    +-- lutmap-ops (configuration resolver, pixel mapper)
//!    +-- lutmap-cli
//! ```
//!
//! Only unsigned integer samples exist here. 32-bit samples are carried so
//! that 16-bit sources can index tables whose entries are 32 bits wide.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clip;
pub mod error;
pub mod family;
pub mod format;
pub mod image;
pub mod sample;
pub mod spec;

pub use clip::*;
pub use error::*;
pub use family::*;
pub use format::*;
pub use image::*;
pub use sample::*;
pub use spec::*;

/// Prelude module for convenient imports.
///
/// ```
/// use lutmap_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::clip::{Clip, FnClip, FrameListClip, StaticClip};
    pub use crate::error::{Error, Result};
    pub use crate::family::{ColorFamily, PlaneRole, Subsampling};
    pub use crate::format::{BitDepth, SampleWidth};
    pub use crate::image::{Frame, Plane};
    pub use crate::sample::{Sample, SampleBuf};
    pub use crate::spec::{FrameFormat, PixelType};
}
