//! # lutmap-lut
//!
//! Procedural coordinate lookup tables.
//!
//! A table built here maps every flat index back to the sample values that
//! compose it, so it can be edited into any transform and then applied with
//! `lutmap-ops`.
//!
//! # Usage
//!
//! ```rust
//! use lutmap_core::{BitDepth, ColorFamily};
//! use lutmap_lut::{AxisAssignment, Lut};
//!
//! // 3D table over 8-bit sources: plane p holds digit p of the index
//! let lut = Lut::generate(ColorFamily::Rgb, BitDepth::U8, 3, AxisAssignment::PerPlane).unwrap();
//! assert_eq!(lut.width(), 1 << 24);
//! assert_eq!(lut.value(1, 0x00_7f_00), Some(0x7f));
//! ```
//!
//! # Size Bounds
//!
//! | Dimensions | Max bit depth | Max width |
//! |------------|---------------|-----------|
//! | 1          | 16            | 2^16      |
//! | 2          | 12            | 2^24      |
//! | 3          | 8             | 2^24      |
//!
//! # Dependencies
//!
//! - [`lutmap-core`] - Frames and pixel types
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Generation logging
//!
//! # Used By
//!
//! - `lutmap-cli` - `lutmap lut`
//! - `lutmap-tests`, `lutmap-bench`

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod generator;

pub use error::{LutError, LutResult};
pub use generator::{AxisAssignment, Lut, LutSpec};
