//! # lutmap-ops
//!
//! Applies N-dimensional lookup tables to planar video frames.
//!
//! One to three source samples are combined into a flat table index
//! (first sample least significant) and the table entry is written to the
//! destination. Six [`Mode`]s decide which samples are combined and how
//! many destination planes each index feeds.
//!
//! # Modules
//!
//! - [`mode`] - mode table and [`ApplyOptions`]
//! - [`resolve`](mod@resolve) - validation and planning ([`ResolvedConfig`])
//! - [`composite`] - index composition
//! - [`mapper`] - monomorphized write routines
//! - [`apply`] - the [`ApplyLut`] filter
//!
//! # Example
//!
//! ```rust
//! use lutmap_core::FrameFormat;
//! use lutmap_ops::{resolve, ApplyOptions, Mode};
//!
//! let y: FrameFormat = "y8:1440x1080".parse().unwrap();
//! let uv: FrameFormat = "y8:720x540".parse().unwrap();
//! let lut: FrameFormat = "yuv444p8:256".parse().unwrap();
//!
//! let cfg = resolve(Mode::Map1D, &[y, uv, uv], &lut, &ApplyOptions::default()).unwrap();
//! assert_eq!(cfg.output().to_string(), "yuv420p8:1440x1080");
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - process rows with rayon (enabled by default)
//!
//! # Dependencies
//!
//! - [`lutmap-core`] - Frames, formats and the clip interface
//! - [`thiserror`] - Error handling
//! - [`tracing`] - Resolve and per-frame logging
//! - [`rayon`] - Row parallelism (optional)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod apply;
pub mod composite;
pub mod mapper;
pub mod mode;
pub mod resolve;

pub use apply::ApplyLut;
pub use error::{ApplyError, ApplyResult};
pub use mapper::RoutineKind;
pub use mode::{ApplyOptions, Mode};
pub use resolve::{resolve, PlaneMap, ResolvedConfig, Routine, Slot};
