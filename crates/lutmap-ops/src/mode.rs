//! Application modes and options.
//!
//! | Mode | Variant    | LUT dims | Source clips | Output planes |
//! |------|------------|----------|--------------|---------------|
//! | 1    | `Map1D`    | 1        | 1 or 3       | 1 or 3        |
//! | 2    | `Expand1D` | 1        | 1            | 3 (or packed) |
//! | 3    | `Map2D`    | 2        | 2            | 1 or 3        |
//! | 4    | `Expand2D` | 2        | 2            | 3             |
//! | 5    | `Map3D`    | 3        | 1 or 3       | 1 or 3        |
//! | 6    | `Expand3D` | 3        | 1 or 3       | 3             |
//!
//! `Map*` modes compute one index per destination plane from that plane's
//! own sources. `Expand*` modes compute one index per pixel and write it
//! through every LUT channel.

use crate::{ApplyError, ApplyResult};

/// How sources are combined and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Mode 1: one sample per index, one LUT channel per destination plane.
    Map1D,
    /// Mode 2: one sample of one plane expanded into three channels.
    Expand1D,
    /// Mode 3: two samples per index, per destination plane.
    Map2D,
    /// Mode 4: two samples expanded into three channels.
    Expand2D,
    /// Mode 5: three samples per index, per destination plane.
    Map3D,
    /// Mode 6: three samples expanded into three channels.
    Expand3D,
}

impl Mode {
    /// All modes in numeric order.
    pub const ALL: [Mode; 6] = [
        Mode::Map1D,
        Mode::Expand1D,
        Mode::Map2D,
        Mode::Expand2D,
        Mode::Map3D,
        Mode::Expand3D,
    ];

    /// Numeric mode (1..=6).
    pub const fn number(&self) -> u32 {
        match self {
            Mode::Map1D => 1,
            Mode::Expand1D => 2,
            Mode::Map2D => 3,
            Mode::Expand2D => 4,
            Mode::Map3D => 5,
            Mode::Expand3D => 6,
        }
    }

    /// Samples combined per index; also the required LUT dimensionality.
    pub const fn arity(&self) -> usize {
        match self {
            Mode::Map1D | Mode::Expand1D => 1,
            Mode::Map2D | Mode::Expand2D => 2,
            Mode::Map3D | Mode::Expand3D => 3,
        }
    }

    /// Required LUT dimensionality.
    #[inline]
    pub const fn lut_dimensions(&self) -> u32 {
        self.arity() as u32
    }

    /// Whether one index feeds every destination plane.
    pub const fn is_expanding(&self) -> bool {
        matches!(self, Mode::Expand1D | Mode::Expand2D | Mode::Expand3D)
    }

    /// Legal numbers of source clips.
    pub const fn source_counts(&self) -> &'static [usize] {
        match self {
            Mode::Expand1D => &[1],
            Mode::Map2D | Mode::Expand2D => &[2],
            Mode::Map1D | Mode::Map3D | Mode::Expand3D => &[1, 3],
        }
    }
}

impl TryFrom<u32> for Mode {
    type Error = ApplyError;

    fn try_from(n: u32) -> ApplyResult<Self> {
        Mode::ALL
            .get((n as usize).wrapping_sub(1))
            .copied()
            .ok_or_else(|| ApplyError::config(format!("mode must be an integer from 1 to 6, got {n}")))
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "mode {}", self.number())
    }
}

/// Options for [`crate::ApplyLut`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    /// Write into an exclusively owned source frame when its format equals
    /// the output format, instead of allocating.
    pub in_place: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { in_place: true }
    }
}

impl ApplyOptions {
    /// Enables or disables in-place writes.
    pub fn with_in_place(mut self, in_place: bool) -> Self {
        self.in_place = in_place;
        self
    }
}
