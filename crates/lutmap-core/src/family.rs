//! Color families, plane roles and chroma subsampling.
//!
//! A [`ColorFamily`] fixes which planes (or interleaved channels) a frame
//! carries and in which order. The ordering lives in one immutable registry,
//! [`ColorFamily::roles`], looked up by value.
//!
//! | Family        | Layout      | Roles          |
//! |---------------|-------------|----------------|
//! | `Gray`        | planar      | Y              |
//! | `Yuv`         | planar      | Y U V          |
//! | `Yuva`        | planar      | Y U V A        |
//! | `Rgb`         | planar      | R G B          |
//! | `Rgba`        | planar      | R G B A        |
//! | `PackedRgb`   | interleaved | B G R          |
//! | `PackedRgba`  | interleaved | B G R A        |
//!
//! Packed families store the channels byte-order flipped (blue first) in a
//! single buffer, with scanlines bottom-up.

use crate::{Error, Result};
use std::str::FromStr;

// ============================================================================
// Plane roles
// ============================================================================

/// Identity of one plane (or interleaved channel) inside a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaneRole {
    /// Luma
    Y,
    /// Blue-difference chroma
    U,
    /// Red-difference chroma
    V,
    /// Alpha
    A,
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
}

impl PlaneRole {
    /// Whether this role is stored at chroma resolution.
    #[inline]
    pub const fn is_chroma(&self) -> bool {
        matches!(self, Self::U | Self::V)
    }

    /// Single-letter name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Y => "Y",
            Self::U => "U",
            Self::V => "V",
            Self::A => "A",
            Self::R => "R",
            Self::G => "G",
            Self::B => "B",
        }
    }
}

impl std::fmt::Display for PlaneRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

const ROLES_Y: &[PlaneRole] = &[PlaneRole::Y];
const ROLES_YUV: &[PlaneRole] = &[PlaneRole::Y, PlaneRole::U, PlaneRole::V];
const ROLES_YUVA: &[PlaneRole] = &[PlaneRole::Y, PlaneRole::U, PlaneRole::V, PlaneRole::A];
const ROLES_RGB: &[PlaneRole] = &[PlaneRole::R, PlaneRole::G, PlaneRole::B];
const ROLES_RGBA: &[PlaneRole] = &[PlaneRole::R, PlaneRole::G, PlaneRole::B, PlaneRole::A];
const ROLES_BGR: &[PlaneRole] = &[PlaneRole::B, PlaneRole::G, PlaneRole::R];
const ROLES_BGRA: &[PlaneRole] = &[PlaneRole::B, PlaneRole::G, PlaneRole::R, PlaneRole::A];

// ============================================================================
// Color family
// ============================================================================

/// Color family of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorFamily {
    /// Single luma plane.
    Gray,
    /// Planar YUV.
    Yuv,
    /// Planar YUV with alpha.
    Yuva,
    /// Planar RGB.
    Rgb,
    /// Planar RGB with alpha.
    Rgba,
    /// Interleaved BGR (3 channels).
    PackedRgb,
    /// Interleaved BGRA (4 channels).
    PackedRgba,
}

impl ColorFamily {
    /// Ordered plane (or channel) roles of this family.
    #[inline]
    pub const fn roles(&self) -> &'static [PlaneRole] {
        match self {
            Self::Gray => ROLES_Y,
            Self::Yuv => ROLES_YUV,
            Self::Yuva => ROLES_YUVA,
            Self::Rgb => ROLES_RGB,
            Self::Rgba => ROLES_RGBA,
            Self::PackedRgb => ROLES_BGR,
            Self::PackedRgba => ROLES_BGRA,
        }
    }

    /// Number of channels per pixel.
    #[inline]
    pub const fn channels(&self) -> usize {
        self.roles().len()
    }

    /// Number of separate buffers a frame of this family holds.
    #[inline]
    pub const fn plane_count(&self) -> usize {
        if self.is_packed() { 1 } else { self.channels() }
    }

    /// Whether channels are interleaved in a single buffer.
    #[inline]
    pub const fn is_packed(&self) -> bool {
        matches!(self, Self::PackedRgb | Self::PackedRgba)
    }

    /// Whether this family carries YUV planes (and so may be subsampled).
    #[inline]
    pub const fn is_yuv(&self) -> bool {
        matches!(self, Self::Yuv | Self::Yuva)
    }

    /// Whether this family carries RGB data, planar or packed.
    #[inline]
    pub const fn is_rgb(&self) -> bool {
        matches!(self, Self::Rgb | Self::Rgba | Self::PackedRgb | Self::PackedRgba)
    }

    /// Whether this family is a lone luma plane.
    #[inline]
    pub const fn is_gray(&self) -> bool {
        matches!(self, Self::Gray)
    }

    /// Whether the last channel is alpha.
    #[inline]
    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::Yuva | Self::Rgba | Self::PackedRgba)
    }

    /// Plane selector name accepted by [`FromStr`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Gray => "Y",
            Self::Yuv => "YUV",
            Self::Yuva => "YUVA",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::PackedRgb => "BGR",
            Self::PackedRgba => "BGRA",
        }
    }
}

impl std::fmt::Display for ColorFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorFamily {
    type Err = Error;

    /// Parses a plane selector (`Y`, `YUV`, `YUVA`, `RGB`, `RGBA`), ignoring case.
    ///
    /// ```rust
    /// use lutmap_core::ColorFamily;
    /// assert_eq!("rgb".parse::<ColorFamily>().unwrap(), ColorFamily::Rgb);
    /// assert!("XYZ".parse::<ColorFamily>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "Y" => Ok(Self::Gray),
            "YUV" => Ok(Self::Yuv),
            "YUVA" => Ok(Self::Yuva),
            "RGB" => Ok(Self::Rgb),
            "RGBA" => Ok(Self::Rgba),
            _ => Err(Error::unsupported_pixel_type(format!(
                "invalid plane selection '{s}' (expected Y, YUV, YUVA, RGB or RGBA)"
            ))),
        }
    }
}

// ============================================================================
// Subsampling
// ============================================================================

/// Chroma subsampling divisors relative to the luma plane.
///
/// Each axis is 1, 2 or 4. Stored as log2 shifts so plane sizes are a shift
/// of the luma size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Subsampling {
    shift_w: u8,
    shift_h: u8,
}

impl Subsampling {
    /// No subsampling (4:4:4).
    pub const NONE: Subsampling = Subsampling { shift_w: 0, shift_h: 0 };
    /// 4:2:2
    pub const S422: Subsampling = Subsampling { shift_w: 1, shift_h: 0 };
    /// 4:2:0
    pub const S420: Subsampling = Subsampling { shift_w: 1, shift_h: 1 };
    /// 4:1:1
    pub const S411: Subsampling = Subsampling { shift_w: 2, shift_h: 0 };
    /// 4:1:0
    pub const S410: Subsampling = Subsampling { shift_w: 2, shift_h: 2 };

    /// Builds subsampling from per-axis divisors.
    ///
    /// ```rust
    /// use lutmap_core::Subsampling;
    /// assert_eq!(Subsampling::from_ratio(2, 2).unwrap(), Subsampling::S420);
    /// assert!(Subsampling::from_ratio(3, 1).is_err());
    /// ```
    pub fn from_ratio(horizontal: u32, vertical: u32) -> Result<Self> {
        match (shift_of(horizontal), shift_of(vertical)) {
            (Some(shift_w), Some(shift_h)) => Ok(Self { shift_w, shift_h }),
            _ => Err(Error::InvalidSubsampling { horizontal, vertical }),
        }
    }

    /// Derives the ratio between a luma size and a chroma size.
    ///
    /// Fails unless `luma = chroma * d` exactly with `d` in {1, 2, 4} on both
    /// axes.
    pub fn from_sizes(luma: (u32, u32), chroma: (u32, u32)) -> Result<Self> {
        let h = exact_divisor(luma.0, chroma.0);
        let v = exact_divisor(luma.1, chroma.1);
        match (h, v) {
            (Some(h), Some(v)) => Self::from_ratio(h, v),
            _ => Err(Error::InvalidSubsampling {
                horizontal: h.unwrap_or(0),
                vertical: v.unwrap_or(0),
            }),
        }
    }

    /// Horizontal divisor.
    #[inline]
    pub const fn horizontal(&self) -> u32 {
        1 << self.shift_w
    }

    /// Vertical divisor.
    #[inline]
    pub const fn vertical(&self) -> u32 {
        1 << self.shift_h
    }

    /// Horizontal log2 shift.
    #[inline]
    pub const fn shift_w(&self) -> u32 {
        self.shift_w as u32
    }

    /// Vertical log2 shift.
    #[inline]
    pub const fn shift_h(&self) -> u32 {
        self.shift_h as u32
    }

    /// Whether any axis is subsampled.
    #[inline]
    pub const fn is_subsampled(&self) -> bool {
        self.shift_w != 0 || self.shift_h != 0
    }

    /// Conventional `4:x:y` label, if one exists for this ratio.
    pub const fn label(&self) -> Option<&'static str> {
        match (self.shift_w, self.shift_h) {
            (0, 0) => Some("444"),
            (1, 0) => Some("422"),
            (1, 1) => Some("420"),
            (2, 0) => Some("411"),
            (2, 2) => Some("410"),
            _ => None,
        }
    }

    /// Inverse of [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "444" => Some(Self::NONE),
            "422" => Some(Self::S422),
            "420" => Some(Self::S420),
            "411" => Some(Self::S411),
            "410" => Some(Self::S410),
            _ => None,
        }
    }
}

impl std::fmt::Display for Subsampling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.horizontal(), self.vertical())
    }
}

fn shift_of(divisor: u32) -> Option<u8> {
    match divisor {
        1 => Some(0),
        2 => Some(1),
        4 => Some(2),
        _ => None,
    }
}

fn exact_divisor(full: u32, part: u32) -> Option<u32> {
    if part == 0 || full % part != 0 {
        None
    } else {
        Some(full / part)
    }
}
