//! Pixel types and frame formats.
//!
//! [`PixelType`] is the per-sample description of a frame (color family,
//! bit depth, chroma subsampling). [`FrameFormat`] adds the luma-plane
//! dimensions and answers per-plane geometry questions.
//!
//! # Naming
//!
//! Both types have a textual form used by the command line and by logs:
//!
//! | Name            | Meaning                                    |
//! |-----------------|--------------------------------------------|
//! | `y8`…`y32`      | single luma plane                          |
//! | `yuv420p10`     | planar YUV, 4:2:0, 10-bit                  |
//! | `yuva444p8`     | planar YUV + alpha, no subsampling         |
//! | `yuv[1x2]p8`    | planar YUV with an unnamed ratio (w x h)   |
//! | `rgbp12`        | planar RGB, 12-bit                         |
//! | `rgbap16`       | planar RGBA, 16-bit                        |
//! | `rgb24`/`rgb48` | packed BGR, 8/16-bit                       |
//! | `rgba32`/`rgba64` | packed BGRA, 8/16-bit                    |
//!
//! A frame format appends the size: `yuv420p8:1440x1080`.
//!
//! ```rust
//! use lutmap_core::{FrameFormat, ColorFamily};
//!
//! let fmt: FrameFormat = "yuv420p8:1440x1080".parse().unwrap();
//! assert_eq!(fmt.pixel_type().family(), ColorFamily::Yuv);
//! assert_eq!(fmt.plane_width(1), 720);
//! assert_eq!(fmt.plane_height(2), 540);
//! ```

use crate::{BitDepth, ColorFamily, Error, PlaneRole, Result, Subsampling};
use std::str::FromStr;

/// Color family, bit depth and subsampling of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelType {
    family: ColorFamily,
    bit_depth: BitDepth,
    subsampling: Subsampling,
}

impl PixelType {
    /// Creates a pixel type, validating the combination.
    ///
    /// # Errors
    ///
    /// - packed families at depths other than 8 or 16 bits
    /// - subsampling on a family without chroma planes
    pub fn new(family: ColorFamily, bit_depth: BitDepth, subsampling: Subsampling) -> Result<Self> {
        if family.is_packed() && !matches!(bit_depth, BitDepth::U8 | BitDepth::U16) {
            return Err(Error::unsupported_pixel_type(format!(
                "packed {family} is only available at 8 or 16 bits, not {bit_depth}"
            )));
        }
        if subsampling.is_subsampled() && !family.is_yuv() {
            return Err(Error::unsupported_pixel_type(format!(
                "{family} cannot be subsampled ({subsampling})"
            )));
        }
        Ok(Self {
            family,
            bit_depth,
            subsampling,
        })
    }

    /// Creates a pixel type without subsampling.
    pub fn full(family: ColorFamily, bit_depth: BitDepth) -> Result<Self> {
        Self::new(family, bit_depth, Subsampling::NONE)
    }

    /// Color family.
    #[inline]
    pub fn family(&self) -> ColorFamily {
        self.family
    }

    /// Sample bit depth.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Chroma subsampling.
    #[inline]
    pub fn subsampling(&self) -> Subsampling {
        self.subsampling
    }

    /// Same family and subsampling at a different depth.
    pub fn with_bit_depth(&self, bit_depth: BitDepth) -> Result<Self> {
        Self::new(self.family, bit_depth, self.subsampling)
    }

    /// Whether the frame has no subsampled planes (4:4:4, RGB or gray).
    #[inline]
    pub fn is_full_resolution(&self) -> bool {
        !self.subsampling.is_subsampled()
    }
}

impl std::fmt::Display for PixelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits = self.bit_depth.bits();
        match self.family {
            ColorFamily::Gray => write!(f, "y{bits}"),
            ColorFamily::Yuv | ColorFamily::Yuva => {
                let prefix = if self.family.has_alpha() { "yuva" } else { "yuv" };
                match self.subsampling.label() {
                    Some(label) => write!(f, "{prefix}{label}p{bits}"),
                    None => write!(
                        f,
                        "{prefix}[{}x{}]p{bits}",
                        self.subsampling.horizontal(),
                        self.subsampling.vertical()
                    ),
                }
            }
            ColorFamily::Rgb => write!(f, "rgbp{bits}"),
            ColorFamily::Rgba => write!(f, "rgbap{bits}"),
            ColorFamily::PackedRgb => write!(f, "rgb{}", bits * 3),
            ColorFamily::PackedRgba => write!(f, "rgba{}", bits * 4),
        }
    }
}

impl FromStr for PixelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let bad = || Error::unsupported_pixel_type(format!("unknown pixel type '{s}'"));
        let depth = |digits: &str| -> Result<BitDepth> {
            let bits: u32 = digits.parse().map_err(|_| bad())?;
            BitDepth::try_from(bits)
        };

        let yuv = lower
            .strip_prefix("yuva")
            .map(|r| (ColorFamily::Yuva, r))
            .or_else(|| lower.strip_prefix("yuv").map(|r| (ColorFamily::Yuv, r)));
        if let Some((family, rest)) = yuv {
            let (sub, bits) = rest.split_once('p').ok_or_else(bad)?;
            let subsampling = match sub.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                Some(ratio) => {
                    let (h, v) = ratio.split_once('x').ok_or_else(bad)?;
                    let h: u32 = h.parse().map_err(|_| bad())?;
                    let v: u32 = v.parse().map_err(|_| bad())?;
                    Subsampling::from_ratio(h, v)?
                }
                None => Subsampling::from_label(sub).ok_or_else(bad)?,
            };
            return Self::new(family, depth(bits)?, subsampling);
        }
        if let Some(bits) = lower.strip_prefix("rgbap") {
            return Self::full(ColorFamily::Rgba, depth(bits)?);
        }
        if let Some(bits) = lower.strip_prefix("rgbp") {
            return Self::full(ColorFamily::Rgb, depth(bits)?);
        }
        match lower.as_str() {
            "rgb24" => return Self::full(ColorFamily::PackedRgb, BitDepth::U8),
            "rgb48" => return Self::full(ColorFamily::PackedRgb, BitDepth::U16),
            "rgba32" => return Self::full(ColorFamily::PackedRgba, BitDepth::U8),
            "rgba64" => return Self::full(ColorFamily::PackedRgba, BitDepth::U16),
            _ => {}
        }
        if let Some(bits) = lower.strip_prefix('y') {
            return Self::full(ColorFamily::Gray, depth(bits)?);
        }
        Err(bad())
    }
}

/// Pixel type plus the dimensions of the first (luma/red) plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    pixel_type: PixelType,
    width: u32,
    height: u32,
}

impl FrameFormat {
    /// Creates a frame format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero dimension or for
    /// dimensions that the chroma divisors do not divide exactly.
    pub fn new(pixel_type: PixelType, width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_dimensions(width, height, "zero-sized frame"));
        }
        let sub = pixel_type.subsampling();
        if width % sub.horizontal() != 0 || height % sub.vertical() != 0 {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("not divisible by subsampling {sub}"),
            ));
        }
        Ok(Self {
            pixel_type,
            width,
            height,
        })
    }

    /// Pixel type of the frame.
    #[inline]
    pub fn pixel_type(&self) -> PixelType {
        self.pixel_type
    }

    /// Color family shortcut.
    #[inline]
    pub fn family(&self) -> ColorFamily {
        self.pixel_type.family()
    }

    /// Bit depth shortcut.
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.pixel_type.bit_depth()
    }

    /// Luma width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Luma height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)` of the first plane.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of buffers (1 for packed families).
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.family().plane_count()
    }

    /// Role of planar plane `index`. Packed frames report their first channel.
    pub fn plane_role(&self, index: usize) -> Option<PlaneRole> {
        self.family().roles().get(index).copied()
    }

    /// Width of plane `index` in pixels.
    pub fn plane_width(&self, index: usize) -> u32 {
        match self.plane_role(index) {
            Some(role) if role.is_chroma() => self.width >> self.pixel_type.subsampling().shift_w(),
            _ => self.width,
        }
    }

    /// Height of plane `index` in rows.
    pub fn plane_height(&self, index: usize) -> u32 {
        match self.plane_role(index) {
            Some(role) if role.is_chroma() => self.height >> self.pixel_type.subsampling().shift_h(),
            _ => self.height,
        }
    }

    /// Samples per row of plane `index` (channels × width for packed frames).
    pub fn plane_row_samples(&self, index: usize) -> usize {
        let channels = if self.family().is_packed() { self.family().channels() } else { 1 };
        self.plane_width(index) as usize * channels
    }

    /// Total samples of one frame, all planes included.
    pub fn frame_samples(&self) -> usize {
        (0..self.plane_count())
            .map(|p| self.plane_row_samples(p) * self.plane_height(p) as usize)
            .sum()
    }

    /// Same dimensions, different pixel type.
    pub fn with_pixel_type(&self, pixel_type: PixelType) -> Result<Self> {
        Self::new(pixel_type, self.width, self.height)
    }
}

impl std::fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}x{}", self.pixel_type, self.width, self.height)
    }
}

impl FromStr for FrameFormat {
    type Err = Error;

    /// Parses `pixeltype:WxH`. A bare width (`rgbp8:65536`) means height 1.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::unsupported_pixel_type(format!("expected 'pixeltype:WxH', got '{s}'"));
        let (pt, size) = s.rsplit_once(':').ok_or_else(bad)?;
        let pixel_type: PixelType = pt.parse()?;
        let (w, h) = match size.split_once(['x', 'X']) {
            Some((w, h)) => (w, h),
            None => (size, "1"),
        };
        let width: u32 = w.trim().parse().map_err(|_| bad())?;
        let height: u32 = h.trim().parse().map_err(|_| bad())?;
        Self::new(pixel_type, width, height)
    }
}
