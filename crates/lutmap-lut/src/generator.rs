//! Coordinate LUT generation.
//!
//! A generated LUT is a one-row frame of width `base^dimensions`, with
//! `base = 2^bits`. Plane `p` holds, at position `x`, digit `a` of `x`
//! written in base `base`:
//!
//! ```text
//! value(p, x) = (x >> (bits * a)) & (base - 1)
//! ```
//!
//! With digits 0, 1, 2 assigned to planes 0, 1, 2 the plane tuple at `x` is
//! the mixed-radix decomposition of `x`, least significant digit first. Such
//! a table is the identity for index composition, and it is the usual
//! starting point for building real tables: generate, transform the frame,
//! then apply.

use crate::{LutError, LutResult};
use lutmap_core::{
    BitDepth, Clip, ColorFamily, Frame, FrameFormat, PixelType, Result as CoreResult, Sample,
    SampleWidth,
};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Which digit of the position each LUT plane encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisAssignment {
    /// Every plane encodes the same digit.
    Digit(u32),
    /// Plane `p` encodes digit `p`.
    #[default]
    PerPlane,
}

impl AxisAssignment {
    /// Maps a numeric axis selector onto an assignment.
    ///
    /// - 1D: the selector is ignored, every plane encodes digit 0
    /// - 2D: `1..=2` selects digit `selector - 1`
    /// - 3D: `0` assigns digits per plane, `1..=3` selects digit `selector - 1`
    ///
    /// ```rust
    /// use lutmap_lut::AxisAssignment;
    ///
    /// assert_eq!(AxisAssignment::from_selector(3, 0).unwrap(), AxisAssignment::PerPlane);
    /// assert_eq!(AxisAssignment::from_selector(2, 2).unwrap(), AxisAssignment::Digit(1));
    /// assert!(AxisAssignment::from_selector(2, 0).is_err());
    /// ```
    pub fn from_selector(dimensions: u32, selector: u32) -> LutResult<Self> {
        let (min, max) = match dimensions {
            1 => return Ok(Self::Digit(0)),
            2 => (1, 2),
            3 => (0, 3),
            d => return Err(LutError::InvalidDimensions(d)),
        };
        if !(min..=max).contains(&selector) {
            return Err(LutError::InvalidAxis {
                selector,
                dimensions,
                min,
                max,
            });
        }
        Ok(match selector {
            0 => Self::PerPlane,
            s => Self::Digit(s - 1),
        })
    }

    /// Digit encoded by `plane`.
    #[inline]
    pub fn digit(&self, plane: usize) -> u32 {
        match *self {
            Self::Digit(a) => a,
            Self::PerPlane => plane as u32,
        }
    }
}

/// Parameters of a generated LUT.
///
/// # Example
///
/// ```rust
/// use lutmap_core::{BitDepth, ColorFamily};
/// use lutmap_lut::{AxisAssignment, LutSpec};
///
/// let lut = LutSpec::new(ColorFamily::Rgb, BitDepth::U8, 2)
///     .with_axes(AxisAssignment::Digit(1))
///     .generate()
///     .unwrap();
/// assert_eq!(lut.width(), 65536);
/// assert_eq!(lut.value(0, 0x1234), Some(0x12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LutSpec {
    /// Planar color family of the table.
    pub planes: ColorFamily,
    /// Sample depth of the sources the table will be applied to.
    pub bit_depth: BitDepth,
    /// Number of samples combined per lookup (1..=3).
    pub dimensions: u32,
    /// Digit assignment per plane.
    pub axes: AxisAssignment,
    /// Interleave RGB/RGBA tables into packed BGR(A) after generation.
    pub packed: bool,
}

impl LutSpec {
    /// Spec with per-plane axes, planar output.
    pub fn new(planes: ColorFamily, bit_depth: BitDepth, dimensions: u32) -> Self {
        Self {
            planes,
            bit_depth,
            dimensions,
            axes: AxisAssignment::default(),
            packed: false,
        }
    }

    /// Sets the axis assignment.
    pub fn with_axes(mut self, axes: AxisAssignment) -> Self {
        self.axes = axes;
        self
    }

    /// Requests packed output.
    pub fn packed(mut self, packed: bool) -> Self {
        self.packed = packed;
        self
    }

    /// Checks the parameters without allocating.
    ///
    /// # Errors
    ///
    /// - [`LutError::InvalidDimensions`] outside 1..=3
    /// - [`LutError::FloatNotSupported`] for 32-bit depth
    /// - [`LutError::TooLarge`] for 2D above 12 bits or 3D above 8 bits
    /// - [`LutError::InvalidPlanes`] for packed families
    pub fn validate(&self) -> LutResult<()> {
        if !(1..=3).contains(&self.dimensions) {
            return Err(LutError::InvalidDimensions(self.dimensions));
        }
        if self.bit_depth == BitDepth::U32 {
            return Err(LutError::FloatNotSupported);
        }
        let max_bits = match self.dimensions {
            2 => 12,
            3 => 8,
            _ => 16,
        };
        if self.bit_depth.bits() > max_bits {
            return Err(LutError::TooLarge {
                dimensions: self.dimensions,
                bits: self.bit_depth.bits(),
                max_bits,
            });
        }
        if self.planes.is_packed() {
            return Err(LutError::InvalidPlanes(self.planes.name().to_string()));
        }
        Ok(())
    }

    /// Table width in entries: `2^(bits * dimensions)`.
    pub fn width(&self) -> usize {
        1usize << (self.bit_depth.bits() * self.dimensions)
    }

    /// Generates the table.
    pub fn generate(&self) -> LutResult<Lut> {
        self.validate()?;

        let bits = self.bit_depth.bits();
        let pixel_type = PixelType::full(self.planes, self.bit_depth)?;
        let format = FrameFormat::new(pixel_type, self.width() as u32, 1)?;
        let mut frame = Frame::new(format);

        for p in 0..frame.plane_count() {
            let digit = self.axes.digit(p);
            trace!(plane = p, digit, "writing LUT plane");
            match self.bit_depth.storage() {
                SampleWidth::U8 => write_digits::<u8>(&mut frame, p, bits, digit)?,
                SampleWidth::U16 => write_digits::<u16>(&mut frame, p, bits, digit)?,
                SampleWidth::U32 => return Err(LutError::FloatNotSupported),
            }
        }

        if self.packed {
            frame = frame.to_packed()?;
        }

        debug!(
            format = %frame.format(),
            dimensions = self.dimensions,
            axes = ?self.axes,
            "generated LUT"
        );

        Ok(Lut {
            frame,
            dimensions: self.dimensions,
            source_depth: self.bit_depth,
        })
    }
}

fn write_digits<T: Sample>(frame: &mut Frame, plane: usize, bits: u32, digit: u32) -> LutResult<()> {
    let mask = (1u64 << bits) - 1;
    let shift = u64::from(bits) * u64::from(digit);
    let data = frame.plane_mut(plane)?.samples_mut::<T>()?;
    for (x, s) in data.iter_mut().enumerate() {
        // digits beyond the table's dimensionality are constant zero
        let v = if shift >= 64 { 0 } else { ((x as u64) >> shift) & mask };
        *s = T::from_u32(v as u32);
    }
    Ok(())
}

/// A generated lookup table.
///
/// The table is an ordinary one-row [`Frame`]; [`Lut`] adds the number of
/// dimensions and the source depth it was built for. It is also a one-frame
/// [`Clip`] so it can be handed to anything that consumes clips.
#[derive(Debug, Clone)]
pub struct Lut {
    frame: Frame,
    dimensions: u32,
    source_depth: BitDepth,
}

impl Lut {
    /// Generates a planar table.
    pub fn generate(
        planes: ColorFamily,
        bit_depth: BitDepth,
        dimensions: u32,
        axes: AxisAssignment,
    ) -> LutResult<Self> {
        LutSpec::new(planes, bit_depth, dimensions)
            .with_axes(axes)
            .generate()
    }

    /// Generates a table from textual/numeric parameters.
    ///
    /// `planes` is one of `Y`, `YUV`, `YUVA`, `RGB`, `RGBA` (any case);
    /// `selector` is interpreted by [`AxisAssignment::from_selector`].
    /// Checks run in this order: dimensions, bit depth, size bound, axis
    /// selector, planes.
    ///
    /// ```rust
    /// use lutmap_lut::Lut;
    ///
    /// let lut = Lut::from_selector("yuv", 1, 10, 1).unwrap();
    /// assert_eq!(lut.width(), 1024);
    /// assert!(Lut::from_selector("RGB", 3, 10, 0).is_err());
    /// assert!(Lut::from_selector("XYZ", 1, 8, 1).is_err());
    /// ```
    pub fn from_selector(planes: &str, dimensions: u32, bits: u32, selector: u32) -> LutResult<Self> {
        if !(1..=3).contains(&dimensions) {
            return Err(LutError::InvalidDimensions(dimensions));
        }
        let bit_depth = BitDepth::from_bits(bits).ok_or(LutError::InvalidBitDepth(bits))?;
        // size bounds are reported before the selector
        let probe = LutSpec::new(ColorFamily::Gray, bit_depth, dimensions);
        probe.validate()?;
        let axes = AxisAssignment::from_selector(dimensions, selector)?;
        let family: ColorFamily = planes
            .parse()
            .map_err(|_| LutError::InvalidPlanes(planes.to_string()))?;
        Self::generate(family, bit_depth, dimensions, axes)
    }

    /// Number of entries.
    #[inline]
    pub fn width(&self) -> usize {
        self.frame.format().width() as usize
    }

    /// Number of samples combined per lookup.
    #[inline]
    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    /// Depth of the sources this table indexes (also the depth of its entries).
    #[inline]
    pub fn bit_depth(&self) -> BitDepth {
        self.source_depth
    }

    /// Channel count (planes for planar tables, interleaved channels otherwise).
    #[inline]
    pub fn channels(&self) -> usize {
        self.frame.format().family().channels()
    }

    /// Entry `index` of `channel`, widened to `u32`.
    pub fn value(&self, channel: usize, index: usize) -> Option<u32> {
        let format = self.frame.format();
        if format.family().is_packed() {
            let ch = format.family().channels();
            if channel >= ch {
                return None;
            }
            self.frame.sample(0, index * ch + channel, 0)
        } else {
            self.frame.sample(channel, index, 0)
        }
    }

    /// The table frame.
    #[inline]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Consumes the table, returning its frame.
    #[inline]
    pub fn into_frame(self) -> Frame {
        self.frame
    }
}

impl Clip for Lut {
    fn format(&self) -> &FrameFormat {
        self.frame.format()
    }

    fn num_frames(&self) -> usize {
        1
    }

    fn frame(&self, _n: usize) -> CoreResult<Frame> {
        Ok(self.frame.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_1d() {
        let lut = Lut::generate(ColorFamily::Gray, BitDepth::U8, 1, AxisAssignment::Digit(0)).unwrap();
        assert_eq!(lut.width(), 256);
        for x in 0..256 {
            assert_eq!(lut.value(0, x), Some(x as u32));
        }
        assert_eq!(lut.value(0, 256), None);
    }

    #[test]
    fn test_2d_digits() {
        let x = 0x3a7;
        let lo = Lut::generate(ColorFamily::Gray, BitDepth::U8, 2, AxisAssignment::Digit(0)).unwrap();
        let hi = Lut::generate(ColorFamily::Gray, BitDepth::U8, 2, AxisAssignment::Digit(1)).unwrap();
        assert_eq!(lo.value(0, x), Some(0xa7));
        assert_eq!(hi.value(0, x), Some(0x03));
    }

    #[test]
    fn test_per_plane_alpha_is_zero() {
        // RGBA with per-plane axes: alpha encodes digit 3, which a 3D table never reaches
        let lut = Lut::generate(ColorFamily::Rgba, BitDepth::U8, 3, AxisAssignment::PerPlane).unwrap();
        let x = 0x00ab_cdef;
        assert_eq!(lut.value(0, x), Some(0xef));
        assert_eq!(lut.value(1, x), Some(0xcd));
        assert_eq!(lut.value(2, x), Some(0xab));
        assert_eq!(lut.value(3, x), Some(0));
    }

    #[test]
    fn test_high_depth_wraps_with_mask() {
        let lut = Lut::generate(ColorFamily::Yuv, BitDepth::U12, 2, AxisAssignment::Digit(0)).unwrap();
        assert_eq!(lut.width(), 1 << 24);
        assert_eq!(lut.value(2, 4095), Some(4095));
        assert_eq!(lut.value(2, 4096), Some(0));
        assert_eq!(lut.frame().format().bit_depth(), BitDepth::U12);
    }

    #[test]
    fn test_bounds() {
        assert!(matches!(
            Lut::from_selector("Y", 2, 14, 1),
            Err(LutError::TooLarge { dimensions: 2, max_bits: 12, .. })
        ));
        assert!(matches!(
            Lut::from_selector("Y", 3, 10, 1),
            Err(LutError::TooLarge { dimensions: 3, max_bits: 8, .. })
        ));
        assert!(matches!(Lut::from_selector("Y", 1, 32, 1), Err(LutError::FloatNotSupported)));
        assert!(matches!(Lut::from_selector("Y", 1, 9, 1), Err(LutError::InvalidBitDepth(9))));
        assert!(matches!(Lut::from_selector("Y", 4, 8, 1), Err(LutError::InvalidDimensions(4))));
    }

    #[test]
    fn test_32bit_spec_never_generates() {
        for packed in [false, true] {
            let spec = LutSpec::new(ColorFamily::Rgb, BitDepth::U32, 1).packed(packed);
            assert!(matches!(spec.generate(), Err(LutError::FloatNotSupported)));
        }
    }

    #[test]
    fn test_selector_checked_before_planes() {
        assert!(matches!(
            Lut::from_selector("nope", 2, 8, 5),
            Err(LutError::InvalidAxis { selector: 5, .. })
        ));
        assert!(matches!(Lut::from_selector("nope", 2, 8, 1), Err(LutError::InvalidPlanes(_))));
    }

    #[test]
    fn test_1d_ignores_selector() {
        let lut = Lut::from_selector("rgb", 1, 8, 7).unwrap();
        assert_eq!(lut.value(2, 200), Some(200));
    }

    #[test]
    fn test_packed_table() {
        let lut = LutSpec::new(ColorFamily::Rgba, BitDepth::U16, 1)
            .with_axes(AxisAssignment::Digit(0))
            .packed(true)
            .generate()
            .unwrap();
        assert_eq!(lut.frame().format().family(), ColorFamily::PackedRgba);
        assert_eq!(lut.channels(), 4);
        assert_eq!(lut.value(0, 1234), Some(1234));
        assert_eq!(lut.value(4, 1234), None);
    }

    #[test]
    fn test_packed_needs_rgb() {
        let err = LutSpec::new(ColorFamily::Yuv, BitDepth::U8, 1).packed(true).generate();
        assert!(matches!(err, Err(LutError::Core(_))));
    }

    #[test]
    fn test_lut_is_a_clip() {
        let lut = Lut::from_selector("Y", 1, 8, 1).unwrap();
        assert_eq!(lut.num_frames(), 1);
        assert_eq!(Clip::frame(&lut, 0).unwrap(), *lut.frame());
    }
}
