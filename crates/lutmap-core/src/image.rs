//! Frame buffers.
//!
//! A [`Frame`] is a [`FrameFormat`] plus one [`Plane`] per buffer. Planar
//! families store one plane per channel; packed families store a single
//! interleaved plane.
//!
//! # Memory Layout
//!
//! Planes are row-major. The stride is counted in samples and is at least
//! the row length; samples between the end of a row and the next stride
//! are padding and never read. Packed rows hold `channels * width` samples:
//!
//! ```text
//! planar Y:      [Y Y Y Y ... pad]           <- row 0
//! packed BGRA:   [B G R A B G R A ... pad]   <- row 0 in memory
//! ```
//!
//! Frames allocated here are unpadded. Padded planes come from providers
//! through [`Plane::with_stride`].
//!
//! Packed frames store their rows bottom-up: memory row 0 is the bottom
//! image row. [`Frame::to_packed`] performs that flip.
//!
//! # Sharing
//!
//! Sample storage is reference counted. Cloning a frame is cheap and the
//! clones share storage until one of them is written through
//! [`Plane::samples_mut`], which copies first. [`Frame::is_exclusive`]
//! reports whether a handle is the sole owner of all its planes, which is
//! what allows writing results over a source frame.
//!
//! # Dependencies
//!
//! - [`crate::sample`] - typed storage
//! - [`crate::spec`] - plane geometry
//!
//! # Used By
//!
//! - `lutmap-lut` - LUT frames
//! - `lutmap-ops` - source and destination frames

use crate::{ColorFamily, Error, FrameFormat, Result, Sample, SampleBuf, SampleWidth};

/// One plane of samples.
///
/// Equality compares geometry and visible samples; padding is ignored.
#[derive(Debug, Clone)]
pub struct Plane {
    row_samples: usize,
    stride: usize,
    height: usize,
    data: SampleBuf,
}

impl Plane {
    /// Zero-filled plane.
    pub fn zeroed(width: SampleWidth, row_samples: usize, height: usize) -> Self {
        Self {
            row_samples,
            stride: row_samples,
            height,
            data: SampleBuf::zeroed(width, row_samples * height),
        }
    }

    /// Plane over existing samples.
    ///
    /// # Errors
    ///
    /// [`Error::BufferSize`] when `data` does not hold exactly
    /// `row_samples * height` samples.
    pub fn from_buf(row_samples: usize, height: usize, data: SampleBuf) -> Result<Self> {
        let expected = row_samples * height;
        if data.len() != expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            row_samples,
            stride: row_samples,
            height,
            data,
        })
    }

    /// Plane over existing samples whose rows are `stride` samples apart.
    ///
    /// The last row only needs `row_samples` samples, so `data` must hold at
    /// least `stride * (height - 1) + row_samples`.
    ///
    /// ```rust
    /// use lutmap_core::{Plane, SampleBuf};
    ///
    /// // 3 samples per row, rows 4 apart
    /// let data = SampleBuf::U8(vec![1, 2, 3, 0, 4, 5, 6].into());
    /// let plane = Plane::with_stride(3, 4, 2, data).unwrap();
    /// assert_eq!(plane.get(0, 1), Some(4));
    /// assert_eq!(plane.get(3, 0), None);
    /// ```
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] when `stride < row_samples`
    /// - [`Error::BufferSize`] when `data` is too short
    pub fn with_stride(row_samples: usize, stride: usize, height: usize, data: SampleBuf) -> Result<Self> {
        if stride < row_samples {
            return Err(Error::invalid_dimensions(
                row_samples as u32,
                height as u32,
                format!("stride {stride} is shorter than the row"),
            ));
        }
        let expected = min_len(row_samples, stride, height);
        if data.len() < expected {
            return Err(Error::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            row_samples,
            stride,
            height,
            data,
        })
    }

    /// Plane over a typed vector.
    pub fn from_vec<T: Sample>(row_samples: usize, height: usize, data: Vec<T>) -> Result<Self> {
        Self::from_buf(row_samples, height, T::wrap(data))
    }

    /// Samples per row.
    #[inline]
    pub fn row_samples(&self) -> usize {
        self.row_samples
    }

    /// Distance between rows, in samples.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Whether rows are stored back to back.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.stride == self.row_samples
    }

    /// Number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Storage width.
    #[inline]
    pub fn sample_width(&self) -> SampleWidth {
        self.data.width()
    }

    /// Underlying storage.
    #[inline]
    pub fn buf(&self) -> &SampleBuf {
        &self.data
    }

    /// Whether this handle is the only owner of the storage.
    #[inline]
    pub fn is_unique(&self) -> bool {
        self.data.is_unique()
    }

    /// All samples as a typed slice, padding included.
    pub fn samples<T: Sample>(&self) -> Result<&[T]> {
        T::slice(&self.data).ok_or(Error::SampleWidthMismatch {
            expected: T::WIDTH,
            got: self.data.width(),
        })
    }

    /// All samples as a mutable typed slice. Shared storage is copied first.
    pub fn samples_mut<T: Sample>(&mut self) -> Result<&mut [T]> {
        let got = self.data.width();
        T::slice_mut(&mut self.data).ok_or(Error::SampleWidthMismatch {
            expected: T::WIDTH,
            got,
        })
    }

    /// Row `y` as a typed slice.
    pub fn row<T: Sample>(&self, y: usize) -> Result<&[T]> {
        let start = y * self.stride;
        let samples = self.samples::<T>()?;
        samples
            .get(start..start + self.row_samples)
            .ok_or_else(|| Error::other(format!("row {y} out of range (height {})", self.height)))
    }

    /// Sample at column `x` (in samples) of row `y`, widened to `u32`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.row_samples || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Stores `value` at column `x` of row `y`. Returns `false` out of bounds.
    pub fn set(&mut self, x: usize, y: usize, value: u32) -> bool {
        if x >= self.row_samples || y >= self.height {
            return false;
        }
        self.data.set(y * self.stride + x, value)
    }

    /// Visible samples, row by row, without padding.
    pub fn rows<T: Sample>(&self) -> Result<impl Iterator<Item = &[T]>> {
        let samples = self.samples::<T>()?;
        let (w, stride) = (self.row_samples, self.stride);
        Ok((0..self.height).map(move |y| &samples[y * stride..y * stride + w]))
    }

    /// Visible samples, little-endian, rows back to back.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        if self.is_contiguous() {
            return self.data.to_le_bytes();
        }
        let bytes = self.data.to_le_bytes();
        let bps = self.data.width().bytes();
        (0..self.height)
            .flat_map(|y| {
                let start = y * self.stride * bps;
                bytes[start..start + self.row_samples * bps].iter().copied()
            })
            .collect()
    }

    fn rows_eq<T: Sample>(&self, other: &Plane) -> bool {
        match (self.rows::<T>(), other.rows::<T>()) {
            (Ok(a), Ok(b)) => a.zip(b).all(|(a, b)| a == b),
            _ => false,
        }
    }
}

impl PartialEq for Plane {
    fn eq(&self, other: &Self) -> bool {
        if self.row_samples != other.row_samples
            || self.height != other.height
            || self.sample_width() != other.sample_width()
        {
            return false;
        }
        match self.sample_width() {
            SampleWidth::U8 => self.rows_eq::<u8>(other),
            SampleWidth::U16 => self.rows_eq::<u16>(other),
            SampleWidth::U32 => self.rows_eq::<u32>(other),
        }
    }
}

impl Eq for Plane {}

fn min_len(row_samples: usize, stride: usize, height: usize) -> usize {
    match height {
        0 => 0,
        h => stride * (h - 1) + row_samples,
    }
}

/// A video frame: format plus sample planes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    format: FrameFormat,
    planes: Vec<Plane>,
}

impl Frame {
    /// Allocates a zero-filled frame for `format`.
    pub fn new(format: FrameFormat) -> Self {
        let width = format.bit_depth().storage();
        let planes = (0..format.plane_count())
            .map(|p| {
                Plane::zeroed(
                    width,
                    format.plane_row_samples(p),
                    format.plane_height(p) as usize,
                )
            })
            .collect();
        Self { format, planes }
    }

    /// Builds a frame from existing planes, checking them against `format`.
    ///
    /// # Errors
    ///
    /// - [`Error::PlaneOutOfRange`] when the plane count differs
    /// - [`Error::SampleWidthMismatch`] when a plane has the wrong storage
    /// - [`Error::InvalidDimensions`] when a plane has the wrong geometry
    ///
    /// Planes may be padded: only row length and height are checked.
    pub fn from_planes(format: FrameFormat, planes: Vec<Plane>) -> Result<Self> {
        let count = format.plane_count();
        if planes.len() != count {
            return Err(Error::PlaneOutOfRange {
                index: planes.len(),
                count,
            });
        }
        let storage = format.bit_depth().storage();
        for (p, plane) in planes.iter().enumerate() {
            if plane.sample_width() != storage {
                return Err(Error::SampleWidthMismatch {
                    expected: storage,
                    got: plane.sample_width(),
                });
            }
            let rows = format.plane_height(p) as usize;
            if plane.row_samples() != format.plane_row_samples(p) || plane.height() != rows {
                return Err(Error::invalid_dimensions(
                    plane.row_samples() as u32,
                    plane.height() as u32,
                    format!("plane {p} of {format} needs {}x{rows} samples", format.plane_row_samples(p)),
                ));
            }
        }
        Ok(Self { format, planes })
    }

    /// Frame format.
    #[inline]
    pub fn format(&self) -> &FrameFormat {
        &self.format
    }

    /// Number of planes.
    #[inline]
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    /// Plane `index`.
    pub fn plane(&self, index: usize) -> Result<&Plane> {
        let count = self.planes.len();
        self.planes.get(index).ok_or(Error::PlaneOutOfRange { index, count })
    }

    /// Mutable plane `index`.
    pub fn plane_mut(&mut self, index: usize) -> Result<&mut Plane> {
        let count = self.planes.len();
        self.planes.get_mut(index).ok_or(Error::PlaneOutOfRange { index, count })
    }

    /// All planes.
    #[inline]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// All planes, mutable.
    #[inline]
    pub fn planes_mut(&mut self) -> &mut [Plane] {
        &mut self.planes
    }

    /// Sample `x` (in samples) of row `y` in `plane`.
    #[inline]
    pub fn sample(&self, plane: usize, x: usize, y: usize) -> Option<u32> {
        self.planes.get(plane).and_then(|p| p.get(x, y))
    }

    /// Writes a sample. Returns `false` out of bounds.
    pub fn set_sample(&mut self, plane: usize, x: usize, y: usize, value: u32) -> bool {
        self.planes.get_mut(plane).is_some_and(|p| p.set(x, y, value))
    }

    /// Whether this handle solely owns every plane.
    pub fn is_exclusive(&self) -> bool {
        self.planes.iter().all(Plane::is_unique)
    }

    /// Interleaves a planar RGB(A) frame into packed BGR(A) order.
    ///
    /// Rows are flipped so that memory row 0 holds the bottom image row.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedPixelType`] unless the frame is planar RGB or RGBA
    /// at 8 or 16 bits.
    pub fn to_packed(&self) -> Result<Frame> {
        let family = match self.format.family() {
            ColorFamily::Rgb => ColorFamily::PackedRgb,
            ColorFamily::Rgba => ColorFamily::PackedRgba,
            other => {
                return Err(Error::unsupported_pixel_type(format!(
                    "only planar RGB/RGBA can be packed, got {other}"
                )));
            }
        };
        let pixel_type = crate::PixelType::full(family, self.format.bit_depth())?;
        let format = self.format.with_pixel_type(pixel_type)?;
        let mut out = Frame::new(format);
        match self.format.bit_depth().storage() {
            SampleWidth::U8 => self.pack_into::<u8>(&mut out)?,
            SampleWidth::U16 => self.pack_into::<u16>(&mut out)?,
            SampleWidth::U32 => {
                return Err(Error::unsupported_pixel_type("32-bit frames cannot be packed"));
            }
        }
        Ok(out)
    }

    fn pack_into<T: Sample>(&self, out: &mut Frame) -> Result<()> {
        let channels = self.planes.len();
        let (w, h) = (self.format.width() as usize, self.format.height() as usize);
        // memory order is B, G, R, A; planar order is R, G, B, A
        let order: &[usize] = if channels == 4 { &[2, 1, 0, 3] } else { &[2, 1, 0] };
        let src: Vec<(&[T], usize)> = self
            .planes
            .iter()
            .map(|p| Ok((p.samples::<T>()?, p.stride())))
            .collect::<Result<_>>()?;
        let dst = out.plane_mut(0)?.samples_mut::<T>()?;
        for (y, row) in dst.chunks_exact_mut(w * channels).enumerate() {
            let sy = h - 1 - y;
            for (x, px) in row.chunks_exact_mut(channels).enumerate() {
                for (c, &p) in order.iter().enumerate() {
                    let (data, stride) = src[p];
                    px[c] = data[sy * stride + x];
                }
            }
        }
        Ok(())
    }
}
