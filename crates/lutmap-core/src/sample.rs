//! Sample storage types.
//!
//! Every supported bit depth is stored in one of three unsigned integer
//! widths. The [`Sample`] trait ties a Rust type to its [`SampleWidth`] tag
//! and to the matching [`SampleBuf`] variant, so generic kernels can borrow
//! typed slices out of a dynamically-typed frame.
//!
//! | Depth         | Storage |
//! |---------------|---------|
//! | 8             | `u8`    |
//! | 10/12/14/16   | `u16`   |
//! | 32            | `u32`   |

use crate::SampleWidth;
use std::sync::Arc;

/// Shared sample storage of one plane.
///
/// Cloning is cheap (reference counted). Mutable access goes through
/// [`Arc::make_mut`], which copies the buffer when it is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleBuf {
    /// 8-bit samples
    U8(Arc<Vec<u8>>),
    /// 10..16-bit samples
    U16(Arc<Vec<u16>>),
    /// 32-bit samples
    U32(Arc<Vec<u32>>),
}

impl SampleBuf {
    /// Zero-filled buffer of `len` samples.
    pub fn zeroed(width: SampleWidth, len: usize) -> Self {
        match width {
            SampleWidth::U8 => SampleBuf::U8(Arc::new(vec![0; len])),
            SampleWidth::U16 => SampleBuf::U16(Arc::new(vec![0; len])),
            SampleWidth::U32 => SampleBuf::U32(Arc::new(vec![0; len])),
        }
    }

    /// Storage width tag.
    pub fn width(&self) -> SampleWidth {
        match self {
            SampleBuf::U8(_) => SampleWidth::U8,
            SampleBuf::U16(_) => SampleWidth::U16,
            SampleBuf::U32(_) => SampleWidth::U32,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            SampleBuf::U8(v) => v.len(),
            SampleBuf::U16(v) => v.len(),
            SampleBuf::U32(v) => v.len(),
        }
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this handle is the only reference to the storage.
    pub fn is_unique(&self) -> bool {
        fn unique<T>(a: &Arc<T>) -> bool {
            Arc::strong_count(a) == 1 && Arc::weak_count(a) == 0
        }
        match self {
            SampleBuf::U8(v) => unique(v),
            SampleBuf::U16(v) => unique(v),
            SampleBuf::U32(v) => unique(v),
        }
    }

    /// Sample `i` widened to `u32`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            SampleBuf::U8(v) => v.get(i).map(|&s| s as u32),
            SampleBuf::U16(v) => v.get(i).map(|&s| s as u32),
            SampleBuf::U32(v) => v.get(i).copied(),
        }
    }

    /// Stores `value` (truncated to the storage width) at `i`.
    ///
    /// Returns `false` when `i` is out of bounds.
    pub fn set(&mut self, i: usize, value: u32) -> bool {
        match self {
            SampleBuf::U8(v) => Arc::make_mut(v).get_mut(i).map(|s| *s = value as u8).is_some(),
            SampleBuf::U16(v) => Arc::make_mut(v).get_mut(i).map(|s| *s = value as u16).is_some(),
            SampleBuf::U32(v) => Arc::make_mut(v).get_mut(i).map(|s| *s = value).is_some(),
        }
    }

    /// Samples as raw little-endian bytes.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            SampleBuf::U8(v) => v.as_ref().clone(),
            SampleBuf::U16(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
            SampleBuf::U32(v) => v.iter().flat_map(|s| s.to_le_bytes()).collect(),
        }
    }

    /// Parses little-endian bytes. `bytes.len()` must be a multiple of the width.
    pub fn from_le_bytes(width: SampleWidth, bytes: &[u8]) -> Option<Self> {
        if bytes.len() % width.bytes() != 0 {
            return None;
        }
        Some(match width {
            SampleWidth::U8 => SampleBuf::U8(Arc::new(bytes.to_vec())),
            SampleWidth::U16 => SampleBuf::U16(Arc::new(
                bytes.chunks_exact(2).map(|c| u16::from_le_bytes([c[0], c[1]])).collect(),
            )),
            SampleWidth::U32 => SampleBuf::U32(Arc::new(
                bytes
                    .chunks_exact(4)
                    .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            )),
        })
    }
}

/// Unsigned integer type used as sample storage.
///
/// Implemented for `u8`, `u16` and `u32`.
///
/// # Example
///
/// ```rust
/// use lutmap_core::{Sample, SampleBuf, SampleWidth};
///
/// let buf = u16::wrap(vec![1, 2, 3]);
/// assert_eq!(buf.width(), SampleWidth::U16);
/// assert_eq!(u16::slice(&buf).unwrap(), &[1, 2, 3]);
/// assert!(u8::slice(&buf).is_none());
/// ```
pub trait Sample: Copy + Default + Send + Sync + Ord + std::fmt::Debug + 'static {
    /// Storage width tag.
    const WIDTH: SampleWidth;

    /// Widens to `u32`.
    fn to_u32(self) -> u32;

    /// Narrows from `u32`, keeping the low bits.
    fn from_u32(v: u32) -> Self;

    /// Borrows a typed slice if the buffer has this width.
    fn slice(buf: &SampleBuf) -> Option<&[Self]>;

    /// Mutable typed slice, copying shared storage first.
    fn slice_mut(buf: &mut SampleBuf) -> Option<&mut [Self]>;

    /// Wraps owned samples.
    fn wrap(data: Vec<Self>) -> SampleBuf;
}

impl Sample for u8 {
    const WIDTH: SampleWidth = SampleWidth::U8;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v as u8
    }

    fn slice(buf: &SampleBuf) -> Option<&[Self]> {
        match buf {
            SampleBuf::U8(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn slice_mut(buf: &mut SampleBuf) -> Option<&mut [Self]> {
        match buf {
            SampleBuf::U8(v) => Some(Arc::make_mut(v).as_mut_slice()),
            _ => None,
        }
    }

    fn wrap(data: Vec<Self>) -> SampleBuf {
        SampleBuf::U8(Arc::new(data))
    }
}

impl Sample for u16 {
    const WIDTH: SampleWidth = SampleWidth::U16;

    #[inline]
    fn to_u32(self) -> u32 {
        self as u32
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v as u16
    }

    fn slice(buf: &SampleBuf) -> Option<&[Self]> {
        match buf {
            SampleBuf::U16(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn slice_mut(buf: &mut SampleBuf) -> Option<&mut [Self]> {
        match buf {
            SampleBuf::U16(v) => Some(Arc::make_mut(v).as_mut_slice()),
            _ => None,
        }
    }

    fn wrap(data: Vec<Self>) -> SampleBuf {
        SampleBuf::U16(Arc::new(data))
    }
}

impl Sample for u32 {
    const WIDTH: SampleWidth = SampleWidth::U32;

    #[inline]
    fn to_u32(self) -> u32 {
        self
    }

    #[inline]
    fn from_u32(v: u32) -> Self {
        v
    }

    fn slice(buf: &SampleBuf) -> Option<&[Self]> {
        match buf {
            SampleBuf::U32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    fn slice_mut(buf: &mut SampleBuf) -> Option<&mut [Self]> {
        match buf {
            SampleBuf::U32(v) => Some(Arc::make_mut(v).as_mut_slice()),
            _ => None,
        }
    }

    fn wrap(data: Vec<Self>) -> SampleBuf {
        SampleBuf::U32(Arc::new(data))
    }
}
