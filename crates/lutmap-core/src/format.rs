//! Bit depths and sample storage widths.
//!
//! # Types
//!
//! - [`BitDepth`] - Precision of a sample (8, 10, 12, 14, 16 or 32 bits)
//! - [`SampleWidth`] - Storage type of a sample in memory (u8, u16, u32)
//!
//! # Usage
//!
//! ```rust
//! use lutmap_core::format::{BitDepth, SampleWidth};
//!
//! let depth = BitDepth::U10;
//! assert_eq!(depth.storage(), SampleWidth::U16);
//! assert_eq!(depth.num_values(), Some(1024));
//! ```

/// Bit depth of integer sample data.
///
/// The 10/12/14-bit depths are stored in 16-bit words with the unused high
/// bits clear. 32-bit samples have no usable value count, so they can only
/// appear on the output side of a LUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BitDepth {
    /// 8-bit unsigned integer.
    #[default]
    U8,
    /// 10-bit unsigned integer.
    U10,
    /// 12-bit unsigned integer.
    U12,
    /// 14-bit unsigned integer.
    U14,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
}

impl BitDepth {
    /// All supported depths, smallest first.
    pub const ALL: [BitDepth; 6] = [
        BitDepth::U8,
        BitDepth::U10,
        BitDepth::U12,
        BitDepth::U14,
        BitDepth::U16,
        BitDepth::U32,
    ];

    /// Number of bits per sample.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U10 => 10,
            Self::U12 => 12,
            Self::U14 => 14,
            Self::U16 => 16,
            Self::U32 => 32,
        }
    }

    /// Looks up a depth by bit count.
    ///
    /// ```rust
    /// use lutmap_core::BitDepth;
    /// assert_eq!(BitDepth::from_bits(12), Some(BitDepth::U12));
    /// assert_eq!(BitDepth::from_bits(9), None);
    /// ```
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            8 => Some(Self::U8),
            10 => Some(Self::U10),
            12 => Some(Self::U12),
            14 => Some(Self::U14),
            16 => Some(Self::U16),
            32 => Some(Self::U32),
            _ => None,
        }
    }

    /// Maximum representable value.
    #[inline]
    pub const fn max_value(&self) -> u32 {
        match self {
            Self::U32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }

    /// Number of distinct values (`2^bits`), or `None` for 32-bit samples.
    ///
    /// This is the radix used when sample tuples are folded into LUT indices.
    #[inline]
    pub const fn num_values(&self) -> Option<u32> {
        match self {
            Self::U32 => None,
            _ => Some(1u32 << self.bits()),
        }
    }

    /// Returns the [`SampleWidth`] used to store this depth.
    #[inline]
    pub const fn storage(&self) -> SampleWidth {
        match self {
            Self::U8 => SampleWidth::U8,
            Self::U10 | Self::U12 | Self::U14 | Self::U16 => SampleWidth::U16,
            Self::U32 => SampleWidth::U32,
        }
    }

    /// Bytes per sample in storage.
    #[inline]
    pub const fn bytes_per_sample(&self) -> usize {
        self.storage().bytes()
    }
}

impl std::fmt::Display for BitDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

impl TryFrom<u32> for BitDepth {
    type Error = crate::Error;

    fn try_from(bits: u32) -> crate::Result<Self> {
        Self::from_bits(bits).ok_or(crate::Error::UnsupportedBitDepth(bits))
    }
}

/// Storage type of a sample in memory.
///
/// Only byte-aligned unsigned integer types exist here; the pixel mapper
/// selects its routine from a (source, destination) pair of these tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleWidth {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
}

impl SampleWidth {
    /// Number of bytes per sample.
    #[inline]
    pub const fn bytes(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
        }
    }

    /// Short name for display.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
        }
    }
}

impl std::fmt::Display for SampleWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<BitDepth> for SampleWidth {
    fn from(depth: BitDepth) -> Self {
        depth.storage()
    }
}
