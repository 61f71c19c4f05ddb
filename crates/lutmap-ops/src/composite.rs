//! Index composition.
//!
//! Samples are combined as digits of a base-`2^bits` number, first sample
//! least significant:
//!
//! ```text
//! index = s0 + (s1 << bits) + (s2 << 2*bits)
//! ```
//!
//! This inverts the digit layout of generated coordinate LUTs. Each sample
//! is masked to `bits` first, so the index never leaves `[0, 2^(bits*n))`
//! even when a 10..14-bit buffer carries stray high bits.

/// Composes any number of samples (1..=3 in practice).
///
/// ```rust
/// use lutmap_ops::composite::composite;
///
/// assert_eq!(composite(&[0xef, 0xcd, 0xab], 8), 0xabcdef);
/// assert_eq!(composite(&[255, 255], 8), 65535);
/// ```
pub fn composite(samples: &[u32], bits: u32) -> usize {
    let mask = (1u32 << bits) - 1;
    samples
        .iter()
        .rev()
        .fold(0usize, |acc, &s| (acc << bits) + (s & mask) as usize)
}

/// Single-sample index.
#[inline]
pub fn composite1(a: u32, mask: u32) -> usize {
    (a & mask) as usize
}

/// Two-sample index.
#[inline]
pub fn composite2(a: u32, b: u32, bits: u32, mask: u32) -> usize {
    (a & mask) as usize + (((b & mask) as usize) << bits)
}

/// Three-sample index.
#[inline]
pub fn composite3(a: u32, b: u32, c: u32, bits: u32, mask: u32) -> usize {
    (a & mask) as usize + (((b & mask) as usize) << bits) + (((c & mask) as usize) << (2 * bits))
}
