//! Headerless raw frame files.
//!
//! A raw file holds whole frames back to back. Each frame is its planes in
//! order, each plane its rows top to bottom (packed formats keep their
//! bottom-up row order), each sample little-endian in its storage width.

use anyhow::{bail, Context, Result};
use lutmap_core::{Clip, Error, Frame, FrameFormat, Plane, SampleBuf};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// A raw file path with the format of its frames (`path@pixeltype:WxH`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSpec {
    /// File path
    pub path: PathBuf,
    /// Format of every frame in the file
    pub format: FrameFormat,
}

impl FromStr for RawSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (path, format) = s
            .rsplit_once('@')
            .ok_or_else(|| format!("expected path@pixeltype:WxH, got '{s}'"))?;
        if path.is_empty() {
            return Err(format!("missing path in '{s}'"));
        }
        let format = format.parse::<FrameFormat>().map_err(|e| e.to_string())?;
        Ok(Self {
            path: PathBuf::from(path),
            format,
        })
    }
}

/// Bytes one frame of `format` occupies on disk.
pub fn frame_bytes(format: &FrameFormat) -> usize {
    format.frame_samples() * format.bit_depth().bytes_per_sample()
}

/// File-backed clip reading frames on demand.
///
/// Every fetched frame is freshly read, so it is exclusively owned and may
/// be overwritten by the LUT filter.
#[derive(Debug)]
pub struct RawClip {
    path: PathBuf,
    format: FrameFormat,
    num_frames: usize,
}

impl RawClip {
    /// Opens a raw file; its length must be a whole number of frames.
    pub fn open(spec: &RawSpec) -> Result<Self> {
        let len = std::fs::metadata(&spec.path)
            .with_context(|| format!("Failed to open: {}", spec.path.display()))?
            .len() as usize;
        let size = frame_bytes(&spec.format);
        if len == 0 || len % size != 0 {
            bail!(
                "{} holds {len} bytes, not a whole number of {} frames ({size} bytes each)",
                spec.path.display(),
                spec.format
            );
        }
        debug!(path = %spec.path.display(), format = %spec.format, frames = len / size, "opened raw clip");
        Ok(Self {
            path: spec.path.clone(),
            format: spec.format,
            num_frames: len / size,
        })
    }

    /// File this clip reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clip for RawClip {
    fn format(&self) -> &FrameFormat {
        &self.format
    }

    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn frame(&self, n: usize) -> lutmap_core::Result<Frame> {
        if n >= self.num_frames {
            return Err(Error::FrameOutOfRange {
                index: n,
                count: self.num_frames,
            });
        }
        let size = frame_bytes(&self.format);
        let mut bytes = vec![0u8; size];
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start((n * size) as u64))?;
        file.read_exact(&mut bytes)?;
        trace!(frame = n, path = %self.path.display(), "read raw frame");
        decode_frame(self.format, &bytes)
    }
}

/// Splits one frame's bytes into planes.
pub fn decode_frame(format: FrameFormat, bytes: &[u8]) -> lutmap_core::Result<Frame> {
    let width = format.bit_depth().storage();
    let bps = format.bit_depth().bytes_per_sample();
    let mut planes = Vec::with_capacity(format.plane_count());
    let mut offset = 0;
    for p in 0..format.plane_count() {
        let row = format.plane_row_samples(p);
        let height = format.plane_height(p) as usize;
        let len = row * height * bps;
        let chunk = bytes.get(offset..offset + len).ok_or(Error::BufferSize {
            expected: offset + len,
            got: bytes.len(),
        })?;
        let data = SampleBuf::from_le_bytes(width, chunk).ok_or(Error::BufferSize {
            expected: len,
            got: chunk.len(),
        })?;
        planes.push(Plane::from_buf(row, height, data)?);
        offset += len;
    }
    Frame::from_planes(format, planes)
}

/// Writes one frame in raw layout. Row padding is dropped.
pub fn write_frame<W: Write>(writer: &mut W, frame: &Frame) -> std::io::Result<()> {
    for plane in frame.planes() {
        writer.write_all(&plane.to_le_bytes())?;
    }
    Ok(())
}
