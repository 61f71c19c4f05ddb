//! Frame providers.
//!
//! A [`Clip`] hands out frames by temporal index. Filters consume clips
//! and are clips themselves, so they chain. Implementations must be safe
//! to query concurrently for independent frame indices.
//!
//! Ownership matters to consumers: a frame returned by [`Clip::frame`] that
//! reports [`Frame::is_exclusive`] may be overwritten by the caller. Clips
//! that keep frames around ([`StaticClip`], [`FrameListClip`]) hand out
//! shared handles; [`FnClip`] builds a fresh frame on every call.

use crate::{Error, Frame, FrameFormat, Result};

/// A sequence of frames sharing one format.
pub trait Clip: Send + Sync {
    /// Format of every frame.
    fn format(&self) -> &FrameFormat;

    /// Number of frames.
    fn num_frames(&self) -> usize;

    /// Fetches frame `n`.
    fn frame(&self, n: usize) -> Result<Frame>;
}

fn check_index(n: usize, count: usize) -> Result<()> {
    if n >= count {
        return Err(Error::FrameOutOfRange { index: n, count });
    }
    Ok(())
}

/// One frame repeated `num_frames` times.
#[derive(Debug, Clone)]
pub struct StaticClip {
    frame: Frame,
    num_frames: usize,
}

impl StaticClip {
    /// Repeats `frame` for `num_frames` frames.
    pub fn new(frame: Frame, num_frames: usize) -> Self {
        Self { frame, num_frames }
    }

    /// Single-frame clip.
    pub fn single(frame: Frame) -> Self {
        Self::new(frame, 1)
    }
}

impl Clip for StaticClip {
    fn format(&self) -> &FrameFormat {
        self.frame.format()
    }

    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn frame(&self, n: usize) -> Result<Frame> {
        check_index(n, self.num_frames)?;
        Ok(self.frame.clone())
    }
}

/// In-memory frame sequence.
#[derive(Debug, Clone)]
pub struct FrameListClip {
    format: FrameFormat,
    frames: Vec<Frame>,
}

impl FrameListClip {
    /// Wraps `frames`; all of them must share one format.
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        let first = frames
            .first()
            .ok_or_else(|| Error::other("frame list clip needs at least one frame"))?;
        let format = *first.format();
        if let Some(bad) = frames.iter().find(|f| *f.format() != format) {
            return Err(Error::other(format!(
                "frame list mixes formats {format} and {}",
                bad.format()
            )));
        }
        Ok(Self { format, frames })
    }
}

impl Clip for FrameListClip {
    fn format(&self) -> &FrameFormat {
        &self.format
    }

    fn num_frames(&self) -> usize {
        self.frames.len()
    }

    fn frame(&self, n: usize) -> Result<Frame> {
        check_index(n, self.frames.len())?;
        Ok(self.frames[n].clone())
    }
}

/// Clip whose frames are rendered on demand by a closure.
///
/// ```rust
/// use lutmap_core::{Clip, FnClip, Frame, FrameFormat};
///
/// let fmt: FrameFormat = "y8:4x4".parse().unwrap();
/// let clip = FnClip::new(fmt, 10, move |n| {
///     let mut f = Frame::new(fmt);
///     f.set_sample(0, 0, 0, n as u32);
///     Ok(f)
/// });
/// let f = clip.frame(3).unwrap();
/// assert_eq!(f.sample(0, 0, 0), Some(3));
/// assert!(f.is_exclusive());
/// ```
pub struct FnClip<F> {
    format: FrameFormat,
    num_frames: usize,
    render: F,
}

impl<F> FnClip<F>
where
    F: Fn(usize) -> Result<Frame> + Send + Sync,
{
    /// Creates a clip of `num_frames` frames rendered by `render`.
    pub fn new(format: FrameFormat, num_frames: usize, render: F) -> Self {
        Self {
            format,
            num_frames,
            render,
        }
    }
}

impl<F> Clip for FnClip<F>
where
    F: Fn(usize) -> Result<Frame> + Send + Sync,
{
    fn format(&self) -> &FrameFormat {
        &self.format
    }

    fn num_frames(&self) -> usize {
        self.num_frames
    }

    fn frame(&self, n: usize) -> Result<Frame> {
        check_index(n, self.num_frames)?;
        let frame = (self.render)(n)?;
        if frame.format() != &self.format {
            return Err(Error::other(format!(
                "rendered frame {n} has format {}, clip declares {}",
                frame.format(),
                self.format
            )));
        }
        Ok(frame)
    }
}

impl<F> std::fmt::Debug for FnClip<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnClip")
            .field("format", &self.format)
            .field("num_frames", &self.num_frames)
            .finish_non_exhaustive()
    }
}
