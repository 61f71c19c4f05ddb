//! The LUT application filter.
//!
//! [`ApplyLut`] resolves its configuration once, on construction, and is a
//! [`Clip`] itself: each requested frame fetches the source frames, picks
//! a destination and runs the stored write routine.
//!
//! # Destination choice
//!
//! When in-place writes are enabled and the resolver found candidate clips,
//! the first candidate whose fetched frame reports
//! [`Frame::is_exclusive`] becomes the destination. Exclusivity is taken
//! from the frame's reference counts as reported at fetch time; nothing
//! else is checked. Otherwise a fresh zeroed frame is allocated, in which
//! case an unmapped alpha plane stays zero.

use crate::mapper::MapJob;
use crate::{resolve, ApplyError, ApplyOptions, ApplyResult, Mode, ResolvedConfig};
use lutmap_core::{Clip, Error, Frame, FrameFormat, Result};
use std::sync::Arc;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Applies a LUT to one to three source clips.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use lutmap_core::{BitDepth, Clip, ColorFamily, Frame, StaticClip};
/// use lutmap_lut::{AxisAssignment, Lut};
/// use lutmap_ops::{ApplyLut, ApplyOptions, Mode};
///
/// let mut src = Frame::new("y10:16x16".parse().unwrap());
/// src.set_sample(0, 3, 3, 1000);
/// let clip: Arc<dyn Clip> = Arc::new(StaticClip::single(src));
///
/// let lut = Lut::generate(ColorFamily::Gray, BitDepth::U10, 1, AxisAssignment::Digit(0)).unwrap();
/// let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap();
///
/// let out = filter.frame(0).unwrap();
/// assert_eq!(out.sample(0, 3, 3), Some(1000));
/// ```
pub struct ApplyLut {
    sources: Vec<Arc<dyn Clip>>,
    lut: Frame,
    config: ResolvedConfig,
}

impl ApplyLut {
    /// Resolves the configuration and fetches the LUT frame.
    ///
    /// # Errors
    ///
    /// Any [`resolve`] error, or a [`ApplyError::Core`] error when the LUT
    /// clip cannot produce its frame.
    pub fn new(
        mode: Mode,
        sources: Vec<Arc<dyn Clip>>,
        lut: &dyn Clip,
        options: ApplyOptions,
    ) -> ApplyResult<Self> {
        let formats: Vec<FrameFormat> = sources.iter().map(|c| *c.format()).collect();
        let config = resolve(mode, &formats, lut.format(), &options)?;

        let lut_frame = lut.frame(0)?;
        if lut_frame.format() != lut.format() {
            return Err(ApplyError::mismatch(format!(
                "LUT clip declares {} but produced a {} frame",
                lut.format(),
                lut_frame.format()
            )));
        }

        debug!(
            mode = mode.number(),
            sources = sources.len(),
            lut = %lut.format(),
            output = %config.output(),
            "created LUT filter"
        );
        Ok(Self {
            sources,
            lut: lut_frame,
            config,
        })
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The LUT frame in use.
    pub fn lut(&self) -> &Frame {
        &self.lut
    }

    fn run(&self, sources: &[Option<&Frame>], dst: &mut Frame) -> Result<()> {
        let job = MapJob {
            planes: self.config.planes(),
            bits: self.config.source_depth().bits(),
            lut: &self.lut,
            sources,
        };
        (self.config.routine().func())(&job, dst)
    }
}

impl Clip for ApplyLut {
    fn format(&self) -> &FrameFormat {
        self.config.output()
    }

    fn num_frames(&self) -> usize {
        self.sources.first().map_or(0, |c| c.num_frames())
    }

    fn frame(&self, n: usize) -> Result<Frame> {
        let mut frames = self
            .sources
            .iter()
            .map(|c| c.frame(n))
            .collect::<Result<Vec<_>>>()?;
        for (i, (clip, frame)) in self.sources.iter().zip(&frames).enumerate() {
            if frame.format() != clip.format() {
                return Err(Error::other(format!(
                    "source clip {i} declares {} but produced a {} frame at {n}",
                    clip.format(),
                    frame.format()
                )));
            }
        }

        let target = self
            .config
            .in_place_candidates()
            .iter()
            .copied()
            .find(|&c| frames[c].is_exclusive());
        trace!(frame = n, in_place = ?target, "applying LUT");

        match target {
            Some(c) => {
                {
                    let (before, rest) = frames.split_at_mut(c);
                    let (dst, after) = rest
                        .split_first_mut()
                        .ok_or_else(|| Error::other(format!("in-place clip {c} out of range")))?;
                    let sources: Vec<Option<&Frame>> = before
                        .iter()
                        .map(Some)
                        .chain(std::iter::once(None))
                        .chain(after.iter().map(Some))
                        .collect();
                    self.run(&sources, dst)?;
                }
                Ok(frames.swap_remove(c))
            }
            None => {
                let mut dst = Frame::new(*self.config.output());
                let sources: Vec<Option<&Frame>> = frames.iter().map(Some).collect();
                self.run(&sources, &mut dst)?;
                Ok(dst)
            }
        }
    }
}

impl std::fmt::Debug for ApplyLut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyLut")
            .field("sources", &self.sources.len())
            .field("lut", self.lut.format())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lutmap_core::{FnClip, Plane, StaticClip};
    use lutmap_lut::{AxisAssignment, Lut};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ff(s: &str) -> FrameFormat {
        s.parse().unwrap()
    }

    fn gradient(format: FrameFormat) -> Frame {
        let mut f = Frame::new(format);
        let max = format.bit_depth().max_value();
        for p in 0..f.plane_count() {
            let (w, h) = (format.plane_width(p) as usize, format.plane_height(p) as usize);
            for y in 0..h {
                for x in 0..w {
                    f.set_sample(p, x, y, ((x * 7 + y * 13 + p * 5) as u32) & max);
                }
            }
        }
        f
    }

    fn identity_lut(bits: u32) -> Lut {
        Lut::from_selector("Y", 1, bits, 1).unwrap()
    }

    #[test]
    fn test_identity_mode1() {
        let src = gradient(ff("y12:32x8"));
        let clip: Arc<dyn Clip> = Arc::new(StaticClip::single(src.clone()));
        let lut = identity_lut(12);
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap();
        assert_eq!(filter.frame(0).unwrap(), src);
    }

    #[test]
    fn test_shared_frames_are_not_overwritten() {
        let src = gradient(ff("y8:8x8"));
        let static_clip = Arc::new(StaticClip::new(src.clone(), 2));
        let clip: Arc<dyn Clip> = static_clip.clone();
        let mut lut = identity_lut(8).into_frame();
        for x in 0..256 {
            lut.set_sample(0, x, 0, 255 - x as u32);
        }
        let lut = StaticClip::single(lut);
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap();
        assert_eq!(filter.config().in_place_candidates(), &[0]);

        let out = filter.frame(1).unwrap();
        assert_eq!(out.sample(0, 0, 0), Some(255));
        // the clip's own frame still holds the original samples
        assert_eq!(static_clip.frame(0).unwrap(), src);
    }

    #[test]
    fn test_exclusive_frames_are_reused() {
        let fmt = ff("y8:4x4");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let clip: Arc<dyn Clip> = Arc::new(FnClip::new(fmt, 3, move |n| {
            counter.fetch_add(1, Ordering::SeqCst);
            let mut f = Frame::new(fmt);
            f.set_sample(0, 0, 0, n as u32);
            Ok(f)
        }));
        let mut lut = Frame::new(ff("y8:256"));
        for x in 0..256 {
            lut.set_sample(0, x, 0, (x as u32 + 100) & 0xff);
        }
        let lut = StaticClip::single(lut);
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap();
        let out = filter.frame(2).unwrap();
        assert_eq!(out.sample(0, 0, 0), Some(102));
        assert_eq!(out.sample(0, 1, 0), Some(100));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    fn yuva_source() -> Arc<dyn Clip> {
        let fmt = ff("yuva444p8:4x2");
        Arc::new(FnClip::new(fmt, 1, move |_| {
            let mut f = Frame::new(fmt);
            for y in 0..2 {
                for x in 0..4 {
                    for p in 0..3 {
                        f.set_sample(p, x, y, (10 * p + x + 4 * y) as u32);
                    }
                    f.set_sample(3, x, y, (77 + x + 4 * y) as u32);
                }
            }
            Ok(f)
        }))
    }

    fn yuva_invert_lut() -> StaticClip {
        let mut lut = Frame::new(ff("yuva444p8:256"));
        for s in 0..256 {
            for p in 0..3 {
                lut.set_sample(p, s, 0, 255 - s as u32);
            }
            lut.set_sample(3, s, 0, 5);
        }
        StaticClip::single(lut)
    }

    #[test]
    fn test_in_place_keeps_source_alpha() {
        let lut = yuva_invert_lut();
        let filter = ApplyLut::new(Mode::Map1D, vec![yuva_source()], &lut, ApplyOptions::default()).unwrap();
        assert_eq!(filter.config().in_place_candidates(), &[0]);

        let out = filter.frame(0).unwrap();
        assert_eq!(out.format(), &ff("yuva444p8:4x2"));
        assert_eq!(out.sample(0, 1, 0), Some(254));
        assert_eq!(out.sample(2, 3, 1), Some(255 - 27));
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(out.sample(3, x, y), Some((77 + x + 4 * y) as u32));
            }
        }
    }

    #[test]
    fn test_fresh_destination_alpha_is_zero() {
        let lut = yuva_invert_lut();
        let options = ApplyOptions::default().with_in_place(false);
        let filter = ApplyLut::new(Mode::Map1D, vec![yuva_source()], &lut, options).unwrap();
        let out = filter.frame(0).unwrap();
        assert_eq!(out.sample(0, 1, 0), Some(254));
        assert!(out.plane(3).unwrap().samples::<u8>().unwrap().iter().all(|&a| a == 0));
    }

    #[test]
    fn test_in_place_disabled_still_correct() {
        let fmt = ff("yuv444p8:4x4");
        let clip: Arc<dyn Clip> = Arc::new(FnClip::new(fmt, 1, move |_| Ok(gradient(fmt))));
        let lut = Lut::from_selector("YUV", 1, 8, 1).unwrap();
        let options = ApplyOptions::default().with_in_place(false);
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, options).unwrap();
        assert!(filter.config().in_place_candidates().is_empty());
        assert_eq!(filter.frame(0).unwrap(), gradient(fmt));
    }

    #[test]
    fn test_mode3_in_place_second_clip_intact() {
        let fmt = ff("y8:4x1");
        let a: Arc<dyn Clip> = Arc::new(FnClip::new(fmt, 1, move |_| {
            Frame::from_planes(fmt, vec![Plane::from_vec(4, 1, vec![1u8, 2, 3, 4])?])
        }));
        let b: Arc<dyn Clip> = Arc::new(FnClip::new(fmt, 1, move |_| {
            Frame::from_planes(fmt, vec![Plane::from_vec(4, 1, vec![10u8, 20, 30, 40])?])
        }));
        // high digit table: output = second sample
        let lut = Lut::generate(lutmap_core::ColorFamily::Gray, lutmap_core::BitDepth::U8, 2, AxisAssignment::Digit(1)).unwrap();
        let filter = ApplyLut::new(Mode::Map2D, vec![a, b], &lut, ApplyOptions::default()).unwrap();
        let out = filter.frame(0).unwrap();
        assert_eq!(out.plane(0).unwrap().samples::<u8>().unwrap(), &[10, 20, 30, 40]);
    }

    #[test]
    fn test_source_errors_propagate_unchanged() {
        let fmt = ff("y8:4x4");
        let clip: Arc<dyn Clip> = Arc::new(FnClip::new(fmt, 5, |n| {
            Err(Error::other(format!("decode failed at {n}")))
        }));
        let lut = identity_lut(8);
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap();
        let err = filter.frame(4).unwrap_err();
        assert_eq!(err.to_string(), "decode failed at 4");
        assert!(matches!(filter.frame(5), Err(Error::FrameOutOfRange { .. })));
    }

    #[test]
    fn test_configuration_error_before_any_fetch() {
        let fmt = ff("y8:4x4");
        let clip: Arc<dyn Clip> = Arc::new(FnClip::new(fmt, 1, |_| -> Result<Frame> {
            panic!("frames must not be fetched for a rejected configuration")
        }));
        let lut = identity_lut(8);
        let err = ApplyLut::new(Mode::Map2D, vec![clip], &lut, ApplyOptions::default()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_filters_chain() {
        let src = gradient(ff("y8:8x2"));
        let clip: Arc<dyn Clip> = Arc::new(StaticClip::new(src.clone(), 4));
        let lut = identity_lut(8);
        let first: Arc<dyn Clip> =
            Arc::new(ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap());
        let second = ApplyLut::new(Mode::Map1D, vec![first], &lut, ApplyOptions::default()).unwrap();
        assert_eq!(second.num_frames(), 4);
        assert_eq!(second.frame(3).unwrap(), src);
    }
}
