//! Integration tests for lutmap crates.
//!
//! This crate contains end-to-end tests that exercise LUT generation,
//! configuration resolving and frame mapping together.

#[cfg(test)]
mod tests {
    use lutmap_core::{BitDepth, Clip, ColorFamily, Error, FnClip, Frame, FrameFormat, StaticClip};
    use lutmap_lut::{AxisAssignment, Lut, LutSpec};
    use lutmap_ops::composite::composite;
    use lutmap_ops::{resolve, ApplyLut, ApplyOptions, Mode};
    use std::sync::Arc;

    fn ff(s: &str) -> FrameFormat {
        s.parse().unwrap()
    }

    /// Deterministic pseudo-random fill, masked to the frame's bit depth.
    fn noise(format: FrameFormat, seed: u32) -> Frame {
        let mut frame = Frame::new(format);
        let max = format.bit_depth().max_value();
        let mut state = seed | 1;
        for p in 0..frame.plane_count() {
            for y in 0..format.plane_height(p) as usize {
                for x in 0..format.plane_row_samples(p) {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    frame.set_sample(p, x, y, state & max);
                }
            }
        }
        frame
    }

    fn clip(frame: Frame) -> Arc<dyn Clip> {
        Arc::new(StaticClip::single(frame))
    }

    fn apply(mode: Mode, sources: Vec<Frame>, lut: &dyn Clip) -> Frame {
        let clips = sources.into_iter().map(clip).collect();
        ApplyLut::new(mode, clips, lut, ApplyOptions::default())
            .unwrap()
            .frame(0)
            .unwrap()
    }

    #[test]
    fn test_digit_round_trip_3d() {
        let lut = Lut::generate(ColorFamily::Rgb, BitDepth::U8, 3, AxisAssignment::PerPlane).unwrap();
        assert_eq!(lut.width(), 1 << 24);
        let frame = lut.frame();
        let p0 = frame.plane(0).unwrap().samples::<u8>().unwrap();
        let p1 = frame.plane(1).unwrap().samples::<u8>().unwrap();
        let p2 = frame.plane(2).unwrap().samples::<u8>().unwrap();
        for x in 0..(1usize << 24) {
            let index = composite(&[p0[x] as u32, p1[x] as u32, p2[x] as u32], 8);
            assert_eq!(index, x, "digits at {x} do not compose back");
        }
    }

    #[test]
    fn test_digit_round_trip_2d_high_depth() {
        let lo = Lut::generate(ColorFamily::Gray, BitDepth::U12, 2, AxisAssignment::Digit(0)).unwrap();
        let hi = Lut::generate(ColorFamily::Gray, BitDepth::U12, 2, AxisAssignment::Digit(1)).unwrap();
        for x in (0..lo.width()).step_by(4099) {
            let digits = [lo.value(0, x).unwrap(), hi.value(0, x).unwrap()];
            assert_eq!(composite(&digits, 12), x);
        }
    }

    #[test]
    fn test_identity_every_depth() {
        for bits in [8u32, 10, 12, 14, 16] {
            let format = ff(&format!("y{bits}:37x11"));
            let src = noise(format, bits);
            let lut = Lut::from_selector("Y", 1, bits, 1).unwrap();
            assert_eq!(apply(Mode::Map1D, vec![src.clone()], &lut), src, "{bits}-bit");
        }
    }

    #[test]
    fn test_identity_yuv420_planes() {
        let format = ff("yuv420p10:64x36");
        let src = noise(format, 7);
        let lut = Lut::from_selector("YUV", 1, 10, 1).unwrap();
        assert_eq!(apply(Mode::Map1D, vec![src.clone()], &lut), src);
    }

    #[test]
    fn test_index_bound_arity_two() {
        assert_eq!(composite(&[255, 255], 8), 65535);
        assert_eq!(composite(&[0, 0], 8), 0);

        // mode 3 end to end: the extreme samples land on the last entry
        let a = Frame::from_planes(
            ff("y8:2x1"),
            vec![lutmap_core::Plane::from_vec(2, 1, vec![0u8, 255]).unwrap()],
        )
        .unwrap();
        let mut lut = Frame::new(ff("y8:65536"));
        lut.set_sample(0, 65535, 0, 42);
        lut.set_sample(0, 0, 0, 7);
        let out = apply(Mode::Map2D, vec![a.clone(), a], &StaticClip::single(lut));
        assert_eq!(out.sample(0, 0, 0), Some(7));
        assert_eq!(out.sample(0, 1, 0), Some(42));
    }

    #[test]
    fn test_rejected_configurations() {
        let options = ApplyOptions::default();

        let err = resolve(Mode::Expand1D, &[ff("y8:16x16")], &ff("y8:256"), &options).unwrap_err();
        assert!(err.is_unsupported_colorspace(), "{err}");

        let err = resolve(Mode::Map1D, &[ff("y8:16x16")], &ff("y8:65536"), &options).unwrap_err();
        assert!(err.is_configuration(), "{err}");
        assert!(err.to_string().contains("1D"), "{err}");
    }

    #[test]
    fn test_subsampling_derivation() {
        let options = ApplyOptions::default();
        let lut = ff("yuv444p8:256");

        let luma = ff("y8:1440x1080");
        let chroma = ff("y8:720x540");
        let cfg = resolve(Mode::Map1D, &[luma, chroma, chroma], &lut, &options).unwrap();
        let sub = cfg.output().pixel_type().subsampling();
        assert_eq!((sub.horizontal(), sub.vertical()), (2, 2));

        let chroma = ff("y8:480x1080");
        let err = resolve(Mode::Map1D, &[luma, chroma, chroma], &lut, &options).unwrap_err();
        assert!(err.is_format_mismatch(), "{err}");
    }

    #[test]
    fn test_subsampled_planes_read_pixel_for_pixel() {
        let luma = noise(ff("y8:16x8"), 3);
        let u = noise(ff("y8:8x4"), 5);
        let v = noise(ff("y8:8x4"), 9);
        let lut = Lut::from_selector("YUV", 1, 8, 1).unwrap();
        let out = apply(Mode::Map1D, vec![luma.clone(), u.clone(), v.clone()], &lut);
        assert_eq!(out.format(), &ff("yuv420p8:16x8"));
        assert_eq!(out.plane(0).unwrap(), luma.plane(0).unwrap());
        assert_eq!(out.plane(1).unwrap(), u.plane(0).unwrap());
        assert_eq!(out.plane(2).unwrap(), v.plane(0).unwrap());
    }

    #[test]
    fn test_packed_destination_order() {
        let src = noise(ff("y8:4x2"), 11);

        let mut planar = Frame::new(ff("rgbp8:256"));
        for s in 0..256u32 {
            planar.set_sample(0, s as usize, 0, s);
            planar.set_sample(1, s as usize, 0, 255 - s);
            planar.set_sample(2, s as usize, 0, s / 2);
        }
        let lut = planar.to_packed().unwrap();
        let out = apply(Mode::Expand1D, vec![src.clone()], &StaticClip::single(lut.clone()));
        assert_eq!(out.format(), &ff("rgb24:4x2"));

        let table = lut.plane(0).unwrap().samples::<u8>().unwrap();
        let first_written = out.plane(0).unwrap().row::<u8>(0).unwrap();
        for x in 0..4 {
            let s = src.sample(0, x, 1).unwrap() as usize;
            assert_eq!(&first_written[x * 3..x * 3 + 3], &table[s * 3..s * 3 + 3]);
            // memory order is B, G, R
            assert_eq!(first_written[x * 3] as usize, s / 2);
            assert_eq!(first_written[x * 3 + 2] as usize, s);
        }
    }

    #[test]
    fn test_expand_2d_shares_index() {
        let a = noise(ff("y10:32x4"), 21);
        let b = noise(ff("y10:32x4"), 23);
        let lut = LutSpec::new(ColorFamily::Rgb, BitDepth::U10, 2)
            .with_axes(AxisAssignment::Digit(1))
            .generate()
            .unwrap();
        let out = apply(Mode::Expand2D, vec![a, b.clone()], &lut);
        assert_eq!(out.format(), &ff("rgbp10:32x4"));
        for p in 0..3 {
            assert_eq!(out.plane(p).unwrap(), b.plane(0).unwrap());
        }
    }

    #[test]
    fn test_lut_depth_becomes_output_depth() {
        let src = noise(ff("y8:8x8"), 31);
        let mut lut = Frame::new(ff("y16:256"));
        for s in 0..256 {
            lut.set_sample(0, s, 0, (s as u32) << 8);
        }
        let out = apply(Mode::Map1D, vec![src.clone()], &StaticClip::single(lut));
        assert_eq!(out.format(), &ff("y16:8x8"));
        assert_eq!(out.sample(0, 5, 6), src.sample(0, 5, 6).map(|v| v << 8));
    }

    #[test]
    fn test_concurrent_frames() {
        let format = ff("yuv444p12:48x16");
        let clip: Arc<dyn Clip> = Arc::new(FnClip::new(format, 16, move |n| Ok(noise(format, n as u32 + 1))));
        let mut inv = Frame::new(ff("yuv444p12:4096"));
        for p in 0..3 {
            for s in 0..4096 {
                inv.set_sample(p, s, 0, 4095 - s as u32);
            }
        }
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &StaticClip::single(inv), ApplyOptions::default()).unwrap();

        std::thread::scope(|scope| {
            for t in 0..4 {
                let filter = &filter;
                scope.spawn(move || {
                    for n in (t..16).step_by(4) {
                        let out = filter.frame(n).unwrap();
                        let src = noise(format, n as u32 + 1);
                        assert_eq!(out.sample(2, 47, 15).unwrap(), 4095 - src.sample(2, 47, 15).unwrap());
                    }
                });
            }
        });
    }

    #[test]
    fn test_provider_error_passes_through() {
        let format = ff("y8:4x4");
        let clip: Arc<dyn Clip> = Arc::new(FnClip::new(format, 2, |_| Err(Error::other("disk gone"))));
        let lut = Lut::from_selector("Y", 1, 8, 1).unwrap();
        let filter = ApplyLut::new(Mode::Map1D, vec![clip], &lut, ApplyOptions::default()).unwrap();
        assert!(matches!(filter.frame(1), Err(Error::Other(msg)) if msg == "disk gone"));
    }
}
