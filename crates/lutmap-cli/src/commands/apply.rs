//! LUT application command

use super::raw::{write_frame, RawClip};
use crate::ApplyArgs;
use anyhow::{Context, Result};
use lutmap_core::Clip;
use lutmap_ops::{ApplyLut, ApplyOptions};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::time::Instant;
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: ApplyArgs, verbose: u8) -> Result<()> {
    let mode = super::parse_mode(args.mode)?;
    let sources = args
        .src
        .iter()
        .map(|spec| RawClip::open(spec).map(|c| Arc::new(c) as Arc<dyn Clip>))
        .collect::<Result<Vec<_>>>()?;
    let lut = RawClip::open(&args.lut)?;
    let options = ApplyOptions::default().with_in_place(!args.no_in_place);

    let filter = ApplyLut::new(mode, sources, &lut, options)
        .with_context(|| format!("Cannot apply {} in {mode}", lut.path().display()))?;
    if verbose > 0 {
        println!("{}", filter.config());
    }

    let count = args.frames.map_or(filter.num_frames(), |n| n.min(filter.num_frames()));
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);

    let start = Instant::now();
    for n in 0..count {
        let frame = filter
            .frame(n)
            .with_context(|| format!("Failed to process frame {n}"))?;
        write_frame(&mut writer, &frame)
            .with_context(|| format!("Failed to write: {}", args.output.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    info!(frames = count, elapsed = ?start.elapsed(), "applied LUT");
    if verbose > 0 {
        println!(
            "Wrote {count} frame(s) of {} to {}",
            filter.format(),
            args.output.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::raw::RawSpec;
    use lutmap_core::{Frame, FrameFormat};
    use std::path::Path;
    use tempfile::tempdir;

    fn ff(s: &str) -> FrameFormat {
        s.parse().unwrap()
    }

    fn write_clip(path: &Path, frames: &[Frame]) {
        let mut file = File::create(path).unwrap();
        for f in frames {
            write_frame(&mut file, f).unwrap();
        }
    }

    fn spec(path: &Path, format: &str) -> RawSpec {
        RawSpec {
            path: path.to_path_buf(),
            format: ff(format),
        }
    }

    #[test]
    fn test_apply_inverting_lut() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("in.y");
        let lut_path = dir.path().join("inv.raw");
        let out_path = dir.path().join("out.y");

        let frames: Vec<Frame> = (0..3u32)
            .map(|n| {
                let mut f = Frame::new(ff("y10:4x2"));
                f.set_sample(0, 1, 1, 100 * n);
                f
            })
            .collect();
        write_clip(&src_path, &frames);

        let mut lut = Frame::new(ff("y10:1024"));
        for x in 0..1024 {
            lut.set_sample(0, x, 0, 1023 - x as u32);
        }
        write_clip(&lut_path, &[lut]);

        let args = ApplyArgs {
            mode: 1,
            src: vec![spec(&src_path, "y10:4x2")],
            lut: spec(&lut_path, "y10:1024"),
            output: out_path.clone(),
            frames: Some(2),
            no_in_place: false,
        };
        run(args, 0).unwrap();

        let out = RawClip::open(&spec(&out_path, "y10:4x2")).unwrap();
        assert_eq!(out.num_frames(), 2);
        let f = out.frame(1).unwrap();
        assert_eq!(f.sample(0, 1, 1), Some(923));
        assert_eq!(f.sample(0, 0, 0), Some(1023));
    }

    #[test]
    fn test_apply_rejects_mismatched_lut() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("in.y");
        let lut_path = dir.path().join("lut.raw");
        write_clip(&src_path, &[Frame::new(ff("y8:4x4"))]);
        write_clip(&lut_path, &[Frame::new(ff("y8:300"))]);

        let args = ApplyArgs {
            mode: 1,
            src: vec![spec(&src_path, "y8:4x4")],
            lut: spec(&lut_path, "y8:300"),
            output: dir.path().join("out.y"),
            frames: None,
            no_in_place: true,
        };
        let err = run(args, 0).unwrap_err();
        assert!(err.downcast_ref::<lutmap_ops::ApplyError>().is_some_and(|e| e.is_configuration()));
    }
}
