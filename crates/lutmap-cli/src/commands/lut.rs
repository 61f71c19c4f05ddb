//! LUT generation command

use super::raw::write_frame;
use crate::LutArgs;
use anyhow::{Context, Result};
use lutmap_core::{BitDepth, ColorFamily};
use lutmap_lut::{AxisAssignment, Lut, LutSpec};
use std::fs::File;
use std::io::{BufWriter, Write};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: LutArgs, verbose: u8) -> Result<()> {
    let lut = build(&args)?;

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    write_frame(&mut writer, lut.frame())
        .and_then(|_| writer.flush())
        .with_context(|| format!("Failed to write: {}", args.output.display()))?;

    info!(path = %args.output.display(), format = %lut.frame().format(), "wrote LUT");
    // the format string is what `apply --lut path@...` expects
    println!("{}@{}", args.output.display(), lut.frame().format());
    if verbose > 0 {
        println!(
            "{}D table, {} entries per channel, {} channel(s)",
            lut.dimensions(),
            super::format_samples(lut.width()),
            lut.channels()
        );
    }
    Ok(())
}

fn build(args: &LutArgs) -> Result<Lut> {
    let planes: ColorFamily = args.planes.parse()?;
    let depth = BitDepth::from_bits(args.bit_depth)
        .with_context(|| format!("Invalid --bit-depth {}", args.bit_depth))?;
    let axes = AxisAssignment::from_selector(args.dimensions, args.axis)?;
    let lut = LutSpec::new(planes, depth, args.dimensions)
        .with_axes(axes)
        .packed(args.packed)
        .generate()?;
    Ok(lut)
}
