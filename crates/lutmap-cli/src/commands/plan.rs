//! Plan command: resolve a configuration and print it

use crate::PlanArgs;
use anyhow::{Context, Result};
use lutmap_ops::{resolve, ApplyOptions};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: PlanArgs, verbose: u8) -> Result<()> {
    let text = describe(&args)?;
    if verbose > 0 {
        println!("{} source clip(s), LUT {}", args.src.len(), args.lut);
    }
    println!("{text}");
    Ok(())
}

fn describe(args: &PlanArgs) -> Result<String> {
    let mode = super::parse_mode(args.mode)?;
    let options = ApplyOptions::default().with_in_place(!args.no_in_place);
    let config = resolve(mode, &args.src, &args.lut, &options)
        .with_context(|| format!("Cannot apply {} LUT in {mode}", args.lut))?;
    Ok(config.to_string())
}
