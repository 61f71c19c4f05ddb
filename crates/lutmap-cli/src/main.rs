//! lutmap - N-dimensional LUT tool for raw planar video
//!
//! Generates identity LUTs, prints resolved application plans and streams
//! raw frames through a LUT.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use lutmap_core::FrameFormat;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::raw::RawSpec;

#[derive(Parser)]
#[command(name = "lutmap")]
#[command(author, version, about = "N-dimensional LUT tool for raw planar video")]
#[command(long_about = "
Generates N-dimensional lookup tables and applies them to raw planar frames.
Raw files are headerless little-endian samples, plane after plane, frame
after frame, described as path@pixeltype:WxH.

Examples:
  lutmap lut --planes YUV --bit-depth 10 -o id.raw
  lutmap lut --planes RGB -d 2 -b 8 --axis 2 -o ab.raw
  lutmap plan --mode 1 --src y8:1440x1080 --src y8:720x540 --src y8:720x540 --lut yuv444p8:256
  lutmap apply --mode 1 --src in.yuv@yuv420p8:1920x1080 --lut look.raw@yuv444p8:256 -o out.yuv
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an identity LUT as raw samples
    #[command(visible_alias = "gen")]
    Lut(LutArgs),

    /// Resolve and print an application plan without touching pixels
    #[command(visible_alias = "p")]
    Plan(PlanArgs),

    /// Apply a LUT to raw source files
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),
}

#[derive(Args)]
struct LutArgs {
    /// Planes: Y, YUV, YUVA, RGB, RGBA
    #[arg(short, long, default_value = "YUV")]
    planes: String,

    /// LUT dimensions: 1, 2 or 3
    #[arg(short, long, default_value = "1")]
    dimensions: u32,

    /// Source bit depth: 8, 10, 12, 14, 16
    #[arg(short, long, default_value = "8")]
    bit_depth: u32,

    /// Digit selector (2D: 1-2, 3D: 0 = per plane, 1-3)
    #[arg(short, long, default_value = "1")]
    axis: u32,

    /// Store RGB/RGBA LUTs as packed BGR(A) rows
    #[arg(long)]
    packed: bool,

    /// Output raw file
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct PlanArgs {
    /// Mode number (1-6)
    #[arg(short, long)]
    mode: u32,

    /// Source clip formats (pixeltype:WxH), 1 to 3
    #[arg(short, long, required = true)]
    src: Vec<FrameFormat>,

    /// LUT format (pixeltype:W)
    #[arg(short, long)]
    lut: FrameFormat,

    /// Never overwrite source frames
    #[arg(long)]
    no_in_place: bool,
}

#[derive(Args)]
struct ApplyArgs {
    /// Mode number (1-6)
    #[arg(short, long)]
    mode: u32,

    /// Source raw files (path@pixeltype:WxH), 1 to 3
    #[arg(short, long, required = true)]
    src: Vec<RawSpec>,

    /// LUT raw file (path@pixeltype:W)
    #[arg(short, long)]
    lut: RawSpec,

    /// Output raw file
    #[arg(short, long)]
    output: PathBuf,

    /// Process at most this many frames
    #[arg(short, long)]
    frames: Option<usize>,

    /// Never overwrite source frames
    #[arg(long)]
    no_in_place: bool,
}

/// Installs the stderr subscriber and, with `--log`, a file writer.
///
/// `RUST_LOG` overrides the level picked from `-v`.
fn init_logging(verbose: u8, log: Option<&PathBuf>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match log {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            builder.with_ansi(false).with_writer(writer).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log.as_ref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Lut(args) => commands::lut::run(args, cli.verbose),
        Commands::Plan(args) => commands::plan::run(args, cli.verbose),
        Commands::Apply(args) => commands::apply::run(args, cli.verbose),
    }
}
