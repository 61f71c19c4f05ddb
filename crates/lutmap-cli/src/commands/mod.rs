//! CLI command implementations

pub mod apply;
pub mod lut;
pub mod plan;
pub mod raw;

use anyhow::{Context, Result};
use lutmap_ops::Mode;

/// Parse a mode number given on the command line
pub fn parse_mode(number: u32) -> Result<Mode> {
    Mode::try_from(number).with_context(|| format!("Invalid --mode {number}"))
}

/// Format sample count for display
pub fn format_samples(count: usize) -> String {
    const K: usize = 1024;
    const M: usize = K * 1024;

    if count >= M {
        format!("{:.2} M", count as f64 / M as f64)
    } else if count >= K {
        format!("{:.2} K", count as f64 / K as f64)
    } else {
        format!("{count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode(4).unwrap(), Mode::Expand2D);
        let err = parse_mode(7).unwrap_err();
        assert!(format!("{err:#}").contains("--mode 7"));
    }

    #[test]
    fn test_format_samples() {
        assert_eq!(format_samples(256), "256");
        assert_eq!(format_samples(65536), "64.00 K");
        assert_eq!(format_samples(1 << 24), "16.00 M");
    }
}
