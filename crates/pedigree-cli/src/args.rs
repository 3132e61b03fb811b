//! Command-line argument definitions for the pedigree CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, output format, layout direction and logging verbosity.

use std::path::Path;

use clap::{Parser, ValueEnum};

use pedigree::config::Direction;

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Node/edge list for a diagramming surface
    Json,
    /// Static SVG preview
    Svg,
}

impl Format {
    /// Guesses the format from the output file extension, falling back to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Json,
        }
    }
}

/// Command-line arguments for the pedigree layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input snapshot (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Layout direction, overrides the configuration file (top_to_bottom, left_to_right)
    #[arg(short, long)]
    pub direction: Option<Direction>,

    /// Output format; guessed from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,
}

impl Args {
    /// The requested format, or the one implied by the output path.
    pub fn resolved_format(&self) -> Format {
        self.format
            .unwrap_or_else(|| Format::from_path(Path::new(&self.output)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "pedigree",
            "family.toml",
            "-o",
            "tree.svg",
            "--direction",
            "lr",
        ])
        .unwrap();

        assert_eq!(args.input, "family.toml");
        assert_eq!(args.direction, Some(Direction::LeftToRight));
        assert_eq!(args.format, None);
        assert_eq!(args.resolved_format(), Format::Svg);
    }

    #[test]
    fn test_explicit_format_wins() {
        let args =
            Args::try_parse_from(["pedigree", "family.toml", "-o", "tree.svg", "-f", "json"])
                .unwrap();
        assert_eq!(args.resolved_format(), Format::Json);
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["pedigree", "family.toml"]).unwrap();
        assert_eq!(args.output, "out.json");
        assert_eq!(args.log_level, "info");
        assert_eq!(args.resolved_format(), Format::Json);
    }

    #[test]
    fn test_unknown_direction_is_rejected() {
        assert!(Args::try_parse_from(["pedigree", "in.toml", "-d", "diagonal"]).is_err());
    }
}
