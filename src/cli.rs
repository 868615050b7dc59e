//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

/// Embeddable media player widget (demo shell)
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Media sources to preload (image-sequence directories or single
    /// images) - optional, can also drag-and-drop
    #[arg(value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,

    /// Initial effect (none, grayscale, invert, threshold)
    #[arg(short = 'e', long = "effect", value_name = "EFFECT")]
    pub effect: Option<String>,

    /// Override the persisted volume [0.0 - 1.0]
    #[arg(long = "volume", value_name = "LEVEL")]
    pub volume: Option<f32>,

    /// Caption track (JSON path or URL) attached to the first source
    #[arg(long = "captions", value_name = "TRACK")]
    pub captions: Option<String>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

impl Args {
    /// log level for env_logger from the -v count.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["vidget"]);
        assert!(args.sources.is_empty());
        assert_eq!(args.log_level(), log::LevelFilter::Warn);
    }

    #[test]
    fn test_verbosity_stacks() {
        let args = Args::parse_from(["vidget", "-vv"]);
        assert_eq!(args.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_sources_and_effect() {
        let args = Args::parse_from(["vidget", "-e", "invert", "seq_a", "seq_b"]);
        assert_eq!(args.sources.len(), 2);
        assert_eq!(args.effect.as_deref(), Some("invert"));
    }
}
