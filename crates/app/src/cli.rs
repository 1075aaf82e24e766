//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gearcore::GearPair;
use log::LevelFilter;

/// Speed ratios and reflected inertia of gear trains
#[derive(Debug, Parser)]
#[command(name = "geartrain", version, about)]
pub struct Cli {
    /// Log verbosity (written to stderr)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chain of fixed-axis gear pairs
    Simple(SimpleArgs),
    /// Chain of planetary stages described in a JSON file
    Planetary(PlanetaryArgs),
}

#[derive(Debug, Args)]
pub struct SimpleArgs {
    /// Input speed (min⁻¹); overrides the file's input_speed
    #[arg(long)]
    pub speed: Option<f64>,

    /// Gear pair as DRIVING:DRIVEN teeth, repeat per stage
    #[arg(long = "stage", value_name = "DRIVING:DRIVEN", value_parser = parse_pair)]
    pub stages: Vec<GearPair>,

    /// JSON file with input_speed and stages
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PlanetaryArgs {
    /// JSON gearbox description
    pub config: PathBuf,

    /// Input speed (rpm); overrides the file's input_speed
    #[arg(long)]
    pub speed: Option<f64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Parse `DRIVING:DRIVEN`, e.g. `20:45`.
pub fn parse_pair(text: &str) -> Result<GearPair, String> {
    let (driving, driven) = text
        .split_once(':')
        .ok_or_else(|| format!("expected DRIVING:DRIVEN, got `{text}`"))?;
    let teeth = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad tooth count `{value}`: {e}"))
    };
    Ok(GearPair::new(teeth(driving)?, teeth(driven)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("20:45"), Ok(GearPair::new(20.0, 45.0)));
        assert_eq!(parse_pair(" 12.5 : 30 "), Ok(GearPair::new(12.5, 30.0)));
        assert!(parse_pair("20").is_err());
        assert!(parse_pair("a:45").is_err());
    }

    #[test]
    fn test_simple_command_line() {
        let cli = Cli::try_parse_from([
            "geartrain", "simple", "--speed", "1500", "--stage", "20:45", "--stage", "15:30",
        ])
        .unwrap();
        match cli.command {
            Command::Simple(args) => {
                assert_eq!(args.speed, Some(1500.0));
                assert_eq!(args.stages.len(), 2);
                assert!(!args.json);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_planetary_command_line() {
        let cli = Cli::try_parse_from([
            "geartrain", "planetary", "box.json", "--json", "--log-level", "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.filter(), LevelFilter::Debug);
        match cli.command {
            Command::Planetary(args) => {
                assert_eq!(args.config, PathBuf::from("box.json"));
                assert!(args.json);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
