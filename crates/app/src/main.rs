mod cli;
mod config;
mod report;

use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{ColorChoice, ConfigBuilder, SimpleLogger, TermLogger, TerminalMode};

use cli::{Cli, Command, PlanetaryArgs, SimpleArgs};
use config::{ConfigError, PlanetaryGearbox, SimpleGearbox, resolve_speed};
use mechanics::{solve_chain, solve_chain_inertia, solve_simple_chain};
use report::{PlanetaryOutput, PlanetaryReport, SimpleOutput, SimpleReport};

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if TermLogger::init(level, config.clone(), TerminalMode::Stderr, ColorChoice::Auto).is_err() {
        // No terminal; plain stderr logging is enough
        if let Err(err) = SimpleLogger::init(level, config) {
            eprintln!("logging disabled: {err}");
        }
    }
}

fn run_simple(args: SimpleArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = match &args.config {
        Some(path) => SimpleGearbox::load(path)?,
        None => SimpleGearbox::default(),
    };
    let input_speed = resolve_speed(file.input_speed, args.speed)?;
    if input_speed <= 0.0 {
        return Err(ConfigError::InvalidInputSpeed(input_speed).into());
    }
    let pairs = if args.stages.is_empty() {
        file.stages
    } else {
        args.stages
    };

    let result = solve_simple_chain(&pairs, input_speed)?;
    info!("simple chain: {} stage(s), total ratio {}", pairs.len(), result.total_ratio);

    if args.json {
        let output = SimpleOutput {
            input_speed,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let report = SimpleReport {
            input_speed,
            pairs: &pairs,
            result: &result,
        };
        println!("{report}");
    }
    Ok(())
}

fn run_planetary(args: PlanetaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let gearbox = PlanetaryGearbox::load(&args.config)?;
    let input_speed = resolve_speed(gearbox.input_speed, args.speed)?;
    let resolved = gearbox.resolve()?;

    let kinematics = solve_chain(&resolved.stages, input_speed)?;
    let inertia = match &resolved.inertias {
        Some(inertias) => Some(solve_chain_inertia(
            &resolved.stages,
            &kinematics.stage_ratios(),
            inertias,
        )?),
        None => None,
    };
    info!(
        "planetary chain: {} stage(s), total ratio {}",
        resolved.stages.len(),
        kinematics.total_ratio
    );

    if args.json {
        let output = PlanetaryOutput {
            input_speed,
            kinematics: &kinematics,
            inertia: inertia.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let report = PlanetaryReport {
            input_speed,
            kinematics: &kinematics,
            inertia: inertia.as_ref(),
        };
        println!("{report}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.log_level.filter());

    match cli.command {
        Command::Simple(args) => run_simple(args),
        Command::Planetary(args) => run_planetary(args),
    }
}
