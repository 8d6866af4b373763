use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use vt_config::{ConfigError, ConfigFile, build_controller, build_vehicle};
use vt_controls::FlightMode;
use vt_sim::{IntegratorType, SimError, SimRecord, run_sim};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "vt-cli")]
#[command(about = "VTOL transition controller - configuration and simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file (YAML, or JSON by extension)
    Validate {
        /// Path to the configuration file
        config_path: PathBuf,
    },
    /// Print a configuration with every value at its default
    Defaults {
        /// Emit JSON instead of YAML
        #[arg(long)]
        json: bool,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fly the configured scenario on the point-mass vehicle
    Simulate {
        /// Path to the configuration file
        config_path: PathBuf,
        /// Time step in seconds (overrides the file)
        #[arg(long)]
        dt: Option<f64>,
        /// End time in seconds (overrides the file)
        #[arg(long)]
        t_end: Option<f64>,
        /// Integrator (overrides the file)
        #[arg(long, value_enum)]
        integrator: Option<IntegratorArg>,
        /// Output CSV file path (optional, no time series written otherwise)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum IntegratorArg {
    Rk4,
    Euler,
}

impl From<IntegratorArg> for IntegratorType {
    fn from(arg: IntegratorArg) -> Self {
        match arg {
            IntegratorArg::Rk4 => IntegratorType::RK4,
            IntegratorArg::Euler => IntegratorType::ForwardEuler,
        }
    }
}

fn main() -> CliResult<()> {
    // honours RUST_LOG
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config_path } => cmd_validate(&config_path),
        Commands::Defaults { json, output } => cmd_defaults(json, output.as_deref()),
        Commands::Simulate {
            config_path,
            dt,
            t_end,
            integrator,
            output,
        } => cmd_simulate(
            &config_path,
            dt,
            t_end,
            integrator.map(IntegratorType::from),
            output.as_deref(),
        ),
    }
}

fn cmd_validate(config_path: &Path) -> CliResult<()> {
    println!("Validating configuration: {}", config_path.display());
    let config = vt_config::load(config_path)?;
    println!("✓ Configuration '{}' is valid (version {})", config.name, config.version);
    Ok(())
}

fn cmd_defaults(json: bool, output: Option<&Path>) -> CliResult<()> {
    let config = ConfigFile::new("Standard VTOL");
    let text = if json {
        serde_json::to_string_pretty(&config)? + "\n"
    } else {
        serde_yaml::to_string(&config)?
    };

    if let Some(path) = output {
        std::fs::write(path, text)?;
        println!("✓ Wrote default configuration to {}", path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn cmd_simulate(
    config_path: &Path,
    dt: Option<f64>,
    t_end: Option<f64>,
    integrator: Option<IntegratorType>,
    output: Option<&Path>,
) -> CliResult<()> {
    let config = vt_config::load(config_path)?;
    let mut opts = config.sim.clone();
    if let Some(dt) = dt {
        opts.dt = dt;
    }
    if let Some(t_end) = t_end {
        opts.t_end = t_end;
    }
    if let Some(integrator) = integrator {
        opts.integrator = integrator;
    }
    let scenario = config.scenario_or_default();

    println!("Simulating '{}'", config.name);
    println!("  dt = {:.4} s, t_end = {:.3} s", opts.dt, opts.t_end);

    let mut vtol = build_controller(&config)?;
    let mut vehicle = build_vehicle(&config)?;

    let started = Instant::now();
    let record = run_sim(&mut vtol, &mut vehicle, &scenario, &opts)?;
    let wall_s = started.elapsed().as_secs_f64();
    info!(wall_s, samples = record.t.len(), "simulation done");

    print_summary(&record, wall_s);

    if let Some(path) = output {
        std::fs::write(path, record_csv(&record))?;
        println!(
            "✓ Exported {} data points to {}",
            record.t.len(),
            path.display()
        );
    }
    Ok(())
}

fn print_summary(record: &SimRecord, wall_s: f64) {
    println!("✓ Simulation completed in {:.3}s", wall_s);
    println!("  Time points: {}", record.t.len());

    if record.mode_changes.is_empty() {
        println!("  No mode changes");
    } else {
        println!("\nMode changes:");
        for change in &record.mode_changes {
            println!("  t={:>8.3}s  {} -> {}", change.t, change.from, change.to);
        }
    }

    let final_mode = record
        .cycles
        .last()
        .map(|c| c.mode)
        .unwrap_or(FlightMode::Mc);
    println!("\n  Final mode: {}", final_mode);
    if let Some(x) = record.x.last() {
        println!("  Final airspeed: {:.2} m/s", x.forward_mps);
        println!("  Final altitude: {:.2} m", x.altitude_m);
    }
    if record.quadchute_cycles > 0 {
        println!("  Quadchute requested in {} cycles", record.quadchute_cycles);
    }
}

fn record_csv(record: &SimRecord) -> String {
    let mut csv = String::from(
        "time_s,mode,mc_weight,pusher_throttle,pusher_command,lift_throttle,airbrakes,airspeed_mps,altitude_m,climb_mps\n",
    );
    for ((t, x), c) in record.t.iter().zip(&record.x).zip(&record.cycles) {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            t,
            c.mode,
            c.mc_weight,
            c.pusher_throttle,
            c.pusher_command,
            c.lift_throttle,
            c.airbrakes,
            x.forward_mps,
            x.altitude_m,
            x.climb_mps
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use vt_sim::{CycleSample, VehicleState};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn csv_has_one_row_per_sample() {
        let mut record = SimRecord::default();
        for i in 0..3 {
            record.t.push(f64::from(i) * 0.1);
            record.x.push(VehicleState::default());
            record.cycles.push(CycleSample {
                mode: FlightMode::TransitionToFw,
                mc_weight: 1.0,
                pusher_throttle: 0.5,
                pusher_command: 0.5,
                lift_throttle: 0.4,
                airbrakes: 0.0,
            });
        }
        let csv = record_csv(&record);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("time_s,mode"));
        assert!(lines[1].contains("TRANS_TO_FW"));
    }
}
