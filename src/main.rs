mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use rust_pimc::io::read_config;
use rust_pimc::simulation::{PathIntegralSimulation, SimulationResults};

#[derive(Parser, Debug)]
#[command(version, about = "Path-integral Monte Carlo for Lennard-Jones ring polymers", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all log output
    #[arg(short, long)]
    quiet: bool,

    /// Also write the log to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::setup_logging(args.verbose, args.quiet, args.log_file.clone()) {
        eprintln!("failed to set up logging: {}", e);
        return ExitCode::FAILURE;
    }

    let config = match read_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}: {}", args.config.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut simulation = match PathIntegralSimulation::from_config(config) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let results = simulation.run();
    print_results(&simulation, &results);
    ExitCode::SUCCESS
}

fn print_results(simulation: &PathIntegralSimulation, results: &SimulationResults) {
    let config = simulation.config();
    println!("PIMC Simulation Results for Lennard-Jones Ring Polymers");
    println!("-------------------------------------------------------");
    println!("Molecules: {}  beads: {}", config.n_molecules, config.n_beads);
    println!("T: {}  hbar: {}  density: {}", config.temperature, config.hbar, config.density);
    println!("beta*hbar*omega: {:.4}", config.hbar * config.omega2.sqrt() / config.temperature);
    println!("lambda: {}", config.lambda);
    println!("Steps: {}  samples: {}", config.steps, results.n_samples);
    println!("Acceptance: {:.4}", results.acceptance_rate);
    println!();
    for summary in &results.estimators {
        println!(
            "{:<22} {:>14.6} ± {:<12.6} tau {:>7.2}  [{}]",
            summary.label, summary.mean, summary.error, summary.autocorrelation_time, summary.dimension
        );
    }
}
