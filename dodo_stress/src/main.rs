//! # Dodo Stress Harness
//!
//! Runs the correctness suite, then the benchmark set, and prints a report.
//! Exits with code 1 if any correctness check failed.

use clap::Parser;
use dodo_common::config::ConfigLoader;
use dodo_common::logging::{effective_level, setup_tracing};
use dodo_stress::{StressConfig, StressError, StressReport, run_unit_checks, standard_suite};
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};

/// Dodo stress harness, correctness checks and check-cost benchmarks
#[derive(Parser, Debug)]
#[command(name = "dodo_stress")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Stress and benchmark the Dodo check primitives")]
struct Args {
    /// Path to harness configuration TOML (stress.toml).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Iterations per benchmark.
    #[arg(long)]
    iterations: Option<u64>,

    /// Threads in the concurrent dispatch check.
    #[arg(long)]
    threads: Option<usize>,

    /// Failing checks per thread in the concurrent dispatch check.
    #[arg(long)]
    iters_per_thread: Option<u64>,

    /// Skip the fork-based fatal invariant check.
    #[arg(long)]
    skip_death_test: bool,

    /// Print the report as JSON instead of a table.
    #[arg(long)]
    json_report: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            setup_tracing(Level::INFO, args.json);
            error!("FATAL: {e}");
            process::exit(1);
        }
    };
    setup_tracing(effective_level(config.shared.log_level, args.verbose), args.json);

    info!(
        "Dodo stress v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

/// File (or built-in) settings with CLI overrides applied.
fn load_config(args: &Args) -> Result<StressConfig, StressError> {
    let mut config = match args.config {
        Some(ref path) => StressConfig::load(path)?,
        None => StressConfig::builtin(),
    };
    if let Some(iterations) = args.iterations {
        config.run.iterations = iterations;
    }
    if let Some(threads) = args.threads {
        config.run.threads = threads;
    }
    if let Some(iters) = args.iters_per_thread {
        config.run.iters_per_thread = iters;
    }
    if args.skip_death_test {
        config.run.death_test = false;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &StressConfig) -> Result<(), StressError> {
    info!(
        iterations = config.run.iterations,
        threads = config.run.threads,
        iters_per_thread = config.run.iters_per_thread,
        death_test = config.run.death_test,
        "Running unit checks"
    );
    let unit = run_unit_checks(config);
    let failed = unit.failed();
    let total = unit.checks.len();

    info!("Running benchmarks");
    let benches = standard_suite(config);

    let report = StressReport::new(&config.shared.service_name, unit, benches);
    if args.json_report {
        println!("{}", report.to_json()?);
    } else {
        print!("{report}");
    }

    if failed > 0 {
        return Err(StressError::UnitChecksFailed { failed, total });
    }
    info!("All unit checks passed");
    Ok(())
}
