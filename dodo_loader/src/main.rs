//! # Dodo Module Loader
//!
//! Runs a set of module descriptors through the validation chain and prints
//! one verdict per descriptor. Without `--config` a built-in set is used that
//! hits every recoverable rejection once.
//!
//! Failed checks are logged through the tracing-backed policy hooks. With
//! `--corrupt-memory-map` every region is refused, so the first descriptor
//! that passes the recoverable checks trips the fatal invariant and the
//! process aborts.

use clap::Parser;
use dodo::{Policy, Status};
use dodo_common::config::ConfigLoader;
use dodo_common::hooks::logging_policy;
use dodo_common::logging::{effective_level, setup_tracing};
use dodo_loader::{LoaderConfig, MemoryMap, validate_and_load};
use std::path::PathBuf;
use std::process;
use tracing::{Level, error, info};

/// Dodo module loader, validates untrusted module descriptors
#[derive(Parser, Debug)]
#[command(name = "dodo_loader")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Validate module descriptors with Dodo contract checks")]
struct Args {
    /// Path to loader configuration TOML (loader.toml).
    /// Built-in scenarios are used when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Refuse every region, exercising the fatal path.
    #[arg(long)]
    corrupt_memory_map: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

/// Memory map whose bookkeeping has gone bad.
struct CorruptMap;

impl MemoryMap for CorruptMap {
    fn is_region_available(&self, _addr: usize, _size: usize) -> bool {
        false
    }
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
        "Dodo loader v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.shared.service_name
    );

    if let Err(e) = run(&args, &config) {
        error!("FATAL: {e}");
        process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<LoaderConfig, Box<dyn std::error::Error>> {
    let config = match args.config {
        Some(ref path) => LoaderConfig::load(path)?,
        None => LoaderConfig::builtin(),
    };
    config.validate()?;
    Ok(config)
}

fn run(args: &Args, config: &LoaderConfig) -> Result<(), Box<dyn std::error::Error>> {
    let policy: Policy = logging_policy();
    let descriptors = config.descriptors()?;
    let reserved = config.memory_map()?;
    let memory: &dyn MemoryMap = if args.corrupt_memory_map {
        &CorruptMap
    } else {
        &reserved
    };

    info!(
        modules = descriptors.len(),
        reserved = reserved.len(),
        max_size = config.limits.max_size,
        page_alignment = config.limits.page_alignment,
        "Validating descriptors"
    );

    let mut accepted = 0usize;
    for descriptor in &descriptors {
        let status = validate_and_load(&policy, Some(descriptor), &config.limits, memory);
        report(&descriptor.to_string(), status);
        if status.ok() {
            accepted += 1;
        }
    }

    // A null descriptor pointer only exists outside the config format.
    if args.config.is_none() {
        let status = validate_and_load(&policy, None, &config.limits, memory);
        report("<null descriptor>", status);
    }

    info!(
        accepted,
        rejected = descriptors.len() - accepted,
        "Validation complete"
    );
    Ok(())
}

fn report(subject: &str, status: Status) {
    if status.ok() {
        println!("ACCEPT  {subject}");
    } else {
        println!("REJECT  {subject}: {}", status.code());
    }
}
