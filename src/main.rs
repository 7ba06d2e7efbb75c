//! magma-config-check - validate a daemon config file without starting the daemon.
//!
//! Loads the file, reads the process resource limits, and runs the same
//! validation the daemon runs at startup. Exits non-zero on rejection.

use clap::Parser;
use magma_core::governance::{self, CoreDumpPolicy, ResourceLimits};
use magma_core::CoreConfig;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "magma-config-check", version, about)]
struct Cli {
    /// Path to the magmad config file.
    #[arg(short, long, env = "MAGMA_CONFIG", default_value = "/etc/magmad.config")]
    config: PathBuf,

    /// Simulated memory lock limit in bytes, instead of the process limit.
    #[arg(long)]
    memlock: Option<u64>,

    /// Print the effective configuration (secrets redacted).
    #[arg(long)]
    dump: bool,
}

fn main() -> ExitCode {
    magma_core::observability::init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "configuration check failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> magma_core::Result<()> {
    let config = CoreConfig::from_file(&cli.config)?;

    let limits = match cli.memlock {
        Some(bytes) => ResourceLimits::with_memlock(Some(bytes), Some(bytes)),
        None => ResourceLimits::read_current()?,
    };

    if cli.dump {
        println!("{}", config.to_redacted_json()?);
    }

    let published = governance::publish(config, &limits)?;
    let pool = published.thread_pool();

    tracing::info!("✓ {} accepted", cli.config.display());
    tracing::info!(
        "  workers: {} x {} byte stacks, {} byte network buffers",
        pool.worker_threads,
        pool.stack_size,
        pool.network_buffer
    );
    match published.secure_memory() {
        Some(plan) => tracing::info!(
            "  secure memory: {} bytes locked (raise limit: {})",
            plan.pool_length,
            plan.raise_limit
        ),
        None => tracing::info!("  secure memory: disabled"),
    }
    match published.core_dumps() {
        CoreDumpPolicy::Limited(bytes) => tracing::info!("  core dumps: up to {} bytes", bytes),
        CoreDumpPolicy::Disabled => tracing::info!("  core dumps: disabled"),
    }

    Ok(())
}
