//! # Main — CLI Entry Point
//!
//! Routes subcommands to the squaring kernels. Each single-test subcommand
//! prints one verdict line in the style of the classic standalone drivers;
//! `batch` runs a TOML suite (or the built-in one) in parallel.
//!
//! ## Global Options
//!
//! - `--reducer` / `PRIMEBENCH_REDUCER`: `limb` (split-and-fold) or `gmp`
//!   (division-based reference). Defaults to the build-time backend.
//! - `--threads`: Rayon thread pool size for `batch` (0 = all cores).
//! - `--qos`: macOS QoS P-core scheduling via `pthread_set_qos_class_self_np`.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "primebench",
    about = "Pepin and Lucas-Lehmer squaring kernels over 2^K+1 and 2^K-1"
)]
struct Cli {
    /// Modular reduction strategy
    #[arg(long, value_enum, env = "PRIMEBENCH_REDUCER", default_value_t = Reducer::default())]
    reducer: Reducer,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Set macOS QoS class to user-initiated for rayon threads (P-core scheduling on Apple Silicon)
    #[arg(long)]
    qos: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Reducer {
    /// Split the product at bit K and fold with carry propagation
    Limb,
    /// Full GMP product reduced with a division
    Gmp,
}

impl Default for Reducer {
    fn default() -> Self {
        if cfg!(feature = "gmp-reducer") {
            Reducer::Gmp
        } else {
            Reducer::Limb
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pepin's test: is the Fermat number 2^(2^k)+1 prime?
    Fermat {
        /// Fermat index k
        #[arg(long)]
        k: u64,
    },
    /// Lucas-Lehmer test: is the Mersenne number 2^k-1 prime?
    Mersenne {
        /// Mersenne exponent k
        #[arg(long)]
        k: u64,
    },
    /// Vrba-Reix test: is the Wagstaff number (2^q+1)/3 probably prime?
    Wagstaff {
        /// Wagstaff exponent q
        #[arg(long)]
        q: u64,
    },
    /// Run a suite of tests in parallel and check expected verdicts
    Batch {
        /// Path to a TOML suite file (built-in known-value suite if omitted)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print results as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for machine consumption, human-readable otherwise
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads, cli.qos);

    match &cli.command {
        Commands::Fermat { k } => cli::run_single(cli.reducer, primebench::Form::Fermat, *k),
        Commands::Mersenne { k } => cli::run_single(cli.reducer, primebench::Form::Mersenne, *k),
        Commands::Wagstaff { q } => cli::run_single(cli.reducer, primebench::Form::Wagstaff, *q),
        Commands::Batch { file, json } => cli::run_batch(cli.reducer, file.as_deref(), *json),
    }
}
