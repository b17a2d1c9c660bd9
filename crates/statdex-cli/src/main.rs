//! `statdex` command-line runner.
//!
//! Loads the dataset once, then either lists the registered operations or
//! dispatches a single operation with a JSON argument bag.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use statdex::{
    Error, ErrorKind, ErrorOrigin, QueryErrorKind, Registry,
    core::{config::EngineConfig, obs::metrics},
    open_table,
};
use std::{path::PathBuf, process::ExitCode};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const EXIT_FAILED: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "statdex", version, about = "Query a creature stats dataset")]
struct Cli {
    /// TOML engine configuration.
    #[arg(long, global = true, env = "STATDEX_CONFIG")]
    config: Option<PathBuf>,

    /// Dataset CSV, overriding `data_path` from the config.
    #[arg(long, global = true, env = "STATDEX_DATA")]
    data: Option<PathBuf>,

    /// Reject unrecognized argument keys.
    #[arg(long, global = true)]
    strict: bool,

    /// Print the operation counters to stderr on exit.
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every operation with its argument keys.
    List,

    /// Run one operation.
    Run {
        /// Operation name, e.g. `filter_multi_criteria`.
        operation: String,

        /// Argument bag as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                print_error(&Error::from(err));
                return ExitCode::from(EXIT_CONFIG);
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(data) = cli.data {
        config.data_path = Some(data);
    }
    config.strict_arguments |= cli.strict;

    init_tracing(&config.log_level);

    let registry = Registry::new();
    let code = match cli.command {
        Command::List => {
            let operations: Vec<_> = registry.operations().collect();
            print_json(&operations);
            ExitCode::SUCCESS
        }
        Command::Run { operation, args } => run(&registry, &config, &operation, &args),
    };

    if cli.metrics {
        match serde_json::to_string_pretty(&metrics::snapshot()) {
            Ok(text) => eprintln!("{text}"),
            Err(err) => tracing::warn!(error = %err, "failed to render metrics"),
        }
    }

    code
}

fn run(registry: &Registry, config: &EngineConfig, operation: &str, args: &str) -> ExitCode {
    let args: Value = match serde_json::from_str(args) {
        Ok(args) => args,
        Err(err) => {
            print_error(&Error::new(
                ErrorKind::Query(QueryErrorKind::InvalidArgument),
                ErrorOrigin::Arguments,
                format!("--args is not valid JSON: {err}"),
            ));
            return ExitCode::from(EXIT_FAILED);
        }
    };

    let table = open_table(config);

    match registry.dispatch(operation, &args, &table, config) {
        Ok(payload) => {
            print_json(&payload);
            ExitCode::SUCCESS
        }
        Err(err) => {
            print_error(&err);
            ExitCode::from(EXIT_FAILED)
        }
    }
}

// RUST_LOG wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("failed to render output: {err}"),
    }
}

fn print_error(err: &Error) {
    match serde_json::to_string_pretty(&serde_json::json!({ "error": err })) {
        Ok(text) => eprintln!("{text}"),
        Err(_) => eprintln!("{err}"),
    }
}
