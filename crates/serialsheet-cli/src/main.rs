#![doc = include_str!("../README.md")]

mod cli;

use clap::Parser;
use cli::config::{CliArgs, Config};
use cli::telemetry::init_telemetry;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let log_format = args.log_format;
    let config = Config::try_from(args)?;

    init_telemetry(log_format)?;

    if cfg!(debug_assertions) {
        tracing::debug!("Running with config: {:#?}", config);
    }

    match config {
        Config::Presets => cli::commands::presets(),
        Config::Generate(config) => cli::commands::generate(&config),
        Config::Layout(config) => cli::commands::layout(&config),
    }
}
