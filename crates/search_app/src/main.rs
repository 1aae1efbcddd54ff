mod app;
mod cli;
mod config;
mod effects;
mod logging;
mod render;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use search_logging::search_info;

use crate::cli::Cli;
use crate::config::AppConfig;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    apply_overrides(&mut config, &cli);

    let level = config.level_filter(cli.verbose)?;
    logging::initialize(config.log_destination, level);
    if let Some(path) = &cli.config {
        search_info!("Loaded config from {:?}", path);
    }

    app::run(&cli, &config)
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(system_id) = &cli.system_id {
        config.system_id = system_id.clone();
    }
}
