pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::FetchOptions;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: String,
        options: FetchOptions,
    },
    Rates {
        json: bool,
        options: FetchOptions,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            options,
        } => cli::convert::run(&config, &options, amount, &from, &to).await,
        AppCommand::Rates { json, options } => cli::rates::run(&config, &options, json).await,
    }
}
