pub mod cli;
pub mod config;
pub mod converter;
pub mod core;
pub mod log;
pub mod providers;

use anyhow::Result;
use tracing::debug;

pub enum AppCommand {
    Convert {
        amount: f64,
        from: Option<String>,
        to: Option<String>,
        provider: Option<u8>,
    },
    Codes,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            provider,
        } => {
            let provider_id = provider.unwrap_or(config.provider);
            let from = from.unwrap_or_else(|| config.from_currency.clone());
            let to = to.unwrap_or_else(|| config.to_currency.clone());
            cli::convert::run(&config, amount, &from, &to, provider_id).await
        }
        AppCommand::Codes => cli::codes::run(),
    }
}
