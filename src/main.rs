use anyhow::Result;
use cambio::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for cambio::AppCommand {
    fn from(cmd: Commands) -> cambio::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                from,
                to,
                provider,
            } => cambio::AppCommand::Convert {
                amount,
                from,
                to,
                provider,
            },
            Commands::Codes => cambio::AppCommand::Codes,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount in the source currency
        amount: f64,
        /// Source currency code, e.g. USD (defaults to the configured pair)
        from: Option<String>,
        /// Destination currency code, e.g. EUR (defaults to the configured pair)
        to: Option<String>,
        /// Provider id: 0 = ECB JSON API, 1 = search scrape, 2 = open.er-api
        #[arg(short, long)]
        provider: Option<u8>,
    },
    /// List supported currency codes
    Codes,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => cambio::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = cambio::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
# Provider used when --provider is not given:
# 0 = ECB JSON API, 1 = search scrape, 2 = open.er-api
provider: 0

from_currency: "USD"
to_currency: "EUR"

providers:
  frankfurter:
    base_url: "https://api.frankfurter.app"
  search:
    base_url: "https://www.google.com"
  open_er:
    base_url: "https://open.er-api.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
