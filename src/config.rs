use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub frankfurter: Option<ProviderConfig>,
    pub search: Option<ProviderConfig>,
    pub open_er: Option<ProviderConfig>,
}

const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.app";
const SEARCH_BASE_URL: &str = "https://www.google.com";
const OPEN_ER_BASE_URL: &str = "https://open.er-api.com";

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            frankfurter: Some(ProviderConfig {
                base_url: FRANKFURTER_BASE_URL.to_string(),
            }),
            search: Some(ProviderConfig {
                base_url: SEARCH_BASE_URL.to_string(),
            }),
            open_er: Some(ProviderConfig {
                base_url: OPEN_ER_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn frankfurter_base_url(&self) -> &str {
        self.frankfurter
            .as_ref()
            .map_or(FRANKFURTER_BASE_URL, |p| &p.base_url)
    }

    pub fn search_base_url(&self) -> &str {
        self.search.as_ref().map_or(SEARCH_BASE_URL, |p| &p.base_url)
    }

    pub fn open_er_base_url(&self) -> &str {
        self.open_er
            .as_ref()
            .map_or(OPEN_ER_BASE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Provider used when the CLI does not name one.
    #[serde(default)]
    pub provider: u8,
    #[serde(default = "default_from_currency")]
    pub from_currency: String,
    #[serde(default = "default_to_currency")]
    pub to_currency: String,
}

fn default_from_currency() -> String {
    "USD".to_string()
}

fn default_to_currency() -> String {
    "EUR".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            provider: 0,
            from_currency: default_from_currency(),
            to_currency: default_to_currency(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using built-in defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "idevecore", "cambio")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
