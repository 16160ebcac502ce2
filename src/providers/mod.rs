//! Exchange-rate providers and their registry.

pub mod frankfurter;
pub mod open_er;
pub mod search_scrape;

use crate::config::ProvidersConfig;
use crate::core::error::FetchError;
use crate::core::rate::RateProvider;

// Fixed headers sent with every provider request. The scrape provider
// needs a browser identity to get a results page instead of a consent
// interstitial.
pub(crate) const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/117.0";
pub(crate) const REFERER: &str = "https://www.google.com";

/// Maps a provider id to a ready-to-use provider instance.
pub trait ProviderFactory: Send + Sync {
    fn create(&self, provider_id: u8) -> Result<Box<dyn RateProvider>, FetchError>;
}

/// The fixed provider registry, configured with per-provider base URLs.
pub struct Registry {
    config: ProvidersConfig,
}

impl Registry {
    pub fn new(config: &ProvidersConfig) -> Self {
        Registry {
            config: config.clone(),
        }
    }
}

impl ProviderFactory for Registry {
    fn create(&self, provider_id: u8) -> Result<Box<dyn RateProvider>, FetchError> {
        match provider_id {
            frankfurter::PROVIDER_ID => Ok(Box::new(frankfurter::FrankfurterProvider::new(
                self.config.frankfurter_base_url(),
            ))),
            search_scrape::PROVIDER_ID => Ok(Box::new(search_scrape::SearchScrapeProvider::new(
                self.config.search_base_url(),
            ))),
            open_er::PROVIDER_ID => Ok(Box::new(open_er::OpenErProvider::new(
                self.config.open_er_base_url(),
            ))),
            _ => Err(FetchError::Configuration(format!(
                "unknown provider id: {provider_id}"
            ))),
        }
    }
}
