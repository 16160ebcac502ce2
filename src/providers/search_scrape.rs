use async_trait::async_trait;
use chrono::Local;
use regex::Regex;
use tracing::debug;

use crate::core::codes;
use crate::core::error::FetchError;
use crate::core::rate::{RateProvider, RateRecord};
use crate::providers::{REFERER, USER_AGENT};

pub const PROVIDER_ID: u8 = 1;

/// Search-engine scrape. Queries a results page for
/// `convert {amount} {from} to {to}` and pattern-matches the first
/// decimal amount followed by the destination currency's display name.
#[derive(Debug)]
pub struct SearchScrapeProvider {
    base_url: String,
}

impl SearchScrapeProvider {
    pub fn new(base_url: &str) -> Self {
        SearchScrapeProvider {
            base_url: base_url.to_string(),
        }
    }

    /// Extracts the converted amount for `to` from the page body.
    fn scrape_amount(body: &str, to: &str) -> Result<f64, FetchError> {
        let name = codes::display_name(to).ok_or_else(|| {
            FetchError::Configuration(format!("no display name for currency code: {to}"))
        })?;

        let pattern = format!(r"([0-9][0-9,]*\.[0-9]+)\s*{}", regex::escape(name));
        let re = Regex::new(&pattern)
            .map_err(|e| FetchError::Parse(format!("invalid scrape pattern for {to}: {e}")))?;

        let capture = re
            .captures(body)
            .and_then(|c| c.get(1))
            .ok_or_else(|| {
                FetchError::Parse(format!("no amount followed by '{name}' in response"))
            })?;

        capture
            .as_str()
            .replace(',', "")
            .parse::<f64>()
            .map_err(|e| FetchError::Parse(format!("matched amount is not a number: {e}")))
    }
}

#[async_trait]
impl RateProvider for SearchScrapeProvider {
    fn id(&self) -> u8 {
        PROVIDER_ID
    }

    fn request_url(&self, from: &str, to: &str, amount: f64) -> String {
        format!(
            "{}/search?q=convert+{}+{}+to+{}&hl=en",
            self.base_url, amount, from, to
        )
    }

    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<RateRecord, FetchError> {
        let url = self.request_url(from, to, amount);
        debug!("Requesting search results from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client.get(&url).header("Referer", REFERER).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let body = response.text().await?;
        let scraped = Self::scrape_amount(&body, to)?;

        // The page converts the requested amount; normalize to per-unit.
        let base_rate = scraped / amount;
        if !base_rate.is_finite() || base_rate <= 0.0 {
            return Err(FetchError::DataFormat(format!(
                "scraped rate for {from}->{to} is not a positive number: {scraped}"
            )));
        }

        let now = Local::now();
        let fetched_info = format!(
            "{} of {} - {}",
            now.format("%-d"),
            now.format("%B"),
            now.format("%H:%M:%S")
        );

        Ok(RateRecord {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            base_rate,
            fetched_info,
            disclaimer_url: url,
            provider_id: PROVIDER_ID,
            converted: true,
        })
    }
}
