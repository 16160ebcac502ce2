use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::FetchError;
use crate::core::rate::{RateProvider, RateRecord};
use crate::providers::USER_AGENT;

pub const PROVIDER_ID: u8 = 2;

/// Alternate JSON API (open.er-api.com shape). Returns per-unit rates
/// for every currency keyed on the source code; the amount never
/// appears in the request.
#[derive(Debug)]
pub struct OpenErProvider {
    base_url: String,
}

impl OpenErProvider {
    pub fn new(base_url: &str) -> Self {
        OpenErProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenErResponse {
    rates: HashMap<String, f64>,
    time_last_update_utc: Option<String>,
}

fn format_info(updated: Option<&str>) -> String {
    let Some(raw) = updated else {
        return String::new();
    };
    match DateTime::parse_from_rfc2822(raw) {
        Ok(parsed) => parsed.format("%B %e, %Y").to_string(),
        Err(e) => {
            debug!("Could not parse update timestamp '{}': {}", raw, e);
            raw.to_string()
        }
    }
}

#[async_trait]
impl RateProvider for OpenErProvider {
    fn id(&self) -> u8 {
        PROVIDER_ID
    }

    fn request_url(&self, from: &str, _to: &str, _amount: f64) -> String {
        format!("{}/v6/latest/{}", self.base_url, from)
    }

    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<RateRecord, FetchError> {
        let url = self.request_url(from, to, amount);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let data: OpenErResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::DataFormat(format!("unexpected response shape for {from}->{to}: {e}"))
        })?;

        let base_rate = data.rates.get(to).copied().ok_or_else(|| {
            FetchError::DataFormat(format!("response has no rate for {to}"))
        })?;

        if !base_rate.is_finite() || base_rate <= 0.0 {
            return Err(FetchError::DataFormat(format!(
                "rate for {from}->{to} is not a positive number: {base_rate}"
            )));
        }

        Ok(RateRecord {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            base_rate,
            fetched_info: format_info(data.time_last_update_utc.as_deref()),
            disclaimer_url: url,
            provider_id: PROVIDER_ID,
            converted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(from: &str, mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        let expected_path = format!("/v6/latest/{from}");

        Mock::given(method("GET"))
            .and(path(&expected_path))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{
            "result": "success",
            "time_last_update_utc": "Fri, 01 Mar 2024 00:02:31 +0000",
            "base_code": "USD",
            "rates": {"USD": 1.0, "EUR": 0.92, "GBP": 0.79}
        }"#;
        let mock_server = create_mock_server("USD", mock_response, 200).await;

        let provider = OpenErProvider::new(&mock_server.uri());
        let record = provider.fetch_rate("USD", "EUR", 25.0).await.unwrap();

        assert!(record.converted);
        assert!((record.base_rate - 0.92).abs() < 1e-9);
        assert_eq!(record.fetched_info, "March  1, 2024");
        assert_eq!(record.provider_id, PROVIDER_ID);
        assert!(record.disclaimer_url.ends_with("/v6/latest/USD"));
    }

    #[tokio::test]
    async fn test_missing_destination_rate_is_data_format_error() {
        let mock_response = r#"{"result": "success", "rates": {"USD": 1.0}}"#;
        let mock_server = create_mock_server("USD", mock_response, 200).await;

        let provider = OpenErProvider::new(&mock_server.uri());
        let result = provider.fetch_rate("USD", "EUR", 1.0).await;

        assert!(matches!(result, Err(FetchError::DataFormat(_))));
    }

    #[tokio::test]
    async fn test_missing_update_timestamp_gives_empty_info() {
        let mock_response = r#"{"result": "success", "rates": {"EUR": 0.92}}"#;
        let mock_server = create_mock_server("USD", mock_response, 200).await;

        let provider = OpenErProvider::new(&mock_server.uri());
        let record = provider.fetch_rate("USD", "EUR", 1.0).await.unwrap();

        assert!(record.fetched_info.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let mock_server = create_mock_server("USD", "Too Many Requests", 429).await;

        let provider = OpenErProvider::new(&mock_server.uri());
        let result = provider.fetch_rate("USD", "EUR", 1.0).await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }
}
