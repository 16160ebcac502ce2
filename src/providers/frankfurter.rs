use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::core::error::FetchError;
use crate::core::rate::{RateProvider, RateRecord};
use crate::providers::USER_AGENT;

pub const PROVIDER_ID: u8 = 0;

/// ECB-style JSON API (frankfurter.app). The endpoint takes the amount
/// as a query parameter and returns the already-multiplied value, so
/// the stored rate is normalized back to a per-unit base rate.
#[derive(Debug)]
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    rates: HashMap<String, f64>,
    date: String,
}

fn format_info(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %e, %Y").to_string(),
        Err(e) => {
            debug!("Could not parse response date '{}': {}", date, e);
            date.to_string()
        }
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn id(&self) -> u8 {
        PROVIDER_ID
    }

    fn request_url(&self, from: &str, to: &str, amount: f64) -> String {
        format!(
            "{}/latest?amount={}&from={}&to={}",
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
        debug!("Requesting exchange rate from {}", url);

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
        let data: FrankfurterResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::DataFormat(format!("unexpected response shape for {from}->{to}: {e}"))
        })?;

        let quoted = data.rates.get(to).copied().ok_or_else(|| {
            FetchError::DataFormat(format!("response has no rate for {to}"))
        })?;

        // The API multiplies by the requested amount; divide it back out.
        let base_rate = quoted / amount;
        if !base_rate.is_finite() || base_rate <= 0.0 {
            return Err(FetchError::DataFormat(format!(
                "rate for {from}->{to} is not a positive number: {quoted}"
            )));
        }

        Ok(RateRecord {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            base_rate,
            fetched_info: format_info(&data.date),
            disclaimer_url: url,
            provider_id: PROVIDER_ID,
            converted: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{
            "amount": 10.0,
            "base": "USD",
            "date": "2024-03-01",
            "rates": {"EUR": 9.2}
        }"#;
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let record = provider.fetch_rate("USD", "EUR", 10.0).await.unwrap();

        assert!(record.converted);
        assert!((record.base_rate - 0.92).abs() < 1e-9);
        assert_eq!(record.from_currency, "USD");
        assert_eq!(record.to_currency, "EUR");
        assert_eq!(record.provider_id, PROVIDER_ID);
        assert_eq!(record.fetched_info, "March  1, 2024");
        assert!(record.disclaimer_url.contains("amount=10"));
    }

    #[tokio::test]
    async fn test_request_url_carries_pair_and_amount() {
        let mock_response = r#"{"date": "2024-03-01", "rates": {"GBP": 7.9}}"#;
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "10"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "GBP"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let record = provider.fetch_rate("USD", "GBP", 10.0).await.unwrap();
        assert!((record.base_rate - 0.79).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_missing_destination_rate_is_data_format_error() {
        let mock_response = r#"{"date": "2024-03-01", "rates": {"GBP": 0.79}}"#;
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.fetch_rate("USD", "EUR", 1.0).await;

        assert!(matches!(result, Err(FetchError::DataFormat(_))));
        assert_eq!(
            result.unwrap_err().to_string(),
            "unusable rate data: response has no rate for EUR"
        );
    }

    #[tokio::test]
    async fn test_zero_rate_is_data_format_error() {
        let mock_response = r#"{"date": "2024-03-01", "rates": {"EUR": 0.0}}"#;
        let mock_server = create_mock_server(mock_response, 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.fetch_rate("USD", "EUR", 1.0).await;

        assert!(matches!(result, Err(FetchError::DataFormat(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_network_error() {
        let mock_server = create_mock_server("Server Error", 500).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.fetch_rate("USD", "EUR", 1.0).await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_data_format_error() {
        let mock_server = create_mock_server("not json", 200).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.fetch_rate("USD", "EUR", 1.0).await;

        assert!(matches!(result, Err(FetchError::DataFormat(_))));
    }

    #[test]
    fn test_unparseable_date_falls_back_to_raw_string() {
        assert_eq!(format_info("yesterday"), "yesterday");
    }
}
