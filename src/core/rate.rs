//! Exchange-rate abstractions shared by all providers.

use async_trait::async_trait;

use crate::core::error::FetchError;

/// Normalized result of one rate fetch.
///
/// A record is either fully populated with `converted = true`, or a
/// failure marker with `converted = false` and default fields. The
/// converter holds exactly one record at a time; a new successful fetch
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord {
    pub from_currency: String,
    pub to_currency: String,
    /// Units of `to_currency` per 1 unit of `from_currency`. Greater
    /// than zero and finite whenever `converted` is true.
    pub base_rate: f64,
    /// Human-readable description of when the source data was current.
    pub fetched_info: String,
    /// The URL the rate was fetched from, shown as provenance.
    pub disclaimer_url: String,
    pub provider_id: u8,
    pub converted: bool,
}

impl RateRecord {
    /// The neutral state held before any fetch has happened.
    pub fn placeholder() -> Self {
        RateRecord {
            from_currency: String::new(),
            to_currency: String::new(),
            base_rate: 1.0,
            fetched_info: String::new(),
            disclaimer_url: String::new(),
            provider_id: 0,
            converted: false,
        }
    }

    /// A failure record for the given request parameters.
    pub fn failure(from: &str, to: &str, provider_id: u8) -> Self {
        RateRecord {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            provider_id,
            ..Self::placeholder()
        }
    }

    /// Whether this record can serve a request for the given triple
    /// without a new fetch.
    pub fn matches(&self, from: &str, to: &str, provider_id: u8) -> bool {
        self.converted
            && self.from_currency == from
            && self.to_currency == to
            && self.provider_id == provider_id
    }
}

/// Result of one conversion request, delivered to listeners.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub amount_in: f64,
    /// `amount_in × base_rate`; zero on failure.
    pub amount_out: f64,
    pub record: RateRecord,
}

impl Conversion {
    pub fn success(amount_in: f64, record: RateRecord) -> Self {
        let amount_out = amount_in * record.base_rate;
        Conversion {
            amount_in,
            amount_out,
            record,
        }
    }

    pub fn failure(amount_in: f64, record: RateRecord) -> Self {
        Conversion {
            amount_in,
            amount_out: 0.0,
            record,
        }
    }

    pub fn converted(&self) -> bool {
        self.record.converted
    }
}

/// One external source of exchange-rate data.
///
/// Implementations supply a pure URL builder plus a fetch that parses
/// the provider's response shape into a [`RateRecord`].
#[async_trait]
pub trait RateProvider: Send + Sync + std::fmt::Debug {
    fn id(&self) -> u8;

    /// The request URL for a given pair and reference amount. Pure;
    /// also used to populate `disclaimer_url`.
    fn request_url(&self, from: &str, to: &str, amount: f64) -> String;

    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<RateRecord, FetchError>;
}
