//! Failure taxonomy for the rate-fetching layer.
//!
//! Every provider failure collapses to one of these four kinds. The
//! converter never propagates them to callers; it folds them into a
//! failure [`RateRecord`](crate::core::rate::RateRecord) so the UI only
//! has to deal with a single "conversion failed" state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Unknown provider id or currency code. Detected before any
    /// network traffic happens.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The response was well-formed but the expected rate field is
    /// missing, zero or non-finite.
    #[error("unusable rate data: {0}")]
    DataFormat(String),

    /// The scrape pattern found no match in the response body.
    #[error("no rate found in response: {0}")]
    Parse(String),

    /// Transport-level failure: DNS, TLS, connection reset, or a
    /// non-success HTTP status.
    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err.to_string())
    }
}
