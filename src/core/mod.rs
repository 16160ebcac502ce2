//! Core conversion abstractions

pub mod codes;
pub mod error;
pub mod rate;

// Re-export main types for cleaner imports
pub use error::FetchError;
pub use rate::{Conversion, RateProvider, RateRecord};
