use serde::{Deserialize, Serialize};

/// A cached flight offer. Two records describe the same flight exactly
/// when every field matches, which is what the cache deduplicates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    /// Formatted as `"<amount> <currency>"`, e.g. `"250.00 USD"`.
    pub price: String,
}

/// Validated parameters for a provider offer search.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub adults: u32,
}
