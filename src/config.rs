use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AmadeusConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub amadeus: AmadeusConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://users.db".into());
        let amadeus = AmadeusConfig {
            api_key: std::env::var("API_KEY").context("API_KEY is not set")?,
            api_secret: std::env::var("API_SECRET").context("API_SECRET is not set")?,
            base_url: std::env::var("AMADEUS_BASE_URL")
                .unwrap_or_else(|_| "https://test.api.amadeus.com".into()),
            timeout_secs: std::env::var("PROVIDER_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        };
        Ok(Self {
            database_url,
            amadeus,
        })
    }
}
