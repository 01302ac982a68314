use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::flights::provider::{AmadeusClient, FlightProvider};
use crate::flights::store::FlightStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub flights: FlightStore,
    pub provider: Arc<dyn FlightProvider>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let options = SqliteConnectOptions::from_str(&config.database_url)
            .context("parse DATABASE_URL")?
            .create_if_missing(true);
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect to database")?;

        let provider =
            Arc::new(AmadeusClient::new(&config.amadeus)?) as Arc<dyn FlightProvider>;

        Ok(Self {
            db,
            config,
            flights: FlightStore::new(),
            provider,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        flights: FlightStore,
        provider: Arc<dyn FlightProvider>,
    ) -> Self {
        Self {
            db,
            config,
            flights,
            provider,
        }
    }
}

#[cfg(test)]
impl AppState {
    pub(crate) async fn for_tests() -> Self {
        use crate::flights::provider::StubProvider;
        Self::for_tests_with(Arc::new(StubProvider {
            records: Vec::new(),
        }))
        .await
    }

    /// In-memory database plus a caller-chosen provider stub. A single
    /// connection keeps every query on the same `:memory:` database.
    pub(crate) async fn for_tests_with(provider: Arc<dyn FlightProvider>) -> Self {
        use crate::config::AmadeusConfig;

        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .expect("migrations");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            amadeus: AmadeusConfig {
                api_key: "test".into(),
                api_secret: "test".into(),
                base_url: "http://localhost:9".into(),
                timeout_secs: 1,
            },
        });

        Self::from_parts(db, config, FlightStore::new(), provider)
    }
}
