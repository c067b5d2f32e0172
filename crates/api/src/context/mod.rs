//! Application context - dependency injection container

use std::sync::Arc;

use zipcast_common::time::{Clock, SystemClock};
use zipcast_core::{
    CacheOrchestrator, CachePolicy, ForecastProvider, GeocodeProvider, WeatherService,
};
use zipcast_domain::{Config, Result, ZipcastError};
use zipcast_infra::{DbManager, SqliteCacheStore, WeatherGovClient, ZipCodeStackClient};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub weather: Arc<WeatherService>,
}

impl AppContext {
    /// Open the database, run migrations and wire the real upstream clients.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(
            &config.database.path,
            config.database.pool_size,
            config.database.busy_timeout_ms,
        )?);
        db.run_migrations()?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let geocoder = Arc::new(ZipCodeStackClient::from_config(&config.upstream)?);
        let forecaster =
            Arc::new(WeatherGovClient::from_config(&config.upstream, Arc::clone(&clock))?);

        Ok(Self::from_parts(config, db, geocoder, forecaster, clock))
    }

    /// Assemble a context from already-built collaborators.
    ///
    /// `db` must already be migrated.
    pub fn from_parts(
        config: Config,
        db: Arc<DbManager>,
        geocoder: Arc<dyn GeocodeProvider>,
        forecaster: Arc<dyn ForecastProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = Arc::new(SqliteCacheStore::new(Arc::clone(&db)));
        let orchestrator =
            Arc::new(CacheOrchestrator::new(store, clock, CachePolicy::from(&config.cache)));
        let weather = Arc::new(WeatherService::new(orchestrator, geocoder, forecaster));

        Self { config, db, weather }
    }

    /// Whether stale entries may stand in for a failed upstream fetch.
    pub const fn serve_stale_on_error(&self) -> bool {
        self.config.cache.serve_stale_on_error
    }

    /// Run the database health probe off the async runtime.
    pub async fn check_database(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || db.health_check().map(drop))
            .await
            .map_err(|e| ZipcastError::Internal(format!("health check task failed: {e}")))?
    }
}
