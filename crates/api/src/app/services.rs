//! Service wiring: pick a record store, build the lifecycle service, seed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;

use skuflow_infra::seed::seed_demo_catalog;
use skuflow_infra::store::postgres;
use skuflow_infra::{
    InMemorySkuStore, PostgresSkuStore, ServiceConfig, ServiceError, SkuLifecycleService,
    SkuStore, StoreError,
};

use crate::config::ApiConfig;

const MAX_DB_CONNECTIONS: u32 = 10;

/// Store handle shared by every request.
pub type DynSkuStore = Arc<dyn SkuStore>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("record store unavailable: {0}")]
    Store(#[from] StoreError),

    #[error("demo seed failed: {0}")]
    Seed(#[from] ServiceError),
}

/// Shared application state, handed to handlers through `Extension`.
pub struct AppServices {
    pub skus: SkuLifecycleService<DynSkuStore>,
    started_at: Instant,
}

impl AppServices {
    pub fn new(store: DynSkuStore, config: ServiceConfig) -> Self {
        Self {
            skus: SkuLifecycleService::with_config(store, config),
            started_at: Instant::now(),
        }
    }

    /// Fresh in-memory store; used by tests and when no database is configured.
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(Arc::new(InMemorySkuStore::new()), config)
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Build services from process configuration.
///
/// With `DATABASE_URL` set this connects to Postgres and applies the schema;
/// otherwise records live in memory for the life of the process.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, BootstrapError> {
    let services = match &config.database_url {
        Some(url) => {
            let pool = postgres::connect(url, MAX_DB_CONNECTIONS).await?;
            let store = PostgresSkuStore::new(pool);
            store.migrate().await?;
            tracing::info!("using postgres record store");
            AppServices::new(Arc::new(store), config.service_config())
        }
        None => {
            tracing::warn!("DATABASE_URL not set; records are kept in memory only");
            AppServices::in_memory(config.service_config())
        }
    };

    if config.seed_demo {
        seed_demo_catalog(&services.skus).await?;
    }

    Ok(services)
}
