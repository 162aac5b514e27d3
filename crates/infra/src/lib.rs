//! Infrastructure layer: record stores, the SKU lifecycle service, seeding.

pub mod config;
pub mod seed;
pub mod service;
pub mod store;

pub use config::ServiceConfig;
pub use service::{FindAllParams, Removed, ServiceError, SkuLifecycleService};
pub use store::{InMemorySkuStore, PostgresSkuStore, SkuFilter, SkuOrder, SkuStore, StoreError};
