//! Record store contract for SKU records.
//!
//! The lifecycle service only talks to storage through [`SkuStore`]. Two
//! implementations live here: an in-memory store for tests/dev and a
//! Postgres-backed store for production.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use skuflow_products::{NewSkuRecord, Sku, SkuChanges, SkuId, SkuStatus};

pub use in_memory::InMemorySkuStore;
pub use postgres::PostgresSkuStore;

/// Record store operation error.
///
/// These are **infrastructure errors**, as opposed to the lifecycle rule
/// rejections in `skuflow_products::SkuError`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The `sku` code is already used by another record.
    #[error("duplicate sku code: {0}")]
    Duplicate(String),

    /// The record to update or delete does not exist.
    #[error("record not found: {0}")]
    Missing(SkuId),

    /// Backend failure (connection, lock poisoning, decoding, ...).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Filter criteria for list queries. All criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuFilter {
    /// Exact status match.
    pub status: Option<SkuStatus>,
    /// Case-insensitive substring over `descricao`, `descricaoComercial` and
    /// `sku`.
    pub text: Option<String>,
}

impl SkuFilter {
    pub fn matches(&self, sku: &Sku) -> bool {
        if let Some(status) = self.status {
            if sku.status != status {
                return false;
            }
        }
        match &self.text {
            Some(text) => sku.matches_text(text),
            None => true,
        }
    }
}

/// Result ordering for list queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuOrder {
    /// `createdAt` descending, ties broken by id descending.
    #[default]
    NewestFirst,
}

/// Durable storage for SKU records.
///
/// Implementations must:
/// - assign a fresh identifier on `create`
/// - keep the `sku` code unique across current records (create and update),
///   reporting collisions as `StoreError::Duplicate`
/// - apply each call atomically
#[async_trait::async_trait]
pub trait SkuStore: Send + Sync {
    async fn create(&self, data: NewSkuRecord) -> Result<Sku, StoreError>;

    async fn find_by_id(&self, id: SkuId) -> Result<Option<Sku>, StoreError>;

    async fn find_many(
        &self,
        filter: &SkuFilter,
        offset: u64,
        limit: u64,
        order: SkuOrder,
    ) -> Result<Vec<Sku>, StoreError>;

    async fn count(&self, filter: &SkuFilter) -> Result<u64, StoreError>;

    async fn update_by_id(&self, id: SkuId, changes: SkuChanges) -> Result<Sku, StoreError>;

    async fn delete_by_id(&self, id: SkuId) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> SkuStore for Arc<S>
where
    S: SkuStore + ?Sized,
{
    async fn create(&self, data: NewSkuRecord) -> Result<Sku, StoreError> {
        (**self).create(data).await
    }

    async fn find_by_id(&self, id: SkuId) -> Result<Option<Sku>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_many(
        &self,
        filter: &SkuFilter,
        offset: u64,
        limit: u64,
        order: SkuOrder,
    ) -> Result<Vec<Sku>, StoreError> {
        (**self).find_many(filter, offset, limit, order).await
    }

    async fn count(&self, filter: &SkuFilter) -> Result<u64, StoreError> {
        (**self).count(filter).await
    }

    async fn update_by_id(&self, id: SkuId, changes: SkuChanges) -> Result<Sku, StoreError> {
        (**self).update_by_id(id, changes).await
    }

    async fn delete_by_id(&self, id: SkuId) -> Result<(), StoreError> {
        (**self).delete_by_id(id).await
    }
}
