//! SKU lifecycle service (application-level orchestration).
//!
//! Every operation follows the same shape:
//!
//! ```text
//! request
//!   ↓
//! 1. Load the current record from the store (when the operation needs it)
//!   ↓
//! 2. Decide with the pure lifecycle rules (`skuflow_products::plan_*`)
//!   ↓
//! 3. Issue at most one write to the store
//! ```
//!
//! The load-then-write sequence is not atomic across calls: two concurrent
//! writers on the same id both read the same prior status and the later write
//! wins. Each individual store call is atomic.
//!
//! The service returns typed errors and never logs them; translating them for
//! a transport is the caller's job.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use skuflow_core::{DomainError, Page, PageRequest};
use skuflow_products::{
    CreateSku, Sku, SkuError, SkuId, SkuPatch, SkuStatus, plan_create, plan_transition,
    plan_update,
};

use crate::config::ServiceConfig;
use crate::store::{SkuFilter, SkuOrder, SkuStore, StoreError};

/// Errors returned by [`SkuLifecycleService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No record with the requested id (never existed or was removed).
    #[error("SKU não encontrado")]
    NotFound(SkuId),

    /// The `sku` code is already used by another record.
    #[error("SKU já existe (violação de unicidade)")]
    Conflict(String),

    /// Malformed input (blank or null required field).
    #[error("validação falhou: {0}")]
    Validation(String),

    #[error("Edição não permitida neste status ({status})")]
    EditNotAllowed { status: SkuStatus },

    #[error("Em CADASTRO_COMPLETO apenas descricaoComercial pode ser alterada")]
    InvalidEdit,

    #[error("Transição inválida de {from} para {to}")]
    InvalidTransition { from: SkuStatus, to: SkuStatus },

    #[error("Status CANCELADO é definitivo; nenhuma transição é permitida")]
    TerminalState,

    /// The record store failed.
    #[error("falha no armazenamento: {0}")]
    Store(StoreError),
}

impl From<SkuError> for ServiceError {
    fn from(value: SkuError) -> Self {
        match value {
            SkuError::Domain(DomainError::Validation(msg)) => ServiceError::Validation(msg),
            SkuError::Domain(DomainError::InvalidId(msg)) => ServiceError::Validation(msg),
            SkuError::EditNotAllowed { status } => ServiceError::EditNotAllowed { status },
            SkuError::InvalidEdit => ServiceError::InvalidEdit,
            SkuError::InvalidTransition { from, to } => {
                ServiceError::InvalidTransition { from, to }
            }
            SkuError::TerminalState => ServiceError::TerminalState,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Duplicate(code) => ServiceError::Conflict(code),
            StoreError::Missing(id) => ServiceError::NotFound(id),
            other => ServiceError::Store(other),
        }
    }
}

/// Raw list parameters as received from a caller; normalized by `find_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindAllParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<SkuStatus>,
    /// Free-text search; blank means no search.
    pub q: Option<String>,
}

/// Acknowledgement returned by `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removed {
    pub ok: bool,
}

/// Owns the SKU lifecycle: creation, edits, transitions, lookups, deletion.
///
/// Storage is injected (`S: SkuStore`), so tests run against
/// `InMemorySkuStore` and production against `PostgresSkuStore`.
#[derive(Debug)]
pub struct SkuLifecycleService<S> {
    store: S,
    config: ServiceConfig,
}

impl<S> SkuLifecycleService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, ServiceConfig::default())
    }

    pub fn with_config(store: S, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }
}

impl<S> SkuLifecycleService<S>
where
    S: SkuStore,
{
    /// Register a new SKU (starts in `PRE_CADASTRO` unless configured
    /// otherwise).
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create(&self, input: CreateSku) -> Result<Sku, ServiceError> {
        let requested = input.status;
        let record = plan_create(input, self.config.initial_status, Utc::now())?;
        if let Some(requested) = requested.filter(|s| *s != record.status) {
            debug!(%requested, "requested initial status ignored");
        }
        let created = self.store.create(record).await?;

        debug!(id = %created.id, status = %created.status, "sku created");
        Ok(created)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn find_one(&self, id: SkuId) -> Result<Sku, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Newest-first page of records matching `status` and `q`.
    #[instrument(skip(self))]
    pub async fn find_all(&self, params: FindAllParams) -> Result<Page<Sku>, ServiceError> {
        let request = PageRequest::new(params.page, params.limit);
        let filter = SkuFilter {
            status: params.status,
            text: params
                .q
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
        };

        let total = self.store.count(&filter).await?;
        let items = self
            .store
            .find_many(&filter, request.offset(), request.limit(), SkuOrder::NewestFirst)
            .await?;

        Ok(Page::new(items, total, request))
    }

    /// Apply a field edit under the current status's edit permissions.
    ///
    /// A `descricaoComercial` edit in `CADASTRO_COMPLETO` also moves the
    /// record back to `PRE_CADASTRO`.
    #[instrument(skip(self, patch), fields(id = %id))]
    pub async fn update(&self, id: SkuId, patch: SkuPatch) -> Result<Sku, ServiceError> {
        let current = self.find_one(id).await?;

        let Some(changes) = plan_update(&current, patch, Utc::now())? else {
            return Ok(current);
        };
        let rolled_back = changes.status.is_some();
        let updated = self.store.update_by_id(id, changes).await?;

        if rolled_back {
            debug!(from = %current.status, to = %updated.status, "sku edit rolled status back");
        } else {
            debug!("sku updated");
        }
        Ok(updated)
    }

    /// Move the record along the transition graph.
    #[instrument(skip(self), fields(id = %id, target = %target))]
    pub async fn transition(&self, id: SkuId, target: SkuStatus) -> Result<Sku, ServiceError> {
        let current = self.find_one(id).await?;

        let changes = plan_transition(&current, target, Utc::now())?;
        let updated = self.store.update_by_id(id, changes).await?;

        debug!(from = %current.status, to = %updated.status, "sku transitioned");
        Ok(updated)
    }

    #[instrument(skip(self), fields(id = %id))]
    pub async fn remove(&self, id: SkuId) -> Result<Removed, ServiceError> {
        self.find_one(id).await?;
        self.store.delete_by_id(id).await?;

        debug!("sku removed");
        Ok(Removed { ok: true })
    }
}
