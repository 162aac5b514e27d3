//! SKU catalog domain module.
//!
//! This crate contains the SKU registration lifecycle, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage): the status
//! transition graph, the per-status edit permissions and the edit-induced
//! rollback rule.

pub mod error;
pub mod lifecycle;
pub mod patch;
pub mod sku;
pub mod status;

pub use error::SkuError;
pub use lifecycle::{InitialStatusPolicy, plan_create, plan_transition, plan_update};
pub use patch::{Patch, SkuChanges, SkuPatch};
pub use sku::{CreateSku, NewSkuRecord, Sku, SkuId};
pub use status::{EditPermission, SkuStatus};
