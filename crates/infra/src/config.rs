//! Service configuration.

use skuflow_products::InitialStatusPolicy;

/// Knobs for [`crate::service::SkuLifecycleService`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// How `create` treats a caller-requested initial status.
    pub initial_status: InitialStatusPolicy,
}

impl ServiceConfig {
    /// Permissive creation: callers may pick any initial status, skipping
    /// the transition graph.
    pub fn allowing_initial_status() -> Self {
        Self {
            initial_status: InitialStatusPolicy::AllowRequested,
        }
    }

    pub fn from_flag(allow_initial_status: bool) -> Self {
        if allow_initial_status {
            Self::allowing_initial_status()
        } else {
            Self::default()
        }
    }
}
