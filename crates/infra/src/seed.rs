//! Demo catalog used for local development.

use tracing::{debug, info};

use skuflow_products::{CreateSku, Sku};

use crate::service::{ServiceError, SkuLifecycleService};
use crate::store::SkuStore;

/// Records inserted by [`seed_demo_catalog`].
pub fn demo_catalog() -> Vec<CreateSku> {
    vec![
        CreateSku::new("Sabonete A", "90g", "SAB-90"),
        CreateSku::new("Hidratante B", "200ml", "HID-200"),
    ]
}

/// Insert the demo catalog, skipping codes that already exist.
///
/// Returns the records actually created.
pub async fn seed_demo_catalog<S>(service: &SkuLifecycleService<S>) -> Result<Vec<Sku>, ServiceError>
where
    S: SkuStore,
{
    let mut created = Vec::new();
    for input in demo_catalog() {
        let code = input.sku.clone();
        match service.create(input).await {
            Ok(sku) => created.push(sku),
            Err(ServiceError::Conflict(_)) => debug!(sku = %code, "demo sku already present"),
            Err(e) => return Err(e),
        }
    }

    info!(created = created.len(), "demo catalog seeded");
    Ok(created)
}
