use std::sync::Arc;

use anyhow::Context;

use skuflow_api::app::{build_app, services};
use skuflow_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    skuflow_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    if config.allow_initial_status {
        tracing::warn!("SKU_ALLOW_INITIAL_STATUS enabled; creation may skip the transition graph");
    }

    let services = services::build_services(&config)
        .await
        .context("failed to initialize services")?;
    let app = build_app(Arc::new(services), &config.cors_allow_origin);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
