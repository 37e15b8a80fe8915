use std::sync::Arc;

use axum::Router;
use configs::{AppConfig, StoreConfig};
use service::customers::{seed::demo_customers, CustomerStore, IdAllocator};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Create the process-lifetime customer store described by `cfg`.
pub fn build_store(cfg: &StoreConfig) -> Arc<CustomerStore> {
    let allocator = IdAllocator::new(cfg.max_id_attempts);
    if cfg.seed_demo_data {
        CustomerStore::with_customers(allocator, demo_customers())
    } else {
        CustomerStore::new(allocator)
    }
}

/// Build the app around an existing store.
pub fn build_app(store: Arc<CustomerStore>) -> Router {
    routes::build_router(ServerState::new(store), build_cors())
}

/// Public entry: load configuration, then build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let store = build_store(&cfg.store);
    let customers = store.len().await;
    info!(
        customers,
        max_id_attempts = cfg.store.max_id_attempts,
        "customer store ready"
    );

    let app = build_app(store);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting customer server");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn server_future_can_be_spawned() {
        // tokio::spawn in the binary needs a Send future
        assert_send(run_with_config(AppConfig::default()));
        assert_send(run());
    }

    #[tokio::test]
    async fn build_store_honours_seed_flag() {
        let seeded = build_store(&StoreConfig::default());
        assert_eq!(seeded.len().await, demo_customers().len());

        let empty = build_store(&StoreConfig { seed_demo_data: false, ..StoreConfig::default() });
        assert_eq!(empty.len().await, 0);
    }
}
