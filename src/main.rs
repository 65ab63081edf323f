// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::application::catalog_service::CatalogService;
use crate::application::chart_editor::ChartEditorService;
use crate::application::config_repository::ConfigRepository;
use crate::application::config_store::ChartConfigStore;
use crate::application::dashboard_service::DashboardService;
use crate::domain::format::{SymbolCurrency, ValueFormatter};
use crate::infrastructure::config::load_service_config;
use crate::infrastructure::file_repository::FileConfigRepository;
use crate::infrastructure::memory_repository::MemoryConfigRepository;
use crate::infrastructure::mock_entity_repository::MockEntityRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_service_config()?;

    // Repositories (infrastructure layer)
    let config_repository: Arc<dyn ConfigRepository> = if config.storage.ephemeral {
        tracing::warn!("Chart configuration storage is ephemeral; edits are lost on restart");
        Arc::new(MemoryConfigRepository::new())
    } else {
        Arc::new(FileConfigRepository::open(&config.storage.directory).await?)
    };
    let entity_repository = Arc::new(MockEntityRepository::new(config.mock.latency()));

    // Services (application layer)
    let store = Arc::new(ChartConfigStore::load(config_repository).await?);
    let formatter = ValueFormatter::new(Arc::new(SymbolCurrency::new(
        config.currency.symbol.clone(),
        config.currency.decimals,
    )));

    let state = Arc::new(AppState {
        catalog_service: CatalogService::new(entity_repository.clone()),
        config_store: store.clone(),
        editor_service: ChartEditorService::new(store.clone()),
        dashboard_service: DashboardService::new(entity_repository, store, formatter),
    });

    let storage = if config.storage.ephemeral {
        "memory".to_string()
    } else {
        config.storage.directory.display().to_string()
    };
    let addr = config.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting revenue-dashboard on {} (storage: {})", addr, storage);

    axum::serve(listener, router(state)).await?;

    Ok(())
}
