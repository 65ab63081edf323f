// Application state for HTTP handlers
use crate::application::catalog_service::CatalogService;
use crate::application::chart_editor::ChartEditorService;
use crate::application::config_store::ChartConfigStore;
use crate::application::dashboard_service::DashboardService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog_service: CatalogService,
    pub config_store: Arc<ChartConfigStore>,
    pub editor_service: ChartEditorService,
    pub dashboard_service: DashboardService,
}
