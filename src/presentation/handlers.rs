// HTTP request handlers
use crate::application::config_store::StoreError;
use crate::application::dashboard_service::DashboardError;
use crate::domain::chart::{ChartConfig, ChartDraft, ChartGroup, GroupDraft};
use crate::domain::edit::{EditCommand, EditError};
use crate::domain::entity::{EntityKey, EntityKind};
use crate::domain::modal::EditorModal;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

/// Days shown when a dashboard request names no start date
const DEFAULT_RANGE_DAYS: u64 = 30;

type HandlerResult = Result<Response<Body>, ApiError>;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl ToString) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<StatusCode> for ApiError {
    fn from(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("error"))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        let status = match &e {
            StoreError::Edit(EditError::GroupNotFound(_) | EditError::ChartNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            StoreError::Edit(_) | StoreError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Persist(source) => {
                tracing::error!("Error saving chart configuration: {:#}", source);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status, e)
    }
}

impl From<DashboardError> for ApiError {
    fn from(e: DashboardError) -> Self {
        match &e {
            DashboardError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, &e),
            DashboardError::Range(_) => Self::new(StatusCode::BAD_REQUEST, &e),
            DashboardError::Repository(source) => {
                tracing::error!("Error loading entity data: {:#}", source);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to load entity data")
            }
        }
    }
}

fn entity_key(kind: &str, id: String) -> Result<EntityKey, ApiError> {
    let kind = EntityKind::from_segment(kind).ok_or_else(|| {
        ApiError::new(StatusCode::NOT_FOUND, format!("unknown entity kind '{}'", kind))
    })?;
    Ok(EntityKey::new(kind, id))
}

/// Resolve the path to an entity the catalog actually lists. Configuration
/// is only ever materialized for known entities.
async fn known_entity(state: &AppState, kind: &str, id: String) -> Result<EntityKey, ApiError> {
    let key = entity_key(kind, id)?;
    let exists = state.catalog_service.contains(&key).await.map_err(|e| {
        tracing::error!("Error looking up {}: {:#}", key, e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to look up entity")
    })?;

    if !exists {
        return Err(ApiError::new(StatusCode::NOT_FOUND, format!("{} not found", key)));
    }
    Ok(key)
}

async fn respond<T: serde::Serialize>(
    status: StatusCode,
    data: &T,
    headers: &HeaderMap,
) -> HandlerResult {
    Ok(json_response(status, data, accepts_brotli(headers)).await?)
}

async fn apply_edit(
    state: &AppState,
    key: EntityKey,
    command: EditCommand,
    headers: &HeaderMap,
) -> HandlerResult {
    let outcome = state.editor_service.apply(&key, command).await?;
    respond(StatusCode::OK, &outcome, headers).await
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn list_apps(headers: HeaderMap, State(state): State<Arc<AppState>>) -> HandlerResult {
    let apps = state.catalog_service.list_apps().await.map_err(|e| {
        tracing::error!("Error fetching apps: {:#}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to list apps")
    })?;
    respond(StatusCode::OK, &apps, &headers).await
}

pub async fn list_campaigns(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let campaigns = state.catalog_service.list_campaigns().await.map_err(|e| {
        tracing::error!("Error fetching campaigns: {:#}", e);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "failed to list campaigns")
    })?;
    respond(StatusCode::OK, &campaigns, &headers).await
}

pub async fn get_templates(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let groups = state.config_store.global_configs().await;
    respond(StatusCode::OK, &groups, &headers).await
}

pub async fn put_templates(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(groups): Json<Vec<ChartGroup>>,
) -> HandlerResult {
    state.config_store.update_global_configs(groups).await?;
    let groups = state.config_store.global_configs().await;
    respond(StatusCode::OK, &groups, &headers).await
}

pub async fn get_entity_charts(
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    let groups = state.config_store.configs_for_entity(&key).await;
    respond(StatusCode::OK, &groups, &headers).await
}

pub async fn put_entity_charts(
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(groups): Json<Vec<ChartGroup>>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    state.config_store.update_entity_configs(&key, groups).await?;
    let groups = state.config_store.configs_for_entity(&key).await;
    respond(StatusCode::OK, &groups, &headers).await
}

/// Forget the entity's own configuration so it is rebuilt from the template
pub async fn reset_entity_charts(
    Path((kind, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    let key = known_entity(&state, &kind, id).await?;
    state.config_store.reset_entity_configs(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_group(
    Path((kind, id)): Path<(String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<GroupDraft>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    let mut form: EditorModal<ChartGroup> = EditorModal::default();
    form.open_create();

    let outcome = state.editor_service.submit_group(&key, &mut form, draft).await?;
    respond(StatusCode::CREATED, &outcome, &headers).await
}

pub async fn edit_group(
    Path((kind, id, group_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<GroupDraft>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    let mut form = state.editor_service.group_form(&key, &group_id).await?;

    let outcome = state.editor_service.submit_group(&key, &mut form, draft).await?;
    respond(StatusCode::OK, &outcome, &headers).await
}

pub async fn delete_group(
    Path((kind, id, group_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    apply_edit(&state, key, EditCommand::DeleteGroup { group_id }, &headers).await
}

pub async fn add_chart(
    Path((kind, id, group_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ChartDraft>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    let mut form: EditorModal<ChartConfig> = EditorModal::default();
    form.open_create();

    let editor = &state.editor_service;
    let outcome = editor.submit_chart(&key, &mut form, &group_id, draft).await?;
    respond(StatusCode::CREATED, &outcome, &headers).await
}

pub async fn edit_chart(
    Path((kind, id, chart_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ChartDraft>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    let editor = &state.editor_service;
    let mut form = editor.chart_form(&key, &chart_id).await?;
    // Edits stay in the chart's own group
    let group_id = form.seed().map(|c| c.group_id.clone()).unwrap_or_default();

    let outcome = editor.submit_chart(&key, &mut form, &group_id, draft).await?;
    respond(StatusCode::OK, &outcome, &headers).await
}

pub async fn delete_chart(
    Path((kind, id, chart_id)): Path<(String, String, String)>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let key = known_entity(&state, &kind, id).await?;
    apply_edit(&state, key, EditCommand::DeleteChart { chart_id }, &headers).await
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RangeQuery {
    /// Explicit bounds, or the last thirty days ending today
    fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let end = self.end.unwrap_or(today);
        let start = self
            .start
            .or_else(|| end.checked_sub_days(Days::new(DEFAULT_RANGE_DAYS - 1)))
            .unwrap_or(end);
        (start, end)
    }
}

pub async fn get_dashboard(
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let key = entity_key(&kind, id)?;
    let (start, end) = query.resolve(Utc::now().date_naive());

    let dashboard = state.dashboard_service.get_dashboard(&key, start, end).await?;
    respond(StatusCode::OK, &dashboard, &headers).await
}
