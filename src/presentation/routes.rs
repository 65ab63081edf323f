// Router wiring for the HTTP API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_chart, add_group, delete_chart, delete_group, edit_chart, edit_group, get_dashboard,
    get_entity_charts, get_templates, health_check, list_apps, list_campaigns, put_entity_charts,
    put_templates, reset_entity_charts,
};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/apps", get(list_apps))
        .route("/campaigns", get(list_campaigns))
        .route("/templates", get(get_templates).put(put_templates))
        .route(
            "/:kind/:id/charts",
            get(get_entity_charts).put(put_entity_charts).delete(reset_entity_charts),
        )
        .route("/:kind/:id/groups", post(add_group))
        .route("/:kind/:id/groups/:group_id", put(edit_group).delete(delete_group))
        .route("/:kind/:id/groups/:group_id/charts", post(add_chart))
        .route("/:kind/:id/charts/:chart_id", put(edit_chart).delete(delete_chart))
        .route("/:kind/:id/dashboard", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::catalog_service::CatalogService;
    use crate::application::chart_editor::ChartEditorService;
    use crate::application::config_store::ChartConfigStore;
    use crate::application::dashboard_service::DashboardService;
    use crate::domain::format::ValueFormatter;
    use crate::infrastructure::memory_repository::MemoryConfigRepository;
    use crate::infrastructure::mock_entity_repository::MockEntityRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    async fn app() -> Router {
        app_with(Arc::new(MemoryConfigRepository::new())).await
    }

    async fn app_with(repository: Arc<MemoryConfigRepository>) -> Router {
        let store = Arc::new(ChartConfigStore::load(repository).await.unwrap());
        let entities = Arc::new(MockEntityRepository::new(Duration::ZERO));
        let state = Arc::new(AppState {
            catalog_service: CatalogService::new(entities.clone()),
            config_store: store.clone(),
            editor_service: ChartEditorService::new(store.clone()),
            dashboard_service: DashboardService::new(entities, store, ValueFormatter::default()),
        });
        router(state)
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    fn revenue_template() -> Value {
        json!([{
            "id": "g1", "name": "Revenue", "order": 0,
            "charts": [{
                "id": "c1", "name": "Rev", "type": "line", "xAxis": "date",
                "yAxis": ["revenue"], "groupId": "g1", "order": 0, "dataKey": "revenueData"
            }]
        }])
    }

    #[tokio::test]
    async fn test_template_materialization_scenario() {
        let app = app().await;

        let (status, _) = send(&app, Method::PUT, "/templates", Some(revenue_template())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, first) = send(&app, Method::GET, "/apps/app-3/charts", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first.as_array().unwrap().len(), 1);
        assert_eq!(first[0]["name"], "Revenue");
        assert_eq!(first[0]["charts"][0]["name"], "Rev");
        assert_ne!(first[0]["id"], "g1");
        assert_ne!(first[0]["charts"][0]["id"], "c1");

        let (_, second) = send(&app, Method::GET, "/apps/app-3/charts", None).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_chart_editing_over_http() {
        let app = app().await;
        let (_, groups) = send(&app, Method::GET, "/campaigns/cmp-1/charts", None).await;
        let group_id = groups[0]["id"].as_str().unwrap().to_string();

        let draft = json!({
            "name": "Spend vs Revenue", "type": "bar", "xAxis": "date",
            "yAxis": ["spend", "revenue"], "dataKey": "campaignData"
        });
        let uri = format!("/campaigns/cmp-1/groups/{}/charts", group_id);
        let (status, outcome) = send(&app, Method::POST, &uri, Some(draft.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(outcome["activeGroupId"], group_id.as_str());

        let added = outcome["groups"][0]["charts"][1].clone();
        assert_eq!(added["order"], 1);

        let mut renamed = draft;
        renamed["name"] = json!("Unit Economics");
        let uri = format!("/campaigns/cmp-1/charts/{}", added["id"].as_str().unwrap());
        let (status, outcome) = send(&app, Method::PUT, &uri, Some(renamed)).await;
        assert_eq!(status, StatusCode::OK);
        let edited = &outcome["groups"][0]["charts"][1];
        assert_eq!(edited["name"], "Unit Economics");
        assert_eq!(edited["id"], added["id"]);
        assert_eq!(edited["order"], added["order"]);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_chart_fields_are_rejected() {
        let app = app().await;
        let (_, groups) = send(&app, Method::GET, "/apps/app-1/charts", None).await;
        let group_id = groups[0]["id"].as_str().unwrap();

        let draft = json!({
            "name": "Bad", "type": "line", "xAxis": "date",
            "yAxis": ["installs"], "dataKey": "revenueData"
        });
        let uri = format!("/apps/app-1/groups/{}/charts", group_id);
        let (status, body) = send(&app, Method::POST, &uri, Some(draft)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("installs"));

        let draft = json!({
            "name": "Rev", "type": "line", "xAxis": "date",
            "yAxis": ["revenue"], "dataKey": "revenueData"
        });
        let uri = "/apps/app-1/groups/missing/charts";
        let (status, _) = send(&app, Method::POST, uri, Some(draft)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_group_lifecycle_and_reset() {
        let app = app().await;

        let draft = json!({ "name": "Ads" });
        let (status, outcome) = send(&app, Method::POST, "/apps/app-1/groups", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        let groups = outcome["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 6);
        assert_eq!(groups[5]["order"], 5);

        let uri = format!("/apps/app-1/groups/{}", outcome["activeGroupId"].as_str().unwrap());
        let (status, outcome) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["groups"].as_array().unwrap().len(), 5);

        let (status, _) = send(&app, Method::DELETE, "/apps/app-1/charts", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_dashboard_and_catalog() {
        let app = app().await;

        let (status, apps) = send(&app, Method::GET, "/apps", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!apps.as_array().unwrap().is_empty());

        let uri = "/apps/app-1/dashboard?start=2024-06-01&end=2024-06-03";
        let (status, dashboard) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["tabs"][0]["charts"][0]["view"]["render"], "line");

        let uri = "/apps/app-1/dashboard?start=2024-06-05&end=2024-06-03";
        let (status, _) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, Method::GET, "/teams/t1/charts", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_entities_are_not_materialized() {
        let repository = Arc::new(MemoryConfigRepository::new());
        let app = app_with(repository.clone()).await;

        for i in 0..3 {
            let uri = format!("/apps/no-such-app-{}/charts", i);
            let (status, _) = send(&app, Method::GET, &uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        let draft = json!({ "name": "Ads" });
        let uri = "/campaigns/no-such-campaign/groups";
        let (status, _) = send(&app, Method::POST, uri, Some(draft)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::PUT, "/apps/cmp-1/charts", Some(json!([]))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(repository.get("app-chart-configs"), None);
        assert_eq!(repository.get("campaign-chart-configs"), None);

        let (status, _) = send(&app, Method::GET, "/apps/app-1/charts", None).await;
        assert_eq!(status, StatusCode::OK);
        let stored = repository.get("app-chart-configs").unwrap();
        let stored: Value = serde_json::from_str(&stored).unwrap();
        assert_eq!(stored.as_object().unwrap().len(), 1);
    }
}
