// Dashboard domain model
use super::entity::EntityKind;
use super::render::ChartView;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub kind: EntityKind,
    pub entity_id: String,
    pub tabs: Vec<DashboardTab>,
}

impl Dashboard {
    pub fn new(
        title: String,
        kind: EntityKind,
        entity_id: String,
        tabs: Vec<DashboardTab>,
    ) -> Self {
        Self {
            title,
            kind,
            entity_id,
            tabs,
        }
    }
}

/// One chart group rendered as a tab
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTab {
    pub group_id: String,
    pub name: String,
    pub charts: Vec<RenderedChart>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedChart {
    pub id: String,
    pub name: String,
    pub view: ChartView,
}
