// Apps and campaigns that own chart configurations
use super::chart::DataKey;
use super::dataset::Dataset;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    App,
    Campaign,
}

impl EntityKind {
    pub const ALL: [EntityKind; 2] = [EntityKind::App, EntityKind::Campaign];

    /// Storage key of the per-entity configuration tier for this kind
    pub fn storage_key(&self) -> &'static str {
        match self {
            EntityKind::App => "app-chart-configs",
            EntityKind::Campaign => "campaign-chart-configs",
        }
    }

    /// Path segment used by the HTTP API ("apps", "campaigns")
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "apps" => Some(EntityKind::App),
            "campaigns" => Some(EntityKind::Campaign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: String,
}

impl EntityKey {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }

    #[cfg(test)]
    pub fn app(id: impl Into<String>) -> Self {
        Self::new(EntityKind::App, id)
    }

    #[cfg(test)]
    pub fn campaign(id: impl Into<String>) -> Self {
        Self::new(EntityKind::Campaign, id)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::App => f.write_str("app"),
            EntityKind::Campaign => f.write_str("campaign"),
        }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSummary {
    pub id: String,
    pub name: String,
    pub platform: String,
    pub total_revenue: f64,
    pub total_users: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: String,
    pub name: String,
    pub app_id: String,
    pub network: String,
    pub spend: f64,
    pub revenue: f64,
}

/// An entity record with its named datasets for a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDetails {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub datasets: Vec<Dataset>,
}

impl EntityDetails {
    pub fn dataset(&self, key: DataKey) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.key() == key)
    }
}
