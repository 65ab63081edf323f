// Chart configuration domain model
use serde::{Deserialize, Serialize};

/// Visualization type of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Area,
}

/// Named dataset on an app or campaign that a chart reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKey {
    #[serde(rename = "revenueData")]
    Revenue,
    #[serde(rename = "userData")]
    Users,
    #[serde(rename = "retentionData")]
    Retention,
    #[serde(rename = "countryData")]
    Countries,
    #[serde(rename = "versionData")]
    Versions,
    #[serde(rename = "campaignData")]
    Campaign,
}

impl DataKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataKey::Revenue => "revenueData",
            DataKey::Users => "userData",
            DataKey::Retention => "retentionData",
            DataKey::Countries => "countryData",
            DataKey::Versions => "versionData",
            DataKey::Campaign => "campaignData",
        }
    }
}

impl std::fmt::Display for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub x_axis: String,
    pub y_axis: Vec<String>,
    pub group_id: String,
    pub order: u32,
    pub data_key: DataKey,
}

impl ChartConfig {
    /// Build a chart with a fresh id from a submitted draft
    pub fn from_draft(draft: ChartDraft, group_id: &str, order: u32) -> Self {
        Self {
            id: new_id(),
            name: draft.name,
            kind: draft.kind,
            x_axis: draft.x_axis,
            y_axis: draft.y_axis,
            group_id: group_id.to_string(),
            order,
            data_key: draft.data_key,
        }
    }

    /// Overwrite the editable fields, keeping id, group and position
    pub fn apply_draft(&mut self, draft: ChartDraft) {
        self.name = draft.name;
        self.kind = draft.kind;
        self.x_axis = draft.x_axis;
        self.y_axis = draft.y_axis;
        self.data_key = draft.data_key;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartGroup {
    pub id: String,
    pub name: String,
    pub order: u32,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

impl ChartGroup {
    pub fn new(name: String, order: u32) -> Self {
        Self {
            id: new_id(),
            name,
            order,
            charts: Vec::new(),
        }
    }

    /// Charts in display order. Ties keep their list position.
    pub fn sorted_charts(&self) -> Vec<&ChartConfig> {
        let mut charts: Vec<&ChartConfig> = self.charts.iter().collect();
        charts.sort_by_key(|c| c.order);
        charts
    }
}

/// Groups in display (tab) order
pub fn sorted_groups(groups: &[ChartGroup]) -> Vec<&ChartGroup> {
    let mut sorted: Vec<&ChartGroup> = groups.iter().collect();
    sorted.sort_by_key(|g| g.order);
    sorted
}

/// Form payload for creating or editing a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub x_axis: String,
    pub y_axis: Vec<String>,
    pub data_key: DataKey,
}

/// Form payload for creating or renaming a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDraft {
    pub name: String,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
