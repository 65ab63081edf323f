// Typed datasets attached to apps and campaigns
use super::chart::{ChartConfig, DataKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single cell read from a dataset row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

/// Field access by name for the row types below
pub trait DatasetRow {
    const FIELDS: &'static [&'static str];

    fn field(&self, name: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRow {
    pub date: NaiveDate,
    pub revenue: f64,
    pub ad_revenue: f64,
    pub iap_revenue: f64,
    pub spend: f64,
}

impl DatasetRow for RevenueRow {
    const FIELDS: &'static [&'static str] =
        &["date", "revenue", "adRevenue", "iapRevenue", "spend"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "date" => Some(date_value(self.date)),
            "revenue" => Some(FieldValue::Number(self.revenue)),
            "adRevenue" => Some(FieldValue::Number(self.ad_revenue)),
            "iapRevenue" => Some(FieldValue::Number(self.iap_revenue)),
            "spend" => Some(FieldValue::Number(self.spend)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub date: NaiveDate,
    pub total_users: u64,
    pub new_users: u64,
    pub active_users: u64,
}

impl DatasetRow for UserRow {
    const FIELDS: &'static [&'static str] = &["date", "totalUsers", "newUsers", "activeUsers"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "date" => Some(date_value(self.date)),
            "totalUsers" => Some(FieldValue::Number(self.total_users as f64)),
            "newUsers" => Some(FieldValue::Number(self.new_users as f64)),
            "activeUsers" => Some(FieldValue::Number(self.active_users as f64)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRow {
    /// Cohort day label, e.g. "D1"
    pub day: String,
    /// Percentage of the cohort still active
    pub retention: f64,
}

impl DatasetRow for RetentionRow {
    const FIELDS: &'static [&'static str] = &["day", "retention"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "day" => Some(FieldValue::Text(self.day.clone())),
            "retention" => Some(FieldValue::Number(self.retention)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRow {
    pub country: String,
    pub revenue: f64,
    pub users: u64,
}

impl DatasetRow for CountryRow {
    const FIELDS: &'static [&'static str] = &["country", "revenue", "users"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "country" => Some(FieldValue::Text(self.country.clone())),
            "revenue" => Some(FieldValue::Number(self.revenue)),
            "users" => Some(FieldValue::Number(self.users as f64)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRow {
    pub version: String,
    pub users: u64,
    pub revenue: f64,
}

impl DatasetRow for VersionRow {
    const FIELDS: &'static [&'static str] = &["version", "users", "revenue"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "version" => Some(FieldValue::Text(self.version.clone())),
            "users" => Some(FieldValue::Number(self.users as f64)),
            "revenue" => Some(FieldValue::Number(self.revenue)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRow {
    pub date: NaiveDate,
    pub impressions: u64,
    pub clicks: u64,
    pub installs: u64,
    pub spend: f64,
    pub revenue: f64,
}

impl DatasetRow for CampaignRow {
    const FIELDS: &'static [&'static str] =
        &["date", "impressions", "clicks", "installs", "spend", "revenue"];

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "date" => Some(date_value(self.date)),
            "impressions" => Some(FieldValue::Number(self.impressions as f64)),
            "clicks" => Some(FieldValue::Number(self.clicks as f64)),
            "installs" => Some(FieldValue::Number(self.installs as f64)),
            "spend" => Some(FieldValue::Number(self.spend)),
            "revenue" => Some(FieldValue::Number(self.revenue)),
            _ => None,
        }
    }
}

fn date_value(date: NaiveDate) -> FieldValue {
    FieldValue::Text(date.format("%Y-%m-%d").to_string())
}

impl DataKey {
    /// Field names present on the row type this key selects
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            DataKey::Revenue => RevenueRow::FIELDS,
            DataKey::Users => UserRow::FIELDS,
            DataKey::Retention => RetentionRow::FIELDS,
            DataKey::Countries => CountryRow::FIELDS,
            DataKey::Versions => VersionRow::FIELDS,
            DataKey::Campaign => CampaignRow::FIELDS,
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields().contains(&name)
    }
}

/// One named dataset; the variant pins the row shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dataKey", content = "rows")]
pub enum Dataset {
    #[serde(rename = "revenueData")]
    Revenue(Vec<RevenueRow>),
    #[serde(rename = "userData")]
    Users(Vec<UserRow>),
    #[serde(rename = "retentionData")]
    Retention(Vec<RetentionRow>),
    #[serde(rename = "countryData")]
    Countries(Vec<CountryRow>),
    #[serde(rename = "versionData")]
    Versions(Vec<VersionRow>),
    #[serde(rename = "campaignData")]
    Campaign(Vec<CampaignRow>),
}

impl Dataset {
    pub fn key(&self) -> DataKey {
        match self {
            Dataset::Revenue(_) => DataKey::Revenue,
            Dataset::Users(_) => DataKey::Users,
            Dataset::Retention(_) => DataKey::Retention,
            Dataset::Countries(_) => DataKey::Countries,
            Dataset::Versions(_) => DataKey::Versions,
            Dataset::Campaign(_) => DataKey::Campaign,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Dataset::Revenue(rows) => rows.len(),
            Dataset::Users(rows) => rows.len(),
            Dataset::Retention(rows) => rows.len(),
            Dataset::Countries(rows) => rows.len(),
            Dataset::Versions(rows) => rows.len(),
            Dataset::Campaign(rows) => rows.len(),
        }
    }

    /// Read one field from every row, in row order
    pub fn column(&self, name: &str) -> Vec<Option<FieldValue>> {
        fn collect<R: DatasetRow>(rows: &[R], name: &str) -> Vec<Option<FieldValue>> {
            rows.iter().map(|r| r.field(name)).collect()
        }

        match self {
            Dataset::Revenue(rows) => collect(rows, name),
            Dataset::Users(rows) => collect(rows, name),
            Dataset::Retention(rows) => collect(rows, name),
            Dataset::Countries(rows) => collect(rows, name),
            Dataset::Versions(rows) => collect(rows, name),
            Dataset::Campaign(rows) => collect(rows, name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindingError {
    #[error("chart reads {expected} but was given {actual}")]
    DatasetMismatch { expected: DataKey, actual: DataKey },
    #[error("field '{field}' does not exist on {data_key}")]
    UnknownField { field: String, data_key: DataKey },
    #[error("chart has no y-axis fields")]
    NoSeries,
}

/// Check that a chart's axes name fields of the row type its data key selects
pub fn check_fields(config: &ChartConfig) -> Result<(), BindingError> {
    check_axes(config.data_key, &config.x_axis, &config.y_axis)
}

pub fn check_axes(data_key: DataKey, x_axis: &str, y_axis: &[String]) -> Result<(), BindingError> {
    if y_axis.is_empty() {
        return Err(BindingError::NoSeries);
    }

    std::iter::once(x_axis)
        .chain(y_axis.iter().map(String::as_str))
        .find(|field| !data_key.has_field(field))
        .map_or(Ok(()), |field| {
            Err(BindingError::UnknownField {
                field: field.to_string(),
                data_key,
            })
        })
}

/// A chart attached to a dataset whose row type matches its axes
#[derive(Debug, Clone, Copy)]
pub struct BoundChart<'a> {
    pub config: &'a ChartConfig,
    pub dataset: &'a Dataset,
}

pub fn bind<'a>(
    config: &'a ChartConfig,
    dataset: &'a Dataset,
) -> Result<BoundChart<'a>, BindingError> {
    if dataset.key() != config.data_key {
        return Err(BindingError::DatasetMismatch {
            expected: config.data_key,
            actual: dataset.key(),
        });
    }
    check_fields(config)?;
    Ok(BoundChart { config, dataset })
}
