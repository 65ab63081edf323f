// Repository trait for app and campaign data
use crate::domain::entity::{AppSummary, CampaignSummary, EntityDetails, EntityKey};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// Longest date range a details request may cover
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("end date {end} is before start date {start}")]
    Inverted { start: NaiveDate, end: NaiveDate },
    #[error("date range of {0} days exceeds {max} days", max = MAX_RANGE_DAYS)]
    TooLong(i64),
}

/// Number of days in the inclusive range `start..=end`
pub fn check_range(start: NaiveDate, end: NaiveDate) -> Result<i64, RangeError> {
    if end < start {
        return Err(RangeError::Inverted { start, end });
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(RangeError::TooLong(days));
    }
    Ok(days)
}

#[async_trait]
pub trait EntityRepository: Send + Sync {
    async fn list_apps(&self) -> anyhow::Result<Vec<AppSummary>>;

    async fn list_campaigns(&self) -> anyhow::Result<Vec<CampaignSummary>>;

    /// Entity record with every dataset it carries for the inclusive date range.
    /// `Ok(None)` when the entity does not exist.
    async fn fetch_details(
        &self,
        key: &EntityKey,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Option<EntityDetails>>;
}
