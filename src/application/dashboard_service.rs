// Dashboard service - Use case for building an entity's chart dashboard
use crate::application::config_store::ChartConfigStore;
use crate::application::entity_repository::{check_range, EntityRepository, RangeError};
use crate::domain::chart::{sorted_groups, ChartConfig};
use crate::domain::dashboard::{Dashboard, DashboardTab, RenderedChart};
use crate::domain::dataset::bind;
use crate::domain::entity::{EntityDetails, EntityKey};
use crate::domain::format::ValueFormatter;
use crate::domain::render::{render_chart, ChartView};
use chrono::NaiveDate;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0} not found")]
    NotFound(EntityKey),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn EntityRepository>,
    store: Arc<ChartConfigStore>,
    formatter: ValueFormatter,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn EntityRepository>,
        store: Arc<ChartConfigStore>,
        formatter: ValueFormatter,
    ) -> Self {
        Self {
            repository,
            store,
            formatter,
        }
    }

    pub async fn get_dashboard(
        &self,
        key: &EntityKey,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Dashboard, DashboardError> {
        check_range(start, end)?;

        let details = self
            .repository
            .fetch_details(key, start, end)
            .await?
            .ok_or_else(|| DashboardError::NotFound(key.clone()))?;

        let groups = self.store.configs_for_entity(key).await;
        let tabs = sorted_groups(&groups)
            .into_iter()
            .map(|group| DashboardTab {
                group_id: group.id.clone(),
                name: group.name.clone(),
                charts: group
                    .sorted_charts()
                    .into_iter()
                    .map(|chart| self.render(chart, &details))
                    .collect(),
            })
            .collect();

        let title = format!("{} ({} to {})", details.name, start, end);
        Ok(Dashboard::new(title, key.kind, key.id.clone(), tabs))
    }

    fn render(&self, chart: &ChartConfig, details: &EntityDetails) -> RenderedChart {
        let view = match details.dataset(chart.data_key) {
            Some(dataset) => {
                tracing::debug!(
                    "Rendering chart {} from {} {} rows",
                    chart.id,
                    dataset.row_count(),
                    chart.data_key
                );
                match bind(chart, dataset) {
                    Ok(bound) => render_chart(bound, &self.formatter),
                    Err(e) => {
                        tracing::warn!(
                            "Chart {} on {} cannot be drawn: {}",
                            chart.id,
                            details.id,
                            e
                        );
                        ChartView::unavailable(e)
                    }
                }
            }
            None => {
                tracing::debug!("{} has no {} for chart {}", details.id, chart.data_key, chart.id);
                ChartView::unavailable(format!(
                    "no {} available for this {}",
                    chart.data_key, details.kind
                ))
            }
        };

        RenderedChart {
            id: chart.id.clone(),
            name: chart.name.clone(),
            view,
        }
    }
}
