// Catalog service - Use case for listing apps and campaigns
use crate::application::entity_repository::EntityRepository;
use crate::domain::entity::{AppSummary, CampaignSummary, EntityKey, EntityKind};
use std::sync::Arc;

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn EntityRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_apps(&self) -> anyhow::Result<Vec<AppSummary>> {
        let mut apps = self.repository.list_apps().await?;
        apps.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(apps)
    }

    pub async fn list_campaigns(&self) -> anyhow::Result<Vec<CampaignSummary>> {
        let mut campaigns = self.repository.list_campaigns().await?;
        campaigns.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(campaigns)
    }

    /// Whether the catalog lists an entity with this kind and id
    pub async fn contains(&self, key: &EntityKey) -> anyhow::Result<bool> {
        let found = match key.kind {
            EntityKind::App => self.repository.list_apps().await?.iter().any(|a| a.id == key.id),
            EntityKind::Campaign => self
                .repository
                .list_campaigns()
                .await?
                .iter()
                .any(|c| c.id == key.id),
        };
        Ok(found)
    }
}
