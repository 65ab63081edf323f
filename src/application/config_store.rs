// Chart configuration store - global template plus per-entity copies
use crate::application::config_repository::ConfigRepository;
use crate::domain::chart::ChartGroup;
use crate::domain::dataset::check_fields;
use crate::domain::edit::EditError;
use crate::domain::entity::{EntityKey, EntityKind};
use crate::domain::template::{clone_with_fresh_ids, default_template};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

pub const GLOBAL_KEY: &str = "global-chart-configs";

type EntityConfigs = BTreeMap<String, Vec<ChartGroup>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid chart configuration: {0}")]
    Invalid(String),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("failed to persist chart configuration")]
    Persist(#[source] anyhow::Error),
}

struct ConfigState {
    global: Vec<ChartGroup>,
    entities: HashMap<EntityKind, EntityConfigs>,
}

/// Owns the global template and every materialized per-entity configuration.
///
/// State lives in memory behind one lock and the touched tier is written
/// back to the repository on every change, so reads and writes are applied
/// in call order.
pub struct ChartConfigStore {
    repository: Arc<dyn ConfigRepository>,
    state: Mutex<ConfigState>,
}

impl ChartConfigStore {
    /// Read both tiers from the repository, falling back to defaults for
    /// values that are missing, blank or unparseable.
    pub async fn load(repository: Arc<dyn ConfigRepository>) -> anyhow::Result<Self> {
        let global = match repository.load(GLOBAL_KEY).await? {
            Some(raw) if !raw.trim().is_empty() => {
                parse_or_warn::<Vec<ChartGroup>>(GLOBAL_KEY, &raw).unwrap_or_else(default_template)
            }
            _ => {
                tracing::info!("No stored global chart template, using built-in defaults");
                default_template()
            }
        };

        let mut entities = HashMap::new();
        for kind in EntityKind::ALL {
            let key = kind.storage_key();
            let configs = match repository.load(key).await? {
                Some(raw) if !raw.trim().is_empty() => {
                    parse_or_warn::<EntityConfigs>(key, &raw).unwrap_or_default()
                }
                _ => EntityConfigs::new(),
            };
            tracing::debug!("Loaded {} stored {:?} chart configurations", configs.len(), kind);
            entities.insert(kind, configs);
        }

        Ok(Self {
            repository,
            state: Mutex::new(ConfigState { global, entities }),
        })
    }

    pub async fn global_configs(&self) -> Vec<ChartGroup> {
        self.state.lock().await.global.clone()
    }

    /// The entity's own configuration. On first request it is cloned from
    /// the global template with fresh ids and stored.
    pub async fn configs_for_entity(&self, key: &EntityKey) -> Vec<ChartGroup> {
        let mut state = self.state.lock().await;
        self.materialize(&mut state, key).await.clone()
    }

    /// Replace the global template. Entities that already have their own
    /// configuration keep it.
    pub async fn update_global_configs(&self, groups: Vec<ChartGroup>) -> Result<(), StoreError> {
        validate_groups(&groups)?;

        let mut state = self.state.lock().await;
        self.persist(GLOBAL_KEY, &groups).await?;
        state.global = groups;
        tracing::info!("Replaced global chart template ({} groups)", state.global.len());
        Ok(())
    }

    pub async fn update_entity_configs(
        &self,
        key: &EntityKey,
        groups: Vec<ChartGroup>,
    ) -> Result<(), StoreError> {
        validate_groups(&groups)?;

        let mut state = self.state.lock().await;
        let mut configs = state.entities.get(&key.kind).cloned().unwrap_or_default();
        configs.insert(key.id.clone(), groups);
        self.persist(key.kind.storage_key(), &configs).await?;
        state.entities.insert(key.kind, configs);
        tracing::debug!("Replaced chart configuration for {}", key);
        Ok(())
    }

    /// Run `edit` against the entity's configuration under the store lock.
    /// The result is stored only when `edit` succeeds.
    pub async fn modify_entity_configs<T, F>(
        &self,
        key: &EntityKey,
        edit: F,
    ) -> Result<(Vec<ChartGroup>, T), StoreError>
    where
        F: FnOnce(&mut Vec<ChartGroup>) -> Result<T, EditError>,
    {
        let mut state = self.state.lock().await;
        let mut groups = self.materialize(&mut state, key).await.clone();
        let output = edit(&mut groups)?;

        let mut configs = state.entities.get(&key.kind).cloned().unwrap_or_default();
        configs.insert(key.id.clone(), groups.clone());
        self.persist(key.kind.storage_key(), &configs).await?;
        state.entities.insert(key.kind, configs);
        Ok((groups, output))
    }

    /// Drop the entity's own configuration; the next read clones the
    /// current global template again. Returns whether anything was removed.
    pub async fn reset_entity_configs(&self, key: &EntityKey) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let mut configs = state.entities.get(&key.kind).cloned().unwrap_or_default();
        if configs.remove(&key.id).is_none() {
            return Ok(false);
        }
        self.persist(key.kind.storage_key(), &configs).await?;
        state.entities.insert(key.kind, configs);
        tracing::info!("Reset chart configuration for {}", key);
        Ok(true)
    }

    async fn materialize<'a>(
        &self,
        state: &'a mut ConfigState,
        key: &EntityKey,
    ) -> &'a Vec<ChartGroup> {
        let ConfigState { global, entities } = state;
        let configs = entities.entry(key.kind).or_default();

        if !configs.contains_key(&key.id) {
            let cloned = clone_with_fresh_ids(global);
            tracing::info!(
                "Materialized chart configuration for {} from template ({} groups)",
                key,
                cloned.len()
            );
            configs.insert(key.id.clone(), cloned);

            if let Err(e) = self.persist(key.kind.storage_key(), &*configs).await {
                tracing::warn!("Keeping unsaved chart configuration for {}: {:#}", key, e);
            }
        }

        &configs[&key.id]
    }

    async fn persist<T: serde::Serialize>(
        &self,
        storage_key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::Persist(e.into()))?;
        self.repository
            .save(storage_key, &raw)
            .await
            .map_err(StoreError::Persist)
    }
}

fn parse_or_warn<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring unreadable stored value for {}: {}", key, e);
            None
        }
    }
}

/// Structural checks applied before a whole configuration list is stored
pub fn validate_groups(groups: &[ChartGroup]) -> Result<(), StoreError> {
    let mut ids = HashSet::new();

    for group in groups {
        if group.name.trim().is_empty() {
            return Err(StoreError::Invalid(format!("group '{}' has an empty name", group.id)));
        }
        if !ids.insert(group.id.as_str()) {
            return Err(StoreError::Invalid(format!("duplicate id '{}'", group.id)));
        }

        for chart in &group.charts {
            if chart.name.trim().is_empty() {
                return Err(StoreError::Invalid(format!("chart '{}' has an empty name", chart.id)));
            }
            if !ids.insert(chart.id.as_str()) {
                return Err(StoreError::Invalid(format!("duplicate id '{}'", chart.id)));
            }
            if chart.group_id != group.id {
                return Err(StoreError::Invalid(format!(
                    "chart '{}' points at group '{}' but is stored in '{}'",
                    chart.id, chart.group_id, group.id
                )));
            }
            check_fields(chart)
                .map_err(|e| StoreError::Invalid(format!("chart '{}': {}", chart.id, e)))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartConfig, ChartKind, DataKey};
    use crate::infrastructure::memory_repository::MemoryConfigRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Reads from memory; saves fail while `failing` is set
    #[derive(Default)]
    struct FailingRepository {
        inner: MemoryConfigRepository,
        failing: AtomicBool,
    }

    impl FailingRepository {
        fn fail_saves(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl ConfigRepository for FailingRepository {
        async fn load(&self, key: &str) -> anyhow::Result<Option<String>> {
            self.inner.load(key).await
        }

        async fn save(&self, key: &str, value: &str) -> anyhow::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                anyhow::bail!("disk full");
            }
            self.inner.save(key, value).await
        }
    }

    fn revenue_template() -> Vec<ChartGroup> {
        vec![ChartGroup {
            id: "g1".to_string(),
            name: "Revenue".to_string(),
            order: 0,
            charts: vec![ChartConfig {
                id: "c1".to_string(),
                name: "Rev".to_string(),
                kind: ChartKind::Line,
                x_axis: "date".to_string(),
                y_axis: vec!["revenue".to_string()],
                group_id: "g1".to_string(),
                order: 0,
                data_key: DataKey::Revenue,
            }],
        }]
    }

    async fn store_with(repository: Arc<MemoryConfigRepository>) -> ChartConfigStore {
        ChartConfigStore::load(repository).await.unwrap()
    }

    #[tokio::test]
    async fn test_missing_values_fall_back_to_defaults() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        assert_eq!(store.global_configs().await, default_template());
    }

    #[tokio::test]
    async fn test_corrupt_values_are_treated_as_absent() {
        let repository = Arc::new(MemoryConfigRepository::new());
        repository.insert(GLOBAL_KEY, "{not json").unwrap();
        repository.insert("app-chart-configs", "[1, 2").unwrap();

        let store = store_with(repository).await;
        assert_eq!(store.global_configs().await, default_template());

        let groups = store.configs_for_entity(&EntityKey::app("a1")).await;
        assert_eq!(groups.len(), default_template().len());
    }

    #[tokio::test]
    async fn test_stored_empty_template_is_respected() {
        let repository = Arc::new(MemoryConfigRepository::new());
        repository.insert(GLOBAL_KEY, "[]").unwrap();

        let store = store_with(repository).await;
        assert!(store.global_configs().await.is_empty());
        assert!(store.configs_for_entity(&EntityKey::app("a1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_first_read_materializes_then_is_idempotent() {
        let repository = Arc::new(MemoryConfigRepository::new());
        let store = store_with(repository.clone()).await;
        store.update_global_configs(revenue_template()).await.unwrap();

        let key = EntityKey::app("app-42");
        let first = store.configs_for_entity(&key).await;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Revenue");
        assert_eq!(first[0].charts.len(), 1);
        assert_eq!(first[0].charts[0].name, "Rev");
        assert_ne!(first[0].id, "g1");
        assert_ne!(first[0].charts[0].id, "c1");

        let second = store.configs_for_entity(&key).await;
        assert_eq!(first, second);

        let persisted = repository.get("app-chart-configs").unwrap();
        let stored: EntityConfigs = serde_json::from_str(&persisted).unwrap();
        assert_eq!(stored["app-42"], first);
    }

    #[tokio::test]
    async fn test_clones_are_independent() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        store.update_global_configs(revenue_template()).await.unwrap();

        let mut mine = store.configs_for_entity(&EntityKey::app("a1")).await;
        mine[0].name = "Mutated".to_string();
        mine[0].charts.clear();

        let other = store.configs_for_entity(&EntityKey::app("a2")).await;
        assert_eq!(other[0].name, "Revenue");
        assert_eq!(other[0].charts.len(), 1);
        assert_eq!(store.global_configs().await, revenue_template());

        let ids: HashSet<String> = mine
            .iter()
            .chain(other.iter())
            .map(|g| g.id.clone())
            .collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_global_update_does_not_touch_materialized_entities() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        let key = EntityKey::campaign("cmp-1");
        let before = store.configs_for_entity(&key).await;

        store.update_global_configs(revenue_template()).await.unwrap();

        assert_eq!(store.configs_for_entity(&key).await, before);
        assert_eq!(store.configs_for_entity(&EntityKey::campaign("cmp-2")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_app_and_campaign_ids_do_not_collide() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        let app = EntityKey::app("42");
        store.update_entity_configs(&app, Vec::new()).await.unwrap();

        assert!(store.configs_for_entity(&app).await.is_empty());
        assert!(!store.configs_for_entity(&EntityKey::campaign("42")).await.is_empty());
    }

    #[tokio::test]
    async fn test_state_survives_reload() {
        let repository = Arc::new(MemoryConfigRepository::new());
        let key = EntityKey::app("a1");

        let first = {
            let store = store_with(repository.clone()).await;
            store.update_global_configs(revenue_template()).await.unwrap();
            store.configs_for_entity(&key).await
        };

        let store = store_with(repository).await;
        assert_eq!(store.global_configs().await, revenue_template());
        assert_eq!(store.configs_for_entity(&key).await, first);
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_groups() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        let mut groups = revenue_template();
        groups[0].charts[0].group_id = "elsewhere".to_string();

        let err = store.update_global_configs(groups).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert_eq!(store.global_configs().await, default_template());
    }

    #[tokio::test]
    async fn test_modify_is_not_stored_on_error() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        let key = EntityKey::app("a1");
        let before = store.configs_for_entity(&key).await;

        let result = store
            .modify_entity_configs(&key, |groups| {
                groups.clear();
                Err::<(), _>(EditError::GroupNotFound("x".to_string()))
            })
            .await;

        assert!(matches!(result, Err(StoreError::Edit(EditError::GroupNotFound(_)))));
        assert_eq!(store.configs_for_entity(&key).await, before);
    }

    #[tokio::test]
    async fn test_reset_rematerializes_from_template() {
        let store = store_with(Arc::new(MemoryConfigRepository::new())).await;
        let key = EntityKey::app("a1");
        store.configs_for_entity(&key).await;
        store.update_global_configs(revenue_template()).await.unwrap();

        assert!(store.reset_entity_configs(&key).await.unwrap());
        assert!(!store.reset_entity_configs(&key).await.unwrap());
        assert_eq!(store.configs_for_entity(&key).await[0].name, "Revenue");
        assert_eq!(store.configs_for_entity(&key).await.len(), 1);
    }

    #[tokio::test]
    async fn test_materialization_survives_failed_save() {
        let repository = Arc::new(FailingRepository::default());
        let store = ChartConfigStore::load(repository.clone()).await.unwrap();
        repository.fail_saves(true);

        let key = EntityKey::app("app-1");
        let first = store.configs_for_entity(&key).await;
        assert_eq!(first.len(), default_template().len());
        assert_eq!(repository.inner.get("app-chart-configs"), None);

        // Kept in memory, so the ids stay stable across reads
        assert_eq!(store.configs_for_entity(&key).await, first);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_memory_unchanged() {
        let repository = Arc::new(FailingRepository::default());
        let store = ChartConfigStore::load(repository.clone()).await.unwrap();
        let key = EntityKey::campaign("cmp-1");
        let before = store.configs_for_entity(&key).await;
        repository.fail_saves(true);

        let err = store.update_global_configs(revenue_template()).await.unwrap_err();
        assert!(matches!(err, StoreError::Persist(_)));
        assert_eq!(store.global_configs().await, default_template());

        let err = store.update_entity_configs(&key, Vec::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Persist(_)));

        let result = store
            .modify_entity_configs(&key, |groups| {
                groups.clear();
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(StoreError::Persist(_))));

        assert!(matches!(
            store.reset_entity_configs(&key).await,
            Err(StoreError::Persist(_))
        ));
        assert_eq!(store.configs_for_entity(&key).await, before);

        repository.fail_saves(false);
        store.update_entity_configs(&key, Vec::new()).await.unwrap();
        assert!(store.configs_for_entity(&key).await.is_empty());
    }
}
