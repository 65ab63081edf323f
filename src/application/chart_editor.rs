// Chart editor service - Use case for editing an entity's groups and charts
use crate::application::config_store::{ChartConfigStore, StoreError};
use crate::domain::chart::{ChartConfig, ChartDraft, ChartGroup, GroupDraft};
use crate::domain::edit::{apply, EditCommand, EditError};
use crate::domain::entity::EntityKey;
use crate::domain::modal::EditorModal;
use serde::Serialize;
use std::sync::Arc;

/// The entity's configuration after an edit and the tab to show next
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub groups: Vec<ChartGroup>,
    pub active_group_id: Option<String>,
}

#[derive(Clone)]
pub struct ChartEditorService {
    store: Arc<ChartConfigStore>,
}

impl ChartEditorService {
    pub fn new(store: Arc<ChartConfigStore>) -> Self {
        Self { store }
    }

    pub async fn apply(
        &self,
        key: &EntityKey,
        command: EditCommand,
    ) -> Result<EditOutcome, StoreError> {
        tracing::debug!("Applying {:?} to {}", command, key);

        let (groups, active_group_id) = self
            .store
            .modify_entity_configs(key, |groups| apply(groups, command))
            .await?;

        Ok(EditOutcome {
            groups,
            active_group_id,
        })
    }

    /// Group form opened for editing, seeded with the stored group
    pub async fn group_form(
        &self,
        key: &EntityKey,
        group_id: &str,
    ) -> Result<EditorModal<ChartGroup>, StoreError> {
        let group = self
            .store
            .configs_for_entity(key)
            .await
            .into_iter()
            .find(|g| g.id == group_id)
            .ok_or_else(|| EditError::GroupNotFound(group_id.to_string()))?;

        let mut form = EditorModal::default();
        form.open_edit(group);
        Ok(form)
    }

    /// Chart form opened for editing, seeded with the stored chart
    pub async fn chart_form(
        &self,
        key: &EntityKey,
        chart_id: &str,
    ) -> Result<EditorModal<ChartConfig>, StoreError> {
        let chart = self
            .store
            .configs_for_entity(key)
            .await
            .into_iter()
            .flat_map(|g| g.charts)
            .find(|c| c.id == chart_id)
            .ok_or_else(|| EditError::ChartNotFound(chart_id.to_string()))?;

        let mut form = EditorModal::default();
        form.open_edit(chart);
        Ok(form)
    }

    /// Submit a group form: create when it was opened empty, rename when seeded
    pub async fn submit_group(
        &self,
        key: &EntityKey,
        form: &mut EditorModal<ChartGroup>,
        draft: GroupDraft,
    ) -> Result<EditOutcome, StoreError> {
        let mode = form.mode();
        let command = form
            .submit(draft)
            .ok_or_else(|| StoreError::Invalid("group form is not open".to_string()))?;

        tracing::debug!("Submitting {:?} group form for {}", mode, key);
        self.apply(key, command).await
    }

    /// Submit a chart form. A new chart is added to `group_id`.
    pub async fn submit_chart(
        &self,
        key: &EntityKey,
        form: &mut EditorModal<ChartConfig>,
        group_id: &str,
        draft: ChartDraft,
    ) -> Result<EditOutcome, StoreError> {
        let mode = form.mode();
        let command = form
            .submit(group_id, draft)
            .ok_or_else(|| StoreError::Invalid("chart form is not open".to_string()))?;

        tracing::debug!("Submitting {:?} chart form for {}", mode, key);
        self.apply(key, command).await
    }
}
