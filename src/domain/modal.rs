// Create/edit modal state for groups and charts
use super::chart::{ChartConfig, ChartDraft, ChartGroup, GroupDraft};
use super::edit::EditCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// A modal is either closed or open, optionally seeded with the item being edited
#[derive(Debug, Clone, PartialEq)]
pub enum EditorModal<T> {
    Closed,
    Open { seed: Option<T> },
}

impl<T> Default for EditorModal<T> {
    fn default() -> Self {
        EditorModal::Closed
    }
}

impl<T> EditorModal<T> {
    pub fn open_create(&mut self) {
        *self = EditorModal::Open { seed: None };
    }

    pub fn open_edit(&mut self, seed: T) {
        *self = EditorModal::Open { seed: Some(seed) };
    }

    /// Discard the form without submitting it
    #[cfg(test)]
    pub fn close(&mut self) {
        *self = EditorModal::Closed;
    }

    pub fn mode(&self) -> Option<EditorMode> {
        match self {
            EditorModal::Closed => None,
            EditorModal::Open { seed: None } => Some(EditorMode::Create),
            EditorModal::Open { seed: Some(_) } => Some(EditorMode::Edit),
        }
    }

    pub fn seed(&self) -> Option<&T> {
        match self {
            EditorModal::Open { seed } => seed.as_ref(),
            EditorModal::Closed => None,
        }
    }

    fn take_seed(&mut self) -> Option<Option<T>> {
        match std::mem::take(self) {
            EditorModal::Open { seed } => Some(seed),
            EditorModal::Closed => None,
        }
    }
}

impl EditorModal<ChartGroup> {
    /// Close the modal and turn the submitted form into a command
    pub fn submit(&mut self, draft: GroupDraft) -> Option<EditCommand> {
        let command = match self.take_seed()? {
            None => EditCommand::AddGroup(draft),
            Some(group) => EditCommand::EditGroup {
                group_id: group.id,
                draft,
            },
        };
        Some(command)
    }
}

impl EditorModal<ChartConfig> {
    /// Close the modal and turn the submitted form into a command.
    /// In create mode the chart is added to `group_id`.
    pub fn submit(&mut self, group_id: &str, draft: ChartDraft) -> Option<EditCommand> {
        let command = match self.take_seed()? {
            None => EditCommand::AddChart {
                group_id: group_id.to_string(),
                draft,
            },
            Some(chart) => EditCommand::EditChart {
                chart_id: chart.id,
                draft,
            },
        };
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartKind, DataKey};

    fn draft() -> ChartDraft {
        ChartDraft {
            name: "Spend".to_string(),
            kind: ChartKind::Bar,
            x_axis: "date".to_string(),
            y_axis: vec!["spend".to_string()],
            data_key: DataKey::Campaign,
        }
    }

    #[test]
    fn test_modal_transitions() {
        let mut modal: EditorModal<ChartGroup> = EditorModal::default();
        assert_eq!(modal.mode(), None);

        modal.open_create();
        assert_eq!(modal.mode(), Some(EditorMode::Create));

        let group = ChartGroup::new("Revenue".to_string(), 0);
        modal.open_edit(group.clone());
        assert_eq!(modal.mode(), Some(EditorMode::Edit));
        assert_eq!(modal.seed(), Some(&group));

        modal.close();
        assert_eq!(modal, EditorModal::Closed);
    }

    #[test]
    fn test_group_submit_create_and_edit() {
        let mut modal: EditorModal<ChartGroup> = EditorModal::default();
        modal.open_create();
        let command = modal.submit(GroupDraft { name: "Ads".to_string() });
        assert_eq!(command, Some(EditCommand::AddGroup(GroupDraft { name: "Ads".to_string() })));
        assert_eq!(modal.mode(), None);

        let group = ChartGroup::new("Ads".to_string(), 0);
        modal.open_edit(group.clone());
        let command = modal.submit(GroupDraft { name: "Ad Network".to_string() });
        assert_eq!(
            command,
            Some(EditCommand::EditGroup {
                group_id: group.id,
                draft: GroupDraft { name: "Ad Network".to_string() },
            })
        );
    }

    #[test]
    fn test_chart_submit_uses_seed_id() {
        let mut modal: EditorModal<ChartConfig> = EditorModal::default();
        let chart = ChartConfig::from_draft(draft(), "g1", 0);
        modal.open_edit(chart.clone());

        let command = modal.submit("ignored", draft());
        assert_eq!(
            command,
            Some(EditCommand::EditChart {
                chart_id: chart.id,
                draft: draft(),
            })
        );
    }

    #[test]
    fn test_submit_on_closed_modal_does_nothing() {
        let mut modal: EditorModal<ChartConfig> = EditorModal::default();
        assert_eq!(modal.submit("g1", draft()), None);
    }
}
