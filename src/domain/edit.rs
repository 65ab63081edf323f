// Group and chart edits over one entity's configuration list
use super::chart::{sorted_groups, ChartConfig, ChartDraft, ChartGroup, GroupDraft};
use super::dataset::{check_axes, BindingError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("group '{0}' not found")]
    GroupNotFound(String),
    #[error("chart '{0}' not found")]
    ChartNotFound(String),
    #[error("name must not be empty")]
    EmptyName,
    #[error(transparent)]
    Binding(#[from] BindingError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    AddGroup(GroupDraft),
    EditGroup { group_id: String, draft: GroupDraft },
    DeleteGroup { group_id: String },
    AddChart { group_id: String, draft: ChartDraft },
    EditChart { chart_id: String, draft: ChartDraft },
    DeleteChart { chart_id: String },
}

/// Applies a command to `groups`. On error the list is left untouched.
///
/// Returns the group that should be active afterwards: the group touched by
/// the command, or after a group delete the first remaining group (`None`
/// when the list is now empty).
pub fn apply(
    groups: &mut Vec<ChartGroup>,
    command: EditCommand,
) -> Result<Option<String>, EditError> {
    match command {
        EditCommand::AddGroup(draft) => add_group(groups, draft).map(|g| Some(g.id.clone())),
        EditCommand::EditGroup { group_id, draft } => {
            edit_group(groups, &group_id, draft)?;
            Ok(Some(group_id))
        }
        EditCommand::DeleteGroup { group_id } => delete_group(groups, &group_id),
        EditCommand::AddChart { group_id, draft } => {
            add_chart(groups, &group_id, draft)?;
            Ok(Some(group_id))
        }
        EditCommand::EditChart { chart_id, draft } => {
            edit_chart(groups, &chart_id, draft).map(|c| Some(c.group_id.clone()))
        }
        EditCommand::DeleteChart { chart_id } => {
            delete_chart(groups, &chart_id).map(|c| Some(c.group_id))
        }
    }
}

pub fn add_group(
    groups: &mut Vec<ChartGroup>,
    draft: GroupDraft,
) -> Result<&ChartGroup, EditError> {
    let name = require_name(draft.name)?;
    let order = groups.len() as u32;
    groups.push(ChartGroup::new(name, order));
    Ok(&groups[groups.len() - 1])
}

pub fn edit_group(
    groups: &mut [ChartGroup],
    group_id: &str,
    draft: GroupDraft,
) -> Result<(), EditError> {
    let name = require_name(draft.name)?;
    let group = find_group(groups, group_id)?;
    group.name = name;
    Ok(())
}

/// Removes a group with all of its charts
pub fn delete_group(
    groups: &mut Vec<ChartGroup>,
    group_id: &str,
) -> Result<Option<String>, EditError> {
    let index = groups
        .iter()
        .position(|g| g.id == group_id)
        .ok_or_else(|| EditError::GroupNotFound(group_id.to_string()))?;
    groups.remove(index);

    Ok(sorted_groups(groups).first().map(|g| g.id.clone()))
}

pub fn add_chart<'a>(
    groups: &'a mut [ChartGroup],
    group_id: &str,
    draft: ChartDraft,
) -> Result<&'a ChartConfig, EditError> {
    let draft = validate_draft(draft)?;
    let group = find_group(groups, group_id)?;

    let order = group.charts.len() as u32;
    group.charts.push(ChartConfig::from_draft(draft, group_id, order));
    Ok(&group.charts[group.charts.len() - 1])
}

/// Replaces a chart's content; its id, group and order stay as they were
pub fn edit_chart<'a>(
    groups: &'a mut [ChartGroup],
    chart_id: &str,
    draft: ChartDraft,
) -> Result<&'a ChartConfig, EditError> {
    let draft = validate_draft(draft)?;
    let chart = groups
        .iter_mut()
        .flat_map(|g| g.charts.iter_mut())
        .find(|c| c.id == chart_id)
        .ok_or_else(|| EditError::ChartNotFound(chart_id.to_string()))?;

    chart.apply_draft(draft);
    Ok(chart)
}

/// Removes exactly one chart. Sibling charts keep their ids and order.
pub fn delete_chart(groups: &mut [ChartGroup], chart_id: &str) -> Result<ChartConfig, EditError> {
    for group in groups.iter_mut() {
        if let Some(index) = group.charts.iter().position(|c| c.id == chart_id) {
            return Ok(group.charts.remove(index));
        }
    }
    Err(EditError::ChartNotFound(chart_id.to_string()))
}

fn find_group<'a>(
    groups: &'a mut [ChartGroup],
    group_id: &str,
) -> Result<&'a mut ChartGroup, EditError> {
    groups
        .iter_mut()
        .find(|g| g.id == group_id)
        .ok_or_else(|| EditError::GroupNotFound(group_id.to_string()))
}

fn require_name(name: String) -> Result<String, EditError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EditError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_draft(mut draft: ChartDraft) -> Result<ChartDraft, EditError> {
    draft.name = require_name(draft.name)?;
    check_axes(draft.data_key, &draft.x_axis, &draft.y_axis)?;
    Ok(draft)
}
