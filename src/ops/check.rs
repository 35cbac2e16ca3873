use std::collections::HashMap;

use serde::Serialize;

use crate::model::Workspace;

/// Structured result from `chronic check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A validation error (something that should be fixed).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Two or more tasks share an id
    #[serde(rename = "duplicate_id")]
    DuplicateId { task_id: String, count: usize },
    /// A task points at a project that doesn't exist
    #[serde(rename = "unknown_project")]
    UnknownProject { task_id: String, project_id: String },
    /// Two statuses share an id
    #[serde(rename = "duplicate_status")]
    DuplicateStatus { status_id: String },
}

/// A validation warning (non-critical issue).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// The task's status isn't defined; it shows in the "No Status" column
    #[serde(rename = "unknown_status")]
    UnknownStatus { task_id: String, status_id: String },
    /// A task tag that has no tag entry (no color, not listed in Tags)
    #[serde(rename = "unlisted_tag")]
    UnlistedTag { task_id: String, tag: String },
    /// A tag color that isn't `#RRGGBB`
    #[serde(rename = "invalid_color")]
    InvalidColor { tag: String, color: String },
}

/// Validate a workspace and return structured results.
///
/// This is a read-only operation.
pub fn check_workspace(ws: &Workspace) -> CheckResult {
    let mut result = CheckResult::default();

    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for task in &ws.tasks {
        *id_counts.entry(task.id.as_str()).or_default() += 1;
    }
    let mut dupes: Vec<(&str, usize)> = id_counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dupes.sort();
    for (task_id, count) in dupes {
        result.errors.push(CheckError::DuplicateId {
            task_id: task_id.to_string(),
            count,
        });
    }

    let mut seen_status: Vec<&str> = Vec::new();
    for status in &ws.statuses {
        if seen_status.contains(&status.id.as_str()) {
            result.errors.push(CheckError::DuplicateStatus {
                status_id: status.id.clone(),
            });
        }
        seen_status.push(&status.id);
    }

    for task in &ws.tasks {
        if let Some(pid) = &task.project_id
            && ws.project(pid).is_none()
        {
            result.errors.push(CheckError::UnknownProject {
                task_id: task.id.clone(),
                project_id: pid.clone(),
            });
        }
        if let Some(sid) = &task.status_id
            && ws.status(sid).is_none()
        {
            result.warnings.push(CheckWarning::UnknownStatus {
                task_id: task.id.clone(),
                status_id: sid.clone(),
            });
        }
        for tag in &task.tags {
            if ws.tag_by_name(tag).is_none() {
                result.warnings.push(CheckWarning::UnlistedTag {
                    task_id: task.id.clone(),
                    tag: tag.clone(),
                });
            }
        }
    }

    for tag in &ws.tags {
        if let Some(color) = &tag.color
            && crate::tui::theme::parse_hex_color(color).is_none()
        {
            result.warnings.push(CheckWarning::InvalidColor {
                tag: tag.name.clone(),
                color: color.clone(),
            });
        }
    }

    result.valid = result.errors.is_empty();
    result
}
