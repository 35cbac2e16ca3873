use serde::Serialize;

use crate::keyboard::help::{HELP_SECTIONS, HelpSection};
use crate::ops::check::{CheckError, CheckResult, CheckWarning};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct KeysJson {
    pub chord_timeout_ms: u64,
    pub sections: &'static [HelpSection],
}

pub fn keys_json(chord_timeout_ms: u64) -> KeysJson {
    KeysJson {
        chord_timeout_ms,
        sections: HELP_SECTIONS,
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn format_check_error(err: &CheckError) -> String {
    match err {
        CheckError::DuplicateId { task_id, count } => {
            format!("  {} is used by {} tasks", task_id, count)
        }
        CheckError::UnknownProject {
            task_id,
            project_id,
        } => format!("  {} belongs to missing project {}", task_id, project_id),
        CheckError::DuplicateStatus { status_id } => {
            format!("  status {} is defined more than once", status_id)
        }
    }
}

pub fn format_check_warning(warn: &CheckWarning) -> String {
    match warn {
        CheckWarning::UnknownStatus { task_id, status_id } => {
            format!("  {} has unknown status {}", task_id, status_id)
        }
        CheckWarning::UnlistedTag { task_id, tag } => {
            format!("  {} uses unlisted tag #{}", task_id, tag)
        }
        CheckWarning::InvalidColor { tag, color } => {
            format!("  tag #{} has invalid color \"{}\"", tag, color)
        }
    }
}

/// Full human-readable check report
pub fn format_check_report(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();
    if !result.errors.is_empty() {
        lines.push("Errors:".to_string());
        lines.extend(result.errors.iter().map(format_check_error));
    }
    if !result.warnings.is_empty() {
        if !result.errors.is_empty() {
            lines.push(String::new());
        }
        lines.push("Warnings:".to_string());
        lines.extend(result.warnings.iter().map(format_check_warning));
    }
    if lines.is_empty() {
        lines.push("OK".to_string());
    }
    lines
}
