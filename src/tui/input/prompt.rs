use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, PromptKind};
use crate::util::unicode::pop_grapheme;

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            app.prompt = None;
        }
        (_, KeyCode::Enter) => {
            if let Some(prompt) = app.prompt.take() {
                submit_prompt(app, prompt.kind, prompt.buffer.trim());
            }
        }
        (_, KeyCode::Backspace) => {
            if let Some(prompt) = &mut app.prompt {
                pop_grapheme(&mut prompt.buffer);
            }
        }
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
            if let Some(prompt) = &mut app.prompt {
                prompt.buffer.clear();
            }
        }
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            if let Some(prompt) = &mut app.prompt {
                prompt.buffer.push(c);
            }
        }
        _ => {}
    }
}

fn submit_prompt(app: &mut App, kind: PromptKind, text: &str) {
    match kind {
        PromptKind::NewTask { status } => {
            if text.is_empty() {
                return;
            }
            let project = app.project_filter.clone();
            let index = app.workspace.add_task(text, status, project);
            let id = app.workspace.tasks[index].id.clone();
            app.set_status(format!("Created {}", id), false);
        }
        PromptKind::NewProject => {
            if text.is_empty() {
                return;
            }
            app.workspace.add_project(text);
            app.set_status(format!("Created project \"{}\"", text), false);
        }
        PromptKind::NewTag => {
            if text.is_empty() {
                return;
            }
            app.workspace.add_tag(text);
        }
        PromptKind::RenameTag(index) => {
            if text.is_empty() {
                app.set_status("Tag name cannot be empty", true);
                return;
            }
            app.workspace.rename_tag(index, text);
        }
        PromptKind::EditTitle(index) => {
            if text.is_empty() {
                app.set_status("Title cannot be empty", true);
                return;
            }
            if let Some(task) = app.workspace.tasks.get_mut(index) {
                task.name = text.to_string();
            }
        }
        PromptKind::EditTags(index) => {
            app.workspace.set_task_tags(index, text);
        }
        PromptKind::EditDue(index) => {
            let due = if text.is_empty() {
                None
            } else {
                match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                    Ok(date) => Some(date),
                    Err(_) => {
                        app.set_status(format!("Invalid date: {}", text), true);
                        return;
                    }
                }
            };
            if let Some(task) = app.workspace.tasks.get_mut(index) {
                task.due_date = due;
            }
        }
    }
    app.dirty = true;
    app.refresh();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::{app_with_tasks, key, type_text};
    use pretty_assertions::assert_eq;

    #[test]
    fn new_task_lands_in_first_open_status() {
        let mut app = app_with_tasks(&["alpha"]);
        app.open_prompt(PromptKind::NewTask { status: None }, "");
        type_text(&mut app, "beta");
        handle_prompt(&mut app, key(KeyCode::Enter));

        assert!(app.prompt.is_none());
        assert!(app.dirty);
        let task = app.workspace.tasks.last().expect("task added");
        assert_eq!(task.name, "beta");
        assert_eq!(task.status_id.as_deref(), Some("default:backlog"));
        assert_eq!(app.list_nav().map(|n| n.count()), Some(2));
    }

    #[test]
    fn backspace_and_escape() {
        let mut app = app_with_tasks(&[]);
        app.open_prompt(PromptKind::NewProject, "ab");
        handle_prompt(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.prompt.as_ref().map(|p| p.buffer.as_str()), Some("a"));
        handle_prompt(&mut app, key(KeyCode::Esc));
        assert!(app.prompt.is_none());
        assert!(app.workspace.projects.is_empty());
        assert!(!app.dirty);
    }

    #[test]
    fn invalid_due_date_is_rejected() {
        let mut app = app_with_tasks(&["alpha"]);
        app.open_prompt(PromptKind::EditDue(0), "");
        type_text(&mut app, "next week");
        handle_prompt(&mut app, key(KeyCode::Enter));
        assert_eq!(app.workspace.tasks[0].due_date, None);
        assert!(app.status_is_error);

        app.open_prompt(PromptKind::EditDue(0), "2026-03-02");
        handle_prompt(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.workspace.tasks[0].due_date,
            NaiveDate::from_ymd_opt(2026, 3, 2)
        );
    }

    #[test]
    fn edit_tags_creates_missing_tags() {
        let mut app = app_with_tasks(&["alpha"]);
        app.open_prompt(PromptKind::EditTags(0), "");
        type_text(&mut app, "bug, ui");
        handle_prompt(&mut app, key(KeyCode::Enter));
        assert_eq!(app.workspace.tasks[0].tags, vec!["bug", "ui"]);
        assert_eq!(app.workspace.tags.len(), 2);
    }
}
