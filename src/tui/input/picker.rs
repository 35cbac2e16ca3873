use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, PickerKind};

/// Keys while a picker is open. The dispatcher is suspended, so this sees
/// everything, including `j`/`k` and Escape.
pub(super) fn handle_picker(app: &mut App, key: KeyEvent) {
    let Some(picker) = &mut app.picker else {
        return;
    };
    let last = picker.options.len().saturating_sub(1);
    match key.code {
        KeyCode::Esc => app.close_picker(),
        KeyCode::Char('j') | KeyCode::Down => picker.cursor = (picker.cursor + 1).min(last),
        KeyCode::Char('k') | KeyCode::Up => picker.cursor = picker.cursor.saturating_sub(1),
        KeyCode::Home => picker.cursor = 0,
        KeyCode::End => picker.cursor = last,
        KeyCode::Enter => {
            let kind = picker.kind;
            let task = picker.task;
            let value = picker.options.get(picker.cursor).map(|(v, _)| v.clone());
            app.close_picker();
            let (Some(value), Some(t)) = (value, app.workspace.tasks.get_mut(task)) else {
                return;
            };
            match kind {
                PickerKind::Project => t.project_id = value,
                PickerKind::Status => {
                    if value.is_some() {
                        t.status_id = value;
                    }
                }
            }
            app.dirty = true;
            app.refresh();
        }
        _ => {}
    }
}
