use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

use crate::model::{Task, format_due_label};
use crate::tui::app::App;

/// Checkbox for a task's completion state
pub(super) fn check_symbol(task: &Task) -> &'static str {
    if task.is_completed { "[x]" } else { "[ ]" }
}

/// Spans for a task's tags (`#name`) and due label, each preceded by a space.
pub(super) fn task_meta_spans(app: &App, task: &Task, bg: Color) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for tag in &task.tags {
        spans.push(Span::styled(
            format!(" #{}", tag),
            Style::default().fg(app.theme.tag_color(&app.workspace, tag)).bg(bg),
        ));
    }
    if let Some(due) = task.due_date {
        let today = chrono::Local::now().date_naive();
        let color = if due < today {
            app.theme.red
        } else {
            app.theme.dim
        };
        spans.push(Span::styled(
            format!(" {}", format_due_label(due, today)),
            Style::default().fg(color).bg(bg),
        ));
    }
    spans
}

/// Create a centered rectangle of the given percentage of the parent
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
