use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Task;
use crate::tui::app::App;
use crate::tui::detail::DetailField;
use crate::util::unicode::pad_to_width;

use super::helpers::centered_rect;

const FIELD_WIDTH: usize = 28;

/// Render the task detail modal over the content area
pub fn render_detail_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = &app.detail else {
        return;
    };
    let Some(task) = app.workspace.tasks.get(detail.task) else {
        return;
    };
    let popup = centered_rect(80, 60, area);
    frame.render_widget(Clear, popup);

    let bg = app.theme.background;
    let focused = detail.focused();
    let label_style = Style::default().fg(app.theme.dim).bg(bg);

    let cell = |field: DetailField| -> Vec<Span<'static>> {
        let active = focused == Some(field);
        let value_style = if active {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        vec![
            Span::styled(format!("{:<9}", field.label()), label_style),
            Span::styled(pad_to_width(&field_value(app, task, field), FIELD_WIDTH), value_style),
        ]
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", task.id),
        Style::default().fg(app.theme.dim).bg(bg),
    ))];
    lines.push(Line::from(""));
    for pair in DetailField::ALL.chunks(2) {
        let mut spans = vec![Span::styled(" ", label_style)];
        for (i, &field) in pair.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", label_style));
            }
            spans.extend(cell(field));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " hjkl move  Enter edit  Esc close",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            format!(" {} ", task.name),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn field_value(app: &App, task: &Task, field: DetailField) -> String {
    match field {
        DetailField::Title => task.name.clone(),
        DetailField::Tags => {
            if task.tags.is_empty() {
                "-".to_string()
            } else {
                task.tags.join(", ")
            }
        }
        DetailField::Due => task
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        DetailField::Project => task
            .project_id
            .as_deref()
            .and_then(|id| app.workspace.project(id))
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "(none)".to_string()),
        DetailField::Status => task
            .status_id
            .as_deref()
            .and_then(|id| app.workspace.status(id))
            .map(|s| s.label.clone())
            .unwrap_or_else(|| "No Status".to_string()),
    }
}
