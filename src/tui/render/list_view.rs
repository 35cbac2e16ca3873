use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::util::unicode::truncate_to_width;

use super::helpers::{check_symbol, task_meta_spans};

/// Render the task list (Tasks view, list mode)
pub fn render_task_list(frame: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<String> = app
        .rows
        .iter()
        .filter_map(|&i| app.workspace.tasks.get(i))
        .map(|task| {
            let status = task
                .status_id
                .as_deref()
                .and_then(|s| app.workspace.status(s))
                .map(|s| format!("  ({})", s.label))
                .unwrap_or_default();
            format!("{} {:<6}{}{}", check_symbol(task), task.id, task.name, status)
        })
        .collect();
    let meta: Vec<Vec<Span<'static>>> = app
        .rows
        .iter()
        .filter_map(|&i| app.workspace.tasks.get(i))
        .map(|task| task_meta_spans(app, task, app.theme.background))
        .collect();
    render_rows(frame, app, area, rows, meta, "No tasks. Press n to add one.");
}

/// Render the Projects view. Item 0 is the "New Project" tile.
pub fn render_project_list(frame: &mut Frame, app: &App, area: Rect) {
    let mut rows = vec!["+ New Project".to_string()];
    for &i in &app.rows {
        let Some(project) = app.workspace.projects.get(i) else {
            continue;
        };
        let open = app
            .workspace
            .tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project.id.as_str()) && !t.is_completed)
            .count();
        rows.push(format!("{:<6}{}  {} open", project.id, project.name, open));
    }
    let meta = vec![Vec::new(); rows.len()];
    render_rows(frame, app, area, rows, meta, "");
}

/// Render the Tags view
pub fn render_tag_list(frame: &mut Frame, app: &App, area: Rect) {
    let mut rows = Vec::new();
    let mut meta = Vec::new();
    for &i in &app.rows {
        let Some(tag) = app.workspace.tags.get(i) else {
            continue;
        };
        let used = app
            .workspace
            .tasks
            .iter()
            .filter(|t| t.tags.iter().any(|n| n.eq_ignore_ascii_case(&tag.name)))
            .count();
        rows.push(format!("#{}", tag.name));
        meta.push(vec![Span::styled(
            format!("  {} tasks", used),
            Style::default().fg(app.theme.dim),
        )]);
    }
    render_rows(frame, app, area, rows, meta, "No tags. Press n to add one.");
}

/// Lay out rows, highlighting the active item and scrolling it into view.
fn render_rows(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    rows: Vec<String>,
    meta: Vec<Vec<Span<'static>>>,
    empty_hint: &str,
) {
    let bg = app.theme.background;
    if rows.is_empty() {
        let hint = Span::styled(
            format!(" {}", empty_hint),
            Style::default().fg(app.theme.dim).bg(bg),
        );
        frame.render_widget(Paragraph::new(hint), area);
        return;
    }

    let Some(nav) = app.list_nav() else {
        return;
    };
    let height = area.height as usize;
    let offset = match nav.active_index() {
        Some(active) if active >= height => active + 1 - height,
        _ => 0,
    };
    let width = area.width as usize;

    let lines: Vec<Line> = rows
        .into_iter()
        .zip(meta)
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, (text, meta))| {
            let active = nav.item_props(i).active;
            let (row_bg, fg) = if active {
                (app.theme.selection_bg, app.theme.text_bright)
            } else {
                (bg, app.theme.text)
            };
            let marker = if active { "\u{25B8} " } else { "  " };
            let mut line = vec![
                Span::styled(marker, Style::default().fg(app.theme.highlight).bg(row_bg)),
                Span::styled(
                    truncate_to_width(&text, width.saturating_sub(2)),
                    if active {
                        Style::default().fg(fg).bg(row_bg).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(fg).bg(row_bg)
                    },
                ),
            ];
            line.extend(meta.into_iter().map(|s| {
                let style = s.style.bg(row_bg);
                s.style(style)
            }));
            Line::from(line)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
