use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::App;
use crate::util::unicode::{pad_to_width, truncate_to_width};

use super::helpers::{check_symbol, task_meta_spans};

/// Render the Tasks view as a board: one column per status
pub fn render_board_view(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let Some(nav) = app.grid_nav() else {
        return;
    };
    if app.columns.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = app
        .columns
        .iter()
        .map(|_| Constraint::Ratio(1, app.columns.len() as u32))
        .collect();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let active_col = nav.active().map(|p| p.col);
    for (col, ((_, column), col_area)) in app.columns.iter().zip(areas.iter()).enumerate() {
        let border_color = if active_col == Some(col) {
            app.theme.highlight
        } else {
            app.theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color).bg(bg))
            .title(Span::styled(
                format!(" {} {} ", column.label, column.tasks.len()),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(bg));
        let inner = block.inner(*col_area);
        frame.render_widget(block, *col_area);

        let width = inner.width as usize;
        let height = inner.height as usize;
        // Two lines per card
        let per_page = (height / 2).max(1);
        let offset = match nav.active() {
            Some(p) if p.col == col && p.row >= per_page => p.row + 1 - per_page,
            _ => 0,
        };

        let mut lines: Vec<Line> = Vec::new();
        for (row, &task_index) in column.tasks.iter().enumerate().skip(offset).take(per_page) {
            let Some(task) = app.workspace.tasks.get(task_index) else {
                continue;
            };
            let active = nav.card_props(col, row).active;
            let card_bg = if active { app.theme.selection_bg } else { bg };
            let fg = if task.is_completed {
                app.theme.dim
            } else if active {
                app.theme.text_bright
            } else {
                app.theme.text
            };
            let title = format!("{} {}", check_symbol(task), task.name);
            lines.push(Line::from(Span::styled(
                pad_to_width(&title, width),
                Style::default().fg(fg).bg(card_bg),
            )));

            let mut meta = vec![Span::styled(
                format!("    {}", task.id),
                Style::default().fg(app.theme.dim).bg(card_bg),
            )];
            meta.extend(task_meta_spans(app, task, card_bg));
            let used: usize = meta
                .iter()
                .map(|s| crate::util::unicode::display_width(&s.content))
                .sum();
            if used < width {
                meta.push(Span::styled(" ".repeat(width - used), Style::default().bg(card_bg)));
            } else {
                let text: String = meta.iter().map(|s| s.content.as_ref()).collect();
                meta = vec![Span::styled(
                    truncate_to_width(&text, width),
                    Style::default().fg(app.theme.dim).bg(card_bg),
                )];
            }
            lines.push(Line::from(meta));
        }

        frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), inner);
    }
}
