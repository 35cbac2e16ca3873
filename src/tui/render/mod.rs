pub mod board_view;
pub mod detail_popup;
pub mod help_overlay;
mod helpers;
pub mod list_view;
pub mod picker_popup;
pub mod status_row;
pub mod tab_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, TaskViewMode, View};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: tab bar (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // tab bar + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    tab_bar::render_tab_bar(frame, app, chunks[0]);

    match (app.view, app.task_mode) {
        (View::Tasks, TaskViewMode::Board) => board_view::render_board_view(frame, app, chunks[1]),
        (View::Tasks, TaskViewMode::List) => list_view::render_task_list(frame, app, chunks[1]),
        (View::Projects, _) => list_view::render_project_list(frame, app, chunks[1]),
        (View::Tags, _) => list_view::render_tag_list(frame, app, chunks[1]),
    }

    if app.detail.is_some() {
        detail_popup::render_detail_popup(frame, app, chunks[1]);
    }

    if app.picker.is_some() {
        picker_popup::render_picker_popup(frame, app, chunks[1]);
    }

    // Help overlay (rendered on top of everything)
    if app.dispatcher.help_open() {
        help_overlay::render_help_overlay(frame, app, frame.area());
    }

    status_row::render_status_row(frame, app, chunks[2]);
}
