use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, TaskViewMode, View};

/// Render the tab bar: one tab per view, with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let bg = app.theme.background;
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    for view in View::ALL {
        let is_current = app.view == view;
        let label = match view {
            View::Tasks => {
                let mode = match app.task_mode {
                    TaskViewMode::List => "list",
                    TaskViewMode::Board => "board",
                };
                format!(" {} ({}) ", view.title(), mode)
            }
            _ => format!(" {} ", view.title()),
        };
        spans.push(Span::styled(label, tab_style(app, is_current)));
        spans.push(sep.clone());
    }

    if let Some(project) = app
        .project_filter
        .as_deref()
        .and_then(|id| app.workspace.project(id))
    {
        spans.push(Span::styled(
            format!(" project: {}", project.name),
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let rule = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(rule, Style::default().fg(app.theme.border).bg(bg))),
        chunks[1],
    );
}

fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(app.theme.background)
    }
}
