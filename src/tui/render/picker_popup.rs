use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, PickerKind};

/// Render the project/status picker as a small box near the top of `area`
pub fn render_picker_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = &app.picker else {
        return;
    };
    let bg = app.theme.background;

    let width = picker
        .options
        .iter()
        .map(|(_, label)| crate::util::unicode::display_width(label))
        .max()
        .unwrap_or(0)
        .max(16) as u16
        + 6;
    let height = picker.options.len() as u16 + 2;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + 2,
        width: width.min(area.width),
        height: height.min(area.height.saturating_sub(2)),
    };
    frame.render_widget(Clear, popup);

    let lines: Vec<Line> = picker
        .options
        .iter()
        .enumerate()
        .map(|(i, (_, label))| {
            if i == picker.cursor {
                Line::from(Span::styled(
                    format!(" \u{25B8} {}", label),
                    Style::default()
                        .fg(app.theme.text_bright)
                        .bg(app.theme.selection_bg)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("   {}", label),
                    Style::default().fg(app.theme.text).bg(bg),
                ))
            }
        })
        .collect();

    let title = match picker.kind {
        PickerKind::Project => " Project ",
        PickerKind::Status => " Status ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(title)
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
