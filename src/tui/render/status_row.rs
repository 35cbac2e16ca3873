use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();
    let hint: String;

    if let Some(prompt) = &app.prompt {
        // Prompt: label: text▌
        spans.push(Span::styled(
            format!("{}: ", prompt.kind.label()),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        spans.push(Span::styled(
            prompt.buffer.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
        hint = "Enter save  Esc cancel".to_string();
    } else {
        if let Some(msg) = &app.status_message {
            let color = if app.status_is_error {
                app.theme.red
            } else {
                app.theme.green
            };
            spans.push(Span::styled(msg.clone(), Style::default().fg(color).bg(bg)));
        } else if let Some(c) = app.dispatcher.pending_chord(Instant::now()) {
            spans.push(Span::styled(
                format!("{}\u{2026}", c),
                Style::default().fg(app.theme.yellow).bg(bg),
            ));
        }
        hint = if !app.config.ui.show_key_hints {
            String::new()
        } else if app.picker.is_some() {
            "j/k choose  Enter select  Esc cancel".to_string()
        } else if app.detail.is_some() {
            "hjkl field  Enter edit  Esc close".to_string()
        } else {
            match app.view {
                View::Tasks => "n new  x done  v board  ? help".to_string(),
                _ => "n new  Enter open  ? help".to_string(),
            }
        };
    }

    let content_width: usize = spans
        .iter()
        .map(|s| crate::util::unicode::display_width(&s.content))
        .sum();
    let hint_width = crate::util::unicode::display_width(&hint);
    if !hint.is_empty() && content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::*;
    use crate::tui::app::PromptKind;

    #[test]
    fn prompt_shows_label_and_buffer() {
        let mut app = app_with_tasks(&[]);
        app.open_prompt(PromptKind::NewProject, "Roadmap");
        let out = render_app(&app);
        let last = out.lines().last().unwrap_or_default();
        assert!(last.starts_with("New project: Roadmap"), "{}", last);
        assert!(last.ends_with("Esc cancel"));
    }

    #[test]
    fn status_message_replaces_chord_indicator() {
        let mut app = app_with_tasks(&[]);
        app.set_status("Saved", false);
        let out = render_app(&app);
        assert!(out.lines().last().unwrap_or_default().starts_with("Saved"));
    }
}
