mod picker;
mod prompt;

use crossterm::event::KeyEvent;

use crate::keyboard::Dispatch;

use super::app::App;

use picker::handle_picker;
use prompt::handle_prompt;

/// Route a key press. The dispatcher gets first look; keys it leaves alone
/// go to whichever text prompt or picker owns focus.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    let focus = app.focus_target();
    let outcome = app.dispatcher.handle_key(key, focus);
    app.apply_actions();

    if outcome == Dispatch::Handled {
        if !app.dispatcher.help_open() {
            app.status_message = None;
        }
        return;
    }

    if app.picker.is_some() {
        handle_picker(app, key);
    } else if app.prompt.is_some() {
        handle_prompt(app, key);
    }
}

/// Handle a bracketed paste. Only an open prompt accepts text.
pub fn handle_paste(app: &mut App, text: &str) {
    if let Some(prompt) = &mut app.prompt {
        let clean = text.replace(['\n', '\r'], " ");
        prompt.buffer.push_str(&clean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{PromptKind, View};
    use crate::tui::render::test_helpers::{app_with_tasks, ctrl_key, key};
    use crossterm::event::KeyCode;

    #[test]
    fn typing_in_prompt_bypasses_navigation() {
        let mut app = app_with_tasks(&["alpha", "beta"]);
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert!(matches!(
            app.prompt.as_ref().map(|p| &p.kind),
            Some(PromptKind::NewTask { .. })
        ));
        // `j` and `q` are text now, not navigation or quit
        for c in ['j', 'q'] {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.prompt.as_ref().map(|p| p.buffer.as_str()), Some("jq"));
        assert!(!app.should_quit);
        assert_eq!(app.list_nav().and_then(|n| n.active_index()), None);
    }

    #[test]
    fn ctrl_q_quits() {
        let mut app = app_with_tasks(&["alpha"]);
        handle_key(&mut app, ctrl_key('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn chord_switches_view() {
        let mut app = app_with_tasks(&["alpha"]);
        handle_key(&mut app, key(KeyCode::Char('g')));
        assert_eq!(app.view, View::Tasks);
        handle_key(&mut app, key(KeyCode::Char('p')));
        assert_eq!(app.view, View::Projects);
        handle_key(&mut app, key(KeyCode::Char('g')));
        handle_key(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.view, View::Tags);
    }

    #[test]
    fn paste_goes_into_prompt() {
        let mut app = app_with_tasks(&[]);
        handle_paste(&mut app, "ignored");
        handle_key(&mut app, key(KeyCode::Char('n')));
        handle_paste(&mut app, "two\nlines");
        assert_eq!(
            app.prompt.as_ref().map(|p| p.buffer.as_str()),
            Some("two lines")
        );
    }
}
