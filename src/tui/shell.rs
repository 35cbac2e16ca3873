use crossterm::event::KeyCode;

use crate::keyboard::{Handled, ScopeEvent, ScopeHandle, ScopeOptions, ScopeRegistry, Sequence};

use super::app::{Action, Outbox, View};

/// Register the app-wide scope: view switching, board toggle and quit.
///
/// It sits at the lowest priority so any mounted navigator or modal sees
/// the key first.
pub fn register_shell_scope(registry: &ScopeRegistry, outbox: Outbox) -> ScopeHandle {
    registry.register(
        move |evt: &mut ScopeEvent| {
            let action = shell_action(evt);
            match action {
                Some(action) => {
                    outbox.borrow_mut().push(action);
                    Handled::Consumed
                }
                None => Handled::Ignored,
            }
        },
        ScopeOptions::default(),
    )
}

fn shell_action(evt: &ScopeEvent) -> Option<Action> {
    let input = &evt.input;
    if input.ctrl && !input.alt && !input.meta {
        return match input.code {
            KeyCode::Char('q') | KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }
    if input.has_command_modifier() {
        return None;
    }

    match evt.sequence {
        Some(Sequence::Gt) => return Some(Action::GoTo(View::Tasks)),
        Some(Sequence::Gp) => return Some(Action::GoTo(View::Projects)),
        Some(Sequence::Ga) => return Some(Action::GoTo(View::Tags)),
        _ => {}
    }

    match input.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('v') => Some(Action::ToggleViewMode),
        // Only reached when no navigator has a selection to clear
        KeyCode::Esc => Some(Action::ClearFilter),
        _ => None,
    }
}
