use std::cell::Cell;
use std::rc::Rc;

use crossterm::event::KeyCode;

use crate::keyboard::{
    Handled, ScopeEvent, ScopeHandle, ScopeOptions, ScopeRegistry, Sequence, priority,
};

use super::app::{Action, Outbox};

/// Editable fields of the task detail modal, laid out two per row:
///
/// ```text
/// Title    Tags
/// Due      Project
/// Status
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    Title,
    Tags,
    Due,
    Project,
    Status,
}

const FIELD_COLS: usize = 2;
const FIELD_ROWS: usize = 3;

impl DetailField {
    pub const ALL: [DetailField; 5] = [
        DetailField::Title,
        DetailField::Tags,
        DetailField::Due,
        DetailField::Project,
        DetailField::Status,
    ];

    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailField::Title => "Title",
            DetailField::Tags => "Tags",
            DetailField::Due => "Due",
            DetailField::Project => "Project",
            DetailField::Status => "Status",
        }
    }
}

fn slot_at(col: usize, row: usize) -> Option<usize> {
    if col >= FIELD_COLS || row >= FIELD_ROWS {
        return None;
    }
    let slot = row * FIELD_COLS + col;
    DetailField::from_slot(slot).map(|_| slot)
}

/// Move within the field layout. Moves onto the empty slot are refused.
fn step(slot: usize, code: KeyCode) -> usize {
    let (col, row) = (slot % FIELD_COLS, slot / FIELD_COLS);
    let target = match code {
        KeyCode::Char('h') | KeyCode::Left => slot_at(col.saturating_sub(1), row),
        KeyCode::Char('l') | KeyCode::Right => slot_at((col + 1).min(FIELD_COLS - 1), row),
        KeyCode::Char('j') | KeyCode::Down => slot_at(col, (row + 1).min(FIELD_ROWS - 1)),
        KeyCode::Char('k') | KeyCode::Up => slot_at(col, row.saturating_sub(1)),
        _ => None,
    };
    target.unwrap_or(slot)
}

/// An open detail modal. Its scope sits at modal priority and is removed
/// when this value drops.
pub struct DetailModal {
    pub task: usize,
    focused: Rc<Cell<Option<usize>>>,
    _scope: ScopeHandle,
}

impl DetailModal {
    pub fn open(registry: &ScopeRegistry, outbox: Outbox, task: usize) -> Self {
        let focused = Rc::new(Cell::new(None));
        let state = Rc::clone(&focused);
        let scope = registry.register(
            move |evt: &mut ScopeEvent| {
                let input = evt.input;
                if input.has_command_modifier() || input.is_help_key() {
                    return Handled::Ignored;
                }
                // A chord the shell would act on is swallowed too.
                if matches!(
                    evt.sequence,
                    Some(Sequence::Gt | Sequence::Gp | Sequence::Ga)
                ) {
                    return Handled::Consumed;
                }
                match input.code {
                    KeyCode::Esc => outbox.borrow_mut().push(Action::CloseDetail),
                    KeyCode::Char('h' | 'j' | 'k' | 'l')
                    | KeyCode::Left
                    | KeyCode::Right
                    | KeyCode::Up
                    | KeyCode::Down => {
                        let next = match state.get() {
                            None => 0,
                            Some(slot) => step(slot, input.code),
                        };
                        state.set(Some(next));
                    }
                    KeyCode::Enter | KeyCode::Char('o') => match state.get() {
                        None => state.set(Some(0)),
                        Some(slot) => {
                            if let Some(field) = DetailField::from_slot(slot) {
                                outbox.borrow_mut().push(Action::ActivateField(field));
                            }
                        }
                    },
                    _ => {}
                }
                Handled::Consumed
            },
            ScopeOptions::with_priority(priority::MODAL),
        );
        tracing::debug!(task, "detail modal opened");
        DetailModal {
            task,
            focused,
            _scope: scope,
        }
    }

    /// The highlighted field, if any. Nothing is highlighted until the
    /// first navigation key.
    pub fn focused(&self) -> Option<DetailField> {
        self.focused.get().and_then(DetailField::from_slot)
    }
}
