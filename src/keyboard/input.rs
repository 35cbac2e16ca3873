use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A keystroke reduced to the parts the navigation engine cares about.
/// Built once per key press and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub code: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    /// Normalize a terminal key event.
    ///
    /// Terminals disagree on how they report shifted letters: some send
    /// `Char('g')` with SHIFT, others `Char('G')` with or without it. Both
    /// forms collapse to the uppercase character with `shift` set, so scopes
    /// can match `G` directly.
    pub fn from_event(key: KeyEvent) -> Self {
        let mut code = key.code;
        let mut shift = key.modifiers.contains(KeyModifiers::SHIFT);
        if let KeyCode::Char(c) = code {
            if shift && c.is_ascii_lowercase() {
                code = KeyCode::Char(c.to_ascii_uppercase());
            } else if c.is_ascii_uppercase() {
                shift = true;
            }
        }
        KeyInput {
            code,
            ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            alt: key.modifiers.contains(KeyModifiers::ALT),
            meta: key
                .modifiers
                .intersects(KeyModifiers::SUPER | KeyModifiers::META),
            shift,
        }
    }

    /// An unmodified character key (shift allowed, it is part of the char).
    pub fn plain(c: char) -> Self {
        KeyInput {
            code: KeyCode::Char(c),
            ctrl: false,
            alt: false,
            meta: false,
            shift: c.is_ascii_uppercase(),
        }
    }

    /// An unmodified non-character key.
    pub fn code(code: KeyCode) -> Self {
        KeyInput {
            code,
            ctrl: false,
            alt: false,
            meta: false,
            shift: false,
        }
    }

    /// Ctrl, Alt or Meta held. Shift does not count.
    pub fn has_command_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    pub fn char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    pub fn is_code(&self, code: KeyCode) -> bool {
        self.code == code
    }

    /// The unmodified `?` that toggles the help overlay.
    pub fn is_help_key(&self) -> bool {
        self.is_char('?') && !self.has_command_modifier()
    }
}

/// What currently has focus when a key arrives.
///
/// The host computes this from its own state; the engine only asks whether
/// the target accepts typed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// A list, board, button or nothing in particular.
    #[default]
    Widget,
    /// Single-line text entry.
    TextInput,
    /// Multi-line text entry.
    TextArea,
    /// A select/dropdown element.
    Select,
    /// An editable region. `nested` is true when focus sits on a child of the
    /// editable element rather than the element itself.
    Editable { nested: bool },
}

impl FocusTarget {
    /// Keys aimed at a typing surface belong to that surface, not to the
    /// navigation engine.
    pub fn is_typing_surface(&self) -> bool {
        !matches!(self, FocusTarget::Widget)
    }
}
