use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use super::chord::{CHORD_TIMEOUT, ChordBuffer};
use super::input::{FocusTarget, KeyInput};
use super::scope::{ScopeEvent, ScopeRegistry};

/// Result of routing one key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The engine took the key; the host must not act on it again.
    Handled,
    /// Nobody wanted it; the host may apply its own default handling.
    Unhandled,
}

#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    pub chord_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        DispatcherConfig {
            chord_timeout: CHORD_TIMEOUT,
        }
    }
}

/// The single root key listener.
///
/// Owns the chord buffer and the suspended/help flags; scopes never touch
/// them directly. Construct one per application and feed it every key event
/// before any view-level handling.
pub struct Dispatcher {
    registry: ScopeRegistry,
    chord: ChordBuffer,
    suspended: bool,
    help_open: bool,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::new(DispatcherConfig::default())
    }
}

impl Dispatcher {
    pub fn new(config: DispatcherConfig) -> Self {
        Dispatcher {
            registry: ScopeRegistry::new(),
            chord: ChordBuffer::new(config.chord_timeout),
            suspended: false,
            help_open: false,
        }
    }

    /// Registry that views and modals register their scopes with.
    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// While suspended every key passes through untouched.
    pub fn set_suspended(&mut self, suspended: bool) {
        if self.suspended != suspended {
            tracing::debug!(suspended, "keyboard dispatch suspension changed");
        }
        self.suspended = suspended;
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn set_help_open(&mut self, open: bool) {
        self.help_open = open;
    }

    /// Key waiting for a chord continuation, for status display.
    pub fn pending_chord(&self, now: Instant) -> Option<char> {
        self.chord.pending(now)
    }

    /// Focus left the application; abandon any half-typed chord.
    pub fn blur(&mut self) {
        self.chord.reset();
    }

    pub fn handle_key(&mut self, key: KeyEvent, target: FocusTarget) -> Dispatch {
        self.dispatch(key, target, Instant::now())
    }

    /// Route one key press through suppression, chord recognition and the
    /// scope registry. `now` drives chord expiry.
    pub fn dispatch(&mut self, key: KeyEvent, target: FocusTarget, now: Instant) -> Dispatch {
        if matches!(key.code, KeyCode::Modifier(_)) || key.kind == KeyEventKind::Release {
            return Dispatch::Unhandled;
        }
        if self.suspended {
            return Dispatch::Unhandled;
        }

        let input = KeyInput::from_event(key);

        // The overlay owns the keyboard until it is closed.
        if self.help_open {
            if input.is_help_key() {
                self.help_open = false;
                tracing::debug!("help overlay closed");
            }
            return Dispatch::Handled;
        }

        if target.is_typing_surface() {
            return Dispatch::Unhandled;
        }

        let sequence = self.chord.feed(&input, now);
        if let Some(seq) = sequence {
            tracing::debug!(sequence = %seq, "chord recognized");
        }

        let mut event = ScopeEvent::new(input, sequence);
        if self.registry.dispatch(&mut event) {
            return Dispatch::Handled;
        }

        if sequence.is_none() && input.is_help_key() {
            self.help_open = !self.help_open;
            tracing::debug!(open = self.help_open, "help overlay toggled");
            return Dispatch::Handled;
        }

        Dispatch::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::scope::{Handled, ScopeOptions};
    use crossterm::event::KeyModifiers;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn seen_log(
        dispatcher: &Dispatcher,
    ) -> (Rc<RefCell<Vec<String>>>, crate::keyboard::ScopeHandle) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let handle = dispatcher.registry().register(
            move |evt: &mut ScopeEvent| {
                let label = match evt.sequence {
                    Some(seq) => seq.to_string(),
                    None => format!("{:?}", evt.input.code),
                };
                sink.borrow_mut().push(label);
                Handled::Ignored
            },
            ScopeOptions::default(),
        );
        (log, handle)
    }

    #[test]
    fn typing_surface_suppresses_everything() {
        let mut d = Dispatcher::default();
        let (log, _h) = seen_log(&d);
        let now = Instant::now();
        for c in ['j', 'g', 'g', '?'] {
            assert_eq!(d.dispatch(key(c), FocusTarget::TextInput, now), Dispatch::Unhandled);
        }
        assert!(log.borrow().is_empty());
        assert!(!d.help_open());
        assert_eq!(d.pending_chord(now), None);
    }

    #[test]
    fn question_mark_toggles_help_when_unclaimed() {
        let mut d = Dispatcher::default();
        let now = Instant::now();
        assert_eq!(d.dispatch(key('?'), FocusTarget::Widget, now), Dispatch::Handled);
        assert!(d.help_open());
    }

    #[test]
    fn help_overlay_swallows_other_keys() {
        let mut d = Dispatcher::default();
        let (log, _h) = seen_log(&d);
        let now = Instant::now();
        d.set_help_open(true);
        assert_eq!(d.dispatch(key('j'), FocusTarget::Widget, now), Dispatch::Handled);
        assert!(log.borrow().is_empty());
        assert!(d.help_open());

        assert_eq!(d.dispatch(key('?'), FocusTarget::Widget, now), Dispatch::Handled);
        assert!(!d.help_open());
        d.dispatch(key('j'), FocusTarget::Widget, now);
        assert_eq!(*log.borrow(), vec!["Char('j')".to_string()]);
    }

    #[test]
    fn suspended_ignores_all_keys() {
        let mut d = Dispatcher::default();
        let (log, _h) = seen_log(&d);
        d.set_suspended(true);
        let now = Instant::now();
        assert_eq!(d.dispatch(key('?'), FocusTarget::Widget, now), Dispatch::Unhandled);
        assert!(!d.help_open());
        assert!(log.borrow().is_empty());
        d.set_suspended(false);
        d.dispatch(key('x'), FocusTarget::Widget, now);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn blur_clears_pending_chord() {
        let mut d = Dispatcher::default();
        let (log, _h) = seen_log(&d);
        let now = Instant::now();
        d.dispatch(key('g'), FocusTarget::Widget, now);
        assert_eq!(d.pending_chord(now), Some('g'));
        d.blur();
        d.dispatch(key('g'), FocusTarget::Widget, now);
        assert_eq!(*log.borrow(), vec!["Char('g')", "Char('g')"]);
    }

    #[test]
    fn modifier_and_release_events_are_dropped() {
        let mut d = Dispatcher::default();
        let (log, _h) = seen_log(&d);
        let now = Instant::now();
        let modifier = KeyEvent::new(
            KeyCode::Modifier(crossterm::event::ModifierKeyCode::LeftShift),
            KeyModifiers::SHIFT,
        );
        assert_eq!(d.dispatch(modifier, FocusTarget::Widget, now), Dispatch::Unhandled);
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('j'), KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(d.dispatch(release, FocusTarget::Widget, now), Dispatch::Unhandled);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn modified_keys_still_reach_scopes() {
        let mut d = Dispatcher::default();
        let (log, _h) = seen_log(&d);
        let now = Instant::now();
        let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
        d.dispatch(ctrl_q, FocusTarget::Widget, now);
        assert_eq!(*log.borrow(), vec!["Char('q')"]);
    }
}
