//! End-to-end behavior of the keyboard engine: every key goes through a
//! `Dispatcher`, with time injected so chord timing is deterministic.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use chronic::keyboard::{
    Dispatch, Dispatcher, FocusTarget, GridNav, GridNavOptions, GridPos, GridShape, Handled,
    ListNav, ListNavOptions, ScopeEvent, ScopeHandle, ScopeOptions, Sequence, priority,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

/// Drives a dispatcher with a fake clock advancing 10ms per key.
struct Keys {
    dispatcher: Dispatcher,
    now: Instant,
}

impl Keys {
    fn new() -> Self {
        Keys {
            dispatcher: Dispatcher::default(),
            now: Instant::now(),
        }
    }

    fn press_at(&mut self, code: KeyCode, target: FocusTarget) -> Dispatch {
        self.now += Duration::from_millis(10);
        self.dispatcher
            .dispatch(KeyEvent::new(code, KeyModifiers::NONE), target, self.now)
    }

    fn press(&mut self, code: KeyCode) -> Dispatch {
        self.press_at(code, FocusTarget::Widget)
    }

    fn chars(&mut self, s: &str) {
        for c in s.chars() {
            self.press(KeyCode::Char(c));
        }
    }

    fn wait(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
    }
}

/// A scope that records every sequence it sees and consumes nothing.
fn record_sequences(keys: &Keys) -> (Rc<RefCell<Vec<Option<Sequence>>>>, ScopeHandle) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);
    let handle = keys.dispatcher.registry().register(
        move |evt: &mut ScopeEvent| {
            log.borrow_mut().push(evt.sequence);
            Handled::Ignored
        },
        ScopeOptions::default(),
    );
    (seen, handle)
}

#[test]
fn typing_surfaces_never_reach_scopes() {
    let mut keys = Keys::new();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let _scope = keys.dispatcher.registry().register(
        move |_evt: &mut ScopeEvent| {
            counter.set(counter.get() + 1);
            Handled::Consumed
        },
        ScopeOptions::with_priority(priority::MODAL),
    );

    let targets = [
        FocusTarget::TextInput,
        FocusTarget::TextArea,
        FocusTarget::Select,
        FocusTarget::Editable { nested: false },
        FocusTarget::Editable { nested: true },
    ];
    for target in targets {
        for c in ['g', 'g', 'j', '?'] {
            assert_eq!(keys.press_at(KeyCode::Char(c), target), Dispatch::Unhandled);
        }
        assert_eq!(keys.press_at(KeyCode::Esc, target), Dispatch::Unhandled);
    }
    assert_eq!(calls.get(), 0);
    // Suppressed keys never started a chord either
    assert_eq!(keys.dispatcher.pending_chord(keys.now), None);
}

#[test]
fn gg_within_timeout() {
    let mut keys = Keys::new();
    let (seen, _h) = record_sequences(&keys);
    keys.press(KeyCode::Char('g'));
    keys.wait(600);
    keys.press(KeyCode::Char('g'));
    assert_eq!(*seen.borrow(), vec![None, Some(Sequence::Gg)]);
}

#[test]
fn gg_after_timeout_is_two_starts() {
    let mut keys = Keys::new();
    let (seen, _h) = record_sequences(&keys);
    keys.press(KeyCode::Char('g'));
    // 10ms per press plus 691ms wait: 701ms between the two g's
    keys.wait(691);
    keys.press(KeyCode::Char('g'));
    assert_eq!(*seen.borrow(), vec![None, None]);
    // The second g is itself pending now
    assert_eq!(keys.dispatcher.pending_chord(keys.now), Some('g'));
}

#[test]
fn higher_priority_scope_wins() {
    let mut keys = Keys::new();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut handles = Vec::new();
    for p in [5, 10] {
        let log = Rc::clone(&log);
        handles.push(keys.dispatcher.registry().register(
            move |evt: &mut ScopeEvent| {
                if evt.input.is_char('x') {
                    log.borrow_mut().push(p);
                    return Handled::Consumed;
                }
                Handled::Ignored
            },
            ScopeOptions::with_priority(p),
        ));
    }
    assert_eq!(keys.press(KeyCode::Char('x')), Dispatch::Handled);
    assert_eq!(*log.borrow(), vec![10]);
}

#[test]
fn list_cursor_clamps_at_end() {
    let mut keys = Keys::new();
    let nav = ListNav::mount(keys.dispatcher.registry(), 4, ListNavOptions::default());
    assert_eq!(nav.active_index(), None);
    keys.chars("jjjj");
    assert_eq!(nav.active_index(), Some(3));
    keys.press(KeyCode::Char('j'));
    assert_eq!(nav.active_index(), Some(3));
}

#[test]
fn list_resize_clamps_and_clears() {
    let mut keys = Keys::new();
    let nav = ListNav::mount(keys.dispatcher.registry(), 5, ListNavOptions::default());
    keys.chars("jjjj");
    assert_eq!(nav.active_index(), Some(3));
    nav.set_count(2);
    assert_eq!(nav.active_index(), Some(1));
    nav.set_count(0);
    assert_eq!(nav.active_index(), None);
}

#[test]
fn grid_column_change_clamps_row() {
    let mut keys = Keys::new();
    let nav = GridNav::mount(
        keys.dispatcher.registry(),
        GridShape::from_lengths(vec![5, 2]),
        GridNavOptions::default(),
    );
    nav.set_active(Some(GridPos::new(0, 4)));
    keys.press(KeyCode::Char('l'));
    assert_eq!(nav.active(), Some(GridPos::new(1, 1)));
}

#[test]
fn list_enter_opens_once() {
    let mut keys = Keys::new();
    let opened = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&opened);
    let _nav = ListNav::mount(
        keys.dispatcher.registry(),
        3,
        ListNavOptions::default().on_open(move |i| sink.borrow_mut().push(i)),
    );
    keys.chars("jj");
    assert_eq!(keys.press(KeyCode::Enter), Dispatch::Handled);
    assert_eq!(*opened.borrow(), vec![1]);
}

#[test]
fn grid_gg_l_capital_g() {
    let mut keys = Keys::new();
    let nav = GridNav::mount(
        keys.dispatcher.registry(),
        GridShape::from_lengths(vec![3, 1]),
        GridNavOptions::default(),
    );
    keys.chars("gg");
    assert_eq!(nav.active(), Some(GridPos::ORIGIN));
    keys.press(KeyCode::Char('l'));
    assert_eq!(nav.active(), Some(GridPos::new(1, 0)));
    keys.press(KeyCode::Char('G'));
    assert_eq!(nav.active(), Some(GridPos::new(1, 0)));
}

#[test]
fn help_overlay_gates_dispatch() {
    let mut keys = Keys::new();
    let nav = ListNav::mount(keys.dispatcher.registry(), 3, ListNavOptions::default());

    assert_eq!(keys.press(KeyCode::Char('?')), Dispatch::Handled);
    assert!(keys.dispatcher.help_open());

    assert_eq!(keys.press(KeyCode::Char('j')), Dispatch::Handled);
    assert_eq!(nav.active_index(), None);

    assert_eq!(keys.press(KeyCode::Char('?')), Dispatch::Handled);
    assert!(!keys.dispatcher.help_open());

    keys.press(KeyCode::Char('j'));
    assert_eq!(nav.active_index(), Some(0));
}

#[test]
fn suspended_dispatcher_ignores_everything() {
    let mut keys = Keys::new();
    let nav = ListNav::mount(keys.dispatcher.registry(), 3, ListNavOptions::default());
    keys.dispatcher.set_suspended(true);
    assert_eq!(keys.press(KeyCode::Char('j')), Dispatch::Unhandled);
    assert_eq!(keys.press(KeyCode::Char('?')), Dispatch::Unhandled);
    assert!(!keys.dispatcher.help_open());
    keys.dispatcher.set_suspended(false);
    keys.press(KeyCode::Char('j'));
    assert_eq!(nav.active_index(), Some(0));
}

#[test]
fn unmounted_view_stops_receiving_keys() {
    let mut keys = Keys::new();
    let opened = Rc::new(Cell::new(0));
    let sink = Rc::clone(&opened);
    let nav = ListNav::mount(
        keys.dispatcher.registry(),
        2,
        ListNavOptions::default().on_open(move |_| sink.set(sink.get() + 1)),
    );
    keys.chars("j");
    drop(nav);
    assert!(keys.dispatcher.registry().is_empty());
    assert_eq!(keys.press(KeyCode::Enter), Dispatch::Unhandled);
    assert_eq!(opened.get(), 0);
}

#[test]
fn blur_cancels_pending_chord() {
    let mut keys = Keys::new();
    let (seen, _h) = record_sequences(&keys);
    keys.press(KeyCode::Char('g'));
    keys.dispatcher.blur();
    keys.press(KeyCode::Char('t'));
    assert_eq!(*seen.borrow(), vec![None, None]);
}

#[test]
fn panicking_scope_keeps_chord_progress() {
    let mut keys = Keys::new();
    let (seen, _h) = record_sequences(&keys);
    let _bad = keys.dispatcher.registry().register(
        |_evt: &mut ScopeEvent| -> Handled { panic!("handler failure") },
        ScopeOptions::with_priority(9),
    );
    assert_eq!(keys.press(KeyCode::Char('g')), Dispatch::Unhandled);
    assert_eq!(keys.press(KeyCode::Char('g')), Dispatch::Unhandled);
    assert_eq!(*seen.borrow(), vec![None, Some(Sequence::Gg)]);
}
