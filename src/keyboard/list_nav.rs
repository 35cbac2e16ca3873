use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::KeyCode;

use super::chord::Sequence;
use super::scope::{Handled, ScopeEvent, ScopeHandle, ScopeOptions, ScopeRegistry, priority};

static NEXT_LIST_ID: AtomicUsize = AtomicUsize::new(1);

/// Caller work requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEffect {
    Open(usize),
    Toggle(usize),
    New,
}

/// Cursor over a one-dimensional list. `None` means nothing is selected.
#[derive(Debug, Clone, Default)]
pub struct ListCursor {
    count: usize,
    active: Option<usize>,
    wrap: bool,
}

impl ListCursor {
    pub fn new(count: usize, wrap: bool) -> Self {
        ListCursor {
            count,
            active: None,
            wrap,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Select an index directly (e.g. from a mouse click). Out-of-range
    /// indices are clamped.
    pub fn set_active(&mut self, index: Option<usize>) {
        self.active = match index {
            _ if self.count == 0 => None,
            Some(i) => Some(i.min(self.count - 1)),
            None => None,
        };
    }

    /// Follow a change in the backing item count. A list that becomes
    /// non-empty stays unselected.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if count == 0 {
            self.active = None;
        } else if let Some(i) = self.active
            && i >= count
        {
            self.active = Some(count - 1);
        }
    }

    fn step(&self, from: usize, delta: isize) -> usize {
        let n = self.count as isize;
        let next = from as isize + delta;
        if self.wrap {
            next.rem_euclid(n) as usize
        } else {
            next.clamp(0, n - 1) as usize
        }
    }

    pub fn handle(&mut self, evt: &ScopeEvent) -> (Handled, Option<ListEffect>) {
        let input = &evt.input;
        if input.has_command_modifier() {
            return (Handled::Ignored, None);
        }
        // `n` works on an empty list; everything else needs items.
        if input.is_char('n') {
            return (Handled::Consumed, Some(ListEffect::New));
        }
        if self.count == 0 {
            return (Handled::Ignored, None);
        }

        if input.is_code(KeyCode::Esc) {
            if self.active.is_some() {
                self.active = None;
                return (Handled::Consumed, None);
            }
            return (Handled::Ignored, None);
        }
        if evt.sequence == Some(Sequence::Gg) {
            self.active = Some(0);
            return (Handled::Consumed, None);
        }
        if input.is_char('G') {
            self.active = Some(self.count - 1);
            return (Handled::Consumed, None);
        }

        let delta = match input.code {
            KeyCode::Char('j') | KeyCode::Down => Some(1),
            KeyCode::Char('k') | KeyCode::Up => Some(-1),
            _ => None,
        };
        if let Some(delta) = delta {
            self.active = Some(match self.active {
                None => 0,
                Some(i) => self.step(i, delta),
            });
            return (Handled::Consumed, None);
        }

        match input.code {
            KeyCode::Enter | KeyCode::Char('o') => {
                (Handled::Consumed, self.active.map(ListEffect::Open))
            }
            KeyCode::Char('x') => (Handled::Consumed, self.active.map(ListEffect::Toggle)),
            _ => (Handled::Ignored, None),
        }
    }
}

type IndexCallback = Box<dyn FnMut(usize)>;

/// Options and callbacks for [`ListNav::mount`].
#[derive(Default)]
pub struct ListNavOptions {
    pub wrap: bool,
    pub priority: Option<i32>,
    on_open: Option<IndexCallback>,
    on_toggle: Option<IndexCallback>,
    on_new: Option<Box<dyn FnMut()>>,
}

impl ListNavOptions {
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn on_open(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_toggle(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    pub fn on_new(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_new = Some(Box::new(f));
        self
    }
}

struct ListCallbacks {
    on_open: Option<IndexCallback>,
    on_toggle: Option<IndexCallback>,
    on_new: Option<Box<dyn FnMut()>>,
}

impl ListCallbacks {
    fn fire(&mut self, effect: ListEffect) {
        match effect {
            ListEffect::Open(i) => {
                if let Some(f) = &mut self.on_open {
                    f(i);
                }
            }
            ListEffect::Toggle(i) => {
                if let Some(f) = &mut self.on_toggle {
                    f(i);
                }
            }
            ListEffect::New => {
                if let Some(f) = &mut self.on_new {
                    f();
                }
            }
        }
    }
}

/// Identifiers for the list container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerProps {
    pub id: String,
    pub role: &'static str,
    pub active_descendant: Option<String>,
}

/// Identifiers for one list item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemProps {
    pub id: String,
    pub role: &'static str,
    pub active: bool,
}

/// A list cursor wired into the scope registry for as long as it lives.
pub struct ListNav {
    cursor: Rc<RefCell<ListCursor>>,
    scope: ScopeHandle,
    container_id: String,
}

impl ListNav {
    pub fn mount(registry: &ScopeRegistry, count: usize, options: ListNavOptions) -> Self {
        let cursor = Rc::new(RefCell::new(ListCursor::new(count, options.wrap)));
        let callbacks = RefCell::new(ListCallbacks {
            on_open: options.on_open,
            on_toggle: options.on_toggle,
            on_new: options.on_new,
        });

        let state = Rc::clone(&cursor);
        let scope = registry.register(
            move |evt: &mut ScopeEvent| {
                let (handled, effect) = state.borrow_mut().handle(evt);
                if let Some(effect) = effect {
                    callbacks.borrow_mut().fire(effect);
                }
                handled
            },
            ScopeOptions::with_priority(options.priority.unwrap_or(priority::NAV)),
        );

        ListNav {
            cursor,
            scope,
            container_id: format!("kb-list-{}", NEXT_LIST_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn active_index(&self) -> Option<usize> {
        self.cursor.borrow().active()
    }

    pub fn set_active_index(&self, index: Option<usize>) {
        self.cursor.borrow_mut().set_active(index);
    }

    pub fn count(&self) -> usize {
        self.cursor.borrow().count()
    }

    pub fn set_count(&self, count: usize) {
        self.cursor.borrow_mut().set_count(count);
    }

    /// Stop or resume receiving keys without unmounting.
    pub fn set_enabled(&self, enabled: bool) {
        self.scope.set_active(enabled);
    }

    pub fn container_props(&self) -> ContainerProps {
        ContainerProps {
            id: self.container_id.clone(),
            role: "listbox",
            active_descendant: self.active_index().map(|i| self.item_id(i)),
        }
    }

    pub fn item_props(&self, index: usize) -> ItemProps {
        ItemProps {
            id: self.item_id(index),
            role: "option",
            active: self.active_index() == Some(index),
        }
    }

    fn item_id(&self, index: usize) -> String {
        format!("{}-{}", self.container_id, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::input::KeyInput;

    fn press(cursor: &mut ListCursor, c: char) -> (Handled, Option<ListEffect>) {
        cursor.handle(&ScopeEvent::new(KeyInput::plain(c), None))
    }

    fn press_code(cursor: &mut ListCursor, code: KeyCode) -> (Handled, Option<ListEffect>) {
        cursor.handle(&ScopeEvent::new(KeyInput::code(code), None))
    }

    #[test]
    fn first_move_selects_origin() {
        let mut c = ListCursor::new(3, false);
        assert_eq!(press(&mut c, 'k'), (Handled::Consumed, None));
        assert_eq!(c.active(), Some(0));
    }

    #[test]
    fn j_clamps_at_the_end() {
        let mut c = ListCursor::new(4, false);
        for _ in 0..4 {
            press(&mut c, 'j');
        }
        assert_eq!(c.active(), Some(3));
        press(&mut c, 'j');
        assert_eq!(c.active(), Some(3));
        press_code(&mut c, KeyCode::Up);
        assert_eq!(c.active(), Some(2));
    }

    #[test]
    fn wrap_goes_around_both_ends() {
        let mut c = ListCursor::new(3, true);
        press(&mut c, 'j');
        press(&mut c, 'k');
        assert_eq!(c.active(), Some(2));
        press_code(&mut c, KeyCode::Down);
        assert_eq!(c.active(), Some(0));
    }

    #[test]
    fn gg_and_shift_g() {
        let mut c = ListCursor::new(5, false);
        c.handle(&ScopeEvent::new(KeyInput::plain('G'), None));
        assert_eq!(c.active(), Some(4));
        c.handle(&ScopeEvent::new(KeyInput::plain('g'), Some(Sequence::Gg)));
        assert_eq!(c.active(), Some(0));
    }

    #[test]
    fn escape_clears_then_falls_through() {
        let mut c = ListCursor::new(2, false);
        press(&mut c, 'j');
        assert_eq!(press_code(&mut c, KeyCode::Esc).0, Handled::Consumed);
        assert_eq!(c.active(), None);
        assert_eq!(press_code(&mut c, KeyCode::Esc).0, Handled::Ignored);
    }

    #[test]
    fn actions_need_a_selection_except_new() {
        let mut c = ListCursor::new(2, false);
        assert_eq!(press_code(&mut c, KeyCode::Enter), (Handled::Consumed, None));
        assert_eq!(press(&mut c, 'x'), (Handled::Consumed, None));
        assert_eq!(press(&mut c, 'n'), (Handled::Consumed, Some(ListEffect::New)));
        press(&mut c, 'j');
        assert_eq!(press(&mut c, 'o'), (Handled::Consumed, Some(ListEffect::Open(0))));
        assert_eq!(press(&mut c, 'x'), (Handled::Consumed, Some(ListEffect::Toggle(0))));
    }

    #[test]
    fn empty_list_only_takes_new() {
        let mut c = ListCursor::new(0, false);
        assert_eq!(press(&mut c, 'j').0, Handled::Ignored);
        assert_eq!(press(&mut c, 'G').0, Handled::Ignored);
        assert_eq!(press_code(&mut c, KeyCode::Enter).0, Handled::Ignored);
        assert_eq!(press(&mut c, 'n'), (Handled::Consumed, Some(ListEffect::New)));
        assert_eq!(c.active(), None);
    }

    #[test]
    fn modified_keys_are_ignored() {
        let mut c = ListCursor::new(3, false);
        let mut input = KeyInput::plain('j');
        input.ctrl = true;
        assert_eq!(c.handle(&ScopeEvent::new(input, None)).0, Handled::Ignored);
        assert_eq!(c.active(), None);
    }

    #[test]
    fn resize_clamps_and_clears() {
        let mut c = ListCursor::new(5, false);
        c.set_active(Some(3));
        c.set_count(2);
        assert_eq!(c.active(), Some(1));
        c.set_count(0);
        assert_eq!(c.active(), None);
        c.set_count(4);
        assert_eq!(c.active(), None);
    }

    #[test]
    fn set_active_clamps() {
        let mut c = ListCursor::new(3, false);
        c.set_active(Some(10));
        assert_eq!(c.active(), Some(2));
        let mut empty = ListCursor::new(0, false);
        empty.set_active(Some(0));
        assert_eq!(empty.active(), None);
    }

    #[test]
    fn props_track_the_active_item() {
        let registry = ScopeRegistry::new();
        let nav = ListNav::mount(&registry, 3, ListNavOptions::default());
        let container = nav.container_props();
        assert!(container.id.starts_with("kb-list-"));
        assert_eq!(container.role, "listbox");
        assert_eq!(container.active_descendant, None);

        nav.set_active_index(Some(1));
        let item = nav.item_props(1);
        assert!(item.active);
        assert_eq!(item.id, format!("{}-1", container.id));
        assert!(!nav.item_props(0).active);
        assert_eq!(nav.container_props().active_descendant, Some(item.id));
    }

    #[test]
    fn dropping_the_nav_unregisters_its_scope() {
        let registry = ScopeRegistry::new();
        let nav = ListNav::mount(&registry, 3, ListNavOptions::default());
        assert_eq!(registry.len(), 1);
        drop(nav);
        assert!(registry.is_empty());
    }
}
