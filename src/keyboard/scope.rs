use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use super::chord::Sequence;
use super::input::KeyInput;

/// Priority tiers. Higher numbers see keys first.
pub mod priority {
    /// App-wide shortcuts that only apply when nothing else wants the key.
    pub const GLOBAL: i32 = 0;
    /// List and board navigation.
    pub const NAV: i32 = 5;
    /// Modal dialogs; they get first refusal on every key.
    pub const MODAL: i32 = 10;
}

/// What a scope handler did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    Consumed,
    Ignored,
}

impl From<bool> for Handled {
    fn from(consumed: bool) -> Self {
        if consumed {
            Handled::Consumed
        } else {
            Handled::Ignored
        }
    }
}

/// The envelope passed to each scope for one key press.
#[derive(Debug, Clone)]
pub struct ScopeEvent {
    pub input: KeyInput,
    pub sequence: Option<Sequence>,
    stopped: bool,
}

impl ScopeEvent {
    pub fn new(input: KeyInput, sequence: Option<Sequence>) -> Self {
        ScopeEvent {
            input,
            sequence,
            stopped: false,
        }
    }

    /// Keep lower-priority scopes from seeing this key.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScopeOptions {
    pub priority: i32,
    pub active: bool,
}

impl Default for ScopeOptions {
    fn default() -> Self {
        ScopeOptions {
            priority: priority::GLOBAL,
            active: true,
        }
    }
}

impl ScopeOptions {
    pub fn with_priority(priority: i32) -> Self {
        ScopeOptions {
            priority,
            ..Default::default()
        }
    }
}

type Handler = Rc<RefCell<dyn FnMut(&mut ScopeEvent) -> Handled>>;

struct ScopeEntry {
    id: u64,
    priority: i32,
    active: Rc<Cell<bool>>,
    /// Set by a handle that could not remove the entry itself.
    retired: Rc<Cell<bool>>,
    handler: Handler,
}

#[derive(Default)]
struct RegistryInner {
    /// Ascending by priority; equal priorities keep registration order.
    scopes: Vec<ScopeEntry>,
    next_id: u64,
}

thread_local! {
    static IN_HANDLER: Cell<bool> = const { Cell::new(false) };
}

/// True while a scope handler is running under the registry's panic guard.
/// Panic hooks use this to stay quiet about panics the registry recovers from.
pub fn handler_running() -> bool {
    IN_HANDLER.with(|flag| flag.get())
}

/// Priority-ordered set of key handlers.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone, Default)]
pub struct ScopeRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ScopeRegistry {
    pub fn new() -> Self {
        ScopeRegistry::default()
    }

    /// Add a handler. Each call creates a distinct scope that lives until the
    /// returned handle is unregistered or dropped.
    pub fn register<F>(&self, handler: F, options: ScopeOptions) -> ScopeHandle
    where
        F: FnMut(&mut ScopeEvent) -> Handled + 'static,
    {
        self.prune_retired();
        let active = Rc::new(Cell::new(options.active));
        let retired = Rc::new(Cell::new(false));
        let mut inner = self.inner.borrow_mut();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.scopes.push(ScopeEntry {
            id,
            priority: options.priority,
            active: Rc::clone(&active),
            retired: Rc::clone(&retired),
            handler: Rc::new(RefCell::new(handler)),
        });
        inner.scopes.sort_by_key(|s| s.priority);
        tracing::trace!(scope = id, priority = options.priority, "scope registered");

        ScopeHandle {
            id,
            active,
            retired,
            registry: Rc::downgrade(&self.inner),
        }
    }

    pub fn len(&self) -> usize {
        self.prune_retired();
        self.inner.borrow().scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `event` from the highest priority down (the most recently
    /// registered first among equals). Returns true once a scope consumes it.
    pub fn dispatch(&self, event: &mut ScopeEvent) -> bool {
        self.prune_retired();
        // Snapshot so handlers are free to register or unregister scopes.
        let order: Vec<(u64, Rc<Cell<bool>>, Handler)> = self
            .inner
            .borrow()
            .scopes
            .iter()
            .rev()
            .map(|s| (s.id, Rc::clone(&s.active), Rc::clone(&s.handler)))
            .collect();

        for (id, active, handler) in order {
            if !active.get() || !self.contains(id) {
                continue;
            }
            match invoke_isolated(&handler, event) {
                Ok(Handled::Consumed) => return true,
                Ok(Handled::Ignored) => {
                    if event.is_propagation_stopped() {
                        return true;
                    }
                }
                Err(payload) => {
                    event.stopped = false;
                    tracing::error!(
                        scope = id,
                        key = ?event.input.code,
                        "scope handler panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
            }
        }
        false
    }

    fn contains(&self, id: u64) -> bool {
        self.inner
            .borrow()
            .scopes
            .iter()
            .any(|s| s.id == id && !s.retired.get())
    }

    /// Drop entries whose handles gave up while the registry was borrowed.
    fn prune_retired(&self) {
        let removed: Vec<ScopeEntry> = {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                return;
            };
            if !inner.scopes.iter().any(|s| s.retired.get()) {
                return;
            }
            let (dead, live) = std::mem::take(&mut inner.scopes)
                .into_iter()
                .partition(|s| s.retired.get());
            inner.scopes = live;
            dead
        };
        tracing::trace!(count = removed.len(), "retired scopes pruned");
        drop(removed);
    }
}

fn invoke_isolated(
    handler: &Handler,
    event: &mut ScopeEvent,
) -> Result<Handled, Box<dyn Any + Send>> {
    // A handler that is somehow already running cannot take this key.
    let Ok(mut handler) = handler.try_borrow_mut() else {
        return Ok(Handled::Ignored);
    };
    let outer = IN_HANDLER.with(|flag| flag.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(|| (*handler)(event)));
    IN_HANDLER.with(|flag| flag.set(outer));
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Owner's grip on a registered scope. Dropping it unregisters the scope.
pub struct ScopeHandle {
    id: u64,
    active: Rc<Cell<bool>>,
    retired: Rc<Cell<bool>>,
    registry: Weak<RefCell<RegistryInner>>,
}

impl ScopeHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Remove the scope. Safe to call repeatedly, and after the registry has
    /// been dropped.
    pub fn unregister(&self) {
        let Some(inner) = self.registry.upgrade() else {
            return;
        };
        let removed = {
            let Ok(mut inner) = inner.try_borrow_mut() else {
                // Registry is mid-update; leave the entry for the next prune.
                if !self.retired.replace(true) {
                    tracing::warn!(scope = self.id, "registry busy, scope removal deferred");
                }
                return;
            };
            let Some(pos) = inner.scopes.iter().position(|s| s.id == self.id) else {
                return;
            };
            inner.scopes.remove(pos)
        };
        tracing::trace!(scope = self.id, "scope unregistered");
        // Dropped after the borrow ends: the handler may own other handles.
        drop(removed);
    }
}

impl Drop for ScopeHandle {
    fn drop(&mut self) {
        self.unregister();
    }
}

impl std::fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopeHandle")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}
