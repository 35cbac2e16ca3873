use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossterm::event::KeyCode;

use super::chord::Sequence;
use super::list_nav::ContainerProps;
use super::scope::{Handled, ScopeEvent, ScopeHandle, ScopeOptions, ScopeRegistry, priority};

static NEXT_GRID_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPos {
    pub col: usize,
    pub row: usize,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { col: 0, row: 0 };

    pub fn new(col: usize, row: usize) -> Self {
        GridPos { col, row }
    }
}

/// Column count plus a per-column row count query. Board columns usually
/// have different lengths.
#[derive(Clone)]
pub struct GridShape {
    pub cols: usize,
    rows_by_col: Rc<dyn Fn(usize) -> usize>,
}

impl GridShape {
    pub fn new(cols: usize, rows_by_col: impl Fn(usize) -> usize + 'static) -> Self {
        GridShape {
            cols,
            rows_by_col: Rc::new(rows_by_col),
        }
    }

    /// Shape from a fixed list of column lengths.
    pub fn from_lengths(lengths: Vec<usize>) -> Self {
        let cols = lengths.len();
        GridShape::new(cols, move |col| lengths.get(col).copied().unwrap_or(0))
    }

    pub fn rows(&self, col: usize) -> usize {
        (self.rows_by_col)(col)
    }
}

impl fmt::Debug for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<usize> = (0..self.cols).map(|c| self.rows(c)).collect();
        f.debug_struct("GridShape").field("rows", &rows).finish()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GridLoop {
    pub cols: bool,
    pub rows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEffect {
    Open(GridPos),
    Toggle(GridPos),
    NewInCol(usize),
}

/// Cursor over a grid of ragged columns.
#[derive(Debug, Clone)]
pub struct GridCursor {
    shape: GridShape,
    active: Option<GridPos>,
    looping: GridLoop,
}

impl GridCursor {
    pub fn new(shape: GridShape, looping: GridLoop) -> Self {
        GridCursor {
            shape,
            active: None,
            looping,
        }
    }

    pub fn active(&self) -> Option<GridPos> {
        self.active
    }

    pub fn shape(&self) -> &GridShape {
        &self.shape
    }

    /// Place the cursor directly; the position is clamped into the shape.
    /// A grid without columns has no cell to hold it.
    pub fn set_active(&mut self, pos: Option<GridPos>) {
        if self.shape.cols == 0 {
            self.active = None;
            return;
        }
        self.active = pos.map(|p| {
            let col = self.clamp_col(p.col as isize);
            GridPos::new(col, self.clamp_row(col, p.row as isize))
        });
    }

    /// Swap in a new shape (cards added, removed or moved) and pull the
    /// cursor back inside it.
    pub fn set_shape(&mut self, shape: GridShape) {
        self.shape = shape;
        self.set_active(self.active);
    }

    fn clamp_col(&self, col: isize) -> usize {
        let cols = self.shape.cols as isize;
        if cols <= 0 {
            return 0;
        }
        if self.looping.cols {
            col.rem_euclid(cols) as usize
        } else {
            col.clamp(0, cols - 1) as usize
        }
    }

    /// Row clamped against `col`'s own length. Empty columns pin to 0.
    fn clamp_row(&self, col: usize, row: isize) -> usize {
        let rows = self.shape.rows(col) as isize;
        if rows <= 0 {
            return 0;
        }
        if self.looping.rows {
            row.rem_euclid(rows) as usize
        } else {
            row.clamp(0, rows - 1) as usize
        }
    }

    fn last_row(&self, col: usize) -> usize {
        self.shape.rows(col).saturating_sub(1)
    }

    pub fn handle(&mut self, evt: &ScopeEvent) -> (Handled, Option<GridEffect>) {
        let input = &evt.input;
        if input.has_command_modifier() {
            return (Handled::Ignored, None);
        }
        if input.is_char('n') {
            let col = self.active.map_or(0, |p| p.col);
            return (Handled::Consumed, Some(GridEffect::NewInCol(col)));
        }
        if input.is_code(KeyCode::Esc) {
            if self.active.take().is_some() {
                return (Handled::Consumed, None);
            }
            return (Handled::Ignored, None);
        }
        if self.shape.cols == 0 {
            return (Handled::Ignored, None);
        }
        if evt.sequence == Some(Sequence::Gg) {
            self.active = Some(GridPos::ORIGIN);
            return (Handled::Consumed, None);
        }
        if input.is_char('G') {
            // "Last" is column-relative; with nothing active it means column 0.
            let col = self.active.map_or(0, |p| p.col);
            self.active = Some(GridPos::new(col, self.last_row(col)));
            return (Handled::Consumed, None);
        }

        let step = match input.code {
            KeyCode::Char('h') | KeyCode::Left => Some((-1, 0)),
            KeyCode::Char('l') | KeyCode::Right => Some((1, 0)),
            KeyCode::Char('j') | KeyCode::Down => Some((0, 1)),
            KeyCode::Char('k') | KeyCode::Up => Some((0, -1)),
            _ => None,
        };
        if let Some((dc, dr)) = step {
            self.active = Some(match self.active {
                None => GridPos::ORIGIN,
                Some(p) => {
                    let col = if dc == 0 {
                        p.col
                    } else {
                        self.clamp_col(p.col as isize + dc)
                    };
                    GridPos::new(col, self.clamp_row(col, p.row as isize + dr))
                }
            });
            return (Handled::Consumed, None);
        }

        match input.code {
            KeyCode::Enter | KeyCode::Char('o') => {
                (Handled::Consumed, self.active.map(GridEffect::Open))
            }
            KeyCode::Char('x') => (Handled::Consumed, self.active.map(GridEffect::Toggle)),
            _ => (Handled::Ignored, None),
        }
    }
}

type PosCallback = Box<dyn FnMut(GridPos)>;

/// Options and callbacks for [`GridNav::mount`].
#[derive(Default)]
pub struct GridNavOptions {
    pub looping: GridLoop,
    pub priority: Option<i32>,
    on_open: Option<PosCallback>,
    on_toggle: Option<PosCallback>,
    on_new_in_col: Option<Box<dyn FnMut(usize)>>,
}

impl GridNavOptions {
    pub fn loop_cols(mut self, on: bool) -> Self {
        self.looping.cols = on;
        self
    }

    pub fn loop_rows(mut self, on: bool) -> Self {
        self.looping.rows = on;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn on_open(mut self, f: impl FnMut(GridPos) + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    pub fn on_toggle(mut self, f: impl FnMut(GridPos) + 'static) -> Self {
        self.on_toggle = Some(Box::new(f));
        self
    }

    pub fn on_new_in_col(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_new_in_col = Some(Box::new(f));
        self
    }
}

struct GridCallbacks {
    on_open: Option<PosCallback>,
    on_toggle: Option<PosCallback>,
    on_new_in_col: Option<Box<dyn FnMut(usize)>>,
}

impl GridCallbacks {
    fn fire(&mut self, effect: GridEffect) {
        match effect {
            GridEffect::Open(pos) => {
                if let Some(f) = &mut self.on_open {
                    f(pos);
                }
            }
            GridEffect::Toggle(pos) => {
                if let Some(f) = &mut self.on_toggle {
                    f(pos);
                }
            }
            GridEffect::NewInCol(col) => {
                if let Some(f) = &mut self.on_new_in_col {
                    f(col);
                }
            }
        }
    }
}

/// Identifiers for one board card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardProps {
    pub id: String,
    pub role: &'static str,
    pub active: bool,
}

/// A grid cursor wired into the scope registry for as long as it lives.
pub struct GridNav {
    cursor: Rc<RefCell<GridCursor>>,
    scope: ScopeHandle,
    grid_id: String,
}

impl GridNav {
    pub fn mount(registry: &ScopeRegistry, shape: GridShape, options: GridNavOptions) -> Self {
        let cursor = Rc::new(RefCell::new(GridCursor::new(shape, options.looping)));
        let callbacks = RefCell::new(GridCallbacks {
            on_open: options.on_open,
            on_toggle: options.on_toggle,
            on_new_in_col: options.on_new_in_col,
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

        GridNav {
            cursor,
            scope,
            grid_id: format!("kb-grid-{}", NEXT_GRID_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn active(&self) -> Option<GridPos> {
        self.cursor.borrow().active()
    }

    pub fn set_active(&self, pos: Option<GridPos>) {
        self.cursor.borrow_mut().set_active(pos);
    }

    pub fn set_shape(&self, shape: GridShape) {
        self.cursor.borrow_mut().set_shape(shape);
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.scope.set_active(enabled);
    }

    pub fn container_props(&self) -> ContainerProps {
        ContainerProps {
            id: self.grid_id.clone(),
            role: "grid",
            active_descendant: self.active().map(|p| self.card_id(p.col, p.row)),
        }
    }

    pub fn card_props(&self, col: usize, row: usize) -> CardProps {
        CardProps {
            id: self.card_id(col, row),
            role: "gridcell",
            active: self.active() == Some(GridPos::new(col, row)),
        }
    }

    fn card_id(&self, col: usize, row: usize) -> String {
        format!("{}-{}-{}", self.grid_id, col, row)
    }
}
