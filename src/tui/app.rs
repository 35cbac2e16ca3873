use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, DisableFocusChange, EnableBracketedPaste, EnableFocusChange, Event,
    KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use indexmap::IndexMap;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::workspace_io::{load_workspace, save_workspace};
use crate::keyboard::{
    Dispatcher, DispatcherConfig, FocusTarget, GridNav, GridNavOptions, GridPos, GridShape,
    ListNav, ListNavOptions, ScopeHandle,
};
use crate::model::{Column, Config, Workspace};

use super::detail::{DetailField, DetailModal};
use super::input;
use super::render;
use super::shell;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Tasks,
    Projects,
    Tags,
}

impl View {
    pub const ALL: [View; 3] = [View::Tasks, View::Projects, View::Tags];

    pub fn title(&self) -> &'static str {
        match self {
            View::Tasks => "Tasks",
            View::Projects => "Projects",
            View::Tags => "Tags",
        }
    }
}

/// How the Tasks view lays out tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskViewMode {
    List,
    Board,
}

/// Work requested from inside scope handlers. Handlers only queue actions;
/// the app applies them once dispatch has returned.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    GoTo(View),
    ToggleViewMode,
    ClearFilter,
    Quit,
    OpenItem(usize),
    ToggleItem(usize),
    NewItem,
    OpenCard(GridPos),
    ToggleCard(GridPos),
    NewInColumn(usize),
    CloseDetail,
    ActivateField(DetailField),
}

pub type Outbox = Rc<RefCell<Vec<Action>>>;

/// The navigator mounted for the current view.
pub enum Navigator {
    List(ListNav),
    Board(GridNav),
}

/// What the status-row text input is for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    NewTask { status: Option<String> },
    NewProject,
    NewTag,
    RenameTag(usize),
    EditTitle(usize),
    EditTags(usize),
    EditDue(usize),
}

impl PromptKind {
    pub fn label(&self) -> &'static str {
        match self {
            PromptKind::NewTask { .. } => "New task",
            PromptKind::NewProject => "New project",
            PromptKind::NewTag => "New tag",
            PromptKind::RenameTag(_) => "Rename tag",
            PromptKind::EditTitle(_) => "Title",
            PromptKind::EditTags(_) => "Tags (comma separated)",
            PromptKind::EditDue(_) => "Due (YYYY-MM-DD, empty to clear)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerKind {
    Project,
    Status,
}

/// A select-style popup. The dispatcher is suspended while one is open.
#[derive(Debug, Clone)]
pub struct Picker {
    pub kind: PickerKind,
    pub task: usize,
    /// (value, label) pairs
    pub options: Vec<(Option<String>, String)>,
    pub cursor: usize,
}

/// Main application state
pub struct App {
    pub workspace: Workspace,
    pub workspace_path: PathBuf,
    pub config: Config,
    pub theme: Theme,
    pub dispatcher: Dispatcher,
    pub view: View,
    pub task_mode: TaskViewMode,
    /// Limit the Tasks view to one project
    pub project_filter: Option<String>,
    pub nav: Option<Navigator>,
    /// Rows of the current list view (task, project or tag indices)
    pub rows: Vec<usize>,
    /// Columns of the board view
    pub columns: IndexMap<String, Column>,
    pub detail: Option<DetailModal>,
    pub prompt: Option<Prompt>,
    pub picker: Option<Picker>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub should_quit: bool,
    pub dirty: bool,
    outbox: Outbox,
    _shell: ScopeHandle,
}

impl App {
    pub fn new(workspace: Workspace, workspace_path: PathBuf, config: Config) -> Self {
        let dispatcher = Dispatcher::new(DispatcherConfig {
            chord_timeout: config.keyboard.chord_timeout(),
        });
        let outbox: Outbox = Rc::new(RefCell::new(Vec::new()));
        let shell = shell::register_shell_scope(dispatcher.registry(), Rc::clone(&outbox));
        let theme = Theme::from_config(&config.ui);

        let mut app = App {
            workspace,
            workspace_path,
            config,
            theme,
            dispatcher,
            view: View::Tasks,
            task_mode: TaskViewMode::List,
            project_filter: None,
            nav: None,
            rows: Vec::new(),
            columns: IndexMap::new(),
            detail: None,
            prompt: None,
            picker: None,
            status_message: None,
            status_is_error: false,
            should_quit: false,
            dirty: false,
            outbox,
            _shell: shell,
        };
        app.mount_view();
        app
    }

    /// Where keyboard focus currently sits, for typing-surface suppression.
    pub fn focus_target(&self) -> FocusTarget {
        if self.prompt.is_some() {
            FocusTarget::TextInput
        } else {
            FocusTarget::Widget
        }
    }

    pub fn list_nav(&self) -> Option<&ListNav> {
        match &self.nav {
            Some(Navigator::List(nav)) => Some(nav),
            _ => None,
        }
    }

    pub fn grid_nav(&self) -> Option<&GridNav> {
        match &self.nav {
            Some(Navigator::Board(nav)) => Some(nav),
            _ => None,
        }
    }

    /// Replace the current view's navigator. The old one is dropped first so
    /// its scope is gone before the new one registers.
    pub fn mount_view(&mut self) {
        self.nav = None;
        self.recompute_rows();

        let registry = self.dispatcher.registry();
        let kb = &self.config.keyboard;
        let nav = if self.view == View::Tasks && self.task_mode == TaskViewMode::Board {
            let outbox = &self.outbox;
            let options = GridNavOptions::default()
                .loop_cols(kb.loop_columns)
                .loop_rows(kb.loop_rows)
                .on_open(push(outbox, Action::OpenCard))
                .on_toggle(push(outbox, Action::ToggleCard))
                .on_new_in_col(push(outbox, Action::NewInColumn));
            Navigator::Board(GridNav::mount(registry, self.board_shape(), options))
        } else {
            let outbox = &self.outbox;
            let mut options = ListNavOptions::default()
                .wrap(kb.wrap_lists)
                .on_open(push(outbox, Action::OpenItem));
            if self.view == View::Tasks {
                options = options.on_toggle(push(outbox, Action::ToggleItem));
            }
            let new_outbox = Rc::clone(outbox);
            options = options.on_new(move || new_outbox.borrow_mut().push(Action::NewItem));
            Navigator::List(ListNav::mount(registry, self.list_len(), options))
        };
        self.nav = Some(nav);
        if self.detail.is_some() {
            self.set_nav_enabled(false);
        }
    }

    fn recompute_rows(&mut self) {
        let filter = self.project_filter.as_deref();
        self.rows = match self.view {
            View::Tasks => self.workspace.visible_tasks(filter),
            View::Projects => (0..self.workspace.projects.len()).collect(),
            View::Tags => (0..self.workspace.tags.len()).collect(),
        };
        self.columns = self.workspace.board_columns(filter);
    }

    /// Number of list items; the Projects view has a leading "New Project" tile.
    pub fn list_len(&self) -> usize {
        match self.view {
            View::Projects => self.rows.len() + 1,
            _ => self.rows.len(),
        }
    }

    fn board_shape(&self) -> GridShape {
        GridShape::from_lengths(self.columns.values().map(|c| c.tasks.len()).collect())
    }

    /// Recompute rows after a data change and let the navigator follow.
    pub fn refresh(&mut self) {
        self.recompute_rows();
        let len = self.list_len();
        let shape = self.board_shape();
        match &self.nav {
            Some(Navigator::List(nav)) => nav.set_count(len),
            Some(Navigator::Board(nav)) => nav.set_shape(shape),
            None => {}
        }
    }

    fn set_nav_enabled(&self, enabled: bool) {
        match &self.nav {
            Some(Navigator::List(nav)) => nav.set_enabled(enabled),
            Some(Navigator::Board(nav)) => nav.set_enabled(enabled),
            None => {}
        }
    }

    /// Task index under a board position, if a card is there.
    pub fn task_at(&self, pos: GridPos) -> Option<usize> {
        self.columns
            .get_index(pos.col)
            .and_then(|(_, col)| col.tasks.get(pos.row))
            .copied()
    }

    pub fn set_status(&mut self, msg: impl Into<String>, is_error: bool) {
        self.status_message = Some(msg.into());
        self.status_is_error = is_error;
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: impl Into<String>) {
        self.prompt = Some(Prompt {
            kind,
            buffer: initial.into(),
        });
    }

    pub fn open_detail(&mut self, task: usize) {
        if task >= self.workspace.tasks.len() {
            return;
        }
        self.detail = Some(DetailModal::open(
            self.dispatcher.registry(),
            Rc::clone(&self.outbox),
            task,
        ));
        // Lower scopes would never see keys anyway; this also keeps the
        // list highlight from moving under the modal.
        self.set_nav_enabled(false);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
        self.set_nav_enabled(true);
    }

    pub fn open_picker(&mut self, kind: PickerKind, task: usize) {
        let Some(t) = self.workspace.tasks.get(task) else {
            return;
        };
        let (options, current): (Vec<(Option<String>, String)>, Option<String>) = match kind {
            PickerKind::Project => {
                let mut opts = vec![(None, "(none)".to_string())];
                opts.extend(
                    self.workspace
                        .projects
                        .iter()
                        .map(|p| (Some(p.id.clone()), p.name.clone())),
                );
                (opts, t.project_id.clone())
            }
            PickerKind::Status => (
                self.workspace
                    .statuses
                    .iter()
                    .map(|s| (Some(s.id.clone()), s.label.clone()))
                    .collect(),
                t.status_id.clone(),
            ),
        };
        let cursor = options
            .iter()
            .position(|(v, _)| *v == current)
            .unwrap_or(0);
        self.picker = Some(Picker {
            kind,
            task,
            options,
            cursor,
        });
        self.dispatcher.set_suspended(true);
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
        self.dispatcher.set_suspended(false);
    }

    /// Apply everything scope handlers queued during the last dispatch.
    pub fn apply_actions(&mut self) {
        let actions = std::mem::take(&mut *self.outbox.borrow_mut());
        for action in actions {
            self.apply(action);
        }
    }

    fn apply(&mut self, action: Action) {
        tracing::debug!(?action, "applying action");
        match action {
            Action::Quit => self.should_quit = true,
            Action::GoTo(view) => {
                if view == View::Tasks {
                    self.project_filter = None;
                }
                if self.view != view || view == View::Tasks {
                    self.view = view;
                    self.mount_view();
                }
            }
            Action::ToggleViewMode => {
                if self.view == View::Tasks {
                    self.task_mode = match self.task_mode {
                        TaskViewMode::List => TaskViewMode::Board,
                        TaskViewMode::Board => TaskViewMode::List,
                    };
                    self.mount_view();
                }
            }
            Action::ClearFilter => {
                if self.project_filter.take().is_some() {
                    self.mount_view();
                }
            }
            Action::OpenItem(i) => self.open_item(i),
            Action::ToggleItem(i) => {
                if let Some(&task) = self.rows.get(i) {
                    self.toggle_task(task);
                }
            }
            Action::NewItem => match self.view {
                View::Tasks => self.open_prompt(PromptKind::NewTask { status: None }, ""),
                View::Projects => self.open_prompt(PromptKind::NewProject, ""),
                View::Tags => self.open_prompt(PromptKind::NewTag, ""),
            },
            Action::OpenCard(pos) => {
                if let Some(task) = self.task_at(pos) {
                    self.open_detail(task);
                }
            }
            Action::ToggleCard(pos) => {
                if let Some(task) = self.task_at(pos) {
                    self.toggle_task(task);
                }
            }
            Action::NewInColumn(col) => {
                let status = self.columns.get_index(col).map(|(id, _)| id.clone());
                self.open_prompt(PromptKind::NewTask { status }, "");
            }
            Action::CloseDetail => self.close_detail(),
            Action::ActivateField(field) => self.activate_field(field),
        }
    }

    fn open_item(&mut self, index: usize) {
        match self.view {
            View::Tasks => {
                if let Some(&task) = self.rows.get(index) {
                    self.open_detail(task);
                }
            }
            View::Projects => {
                if index == 0 {
                    self.open_prompt(PromptKind::NewProject, "");
                } else if let Some(project) = self.workspace.projects.get(index - 1) {
                    self.project_filter = Some(project.id.clone());
                    self.view = View::Tasks;
                    self.mount_view();
                }
            }
            View::Tags => {
                if let Some(tag) = self.workspace.tags.get(index) {
                    let name = tag.name.clone();
                    self.open_prompt(PromptKind::RenameTag(index), name);
                }
            }
        }
    }

    fn toggle_task(&mut self, task: usize) {
        self.workspace.toggle_completed(task);
        self.dirty = true;
        self.refresh();
    }

    fn activate_field(&mut self, field: DetailField) {
        let Some(task) = self.detail.as_ref().map(|d| d.task) else {
            return;
        };
        let Some(t) = self.workspace.tasks.get(task) else {
            return;
        };
        match field {
            DetailField::Title => {
                let name = t.name.clone();
                self.open_prompt(PromptKind::EditTitle(task), name);
            }
            DetailField::Tags => {
                let tags = t.tags.join(", ");
                self.open_prompt(PromptKind::EditTags(task), tags);
            }
            DetailField::Due => {
                let due = t.due_date.map(|d| d.to_string()).unwrap_or_default();
                self.open_prompt(PromptKind::EditDue(task), due);
            }
            DetailField::Project => self.open_picker(PickerKind::Project, task),
            DetailField::Status => self.open_picker(PickerKind::Status, task),
        }
    }

    pub fn save(&mut self) -> Result<(), crate::io::workspace_io::WorkspaceError> {
        if self.dirty {
            save_workspace(&self.workspace_path, &self.workspace)?;
            self.dirty = false;
            tracing::info!(path = %self.workspace_path.display(), "workspace saved");
        }
        Ok(())
    }
}

/// Callback that queues `make(arg)` on the outbox.
fn push<T: 'static>(outbox: &Outbox, make: fn(T) -> Action) -> impl FnMut(T) + 'static {
    let outbox = Rc::clone(outbox);
    move |arg| outbox.borrow_mut().push(make(arg))
}

/// Run the TUI application
pub fn run(workspace_path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = load_workspace(workspace_path)?;
    let mut app = App::new(workspace, workspace_path.to_path_buf(), config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableFocusChange,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Restore the terminal on panic, except for panics a scope handler
    // raised: the dispatcher recovers from those and logs them.
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if crate::keyboard::scope::handler_running() {
            return;
        }
        let _ = disable_raw_mode();
        let _ = execute!(
            io::stdout(),
            DisableBracketedPaste,
            DisableFocusChange,
            LeaveAlternateScreen
        );
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);
    let saved = app.save();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result?;
    saved?;
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                Event::FocusLost => app.dispatcher.blur(),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::{app_with_tasks, key, type_text};
    use crossterm::event::KeyCode;

    #[test]
    fn switching_views_replaces_the_navigator_scope() {
        let mut app = app_with_tasks(&["alpha"]);
        // shell + task list
        assert_eq!(app.dispatcher.registry().len(), 2);
        handle_key(&mut app, key(KeyCode::Char('v')));
        assert_eq!(app.task_mode, TaskViewMode::Board);
        assert!(app.grid_nav().is_some());
        assert_eq!(app.dispatcher.registry().len(), 2);

        type_text(&mut app, "gp");
        assert_eq!(app.view, View::Projects);
        assert!(app.list_nav().is_some());
        assert_eq!(app.dispatcher.registry().len(), 2);
        // New Project tile plus no projects
        assert_eq!(app.list_len(), 1);
    }

    #[test]
    fn v_only_toggles_in_tasks_view() {
        let mut app = app_with_tasks(&[]);
        type_text(&mut app, "ga");
        handle_key(&mut app, key(KeyCode::Char('v')));
        assert_eq!(app.task_mode, TaskViewMode::List);
    }

    #[test]
    fn opening_a_project_filters_tasks() {
        let mut app = app_with_tasks(&["loose"]);
        let p = app.workspace.add_project("Launch");
        let pid = app.workspace.projects[p].id.clone();
        let t = app.workspace.add_task("scoped", None, Some(pid.clone()));
        type_text(&mut app, "gp");
        // Skip the New Project tile
        type_text(&mut app, "jj");
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(app.view, View::Tasks);
        assert_eq!(app.project_filter, Some(pid));
        assert_eq!(app.rows, vec![t]);

        // Esc with nothing selected clears the filter
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.project_filter, None);
        assert_eq!(app.rows.len(), 2);
    }

    #[test]
    fn new_project_tile_opens_prompt() {
        let mut app = app_with_tasks(&[]);
        type_text(&mut app, "gp");
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.prompt.as_ref().map(|p| p.kind.clone()),
            Some(PromptKind::NewProject)
        );
        type_text(&mut app, "Roadmap");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.workspace.projects[0].name, "Roadmap");
        assert_eq!(app.list_len(), 2);
    }

    #[test]
    fn x_toggles_completion_and_reorders() {
        let mut app = app_with_tasks(&["alpha", "beta"]);
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('x')));
        assert!(app.workspace.tasks[0].is_completed);
        assert!(app.dirty);
        // Completed tasks sort after open ones
        assert_eq!(app.rows, vec![1, 0]);
    }

    #[test]
    fn board_n_creates_task_in_column() {
        let mut app = app_with_tasks(&["alpha"]);
        handle_key(&mut app, key(KeyCode::Char('v')));
        type_text(&mut app, "jl");
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(
            app.prompt.as_ref().map(|p| p.kind.clone()),
            Some(PromptKind::NewTask {
                status: Some("default:in_progress".into())
            })
        );
        type_text(&mut app, "wip");
        handle_key(&mut app, key(KeyCode::Enter));
        let task = app.workspace.tasks.last().expect("task");
        assert_eq!(task.status_id.as_deref(), Some("default:in_progress"));
        assert_eq!(app.columns["default:in_progress"].tasks.len(), 1);
    }

    #[test]
    fn status_picker_from_detail() {
        let mut app = app_with_tasks(&["alpha"]);
        app.open_detail(0);
        // Title -> Due -> Status
        type_text(&mut app, "jjj");
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.picker.is_some());
        assert!(app.dispatcher.is_suspended());

        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            app.workspace.tasks[0].status_id.as_deref(),
            Some("default:in_progress")
        );
        // Back in the modal
        assert!(app.detail.is_some());
        assert!(!app.dispatcher.is_suspended());
    }

    #[test]
    fn q_quits_but_not_inside_detail() {
        let mut app = app_with_tasks(&["alpha"]);
        app.open_detail(0);
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        handle_key(&mut app, key(KeyCode::Esc));
        handle_key(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn save_writes_only_when_dirty() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("ws.json");
        let mut app = App::new(
            crate::tui::render::test_helpers::workspace_with_tasks(&["alpha"]),
            path.clone(),
            Config::default(),
        );
        app.save().unwrap();
        assert!(!path.exists());

        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('x')));
        app.save().unwrap();
        let loaded = load_workspace(&path).unwrap();
        assert!(loaded.tasks[0].is_completed);
        assert!(!app.dirty);
    }
}
