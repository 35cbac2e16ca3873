use chrono::{Datelike, Duration, NaiveDate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column key for tasks whose status is missing or unknown.
pub const NO_STATUS: &str = "__no_status__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub status_id: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Tag names
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The default status set: Backlog, In Progress, Blocked, Done.
pub fn default_statuses() -> Vec<Status> {
    [
        ("default:backlog", "Backlog", false),
        ("default:in_progress", "In Progress", false),
        ("default:blocked", "Blocked", false),
        ("default:done", "Done", true),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (id, label, is_done))| Status {
        id: id.to_string(),
        label: label.to_string(),
        is_done,
        position: Some(i as i32),
    })
    .collect()
}

fn default_workspace_name() -> String {
    "Workspace".to_string()
}

/// Everything the app shows: projects, tags, statuses and tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default = "default_workspace_name")]
    pub name: String,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default = "default_statuses")]
    pub statuses: Vec<Status>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace {
            name: default_workspace_name(),
            projects: Vec::new(),
            tags: Vec::new(),
            statuses: default_statuses(),
            tasks: Vec::new(),
        }
    }
}

/// One board column: a status and the indices of its tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub label: String,
    pub tasks: Vec<usize>,
}

impl Workspace {
    pub fn status(&self, id: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Task indices shown in the task list, optionally limited to a project.
    /// Open tasks first, then by priority (higher first), keeping file order
    /// among equals.
    pub fn visible_tasks(&self, project: Option<&str>) -> Vec<usize> {
        let mut idx: Vec<usize> = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| project.is_none() || t.project_id.as_deref() == project)
            .map(|(i, _)| i)
            .collect();
        idx.sort_by_key(|&i| (self.tasks[i].is_completed, -self.tasks[i].priority));
        idx
    }

    /// Group visible tasks into board columns.
    ///
    /// Columns follow status position; statuses referenced by tasks but not
    /// ordered are appended, and tasks without a known status land in a
    /// trailing "No Status" column that only exists when it has tasks.
    pub fn board_columns(&self, project: Option<&str>) -> IndexMap<String, Column> {
        let mut ordered: Vec<&Status> = self.statuses.iter().collect();
        ordered.sort_by_key(|s| s.position.unwrap_or(0));

        let mut columns: IndexMap<String, Column> = ordered
            .iter()
            .map(|s| {
                (
                    s.id.clone(),
                    Column {
                        label: s.label.clone(),
                        tasks: Vec::new(),
                    },
                )
            })
            .collect();

        let mut unknown = Vec::new();
        for i in self.visible_tasks(project) {
            match self.tasks[i].status_id.as_deref() {
                Some(sid) if columns.contains_key(sid) => columns[sid].tasks.push(i),
                _ => unknown.push(i),
            }
        }
        if !unknown.is_empty() {
            columns.insert(
                NO_STATUS.to_string(),
                Column {
                    label: "No Status".to_string(),
                    tasks: unknown,
                },
            );
        }
        columns
    }

    /// Next free `T-N` task id.
    pub fn next_task_id(&self) -> String {
        next_id(self.tasks.iter().map(|t| t.id.as_str()), "T")
    }

    pub fn add_task(
        &mut self,
        name: &str,
        status_id: Option<String>,
        project_id: Option<String>,
    ) -> usize {
        let status_id = status_id
            .filter(|s| s != NO_STATUS)
            .or_else(|| self.first_open_status());
        let task = Task {
            id: self.next_task_id(),
            name: name.trim().to_string(),
            project_id,
            status_id,
            priority: 0,
            is_completed: false,
            due_date: None,
            tags: Vec::new(),
        };
        self.tasks.push(task);
        self.tasks.len() - 1
    }

    pub fn add_project(&mut self, name: &str) -> usize {
        let id = next_id(self.projects.iter().map(|p| p.id.as_str()), "P");
        self.projects.push(Project {
            id,
            name: name.trim().to_string(),
        });
        self.projects.len() - 1
    }

    /// Add a tag unless one with the same name (case-insensitive) exists.
    /// Returns the tag's index either way.
    pub fn add_tag(&mut self, name: &str) -> usize {
        let name = name.trim();
        if let Some(i) = self
            .tags
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(name))
        {
            return i;
        }
        let id = next_id(self.tags.iter().map(|t| t.id.as_str()), "G");
        self.tags.push(Tag {
            id,
            name: name.to_string(),
            color: None,
        });
        self.tags.len() - 1
    }

    pub fn rename_tag(&mut self, index: usize, name: &str) {
        let name = name.trim();
        let Some(old) = self.tags.get(index).map(|t| t.name.clone()) else {
            return;
        };
        for task in &mut self.tasks {
            for tag in &mut task.tags {
                if tag.eq_ignore_ascii_case(&old) {
                    *tag = name.to_string();
                }
            }
        }
        self.tags[index].name = name.to_string();
    }

    pub fn toggle_completed(&mut self, index: usize) {
        if let Some(task) = self.tasks.get_mut(index) {
            task.is_completed = !task.is_completed;
        }
    }

    /// Set a task's tags from a comma separated list, creating unknown tags.
    pub fn set_task_tags(&mut self, index: usize, list: &str) {
        let names: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                let i = self.add_tag(s);
                self.tags[i].name.clone()
            })
            .collect();
        if let Some(task) = self.tasks.get_mut(index) {
            task.tags = names;
        }
    }

    fn first_open_status(&self) -> Option<String> {
        let mut ordered: Vec<&Status> = self.statuses.iter().collect();
        ordered.sort_by_key(|s| s.position.unwrap_or(0));
        ordered
            .into_iter()
            .find(|s| !s.is_done)
            .map(|s| s.id.clone())
    }
}

fn next_id<'a>(existing: impl Iterator<Item = &'a str>, prefix: &str) -> String {
    let max = existing
        .filter_map(|id| id.strip_prefix(prefix)?.strip_prefix('-')?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("{}-{}", prefix, max + 1)
}

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Short label for a due date relative to `today`: "Today", "Tomorrow", a
/// weekday inside the current Monday-based week, otherwise `Ddd M/D`.
pub fn format_due_label(due: NaiveDate, today: NaiveDate) -> String {
    if due == today {
        return "Today".to_string();
    }
    if due == today + Duration::days(1) {
        return "Tomorrow".to_string();
    }
    let day = DAY_NAMES[due.weekday().num_days_from_monday() as usize];
    let week_start = today - Duration::days(today.weekday().num_days_from_monday() as i64);
    let week_end = week_start + Duration::days(6);
    if due >= week_start && due <= week_end {
        return day.to_string();
    }
    format!("{} {}/{}", day, due.month(), due.day())
}
