//! Task records and the in-memory task store.
//!
//! Tasks are loaded from a `tasks.json` fixture (a JSON array) and live in
//! memory. The store is updated either per task or by replacing the whole
//! collection, mirroring how the board UI swaps its task list.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::lock::{lock_path_for, write_atomic, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

/// Workflow column a task sits in. The set is closed and ordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Backlog,
    Todo,
    InProgress,
    Review,
    Done,
}

impl TaskStatus {
    /// Column order on the board.
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Backlog,
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "backlog",
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }

    /// Column heading.
    pub fn title(self) -> &'static str {
        match self {
            TaskStatus::Backlog => "Backlog",
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Done => "Done",
        }
    }

    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "backlog" => Ok(TaskStatus::Backlog),
            "todo" | "to_do" => Ok(TaskStatus::Todo),
            "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "review" => Ok(TaskStatus::Review),
            "done" => Ok(TaskStatus::Done),
            _ => Err(Error::InvalidArgument(format!(
                "unknown status '{value}' (expected backlog|todo|in_progress|review|done)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Urgent, Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Urgent => "urgent",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }

    /// Badge color used on cards.
    pub fn color(self) -> &'static str {
        match self {
            Priority::Urgent => "red",
            Priority::High => "orange",
            Priority::Medium => "yellow",
            Priority::Low => "green",
        }
    }

    /// Lower is more pressing.
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::InvalidArgument(format!(
                "unknown priority '{value}' (expected urgent|high|medium|low)"
            ))),
        }
    }
}

/// A point on the community map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskImage {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<TaskImage>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(title: impl Into<String>, status: TaskStatus, priority: Priority) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            status,
            priority,
            assignee: None,
            tags: Vec::new(),
            images: Vec::new(),
            comments: Vec::new(),
            location: None,
            board_id: None,
            created_at: now,
            updated_at: now,
            due_date: None,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
        self.touch();
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn assign(&mut self, member_id: Option<String>) {
        self.assignee = member_id;
        self.touch();
    }

    /// Returns false when the tag was already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.iter().any(|existing| *existing == tag) {
            return false;
        }
        self.tags.push(tag);
        self.touch();
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        let removed = self.tags.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn add_comment(&mut self, author_id: impl Into<String>, body: impl Into<String>) -> &Comment {
        let now = Utc::now();
        self.comments.push(Comment {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.into(),
            body: body.into(),
            created_at: now,
        });
        self.updated_at = now;
        &self.comments[self.comments.len() - 1]
    }

    pub fn add_image(&mut self, url: impl Into<String>, caption: Option<String>) -> &TaskImage {
        let now = Utc::now();
        self.images.push(TaskImage {
            id: Uuid::new_v4().to_string(),
            url: url.into(),
            caption,
            uploaded_at: now,
        });
        self.updated_at = now;
        &self.images[self.images.len() - 1]
    }

    pub fn set_due_date(&mut self, due: Option<NaiveDate>) {
        self.due_date = due;
        self.touch();
    }

    pub fn set_location(&mut self, location: Option<GeoPoint>) {
        self.location = location;
        self.touch();
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != TaskStatus::Done && self.due_date.is_some_and(|due| due < today)
    }
}

/// In-memory task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self> {
        let mut store = Self::new();
        store.replace_all(tasks)?;
        Ok(store)
    }

    /// Load a JSON array fixture. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "task fixture missing, starting empty");
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        let tasks: Vec<Task> = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
        Self::from_tasks(tasks)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let _lock = FileLock::acquire(lock_path_for(path), DEFAULT_LOCK_TIMEOUT_MS)?;
        self.save_unlocked(path)
    }

    /// Write without locking; the caller already holds `<path>.lock`.
    pub fn save_unlocked(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.tasks)?;
        write_atomic(path, json.as_bytes())
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&Task> {
        self.get(id).ok_or_else(|| Error::not_found("task", id))
    }

    /// Swap in a whole new collection. Ids must be unique.
    pub fn replace_all(&mut self, tasks: Vec<Task>) -> Result<()> {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id.as_str()) {
                return Err(Error::InvalidArgument(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
        }
        self.tasks = tasks;
        Ok(())
    }

    pub fn insert(&mut self, task: Task) -> Result<()> {
        if self.get(&task.id).is_some() {
            return Err(Error::InvalidArgument(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Set a task's status. Returns the previous status.
    pub fn update_status(&mut self, id: &str, status: TaskStatus) -> Result<TaskStatus> {
        let task = self.get_mut(id).ok_or_else(|| Error::not_found("task", id))?;
        let previous = task.status;
        task.set_status(status);
        tracing::info!(task = id, from = %previous, to = %status, "task status updated");
        Ok(previous)
    }

    /// Distinct tags in first-seen order.
    pub fn tags(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut tags = Vec::new();
        for tag in self.tasks.iter().flat_map(|task| task.tags.iter()) {
            if seen.insert(tag.as_str()) {
                tags.push(tag.clone());
            }
        }
        tags
    }

    /// Task count per status, in column order.
    pub fn count_by_status(&self) -> [(TaskStatus, usize); 5] {
        TaskStatus::ALL.map(|status| {
            let count = self.tasks.iter().filter(|task| task.status == status).count();
            (status, count)
        })
    }

    /// Tasks belonging to a board.
    pub fn for_board<'a>(&'a self, board_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |task| task.board_id.as_deref() == Some(board_id))
    }
}
