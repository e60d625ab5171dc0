//! cgrs task command implementations.

use std::path::PathBuf;

use chrono::Local;
use serde::Serialize;

use crate::board::find_member;
use crate::drag::{move_task, DropOutcome};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{Task, TaskStatus};

pub struct MoveOptions {
    pub id: String,
    pub status: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskShowReport<'a> {
    task: &'a Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignee_name: Option<&'a str>,
    overdue: bool,
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let status: TaskStatus = options.status.parse()?;
    let storage = super::open_storage(options.dir.as_deref());
    let lock = storage.lock_tasks()?;
    let mut store = storage.load_tasks()?;

    let outcome = move_task(&mut store, &options.id, status)?;
    if outcome.moved() {
        storage.save_tasks_locked(&lock, &store)?;
    }
    drop(lock);

    let mut human = match &outcome {
        DropOutcome::Moved { task_id, from, to } => {
            let mut human = HumanOutput::new(format!("cgrs task move: {task_id}"));
            human.push_summary("from", from.title());
            human.push_summary("to", to.title());
            human
        }
        DropOutcome::Unchanged { task_id, status } => {
            let mut human = HumanOutput::new(format!("cgrs task move: {task_id} unchanged"));
            human.push_summary("status", status.title());
            human
        }
        DropOutcome::NoTarget { task_id } => {
            HumanOutput::new(format!("cgrs task move: {task_id} not moved"))
        }
        DropOutcome::NotDragging => HumanOutput::new("cgrs task move: nothing to move"),
    };
    human.push_next_step("cgrs board show");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task move",
        &outcome,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let store = storage.load_tasks()?;
    let members = storage.load_members()?;
    let task = store.require(&options.id)?;

    let assignee_name = task
        .assignee
        .as_deref()
        .and_then(|id| find_member(&members, id))
        .map(|member| member.name.as_str());
    let overdue = task.is_overdue(Local::now().date_naive());

    let mut human = HumanOutput::new(format!("cgrs task: {}", task.title));
    human.push_summary("id", task.id.clone());
    human.push_summary("status", task.status.title());
    human.push_summary(
        "priority",
        format!("{} ({})", task.priority, task.priority.color()),
    );
    if let Some(assignee) = task.assignee.as_deref() {
        human.push_summary("assignee", assignee_name.unwrap_or(assignee).to_string());
    }
    if !task.tags.is_empty() {
        human.push_summary("tags", task.tags.join(", "));
    }
    if let Some(due) = task.due_date {
        human.push_summary("due", due.to_string());
    }
    if let Some(location) = task.location {
        human.push_summary("location", format!("{:.5}, {:.5}", location.lat, location.lng));
    }
    human.push_summary("updated", task.updated_at.to_rfc3339());
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }
    for comment in &task.comments {
        human.push_detail(format!("{}: {}", comment.author_id, comment.body));
    }
    if !task.images.is_empty() {
        human.push_detail(format!("{} image(s) attached", task.images.len()));
    }
    if overdue {
        human.push_warning("task is past its due date");
    }

    let report = TaskShowReport {
        task,
        assignee_name,
        overdue,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &report,
        Some(&human),
    )
}
