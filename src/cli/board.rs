//! cgrs board command implementation
//!
//! Renders the status columns for a board (filter, then group) and lists
//! boards with their task counts.

use std::path::PathBuf;

use serde::Serialize;

use crate::board::{find_board, find_member, Board, BoardColor, BoardMember};
use crate::error::Result;
use crate::filter::BoardFilters;
use crate::grouping::{compose_columns, Column};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{Priority, Task};

/// Options for `cgrs board show`
pub struct ShowOptions {
    pub board: Option<String>,
    pub assignees: Vec<String>,
    pub priorities: Vec<String>,
    pub tags: Vec<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
    pub verbose: bool,
}

/// Options for `cgrs board list`
pub struct ListOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardShowReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    board: Option<&'a Board>,
    filters: &'a BoardFilters,
    total: usize,
    visible: usize,
    hidden_by_filters: usize,
    columns: Vec<Column<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoardListEntry<'a> {
    id: &'a str,
    name: &'a str,
    color: BoardColor,
    task_count: usize,
    cached_task_count: usize,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let store = storage.load_tasks()?;
    let boards = storage.load_boards()?;
    let members = storage.load_members()?;

    let board_id = options
        .board
        .clone()
        .or_else(|| storage.config().board.default_board.clone());
    let board = board_id
        .as_deref()
        .map(|id| find_board(&boards, id))
        .transpose()?;

    let scoped: Vec<Task> = match board {
        Some(board) => store
            .tasks()
            .iter()
            .filter(|task| board.owns(task))
            .cloned()
            .collect(),
        None => store.tasks().to_vec(),
    };

    let filters = build_filters(&options)?;
    let columns = compose_columns(&scoped, &filters);
    let visible: usize = columns.iter().map(Column::count).sum();

    let header = match board {
        Some(board) => format!("cgrs board: {}", board.name),
        None => "cgrs board: all tasks".to_string(),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("tasks", format!("{visible} of {}", scoped.len()));
    if visible < scoped.len() {
        human.push_summary("hidden by filters", (scoped.len() - visible).to_string());
    }
    if filters.is_empty() {
        human.push_summary("filters", "none");
    } else {
        human.push_summary("filters", describe_filters(&filters));
    }
    for column in &columns {
        human.push_detail(format!("{} ({})", column.title, column.count()));
        for task in &column.tasks {
            human.push_detail(format_card(task, &members, options.verbose));
        }
    }
    if visible == 0 && !scoped.is_empty() {
        human.push_warning("no tasks match the active filters");
    }
    human.push_next_step("cgrs task move <id> <status>");

    let report = BoardShowReport {
        board,
        filters: &filters,
        total: scoped.len(),
        visible,
        hidden_by_filters: scoped.len() - visible,
        columns,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board show",
        &report,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let storage = super::open_storage(options.dir.as_deref());
    let store = storage.load_tasks()?;
    let boards = storage.load_boards()?;

    let entries: Vec<BoardListEntry<'_>> = boards
        .iter()
        .map(|board| BoardListEntry {
            id: &board.id,
            name: &board.name,
            color: board.color,
            task_count: board.live_task_count(store.tasks()),
            cached_task_count: board.task_count,
        })
        .collect();

    let mut human = HumanOutput::new(format!("cgrs boards: {}", entries.len()));
    for entry in &entries {
        human.push_summary(
            entry.name,
            format!("{} tasks [{}] ({})", entry.task_count, entry.color, entry.id),
        );
        if entry.task_count != entry.cached_task_count {
            human.push_warning(format!(
                "{}: stored count {} differs from {} tasks on the board",
                entry.id, entry.cached_task_count, entry.task_count
            ));
        }
    }
    if entries.is_empty() {
        human.push_warning(format!("no boards in {}", storage.boards_file().display()));
    } else {
        human.push_next_step("cgrs board show --board <id>");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "board list",
        &entries,
        Some(&human),
    )
}

fn build_filters(options: &ShowOptions) -> Result<BoardFilters> {
    let priorities = options
        .priorities
        .iter()
        .map(|value| value.parse::<Priority>())
        .collect::<Result<Vec<_>>>()?;

    let mut filters = BoardFilters::new();
    filters.set_assignees(options.assignees.clone());
    filters.set_priorities(priorities);
    filters.set_tags(options.tags.clone());
    Ok(filters)
}

fn describe_filters(filters: &BoardFilters) -> String {
    let mut parts = Vec::new();
    if !filters.assignees.is_empty() {
        parts.push(format!("assignee {}", filters.assignees.join("|")));
    }
    if !filters.priorities.is_empty() {
        let names: Vec<&str> = filters.priorities.iter().map(|p| p.as_str()).collect();
        parts.push(format!("priority {}", names.join("|")));
    }
    if !filters.tags.is_empty() {
        parts.push(format!("tag {}", filters.tags.join("|")));
    }
    parts.join(", ")
}

fn format_card(task: &Task, members: &[BoardMember], verbose: bool) -> String {
    let mut line = format!("  [{}] {} {}", task.priority, task.id, task.title);
    if let Some(assignee) = task.assignee.as_deref() {
        let name = find_member(members, assignee)
            .map(|member| member.name.as_str())
            .unwrap_or(assignee);
        line.push_str(&format!(" @{name}"));
    }
    for tag in &task.tags {
        line.push_str(&format!(" #{tag}"));
    }
    if verbose && !task.description.is_empty() {
        line.push_str(&format!(" - {}", task.description));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn options(priorities: &[&str]) -> ShowOptions {
        ShowOptions {
            board: None,
            assignees: vec!["m1".to_string(), "m1".to_string()],
            priorities: priorities.iter().map(|p| p.to_string()).collect(),
            tags: Vec::new(),
            dir: None,
            json: false,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn build_filters_parses_and_dedups() {
        let filters = build_filters(&options(&["urgent", "HIGH", "urgent"])).unwrap();
        assert_eq!(filters.assignees, vec!["m1".to_string()]);
        assert_eq!(filters.priorities, vec![Priority::Urgent, Priority::High]);
        assert_eq!(describe_filters(&filters), "assignee m1, priority urgent|high");
    }

    #[test]
    fn build_filters_rejects_unknown_priority() {
        assert!(build_filters(&options(&["critical"])).is_err());
    }

    #[test]
    fn card_uses_member_name_when_known() {
        let mut task = Task::new("Fix gate", TaskStatus::Todo, Priority::High);
        task.id = "t1".to_string();
        task.assignee = Some("m1".to_string());
        task.tags = vec!["gate".to_string()];
        let members = vec![BoardMember {
            id: "m1".to_string(),
            name: "Rosa".to_string(),
            email: String::new(),
            role: String::new(),
            avatar: None,
        }];
        assert_eq!(format_card(&task, &members, false), "  [high] t1 Fix gate @Rosa #gate");
        assert_eq!(format_card(&task, &[], false), "  [high] t1 Fix gate @m1 #gate");
    }
}
