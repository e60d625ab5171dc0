//! Status grouping and board column composition.

use serde::Serialize;

use crate::filter::{filter_tasks, BoardFilters};
use crate::task::{Task, TaskStatus};

/// Tasks partitioned by status, one bucket per column in board order.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusGroups<'a> {
    buckets: [Vec<&'a Task>; 5],
}

impl<'a> StatusGroups<'a> {
    pub fn get(&self, status: TaskStatus) -> &[&'a Task] {
        &self.buckets[status.position()]
    }

    /// Buckets in column order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (TaskStatus, &[&'a Task])> + '_ {
        TaskStatus::ALL
            .into_iter()
            .map(move |status| (status, self.buckets[status.position()].as_slice()))
    }

    /// Concatenate buckets in column order.
    pub fn flatten(&self) -> Vec<&'a Task> {
        self.buckets.iter().flatten().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition tasks by status, keeping input order inside each bucket.
pub fn group_by_status<'a, I>(tasks: I) -> StatusGroups<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut buckets: [Vec<&'a Task>; 5] = Default::default();
    for task in tasks {
        buckets[task.status.position()].push(task);
    }
    StatusGroups { buckets }
}

/// One rendered board column.
#[derive(Debug, Clone, Serialize)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub title: &'static str,
    pub tasks: Vec<&'a Task>,
}

impl Column<'_> {
    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// Filter, then group into the five fixed columns.
pub fn compose_columns<'a>(tasks: &'a [Task], filters: &BoardFilters) -> Vec<Column<'a>> {
    compose_columns_excluding(tasks, filters, None)
}

/// Like [`compose_columns`], leaving out the card currently being dragged.
pub fn compose_columns_excluding<'a>(
    tasks: &'a [Task],
    filters: &BoardFilters,
    hidden: Option<&str>,
) -> Vec<Column<'a>> {
    let visible = filter_tasks(tasks, filters)
        .into_iter()
        .filter(|task| hidden != Some(task.id.as_str()));
    let groups = group_by_status(visible);
    groups
        .iter()
        .map(|(status, bucket)| Column {
            status,
            title: status.title(),
            tasks: bucket.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;

    fn task(id: &str, status: TaskStatus) -> Task {
        let mut task = Task::new(id, status, Priority::Medium);
        task.id = id.to_string();
        task
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn groups_five_tasks_into_fixed_buckets() {
        let tasks = vec![
            task("t1", TaskStatus::Backlog),
            task("t2", TaskStatus::Todo),
            task("t3", TaskStatus::Todo),
            task("t4", TaskStatus::Done),
            task("t5", TaskStatus::InProgress),
        ];
        let groups = group_by_status(&tasks);
        assert_eq!(ids(groups.get(TaskStatus::Backlog)), vec!["t1"]);
        assert_eq!(ids(groups.get(TaskStatus::Todo)), vec!["t2", "t3"]);
        assert_eq!(ids(groups.get(TaskStatus::InProgress)), vec!["t5"]);
        assert!(groups.get(TaskStatus::Review).is_empty());
        assert_eq!(ids(groups.get(TaskStatus::Done)), vec!["t4"]);
        assert_eq!(groups.len(), 5);
    }

    #[test]
    fn regrouping_flattened_output_is_stable() {
        let tasks = vec![
            task("a", TaskStatus::Done),
            task("b", TaskStatus::Backlog),
            task("c", TaskStatus::Done),
        ];
        let once = group_by_status(&tasks);
        let twice = group_by_status(once.flatten());
        assert_eq!(once, twice);
        assert_eq!(ids(&twice.flatten()), vec!["b", "a", "c"]);
    }

    #[test]
    fn iter_yields_every_column_in_order() {
        let empty: Vec<Task> = Vec::new();
        let groups = group_by_status(&empty);
        let statuses: Vec<TaskStatus> = groups.iter().map(|(s, _)| s).collect();
        assert_eq!(statuses, TaskStatus::ALL.to_vec());
        assert!(groups.is_empty());
    }

    #[test]
    fn columns_apply_filters_before_grouping() {
        let mut urgent = task("u", TaskStatus::Review);
        urgent.priority = Priority::Urgent;
        let tasks = vec![task("m", TaskStatus::Review), urgent];
        let mut filters = BoardFilters::new();
        filters.toggle_priority(Priority::Urgent);

        let columns = compose_columns(&tasks, &filters);
        assert_eq!(columns.len(), 5);
        assert_eq!(columns[3].title, "Review");
        assert_eq!(ids(&columns[3].tasks), vec!["u"]);
        assert_eq!(columns.iter().map(Column::count).sum::<usize>(), 1);
    }

    #[test]
    fn hidden_task_is_left_out_of_its_column() {
        let tasks = vec![task("a", TaskStatus::Todo), task("b", TaskStatus::Todo)];
        let columns = compose_columns_excluding(&tasks, &BoardFilters::new(), Some("a"));
        assert_eq!(ids(&columns[1].tasks), vec!["b"]);
    }
}
