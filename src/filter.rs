//! Board filters.
//!
//! Categories combine with AND; values inside a category combine with OR.
//! An empty category matches everything.

use serde::{Deserialize, Serialize};

use crate::task::{Priority, Task};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardFilters {
    pub assignees: Vec<String>,
    pub priorities: Vec<Priority>,
    pub tags: Vec<String>,
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) -> bool {
    if let Some(pos) = values.iter().position(|existing| *existing == value) {
        values.remove(pos);
        false
    } else {
        values.push(value);
        true
    }
}

fn dedup_in_order<T: PartialEq>(values: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(values.len());
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

impl BoardFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the assignee if absent, remove it if present. Returns true when now selected.
    pub fn toggle_assignee(&mut self, member_id: impl Into<String>) -> bool {
        toggle(&mut self.assignees, member_id.into())
    }

    pub fn toggle_priority(&mut self, priority: Priority) -> bool {
        toggle(&mut self.priorities, priority)
    }

    pub fn toggle_tag(&mut self, tag: impl Into<String>) -> bool {
        toggle(&mut self.tags, tag.into())
    }

    pub fn set_assignees(&mut self, assignees: Vec<String>) {
        self.assignees = dedup_in_order(assignees);
    }

    pub fn set_priorities(&mut self, priorities: Vec<Priority>) {
        self.priorities = dedup_in_order(priorities);
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.tags = dedup_in_order(tags);
    }

    pub fn clear(&mut self) {
        self.assignees.clear();
        self.priorities.clear();
        self.tags.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.assignees.is_empty() && self.priorities.is_empty() && self.tags.is_empty()
    }

    /// Total number of selected values across categories.
    pub fn active_count(&self) -> usize {
        self.assignees.len() + self.priorities.len() + self.tags.len()
    }

    pub fn matches(&self, task: &Task) -> bool {
        let assignee_ok = self.assignees.is_empty()
            || task
                .assignee
                .as_ref()
                .is_some_and(|assignee| self.assignees.contains(assignee));
        let priority_ok = self.priorities.is_empty() || self.priorities.contains(&task.priority);
        let tag_ok =
            self.tags.is_empty() || task.tags.iter().any(|tag| self.tags.contains(tag));
        assignee_ok && priority_ok && tag_ok
    }
}

/// Tasks satisfying every active filter, in input order.
pub fn filter_tasks<'a>(tasks: &'a [Task], filters: &BoardFilters) -> Vec<&'a Task> {
    tasks.iter().filter(|task| filters.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    fn task(id: &str, priority: Priority, assignee: Option<&str>, tags: &[&str]) -> Task {
        let mut task = Task::new(id, TaskStatus::Todo, priority);
        task.id = id.to_string();
        task.assignee = assignee.map(str::to_string);
        task.tags = tags.iter().map(|t| t.to_string()).collect();
        task
    }

    fn ids(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn empty_filters_return_everything() {
        let tasks = vec![
            task("a", Priority::Low, None, &[]),
            task("b", Priority::High, Some("m1"), &["pool"]),
        ];
        let filtered = filter_tasks(&tasks, &BoardFilters::new());
        assert_eq!(ids(&filtered), vec!["a", "b"]);
    }

    #[test]
    fn or_within_category_and_across_categories() {
        let tasks = vec![
            task("a", Priority::Urgent, Some("m1"), &["gate"]),
            task("b", Priority::Urgent, Some("m2"), &["pool"]),
            task("c", Priority::Low, Some("m1"), &["gate"]),
            task("d", Priority::Urgent, Some("m3"), &["gate"]),
        ];
        let mut filters = BoardFilters::new();
        filters.toggle_assignee("m1");
        filters.toggle_assignee("m2");
        assert_eq!(ids(&filter_tasks(&tasks, &filters)), vec!["a", "b", "c"]);

        filters.toggle_priority(Priority::Urgent);
        assert_eq!(ids(&filter_tasks(&tasks, &filters)), vec!["a", "b"]);

        filters.toggle_tag("gate");
        assert_eq!(ids(&filter_tasks(&tasks, &filters)), vec!["a"]);
    }

    #[test]
    fn unassigned_and_untagged_never_match_active_filters() {
        let bare = task("bare", Priority::Medium, None, &[]);
        let mut filters = BoardFilters::new();
        filters.toggle_assignee("m1");
        assert!(!filters.matches(&bare));

        filters.clear();
        filters.toggle_tag("pool");
        assert!(!filters.matches(&bare));
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut filters = BoardFilters::new();
        assert!(filters.toggle_tag("pool"));
        assert_eq!(filters.active_count(), 1);
        assert!(!filters.toggle_tag("pool"));
        assert!(filters.is_empty());
    }

    #[test]
    fn setters_replace_one_category_and_dedup() {
        let mut filters = BoardFilters::new();
        filters.toggle_tag("pool");
        filters.set_priorities(vec![Priority::High, Priority::High, Priority::Low]);
        assert_eq!(filters.priorities, vec![Priority::High, Priority::Low]);
        assert_eq!(filters.tags, vec!["pool"]);

        filters.clear();
        assert_eq!(filters, BoardFilters::default());
    }

    #[test]
    fn filtering_does_not_touch_inputs() {
        let tasks = vec![task("a", Priority::Low, None, &[])];
        let snapshot = tasks.clone();
        let mut filters = BoardFilters::new();
        filters.toggle_priority(Priority::Urgent);
        let frozen = filters.clone();
        let first = ids(&filter_tasks(&tasks, &filters));
        let second = ids(&filter_tasks(&tasks, &filters));
        assert_eq!(first, second);
        assert_eq!(tasks, snapshot);
        assert_eq!(filters, frozen);
    }
}
