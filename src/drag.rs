//! Drag-and-drop controller for moving cards between status columns.
//!
//! A single drag session at a time: `start` records the card, `hover` tracks
//! the last valid drop target under the pointer, and `drop_on` commits a
//! status change when the resolved column differs from the card's current
//! one. Every drop or cancel returns the controller to idle.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::task::{TaskStatus, TaskStore};

/// Something the pointer can be released over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A status column.
    Column(TaskStatus),
    /// Another card; resolves to the column that card sits in.
    Card(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        task_id: String,
        origin: TaskStatus,
        hover: Option<TaskStatus>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DropOutcome {
    Moved {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
    /// Released over the column the card already sits in.
    Unchanged { task_id: String, status: TaskStatus },
    /// Released with no target and no remembered hover, either because the
    /// pointer never reached a column or because `leave()` cleared it.
    NoTarget { task_id: String },
    NotDragging,
}

impl DropOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, DropOutcome::Moved { .. })
    }
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Card hidden from its origin column while the drag overlay shows it.
    pub fn hidden_task(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { task_id, .. } => Some(task_id.as_str()),
            DragState::Idle => None,
        }
    }

    pub fn start(&mut self, task_id: &str, store: &TaskStore) -> Result<()> {
        if let DragState::Dragging { task_id: active, .. } = &self.state {
            return Err(Error::InvalidArgument(format!(
                "drag already in progress for task '{active}'"
            )));
        }
        let task = store.require(task_id)?;
        tracing::debug!(task = task_id, origin = %task.status, "drag started");
        self.state = DragState::Dragging {
            task_id: task.id.clone(),
            origin: task.status,
            hover: None,
        };
        Ok(())
    }

    /// Pointer moved over a target. `None` keeps the last valid target.
    pub fn hover(&mut self, target: Option<&DropTarget>, store: &TaskStore) {
        let resolved = target.and_then(|target| resolve_target(target, store));
        if let DragState::Dragging { hover, .. } = &mut self.state {
            if resolved.is_some() {
                *hover = resolved;
            }
        }
    }

    /// Pointer left every target; a release now lands nowhere.
    pub fn leave(&mut self) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = None;
        }
    }

    /// Release the card. An unresolvable `target` falls back to the last hover.
    pub fn drop_on(&mut self, target: Option<&DropTarget>, store: &mut TaskStore) -> Result<DropOutcome> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { task_id, hover, .. } = state else {
            return Ok(DropOutcome::NotDragging);
        };

        let resolved = target
            .and_then(|target| resolve_target(target, store))
            .or(hover);
        let Some(to) = resolved else {
            tracing::debug!(task = %task_id, "drop outside any column");
            return Ok(DropOutcome::NoTarget { task_id });
        };

        let current = store.require(&task_id)?.status;
        if current == to {
            return Ok(DropOutcome::Unchanged {
                task_id,
                status: current,
            });
        }

        let from = store.update_status(&task_id, to)?;
        Ok(DropOutcome::Moved { task_id, from, to })
    }

    /// Abort the drag without touching any task.
    pub fn cancel(&mut self) {
        if let DragState::Dragging { task_id, .. } = &self.state {
            tracing::debug!(task = %task_id, "drag cancelled");
        }
        self.state = DragState::Idle;
    }
}

fn resolve_target(target: &DropTarget, store: &TaskStore) -> Option<TaskStatus> {
    match target {
        DropTarget::Column(status) => Some(*status),
        DropTarget::Card(id) => store.get(id).map(|task| task.status),
    }
}

/// Start and immediately drop a card on a column.
pub fn move_task(store: &mut TaskStore, task_id: &str, status: TaskStatus) -> Result<DropOutcome> {
    let mut controller = DragController::new();
    controller.start(task_id, store)?;
    controller.drop_on(Some(&DropTarget::Column(status)), store)
}
