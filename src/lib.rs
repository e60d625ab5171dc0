//! cgrs - Community resident-services core
//!
//! This library holds the domain logic behind a residents' portal: the
//! maintenance task board, management requests, event RSVPs and the
//! community calendar. The `cgrs` binary is a thin CLI over it.
//!
//! # Core Concepts
//!
//! - **Task board**: tasks in five fixed status columns, filtered by
//!   assignee, priority and tag, moved between columns by drag-and-drop
//! - **Management requests**: validated resident forms stamped with ids like
//!   `CGRS-MAINT-20240315-7Q2K`
//! - **RSVPs**: one attending/interested choice per event, kept under
//!   `event-rsvp-{eventId}` keys
//!
//! # Module Organization
//!
//! - `task`: Task records and the task store
//! - `board`: Boards, members and fixture loading
//! - `filter` / `grouping`: Filter engine and status column composition
//! - `drag`: Drag-and-drop controller
//! - `request`: Request categories and id generation
//! - `forms`: Field validators for resident forms
//! - `rsvp` / `calendar`: Event RSVPs and month grids
//! - `config` / `storage`: `.cgrs.toml` and the data directory layout
//! - `lock`: File locking and atomic writes
//! - `output` / `cli`: Command-line surface

pub mod board;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod drag;
pub mod error;
pub mod filter;
pub mod forms;
pub mod grouping;
pub mod lock;
pub mod output;
pub mod request;
pub mod rsvp;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
