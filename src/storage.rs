//! Data directory layout for cgrs
//!
//! ```text
//! .cgrs/              # configurable via `data_dir`
//!   tasks.json        # Task fixture (array), rewritten when tasks move
//!   boards.json       # Board fixture (array)
//!   members.json      # Board member fixture (array)
//!   events.json       # Community events (array)
//!   rsvp.json         # RSVP selections keyed `event-rsvp-{eventId}`
//! ```

use std::path::{Path, PathBuf};

use crate::board::{load_fixture, Board, BoardMember};
use crate::calendar::Event;
use crate::config::Config;
use crate::error::Result;
use crate::lock::{lock_path_for, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::rsvp::RsvpStore;
use crate::task::TaskStore;

pub const TASKS_FILE: &str = "tasks.json";
pub const BOARDS_FILE: &str = "boards.json";
pub const MEMBERS_FILE: &str = "members.json";
pub const EVENTS_FILE: &str = "events.json";
pub const RSVP_FILE: &str = "rsvp.json";

/// Resolved data directory plus its configuration.
#[derive(Debug, Clone)]
pub struct Storage {
    root: PathBuf,
    data_dir: PathBuf,
    config: Config,
}

impl Storage {
    pub fn new(root: PathBuf, config: Config) -> Self {
        let data_dir = config.data_path(&root);
        Self {
            root,
            data_dir,
            config,
        }
    }

    /// Open `root`, reading `.cgrs.toml` if present.
    pub fn open(root: &Path) -> Self {
        let config = Config::load_from_dir(root);
        Self::new(root.to_path_buf(), config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn boards_file(&self) -> PathBuf {
        self.data_dir.join(BOARDS_FILE)
    }

    pub fn members_file(&self) -> PathBuf {
        self.data_dir.join(MEMBERS_FILE)
    }

    pub fn events_file(&self) -> PathBuf {
        self.data_dir.join(EVENTS_FILE)
    }

    pub fn rsvp_file(&self) -> PathBuf {
        self.data_dir.join(RSVP_FILE)
    }

    pub fn load_tasks(&self) -> Result<TaskStore> {
        TaskStore::load(&self.tasks_file())
    }

    pub fn save_tasks(&self, store: &TaskStore) -> Result<()> {
        store.save(&self.tasks_file())
    }

    /// Exclusive lock on `tasks.json`. Hold it from load through
    /// [`Storage::save_tasks_locked`] so concurrent moves cannot drop each other.
    pub fn lock_tasks(&self) -> Result<FileLock> {
        FileLock::acquire(lock_path_for(&self.tasks_file()), DEFAULT_LOCK_TIMEOUT_MS)
    }

    pub fn save_tasks_locked(&self, _lock: &FileLock, store: &TaskStore) -> Result<()> {
        store.save_unlocked(&self.tasks_file())
    }

    pub fn load_boards(&self) -> Result<Vec<Board>> {
        load_fixture(&self.boards_file())
    }

    pub fn load_members(&self) -> Result<Vec<BoardMember>> {
        load_fixture(&self.members_file())
    }

    pub fn load_events(&self) -> Result<Vec<Event>> {
        load_fixture(&self.events_file())
    }

    pub fn open_rsvps(&self) -> Result<RsvpStore> {
        RsvpStore::open(self.rsvp_file())
    }

    /// RSVP store holding `rsvp.json.lock` until dropped.
    pub fn open_rsvps_locked(&self) -> Result<RsvpStore> {
        RsvpStore::open_locked(self.rsvp_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn paths_follow_configured_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".cgrs.toml"), "data_dir = \"fixtures\"").unwrap();
        let storage = Storage::open(dir.path());
        assert_eq!(storage.data_dir(), dir.path().join("fixtures"));
        assert_eq!(storage.tasks_file(), dir.path().join("fixtures").join("tasks.json"));
        assert_eq!(storage.rsvp_file(), dir.path().join("fixtures").join("rsvp.json"));
    }

    #[test]
    fn missing_fixtures_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path());
        assert!(storage.load_tasks().unwrap().is_empty());
        assert!(storage.load_boards().unwrap().is_empty());
        assert!(storage.load_members().unwrap().is_empty());
        assert!(storage.load_events().unwrap().is_empty());
    }

    #[test]
    fn saved_tasks_reload() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path());
        let mut store = TaskStore::new();
        store
            .insert(crate::task::Task::new(
                "Trim hedges",
                crate::task::TaskStatus::Backlog,
                crate::task::Priority::Low,
            ))
            .unwrap();
        storage.save_tasks(&store).unwrap();
        let reloaded = storage.load_tasks().unwrap();
        assert_eq!(reloaded.tasks(), store.tasks());
    }

    #[test]
    fn task_lock_excludes_other_writers_until_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path());
        let lock_path = lock_path_for(&storage.tasks_file());

        let lock = storage.lock_tasks().unwrap();
        assert!(FileLock::try_acquire(&lock_path).unwrap().is_none());

        let store = storage.load_tasks().unwrap();
        storage.save_tasks_locked(&lock, &store).unwrap();
        assert!(storage.tasks_file().exists());

        drop(lock);
        assert!(FileLock::try_acquire(&lock_path).unwrap().is_some());
    }
}
