//! Event RSVP persistence.
//!
//! Stored as one JSON object keyed `event-rsvp-{eventId}`, each value
//! `{ "status": "attending" | "interested", "timestamp": <RFC 3339> }`.
//! The file is read once when the store opens and rewritten on every change.
//! Writers that read, change and save should use [`RsvpStore::open_locked`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::{
    lock_path_for, write_atomic, write_atomic_locked, FileLock, DEFAULT_LOCK_TIMEOUT_MS,
};

pub const RSVP_KEY_PREFIX: &str = "event-rsvp-";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Attending,
    Interested,
}

impl fmt::Display for RsvpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RsvpStatus::Attending => f.write_str("attending"),
            RsvpStatus::Interested => f.write_str("interested"),
        }
    }
}

impl FromStr for RsvpStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "attending" => Ok(RsvpStatus::Attending),
            "interested" => Ok(RsvpStatus::Interested),
            _ => Err(Error::InvalidArgument(format!(
                "unknown rsvp status '{value}' (expected attending|interested)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RsvpRecord {
    pub status: RsvpStatus,
    pub timestamp: DateTime<Utc>,
}

pub fn rsvp_key(event_id: &str) -> String {
    format!("{RSVP_KEY_PREFIX}{event_id}")
}

#[derive(Debug)]
pub struct RsvpStore {
    path: PathBuf,
    entries: BTreeMap<String, RsvpRecord>,
    lock: Option<FileLock>,
}

impl RsvpStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path,
            entries,
            lock: None,
        })
    }

    /// Open while holding `<path>.lock` until the store is dropped.
    pub fn open_locked(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock = FileLock::acquire(lock_path_for(&path), DEFAULT_LOCK_TIMEOUT_MS)?;
        let mut store = Self::open(path)?;
        store.lock = Some(lock);
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, event_id: &str) -> Option<&RsvpRecord> {
        self.entries.get(&rsvp_key(event_id))
    }

    pub fn set(&mut self, event_id: &str, status: RsvpStatus, now: DateTime<Utc>) -> Result<RsvpRecord> {
        let record = RsvpRecord {
            status,
            timestamp: now,
        };
        self.entries.insert(rsvp_key(event_id), record);
        self.persist()?;
        tracing::info!(event = event_id, status = %status, "rsvp recorded");
        Ok(record)
    }

    /// Selecting the current status again clears it; anything else replaces it.
    pub fn toggle(
        &mut self,
        event_id: &str,
        status: RsvpStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<RsvpRecord>> {
        if self.get(event_id).map(|record| record.status) == Some(status) {
            self.clear(event_id)?;
            return Ok(None);
        }
        self.set(event_id, status, now).map(Some)
    }

    pub fn clear(&mut self, event_id: &str) -> Result<bool> {
        let removed = self.entries.remove(&rsvp_key(event_id)).is_some();
        if removed {
            self.persist()?;
            tracing::info!(event = event_id, "rsvp cleared");
        }
        Ok(removed)
    }

    /// Event ids with a recorded RSVP.
    pub fn event_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .keys()
            .filter_map(|key| key.strip_prefix(RSVP_KEY_PREFIX))
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        match self.lock {
            Some(_) => write_atomic(&self.path, json.as_bytes()),
            None => write_atomic_locked(&self.path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap()
    }

    #[test]
    fn set_writes_keyed_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsvp.json");
        let mut store = RsvpStore::open(&path).unwrap();
        store.set("summer-bbq", RsvpStatus::Attending, now()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["event-rsvp-summer-bbq"]["status"], "attending");
        assert_eq!(raw["event-rsvp-summer-bbq"]["timestamp"], "2024-06-01T18:00:00Z");

        let reopened = RsvpStore::open(&path).unwrap();
        assert_eq!(reopened.get("summer-bbq").unwrap().status, RsvpStatus::Attending);
        assert_eq!(reopened.event_ids().collect::<Vec<_>>(), vec!["summer-bbq"]);
    }

    #[test]
    fn toggle_same_status_clears_and_other_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RsvpStore::open(dir.path().join("rsvp.json")).unwrap();

        let first = store.toggle("e1", RsvpStatus::Interested, now()).unwrap();
        assert_eq!(first.map(|r| r.status), Some(RsvpStatus::Interested));

        let second = store.toggle("e1", RsvpStatus::Attending, now()).unwrap();
        assert_eq!(second.map(|r| r.status), Some(RsvpStatus::Attending));

        let third = store.toggle("e1", RsvpStatus::Attending, now()).unwrap();
        assert!(third.is_none());
        assert!(store.get("e1").is_none());
    }

    #[test]
    fn locked_store_excludes_others_and_still_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsvp.json");
        let lock_path = lock_path_for(&path);

        let mut store = RsvpStore::open_locked(&path).unwrap();
        assert!(FileLock::try_acquire(&lock_path).unwrap().is_none());
        store.set("e1", RsvpStatus::Attending, now()).unwrap();
        drop(store);

        assert!(FileLock::try_acquire(&lock_path).unwrap().is_some());
        assert!(RsvpStore::open(&path).unwrap().get("e1").is_some());
    }

    #[test]
    fn concurrent_locked_writers_keep_every_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rsvp.json");

        let handles: Vec<_> = (0..8)
            .map(|index| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let mut store = RsvpStore::open_locked(&path).unwrap();
                    store
                        .set(&format!("e{index}"), RsvpStatus::Interested, now())
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = RsvpStore::open(&path).unwrap();
        assert_eq!(store.event_ids().count(), 8);
    }

    #[test]
    fn clear_missing_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = RsvpStore::open(dir.path().join("rsvp.json")).unwrap();
        assert!(!store.clear("nope").unwrap());
        assert!(!store.path().exists());
    }
}
