#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;

/// A temporary working directory holding a `.cgrs` data directory.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::create_dir_all(dir.path().join(".cgrs")).expect("data dir");
        Self { dir }
    }

    /// Seeded with the grounds board fixture.
    pub fn seeded() -> Self {
        let dir = Self::new();
        dir.write_data("tasks.json", &tasks_fixture());
        dir.write_data("boards.json", &boards_fixture());
        dir.write_data("members.json", &members_fixture());
        dir.write_data("events.json", &events_fixture());
        dir
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(".cgrs").join(name)
    }

    pub fn write_data(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.data_path(name);
        fs::write(&path, serde_json::to_string_pretty(value).expect("json")).expect("write fixture");
        path
    }

    pub fn read_data(&self, name: &str) -> Value {
        let raw = fs::read_to_string(self.data_path(name)).expect("read fixture");
        serde_json::from_str(&raw).expect("parse fixture")
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join(".cgrs.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn write_file(&self, rel_path: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cgrs_cmd();
        cmd.current_dir(self.path());
        cmd
    }
}

pub fn cgrs_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cgrs").expect("binary");
    cmd.env_remove("CGRS_DIR");
    cmd.env_remove("RUST_LOG");
    cmd
}

pub fn parse_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("json output")
}

fn task(id: &str, title: &str, status: &str, priority: &str, assignee: Option<&str>, tags: &[&str]) -> Value {
    let mut value = json!({
        "id": id,
        "title": title,
        "description": "",
        "status": status,
        "priority": priority,
        "tags": tags,
        "boardId": "board-grounds",
        "createdAt": "2024-05-01T09:00:00Z",
        "updatedAt": "2024-05-01T09:00:00Z"
    });
    if let Some(assignee) = assignee {
        value["assignee"] = json!(assignee);
    }
    value
}

pub fn tasks_fixture() -> Value {
    json!([
        task("t1", "Replace lobby bulbs", "todo", "urgent", Some("m1"), &["electrical"]),
        task("t2", "Mow north lawn", "backlog", "low", Some("m2"), &["grounds"]),
        task("t3", "Fix pool gate latch", "in_progress", "high", Some("m1"), &["pool", "safety"]),
        task("t4", "Repaint parking lines", "review", "medium", None, &["parking"]),
        task("t5", "Clear storm drain", "done", "urgent", Some("m2"), &["grounds", "safety"]),
    ])
}

pub fn boards_fixture() -> Value {
    json!([
        {
            "id": "board-grounds",
            "name": "Grounds & Facilities",
            "description": "Shared spaces upkeep",
            "color": "green",
            "icon": "tree",
            "taskCount": 5,
            "createdAt": "2024-04-01T00:00:00Z",
            "updatedAt": "2024-04-01T00:00:00Z"
        },
        {
            "id": "board-events",
            "name": "Events",
            "color": "purple",
            "taskCount": 2,
            "createdAt": "2024-04-01T00:00:00Z",
            "updatedAt": "2024-04-01T00:00:00Z"
        }
    ])
}

pub fn members_fixture() -> Value {
    json!([
        { "id": "m1", "name": "Rosa Alvarez", "email": "rosa@example.com", "role": "maintenance" },
        { "id": "m2", "name": "Theo Park", "email": "theo@example.com", "role": "grounds" }
    ])
}

pub fn events_fixture() -> Value {
    json!([
        {
            "id": "ev-market",
            "slug": "farmers-market",
            "title": "Farmers Market",
            "date": "2024-06-01",
            "startTime": "09:00:00",
            "endTime": "13:00:00",
            "location": "Clubhouse lot",
            "category": "community"
        },
        {
            "id": "ev-movie",
            "slug": "movie-night",
            "title": "Movie Night",
            "date": "2024-06-14",
            "startTime": "19:30:00",
            "location": "Pool deck"
        }
    ])
}
