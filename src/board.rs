//! Boards and board members.
//!
//! A board scopes tasks by convention: tasks carry an optional `boardId` and
//! the board itself never owns them. `task_count` is a cached aggregate taken
//! when the board is created; use [`Board::live_task_count`] for a value that
//! follows task moves.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::task::Task;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BoardColor {
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Teal,
}

impl BoardColor {
    pub fn as_str(self) -> &'static str {
        match self {
            BoardColor::Blue => "blue",
            BoardColor::Green => "green",
            BoardColor::Purple => "purple",
            BoardColor::Orange => "orange",
            BoardColor::Red => "red",
            BoardColor::Teal => "teal",
        }
    }
}

impl fmt::Display for BoardColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardColor {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(BoardColor::Blue),
            "green" => Ok(BoardColor::Green),
            "purple" => Ok(BoardColor::Purple),
            "orange" => Ok(BoardColor::Orange),
            "red" => Ok(BoardColor::Red),
            "teal" => Ok(BoardColor::Teal),
            _ => Err(Error::InvalidArgument(format!("unknown board color '{value}'"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: BoardColor,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub task_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Create a board, counting the tasks that already point at it.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        color: BoardColor,
        icon: impl Into<String>,
        tasks: &[Task],
    ) -> Self {
        let now = Utc::now();
        let mut board = Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            color,
            icon: icon.into(),
            task_count: 0,
            created_at: now,
            updated_at: now,
        };
        board.task_count = board.live_task_count(tasks);
        board
    }

    pub fn owns(&self, task: &Task) -> bool {
        task.board_id.as_deref() == Some(self.id.as_str())
    }

    /// Recount from the current task list.
    pub fn live_task_count(&self, tasks: &[Task]) -> usize {
        tasks.iter().filter(|task| self.owns(task)).count()
    }

    /// Rewrite the cached count. Returns true when it changed.
    pub fn refresh_count(&mut self, tasks: &[Task]) -> bool {
        let live = self.live_task_count(tasks);
        if live == self.task_count {
            return false;
        }
        self.task_count = live;
        self.updated_at = Utc::now();
        true
    }
}

/// A resident or staff member tasks can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Load a JSON array fixture; a missing file yields an empty list.
pub fn load_fixture<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn find_board<'a>(boards: &'a [Board], id: &str) -> Result<&'a Board> {
    boards
        .iter()
        .find(|board| board.id == id)
        .ok_or_else(|| Error::not_found("board", id))
}

pub fn find_member<'a>(members: &'a [BoardMember], id: &str) -> Option<&'a BoardMember> {
    members.iter().find(|member| member.id == id)
}
