//! Configuration loading and management
//!
//! Handles parsing of `.cgrs.toml` configuration files.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::forms::{PhotoLimits, MAX_PHOTOS, MAX_PHOTO_BYTES};
use crate::request::{DateBasis, RequestIdGenerator, DEFAULT_ID_PREFIX};

pub const CONFIG_FILE: &str = ".cgrs.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding fixtures and the RSVP file, relative to the working dir
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default)]
    pub requests: RequestsConfig,

    #[serde(default)]
    pub board: BoardConfig,

    #[serde(default)]
    pub calendar: CalendarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            requests: RequestsConfig::default(),
            board: BoardConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

fn default_data_dir() -> String {
    ".cgrs".to_string()
}

/// Management request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestsConfig {
    /// Leading segment of generated request ids
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,

    /// Calendar used for the date segment
    #[serde(default)]
    pub date_basis: DateBasis,

    /// Pause before a submission is reported as accepted
    #[serde(default)]
    pub submission_delay_ms: u64,

    #[serde(default = "default_max_photos")]
    pub max_photos: usize,

    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: u64,
}

fn default_id_prefix() -> String {
    DEFAULT_ID_PREFIX.to_string()
}

fn default_max_photos() -> usize {
    MAX_PHOTOS
}

fn default_max_photo_bytes() -> u64 {
    MAX_PHOTO_BYTES
}

impl Default for RequestsConfig {
    fn default() -> Self {
        Self {
            id_prefix: default_id_prefix(),
            date_basis: DateBasis::default(),
            submission_delay_ms: 0,
            max_photos: default_max_photos(),
            max_photo_bytes: default_max_photo_bytes(),
        }
    }
}

/// Board view configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Board shown when `--board` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_board: Option<String>,
}

/// Calendar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First day of the week in month grids
    #[serde(default = "default_week_start")]
    pub week_start: String,
}

fn default_week_start() -> String {
    "sunday".to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: default_week_start(),
        }
    }
}

impl CalendarConfig {
    pub fn week_start(&self) -> Result<Weekday> {
        self.week_start.trim().parse::<Weekday>().map_err(|_| {
            Error::InvalidConfig(format!(
                "calendar.week_start: invalid weekday '{}'",
                self.week_start
            ))
        })
    }
}

impl Config {
    /// Load configuration from a `.cgrs.toml` file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Data directory resolved against `root`.
    pub fn data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.data_dir)
    }

    pub fn photo_limits(&self) -> PhotoLimits {
        PhotoLimits {
            max_photos: self.requests.max_photos,
            max_bytes: self.requests.max_photo_bytes,
        }
    }

    pub fn id_generator(&self) -> RequestIdGenerator {
        RequestIdGenerator::new(self.requests.id_prefix.trim(), self.requests.date_basis)
    }

    fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(Error::InvalidConfig("data_dir cannot be empty".to_string()));
        }
        self.requests.validate()?;
        self.calendar.week_start()?;
        Ok(())
    }
}

impl RequestsConfig {
    fn validate(&self) -> Result<()> {
        let prefix = self.id_prefix.trim();
        if prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "requests.id_prefix cannot be empty".to_string(),
            ));
        }
        if !prefix
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
        {
            return Err(Error::InvalidConfig(
                "requests.id_prefix must be uppercase alphanumeric".to_string(),
            ));
        }
        if self.max_photos == 0 {
            return Err(Error::InvalidConfig(
                "requests.max_photos must be > 0".to_string(),
            ));
        }
        if self.max_photo_bytes == 0 {
            return Err(Error::InvalidConfig(
                "requests.max_photo_bytes must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
