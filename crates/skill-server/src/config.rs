use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_AUDIO_BASE_URL: &str = "https://s3.amazonaws.com/alexa-pomodoro/";

/// Where session records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage kind: {other}")),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub audio_base_url: String,
    /// When set, requests for any other application id are rejected.
    pub app_id: Option<String>,
    pub storage: StorageKind,
    pub debug: bool,
}

fn tomato_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".tomato-helper")
}

pub fn default_config_path() -> PathBuf {
    tomato_dir().join("config.json")
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: tomato_dir().join("sessions"),
            audio_base_url: DEFAULT_AUDIO_BASE_URL.to_string(),
            app_id: None,
            storage: StorageKind::File,
            debug: false,
        }
    }
}

impl SkillConfig {
    /// Defaults, then `~/.tomato-helper/config.json`, then the environment.
    ///
    /// Fails only when the config file exists but cannot be used; callers
    /// usually fall back to [`SkillConfig::from_env`] and report the error.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&default_config_path())?.unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Defaults with environment overrides, ignoring any config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Reads a JSON config file. A missing file is `Ok(None)`.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str::<SkillConfig>(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(dir) = lookup("TOMATO_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("BASE_URL") {
            self.audio_base_url = url;
        }
        if let Some(app_id) = lookup("SKILL_APP_ID") {
            self.app_id = Some(app_id).filter(|id| !id.trim().is_empty());
        }
        if let Some(storage) = lookup("SKILL_STORAGE").and_then(|v| v.parse().ok()) {
            self.storage = storage;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.debug = parse_bool_env(&debug);
        }
    }
}
