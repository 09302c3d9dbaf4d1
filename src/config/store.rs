use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::Settings;
use crate::errors::{AppError, AppResult};

/// Read access to the persisted key-value settings owned by the extension UI.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Current contents of the store.
    async fn snapshot(&self) -> AppResult<Map<String, Value>>;

    /// Typed settings parsed from the current snapshot.
    async fn load(&self) -> AppResult<Settings> {
        Settings::from_map(self.snapshot().await?)
    }
}

/// In-memory store, filled by the host process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<Map<String, Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(values: Map<String, Value>) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.values.write().insert(key.into(), value);
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.values.write().remove(key)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn snapshot(&self) -> AppResult<Map<String, Value>> {
        Ok(self.values.read().clone())
    }
}

/// Store backed by a JSON object on disk, re-read on every snapshot so that
/// edits made by the settings UI are picked up by the next task.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn snapshot(&self) -> AppResult<Map<String, Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Settings file {} not found, using empty settings", self.path.display());
                return Ok(Map::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(AppError::ConfigurationError(format!(
                "Settings file {} must contain a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(AppError::ConfigurationError(format!(
                "Failed to parse settings file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
