//! Persisted key-value settings

use crate::error::{Result, SampleCheckerError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub const ORGANIZATION: &str = "Strukt Studio";
pub const APPLICATION: &str = "SampleChecker";

/// Key holding the directory shown when the app last navigated
pub const LAST_DIRECTORY_KEY: &str = "last_directory";

pub trait SettingsStore {
    /// Returns the value for `key` if present and a string
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    /// Persists pending changes
    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

/// Settings stored as a JSON object in `<config_dir>/<organization>/<application>.json`
#[derive(Debug)]
pub struct JsonSettings {
    path: PathBuf,
    file: SettingsFile,
    dirty: bool,
}

impl JsonSettings {
    /// Settings path for a namespace, if the platform has a config directory
    pub fn path_for(organization: &str, application: &str) -> Option<PathBuf> {
        dirs::config_dir().map(|dir| {
            dir.join(organization)
                .join(format!("{}.json", application))
        })
    }

    /// Opens the settings for `(organization, application)`
    pub fn open(organization: &str, application: &str) -> Result<Self> {
        let path = Self::path_for(organization, application).ok_or_else(|| {
            SampleCheckerError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load(path)
    }

    /// Loads settings from `path`; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self::empty(path));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            SampleCheckerError::ConfigError(format!("Failed to read settings file: {}", e))
        })?;

        let file: SettingsFile = serde_json::from_str(&contents).map_err(|e| {
            SampleCheckerError::ConfigError(format!("Failed to parse settings file: {}", e))
        })?;

        Ok(Self {
            path,
            file,
            dirty: false,
        })
    }

    /// An empty store that will write to `path` on flush
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: SettingsFile::default(),
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettings {
    fn get(&self, key: &str) -> Option<String> {
        match self.file.values.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        let value = Value::String(value.to_string());
        if self.file.values.get(key) != Some(&value) {
            self.file.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SampleCheckerError::ConfigError(format!(
                    "Failed to create settings directory: {}",
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(&self.file).map_err(|e| {
            SampleCheckerError::ConfigError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(&self.path, contents).map_err(|e| {
            SampleCheckerError::ConfigError(format!("Failed to write settings file: {}", e))
        })?;

        tracing::debug!(path = %self.path.display(), "settings flushed");
        self.dirty = false;
        Ok(())
    }
}

/// Settings kept in memory only
#[derive(Debug, Default, Clone)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
