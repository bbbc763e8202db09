//! Font registration records (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One display name → payload file name entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledFontRecord {
    pub display_name: String,
    pub file_name: String,
}

impl InstalledFontRecord {
    pub fn new(display_name: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            file_name: file_name.into(),
        }
    }

    /// Whether this record points at `file_name` (trimmed, case-insensitive).
    pub fn refers_to(&self, file_name: &str) -> bool {
        self.file_name.trim().to_lowercase() == file_name.trim().to_lowercase()
    }
}

/// Persisted mapping the OS uses to enumerate installed fonts.
pub trait RegistrationStore {
    /// Upsert; the last writer wins on a display-name collision.
    fn set_record(&mut self, display_name: &str, file_name: &str) -> Result<()>;

    /// All string-typed entries. Entries of other types are skipped.
    fn records(&self) -> Result<Vec<InstalledFontRecord>>;

    /// Remove the entry keyed by `display_name`; absent keys are not an error.
    fn delete_record(&mut self, display_name: &str) -> Result<()>;
}

/// Registration store kept as a JSON object on disk, for platforms without a
/// system font registry.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading registration store {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&raw)
            .with_context(|| format!("parsing registration store {}", self.path.display()))?
        {
            Value::Object(map) => Ok(map),
            _ => Err(anyhow!(
                "registration store {} is not a JSON object",
                self.path.display()
            )),
        }
    }

    fn save(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing registration store {}", self.path.display()))
    }
}

impl RegistrationStore for JsonRecordStore {
    fn set_record(&mut self, display_name: &str, file_name: &str) -> Result<()> {
        let mut map = self.load()?;
        map.insert(display_name.to_string(), Value::String(file_name.to_string()));
        self.save(&map)
    }

    fn records(&self) -> Result<Vec<InstalledFontRecord>> {
        Ok(self
            .load()?
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(file_name) => Some(InstalledFontRecord::new(key, file_name)),
                _ => None,
            })
            .collect())
    }

    fn delete_record(&mut self, display_name: &str) -> Result<()> {
        let mut map = self.load()?;
        if map.remove(display_name).is_some() {
            self.save(&map)?;
        }
        Ok(())
    }
}
