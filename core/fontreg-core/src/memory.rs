//! In-memory collaborators for tests and embedding (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

use crate::manager::{Operation, Reporter};
use crate::notify::ChangeNotifier;
use crate::outcome::Outcome;
use crate::resources::FontResources;
use crate::store::{InstalledFontRecord, RegistrationStore};

/// Registration store held in a map. `fail_writes` makes every mutation fail.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, String>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, display_name: &str, file_name: &str) -> Self {
        self.records
            .insert(display_name.to_string(), file_name.to_string());
        self
    }

    pub fn get(&self, display_name: &str) -> Option<&str> {
        self.records.get(display_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RegistrationStore for MemoryStore {
    fn set_record(&mut self, display_name: &str, file_name: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("store is read-only"));
        }
        self.records
            .insert(display_name.to_string(), file_name.to_string());
        Ok(())
    }

    fn records(&self) -> Result<Vec<InstalledFontRecord>> {
        Ok(self
            .records
            .iter()
            .map(|(k, v)| InstalledFontRecord::new(k.clone(), v.clone()))
            .collect())
    }

    fn delete_record(&mut self, display_name: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("store is read-only"));
        }
        self.records.remove(display_name);
        Ok(())
    }
}

/// Remembers which font resources were loaded, in call order.
#[derive(Debug, Default, Clone)]
pub struct MemoryResources {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub fail: bool,
}

impl FontResources for MemoryResources {
    fn add_font(&mut self, path: &Path) -> Result<()> {
        if self.fail {
            return Err(anyhow!("font table refused {}", path.display()));
        }
        self.added.push(path.to_path_buf());
        Ok(())
    }

    fn remove_font(&mut self, path: &Path) -> Result<()> {
        if self.fail {
            return Err(anyhow!("font table refused {}", path.display()));
        }
        self.removed.push(path.to_path_buf());
        Ok(())
    }
}

/// Counts broadcasts.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingNotifier {
    pub broadcasts: usize,
}

impl ChangeNotifier for CountingNotifier {
    fn broadcast_font_change(&mut self) {
        self.broadcasts += 1;
    }
}

/// Keeps a rendered line per reported outcome.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    pub lines: Vec<String>,
}

impl Reporter for CollectingReporter {
    fn report(&mut self, operation: Operation, target: &str, outcome: &Outcome) {
        self.lines.push(format!("{operation} {target}: {outcome}"));
    }
}
