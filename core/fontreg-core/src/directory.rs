//! System fonts directory access (made by FontLab https://www.fontlab.com/)

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use walkdir::WalkDir;

use crate::font::is_font_file_name;
use crate::outcome::FontError;

/// The directory holding installed font payloads. Payloads are addressed by
/// file name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDirectory {
    root: PathBuf,
}

impl FontDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    pub fn exists(&self, file_name: &str) -> bool {
        self.path_of(file_name).exists()
    }

    /// Copy `src` in under `file_name`. Fails if the destination already exists;
    /// callers check first.
    pub fn copy_in(&self, src: &Path, file_name: &str) -> Result<PathBuf, FontError> {
        let dest = self.path_of(file_name);
        let copy_err = |source| FontError::Copy {
            file: file_name.to_string(),
            source,
        };

        let mut reader = File::open(src).map_err(copy_err)?;
        let mut writer = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&dest)
            .map_err(copy_err)?;

        if let Err(source) = io::copy(&mut reader, &mut writer) {
            drop(writer);
            let _ = fs::remove_file(&dest);
            return Err(copy_err(source));
        }

        Ok(dest)
    }

    /// Delete the payload named `file_name`.
    pub fn remove(&self, file_name: &str) -> Result<(), FontError> {
        fs::remove_file(self.path_of(file_name)).map_err(|e| FontError::from_delete(file_name, e))
    }

    /// File names of the font payloads directly inside the directory, sorted.
    pub fn font_files(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Err(anyhow!(
                "fonts directory does not exist: {}",
                self.root.display()
            ));
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_font_file_name(name) {
                    found.push(name.to_string());
                }
            }
        }

        found.sort();
        Ok(found)
    }
}
