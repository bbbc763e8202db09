//! Environment-driven settings (made by FontLab https://www.fontlab.com/)

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Overrides the system fonts directory.
pub const FONTS_DIR_ENV: &str = "FONTREG_FONTS_DIR";
/// Overrides the registration store file on platforms without a font registry.
pub const REGISTRY_ENV: &str = "FONTREG_REGISTRY";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub fonts_dir: Option<PathBuf>,
    pub registry_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Self {
        let read = |key: &str| {
            env::var_os(key)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };

        Self {
            fonts_dir: read(FONTS_DIR_ENV),
            registry_file: read(REGISTRY_ENV),
        }
    }

    pub fn with_fonts_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.fonts_dir = dir;
        }
        self
    }

    pub fn with_registry_file(mut self, file: Option<PathBuf>) -> Self {
        if file.is_some() {
            self.registry_file = file;
        }
        self
    }

    pub fn resolve_fonts_dir(&self) -> Result<PathBuf> {
        match &self.fonts_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_fonts_dir(),
        }
    }

    pub fn resolve_registry_file(&self) -> Result<PathBuf> {
        match &self.registry_file {
            Some(file) => Ok(file.clone()),
            None => default_registry_file(),
        }
    }
}

#[cfg(unix)]
fn home_dir() -> Result<PathBuf> {
    env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("HOME is not set; pass --fonts-dir or set {FONTS_DIR_ENV}"))
}

#[cfg(windows)]
fn default_fonts_dir() -> Result<PathBuf> {
    env::var_os("SYSTEMROOT")
        .or_else(|| env::var_os("WINDIR"))
        .map(|root| PathBuf::from(root).join("Fonts"))
        .ok_or_else(|| anyhow!("neither SYSTEMROOT nor WINDIR is set"))
}

#[cfg(target_os = "macos")]
fn default_fonts_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join("Library/Fonts"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn default_fonts_dir() -> Result<PathBuf> {
    Ok(data_home()?.join("fonts"))
}

#[cfg(windows)]
fn default_registry_file() -> Result<PathBuf> {
    Err(anyhow!("the Windows font registry is not file-backed"))
}

#[cfg(target_os = "macos")]
fn default_registry_file() -> Result<PathBuf> {
    Ok(home_dir()?.join("Library/Application Support/fontreg/fonts.json"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn default_registry_file() -> Result<PathBuf> {
    Ok(data_home()?.join("fontreg/fonts.json"))
}

#[cfg(all(unix, not(target_os = "macos")))]
fn data_home() -> Result<PathBuf> {
    match env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(home_dir()?.join(".local/share")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_over_defaults() {
        let settings = Settings::default()
            .with_fonts_dir(Some(PathBuf::from("/tmp/fonts")))
            .with_registry_file(Some(PathBuf::from("/tmp/fonts.json")));

        assert_eq!(settings.resolve_fonts_dir().unwrap(), PathBuf::from("/tmp/fonts"));
        assert_eq!(
            settings.resolve_registry_file().unwrap(),
            PathBuf::from("/tmp/fonts.json")
        );
    }

    #[test]
    fn none_keeps_existing_value() {
        let settings = Settings {
            fonts_dir: Some(PathBuf::from("/from/env")),
            registry_file: None,
        }
        .with_fonts_dir(None);

        assert_eq!(settings.fonts_dir, Some(PathBuf::from("/from/env")));
    }
}
