//! Concrete OS collaborators (made by FontLab https://www.fontlab.com/)
//!
//! Windows keeps records in the registry, loads fonts through GDI and
//! broadcasts `WM_FONTCHANGE`. Other systems keep records in a JSON file and
//! let fontconfig (or CoreText on macOS) discover the payloads.

use std::fs;

use anyhow::{Context, Result};

use crate::directory::FontDirectory;
use crate::manager::FontManager;
use crate::settings::Settings;

#[cfg(windows)]
pub mod win32;

#[cfg(windows)]
pub type SystemStore = self::win32::RegistryStore;
#[cfg(windows)]
pub type SystemResources = self::win32::GdiResources;
#[cfg(windows)]
pub type SystemNotifier = self::win32::BroadcastNotifier;

#[cfg(not(windows))]
pub type SystemStore = crate::store::JsonRecordStore;
#[cfg(not(windows))]
pub type SystemResources = crate::resources::DirectoryScannedResources;
#[cfg(target_os = "macos")]
pub type SystemNotifier = crate::notify::SilentNotifier;
#[cfg(all(not(windows), not(target_os = "macos")))]
pub type SystemNotifier = crate::notify::FontCacheNotifier;

pub type SystemFontManager = FontManager<SystemStore, SystemResources, SystemNotifier>;

/// Build a manager wired to this machine's fonts directory and font registry.
pub fn system_manager(settings: &Settings) -> Result<SystemFontManager> {
    let fonts_dir = settings.resolve_fonts_dir()?;
    fs::create_dir_all(&fonts_dir)
        .with_context(|| format!("creating fonts directory {}", fonts_dir.display()))?;

    let directory = FontDirectory::new(fonts_dir);
    let (store, resources, notifier) = system_collaborators(settings, &directory)?;

    Ok(FontManager::new(directory, store, resources, notifier))
}

#[cfg(windows)]
fn system_collaborators(
    _settings: &Settings,
    _directory: &FontDirectory,
) -> Result<(SystemStore, SystemResources, SystemNotifier)> {
    Ok((
        self::win32::RegistryStore::system(),
        self::win32::GdiResources,
        self::win32::BroadcastNotifier::default(),
    ))
}

#[cfg(not(windows))]
fn system_collaborators(
    settings: &Settings,
    directory: &FontDirectory,
) -> Result<(SystemStore, SystemResources, SystemNotifier)> {
    let store = crate::store::JsonRecordStore::new(settings.resolve_registry_file()?);
    Ok((store, crate::resources::DirectoryScannedResources, notifier_for(directory)))
}

#[cfg(target_os = "macos")]
fn notifier_for(_directory: &FontDirectory) -> SystemNotifier {
    crate::notify::SilentNotifier
}

#[cfg(all(not(windows), not(target_os = "macos")))]
fn notifier_for(directory: &FontDirectory) -> SystemNotifier {
    crate::notify::FontCacheNotifier::new(directory.root())
}
