//! OS graphics-subsystem font table (made by FontLab https://www.fontlab.com/)

use std::path::Path;

use anyhow::Result;

/// Can add or remove a font resource in the running session's font table.
pub trait FontResources {
    fn add_font(&mut self, path: &Path) -> Result<()>;
    fn remove_font(&mut self, path: &Path) -> Result<()>;
}

/// For systems whose font services discover payloads straight from the fonts
/// directory (fontconfig, CoreText). Nothing to load or unload.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectoryScannedResources;

impl FontResources for DirectoryScannedResources {
    fn add_font(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn remove_font(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
