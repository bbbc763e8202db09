//! Display-name extraction from font binaries (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use read_fonts::tables::name::{NameId, NameRecord};
use read_fonts::{FontRef, TableProvider};
use tracing::debug;

use crate::font::{extension_of, is_truetype_extension};

/// Suffix the OS installer appends to TrueType registrations.
pub const TRUETYPE_SUFFIX: &str = " (TrueType)";

const MACINTOSH_PLATFORM: u16 = 1;
const MAC_ROMAN_ENCODING: u16 = 0;

/// What we learn about a font payload before registering it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMetadata {
    pub family: Option<String>,
    pub is_truetype: bool,
}

impl FontMetadata {
    /// Parse the first face of `path` privately, without touching the OS font table.
    pub fn read(path: &Path) -> Result<Self> {
        Ok(Self {
            family: read_family(path)?,
            is_truetype: is_truetype_extension(&extension_of(&file_name_of(path))),
        })
    }

    /// Registration name: the family plus the TrueType suffix where it applies.
    pub fn display_name(&self) -> Option<String> {
        self.family.as_ref().map(|family| {
            if self.is_truetype {
                format!("{family}{TRUETYPE_SUFFIX}")
            } else {
                family.clone()
            }
        })
    }
}

/// Display name for an installed payload, with the TrueType rule taken from
/// the payload's own extension. Never fails.
pub fn display_name(path: &Path) -> String {
    let is_truetype = is_truetype_extension(&extension_of(&file_name_of(path)));
    payload_display_name(path, is_truetype)
}

/// Display name for the payload at `path`. Falls back to the file name when
/// the font cannot be read or carries no family name; never fails.
pub fn payload_display_name(path: &Path, is_truetype: bool) -> String {
    match read_family(path) {
        Ok(Some(family)) => FontMetadata {
            family: Some(family),
            is_truetype,
        }
        .display_name()
        .unwrap_or_default(),
        Ok(None) => {
            debug!(path = %path.display(), "font has no family name, using file name");
            fallback_name(path)
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "unreadable font, using file name");
            fallback_name(path)
        }
    }
}

fn read_family(path: &Path) -> Result<Option<String>> {
    let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    let font = FontRef::fonts(&data)
        .next()
        .ok_or_else(|| anyhow!("no font faces in {}", path.display()))??;

    Ok(first_family(&font, NameId::FAMILY_NAME)
        .or_else(|| first_family(&font, NameId::TYPOGRAPHIC_FAMILY_NAME)))
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn fallback_name(path: &Path) -> String {
    match file_name_of(path) {
        name if name.is_empty() => path.display().to_string(),
        name => name,
    }
}

fn first_family(font: &FontRef, wanted: NameId) -> Option<String> {
    let name_table = font.name().ok()?;
    let data = name_table.string_data();

    name_table
        .name_record()
        .iter()
        .filter(|record| record.name_id() == wanted && is_decodable(record))
        .filter_map(|record| record.string(data).ok())
        .map(|entry| entry.to_string().trim().to_string())
        .find(|rendered| !rendered.is_empty())
}

fn is_decodable(record: &NameRecord) -> bool {
    record.is_unicode()
        || (record.platform_id() == MACINTOSH_PLATFORM && record.encoding_id() == MAC_ROMAN_ENCODING)
}
