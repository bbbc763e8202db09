//! Font file model and path resolution (made by FontLab https://www.fontlab.com/)

use std::path::{Path, PathBuf};

/// Characters that can never appear in a font path we hand to the OS.
const ILLEGAL_PATH_CHARS: [char; 6] = ['<', '>', '"', '|', '?', '*'];

/// Extensions treated as font payloads when listing the fonts directory.
pub const FONT_EXTENSIONS: [&str; 6] = [".ttf", ".ttc", ".otf", ".otc", ".fon", ".fnt"];

/// Extensions whose display names carry the " (TrueType)" suffix.
pub const TRUETYPE_EXTENSIONS: [&str; 2] = [".ttf", ".ttc"];

/// A font on disk, as named by the caller of an install or uninstall request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFile {
    /// The string exactly as supplied.
    pub source: String,
    /// Absolute form of `source`.
    pub path: PathBuf,
    /// Base file name; the key under which the payload lives in the fonts directory.
    pub file_name: String,
    /// Lowercased extension with its leading dot, or empty.
    pub extension: String,
}

impl FontFile {
    /// Resolve a caller-supplied path. Returns `None` when the string is not a
    /// usable path: empty, containing control or reserved characters, naming no
    /// file, or rejected by the OS when made absolute.
    pub fn resolve(source: &str) -> Option<Self> {
        if !is_well_formed(source) {
            return None;
        }

        let path = std::path::absolute(Path::new(source)).ok()?;
        let file_name = path.file_name()?.to_str()?.to_string();
        let extension = extension_of(&file_name);

        Some(Self {
            source: source.to_string(),
            path,
            file_name,
            extension,
        })
    }

    /// Whether the registration name gets the " (TrueType)" suffix.
    pub fn is_truetype(&self) -> bool {
        is_truetype_extension(&self.extension)
    }
}

/// Base file name of a bare name or a full path.
pub fn base_file_name(raw: &str) -> Option<String> {
    if !is_well_formed(raw) {
        return None;
    }

    let name = Path::new(raw.trim_end_matches(['/', '\\']))
        .file_name()?
        .to_str()?;
    // `Path` only splits on `\` on Windows; registry callers pass either form.
    let name = name.rsplit('\\').next().unwrap_or(name);

    match name {
        "" | "." | ".." => None,
        other => Some(other.to_string()),
    }
}

/// Lowercased extension with a leading dot, e.g. `".ttf"`.
pub fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default()
}

pub fn is_truetype_extension(extension: &str) -> bool {
    TRUETYPE_EXTENSIONS.contains(&extension)
}

pub fn is_font_file_name(file_name: &str) -> bool {
    FONT_EXTENSIONS.contains(&extension_of(file_name).as_str())
}

fn is_well_formed(raw: &str) -> bool {
    if raw.trim().is_empty() {
        return false;
    }

    !raw
        .chars()
        .any(|c| c.is_control() || ILLEGAL_PATH_CHARS.contains(&c))
}
