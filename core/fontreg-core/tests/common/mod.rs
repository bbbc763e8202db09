//! Shared fixtures: tiny sfnt binaries and a manager over a scratch directory.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use fontreg_core::directory::FontDirectory;
use fontreg_core::manager::FontManager;
use fontreg_core::memory::{CountingNotifier, MemoryResources, MemoryStore};
use tempfile::TempDir;

pub type TestManager = FontManager<MemoryStore, MemoryResources, CountingNotifier>;

/// Smallest sfnt the parser accepts: one `name` table holding a Windows
/// Unicode family-name record.
pub fn font_with_family(family: &str) -> Vec<u8> {
    font_with_family_records(&[windows_family(0x0409, family)])
}

/// A name record as `(platform, encoding, language, encoded text)`.
pub type NameEntry = (u16, u16, u16, Vec<u8>);

/// Windows Unicode BMP family record in `language`.
pub fn windows_family(language: u16, family: &str) -> NameEntry {
    let text = family
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect();
    (3, 1, language, text)
}

/// Macintosh Roman family record (English).
pub fn mac_roman_family(family: &str) -> NameEntry {
    (1, 0, 0, family.as_bytes().to_vec())
}

/// An sfnt whose `name` table holds the given family-name records, in order.
pub fn font_with_family_records(records: &[NameEntry]) -> Vec<u8> {
    let header_len = 6 + 12 * records.len();
    let mut name = Vec::new();
    push16(&mut name, 0); // format
    push16(&mut name, records.len() as u16);
    push16(&mut name, header_len as u16);

    let mut storage = Vec::new();
    for (platform, encoding, language, text) in records {
        push16(&mut name, *platform);
        push16(&mut name, *encoding);
        push16(&mut name, *language);
        push16(&mut name, 1); // name id: family
        push16(&mut name, text.len() as u16);
        push16(&mut name, storage.len() as u16);
        storage.extend_from_slice(text);
    }
    name.extend_from_slice(&storage);

    sfnt(&[(*b"name", name)])
}

/// A well-formed sfnt with no tables at all, so no family name.
pub fn font_without_names() -> Vec<u8> {
    sfnt(&[])
}

fn sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    let mut font = Vec::new();
    let num_tables = tables.len() as u16;
    push32(&mut font, 0x0001_0000);
    push16(&mut font, num_tables);
    push16(&mut font, if num_tables == 0 { 0 } else { 16 });
    push16(&mut font, 0);
    push16(&mut font, (num_tables * 16).saturating_sub(16));

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in tables {
        font.extend_from_slice(tag);
        push32(&mut font, checksum(data));
        push32(&mut font, offset as u32);
        push32(&mut font, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }

    font.extend_from_slice(&body);
    font
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

fn push16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Write `bytes` to `dir/file_name`, creating `dir`.
pub fn write_font(dir: &Path, file_name: &str, bytes: &[u8]) -> PathBuf {
    fs::create_dir_all(dir).expect("mkdir source dir");
    let path = dir.join(file_name);
    fs::write(&path, bytes).expect("write font");
    path
}

/// A manager whose fonts directory is `<tmp>/fonts`, with in-memory collaborators.
pub fn scratch_manager(tmp: &TempDir) -> TestManager {
    let fonts = tmp.path().join("fonts");
    fs::create_dir_all(&fonts).expect("mkdir fonts");
    FontManager::new(
        FontDirectory::new(fonts),
        MemoryStore::new(),
        MemoryResources::default(),
        CountingNotifier::default(),
    )
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().expect("utf8 path")
}
