//! Windows registry, GDI and broadcast bindings (made by FontLab https://www.fontlab.com/)

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use ::windows::core::{PCWSTR, PWSTR};
use ::windows::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, LPARAM, WIN32_ERROR, WPARAM,
};
use ::windows::Win32::Graphics::Gdi::{AddFontResourceW, RemoveFontResourceW};
use ::windows::Win32::System::Registry::{
    RegCloseKey, RegDeleteValueW, RegEnumValueW, RegOpenKeyExW, RegSetValueExW, HKEY,
    HKEY_LOCAL_MACHINE, KEY_QUERY_VALUE, KEY_SET_VALUE, REG_SAM_FLAGS, REG_SZ,
};
use ::windows::Win32::UI::WindowsAndMessaging::{
    SendMessageTimeoutW, HWND_BROADCAST, SMTO_ABORTIFHUNG, WM_FONTCHANGE,
};

use crate::notify::ChangeNotifier;
use crate::resources::FontResources;
use crate::store::{InstalledFontRecord, RegistrationStore};

/// Where Windows lists machine-wide fonts.
pub const FONTS_SUBKEY: &str = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion\Fonts";

const MAX_VALUE_NAME: usize = 16_384;
const INITIAL_VALUE_DATA: usize = 4 * 1024;

fn wide(s: &OsStr) -> Vec<u16> {
    s.encode_wide().chain(std::iter::once(0)).collect()
}

fn check(status: WIN32_ERROR) -> Result<()> {
    status.ok().map_err(|e| anyhow!(e))
}

/// REG_SZ values under a registry key.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    root: HKEY,
    subkey: String,
}

struct OpenKey(HKEY);

impl Drop for OpenKey {
    fn drop(&mut self) {
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

impl RegistryStore {
    pub fn system() -> Self {
        Self::new(HKEY_LOCAL_MACHINE, FONTS_SUBKEY)
    }

    /// Store over an existing key other than the system fonts key.
    pub fn new(root: HKEY, subkey: impl Into<String>) -> Self {
        Self {
            root,
            subkey: subkey.into(),
        }
    }

    fn open(&self, access: REG_SAM_FLAGS) -> Result<OpenKey> {
        let subkey = wide(OsStr::new(&self.subkey));
        let mut key = HKEY::default();
        let status = unsafe { RegOpenKeyExW(self.root, PCWSTR(subkey.as_ptr()), 0, access, &mut key) };
        check(status).with_context(|| format!("opening registry key {}", self.subkey))?;
        Ok(OpenKey(key))
    }
}

impl RegistrationStore for RegistryStore {
    fn set_record(&mut self, display_name: &str, file_name: &str) -> Result<()> {
        let key = self.open(KEY_SET_VALUE)?;
        let name = wide(OsStr::new(display_name));
        let value = wide(OsStr::new(file_name));
        let bytes: Vec<u8> = value.iter().flat_map(|unit| unit.to_le_bytes()).collect();

        let status =
            unsafe { RegSetValueExW(key.0, PCWSTR(name.as_ptr()), 0, REG_SZ, Some(bytes.as_slice())) };
        check(status).with_context(|| format!("writing registry value '{display_name}'"))
    }

    fn records(&self) -> Result<Vec<InstalledFontRecord>> {
        let key = self.open(KEY_QUERY_VALUE)?;
        let mut name = vec![0u16; MAX_VALUE_NAME];
        let mut data = vec![0u8; INITIAL_VALUE_DATA];
        let mut records = Vec::new();

        let mut index = 0u32;
        loop {
            let mut name_len = name.len() as u32;
            let mut data_len = data.len() as u32;
            let mut kind = 0u32;

            let status = unsafe {
                RegEnumValueW(
                    key.0,
                    index,
                    PWSTR(name.as_mut_ptr()),
                    &mut name_len,
                    None,
                    Some(&mut kind as *mut u32),
                    Some(data.as_mut_ptr()),
                    Some(&mut data_len as *mut u32),
                )
            };

            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            if status == ERROR_MORE_DATA {
                // data_len now holds the required size; retry the same value.
                let wanted = (data_len as usize).max(data.len() * 2);
                data.resize(wanted, 0);
                continue;
            }
            check(status).context("enumerating font registry values")?;
            index += 1;
            if kind != REG_SZ.0 {
                continue;
            }

            let units: Vec<u16> = data[..data_len as usize]
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                .take_while(|unit| *unit != 0)
                .collect();

            records.push(InstalledFontRecord::new(
                String::from_utf16_lossy(&name[..name_len as usize]),
                String::from_utf16_lossy(&units),
            ));
        }

        Ok(records)
    }

    fn delete_record(&mut self, display_name: &str) -> Result<()> {
        let key = self.open(KEY_SET_VALUE)?;
        let name = wide(OsStr::new(display_name));
        let status = unsafe { RegDeleteValueW(key.0, PCWSTR(name.as_ptr())) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(());
        }
        check(status).with_context(|| format!("deleting registry value '{display_name}'"))
    }
}

/// Loads and unloads fonts in the session font table through GDI.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdiResources;

impl FontResources for GdiResources {
    fn add_font(&mut self, path: &Path) -> Result<()> {
        let raw = wide(path.as_os_str());
        let added = unsafe { AddFontResourceW(PCWSTR(raw.as_ptr())) };
        if added == 0 {
            return Err(anyhow!("AddFontResourceW loaded no fonts from {}", path.display()));
        }
        Ok(())
    }

    fn remove_font(&mut self, path: &Path) -> Result<()> {
        let raw = wide(path.as_os_str());
        let removed = unsafe { RemoveFontResourceW(PCWSTR(raw.as_ptr())) };
        if !removed.as_bool() {
            return Err(anyhow!("RemoveFontResourceW failed for {}", path.display()));
        }
        Ok(())
    }
}

/// Sends `WM_FONTCHANGE` to every top-level window, skipping hung ones.
#[derive(Debug, Clone, Copy)]
pub struct BroadcastNotifier {
    pub timeout_ms: u32,
}

impl Default for BroadcastNotifier {
    fn default() -> Self {
        Self { timeout_ms: 1_000 }
    }
}

impl ChangeNotifier for BroadcastNotifier {
    fn broadcast_font_change(&mut self) {
        unsafe {
            SendMessageTimeoutW(
                HWND_BROADCAST,
                WM_FONTCHANGE,
                WPARAM(0),
                LPARAM(0),
                SMTO_ABORTIFHUNG,
                self.timeout_ms,
                None,
            );
        }
        debug!("broadcast WM_FONTCHANGE");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::windows::Win32::System::Registry::{RegCreateKeyW, RegDeleteTreeW, HKEY_CURRENT_USER};

    struct ScratchKey(String);

    impl ScratchKey {
        fn create(label: &str) -> Self {
            let subkey = format!(r"Software\fontreg-tests\{label}-{}", std::process::id());
            let raw = wide(OsStr::new(&subkey));
            let mut key = HKEY::default();
            let status = unsafe { RegCreateKeyW(HKEY_CURRENT_USER, PCWSTR(raw.as_ptr()), &mut key) };
            check(status).expect("create scratch key");
            drop(OpenKey(key));
            Self(subkey)
        }

        fn store(&self) -> RegistryStore {
            RegistryStore::new(HKEY_CURRENT_USER, self.0.clone())
        }
    }

    impl Drop for ScratchKey {
        fn drop(&mut self) {
            let raw = wide(OsStr::new(&self.0));
            unsafe {
                let _ = RegDeleteTreeW(HKEY_CURRENT_USER, PCWSTR(raw.as_ptr()));
            }
        }
    }

    #[test]
    fn records_round_trip_through_the_registry() {
        let scratch = ScratchKey::create("round-trip");
        let mut store = scratch.store();

        store.set_record("Sample (TrueType)", "Sample.ttf").expect("set");
        store.set_record("Alt", "Alt.otf").expect("set");
        store.delete_record("Alt").expect("delete");
        store.delete_record("Never There").expect("delete absent");

        let records = store.records().expect("records");
        assert_eq!(records, vec![InstalledFontRecord::new("Sample (TrueType)", "Sample.ttf")]);
    }

    #[test]
    fn oversized_values_are_still_enumerated() {
        let scratch = ScratchKey::create("oversized");
        let mut store = scratch.store();
        let long_name = format!("{}.ttf", "x".repeat(40_000));

        store.set_record("Short", "Short.otf").expect("set");
        store.set_record("Long", &long_name).expect("set");

        let mut records = store.records().expect("records");
        records.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name, "Long");
        assert_eq!(records[0].file_name, long_name);
        assert_eq!(records[1].file_name, "Short.otf");
    }
}
