//! Install/uninstall orchestration (made by FontLab https://www.fontlab.com/)

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::directory::FontDirectory;
use crate::font::{base_file_name, FontFile};
use crate::metadata::payload_display_name;
use crate::notify::ChangeNotifier;
use crate::outcome::{FontError, Outcome};
use crate::resources::FontResources;
use crate::store::{InstalledFontRecord, RegistrationStore};

/// Which half of a batch an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Uninstall,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Install => f.write_str("install"),
            Operation::Uninstall => f.write_str("uninstall"),
        }
    }
}

/// Sink for per-font outcomes, written to as each font is processed.
pub trait Reporter {
    fn report(&mut self, operation: Operation, target: &str, outcome: &Outcome);
}

/// Fonts to install, then fonts to uninstall, in the order given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub install: Vec<String>,
    pub uninstall: Vec<String>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_install(mut self, targets: Vec<String>) -> Self {
        self.install = targets;
        self
    }

    pub fn with_uninstall(mut self, targets: Vec<String>) -> Self {
        self.uninstall = targets;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.install.is_empty() && self.uninstall.is_empty()
    }
}

/// Disagreements between the fonts directory and the registration store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Payload files with no record pointing at them.
    pub unregistered: Vec<String>,
    /// Records whose payload file is missing.
    pub stale: Vec<InstalledFontRecord>,
}

impl AuditReport {
    pub fn is_consistent(&self) -> bool {
        self.unregistered.is_empty() && self.stale.is_empty()
    }
}

/// Composes the fonts directory, the registration store, the OS font table and
/// the change notifier. Holds no state of its own between calls.
#[derive(Debug)]
pub struct FontManager<S, R, N> {
    directory: FontDirectory,
    store: S,
    resources: R,
    notifier: N,
}

impl<S, R, N> FontManager<S, R, N>
where
    S: RegistrationStore,
    R: FontResources,
    N: ChangeNotifier,
{
    pub fn new(directory: FontDirectory, store: S, resources: R, notifier: N) -> Self {
        Self {
            directory,
            store,
            resources,
            notifier,
        }
    }

    pub fn directory(&self) -> &FontDirectory {
        &self.directory
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Copy `source` into the fonts directory under its base file name and
    /// register it. An existing payload with the same file name wins.
    pub fn install_font(&mut self, source: &str) -> Outcome {
        let Some(font) = FontFile::resolve(source) else {
            return Outcome::SkippedMalformedPath;
        };
        if !font.path.is_file() {
            return Outcome::SkippedNotFound;
        }
        if self.directory.exists(&font.file_name) {
            return Outcome::SkippedAlreadyExists;
        }

        let dest = match self.directory.copy_in(&font.path, &font.file_name) {
            Ok(dest) => dest,
            Err(err) => return Outcome::Failed(err),
        };
        debug!(source = %font.source, dest = %dest.display(), "copied payload");

        let display_name = payload_display_name(&dest, font.is_truetype());
        if let Err(reason) = self.store.set_record(&display_name, &font.file_name) {
            self.discard_payload(&font.file_name);
            return Outcome::Failed(FontError::Register {
                display_name,
                reason,
            });
        }

        if let Err(err) = self.resources.add_font(&dest) {
            warn!(file = %font.file_name, error = %err, "font table did not load the new font");
        }

        self.notifier.broadcast_font_change();
        Outcome::Installed { display_name }
    }

    /// Remove the payload named by `target` (a bare file name or any path
    /// ending in it) and every record pointing at it.
    pub fn uninstall_font(&mut self, target: &str) -> Outcome {
        let Some(file_name) = base_file_name(target) else {
            return Outcome::SkippedMalformedPath;
        };
        let system_path = self.directory.path_of(&file_name);
        if !system_path.exists() {
            return Outcome::SkippedNotFound;
        }

        if let Err(err) = self.resources.remove_font(&system_path) {
            warn!(file = %file_name, error = %err, "font table did not unload the font");
        }

        if let Err(err) = self.directory.remove(&file_name) {
            return Outcome::Failed(err);
        }
        debug!(file = %file_name, "deleted payload");

        let swept = self.sweep_records(&file_name);
        self.notifier.broadcast_font_change();

        match swept {
            Ok(removed_records) => Outcome::Uninstalled { removed_records },
            Err(reason) => Outcome::Failed(FontError::Unregister {
                file: file_name,
                reason,
            }),
        }
    }

    /// Process every install target, then every uninstall target. A failure
    /// never stops the batch.
    pub fn run_batch(
        &mut self,
        batch: &Batch,
        reporter: &mut dyn Reporter,
    ) -> Vec<(String, Outcome)> {
        let mut results = Vec::with_capacity(batch.install.len() + batch.uninstall.len());

        for target in &batch.install {
            let outcome = self.install_font(target);
            reporter.report(Operation::Install, target, &outcome);
            results.push((target.clone(), outcome));
        }

        for target in &batch.uninstall {
            let outcome = self.uninstall_font(target);
            reporter.report(Operation::Uninstall, target, &outcome);
            results.push((target.clone(), outcome));
        }

        results
    }

    /// Every registration record, sorted by display name.
    pub fn records(&self) -> Result<Vec<InstalledFontRecord>> {
        let mut records = self.store.records()?;
        records.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(records)
    }

    /// Compare the fonts directory with the registration store. Read-only.
    pub fn audit(&self) -> Result<AuditReport> {
        let files = self.directory.font_files()?;
        let records = self.records()?;

        let unregistered = files
            .iter()
            .filter(|file| !records.iter().any(|r| points_at(r, file)))
            .cloned()
            .collect();

        let stale = records
            .into_iter()
            .filter(|r| !payload_exists(r, &files))
            .collect();

        Ok(AuditReport {
            unregistered,
            stale,
        })
    }

    /// Linear scan by value: records are keyed by display name, which cannot be
    /// derived from the file name.
    fn sweep_records(&mut self, file_name: &str) -> Result<usize> {
        let doomed: Vec<InstalledFontRecord> = self
            .store
            .records()?
            .into_iter()
            .filter(|r| r.refers_to(file_name))
            .collect();

        for record in &doomed {
            self.store.delete_record(&record.display_name)?;
            debug!(display_name = %record.display_name, "removed registration record");
        }

        Ok(doomed.len())
    }

    fn discard_payload(&self, file_name: &str) {
        if let Err(err) = self.directory.remove(file_name) {
            warn!(file = %file_name, error = %err, "could not roll back copied payload");
        }
    }
}

fn points_at(record: &InstalledFontRecord, file_name: &str) -> bool {
    record.refers_to(file_name)
        || base_file_name(record.file_name.trim())
            .map(|base| InstalledFontRecord::new("", base).refers_to(file_name))
            .unwrap_or(false)
}

fn payload_exists(record: &InstalledFontRecord, files: &[String]) -> bool {
    let value = Path::new(record.file_name.trim());
    if value.is_absolute() {
        return value.exists();
    }
    files.iter().any(|file| points_at(record, file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{CountingNotifier, MemoryResources, MemoryStore};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    type TestManager = FontManager<MemoryStore, MemoryResources, CountingNotifier>;

    fn manager_in(tmp: &TempDir) -> TestManager {
        let fonts = tmp.path().join("fonts");
        fs::create_dir_all(&fonts).expect("mkdir fonts");
        FontManager::new(
            FontDirectory::new(fonts),
            MemoryStore::new(),
            MemoryResources::default(),
            CountingNotifier::default(),
        )
    }

    #[test]
    fn store_failure_rolls_back_the_copy() {
        let tmp = tempdir().expect("tempdir");
        let mut manager = manager_in(&tmp);
        manager.store_mut().fail_writes = true;
        let src = tmp.path().join("Plain.otf");
        fs::write(&src, b"not really a font").expect("write");

        let outcome = manager.install_font(src.to_str().unwrap());

        assert!(matches!(outcome, Outcome::Failed(FontError::Register { .. })));
        assert!(!manager.directory().exists("Plain.otf"));
        assert_eq!(manager.notifier().broadcasts, 0);
        assert!(manager.resources().added.is_empty());
    }

    #[test]
    fn font_table_failure_is_not_fatal() {
        let tmp = tempdir().expect("tempdir");
        let mut manager = FontManager::new(
            FontDirectory::new(tmp.path()),
            MemoryStore::new(),
            MemoryResources {
                fail: true,
                ..MemoryResources::default()
            },
            CountingNotifier::default(),
        );
        let src_dir = tmp.path().join("src");
        fs::create_dir_all(&src_dir).expect("mkdir");
        let src = src_dir.join("Plain.otf");
        fs::write(&src, b"not really a font").expect("write");

        let installed = manager.install_font(src.to_str().unwrap());
        assert!(matches!(installed, Outcome::Installed { .. }));

        let removed = manager.uninstall_font("Plain.otf");
        assert!(matches!(removed, Outcome::Uninstalled { removed_records: 1 }));
        assert_eq!(manager.notifier().broadcasts, 2);
    }

    #[test]
    fn uninstall_sweeps_every_matching_record() {
        let tmp = tempdir().expect("tempdir");
        let fonts = tmp.path().join("fonts");
        fs::create_dir_all(&fonts).expect("mkdir");
        fs::write(fonts.join("Dup.ttf"), b"x").expect("write");
        let store = MemoryStore::new()
            .with_record("Dup (TrueType)", "Dup.ttf")
            .with_record("Dup Legacy", " dup.TTF ")
            .with_record("Other", "Other.ttf");
        let mut manager = FontManager::new(
            FontDirectory::new(&fonts),
            store,
            MemoryResources::default(),
            CountingNotifier::default(),
        );

        let outcome = manager.uninstall_font("Dup.ttf");

        assert!(matches!(outcome, Outcome::Uninstalled { removed_records: 2 }));
        assert_eq!(manager.store().len(), 1);
        assert_eq!(manager.store().get("Other"), Some("Other.ttf"));
    }

    #[test]
    fn store_failure_during_sweep_is_reported_after_delete() {
        let tmp = tempdir().expect("tempdir");
        let mut manager = manager_in(&tmp);
        fs::write(manager.directory().path_of("Gone.otf"), b"x").expect("write");
        *manager.store_mut() = MemoryStore::new().with_record("Gone", "Gone.otf");
        manager.store_mut().fail_writes = true;

        let outcome = manager.uninstall_font("Gone.otf");

        assert!(matches!(outcome, Outcome::Failed(FontError::Unregister { .. })));
        assert!(!manager.directory().exists("Gone.otf"));
        assert_eq!(manager.notifier().broadcasts, 1);
    }

    #[test]
    fn audit_reports_both_directions() {
        let tmp = tempdir().expect("tempdir");
        let mut manager = manager_in(&tmp);
        fs::write(manager.directory().path_of("Loose.ttf"), b"x").expect("write");
        fs::write(manager.directory().path_of("Kept.otf"), b"x").expect("write");
        *manager.store_mut() = MemoryStore::new()
            .with_record("Kept", "kept.otf")
            .with_record("Ghost (TrueType)", "Ghost.ttf");

        let report = manager.audit().expect("audit");

        assert_eq!(report.unregistered, vec!["Loose.ttf".to_string()]);
        assert_eq!(
            report.stale,
            vec![InstalledFontRecord::new("Ghost (TrueType)", "Ghost.ttf")]
        );
        assert!(!report.is_consistent());
    }
}
