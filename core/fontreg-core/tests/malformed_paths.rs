/// Malformed install targets never touch the disk or the registry
mod common;

use common::scratch_manager;
use fontreg_core::outcome::Outcome;
use proptest::prelude::*;
use tempfile::tempdir;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reserved_characters_are_rejected(
        prefix in "[A-Za-z0-9 _-]{0,12}",
        bad in prop::sample::select(vec!['<', '>', '"', '|', '?', '*', '\0', '\n', '\u{7}']),
        suffix in "[A-Za-z0-9 _-]{0,12}",
    ) {
        let tmp = tempdir().expect("tempdir");
        let mut manager = scratch_manager(&tmp);
        let raw = format!("{prefix}{bad}{suffix}.ttf");

        let outcome = manager.install_font(&raw);

        prop_assert!(matches!(outcome, Outcome::SkippedMalformedPath));
        prop_assert!(manager.store().is_empty());
        prop_assert!(manager.directory().font_files().expect("list").is_empty());
        prop_assert_eq!(manager.notifier().broadcasts, 0);
    }
}

#[test]
fn blank_targets_are_malformed() {
    let tmp = tempdir().expect("tempdir");
    let mut manager = scratch_manager(&tmp);

    assert!(matches!(manager.install_font(""), Outcome::SkippedMalformedPath));
    assert!(matches!(manager.install_font("   "), Outcome::SkippedMalformedPath));
    assert!(matches!(manager.uninstall_font(""), Outcome::SkippedMalformedPath));
    assert!(matches!(manager.uninstall_font("/"), Outcome::SkippedMalformedPath));
}
