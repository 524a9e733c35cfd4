//! Property-based tests for upload directories and keys.

use proptest::prelude::*;

use super::service::{DEFAULT_UPLOAD_DIR, StorageService, sanitize_segment};

proptest! {
    #[test]
    fn prop_sanitized_segment_has_no_separators(segment in ".*") {
        let sanitized = sanitize_segment(&segment);

        prop_assert!(!sanitized.contains('/'));
        prop_assert!(!sanitized.contains('\\'));
        prop_assert_eq!(sanitized.chars().count(), segment.chars().count());
    }

    /// An entry directory is the id itself or nothing; it never aliases the shared area.
    #[test]
    fn prop_entry_dir_is_verbatim(uid in ".*") {
        if let Some(dir) = StorageService::entry_dir(&uid) {
            prop_assert_eq!(dir, uid.as_str());
            prop_assert_ne!(dir, DEFAULT_UPLOAD_DIR);
            prop_assert!(!dir.contains('/'));
            prop_assert!(!dir.chars().all(|c| c == '.'));
        }
    }

    #[test]
    fn prop_upload_dir_never_escapes_root(uid in proptest::option::of(".*")) {
        if let Ok(dir) = StorageService::upload_dir(uid.as_deref()) {
            prop_assert!(!dir.is_empty());
            prop_assert!(!dir.chars().all(|c| c == '.'));
            prop_assert!(!dir.contains('/'));
        }
    }

    #[test]
    fn prop_upload_key_is_one_level_deep(
        uid in "[A-Za-z0-9_-]{1,12}",
        filename in ".*",
        millis in 0i64..=4_102_444_800_000,
    ) {
        let dir = StorageService::upload_dir(Some(&uid)).unwrap();
        let key = StorageService::upload_key(dir, &filename, millis);

        prop_assert_eq!(key.matches('/').count(), 1);
        let (_, name) = key.split_once('/').unwrap();
        prop_assert!(name.starts_with(&millis.to_string()));
    }
}
