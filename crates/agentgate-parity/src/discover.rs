//! Baseline discovery on disk.

use std::path::Path;

use agentgate_core::{build_index, MalformedInput, Platform, SnapshotEntry, SnapshotIndex};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Default baseline image extension.
pub const DEFAULT_EXTENSION: &str = "png";

/// Baselines found under one root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Matching files, sorted by path.
    pub entries: Vec<SnapshotEntry>,
    /// Directory entries the walk could not read. Baselines below them are
    /// missing from `entries`.
    pub walk_errors: usize,
}

/// One platform's baselines, indexed.
#[derive(Debug, Default)]
pub struct IndexedDir {
    pub index: SnapshotIndex,
    pub skipped: Vec<MalformedInput>,
    pub walk_errors: usize,
}

/// Walk `root` recursively and collect every file ending in `.{extension}`.
///
/// A missing root is not an error: it yields no entries and a warning.
/// Unreadable entries are logged, counted and skipped.
/// Entries come back sorted by path so repeated runs see the same order.
pub fn discover(root: &Path, platform: Platform, extension: &str) -> Discovery {
    if !root.is_dir() {
        warn!(
            event = "discovery.missing_root",
            platform = %platform,
            root = %root.display(),
        );
        return Discovery::default();
    }

    let extension = extension.trim_start_matches('.');
    let mut walk_errors = 0;
    let mut found: Vec<SnapshotEntry> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|result| match result {
            Ok(entry) => Some(entry),
            Err(e) => {
                walk_errors += 1;
                warn!(event = "discovery.walk_error", platform = %platform, error = %e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .map(|entry| SnapshotEntry::new(entry.into_path(), platform))
        .collect();
    found.sort_by(|a, b| a.raw_path.cmp(&b.raw_path));

    debug!(
        event = "discovery.finished",
        platform = %platform,
        root = %root.display(),
        files = found.len(),
        walk_errors = walk_errors,
    );
    Discovery {
        entries: found,
        walk_errors,
    }
}

/// Discover and index one platform's baselines.
pub fn index_dir(root: &Path, platform: Platform, extension: &str) -> IndexedDir {
    let discovery = discover(root, platform, extension);
    let (index, skipped) = build_index(discovery.entries);
    IndexedDir {
        index,
        skipped,
        walk_errors: discovery.walk_errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"png").unwrap();
    }

    #[test]
    fn test_discover_recurses_and_filters() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Cards/Button_iPhone_15_Pro.png");
        touch(dir.path(), "Cards/nested/Image_Dark.PNG");
        touch(dir.path(), "README.md");
        touch(dir.path(), "Cards/notes.txt");

        let found = discover(dir.path(), Platform::Ios, "png");
        assert_eq!(found.walk_errors, 0);
        let entries = found.entries;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.platform == Platform::Ios));
        assert!(entries[0].raw_path < entries[1].raw_path);
    }

    #[test]
    fn test_discover_accepts_dotted_extension() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.png");
        assert_eq!(
            discover(dir.path(), Platform::Android, ".png").entries.len(),
            1
        );
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let found = discover(&dir.path().join("nope"), Platform::Android, "png");
        assert!(found.entries.is_empty());
        assert_eq!(found.walk_errors, 0);
    }

    #[test]
    fn test_index_dir_groups_variants() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Button_phone_light.png");
        touch(dir.path(), "Button_phone_dark.png");
        touch(dir.path(), "_Dark.png");

        let indexed = index_dir(dir.path(), Platform::Android, "png");
        assert_eq!(indexed.index.len(), 1);
        assert_eq!(indexed.index.values().next().unwrap().len(), 2);
        assert_eq!(indexed.skipped.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subtree_is_counted() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Button.png");
        touch(dir.path(), "locked/Image.png");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through the mode bits; nothing to observe then.
        let readable = fs::read_dir(&locked).is_ok();
        let found = discover(dir.path(), Platform::Ios, "png");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if readable {
            assert_eq!(found.walk_errors, 0);
            assert_eq!(found.entries.len(), 2);
        } else {
            assert_eq!(found.walk_errors, 1);
            assert_eq!(found.entries.len(), 1);
        }
    }
}
