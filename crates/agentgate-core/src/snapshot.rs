//! Visual-regression baselines and their canonical test-case identifiers.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MalformedInput;

/// Variant tokens stripped from baseline stems, in removal order.
///
/// Removal is substring-based: a case whose own name contains a token
/// (e.g. `Toggle_DarkMode`) loses that part too.
pub const VARIANT_TOKENS: [&str; 8] = [
    "_iPhone_15_Pro",
    "_iPad",
    "_Dark",
    "_Light",
    "_phone",
    "_tablet",
    "_dark",
    "_light",
];

const SEPARATOR: char = '_';

/// Platform a baseline was recorded on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Ios => "iOS",
            Platform::Android => "Android",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One discovered baseline file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SnapshotEntry {
    pub raw_path: PathBuf,
    pub platform: Platform,
}

impl SnapshotEntry {
    pub fn new(raw_path: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            raw_path: raw_path.into(),
            platform,
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> Option<&str> {
        self.raw_path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
    }
}

/// Platform-agnostic test-case identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for CanonicalId {
    fn from(s: &str) -> Self {
        CanonicalId(s.to_string())
    }
}

impl From<String> for CanonicalId {
    fn from(s: String) -> Self {
        CanonicalId(s)
    }
}

impl std::fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip variant tokens from a baseline stem.
///
/// Each token in [`VARIANT_TOKENS`] order has its first occurrence removed,
/// then leading/trailing underscores are trimmed. Pure; no I/O.
///
/// Only the first occurrence is removed, so a stem that repeats a token is
/// not a fixed point after one pass: `Card_dark_dark` gives `Card_dark`,
/// which normalizes again to `Card`. Idempotence holds for stems with at
/// most one occurrence of each token.
pub fn normalize(filename_stem: &str) -> CanonicalId {
    let mut name = filename_stem.to_string();
    for token in VARIANT_TOKENS {
        if let Some(pos) = name.find(token) {
            name.replace_range(pos..pos + token.len(), "");
        }
    }
    CanonicalId(name.trim_matches(SEPARATOR).to_string())
}

/// Baselines grouped by canonical identifier, in identifier order.
pub type SnapshotIndex = BTreeMap<CanonicalId, Vec<SnapshotEntry>>;

/// Canonical identifier of one entry.
pub fn canonical_id(entry: &SnapshotEntry) -> Result<CanonicalId, MalformedInput> {
    let path = entry.raw_path.display().to_string();
    if entry.raw_path.to_str().is_none() {
        return Err(MalformedInput::NonUtf8Path { path });
    }
    let stem = entry
        .stem()
        .ok_or_else(|| MalformedInput::MissingStem { path: path.clone() })?;
    let id = normalize(stem);
    if id.is_empty() {
        return Err(MalformedInput::EmptyCanonicalId { path });
    }
    Ok(id)
}

/// Index entries by canonical identifier.
///
/// Entries without a usable identifier are skipped with a diagnostic and
/// returned separately. Within one identifier, entries keep input order.
pub fn build_index(
    entries: impl IntoIterator<Item = SnapshotEntry>,
) -> (SnapshotIndex, Vec<MalformedInput>) {
    let mut index = SnapshotIndex::new();
    let mut skipped = Vec::new();

    for entry in entries {
        match canonical_id(&entry) {
            Ok(id) => index.entry(id).or_default().push(entry),
            Err(e) => {
                warn!(event = "discovery.skipped", error = %e);
                skipped.push(e);
            }
        }
    }

    (index, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_suffix_stripped() {
        assert_eq!(normalize("Card_iPhone_15_Pro").as_str(), "Card");
    }

    #[test]
    fn test_dark_suffix_stripped() {
        assert_eq!(normalize("Card_dark").as_str(), "Card");
    }

    #[test]
    fn test_combined_tokens() {
        assert_eq!(normalize("TextBlock_phone_light").as_str(), "TextBlock");
        assert_eq!(normalize("TextBlock_iPad_Dark").as_str(), "TextBlock");
        assert_eq!(normalize("FactSet_tablet").as_str(), "FactSet");
    }

    #[test]
    fn test_token_removed_mid_string() {
        assert_eq!(normalize("Card_phone_header").as_str(), "Card_header");
    }

    #[test]
    fn test_only_first_occurrence_per_token() {
        assert_eq!(normalize("Card_dark_dark").as_str(), "Card_dark");
        // a repeated token needs a second pass
        assert_eq!(normalize("Card_dark").as_str(), "Card");
    }

    #[test]
    fn test_substring_limitation_is_preserved() {
        assert_eq!(normalize("Toggle_DarkMode").as_str(), "ToggleMode");
    }

    #[test]
    fn test_separators_trimmed() {
        assert_eq!(normalize("__Image__").as_str(), "Image");
        assert_eq!(normalize("_phone").as_str(), "");
    }

    #[test]
    fn test_idempotent_on_samples() {
        for stem in [
            "Card_iPhone_15_Pro",
            "Card_dark",
            "TextBlock_phone_light",
            "Image",
            "ColumnSet_iPad_Light",
            "Toggle_DarkMode",
        ] {
            let once = normalize(stem);
            assert_eq!(normalize(once.as_str()), once, "stem {stem}");
        }
    }

    #[test]
    fn test_build_index_groups_variants() {
        let entries = vec![
            SnapshotEntry::new("/b/Card_light.png", Platform::Android),
            SnapshotEntry::new("/b/Card_dark.png", Platform::Android),
            SnapshotEntry::new("/b/Image.png", Platform::Android),
        ];
        let (index, skipped) = build_index(entries);
        assert!(skipped.is_empty());
        assert_eq!(index.len(), 2);
        assert_eq!(index[&CanonicalId::from("Card")].len(), 2);
        assert_eq!(
            index[&CanonicalId::from("Card")][0].raw_path,
            PathBuf::from("/b/Card_light.png")
        );
    }

    #[test]
    fn test_build_index_skips_empty_ids() {
        let entries = vec![
            SnapshotEntry::new("/b/_dark.png", Platform::Ios),
            SnapshotEntry::new("/b/Card.png", Platform::Ios),
        ];
        let (index, skipped) = build_index(entries);
        assert_eq!(index.len(), 1);
        assert_eq!(skipped.len(), 1);
        assert!(matches!(
            skipped[0],
            MalformedInput::EmptyCanonicalId { .. }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_build_index_skips_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = PathBuf::from("/b").join(OsStr::from_bytes(b"bad\xff"));
        let entries = vec![
            SnapshotEntry::new(dir.join("Image.png"), Platform::Ios),
            SnapshotEntry::new("/b/Card.png", Platform::Ios),
        ];
        let (index, skipped) = build_index(entries);
        assert_eq!(index.len(), 1);
        assert!(index.contains_key(&CanonicalId::from("Card")));
        assert!(matches!(skipped[0], MalformedInput::NonUtf8Path { .. }));
    }
}
