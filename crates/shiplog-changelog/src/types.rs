//! Changelog document model

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Change categories, in their fixed rendering order.
///
/// The derived `Ord` follows declaration order, so a `BTreeMap` keyed by
/// category iterates sections exactly as they must appear in the output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ChangeCategory {
    /// New functionality
    Added,
    /// Removed functionality
    Removed,
    /// Functionality marked for removal
    Deprecated,
    /// Bug fixes
    Fixed,
    /// Behavior changes
    Changed,
}

impl ChangeCategory {
    /// All categories in rendering order
    pub const ALL: [ChangeCategory; 5] = [
        Self::Added,
        Self::Removed,
        Self::Deprecated,
        Self::Fixed,
        Self::Changed,
    ];

    /// Section heading text
    pub fn title(&self) -> &'static str {
        match self {
            Self::Added => "Added",
            Self::Removed => "Removed",
            Self::Deprecated => "Deprecated",
            Self::Fixed => "Fixed",
            Self::Changed => "Changed",
        }
    }

    /// Parse a section heading, case-insensitively
    pub fn from_title(title: &str) -> Option<Self> {
        match title.trim().to_lowercase().as_str() {
            "added" => Some(Self::Added),
            "removed" => Some(Self::Removed),
            "deprecated" => Some(Self::Deprecated),
            "fixed" => Some(Self::Fixed),
            "changed" => Some(Self::Changed),
            _ => None,
        }
    }
}

/// A single changelog bullet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Entry text (the cleaned commit message)
    pub description: String,
    /// Source commit hash, when the entry came from classification
    pub commit_hash: Option<String>,
}

impl ChangelogEntry {
    /// Create an entry without a source commit
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            commit_hash: None,
        }
    }

    /// Set the source commit hash
    pub fn with_commit(mut self, hash: impl Into<String>) -> Self {
        self.commit_hash = Some(hash.into());
        self
    }
}

/// Identifier of a release within the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseId {
    /// The bucket for commits not yet attached to any tag
    Unreleased,
    /// A concrete release, identified by its tag name as written
    Version(String),
}

impl ReleaseId {
    /// The heading text for this identifier
    pub fn label(&self) -> &str {
        match self {
            Self::Unreleased => "Unreleased",
            Self::Version(name) => name,
        }
    }

    /// Whether this identifies the given concrete version
    pub fn is_version(&self, name: &str) -> bool {
        matches!(self, Self::Version(v) if v == name)
    }
}

/// A release section of the changelog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Release {
    /// Release identifier
    pub id: ReleaseId,
    /// Release date; `None` for Unreleased
    pub date: Option<NaiveDate>,
    /// Entries grouped by category, each bucket in insertion order
    pub sections: BTreeMap<ChangeCategory, Vec<ChangelogEntry>>,
    /// Exact source text of a release parsed from an existing document.
    /// When set, the renderer emits it verbatim, which is what keeps
    /// manually curated history byte-for-byte intact.
    pub raw: Option<String>,
}

impl Release {
    /// Create an empty release
    pub fn new(id: ReleaseId) -> Self {
        Self {
            id,
            date: None,
            sections: BTreeMap::new(),
            raw: None,
        }
    }

    /// Set the release date
    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Append an entry to a category bucket.
    ///
    /// A description already present in the bucket is skipped; the first
    /// occurrence wins.
    pub fn push_entry(&mut self, category: ChangeCategory, entry: ChangelogEntry) {
        let bucket = self.sections.entry(category).or_default();
        if bucket.iter().any(|e| e.description == entry.description) {
            return;
        }
        bucket.push(entry);
    }

    /// Entries for one category
    pub fn entries(&self, category: ChangeCategory) -> &[ChangelogEntry] {
        self.sections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether the release has no entries and no preserved body
    pub fn is_empty(&self) -> bool {
        self.raw.is_none() && self.sections.values().all(Vec::is_empty)
    }
}

/// The whole changelog: a title plus an ordered release sequence.
///
/// Invariants: release identifiers are unique; an Unreleased release, if
/// present, comes first; concrete releases follow in descending version
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangelogDocument {
    /// Project title line
    pub title: String,
    /// Verbatim text between the title and the first release heading
    pub preamble: Option<String>,
    /// Releases in document order
    pub releases: Vec<Release>,
}

impl ChangelogDocument {
    /// Create an empty document
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            preamble: None,
            releases: Vec::new(),
        }
    }

    /// Create a document with no title and no releases
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Find a concrete release by version identifier
    pub fn find_version(&self, name: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.id.is_version(name))
    }

    /// Whether the document holds no releases
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        let mut categories = vec![
            ChangeCategory::Changed,
            ChangeCategory::Added,
            ChangeCategory::Fixed,
            ChangeCategory::Removed,
            ChangeCategory::Deprecated,
        ];
        categories.sort();
        assert_eq!(categories, ChangeCategory::ALL.to_vec());
    }

    #[test]
    fn test_category_from_title() {
        assert_eq!(
            ChangeCategory::from_title("added"),
            Some(ChangeCategory::Added)
        );
        assert_eq!(
            ChangeCategory::from_title(" Fixed "),
            Some(ChangeCategory::Fixed)
        );
        assert_eq!(ChangeCategory::from_title("Security"), None);
    }

    #[test]
    fn test_push_entry_deduplicates() {
        let mut release = Release::new(ReleaseId::Unreleased);
        release.push_entry(ChangeCategory::Added, ChangelogEntry::new("Add login page"));
        release.push_entry(ChangeCategory::Added, ChangelogEntry::new("Add login page"));
        assert_eq!(release.entries(ChangeCategory::Added).len(), 1);
    }

    #[test]
    fn test_release_is_empty() {
        let mut release = Release::new(ReleaseId::Unreleased);
        assert!(release.is_empty());

        release.push_entry(ChangeCategory::Fixed, ChangelogEntry::new("Fix crash"));
        assert!(!release.is_empty());
    }

    #[test]
    fn test_find_version() {
        let mut doc = ChangelogDocument::new("demo");
        doc.releases
            .push(Release::new(ReleaseId::Version("v1.0.0".to_string())));

        assert!(doc.find_version("v1.0.0").is_some());
        assert!(doc.find_version("v2.0.0").is_none());
    }
}
