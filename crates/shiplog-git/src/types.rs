//! Git record types

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

/// Information about a git commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Commit hash (full)
    pub hash: String,
    /// Short hash (first 7 characters)
    pub short_hash: String,
    /// Commit message summary (first line)
    pub summary: String,
    /// Remaining commit message body
    pub body: Option<String>,
    /// Commit timestamp
    pub timestamp: DateTime<Utc>,
}

impl CommitInfo {
    /// Create a new CommitInfo
    pub fn new(
        hash: impl Into<String>,
        summary: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(7).collect();

        Self {
            hash,
            short_hash,
            summary: summary.into(),
            body: None,
            timestamp,
        }
    }

    /// Set the commit body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        if !body.is_empty() {
            self.body = Some(body);
        }
        self
    }
}

/// Information about a git tag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagInfo {
    /// Tag name as written in the repository (e.g. "v1.2.3")
    pub name: String,
    /// Semantic version parsed from the name; `None` when the tag does
    /// not follow a `major.minor.patch` scheme
    pub version: Option<Version>,
    /// Commit hash the tag points to
    pub commit_hash: String,
    /// Tag timestamp (tagger time for annotated tags, otherwise the
    /// target commit time)
    pub timestamp: DateTime<Utc>,
}

impl TagInfo {
    /// Create a new TagInfo, parsing the version from the name
    pub fn new(
        name: impl Into<String>,
        commit_hash: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        let version = parse_version(&name);

        Self {
            name,
            version,
            commit_hash: commit_hash.into(),
            timestamp,
        }
    }
}

/// Parse a semantic version from a tag name, tolerating a leading `v`.
pub fn parse_version(tag: &str) -> Option<Version> {
    let tag = tag.trim();
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    Version::parse(tag).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("v1.0.0"), Some(Version::new(1, 0, 0)));
        assert_eq!(parse_version("1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(parse_version("v1.10.0"), Some(Version::new(1, 10, 0)));
        assert_eq!(parse_version("release-candidate"), None);
        assert_eq!(parse_version("v1.2"), None);
    }

    #[test]
    fn test_commit_info_short_hash() {
        let commit = CommitInfo::new("abc1234567890", "Add feature", Utc::now());
        assert_eq!(commit.short_hash, "abc1234");
        assert!(commit.body.is_none());
    }

    #[test]
    fn test_tag_info_parses_version() {
        let tag = TagInfo::new("v2.1.0", "abc123", Utc::now());
        assert_eq!(tag.version, Some(Version::new(2, 1, 0)));
        assert_eq!(tag.name, "v2.1.0");
    }
}
