//! Reader ports over version control
//!
//! The merger depends on these traits rather than on git itself, so the
//! classification and merge logic can be exercised with canned records.

use semver::Version;

use crate::repository::{GitRepo, Result};
use crate::types::{CommitInfo, TagInfo};

/// Source of release tags
pub trait TagReader {
    /// Release tags, newest first: descending by semantic version, ties
    /// broken by timestamp descending. Tags whose name does not parse as
    /// a version are excluded from the sequence.
    fn release_tags(&self) -> Result<Vec<TagInfo>>;
}

/// Source of commit history
pub trait CommitReader {
    /// Commits in `(from_exclusive, to_inclusive]`, newest first.
    ///
    /// `from_exclusive` of `None` extends the range to the start of
    /// history; `to_inclusive` of `"HEAD"` means the branch tip.
    fn commits_in_range(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
    ) -> Result<Vec<CommitInfo>>;
}

/// Order tags for the release sequence: descending version, then
/// descending timestamp. Unparsable tags are dropped.
pub fn sorted_release_tags(tags: Vec<TagInfo>) -> Vec<TagInfo> {
    let mut versioned: Vec<(Version, TagInfo)> = tags
        .into_iter()
        .filter_map(|tag| tag.version.clone().map(|version| (version, tag)))
        .collect();

    versioned.sort_by(|a, b| {
        b.0.cmp(&a.0)
            .then_with(|| b.1.timestamp.cmp(&a.1.timestamp))
    });

    versioned.into_iter().map(|(_, tag)| tag).collect()
}

impl TagReader for GitRepo {
    fn release_tags(&self) -> Result<Vec<TagInfo>> {
        Ok(sorted_release_tags(self.tags()?))
    }
}

impl CommitReader for GitRepo {
    fn commits_in_range(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
    ) -> Result<Vec<CommitInfo>> {
        self.commits_between(from_exclusive, to_inclusive)
    }
}

/// In-memory reader over canned records, for tests and dry runs.
///
/// Commits are stored oldest first; tag names and commit hashes act as
/// range boundaries the same way revisions do against a live repository.
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    commits: Vec<CommitInfo>,
    tags: Vec<TagInfo>,
}

impl MemoryReader {
    /// Create a reader over chronologically ordered commits and a tag set.
    pub fn new(commits: Vec<CommitInfo>, tags: Vec<TagInfo>) -> Self {
        Self { commits, tags }
    }

    fn position(&self, rev: &str) -> Option<usize> {
        if rev == "HEAD" {
            return self.commits.len().checked_sub(1);
        }

        // A tag name resolves to its commit, a hash to itself.
        let hash = self
            .tags
            .iter()
            .find(|t| t.name == rev)
            .map(|t| t.commit_hash.as_str())
            .unwrap_or(rev);

        self.commits.iter().position(|c| c.hash == hash)
    }
}

impl TagReader for MemoryReader {
    fn release_tags(&self) -> Result<Vec<TagInfo>> {
        Ok(sorted_release_tags(self.tags.clone()))
    }
}

impl CommitReader for MemoryReader {
    fn commits_in_range(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
    ) -> Result<Vec<CommitInfo>> {
        use shiplog_core::error::GitError;

        let end = match self.position(to_inclusive) {
            Some(end) => end,
            None if to_inclusive == "HEAD" => return Ok(Vec::new()),
            None => return Err(GitError::UnknownReference(to_inclusive.to_string())),
        };

        let start = match from_exclusive {
            Some(rev) => self
                .position(rev)
                .ok_or_else(|| GitError::UnknownReference(rev.to_string()))?
                + 1,
            None => 0,
        };

        if start > end {
            return Ok(Vec::new());
        }

        let mut commits = self.commits[start..=end].to_vec();
        commits.reverse();
        Ok(commits)
    }
}
