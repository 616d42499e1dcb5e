//! Commit history operations

use chrono::{TimeZone, Utc};
use git2::Sort;
use tracing::debug;

use crate::repository::{GitRepo, Result};
use crate::types::CommitInfo;
use shiplog_core::error::GitError;

impl GitRepo {
    /// Get all commits reachable from HEAD, newest first.
    pub fn all_commits(&self) -> Result<Vec<CommitInfo>> {
        let head = self.head_commit()?;
        self.walk(head.id(), None)
    }

    /// Get the commits in `(from_exclusive, to_inclusive]`, newest first.
    ///
    /// `from_exclusive` of `None` extends the range to the start of
    /// history. `to_inclusive` accepts any revision git understands
    /// ("HEAD", a hash, a tag name).
    pub fn commits_between(
        &self,
        from_exclusive: Option<&str>,
        to_inclusive: &str,
    ) -> Result<Vec<CommitInfo>> {
        let to_oid = self.resolve(to_inclusive)?;
        let from_oid = from_exclusive.map(|rev| self.resolve(rev)).transpose()?;

        self.walk(to_oid, from_oid)
    }

    fn resolve(&self, rev: &str) -> Result<git2::Oid> {
        let obj = self
            .repo
            .revparse_single(rev)
            .map_err(|_| GitError::UnknownReference(rev.to_string()))?;
        let commit = obj
            .peel_to_commit()
            .map_err(|_| GitError::UnknownReference(rev.to_string()))?;
        Ok(commit.id())
    }

    fn walk(&self, push: git2::Oid, hide: Option<git2::Oid>) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(push)?;
        if let Some(hide) = hide {
            revwalk.hide(hide)?;
        }

        let mut commits = Vec::new();

        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(commit_to_info(&commit));
        }

        debug!(count = commits.len(), "walked commit range");
        Ok(commits)
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let hash = commit.id().to_string();

    let summary = commit.summary().unwrap_or("").to_string();
    let body = commit.body().map(|b| b.to_string());

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_default();

    CommitInfo::new(hash, summary, timestamp).with_body(body.unwrap_or_default())
}
