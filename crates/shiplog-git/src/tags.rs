//! Tag operations

use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// Get all tags, in repository iteration order.
    ///
    /// Lightweight tags take their target commit's timestamp; annotated
    /// tags use the tagger time when present.
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(commit) = self.repo.find_commit(oid) {
                // Lightweight tag pointing straight at a commit
                let timestamp = epoch_to_utc(commit.time().seconds());
                tags.push(TagInfo::new(&name, commit.id().to_string(), timestamp));
            } else if let Ok(tag) = self.repo.find_tag(oid) {
                // Annotated tag
                let target_id = tag.target_id();
                let timestamp = tag
                    .tagger()
                    .map(|t| epoch_to_utc(t.when().seconds()))
                    .or_else(|| {
                        self.repo
                            .find_commit(target_id)
                            .ok()
                            .map(|c| epoch_to_utc(c.time().seconds()))
                    })
                    .unwrap_or_default();

                tags.push(TagInfo::new(&name, target_id.to_string(), timestamp));
            }

            true
        })?;

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }
}

fn epoch_to_utc(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(seconds, 0).single().unwrap_or_default()
}
