//! Merging freshly classified history into an existing document
//!
//! The Unreleased section is rebuilt from scratch on every run. Concrete
//! releases already recorded in the existing document are copied through
//! untouched; only releases for previously unrecorded tags are generated.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use shiplog_core::error::GitError;
use shiplog_git::{parse_version, CommitInfo, CommitReader, TagInfo};

use crate::classifier::Classifier;
use crate::types::{ChangelogDocument, ChangelogEntry, Release, ReleaseId};

/// Merge classified commit history with an existing document.
///
/// `tags` must be the release sequence: semver-parsable only, newest
/// first. Commit ranges come from consecutive tag pairs; the oldest tag
/// reaches back to the start of history. When two tags point at the same
/// commit the newer one ends up with a zero-width range, so nothing is
/// counted twice.
#[instrument(skip_all, fields(tags = tags.len(), existing = existing.releases.len()))]
pub fn merge(
    existing: &ChangelogDocument,
    tags: &[TagInfo],
    reader: &dyn CommitReader,
    classifier: &dyn Classifier,
) -> Result<ChangelogDocument, GitError> {
    let mut doc = ChangelogDocument::new(existing.title.clone());
    doc.preamble = existing.preamble.clone();

    // The Unreleased bucket always replaces whatever was parsed.
    let newest = tags.first();
    let commits = reader.commits_in_range(newest.map(|t| t.name.as_str()), "HEAD")?;
    let unreleased = build_release(ReleaseId::Unreleased, None, commits, classifier);
    if !unreleased.is_empty() {
        doc.releases.push(unreleased);
    }

    let mut concrete: Vec<Release> = Vec::new();

    for (index, tag) in tags.iter().enumerate() {
        if let Some(found) = existing.find_version(&tag.name) {
            // Already recorded: manual edits survive indefinitely.
            concrete.push(found.clone());
            continue;
        }

        let from = tags.get(index + 1).map(|t| t.name.as_str());
        let commits = reader.commits_in_range(from, &tag.name)?;
        let release = build_release(
            ReleaseId::Version(tag.name.clone()),
            Some(tag.timestamp.date_naive()),
            commits,
            classifier,
        );
        concrete.push(release);
    }

    // Releases recorded in the file whose tags no longer exist are kept
    // rather than silently dropped.
    for release in &existing.releases {
        let ReleaseId::Version(name) = &release.id else {
            continue;
        };
        if tags.iter().any(|t| &t.name == name) {
            continue;
        }
        insert_by_version(&mut concrete, release.clone());
    }

    debug!(releases = concrete.len() + doc.releases.len(), "merged document");
    doc.releases.extend(concrete);
    Ok(doc)
}

/// Classify a commit range into a release, oldest commit first.
fn build_release(
    id: ReleaseId,
    date: Option<NaiveDate>,
    mut commits: Vec<CommitInfo>,
    classifier: &dyn Classifier,
) -> Release {
    let mut release = Release::new(id).with_date(date);

    // Readers hand back newest first; buckets keep chronological order.
    commits.reverse();

    let messages: Vec<String> = commits.iter().map(|c| c.summary.clone()).collect();
    let classifications = classifier.classify_all(&messages);

    for (commit, classification) in commits.iter().zip(classifications) {
        if let Some(c) = classification {
            release.push_entry(
                c.category,
                ChangelogEntry::new(c.description).with_commit(&commit.hash),
            );
        }
    }

    release
}

/// Insert a release into a descending-version sequence.
fn insert_by_version(concrete: &mut Vec<Release>, release: Release) {
    let version = match &release.id {
        ReleaseId::Version(name) => parse_version(name),
        ReleaseId::Unreleased => None,
    };

    let Some(version) = version else {
        concrete.push(release);
        return;
    };

    let index = concrete
        .iter()
        .position(|r| match &r.id {
            ReleaseId::Version(name) => {
                parse_version(name).map_or(true, |v| v < version)
            }
            ReleaseId::Unreleased => true,
        })
        .unwrap_or(concrete.len());

    concrete.insert(index, release);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LocalClassifier;
    use crate::formatter::render;
    use crate::parser::parse;
    use crate::types::ChangeCategory;
    use chrono::{TimeZone, Utc};
    use shiplog_git::MemoryReader;

    fn commit(hash: &str, summary: &str, hour: u32) -> CommitInfo {
        CommitInfo::new(
            hash,
            summary,
            Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        )
    }

    fn tag(name: &str, hash: &str, hour: u32) -> TagInfo {
        TagInfo::new(
            name,
            hash,
            Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap(),
        )
    }

    fn release_tags(reader: &MemoryReader) -> Vec<TagInfo> {
        use shiplog_git::TagReader;
        reader.release_tags().unwrap()
    }

    #[test]
    fn test_untagged_history_goes_to_unreleased() {
        let reader = MemoryReader::new(
            vec![
                commit("a", "Add login page", 1),
                commit("b", "Refactor auth module", 2),
                commit("c", "xyz random message", 3),
            ],
            Vec::new(),
        );

        let doc = merge(
            &ChangelogDocument::empty(),
            &[],
            &reader,
            &LocalClassifier::new(),
        )
        .unwrap();

        assert_eq!(doc.releases.len(), 1);
        let unreleased = &doc.releases[0];
        assert_eq!(unreleased.id, ReleaseId::Unreleased);
        assert_eq!(
            unreleased.entries(ChangeCategory::Added)[0].description,
            "Add login page"
        );
        assert_eq!(
            unreleased.entries(ChangeCategory::Changed)[0].description,
            "Refactor auth module"
        );
        // The unclassifiable commit contributes nothing.
        assert!(unreleased.entries(ChangeCategory::Fixed).is_empty());
    }

    #[test]
    fn test_empty_unreleased_omitted() {
        let reader = MemoryReader::new(
            vec![commit("a", "Add login page", 1)],
            vec![tag("v1.0.0", "a", 1)],
        );
        let tags = release_tags(&reader);

        let doc = merge(
            &ChangelogDocument::empty(),
            &tags,
            &reader,
            &LocalClassifier::new(),
        )
        .unwrap();

        assert_eq!(doc.releases.len(), 1);
        assert!(doc.releases[0].id.is_version("v1.0.0"));
    }

    #[test]
    fn test_commit_ranges_per_tag() {
        let reader = MemoryReader::new(
            vec![
                commit("a", "Add login page", 1),
                commit("b", "Fix crash on startup", 2),
                commit("c", "Add export command", 3),
            ],
            vec![tag("v1.0.0", "a", 1), tag("v1.1.0", "b", 2)],
        );
        let tags = release_tags(&reader);

        let doc = merge(
            &ChangelogDocument::empty(),
            &tags,
            &reader,
            &LocalClassifier::new(),
        )
        .unwrap();

        // Unreleased: commit c. v1.1.0: commit b. v1.0.0: commit a.
        assert_eq!(doc.releases.len(), 3);
        assert_eq!(doc.releases[0].id, ReleaseId::Unreleased);
        assert_eq!(
            doc.releases[0].entries(ChangeCategory::Added)[0].description,
            "Add export command"
        );
        assert!(doc.releases[1].id.is_version("v1.1.0"));
        assert_eq!(
            doc.releases[1].entries(ChangeCategory::Fixed)[0].description,
            "Fix crash on startup"
        );
        assert!(doc.releases[2].id.is_version("v1.0.0"));
        assert_eq!(
            doc.releases[2].entries(ChangeCategory::Added)[0].description,
            "Add login page"
        );
    }

    #[test]
    fn test_release_dates_from_tags() {
        let reader = MemoryReader::new(
            vec![commit("a", "Add login page", 1)],
            vec![tag("v1.0.0", "a", 1)],
        );
        let tags = release_tags(&reader);

        let doc = merge(
            &ChangelogDocument::empty(),
            &tags,
            &reader,
            &LocalClassifier::new(),
        )
        .unwrap();

        assert_eq!(
            doc.releases[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_existing_release_preserved_verbatim() {
        let existing_text = "\
# demo

## [v1.0.0] - 2024-03-01

### Fixed

- Fix crash on startup
- Manual note
";
        let existing = parse(existing_text).unwrap();

        let reader = MemoryReader::new(
            vec![
                commit("a", "Fix crash on startup", 1),
                commit("b", "Fix crash on startup again", 2),
            ],
            vec![tag("v1.0.0", "a", 1)],
        );
        let tags = release_tags(&reader);

        let doc = merge(&existing, &tags, &reader, &LocalClassifier::new()).unwrap();
        let output = render(&doc);

        assert!(output.contains("- Manual note"));
        assert!(output.contains("## [Unreleased]\n\n### Fixed\n\n- Fix crash on startup again"));
    }

    #[test]
    fn test_unreleased_always_rebuilt() {
        let existing_text = "\
# demo

## [Unreleased]

### Added

- Stale entry from a previous run
";
        let existing = parse(existing_text).unwrap();

        let reader = MemoryReader::new(vec![commit("a", "Fix crash on startup", 1)], Vec::new());

        let doc = merge(&existing, &[], &reader, &LocalClassifier::new()).unwrap();

        assert_eq!(doc.releases.len(), 1);
        let unreleased = &doc.releases[0];
        assert!(unreleased.entries(ChangeCategory::Added).is_empty());
        assert_eq!(
            unreleased.entries(ChangeCategory::Fixed)[0].description,
            "Fix crash on startup"
        );
    }

    #[test]
    fn test_merge_is_idempotent() {
        let reader = MemoryReader::new(
            vec![
                commit("a", "Add login page", 1),
                commit("b", "Fix crash on startup", 2),
            ],
            vec![tag("v1.0.0", "a", 1)],
        );
        let tags = release_tags(&reader);
        let classifier = LocalClassifier::new();

        let first = merge(&ChangelogDocument::empty(), &tags, &reader, &classifier).unwrap();
        let first_text = render(&first);

        let reparsed = parse(&first_text).unwrap();
        let second = merge(&reparsed, &tags, &reader, &classifier).unwrap();
        let second_text = render(&second);

        assert_eq!(first_text, second_text);
    }

    #[test]
    fn test_tags_sharing_commit_newer_is_empty() {
        let reader = MemoryReader::new(
            vec![
                commit("a", "Add login page", 1),
                commit("b", "Fix crash on startup", 2),
            ],
            vec![tag("v1.0.0", "b", 2), tag("v1.0.1", "b", 3)],
        );
        let tags = release_tags(&reader);
        assert_eq!(tags[0].name, "v1.0.1");

        let doc = merge(
            &ChangelogDocument::empty(),
            &tags,
            &reader,
            &LocalClassifier::new(),
        )
        .unwrap();

        let newer = doc.find_version("v1.0.1").unwrap();
        assert!(newer.sections.values().all(Vec::is_empty));

        let older = doc.find_version("v1.0.0").unwrap();
        assert_eq!(older.entries(ChangeCategory::Fixed).len(), 1);
        assert_eq!(older.entries(ChangeCategory::Added).len(), 1);
    }

    #[test]
    fn test_orphaned_release_kept_in_version_order() {
        let existing_text = "\
# demo

## [v0.5.0] - 2023-11-01

### Added

- Add prototype
";
        let existing = parse(existing_text).unwrap();

        let reader = MemoryReader::new(
            vec![commit("a", "Add login page", 1)],
            vec![tag("v1.0.0", "a", 1)],
        );
        let tags = release_tags(&reader);

        let doc = merge(&existing, &tags, &reader, &LocalClassifier::new()).unwrap();

        let positions: Vec<_> = doc
            .releases
            .iter()
            .map(|r| r.id.label().to_string())
            .collect();
        assert_eq!(positions, vec!["v1.0.0", "v0.5.0"]);
    }
}
