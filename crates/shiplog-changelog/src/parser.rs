//! Parsing an existing changelog document
//!
//! Line-oriented state machine over headings and bullets. Each release
//! additionally keeps its exact source text so the renderer can emit
//! previously released sections byte-for-byte; lines the parser does not
//! recognize are therefore never lost.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use shiplog_core::error::ChangelogError;

use crate::types::{ChangeCategory, ChangelogDocument, ChangelogEntry, Release, ReleaseId};

static RELEASE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##\s+\[?([^\]]+?)\]?\s*(?:-\s*(\d{4}-\d{2}-\d{2}))?\s*$").expect("Invalid regex")
});

static CATEGORY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###\s+(.+?)\s*$").expect("Invalid regex"));

static BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+(.+?)\s*$").expect("Invalid regex"));

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(.+?)\s*$").expect("Invalid regex"));

/// Parse stored changelog text into a document.
///
/// Empty input yields an empty document. Input with no recognizable
/// structure at all is `MalformedDocument`; callers recover by starting
/// from an empty document.
pub fn parse(text: &str) -> Result<ChangelogDocument, ChangelogError> {
    if text.trim().is_empty() {
        return Ok(ChangelogDocument::empty());
    }

    let mut doc = ChangelogDocument::empty();
    let mut preamble: Vec<&str> = Vec::new();
    let mut current: Option<ReleaseBuilder> = None;

    for line in text.lines() {
        if let Some(caps) = RELEASE_HEADING.captures(line) {
            if let Some(builder) = current.take() {
                push_release(&mut doc, builder.finish());
            }

            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            let id = if name.eq_ignore_ascii_case("unreleased") {
                ReleaseId::Unreleased
            } else {
                ReleaseId::Version(name.to_string())
            };
            let date = caps
                .get(2)
                .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok());

            current = Some(ReleaseBuilder::new(id, date, line));
        } else if let Some(builder) = current.as_mut() {
            builder.feed(line);
        } else if doc.title.is_empty() {
            if let Some(caps) = TITLE.captures(line) {
                doc.title = caps[1].to_string();
            } else if !line.trim().is_empty() {
                preamble.push(line);
            }
        } else {
            preamble.push(line);
        }
    }

    if let Some(builder) = current.take() {
        push_release(&mut doc, builder.finish());
    }

    doc.preamble = collect_preamble(preamble);

    if doc.title.is_empty() && doc.releases.is_empty() {
        return Err(ChangelogError::MalformedDocument(
            "no title or release headings found".to_string(),
        ));
    }

    debug!(releases = doc.releases.len(), "parsed changelog document");
    Ok(doc)
}

/// Append a release, keeping identifiers unique (first occurrence wins).
fn push_release(doc: &mut ChangelogDocument, release: Release) {
    let duplicate = doc.releases.iter().any(|r| r.id == release.id);
    if !duplicate {
        doc.releases.push(release);
    }
}

fn collect_preamble(lines: Vec<&str>) -> Option<String> {
    let mut lines = lines;
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

struct ReleaseBuilder {
    release: Release,
    category: Option<ChangeCategory>,
    raw_lines: Vec<String>,
}

impl ReleaseBuilder {
    fn new(id: ReleaseId, date: Option<NaiveDate>, heading: &str) -> Self {
        Self {
            release: Release::new(id).with_date(date),
            category: None,
            raw_lines: vec![heading.to_string()],
        }
    }

    fn feed(&mut self, line: &str) {
        self.raw_lines.push(line.to_string());

        if let Some(caps) = CATEGORY_HEADING.captures(line) {
            self.category = ChangeCategory::from_title(&caps[1]);
        } else if let Some(caps) = BULLET.captures(line) {
            if let Some(category) = self.category {
                self.release
                    .push_entry(category, ChangelogEntry::new(&caps[1]));
            }
        }
    }

    fn finish(mut self) -> Release {
        while self.raw_lines.last().is_some_and(|l| l.trim().is_empty()) {
            self.raw_lines.pop();
        }
        self.release.raw = Some(self.raw_lines.join("\n"));
        self.release
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# demo

## [Unreleased]

### Added

- Add login page

## [v1.0.0] - 2024-03-01

### Fixed

- Fix crash on startup
- Manual note
";

    #[test]
    fn test_parse_structure() {
        let doc = parse(SAMPLE).unwrap();

        assert_eq!(doc.title, "demo");
        assert_eq!(doc.releases.len(), 2);
        assert_eq!(doc.releases[0].id, ReleaseId::Unreleased);
        assert!(doc.releases[1].id.is_version("v1.0.0"));
        assert_eq!(
            doc.releases[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_entries() {
        let doc = parse(SAMPLE).unwrap();

        let release = doc.find_version("v1.0.0").unwrap();
        let fixed = release.entries(ChangeCategory::Fixed);
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed[0].description, "Fix crash on startup");
        assert_eq!(fixed[1].description, "Manual note");
    }

    #[test]
    fn test_parse_keeps_raw_span() {
        let doc = parse(SAMPLE).unwrap();

        let raw = doc.find_version("v1.0.0").unwrap().raw.as_deref().unwrap();
        assert!(raw.starts_with("## [v1.0.0] - 2024-03-01"));
        assert!(raw.ends_with("- Manual note"));
    }

    #[test]
    fn test_parse_unbracketed_heading() {
        let text = "# demo\n\n## 1.0.0 - 2024-03-01\n\n### Added\n\n- Add thing\n";
        let doc = parse(text).unwrap();
        assert!(doc.releases[0].id.is_version("1.0.0"));
        assert_eq!(
            doc.releases[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_parse_unknown_category_ignored_structurally() {
        let text = "# demo\n\n## [v1.0.0] - 2024-03-01\n\n### Security\n\n- Hardened things\n";
        let doc = parse(text).unwrap();

        let release = doc.find_version("v1.0.0").unwrap();
        assert!(release.sections.values().all(Vec::is_empty));
        // Still preserved verbatim.
        assert!(release.raw.as_deref().unwrap().contains("Hardened things"));
    }

    #[test]
    fn test_parse_empty_input() {
        let doc = parse("").unwrap();
        assert!(doc.is_empty());
        assert!(doc.title.is_empty());
    }

    #[test]
    fn test_parse_malformed_input() {
        let result = parse("just some prose\nwith no headings\n");
        assert!(matches!(result, Err(ChangelogError::MalformedDocument(_))));
    }

    #[test]
    fn test_parse_preamble_preserved() {
        let text = "# demo\n\nHand-written intro.\n\n## [v1.0.0] - 2024-03-01\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.preamble.as_deref(), Some("Hand-written intro."));
    }

    #[test]
    fn test_parse_duplicate_release_first_wins() {
        let text = "# demo\n\n## [v1.0.0] - 2024-03-01\n\n### Added\n\n- First\n\n## [v1.0.0] - 2024-03-01\n\n### Added\n\n- Second\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.releases.len(), 1);
        assert!(doc.releases[0].raw.as_deref().unwrap().contains("First"));
    }
}
