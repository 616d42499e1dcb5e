//! Rendering a changelog document to markdown
//!
//! Output is deterministic and order-stable: title, then releases in
//! document order, then category sections in their fixed order. A release
//! carrying preserved source text is emitted verbatim.

use crate::types::{ChangelogDocument, Release, ReleaseId};

/// Render the document to Keep-a-Changelog-style markdown.
pub fn render(doc: &ChangelogDocument) -> String {
    let mut blocks: Vec<String> = Vec::new();

    blocks.push(format!("# {}", doc.title));

    if let Some(preamble) = &doc.preamble {
        blocks.push(preamble.clone());
    }

    for release in &doc.releases {
        blocks.push(render_release(release));
    }

    let mut output = blocks.join("\n\n");
    output.push('\n');
    output
}

fn render_release(release: &Release) -> String {
    if let Some(raw) = &release.raw {
        return raw.clone();
    }

    let mut output = heading(release);

    for (category, entries) in &release.sections {
        if entries.is_empty() {
            continue;
        }

        output.push_str("\n\n### ");
        output.push_str(category.title());
        output.push('\n');

        for entry in entries {
            output.push_str("\n- ");
            output.push_str(&entry.description);
        }
    }

    output
}

fn heading(release: &Release) -> String {
    match (&release.id, release.date) {
        (ReleaseId::Unreleased, _) => "## [Unreleased]".to_string(),
        (ReleaseId::Version(name), Some(date)) => {
            format!("## [{}] - {}", name, date.format("%Y-%m-%d"))
        }
        (ReleaseId::Version(name), None) => format!("## [{}]", name),
    }
}
