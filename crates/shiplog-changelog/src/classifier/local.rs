//! Local verb-table classifier

use super::{Classification, Classifier};
use crate::types::ChangeCategory;

/// Classifier driven by the leading verb of the commit message.
///
/// Commits are expected to start with an imperative verb, but inflected
/// forms are recognized too. A first word outside the table drops the
/// commit entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClassifier;

impl LocalClassifier {
    /// Create a new local classifier
    pub fn new() -> Self {
        Self
    }
}

/// Map a lower-cased leading verb to its category.
fn category_for(verb: &str) -> Option<ChangeCategory> {
    use ChangeCategory::*;

    match verb {
        "add" | "adds" | "added" | "create" | "creates" | "created" | "implement"
        | "implements" | "implemented" | "introduce" | "introduces" | "introduced" | "make"
        | "makes" | "made" | "write" | "wrote" => Some(Added),

        "remove" | "removes" | "removed" | "delete" | "deletes" | "deleted" | "drop"
        | "drops" | "dropped" => Some(Removed),

        "deprecate" | "deprecates" | "deprecated" => Some(Deprecated),

        "fix" | "fixes" | "fixed" | "bugfix" | "resolve" | "resolves" | "resolved" | "patch"
        | "patches" | "patched" | "solve" | "solves" | "solved" | "close" | "closes"
        | "closed" | "correct" | "corrects" | "corrected" => Some(Fixed),

        "change" | "changes" | "changed" | "rename" | "renames" | "renamed" | "update"
        | "updates" | "updated" | "refactor" | "refactors" | "refactored" | "modify"
        | "modifies" | "modified" | "move" | "moves" | "moved" | "improve" | "improves"
        | "improved" | "rewrite" | "rewrites" | "rewrote" | "tweak" | "tweaks" | "tweaked"
        | "use" | "uses" | "used" => Some(Changed),

        _ => None,
    }
}

impl Classifier for LocalClassifier {
    fn classify(&self, message: &str) -> Option<Classification> {
        // Only the first line matters; the rest of a multi-line message
        // never reaches the changelog.
        let line = message.lines().next().unwrap_or("").trim_end();
        if line.is_empty() {
            return None;
        }

        let first_word = line.split_whitespace().next()?;
        let category = category_for(&first_word.to_lowercase())?;

        Some(Classification {
            category,
            description: line.to_string(),
        })
    }
}
