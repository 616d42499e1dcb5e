//! Changelog generation pipeline
//!
//! Ties the readers, classifier, parser, merger and renderer together:
//! one call reads the existing document, merges in fresh history, and
//! atomically replaces the changelog file.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use shiplog_core::config::{api_key, Config};
use shiplog_core::error::{ChangelogError, ShiplogError};
use shiplog_git::{GitRepo, MemoryReader, TagReader};

use crate::classifier::{Classifier, ClassifyClient, LocalClassifier, RemoteClassifier};
use crate::formatter::render;
use crate::merger::merge;
use crate::parser::parse;
use crate::types::ChangelogDocument;

/// Changelog generator over one repository
pub struct ChangelogGenerator {
    config: Config,
    root: PathBuf,
    classifier: Box<dyn Classifier>,
}

impl ChangelogGenerator {
    /// Create a generator, selecting the classification strategy from
    /// the configuration and environment.
    pub fn new(config: Config, root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let classifier = select_classifier(&config, &root);
        Self {
            config,
            root,
            classifier,
        }
    }

    /// Use a specific classifier
    pub fn with_classifier<C: Classifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Generate or update the changelog file. Returns the path written.
    ///
    /// `overwrite` discards the parsed existing document entirely; the
    /// file on disk is still only replaced by the final atomic write.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn generate(&self, overwrite: bool) -> Result<PathBuf, ShiplogError> {
        let path = self.config.changelog_path(&self.root);

        let existing = if overwrite {
            info!("ignoring existing changelog content");
            ChangelogDocument::empty()
        } else {
            read_existing(&path)
        };

        let mut doc = match GitRepo::discover(&self.root) {
            Ok(repo) => {
                let tags = repo.release_tags()?;
                merge(&existing, &tags, &repo, self.classifier.as_ref())?
            }
            Err(err) if err.is_unavailable() => {
                warn!(error = %err, "version control unavailable, writing changelog without history");
                merge(
                    &existing,
                    &[],
                    &MemoryReader::default(),
                    self.classifier.as_ref(),
                )?
            }
            Err(err) => return Err(err.into()),
        };

        if doc.title.is_empty() {
            doc.title = self.config.project_title(&self.root);
        }

        let text = render(&doc);
        write_atomic(&path, &text)?;

        info!(path = %path.display(), bytes = text.len(), "changelog written");
        Ok(path)
    }
}

fn read_existing(path: &Path) -> ChangelogDocument {
    let Ok(text) = std::fs::read_to_string(path) else {
        return ChangelogDocument::empty();
    };

    match parse(&text) {
        Ok(doc) => doc,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "existing changelog unreadable, starting fresh");
            ChangelogDocument::empty()
        }
    }
}

/// Materialize the full document, then atomically replace the target.
/// A crash mid-run never leaves a truncated changelog behind.
fn write_atomic(path: &Path, text: &str) -> Result<(), ChangelogError> {
    let failed = |reason: String| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut file = tempfile::NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))
        .map_err(|e| failed(e.to_string()))?;

    file.write_all(text.as_bytes())
        .map_err(|e| failed(e.to_string()))?;
    file.persist(path).map_err(|e| failed(e.error.to_string()))?;

    Ok(())
}

/// Pick the classification strategy: the remote service when configured,
/// keyed and accepting the key, the local verb table otherwise.
fn select_classifier(config: &Config, root: &Path) -> Box<dyn Classifier> {
    if config.classify.remote {
        if let Some(key) = api_key() {
            let title = config.project_title(root);
            match ClassifyClient::new(key, &title, &config.classify) {
                Ok(client) if client.validate_key() => {
                    info!("remote classification enabled");
                    return Box::new(RemoteClassifier::new(client));
                }
                Ok(_) => {
                    info!("API key not accepted, using local classification");
                }
                Err(err) => {
                    warn!(error = %err, "could not set up classification client");
                }
            }
        }
    }

    Box::new(LocalClassifier::new())
}
