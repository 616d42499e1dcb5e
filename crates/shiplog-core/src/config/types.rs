//! Configuration types

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Main configuration for shiplog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project title rendered at the top of the changelog.
    /// Defaults to the repository directory name when unset.
    pub project: Option<String>,

    /// Changelog output configuration
    pub changelog: ChangelogConfig,

    /// Remote classification configuration
    pub classify: ClassifyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: None,
            changelog: ChangelogConfig::default(),
            classify: ClassifyConfig::default(),
        }
    }
}

impl Config {
    /// Resolve the project title for a repository rooted at `root`.
    pub fn project_title(&self, root: &Path) -> String {
        match &self.project {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "Changelog".to_string()),
        }
    }

    /// Resolve the changelog file path for a repository rooted at `root`.
    pub fn changelog_path(&self, root: &Path) -> PathBuf {
        root.join(self.changelog.file_name())
    }
}

/// Changelog output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Output file name, relative to the repository root
    pub file: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: "CHANGELOG.md".to_string(),
        }
    }
}

impl ChangelogConfig {
    /// The configured file name with a `.md` extension enforced.
    pub fn file_name(&self) -> String {
        if self.file.ends_with(".md") {
            self.file.clone()
        } else {
            format!("{}.md", self.file)
        }
    }
}

/// Remote classification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Whether the remote classification service may be used at all.
    /// The service is only contacted when this is true and an API key
    /// is present in the environment.
    pub remote: bool,

    /// Override for the classification service base URL
    pub url: Option<String>,

    /// Request timeout in seconds for service calls
    pub timeout_secs: u64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            remote: true,
            url: None,
            timeout_secs: 10,
        }
    }
}

/// Environment variable holding the classification service API key
pub const API_KEY_VAR: &str = "SHIPLOG_API_KEY";

/// Read the classification API key from the environment, if set.
pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_VAR)
        .ok()
        .filter(|key| !key.trim().is_empty())
}
