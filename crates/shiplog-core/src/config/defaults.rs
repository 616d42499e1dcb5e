//! Default configuration values

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "shiplog.toml";

/// Alternative (hidden) configuration file name
pub const ALT_CONFIG_FILE: &str = ".shiplog.toml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![DEFAULT_CONFIG_FILE, ALT_CONFIG_FILE]
}

/// Default configuration template written by `shiplog init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# shiplog configuration

# Project title rendered at the top of the changelog.
# Defaults to the repository directory name when unset.
# project = "My Project"

[changelog]
# Output file, relative to the repository root.
file = "CHANGELOG.md"

[classify]
# Allow the remote classification service when SHIPLOG_API_KEY is set.
remote = true
# url = "https://example.invalid/classify"
timeout_secs = 10
"#;
