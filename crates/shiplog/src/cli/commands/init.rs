//! Init command

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use shiplog_core::config::defaults::{DEFAULT_CONFIG_FILE, DEFAULT_CONFIG_TEMPLATE};

use crate::cli::Cli;

/// Write a default shiplog configuration
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, "executing init command");
        let root = cli.working_dir()?;
        let config_path = self
            .output
            .clone()
            .unwrap_or_else(|| root.join(DEFAULT_CONFIG_FILE));

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        if !cli.quiet {
            println!(
                "{} Configuration written to {}",
                style("✓").green().bold(),
                style(config_path.display()).cyan()
            );
        }

        Ok(())
    }
}
