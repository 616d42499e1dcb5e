//! Generate command

use clap::Args;
use console::style;
use tracing::info;

use shiplog_changelog::ChangelogGenerator;
use shiplog_core::config::load_config_or_default;

use crate::cli::Cli;

/// Generate or update the changelog
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Discard the existing changelog content before regenerating
    #[arg(long)]
    pub overwrite: bool,
}

impl GenerateCommand {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(overwrite = self.overwrite, "executing generate command");
        let root = cli.working_dir()?;
        let (config, _) = load_config_or_default(&root);

        let generator = ChangelogGenerator::new(config, &root);
        let path = generator.generate(self.overwrite)?;

        if !cli.quiet {
            println!(
                "{} Changelog written to {}",
                style("✓").green().bold(),
                style(path.display()).cyan()
            );
        }

        Ok(())
    }
}
