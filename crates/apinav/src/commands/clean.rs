//! `apinav clean` command implementation.

use apinav_sidebar::clean;
use clap::Args;

use super::ProjectArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the clean command.
#[derive(Args)]
pub(crate) struct CleanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl CleanArgs {
    /// Execute the clean command.
    ///
    /// Only generated files are removed; hand-written documents in the
    /// output directory are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or a file cannot be removed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.project.load_config()?;

        let dest = &config.output_resolved.dir;
        let removed = clean(dest)?;
        output.cleaned(removed, dest);
        Ok(())
    }
}
