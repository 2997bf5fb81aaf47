//! `apinav check` command implementation.

use apinav_sidebar::check_references;
use clap::Args;

use super::{ProjectArgs, compile_project, emit_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Compiles the sidebar without writing anything and reports sidebar
    /// entries that have no document in the output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the OpenAPI document
    /// cannot be compiled.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.project.load_config()?;

        let tree = compile_project(&config, &output)?;
        let options = emit_options(&config);

        output.outline(&tree);

        let dest = &config.output_resolved.dir;
        let items = tree.nav_items(&options.pages.sidebar);
        let broken = check_references(&items, dest, &options.pages)?;
        output.broken_references(&broken);
        output.checked(&tree, broken.len(), dest);
        Ok(())
    }
}
