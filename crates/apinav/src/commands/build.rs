//! `apinav build` command implementation.

use apinav_sidebar::{check_references, emit};
use clap::Args;

use super::{ProjectArgs, compile_project, emit_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the OpenAPI document
    /// cannot be compiled, or output files cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.project.load_config()?;

        let tree = compile_project(&config, &output)?;
        let dest = &config.output_resolved.dir;
        output.location("Output directory", dest);

        let options = emit_options(&config);
        let report = emit(&tree, dest, &options)?;
        output.broken_references(&check_references(&report.items, dest, &options.pages)?);
        output.built(&tree, &report);
        Ok(())
    }
}
