//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod clean;

use std::path::PathBuf;

use apinav_config::{CategoryLinkSource, CliSettings, Config, GroupPathsBy};
use apinav_sidebar::{
    CompileOptions, EmitOptions, Locale, OpenApiDocument, PageOptions, SidebarOptions,
    SidebarTree, compile_with,
};
use clap::Args;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use clean::CleanArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Path to configuration file (default: auto-discover apinav.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// OpenAPI document to read (overrides config).
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// Directory for generated docs (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Presentation locale, `en` or `id` (overrides config).
    #[arg(long, env = "APINAV_LOCALE")]
    locale: Option<String>,

    /// Base URL the site is served under (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ProjectArgs {
    /// Load configuration with command-line overrides applied.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            spec_path: self.spec.clone(),
            output_dir: self.output_dir.clone(),
            locale: self.locale.clone(),
            base_url: self.base_url.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Read the OpenAPI document named by `config` and compile its sidebar tree.
pub(crate) fn compile_project(config: &Config, output: &Output) -> Result<SidebarTree, CliError> {
    let spec_path = &config.spec_resolved.path;
    output.location("OpenAPI document", spec_path);

    let document = OpenApiDocument::load(spec_path)?;
    tracing::debug!(
        operations = document.operations.len(),
        group_paths_by = ?config.sidebar.group_paths_by,
        "Loaded OpenAPI document"
    );
    let options = CompileOptions {
        overview_id: config.overview.id.clone(),
    };
    Ok(compile_with(&document, &options)?)
}

/// Translate configuration into emit options.
pub(crate) fn emit_options(config: &Config) -> EmitOptions {
    let sidebar = SidebarOptions {
        id_prefix: config.output_resolved.id_prefix.clone(),
        category_links: match config.sidebar.category_link_source {
            CategoryLinkSource::Tag => true,
            CategoryLinkSource::None => false,
        },
    };
    EmitOptions {
        pages: PageOptions {
            sidebar,
            base_url: config.site.base_url.clone(),
            locale: Locale::resolve(&config.site.locale),
        },
        generate_overview: config.overview.generate,
    }
}
