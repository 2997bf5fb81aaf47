//! apinav CLI - OpenAPI to documentation sidebar compiler.
//!
//! Provides commands for:
//! - `build`: Generate the sidebar and API pages
//! - `check`: Compile the sidebar and report missing documents
//! - `clean`: Remove generated files

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, CheckArgs, CleanArgs};
use output::Output;

/// apinav - OpenAPI to documentation sidebar compiler.
#[derive(Parser)]
#[command(name = "apinav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the sidebar and one page per operation, tag and overview.
    Build(BuildArgs),
    /// Compile the sidebar without writing and check for missing documents.
    Check(CheckArgs),
    /// Remove generated files from the output directory.
    Clean(CleanArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.project.verbose,
            Self::Check(args) => args.project.verbose,
            Self::Clean(args) => args.project.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Check(args) => args.execute(),
        Commands::Clean(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
