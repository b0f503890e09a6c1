//! pgs-exports — polygenic score catalog metadata export and publish CLI.
//!
//! # Usage
//!
//! ```text
//! pgs-exports table <kind> --snapshot <dir> [--score <PGS>...]
//! pgs-exports export --snapshot <dir> --out <dir> [--config <file>] [--score-limit N]
//! pgs-exports publish --snapshot <dir> --export-dir <dir> --content-dir <dir> (--prior-dir <dir> | --prior-url <url>)
//! pgs-exports release --snapshot <dir> --work-dir <dir> (--prior-dir <dir> | --prior-url <url>)
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`); logs go to stderr so
//! `table` output can be piped.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    export::ExportArgs, publish::PublishArgs, release::ReleaseArgs, table::TableArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pgs-exports",
    version,
    about = "Export polygenic score catalog metadata and publish it to the distribution tree",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one metadata table as CSV.
    Table(TableArgs),

    /// Write every export bundle of a release.
    Export(ExportArgs),

    /// Publish existing export bundles against the previous tree.
    Publish(PublishArgs),

    /// Export, publish and package a full release.
    Release(ReleaseArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Table(args) => args.run(),
        Commands::Export(args) => args.run(),
        Commands::Publish(args) => args.run(),
        Commands::Release(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
