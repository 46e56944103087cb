//! DevDash — project dashboard CLI.
//!
//! # Usage
//!
//! ```text
//! devdash project add <folder> [--name <name>] [--url <url>] [--group <id>]
//! devdash project list [--group <id>] [--json]
//! devdash project edit <id> [--name ...] [--url ...] [--folder ...]
//! devdash project remove <id>
//! devdash project move <id> [--group <id>]...
//! devdash project reorder <id> <to-index> [--group <id>]
//! devdash group add <name> | list | rename <id> <name> | remove <id>
//! devdash screenshot <id> [--url ...] [--window-size WxH] [--timeout-ms N] [--browser <path>]
//! devdash screenshot --missing [--max N]
//! devdash export <path> | import <path>
//! ```

mod commands;
mod paths;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    group::GroupCommand,
    project::ProjectCommand,
    screenshot::ScreenshotArgs,
    transfer::{ExportArgs, ImportArgs},
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "devdash",
    version,
    about = "Curate a dashboard of local development projects",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage project tiles.
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Manage project groups (dashboard folders).
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },

    /// Capture a browser screenshot as a project thumbnail.
    Screenshot(ScreenshotArgs),

    /// Export the dashboard state to a JSON file.
    Export(ExportArgs),

    /// Replace the dashboard state from a JSON file.
    Import(ImportArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Project { command } => commands::project::run(command),
        Commands::Group { command } => commands::group::run(command),
        Commands::Screenshot(args) => args.run(),
        Commands::Export(args) => args.run(),
        Commands::Import(args) => args.run(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
