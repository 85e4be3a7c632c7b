use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kn", about = concat!("[#] kanri v", env!("CARGO_PKG_VERSION"), " - kanban boards as plain files"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Run against a different boards directory
    #[arg(short = 'C', long = "boards-dir", global = true)]
    pub boards_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new board with the default columns
    Create(CreateArgs),
    /// List all boards
    List,
    /// Show a board's columns and tasks
    Show(ShowArgs),
    /// Delete a board and everything in it
    Delete(DeleteArgs),
    /// Migrate boards to the current on-disk layout
    Migrate(MigrateArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Board display name
    pub name: String,

    /// Board description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Task id prefix (derived from the name if omitted)
    #[arg(short, long)]
    pub prefix: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Board id or display name
    pub board: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Board id
    pub board: String,
}

#[derive(Args)]
pub struct MigrateArgs {
    /// Board id (all boards if omitted)
    pub board: Option<String>,
}
