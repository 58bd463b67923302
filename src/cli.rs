use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::cmd::Commands;

/// Simple, file-backed to-do board.
/// Storage defaults to the platform data directory or a path passed via --data-dir.
#[derive(Parser)]
#[command(name = "todo", version, about = "Categorised to-do list for the terminal")]
pub struct Cli {
    /// Directory holding the task and category files.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}
