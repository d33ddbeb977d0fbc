use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Personal task manager.
/// Tasks are stored as JSON in ~/.tm/tasks.json, or under --data-dir.
#[derive(Parser)]
#[command(name = "tm", version, about = "Personal task manager")]
pub struct Cli {
    /// Directory holding the task data.
    #[arg(long, global = true, env = "TM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Minimum log level written to stderr. RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Do not insert sample tasks into an empty store.
    #[arg(long, global = true)]
    pub no_seed: bool,

    #[command(subcommand)]
    pub command: Commands,
}
