//! # TM - Personal Task Manager
//!
//! A single-user task tracker for the terminal: create, edit, complete, filter and
//! delete tasks, with summary statistics and an optional terminal user interface.
//!
//! ## Key Features
//!
//! - **Priorities and Categories**: high / medium / low priority, six categories,
//!   optional due dates
//! - **Urgency-first Ordering**: pending before completed, then priority, then due
//!   date, newest last
//! - **Filtering**: by status, priority, category and free-text search
//! - **Statistics**: total, completed, pending, pending high-priority and overdue
//! - **Two Interfaces**: scriptable CLI plus an interactive TUI
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! tm ui
//!
//! # Add a task via CLI
//! tm add "Renew passport" --priority high --category personal --due "in 2w"
//!
//! # List pending work tasks
//! tm list --status pending --category work
//!
//! # Complete a task by its short id or description
//! tm done "Renew passport"
//! ```
//!
//! Data is stored locally in `~/.tm/tasks.json` (override with `--data-dir` or
//! `TM_DATA_DIR`). An empty store is filled with a few sample tasks on start-up
//! unless `--no-seed` is given.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::debug;

pub mod cli;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod filter;
pub mod format;
pub mod id;
pub mod logging;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod task;
pub mod validate;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use db::TaskStore;
use filter::TaskFilters;
use storage::FileStore;

fn default_data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".tm"))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

    if matches!(cli.command, Commands::Ui) {
        logging::init_file_subscriber(&cli.log_level, &data_dir.join("tm.log"));
    } else {
        logging::init_subscriber(&cli.log_level);
    }

    let mut store = TaskStore::new(FileStore::new(&data_dir));
    debug!(dir = %store.backend().dir().display(), "opened task store");

    let seeds = !cli.no_seed && !matches!(cli.command, Commands::Seed | Commands::Completions { .. });
    if seeds {
        seed::seed_if_empty(&mut store, Utc::now().date_naive());
    }

    match cli.command {
        Commands::Ui => tui::run::run_tui(store).context("UI error")?,

        Commands::Add { description, priority, category, due } =>
            cmd_add(&mut store, description, priority, category, due)?,

        Commands::List { status, priority, category, search, limit, json } => {
            let filters = TaskFilters {
                status,
                priority,
                category,
                search_query: search.unwrap_or_default(),
            };
            cmd_list(&store, filters, limit, json)?
        }

        Commands::View { id } => cmd_view(&store, id)?,

        Commands::Edit { id, desc, priority, category, due, clear_due } =>
            cmd_edit(&mut store, id, desc, priority, category, due, clear_due)?,

        Commands::Done { id } => cmd_done(&mut store, id)?,

        Commands::Undo { id } => cmd_undo(&mut store, id)?,

        Commands::Toggle { id } => cmd_toggle(&mut store, id)?,

        Commands::Rm { id } => cmd_rm(&mut store, id)?,

        Commands::Stats { json } => cmd_stats(&store, json)?,

        Commands::Seed => cmd_seed(&mut store)?,

        Commands::Completions { shell } => cmd_completions(shell),
    }
    Ok(())
}
