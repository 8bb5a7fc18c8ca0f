//! Command handlers. Each submodule owns one `dk` subcommand: its clap
//! `Args` struct and a `run_*` entry point.

pub mod add;
pub mod init;
pub mod list;
pub mod log;
pub mod project;
pub mod rm;
pub mod show;
pub mod update;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use docket_core::Tracker;
use docket_core::config::{self, Config};
use docket_core::store::SqliteStore;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::output::kv;
use docket_core::model::Task;

/// Resolve the workspace root: an explicit `--dir`, or the nearest ancestor
/// containing `.docket/`.
pub fn workspace_root(dir_flag: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = dir_flag {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().context("resolve current directory")?;
    config::find_root(&cwd)
        .ok_or_else(|| anyhow!("not inside a docket workspace (run `dk init` first)"))
}

/// Open the tracker over the workspace's SQLite database.
pub fn open_tracker(root: &Path) -> anyhow::Result<(Tracker<SqliteStore>, Config)> {
    let cfg = Config::load(root)?;
    tracing::debug!(root = %root.display(), db = %cfg.db_file, "opening store");
    let store = SqliteStore::open(&cfg.db_path(root))?;
    Ok((Tracker::new(store), cfg))
}

/// Parse a `YYYY-MM-DD` due date flag.
pub fn parse_due(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_str(raw)
        .map_err(|_| anyhow!("invalid due date '{raw}': expected YYYY-MM-DD"))
}

/// Human rendering for one task, key/value style.
pub fn write_task(w: &mut dyn Write, task: &Task) -> std::io::Result<()> {
    kv(w, "id", &task.id)?;
    kv(w, "project", &task.project_id)?;
    kv(w, "title", &task.title)?;
    kv(w, "status", task.status.to_string())?;
    kv(w, "priority", task.priority.to_string())?;
    kv(
        w,
        "assignee",
        task.assignee_email.as_deref().unwrap_or("-"),
    )?;
    kv(
        w,
        "due",
        task.due_date.map_or_else(|| "-".to_string(), |d| d.to_string()),
    )?;
    Ok(())
}
