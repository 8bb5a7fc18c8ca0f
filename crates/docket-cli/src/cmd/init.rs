//! `dk init` — initialize a docket workspace.

use anyhow::Context;
use clap::Args;
use docket_core::config::{Config, DATA_DIR};
use docket_core::store::SqliteStore;
use std::path::Path;

use crate::output::{OutputMode, render_success};

const DEFAULT_CONFIG: &str = "\
# docket configuration — every key is optional.
#
# db_file = \"docket.sqlite3\"
# page_size = 10
";

#[derive(Args, Debug)]
pub struct InitArgs {}

pub fn run_init(_args: &InitArgs, output: OutputMode, root: &Path) -> anyhow::Result<()> {
    let data_dir = root.join(DATA_DIR);
    let already = data_dir.is_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("create {}", data_dir.display()))?;

    let config_path = data_dir.join("config.toml");
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("write {}", config_path.display()))?;
    }

    // Opening runs the migrations, so the workspace is usable immediately.
    let cfg = Config::load(root)?;
    SqliteStore::open(&cfg.db_path(root))?;

    let message = if already {
        format!("docket workspace already initialized at {}", root.display())
    } else {
        format!("initialized docket workspace at {}", root.display())
    };
    render_success(output, &message)
}
