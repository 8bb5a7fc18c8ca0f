//! `dk log` — show a task's activity trail, newest first.

use clap::Args;
use docket_core::Tracker;
use docket_core::store::Store;

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Task id.
    pub task: String,
}

pub fn run_log<S: Store>(
    args: &LogArgs,
    tracker: &Tracker<S>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let entries = tracker.task_activity(&args.task)?;
    render(output, &entries, |entries, w| {
        if entries.is_empty() {
            writeln!(w, "no activity")?;
        }
        for entry in entries {
            writeln!(
                w,
                "{}  {:<6}  by {}",
                entry.ts.to_rfc3339(),
                entry.kind,
                entry.actor,
            )?;
        }
        Ok(())
    })
}
