//! `dk show` — show one task.

use clap::Args;
use docket_core::Tracker;
use docket_core::store::Store;

use crate::cmd::write_task;
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Task id.
    pub id: String,
}

pub fn run_show<S: Store>(
    args: &ShowArgs,
    tracker: &Tracker<S>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let task = tracker.get_task(&args.id)?;
    render(output, &task, |t, w| write_task(w, t))
}
