//! `dk rm` — delete a task (its activity trail goes with it).

use clap::Args;
use docket_core::Tracker;
use docket_core::model::Actor;
use docket_core::store::Store;

use crate::output::{OutputMode, render_success};

#[derive(Args, Debug)]
pub struct RmArgs {
    /// Task id.
    pub id: String,
}

pub fn run_rm<S: Store>(
    args: &RmArgs,
    tracker: &mut Tracker<S>,
    actor: &Actor,
    output: OutputMode,
) -> anyhow::Result<()> {
    tracker.remove_task(&args.id, actor)?;
    render_success(output, &format!("removed {}", args.id))
}
