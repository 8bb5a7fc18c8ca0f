//! `dk update` — apply a partial update to a task.

use clap::Args;
use docket_core::Tracker;
use docket_core::model::{Actor, Patch, Priority, Status, TaskPatch};
use docket_core::store::Store;
use std::str::FromStr;

use crate::cmd::{parse_due, write_task};
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Task id.
    pub id: String,

    /// New title.
    #[arg(short, long)]
    pub title: Option<String>,

    /// New status: todo, in_progress, or done.
    #[arg(short, long)]
    pub status: Option<String>,

    /// New priority: low, med, or high.
    #[arg(long)]
    pub priority: Option<String>,

    /// New assignee email.
    #[arg(short, long, conflicts_with = "clear_assignee")]
    pub assignee: Option<String>,

    /// Remove the assignee.
    #[arg(long)]
    pub clear_assignee: bool,

    /// New due date, YYYY-MM-DD.
    #[arg(short, long, conflicts_with = "clear_due")]
    pub due: Option<String>,

    /// Remove the due date.
    #[arg(long)]
    pub clear_due: bool,
}

impl UpdateArgs {
    fn patch(&self) -> anyhow::Result<TaskPatch> {
        let assignee_email = if self.clear_assignee {
            Patch::Clear
        } else {
            self.assignee
                .clone()
                .map_or(Patch::Keep, Patch::Set)
        };
        let due_date = if self.clear_due {
            Patch::Clear
        } else {
            match self.due.as_deref() {
                Some(raw) => Patch::Set(parse_due(raw)?),
                None => Patch::Keep,
            }
        };
        Ok(TaskPatch {
            title: self.title.clone(),
            status: self.status.as_deref().map(Status::from_str).transpose()?,
            priority: self
                .priority
                .as_deref()
                .map(Priority::from_str)
                .transpose()?,
            assignee_email,
            due_date,
        })
    }
}

pub fn run_update<S: Store>(
    args: &UpdateArgs,
    tracker: &mut Tracker<S>,
    actor: &Actor,
    output: OutputMode,
) -> anyhow::Result<()> {
    let patch = args.patch()?;
    let task = tracker.update_task(&args.id, &patch, actor)?;
    render(output, &task, |t, w| write_task(w, t))
}

#[cfg(test)]
mod tests {
    use super::UpdateArgs;
    use docket_core::model::Patch;

    #[test]
    fn clear_flags_build_clearing_patches() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: UpdateArgs,
        }
        let w = Wrapper::parse_from(["test", "tsk-x", "--clear-assignee", "--clear-due"]);
        let patch = w.args.patch().expect("patch");
        assert_eq!(patch.assignee_email, Patch::Clear);
        assert_eq!(patch.due_date, Patch::Clear);
        assert!(patch.title.is_none());
    }

    #[test]
    fn set_and_keep_states() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: UpdateArgs,
        }
        let w = Wrapper::parse_from(["test", "tsk-x", "--assignee", "qa@test.io"]);
        let patch = w.args.patch().expect("patch");
        assert_eq!(patch.assignee_email, Patch::Set("qa@test.io".to_string()));
        assert_eq!(patch.due_date, Patch::Keep);
    }
}
