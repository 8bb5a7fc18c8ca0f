//! `dk add` — create a task in a project.

use clap::Args;
use docket_core::Tracker;
use docket_core::model::{Actor, Priority, Status, TaskDraft};
use docket_core::store::Store;
use std::str::FromStr;

use crate::cmd::{parse_due, write_task};
use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Project id the task belongs to.
    #[arg(short, long)]
    pub project: String,

    /// Title of the new task.
    #[arg(short, long)]
    pub title: String,

    /// Initial status: todo, in_progress, or done (default todo).
    #[arg(short, long)]
    pub status: Option<String>,

    /// Priority: low, med, or high (default med).
    #[arg(long)]
    pub priority: Option<String>,

    /// Assignee email.
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Due date, YYYY-MM-DD.
    #[arg(short, long)]
    pub due: Option<String>,
}

pub fn run_add<S: Store>(
    args: &AddArgs,
    tracker: &mut Tracker<S>,
    actor: &Actor,
    output: OutputMode,
) -> anyhow::Result<()> {
    let draft = TaskDraft {
        title: args.title.clone(),
        status: args.status.as_deref().map(Status::from_str).transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(Priority::from_str)
            .transpose()?,
        assignee_email: args.assignee.clone(),
        due_date: args.due.as_deref().map(parse_due).transpose()?,
    };

    let task = tracker.create_task(&args.project, &draft, actor)?;
    render(output, &task, |t, w| write_task(w, t))
}

#[cfg(test)]
mod tests {
    use super::AddArgs;

    #[test]
    fn add_args_defaults() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AddArgs,
        }
        let w = Wrapper::parse_from(["test", "--project", "prj-x", "--title", "Hello"]);
        assert_eq!(w.args.project, "prj-x");
        assert_eq!(w.args.title, "Hello");
        assert!(w.args.status.is_none());
        assert!(w.args.priority.is_none());
        assert!(w.args.due.is_none());
    }
}
