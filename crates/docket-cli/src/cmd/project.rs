//! `dk project` — project management subcommands.

use clap::{Args, Subcommand};
use docket_core::Tracker;
use docket_core::model::Actor;
use docket_core::store::Store;

use crate::output::{OutputMode, kv, render, render_success};

#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// Create a project.
    Add {
        /// Project name.
        name: String,
    },
    /// List projects, newest first.
    List,
    /// Rename a project.
    Rename {
        /// Project id.
        id: String,
        /// New name.
        name: String,
    },
    /// Delete a project and all of its tasks.
    Rm {
        /// Project id.
        id: String,
    },
}

pub fn run_project<S: Store>(
    args: &ProjectArgs,
    tracker: &mut Tracker<S>,
    actor: Option<&Actor>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let require_actor = || actor.ok_or_else(|| anyhow::anyhow!("actor identity required"));
    match &args.command {
        ProjectCommand::Add { name } => {
            let project = tracker.create_project(name, require_actor()?)?;
            render(output, &project, |p, w| {
                kv(w, "id", &p.id)?;
                kv(w, "name", &p.name)
            })
        }
        ProjectCommand::List => {
            let projects = tracker.list_projects()?;
            render(output, &projects, |projects, w| {
                if projects.is_empty() {
                    writeln!(w, "no projects")?;
                }
                for project in projects {
                    writeln!(w, "{:<16} {}", project.id, project.name)?;
                }
                Ok(())
            })
        }
        ProjectCommand::Rename { id, name } => {
            let project = tracker.rename_project(id, name, require_actor()?)?;
            render(output, &project, |p, w| {
                kv(w, "id", &p.id)?;
                kv(w, "name", &p.name)
            })
        }
        ProjectCommand::Rm { id } => {
            tracker.remove_project(id, require_actor()?)?;
            render_success(output, &format!("removed {id} and its tasks"))
        }
    }
}
