#![forbid(unsafe_code)]

mod actor;
mod cmd;
mod output;

use clap::{Parser, Subcommand};
use output::OutputMode;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "docket: project/task tracker with an audited mutation trail",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential logging.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Acting user id recorded on the audit trail.
    #[arg(long, global = true)]
    actor: Option<String>,

    /// Acting user role: admin, member, or viewer.
    #[arg(long, global = true)]
    role: Option<String>,

    /// Workspace directory (default: walk up from the cwd for `.docket/`).
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn require_actor(&self) -> anyhow::Result<docket_core::model::Actor> {
        actor::require_actor(self.actor.as_deref(), self.role.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Initialize a docket workspace in the current directory")]
    Init(cmd::init::InitArgs),

    #[command(about = "Manage projects")]
    Project(cmd::project::ProjectArgs),

    #[command(
        about = "Create a task",
        after_help = "EXAMPLES:\n    dk add --project prj-abc --title \"Fix login timeout\" --priority high\n    dk add --project prj-abc --title \"Ship v2\" --due 2026-01-31 --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        about = "List a project's tasks",
        after_help = "EXAMPLES:\n    dk list --project prj-abc --status todo --priority high\n    dk list --project prj-abc --page 2 -n 20 --sort title --order asc --json"
    )]
    List(cmd::list::ListArgs),

    #[command(about = "Show one task")]
    Show(cmd::show::ShowArgs),

    #[command(
        about = "Update task fields",
        after_help = "EXAMPLES:\n    dk update tsk-abc --status done\n    dk update tsk-abc --assignee qa@test.io\n    dk update tsk-abc --clear-due"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(about = "Delete a task and its activity trail")]
    Rm(cmd::rm::RmArgs),

    #[command(about = "Show a task's activity trail")]
    Log(cmd::log::LogArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("DOCKET_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mode = cli.output_mode();

    if let Commands::Init(args) = &cli.command {
        let root = match &cli.dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        return cmd::init::run_init(args, mode, &root);
    }

    let root = cmd::workspace_root(cli.dir.as_deref())?;
    let (mut tracker, config) = cmd::open_tracker(&root)?;

    match &cli.command {
        Commands::Init(_) => unreachable!("handled above"),
        Commands::Project(args) => {
            // `project list` is read-only and works without an identity.
            let actor = match &args.command {
                cmd::project::ProjectCommand::List => None,
                _ => Some(cli.require_actor()?),
            };
            cmd::project::run_project(args, &mut tracker, actor.as_ref(), mode)
        }
        Commands::Add(args) => {
            let actor = cli.require_actor()?;
            cmd::add::run_add(args, &mut tracker, &actor, mode)
        }
        Commands::List(args) => cmd::list::run_list(args, &tracker, config.page_size, mode),
        Commands::Show(args) => cmd::show::run_show(args, &tracker, mode),
        Commands::Update(args) => {
            let actor = cli.require_actor()?;
            cmd::update::run_update(args, &mut tracker, &actor, mode)
        }
        Commands::Rm(args) => {
            let actor = cli.require_actor()?;
            cmd::rm::run_rm(args, &mut tracker, &actor, mode)
        }
        Commands::Log(args) => cmd::log::run_log(args, &tracker, mode),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    if let Err(error) = run(&cli) {
        let code = error
            .downcast_ref::<docket_core::Error>()
            .map_or("E9001", docket_core::Error::code);
        output::render_error(cli.output_mode(), code, &format!("{error:#}"));
        std::process::exit(1);
    }
}
