//! `dk list` — list a project's tasks with filtering and pagination.

use clap::Args;
use docket_core::Tracker;
use docket_core::query::TaskQuery;
use docket_core::store::Store;

use crate::output::OutputMode;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Project id to list.
    #[arg(short, long)]
    pub project: String,

    /// Filter by status: todo, in_progress, done.
    #[arg(short, long)]
    pub status: Option<String>,

    /// Filter by priority: low, med, high.
    #[arg(long)]
    pub priority: Option<String>,

    /// Filter by assignee email.
    #[arg(short, long)]
    pub assignee: Option<String>,

    /// Page number (1-based).
    #[arg(long)]
    pub page: Option<i64>,

    /// Page size (positive; default from config).
    #[arg(short = 'n', long)]
    pub size: Option<i64>,

    /// Sort field: due_date, created_at, updated_at, title, priority, status.
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order: asc or desc.
    #[arg(long)]
    pub order: Option<String>,
}

pub fn run_list<S: Store>(
    args: &ListArgs,
    tracker: &Tracker<S>,
    default_size: u32,
    output: OutputMode,
) -> anyhow::Result<()> {
    let query = TaskQuery {
        status: args.status.clone(),
        priority: args.priority.clone(),
        assignee_email: args.assignee.clone(),
        page: args.page,
        size: args.size.or(Some(i64::from(default_size))),
        sort_by: args.sort.clone(),
        order: args.order.clone(),
    };

    let result = tracker.list_tasks(&args.project, &query)?;
    crate::output::render(output, &result, |page, w| {
        if page.items.is_empty() {
            writeln!(w, "no tasks match")?;
        }
        for task in &page.items {
            writeln!(
                w,
                "{:<16} {:<5} {:<12} {:<11} {}",
                task.id,
                task.priority,
                task.status,
                task.due_date
                    .map_or_else(|| "-".to_string(), |d| d.to_string()),
                task.title,
            )?;
        }
        writeln!(
            w,
            "page {} of {} ({} total)",
            page.page,
            page.total.div_ceil(u64::from(page.size)).max(1),
            page.total,
        )
    })
}
