//! Domain types: tasks, projects, activity entries, and acting users.
//!
//! Enumerated fields are validated once at this boundary (`FromStr` with
//! trim + lowercase normalization); everything past it works with typed
//! values.

pub mod activity;
pub mod actor;
pub mod project;
pub mod task;

pub use activity::{ActivityEntry, ActivityKind};
pub use actor::{Actor, Role};
pub use project::Project;
pub use task::{Patch, Priority, Status, Task, TaskDraft, TaskPatch};

#[cfg(test)]
pub(crate) fn test_task(id: &str, project_id: &str, title: &str) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        status: Status::default(),
        priority: Priority::default(),
        assignee_email: None,
        due_date: None,
        created_at: chrono::Utc::now(),
        updated_at: chrono::Utc::now(),
    }
}
