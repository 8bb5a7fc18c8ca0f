//! Storage abstraction for tasks, projects, and the activity log.
//!
//! The tracker is written against the [`Store`] trait so the query contract
//! can be exercised without I/O ([`MemStore`]) while production runs on
//! SQLite ([`SqliteStore`]). Both backends must order listings identically;
//! the shared sort definition lives in [`crate::query::SortSpec`].

pub mod memory;
pub mod sqlite;

pub use memory::MemStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{ActivityEntry, Project, Task, TaskPatch};
use crate::query::TaskFilter;

/// Persistence operations the tracker needs.
///
/// Mutating methods are plain single-row primitives; atomicity across a
/// mutation and its paired activity write comes from [`Store::transaction`].
pub trait Store {
    /// Tasks of `project_id` matching `filter`, in `filter.sort` order,
    /// sliced by `filter.limit`/`filter.offset`.
    fn list_tasks(&self, project_id: &str, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Count of tasks matching `filter`, ignoring limit/offset.
    fn count_tasks(&self, project_id: &str, filter: &TaskFilter) -> Result<u64>;

    fn get_task(&self, id: &str) -> Result<Option<Task>>;

    fn insert_task(&mut self, task: Task) -> Result<Task>;

    /// Apply `patch` to the stored task, stamping `updated_at`. Returns
    /// `None` when the task does not exist.
    fn patch_task(
        &mut self,
        id: &str,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Task>>;

    /// Returns whether a row was deleted.
    fn delete_task(&mut self, id: &str) -> Result<bool>;

    fn append_activity(&mut self, entry: ActivityEntry) -> Result<ActivityEntry>;

    /// Activity entries for a task, newest first.
    fn activity_for_task(&self, task_id: &str) -> Result<Vec<ActivityEntry>>;

    fn delete_activity_for_task(&mut self, task_id: &str) -> Result<()>;

    /// Projects, newest first.
    fn list_projects(&self) -> Result<Vec<Project>>;

    fn get_project(&self, id: &str) -> Result<Option<Project>>;

    fn insert_project(&mut self, project: Project) -> Result<Project>;

    /// Returns `None` when the project does not exist.
    fn rename_project(&mut self, id: &str, name: &str) -> Result<Option<Project>>;

    /// Delete a project and cascade its tasks and their activity. Returns
    /// whether the project existed.
    fn delete_project(&mut self, id: &str) -> Result<bool>;

    /// Run `f` atomically: when it returns `Err`, every store effect made
    /// inside is rolled back.
    fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T>
    where
        Self: Sized;
}
