//! In-memory store: the unit-test fake and reference behavior for the
//! listing contract. No I/O, transaction = snapshot/restore.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::model::{ActivityEntry, Project, Task, TaskPatch};
use crate::query::TaskFilter;
use crate::store::Store;

#[derive(Debug, Clone, Default)]
struct MemState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    activity: Vec<ActivityEntry>,
}

/// Heap-backed [`Store`] with the same observable semantics as the SQLite
/// backend.
#[derive(Debug, Default)]
pub struct MemStore {
    state: MemState,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(task: &Task, project_id: &str, filter: &TaskFilter) -> bool {
    task.project_id == project_id
        && filter.status.is_none_or(|s| task.status == s)
        && filter.priority.is_none_or(|p| task.priority == p)
        && filter
            .assignee_email
            .as_deref()
            .is_none_or(|email| task.assignee_email.as_deref() == Some(email))
}

impl Store for MemStore {
    fn list_tasks(&self, project_id: &str, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .state
            .tasks
            .iter()
            .filter(|t| matches(t, project_id, filter))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| filter.sort.compare(a, b));

        let offset = filter.offset.unwrap_or(0) as usize;
        let limit = filter.limit.map_or(usize::MAX, |l| l as usize);
        Ok(tasks.into_iter().skip(offset).take(limit).collect())
    }

    fn count_tasks(&self, project_id: &str, filter: &TaskFilter) -> Result<u64> {
        let count = self
            .state
            .tasks
            .iter()
            .filter(|t| matches(t, project_id, filter))
            .count();
        Ok(count as u64)
    }

    fn get_task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.state.tasks.iter().find(|t| t.id == id).cloned())
    }

    fn insert_task(&mut self, task: Task) -> Result<Task> {
        self.state.tasks.push(task.clone());
        Ok(task)
    }

    fn patch_task(
        &mut self,
        id: &str,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Task>> {
        let Some(task) = self.state.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply_to(task);
        task.updated_at = updated_at;
        Ok(Some(task.clone()))
    }

    fn delete_task(&mut self, id: &str) -> Result<bool> {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        Ok(self.state.tasks.len() < before)
    }

    fn append_activity(&mut self, entry: ActivityEntry) -> Result<ActivityEntry> {
        self.state.activity.push(entry.clone());
        Ok(entry)
    }

    fn activity_for_task(&self, task_id: &str) -> Result<Vec<ActivityEntry>> {
        let mut entries: Vec<ActivityEntry> = self
            .state
            .activity
            .iter()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.ts.cmp(&a.ts).then_with(|| a.id.cmp(&b.id)));
        Ok(entries)
    }

    fn delete_activity_for_task(&mut self, task_id: &str) -> Result<()> {
        self.state.activity.retain(|e| e.task_id != task_id);
        Ok(())
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut projects = self.state.projects.clone();
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(projects)
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.state.projects.iter().find(|p| p.id == id).cloned())
    }

    fn insert_project(&mut self, project: Project) -> Result<Project> {
        self.state.projects.push(project.clone());
        Ok(project)
    }

    fn rename_project(&mut self, id: &str, name: &str) -> Result<Option<Project>> {
        let Some(project) = self.state.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        project.name = name.to_string();
        Ok(Some(project.clone()))
    }

    fn delete_project(&mut self, id: &str) -> Result<bool> {
        let before = self.state.projects.len();
        self.state.projects.retain(|p| p.id != id);
        if self.state.projects.len() == before {
            return Ok(false);
        }

        let orphaned: Vec<String> = self
            .state
            .tasks
            .iter()
            .filter(|t| t.project_id == id)
            .map(|t| t.id.clone())
            .collect();
        self.state.tasks.retain(|t| t.project_id != id);
        self.state
            .activity
            .retain(|e| !orphaned.contains(&e.task_id));
        Ok(true)
    }

    fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.state.clone();
        match f(self) {
            Ok(value) => Ok(value),
            Err(error) => {
                self.state = snapshot;
                Err(error)
            }
        }
    }
}
