//! The operations surface: project/task CRUD with an audited mutation trail.
//!
//! Every mutating call takes an explicit [`Actor`] and pairs its store write
//! with exactly one activity entry inside one store transaction, so the
//! mutation and its audit record land together or not at all. The contract:
//!
//! - `create` and `remove` always produce one entry of the matching kind
//! - `update` produces one entry when at least one field changes — a change
//!   to the assignee alone included — and none for a no-op patch
//! - `remove` appends its `delete` entry first, then cascades the task's
//!   activity away with the task; the entry is a synchronous notification,
//!   not retained history

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::id;
use crate::model::{
    ActivityEntry, ActivityKind, Actor, Project, Task, TaskDraft, TaskPatch, project, task,
};
use crate::query::{Page, TaskQuery};
use crate::store::Store;

/// Task tracker over an injected [`Store`].
#[derive(Debug)]
pub struct Tracker<S: Store> {
    store: S,
}

impl<S: Store> Tracker<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the tracker, returning the store (tests, maintenance).
    pub fn into_store(self) -> S {
        self.store
    }

    fn activity(task_id: &str, kind: ActivityKind, actor: &Actor) -> ActivityEntry {
        ActivityEntry {
            id: id::new_id(id::ACTIVITY),
            task_id: task_id.to_string(),
            kind,
            actor: actor.id.clone(),
            ts: Utc::now(),
        }
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// List a project's tasks: validated filters, sorted, paginated.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for any out-of-domain parameter (see
    /// [`TaskQuery::plan`]); storage failures pass through.
    pub fn list_tasks(&self, project_id: &str, query: &TaskQuery) -> Result<Page<Task>> {
        let plan = query.plan()?;
        let items = self.store.list_tasks(project_id, &plan.filter)?;
        let total = self.store.count_tasks(project_id, &plan.filter)?;
        debug_assert!(items.len() as u64 <= u64::from(plan.size));
        Ok(Page {
            items,
            page: plan.page,
            size: plan.size,
            total,
        })
    }

    /// # Errors
    ///
    /// `NotFound` when no task has this id.
    pub fn get_task(&self, id: &str) -> Result<Task> {
        self.store
            .get_task(id)?
            .ok_or_else(|| Error::not_found("task", id))
    }

    /// Create a task in `project_id` and record one `create` entry.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project; `InvalidInput` for a blank title
    /// or malformed assignee email.
    pub fn create_task(&mut self, project_id: &str, draft: &TaskDraft, actor: &Actor) -> Result<Task> {
        if self.store.get_project(project_id)?.is_none() {
            return Err(Error::not_found("project", project_id));
        }
        let title = task::normalize_title(&draft.title)?;
        if let Some(email) = draft.assignee_email.as_deref() {
            task::validate_email(email)?;
        }

        let now = Utc::now();
        let new_task = Task {
            id: id::new_id(id::TASK),
            project_id: project_id.to_string(),
            title,
            status: draft.status.unwrap_or_default(),
            priority: draft.priority.unwrap_or_default(),
            assignee_email: draft.assignee_email.clone(),
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };

        let created = self.store.transaction(|store| {
            let created = store.insert_task(new_task.clone())?;
            store.append_activity(Self::activity(&created.id, ActivityKind::Create, actor))?;
            Ok(created)
        })?;
        info!(task = %created.id, project = %project_id, actor = %actor.id, "task created");
        Ok(created)
    }

    /// Apply a partial update and record one `update` entry when anything
    /// changed. A patch that changes nothing writes nothing.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown task; `InvalidInput` for a blank title or
    /// malformed assignee email in the patch.
    pub fn update_task(&mut self, id: &str, patch: &TaskPatch, actor: &Actor) -> Result<Task> {
        let current = self.get_task(id)?;

        let mut patch = patch.clone();
        if let Some(title) = patch.title.take() {
            patch.title = Some(task::normalize_title(&title)?);
        }
        if let crate::model::Patch::Set(email) = &patch.assignee_email {
            task::validate_email(email)?;
        }

        if !patch.changes(&current) {
            debug!(task = %id, "update changed nothing, skipping audit entry");
            return Ok(current);
        }

        let updated = self.store.transaction(|store| {
            let updated = store
                .patch_task(id, &patch, Utc::now())?
                .ok_or_else(|| Error::not_found("task", id))?;
            store.append_activity(Self::activity(id, ActivityKind::Update, actor))?;
            Ok(updated)
        })?;
        info!(task = %id, actor = %actor.id, "task updated");
        Ok(updated)
    }

    /// Delete a task: append the transient `delete` entry, then cascade the
    /// task's activity and the task itself, atomically.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown task.
    pub fn remove_task(&mut self, id: &str, actor: &Actor) -> Result<()> {
        self.get_task(id)?;

        self.store.transaction(|store| {
            // The delete entry exists only for audit sinks observing the
            // transaction; the cascade below removes it with the rest.
            store.append_activity(Self::activity(id, ActivityKind::Delete, actor))?;
            store.delete_activity_for_task(id)?;
            if !store.delete_task(id)? {
                return Err(Error::not_found("task", id));
            }
            Ok(())
        })?;
        info!(task = %id, actor = %actor.id, "task removed");
        Ok(())
    }

    /// Activity trail for a task, newest first.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown task.
    pub fn task_activity(&self, task_id: &str) -> Result<Vec<ActivityEntry>> {
        self.get_task(task_id)?;
        self.store.activity_for_task(task_id)
    }

    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    /// All projects, newest first.
    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.store.list_projects()
    }

    /// # Errors
    ///
    /// `NotFound` when no project has this id.
    pub fn get_project(&self, id: &str) -> Result<Project> {
        self.store
            .get_project(id)?
            .ok_or_else(|| Error::not_found("project", id))
    }

    /// # Errors
    ///
    /// `InvalidInput` for a blank name.
    pub fn create_project(&mut self, name: &str, actor: &Actor) -> Result<Project> {
        let name = project::normalize_name(name)?;
        let created = self.store.insert_project(Project {
            id: id::new_id(id::PROJECT),
            name,
            created_at: Utc::now(),
        })?;
        info!(project = %created.id, actor = %actor.id, "project created");
        Ok(created)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown project; `InvalidInput` for a blank name.
    pub fn rename_project(&mut self, id: &str, name: &str, actor: &Actor) -> Result<Project> {
        let name = project::normalize_name(name)?;
        let renamed = self
            .store
            .rename_project(id, &name)?
            .ok_or_else(|| Error::not_found("project", id))?;
        info!(project = %id, actor = %actor.id, "project renamed");
        Ok(renamed)
    }

    /// Delete a project, cascading its tasks and their activity.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown project.
    pub fn remove_project(&mut self, id: &str, actor: &Actor) -> Result<()> {
        let deleted = self
            .store
            .transaction(|store| store.delete_project(id))?;
        if !deleted {
            return Err(Error::not_found("project", id));
        }
        info!(project = %id, actor = %actor.id, "project removed");
        Ok(())
    }
}
