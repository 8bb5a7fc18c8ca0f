//! SQLite-backed [`Store`].
//!
//! Runtime defaults are intentionally conservative:
//! - `journal_mode = WAL` to allow concurrent readers while a writer appends
//! - `busy_timeout = 5s` to reduce transient lock failures under contention
//! - `foreign_keys = ON` so task/activity cascades hold at the schema level

pub mod migrations;
pub mod schema;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter, types::ToSql};
use std::str::FromStr;
use std::{path::Path, time::Duration};

use crate::error::{Error, Result};
use crate::model::{ActivityEntry, ActivityKind, Priority, Project, Status, Task, TaskPatch};
use crate::query::TaskFilter;
use crate::store::Store;

/// Busy timeout used for all connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const TASK_COLUMNS: &str = "id, project_id, title, status, priority, \
     assignee_email, due_date, created_at, updated_at";

/// Durable [`Store`] over a single SQLite file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, apply runtime pragmas, and
    /// migrate the schema to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if opening, configuring, or migrating fails.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(anyhow!("create database directory {}: {e}", parent.display()))
            })?;
        }

        let mut conn = Connection::open(path)
            .map_err(|e| Error::Storage(anyhow!("open database {}: {e}", path.display())))?;
        configure_connection(&conn)?;
        migrations::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened sqlite store");
        Ok(Self { conn })
    }

    /// In-memory database with the full schema, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if configuring or migrating fails.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        configure_connection(&conn)?;
        migrations::migrate(&mut conn)?;
        Ok(Self { conn })
    }

    /// Borrow the underlying connection (diagnostics and tests).
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

fn ts_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn corrupt(column: &str, value: &str) -> Error {
    Error::Storage(anyhow!("corrupt {column} value in database: '{value}'"))
}

fn parse_ts(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| corrupt(column, raw))
}

/// Raw task row as stored; conversion to the typed model happens outside
/// the rusqlite row closure so failures surface as core errors.
struct TaskRow {
    id: String,
    project_id: String,
    title: String,
    status: String,
    priority: String,
    assignee_email: Option<String>,
    due_date: Option<String>,
    created_at: String,
    updated_at: String,
}

fn read_task_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        status: row.get(3)?,
        priority: row.get(4)?,
        assignee_email: row.get(5)?,
        due_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let status = Status::from_str(&self.status).map_err(|_| corrupt("status", &self.status))?;
        let priority =
            Priority::from_str(&self.priority).map_err(|_| corrupt("priority", &self.priority))?;
        let due_date = self
            .due_date
            .as_deref()
            .map(|raw| NaiveDate::from_str(raw).map_err(|_| corrupt("due_date", raw)))
            .transpose()?;
        Ok(Task {
            created_at: parse_ts("created_at", &self.created_at)?,
            updated_at: parse_ts("updated_at", &self.updated_at)?,
            id: self.id,
            project_id: self.project_id,
            title: self.title,
            status,
            priority,
            assignee_email: self.assignee_email,
            due_date,
        })
    }
}

fn read_activity_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String, String)>
{
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn into_activity(
    (id, task_id, kind, actor, ts): (String, String, String, String, String),
) -> Result<ActivityEntry> {
    Ok(ActivityEntry {
        kind: ActivityKind::from_str(&kind).map_err(|_| corrupt("kind", &kind))?,
        ts: parse_ts("ts", &ts)?,
        id,
        task_id,
        actor,
    })
}

fn read_project_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_project((id, name, created_at): (String, String, String)) -> Result<Project> {
    Ok(Project {
        created_at: parse_ts("created_at", &created_at)?,
        id,
        name,
    })
}

/// Build the WHERE conditions shared by `list_tasks` and `count_tasks`.
fn filter_conditions(
    project_id: &str,
    filter: &TaskFilter,
) -> (Vec<String>, Vec<Box<dyn ToSql>>) {
    let mut conditions = vec!["project_id = ?1".to_string()];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(project_id.to_string())];

    if let Some(status) = filter.status {
        params.push(Box::new(status.as_str()));
        conditions.push(format!("status = ?{}", params.len()));
    }
    if let Some(priority) = filter.priority {
        params.push(Box::new(priority.as_str()));
        conditions.push(format!("priority = ?{}", params.len()));
    }
    if let Some(ref email) = filter.assignee_email {
        params.push(Box::new(email.clone()));
        conditions.push(format!("assignee_email = ?{}", params.len()));
    }

    (conditions, params)
}

impl Store for SqliteStore {
    fn list_tasks(&self, project_id: &str, filter: &TaskFilter) -> Result<Vec<Task>> {
        let (conditions, param_values) = filter_conditions(project_id, filter);

        let limit_clause = match (filter.limit, filter.offset) {
            (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
            (Some(limit), None) => format!(" LIMIT {limit}"),
            (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
            (None, None) => String::new(),
        };

        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE {} {}{limit_clause}",
            conditions.join(" AND "),
            filter.sort.sql_clause(),
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(AsRef::as_ref).collect();
        let rows = stmt.query_map(params_from_iter(params_ref), read_task_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_task()?);
        }
        Ok(tasks)
    }

    fn count_tasks(&self, project_id: &str, filter: &TaskFilter) -> Result<u64> {
        let (conditions, param_values) = filter_conditions(project_id, filter);
        let sql = format!(
            "SELECT COUNT(*) FROM tasks WHERE {}",
            conditions.join(" AND ")
        );

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(AsRef::as_ref).collect();
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params_ref), |row| row.get(0))?;
        u64::try_from(count).map_err(|_| Error::Storage(anyhow!("negative task count")))
    }

    fn get_task(&self, id: &str) -> Result<Option<Task>> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![id], read_task_row)
            .optional()?;
        row.map(TaskRow::into_task).transpose()
    }

    fn insert_task(&mut self, task: Task) -> Result<Task> {
        self.conn.execute(
            "INSERT INTO tasks (id, project_id, title, status, priority, \
             assignee_email, due_date, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                task.id,
                task.project_id,
                task.title,
                task.status.as_str(),
                task.priority.as_str(),
                task.assignee_email,
                task.due_date.map(|d| d.to_string()),
                ts_text(task.created_at),
                ts_text(task.updated_at),
            ],
        )?;
        Ok(task)
    }

    fn patch_task(
        &mut self,
        id: &str,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Task>> {
        let Some(mut task) = self.get_task(id)? else {
            return Ok(None);
        };
        patch.apply_to(&mut task);
        task.updated_at = updated_at;

        self.conn.execute(
            "UPDATE tasks SET title = ?2, status = ?3, priority = ?4, \
             assignee_email = ?5, due_date = ?6, updated_at = ?7 \
             WHERE id = ?1",
            params![
                id,
                task.title,
                task.status.as_str(),
                task.priority.as_str(),
                task.assignee_email,
                task.due_date.map(|d| d.to_string()),
                ts_text(task.updated_at),
            ],
        )?;
        Ok(Some(task))
    }

    fn delete_task(&mut self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn append_activity(&mut self, entry: ActivityEntry) -> Result<ActivityEntry> {
        self.conn.execute(
            "INSERT INTO activity_log (id, task_id, kind, actor, ts) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id,
                entry.task_id,
                entry.kind.as_str(),
                entry.actor,
                ts_text(entry.ts),
            ],
        )?;
        Ok(entry)
    }

    fn activity_for_task(&self, task_id: &str) -> Result<Vec<ActivityEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, kind, actor, ts FROM activity_log \
             WHERE task_id = ?1 ORDER BY ts DESC, id ASC",
        )?;
        let rows = stmt.query_map(params![task_id], read_activity_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(into_activity(row?)?);
        }
        Ok(entries)
    }

    fn delete_activity_for_task(&mut self, task_id: &str) -> Result<()> {
        self.conn.execute(
            "DELETE FROM activity_log WHERE task_id = ?1",
            params![task_id],
        )?;
        Ok(())
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at FROM projects ORDER BY created_at DESC, id ASC",
        )?;
        let rows = stmt.query_map([], read_project_row)?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(into_project(row?)?);
        }
        Ok(projects)
    }

    fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM projects WHERE id = ?1",
                params![id],
                read_project_row,
            )
            .optional()?;
        row.map(into_project).transpose()
    }

    fn insert_project(&mut self, project: Project) -> Result<Project> {
        self.conn.execute(
            "INSERT INTO projects (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![project.id, project.name, ts_text(project.created_at)],
        )?;
        Ok(project)
    }

    fn rename_project(&mut self, id: &str, name: &str) -> Result<Option<Project>> {
        let updated = self.conn.execute(
            "UPDATE projects SET name = ?2 WHERE id = ?1",
            params![id, name],
        )?;
        if updated == 0 {
            return Ok(None);
        }
        self.get_project(id)
    }

    fn delete_project(&mut self, id: &str) -> Result<bool> {
        // FK cascades remove the project's tasks and their activity.
        let deleted = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(error) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BUSY_TIMEOUT, SqliteStore};
    use crate::error::Error;
    use crate::model::test_task;
    use crate::query::TaskFilter;
    use crate::store::Store;
    use chrono::Utc;
    use tempfile::TempDir;

    fn temp_db() -> (TempDir, SqliteStore) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let store = SqliteStore::open(&dir.path().join("docket.sqlite3")).expect("open store");
        (dir, store)
    }

    fn seeded(store: &mut SqliteStore) {
        store
            .insert_project(crate::model::Project {
                id: "prj-p".to_string(),
                name: "p".to_string(),
                created_at: Utc::now(),
            })
            .expect("insert project");
    }

    #[test]
    fn open_sets_wal_busy_timeout_and_fk() {
        let (_dir, store) = temp_db();
        let conn = store.connection();

        let journal_mode: String = conn
            .pragma_query_value(None, "journal_mode", |row| row.get(0))
            .expect("query journal_mode");
        assert_eq!(journal_mode.to_ascii_lowercase(), "wal");

        let busy_timeout_ms: u64 = conn
            .pragma_query_value(None, "busy_timeout", |row| row.get(0))
            .expect("query busy_timeout");
        assert_eq!(u128::from(busy_timeout_ms), DEFAULT_BUSY_TIMEOUT.as_millis());

        let foreign_keys: i64 = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .expect("query foreign_keys");
        assert_eq!(foreign_keys, 1);
    }

    #[test]
    fn task_roundtrip_preserves_every_field() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        seeded(&mut store);

        let mut task = test_task("tsk-abcdefghij", "prj-p", "roundtrip");
        task.assignee_email = Some("dev@test.io".to_string());
        task.due_date = chrono::NaiveDate::from_ymd_opt(2025, 1, 15);
        store.insert_task(task.clone()).expect("insert");

        let fetched = store.get_task("tsk-abcdefghij").expect("get").expect("some");
        // RFC 3339 micros storage truncates sub-microsecond precision.
        assert_eq!(fetched.id, task.id);
        assert_eq!(fetched.title, task.title);
        assert_eq!(fetched.assignee_email, task.assignee_email);
        assert_eq!(fetched.due_date, task.due_date);
        assert_eq!(
            fetched.created_at.timestamp_micros(),
            task.created_at.timestamp_micros()
        );
    }

    #[test]
    fn transaction_rolls_back_on_error() {
        let mut store = SqliteStore::open_in_memory().expect("open");
        seeded(&mut store);

        let result: Result<(), Error> = store.transaction(|s| {
            s.insert_task(test_task("tsk-doomed0000", "prj-p", "doomed"))?;
            Err(Error::invalid("abort"))
        });
        assert!(result.is_err());
        assert_eq!(
            store.count_tasks("prj-p", &TaskFilter::default()).expect("count"),
            0
        );
    }
}
