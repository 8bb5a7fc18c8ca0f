//! Canonical SQLite schema for the docket database.
//!
//! Normalized for queryability:
//! - `projects` owns `tasks` (FK cascade)
//! - `tasks` keeps the latest field values for each task
//! - `activity_log` is the append-only audit trail, cascading with its task
//!
//! Enumerated columns carry CHECK constraints mirroring the model enums, so
//! a corrupt writer cannot smuggle in values the code would refuse to parse.
//! Timestamps are RFC 3339 UTC text, due dates ISO-8601 dates; both orders
//! lexicographically.

/// Migration v1: core tables.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY CHECK (id LIKE 'prj-%'),
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY CHECK (id LIKE 'tsk-%'),
    project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    status TEXT NOT NULL DEFAULT 'todo' CHECK (status IN ('todo', 'in_progress', 'done')),
    priority TEXT NOT NULL DEFAULT 'med' CHECK (priority IN ('low', 'med', 'high')),
    assignee_email TEXT,
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS activity_log (
    id TEXT PRIMARY KEY CHECK (id LIKE 'act-%'),
    task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('create', 'update', 'delete')),
    actor TEXT NOT NULL CHECK (length(trim(actor)) > 0),
    ts TEXT NOT NULL
);
";

/// Migration v2: read-path indexes for the listing contract.
pub const MIGRATION_V2_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_tasks_project_status
    ON tasks(project_id, status);

CREATE INDEX IF NOT EXISTS idx_tasks_project_priority
    ON tasks(project_id, priority);

CREATE INDEX IF NOT EXISTS idx_tasks_project_due
    ON tasks(project_id, due_date DESC);

CREATE INDEX IF NOT EXISTS idx_activity_task_ts
    ON activity_log(task_id, ts DESC);

CREATE INDEX IF NOT EXISTS idx_projects_created
    ON projects(created_at DESC);
";
