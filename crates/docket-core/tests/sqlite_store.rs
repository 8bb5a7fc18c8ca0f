//! SQLite backend: contract parity with the in-memory store, plus the
//! cascade and atomicity behavior that only matters with a real database.

use chrono::NaiveDate;
use docket_core::model::{Actor, ActivityKind, Patch, Priority, Role, TaskDraft, TaskPatch};
use docket_core::query::{TaskFilter, TaskQuery};
use docket_core::store::{MemStore, SqliteStore, Store};
use docket_core::{Error, Tracker};

fn actor() -> Actor {
    Actor::new("usr-sqlite", Role::Admin)
}

fn sqlite_tracker() -> (Tracker<SqliteStore>, String) {
    let mut tracker = Tracker::new(SqliteStore::open_in_memory().expect("open sqlite"));
    let project = tracker
        .create_project("SQLite Parity", &actor())
        .expect("create project");
    (tracker, project.id)
}

fn seed_tasks<S: Store>(tracker: &mut Tracker<S>, project: &str) {
    let date = |m: u32, d: u32| NaiveDate::from_ymd_opt(2025, m, d);
    let specs: &[(&str, Option<NaiveDate>, Priority)] = &[
        ("alpha", date(1, 15), Priority::High),
        ("bravo", date(1, 20), Priority::Med),
        ("charlie", None, Priority::Low),
        ("delta", date(3, 2), Priority::High),
        ("echo", date(2, 10), Priority::Med),
    ];
    for (title, due, priority) in specs {
        tracker
            .create_task(
                project,
                &TaskDraft {
                    title: (*title).to_string(),
                    priority: Some(*priority),
                    due_date: *due,
                    ..TaskDraft::default()
                },
                &actor(),
            )
            .expect("seed task");
    }
}

#[test]
fn default_listing_matches_memory_backend_ordering() {
    let (mut sqlite, sqlite_project) = sqlite_tracker();
    seed_tasks(&mut sqlite, &sqlite_project);

    let mut memory = Tracker::new(MemStore::new());
    let memory_project = memory
        .create_project("SQLite Parity", &actor())
        .expect("create project");
    seed_tasks(&mut memory, &memory_project.id);

    for query in [
        TaskQuery::default(),
        TaskQuery {
            sort_by: Some("title".into()),
            ..TaskQuery::default()
        },
        TaskQuery {
            sort_by: Some("priority".into()),
            order: Some("desc".into()),
            ..TaskQuery::default()
        },
        TaskQuery {
            priority: Some("high".into()),
            ..TaskQuery::default()
        },
        TaskQuery {
            page: Some(2),
            size: Some(2),
            ..TaskQuery::default()
        },
    ] {
        let from_sqlite = sqlite
            .list_tasks(&sqlite_project, &query)
            .expect("sqlite list");
        let from_memory = memory
            .list_tasks(&memory_project.id, &query)
            .expect("memory list");

        let sqlite_titles: Vec<String> =
            from_sqlite.items.iter().map(|t| t.title.clone()).collect();
        let memory_titles: Vec<String> =
            from_memory.items.iter().map(|t| t.title.clone()).collect();
        assert_eq!(sqlite_titles, memory_titles, "query {query:?}");
        assert_eq!(from_sqlite.total, from_memory.total, "query {query:?}");
    }
}

#[test]
fn default_sort_scenario_on_sqlite() {
    let (mut tracker, project) = sqlite_tracker();
    seed_tasks(&mut tracker, &project);

    let page = tracker
        .list_tasks(&project, &TaskQuery::default())
        .expect("list");
    let titles: Vec<&str> = page.items.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["delta", "echo", "bravo", "alpha", "charlie"]);
}

#[test]
fn filters_and_pagination_hold_on_sqlite() {
    let (mut tracker, project) = sqlite_tracker();
    seed_tasks(&mut tracker, &project);

    let high = tracker
        .list_tasks(
            &project,
            &TaskQuery {
                priority: Some("high".into()),
                ..TaskQuery::default()
            },
        )
        .expect("list high");
    assert_eq!(high.total, 2);
    assert!(high.items.iter().all(|t| t.priority == Priority::High));

    assert!(matches!(
        tracker.list_tasks(
            &project,
            &TaskQuery {
                size: Some(0),
                ..TaskQuery::default()
            }
        ),
        Err(Error::InvalidInput { .. })
    ));

    let window = tracker
        .list_tasks(
            &project,
            &TaskQuery {
                page: Some(3),
                size: Some(2),
                ..TaskQuery::default()
            },
        )
        .expect("last window");
    assert_eq!(window.items.len(), 1);
    assert_eq!(window.total, 5);
}

#[test]
fn listing_an_unknown_project_is_empty_not_an_error() {
    let (tracker, _project) = sqlite_tracker();
    let page = tracker
        .list_tasks("prj-unknown", &TaskQuery::default())
        .expect("list unknown project");
    assert!(page.items.is_empty());
    assert_eq!(page.total, 0);
}

#[test]
fn assignee_only_update_is_audited_on_sqlite() {
    let (mut tracker, project) = sqlite_tracker();
    let task = tracker
        .create_task(
            &project,
            &TaskDraft {
                title: "reassign".to_string(),
                ..TaskDraft::default()
            },
            &actor(),
        )
        .expect("create");

    tracker
        .update_task(
            &task.id,
            &TaskPatch {
                assignee_email: Patch::Set("qa@test.io".to_string()),
                ..TaskPatch::default()
            },
            &actor(),
        )
        .expect("update");

    let trail = tracker.task_activity(&task.id).expect("trail");
    assert_eq!(trail.len(), 2);
    for kind in [ActivityKind::Create, ActivityKind::Update] {
        assert_eq!(trail.iter().filter(|e| e.kind == kind).count(), 1);
    }
}

#[test]
fn task_removal_cascades_activity_rows() {
    let (mut tracker, project) = sqlite_tracker();
    let task = tracker
        .create_task(
            &project,
            &TaskDraft {
                title: "short-lived".to_string(),
                ..TaskDraft::default()
            },
            &actor(),
        )
        .expect("create");
    tracker
        .update_task(
            &task.id,
            &TaskPatch {
                priority: Some(Priority::High),
                ..TaskPatch::default()
            },
            &actor(),
        )
        .expect("update");

    tracker.remove_task(&task.id, &actor()).expect("remove");

    let store = tracker.into_store();
    assert_eq!(store.activity_for_task(&task.id).expect("trail").len(), 0);
    let orphans: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM activity_log", [], |row| row.get(0))
        .expect("count activity");
    assert_eq!(orphans, 0, "no activity rows may survive their task");
}

#[test]
fn project_removal_cascades_through_tasks() {
    let (mut tracker, project) = sqlite_tracker();
    seed_tasks(&mut tracker, &project);
    tracker.remove_project(&project, &actor()).expect("remove project");

    let store = tracker.into_store();
    assert_eq!(store.count_tasks(&project, &TaskFilter::default()).expect("count"), 0);
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM activity_log", [], |row| row.get(0))
        .expect("count activity");
    assert_eq!(rows, 0);
}

#[test]
fn reopening_the_database_preserves_state() {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = dir.path().join("docket.sqlite3");

    let project_id = {
        let mut tracker = Tracker::new(SqliteStore::open(&db).expect("open"));
        let project = tracker.create_project("Durable", &actor()).expect("create");
        seed_tasks(&mut tracker, &project.id);
        project.id
    };

    let tracker = Tracker::new(SqliteStore::open(&db).expect("reopen"));
    let page = tracker
        .list_tasks(&project_id, &TaskQuery::default())
        .expect("list after reopen");
    assert_eq!(page.total, 5);
    assert_eq!(tracker.list_projects().expect("projects").len(), 1);
}
