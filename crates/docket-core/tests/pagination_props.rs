//! Property tests for the listing contract: the pagination window law and
//! filter exactness hold for arbitrary task populations and page shapes.

use chrono::NaiveDate;
use docket_core::Tracker;
use docket_core::model::{Actor, Priority, Role, Status, TaskDraft};
use docket_core::query::TaskQuery;
use docket_core::store::MemStore;
use proptest::prelude::*;

const PRIORITIES: [Priority; 3] = [Priority::Low, Priority::Med, Priority::High];
const STATUSES: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

#[derive(Debug, Clone)]
struct TaskSpec {
    priority: usize,
    status: usize,
    due_offset: Option<u16>,
}

fn task_spec() -> impl Strategy<Value = TaskSpec> {
    (0..3_usize, 0..3_usize, proptest::option::of(0..400_u16)).prop_map(
        |(priority, status, due_offset)| TaskSpec {
            priority,
            status,
            due_offset,
        },
    )
}

fn populate(specs: &[TaskSpec]) -> (Tracker<MemStore>, String) {
    let actor = Actor::new("usr-prop", Role::Member);
    let mut tracker = Tracker::new(MemStore::new());
    let project = tracker
        .create_project("Props", &actor)
        .expect("create project");
    let epoch = NaiveDate::from_ymd_opt(2025, 1, 1).expect("valid epoch");

    for (i, spec) in specs.iter().enumerate() {
        tracker
            .create_task(
                &project.id,
                &TaskDraft {
                    title: format!("task {i}"),
                    priority: Some(PRIORITIES[spec.priority]),
                    status: Some(STATUSES[spec.status]),
                    due_date: spec
                        .due_offset
                        .map(|d| epoch + chrono::Days::new(u64::from(d))),
                    ..TaskDraft::default()
                },
                &actor,
            )
            .expect("create task");
    }
    (tracker, project.id)
}

proptest! {
    #[test]
    fn window_length_law_holds(
        specs in proptest::collection::vec(task_spec(), 0..40),
        page in 1..8_i64,
        size in 1..12_i64,
    ) {
        let (tracker, project) = populate(&specs);
        let result = tracker
            .list_tasks(&project, &TaskQuery {
                page: Some(page),
                size: Some(size),
                ..TaskQuery::default()
            })
            .expect("valid page request");

        let total = result.total as i64;
        let expected = (total - (page - 1) * size).clamp(0, size);
        prop_assert_eq!(result.items.len() as i64, expected);
        prop_assert_eq!(total, specs.len() as i64);
    }

    #[test]
    fn filtered_items_match_the_filter_exactly(
        specs in proptest::collection::vec(task_spec(), 0..40),
        priority in 0..3_usize,
        status in 0..3_usize,
    ) {
        let (tracker, project) = populate(&specs);
        let result = tracker
            .list_tasks(&project, &TaskQuery {
                priority: Some(PRIORITIES[priority].to_string()),
                status: Some(STATUSES[status].to_string()),
                size: Some(64),
                ..TaskQuery::default()
            })
            .expect("valid filter request");

        let expected = specs
            .iter()
            .filter(|s| s.priority == priority && s.status == status)
            .count() as u64;
        prop_assert_eq!(result.total, expected);
        for task in &result.items {
            prop_assert_eq!(task.priority, PRIORITIES[priority]);
            prop_assert_eq!(task.status, STATUSES[status]);
        }
    }

    #[test]
    fn default_sort_is_total_and_deterministic(
        specs in proptest::collection::vec(task_spec(), 0..25),
    ) {
        let (tracker, project) = populate(&specs);
        let query = TaskQuery { size: Some(64), ..TaskQuery::default() };
        let first = tracker.list_tasks(&project, &query).expect("list");
        let second = tracker.list_tasks(&project, &query).expect("list again");
        let first_ids: Vec<&String> = first.items.iter().map(|t| &t.id).collect();
        let second_ids: Vec<&String> = second.items.iter().map(|t| &t.id).collect();
        prop_assert_eq!(first_ids, second_ids);

        // Due dates never increase along the listing; undated tasks trail.
        let keys: Vec<NaiveDate> = first
            .items
            .iter()
            .map(|t| t.due_date.unwrap_or(NaiveDate::MIN))
            .collect();
        for pair in keys.windows(2) {
            prop_assert!(pair[0] >= pair[1]);
        }
    }
}
