//! Property-Based Tests for the Todo Service
//!
//! Uses proptest to check the consistency guarantees of the read-through,
//! invalidate-after-write cache.

use std::sync::Arc;

use proptest::prelude::*;
use tokio::runtime::Runtime;

use crate::cache::MemoryCache;
use crate::error::TodoError;
use crate::models::{CreateTodoRequest, Todo, UpdateTodoRequest};
use crate::service::TodoService;
use crate::store::MemoryTodoStore;

// == Strategies ==
fn title_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,40}".prop_filter("title must not be blank", |s| !s.trim().is_empty())
}

fn update_strategy() -> impl Strategy<Value = UpdateTodoRequest> {
    (
        prop::option::of(title_strategy()),
        prop::option::of(prop::option::of("[a-z ]{0,20}")),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(title, description, completed)| UpdateTodoRequest {
            title: title.map(Some),
            description,
            completed,
        })
}

/// Operations addressed by position in the list of ids created so far.
#[derive(Debug, Clone)]
enum TodoOp {
    Create(String),
    Update(usize, UpdateTodoRequest),
    Delete(usize),
    Get(usize),
    List,
}

fn todo_op_strategy() -> impl Strategy<Value = TodoOp> {
    prop_oneof![
        title_strategy().prop_map(TodoOp::Create),
        (0..8usize, update_strategy()).prop_map(|(idx, req)| TodoOp::Update(idx, req)),
        (0..8usize).prop_map(TodoOp::Delete),
        (0..8usize).prop_map(TodoOp::Get),
        Just(TodoOp::List),
    ]
}

/// Observable outcome of an operation, without timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    One(i64, String, Option<String>, bool),
    Many(Vec<(i64, String, Option<String>, bool)>),
    Deleted,
    NotFound,
}

fn summarize(todo: &Todo) -> (i64, String, Option<String>, bool) {
    (
        todo.id,
        todo.title.clone(),
        todo.description.clone(),
        todo.completed,
    )
}

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Ids that were never created still exercise the NotFound paths.
fn pick(ids: &[i64], idx: usize) -> i64 {
    ids.get(idx).copied().unwrap_or(1000 + idx as i64)
}

async fn run_ops(service: &TodoService, ops: &[TodoOp]) -> Vec<Outcome> {
    let mut ids: Vec<i64> = Vec::new();
    let mut outcomes = Vec::new();

    for op in ops {
        let outcome = match op {
            TodoOp::Create(title) => {
                let req = CreateTodoRequest {
                    title: Some(title.clone()),
                    ..Default::default()
                };
                let todo = service.create(req).await.unwrap();
                ids.push(todo.id);
                let (id, t, d, c) = summarize(&todo);
                Outcome::One(id, t, d, c)
            }
            TodoOp::Update(idx, req) => match service.update(pick(&ids, *idx), req.clone()).await {
                Ok(todo) => {
                    let (id, t, d, c) = summarize(&todo);
                    Outcome::One(id, t, d, c)
                }
                Err(TodoError::NotFound(_)) => Outcome::NotFound,
                Err(err) => panic!("unexpected error: {err}"),
            },
            TodoOp::Delete(idx) => match service.delete(pick(&ids, *idx)).await {
                Ok(()) => Outcome::Deleted,
                Err(TodoError::NotFound(_)) => Outcome::NotFound,
                Err(err) => panic!("unexpected error: {err}"),
            },
            TodoOp::Get(idx) => match service.get_by_id(pick(&ids, *idx)).await {
                Ok(todo) => {
                    let (id, t, d, c) = summarize(&todo);
                    Outcome::One(id, t, d, c)
                }
                Err(TodoError::NotFound(_)) => Outcome::NotFound,
                Err(err) => panic!("unexpected error: {err}"),
            },
            TodoOp::List => {
                let todos = service.list_all().await.unwrap();
                Outcome::Many(todos.iter().map(summarize).collect())
            }
        };
        outcomes.push(outcome);
    }
    outcomes
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Results are identical with and without a cache; only latency differs.
    #[test]
    fn prop_cache_is_transparent(ops in prop::collection::vec(todo_op_strategy(), 1..40)) {
        let rt = runtime();
        let (cached, uncached) = rt.block_on(async {
            let with_cache = TodoService::new(
                Arc::new(MemoryTodoStore::new()),
                Some(Arc::new(MemoryCache::new())),
            );
            let without_cache = TodoService::new(Arc::new(MemoryTodoStore::new()), None);
            (
                run_ops(&with_cache, &ops).await,
                run_ops(&without_cache, &ops).await,
            )
        });
        prop_assert_eq!(cached, uncached);
    }

    // Reads after any write sequence agree with the store.
    #[test]
    fn prop_reads_never_stale_after_writes(ops in prop::collection::vec(todo_op_strategy(), 1..40)) {
        let rt = runtime();
        rt.block_on(async {
            let store = Arc::new(MemoryTodoStore::new());
            let service = TodoService::new(store.clone(), Some(Arc::new(MemoryCache::new())));
            run_ops(&service, &ops).await;

            let from_service = service.list_all().await.unwrap();
            let from_store = crate::store::TodoStore::list_all(store.as_ref()).await.unwrap();
            prop_assert_eq!(&from_service, &from_store);

            for todo in &from_store {
                prop_assert_eq!(&service.get_by_id(todo.id).await.unwrap(), todo);
            }
            Ok(())
        })?;
    }

    // Absent fields keep their value; updated_at strictly increases and never
    // precedes created_at.
    #[test]
    fn prop_partial_update(title in title_strategy(), updates in prop::collection::vec(update_strategy(), 1..10)) {
        let rt = runtime();
        rt.block_on(async {
            let service = TodoService::new(
                Arc::new(MemoryTodoStore::new()),
                Some(Arc::new(MemoryCache::new())),
            );
            let created = service
                .create(CreateTodoRequest { title: Some(title), ..Default::default() })
                .await
                .unwrap();
            prop_assert_eq!(created.created_at, created.updated_at);

            let mut previous = created.clone();
            for req in updates {
                let next = service.update(created.id, req.clone()).await.unwrap();

                let expected_title = req.title.clone().flatten().unwrap_or(previous.title.clone());
                let expected_description = req.description.clone().unwrap_or(previous.description.clone());
                let expected_completed = req.completed.unwrap_or(previous.completed);
                prop_assert_eq!(&next.title, &expected_title);
                prop_assert_eq!(&next.description, &expected_description);
                prop_assert_eq!(next.completed, expected_completed);

                prop_assert!(next.updated_at > previous.updated_at);
                prop_assert!(next.updated_at >= next.created_at);
                prop_assert_eq!(next.created_at, created.created_at);
                previous = next;
            }
            Ok(())
        })?;
    }
}
