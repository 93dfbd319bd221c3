/*
[INPUT]:  Mock task service over HTTP
[OUTPUT]: End-to-end results for store, form, and viewer flows
[POS]:    Integration tests - console state over a real client
[UPDATE]: When store or form behavior changes
*/

mod common;

use std::time::Duration;

use common::{setup_mock_server, store_for, task_json};
use taskdeck_adapter::ErrorKind;
use taskdeck_console::{ExecutionViewer, FetchOutcome, FormController, SubmitOutcome, TaskField};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_refresh_loads_collection() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            task_json("1", "Build", 0),
            task_json("2", "Deploy", 1),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let outcome = assert_ok!(store.refresh().await);
    assert_eq!(outcome, FetchOutcome::Applied { count: 2, query: None });

    let snapshot = store.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.last_query, None);
    assert_eq!(snapshot.tasks[1].name, "Deploy");
}

#[tokio::test]
async fn test_search_without_match_empties_list() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([task_json("1", "Build", 0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/find"))
        .and(query_param("name", "nothing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.refresh().await);
    let outcome = assert_ok!(store.search("  nothing ").await);

    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            count: 0,
            query: Some("nothing".to_string())
        }
    );
    let snapshot = store.snapshot();
    assert!(snapshot.tasks.is_empty());
    assert_eq!(snapshot.last_query.as_deref(), Some("nothing"));
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_tasks() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([task_json("1", "Build", 0)])),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.refresh().await);
    let err = assert_err!(store.refresh().await);

    assert_eq!(err.kind(), ErrorKind::Server);
    let snapshot = store.snapshot();
    assert_eq!(snapshot.tasks.len(), 1);
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_slow_search_is_superseded_by_newer_one() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks/find"))
        .and(query_param("name", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([task_json("1", "slow build", 0)]))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tasks/find"))
        .and(query_param("name", "fast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            task_json("2", "fast build", 0),
            task_json("3", "fast deploy", 0),
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.search("slow").await }
    });
    while !store.is_loading() {
        tokio::task::yield_now().await;
    }

    let fast = assert_ok!(store.search("fast").await);
    assert_eq!(
        fast,
        FetchOutcome::Applied {
            count: 2,
            query: Some("fast".to_string())
        }
    );

    let slow = assert_ok!(slow.await.expect("search task"));
    assert_eq!(slow, FetchOutcome::Superseded);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.last_query.as_deref(), Some("fast"));
    assert_eq!(
        snapshot.tasks.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(),
        vec!["2", "3"]
    );
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_form_create_appends_without_refetch() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([task_json("1", "Build", 0)])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks"))
        .and(body_json(serde_json::json!({
            "name": "Deploy",
            "owner": "Ops",
            "command": "make deploy",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("9", "Deploy", 0)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.refresh().await);

    let mut form = FormController::new();
    form.open_create();
    form.set_field(TaskField::Name, "Deploy");
    form.set_field(TaskField::Owner, "Ops");
    form.set_field(TaskField::Command, "make deploy");

    let outcome = assert_ok!(form.submit(&store).await);
    assert!(outcome.is_saved());
    assert_eq!(outcome.message(), "Task created successfully");
    assert!(!form.is_open());

    let ids = store
        .snapshot()
        .tasks
        .iter()
        .map(|t| t.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "9"]);
}

#[tokio::test]
async fn test_form_keeps_values_on_server_rejection() {
    let server = setup_mock_server().await;
    Mock::given(method("PUT"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "Validation failed",
            "errors": {"owner": "owner is not allowed"},
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let mut form = FormController::new();
    form.open_create();
    form.set_field(TaskField::Name, "Deploy");
    form.set_field(TaskField::Owner, "Nobody");
    form.set_field(TaskField::Command, "make deploy");

    let outcome = assert_ok!(form.submit(&store).await);
    match &outcome {
        SubmitOutcome::Failed { error, .. } => assert_eq!(error.kind(), ErrorKind::Validation),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(outcome.message().starts_with("Failed to create task:"));
    assert!(form.is_open());
    assert!(!form.is_submitting());
    assert_eq!(form.fields().owner, "Nobody");
    assert_eq!(form.violation_for(TaskField::Owner), Some("owner is not allowed"));
    assert!(store.snapshot().tasks.is_empty());
}

#[tokio::test]
async fn test_execute_merges_history_for_viewer() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([task_json("1", "Build", 0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/1/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("1", "Build", 2)))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.refresh().await);
    assert_ok!(store.execute("1").await);

    let snapshot = store.snapshot();
    assert!(!snapshot.is_executing("1"));
    assert_eq!(snapshot.tasks[0].execution_count(), 2);

    let mut viewer = ExecutionViewer::new();
    viewer.open(store.task("1").expect("task listed"));
    let summary = viewer.summary().expect("viewer open");
    assert_eq!(summary.total_executions, 2);
    let rows = viewer.page_rows();
    assert_eq!(rows[0].number, 1);
    assert_eq!(rows[1].output, "run 1");
}

#[tokio::test]
async fn test_execute_failure_still_records_returned_task() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([task_json("1", "Build", 0)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/1/execute"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "message": "command exited with status 2",
            "task": task_json("1", "Build", 1),
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.refresh().await);
    let err = assert_err!(store.execute("1").await);

    assert_eq!(err.kind(), ErrorKind::Execution);
    assert_eq!(store.snapshot().tasks[0].execution_count(), 1);
}

#[tokio::test]
async fn test_remove_only_after_confirmation() {
    let server = setup_mock_server().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            task_json("1", "Build", 0),
            task_json("2", "Deploy", 0),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Task deleted"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database locked"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert_ok!(store.refresh().await);

    let confirmation = assert_ok!(store.remove("1").await);
    assert_eq!(confirmation, "Task deleted");
    assert_err!(store.remove("2").await);

    let ids = store
        .snapshot()
        .tasks
        .iter()
        .map(|t| t.id.clone())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["2"]);
}
