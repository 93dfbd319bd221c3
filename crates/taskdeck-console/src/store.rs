/*
[INPUT]:  TaskService round trips issued for user intents
[OUTPUT]: Single authoritative task collection with loading/query status
[POS]:    Core state layer - the only owner and mutator of the task list
[UPDATE]: When store operations or fetch ordering rules change
*/

//! Client-side task store.
//!
//! All state transitions are plain functions on [`StoreState`]; [`TaskStore`]
//! wraps them around the async service calls. Collection-level fetches
//! (`refresh`/`search`) carry a sequence number and only the most recently
//! issued one is applied. Mutations (`save`/`remove`/`execute`) are merged
//! when they return, last write wins per id.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use taskdeck_adapter::{Result, Task, TaskError, TaskInput, TaskService};
use tracing::{debug, info, warn};

use crate::collection::{MergeOutcome, TaskCollection};

/// Identifies one issued collection-level fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: Option<String>,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// What happened to a fetch response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the task list. `query` is the search that
    /// produced it, `None` for a full refresh.
    Applied {
        count: usize,
        query: Option<String>,
    },
    /// A newer fetch was issued meanwhile; the response was discarded
    Superseded,
}

/// Read-only copy of the store for rendering.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub tasks: Vec<Task>,
    pub loading: bool,
    pub last_query: Option<String>,
    pub executing: Vec<String>,
}

impl StoreSnapshot {
    pub fn is_executing(&self, id: &str) -> bool {
        self.executing.iter().any(|running| running == id)
    }
}

#[derive(Debug, Default)]
pub struct StoreState {
    collection: TaskCollection,
    loading: bool,
    last_query: Option<String>,
    issued: u64,
    executing: BTreeMap<String, usize>,
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        self.collection.as_slice()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.collection.get(id)
    }

    /// Issue a new fetch. The current list stays visible until it resolves.
    pub fn begin_fetch(&mut self, query: Option<String>) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            seq: self.issued,
            query,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.seq == self.issued
    }

    /// Apply a fetch response if it belongs to the most recently issued
    /// fetch. A search answered with "not found" shows an empty list.
    /// On any other failure the list is left untouched.
    pub fn complete_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Task>>,
    ) -> Result<FetchOutcome> {
        if !self.is_current(ticket) {
            return Ok(FetchOutcome::Superseded);
        }
        self.loading = false;

        let tasks = match result {
            Ok(tasks) => tasks,
            Err(err) if ticket.query.is_some() && err.is_not_found() => Vec::new(),
            Err(err) => return Err(err),
        };

        self.collection.replace_all(tasks);
        self.last_query = ticket.query.clone();
        Ok(FetchOutcome::Applied {
            count: self.collection.len(),
            query: ticket.query.clone(),
        })
    }

    /// A fetch that will never complete (its future was dropped).
    pub fn abandon_fetch(&mut self, ticket: &FetchTicket) {
        if self.is_current(ticket) {
            self.loading = false;
        }
    }

    pub fn merge(&mut self, task: Task) -> MergeOutcome {
        self.collection.upsert(task)
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        self.collection.remove(id)
    }

    pub fn begin_execute(&mut self, id: &str) {
        *self.executing.entry(id.to_string()).or_insert(0) += 1;
    }

    pub fn end_execute(&mut self, id: &str) {
        if let Some(count) = self.executing.get_mut(id) {
            *count -= 1;
            if *count == 0 {
                self.executing.remove(id);
            }
        }
    }

    pub fn is_executing(&self, id: &str) -> bool {
        self.executing.contains_key(id)
    }

    /// Ingest an execute response. A failed execution that still carries the
    /// task is merged before the error is handed back.
    pub fn complete_execute(&mut self, result: Result<Task>) -> Result<Task> {
        match result {
            Ok(task) => {
                self.merge(task.clone());
                Ok(task)
            }
            Err(err) => {
                if let Some(task) = err.execution_task() {
                    self.merge(task.clone());
                }
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.collection.as_slice().to_vec(),
            loading: self.loading,
            last_query: self.last_query.clone(),
            executing: self.executing.keys().cloned().collect(),
        }
    }
}

/// Async front of [`StoreState`]. Cheap to share behind an `Arc`; the lock
/// is never held across a service call.
pub struct TaskStore {
    service: Arc<dyn TaskService>,
    state: Mutex<StoreState>,
}

impl TaskStore {
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        Self {
            service,
            state: Mutex::new(StoreState::new()),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.with_state(|state| state.snapshot())
    }

    /// Deep copy of one task as currently held.
    pub fn task(&self, id: &str) -> Option<Task> {
        self.with_state(|state| state.task(id).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.with_state(|state| state.loading())
    }

    /// Whether an execute for this id is still waiting on the server.
    pub fn is_executing(&self, id: &str) -> bool {
        self.with_state(|state| state.is_executing(id))
    }

    /// Reload the full collection and clear any active search.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let pending = PendingFetch::issue(self, None);
        let result = self.service.list_tasks().await;
        pending.complete(result)
    }

    /// Filter by name on the server. A blank query is a refresh.
    pub async fn search(&self, query: &str) -> Result<FetchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return self.refresh().await;
        }

        let pending = PendingFetch::issue(self, Some(query.to_string()));
        let result = self.service.find_tasks_by_name(query).await;
        pending.complete(result)
    }

    /// Create or update depending on `input.id`, then merge the returned
    /// task locally without refetching.
    pub async fn save(&self, input: TaskInput) -> Result<Task> {
        let task = self.service.create_or_update(&input).await?;
        let outcome = self.with_state(|state| state.merge(task.clone()));
        info!(task_id = %task.id, ?outcome, "merged saved task");
        Ok(task)
    }

    /// Delete on the server, then drop the entry. Nothing changes locally
    /// unless the server confirmed.
    pub async fn remove(&self, id: &str) -> Result<String> {
        let confirmation = self.service.delete_task(id).await?;
        let removed = self.with_state(|state| state.remove(id));
        info!(task_id = %id, was_listed = removed.is_some(), "removed task");
        Ok(confirmation)
    }

    /// Run the task on the server and merge the returned execution history.
    pub async fn execute(&self, id: &str) -> Result<Task> {
        let marker = ExecutingMarker::set(self, id);
        let result = self.service.execute_task(id).await;
        let merged = self.with_state(|state| state.complete_execute(result));
        drop(marker);

        if let Err(err) = &merged {
            warn!(
                task_id = %id,
                kind = ?err.kind(),
                ingested = err.execution_task().is_some(),
                "task execution failed"
            );
        }
        merged
    }
}

/// Outstanding fetch. Dropping it without completing abandons the ticket so
/// `loading` cannot stay set.
struct PendingFetch<'a> {
    store: &'a TaskStore,
    ticket: Option<FetchTicket>,
}

impl<'a> PendingFetch<'a> {
    fn issue(store: &'a TaskStore, query: Option<String>) -> Self {
        let ticket = store.with_state(|state| state.begin_fetch(query));
        debug!(seq = ticket.seq, query = ?ticket.query, "fetch issued");
        Self {
            store,
            ticket: Some(ticket),
        }
    }

    fn complete(mut self, result: Result<Vec<Task>>) -> Result<FetchOutcome> {
        let Some(ticket) = self.ticket.take() else {
            return Ok(FetchOutcome::Superseded);
        };

        let outcome = self
            .store
            .with_state(|state| state.complete_fetch(&ticket, result));
        match &outcome {
            Ok(FetchOutcome::Applied { count, .. }) => {
                info!(seq = ticket.seq, query = ?ticket.query, count, "fetch applied");
            }
            Ok(FetchOutcome::Superseded) => {
                debug!(seq = ticket.seq, "superseded fetch response discarded");
            }
            Err(err) => {
                warn!(seq = ticket.seq, kind = ?err.kind(), error = %err, "fetch failed");
            }
        }
        outcome
    }
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.store.with_state(|state| state.abandon_fetch(&ticket));
        }
    }
}

struct ExecutingMarker<'a> {
    store: &'a TaskStore,
    id: String,
}

impl<'a> ExecutingMarker<'a> {
    fn set(store: &'a TaskStore, id: &str) -> Self {
        store.with_state(|state| state.begin_execute(id));
        Self {
            store,
            id: id.to_string(),
        }
    }
}

impl Drop for ExecutingMarker<'_> {
    fn drop(&mut self) {
        self.store.with_state(|state| state.end_execute(&self.id));
    }
}

/// Errors surfaced to the user carry the normalized kind; this keeps the
/// message wording in one place for the TUI and the CLI.
pub fn describe_failure(action: &str, err: &TaskError) -> String {
    format!("Failed to {action}: {}", err.user_message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use taskdeck_adapter::{ErrorKind, TaskExecution};
    use tokio::sync::oneshot;

    enum Reply<T> {
        Ready(Result<T>),
        Gated(oneshot::Receiver<Result<T>>),
    }

    async fn resolve<T>(reply: Option<Reply<T>>) -> Result<T> {
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(TaskError::unknown("gate dropped"))),
            None => Err(TaskError::unknown("no scripted reply")),
        }
    }

    #[derive(Default)]
    struct ScriptedService {
        list: Mutex<VecDeque<Reply<Vec<Task>>>>,
        find: Mutex<VecDeque<Reply<Vec<Task>>>>,
        upsert: Mutex<VecDeque<Reply<Task>>>,
        delete: Mutex<VecDeque<Reply<String>>>,
        execute: Mutex<VecDeque<Reply<Task>>>,
        calls: AtomicUsize,
    }

    impl ScriptedService {
        fn push<T>(queue: &Mutex<VecDeque<Reply<T>>>, reply: Reply<T>) {
            queue.lock().expect("queue").push_back(reply);
        }

        fn pop<T>(&self, queue: &Mutex<VecDeque<Reply<T>>>) -> Option<Reply<T>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            queue.lock().expect("queue").pop_front()
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskService for ScriptedService {
        async fn list_tasks(&self) -> Result<Vec<Task>> {
            let reply = self.pop(&self.list);
            resolve(reply).await
        }

        async fn find_tasks_by_name(&self, _name: &str) -> Result<Vec<Task>> {
            let reply = self.pop(&self.find);
            resolve(reply).await
        }

        async fn create_or_update(&self, _input: &TaskInput) -> Result<Task> {
            let reply = self.pop(&self.upsert);
            resolve(reply).await
        }

        async fn delete_task(&self, _id: &str) -> Result<String> {
            let reply = self.pop(&self.delete);
            resolve(reply).await
        }

        async fn execute_task(&self, _id: &str) -> Result<Task> {
            let reply = self.pop(&self.execute);
            resolve(reply).await
        }
    }

    fn build_task(id: &str, name: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            owner: "Dev".to_string(),
            command: "make".to_string(),
            task_executions: Vec::new(),
        }
    }

    fn build_execution(output: &str) -> TaskExecution {
        TaskExecution {
            start_time: "t0".to_string(),
            end_time: "t1".to_string(),
            output: Some(output.to_string()),
        }
    }

    fn network_error() -> TaskError {
        TaskError::Network {
            message: "connection refused".to_string(),
        }
    }

    fn ids(snapshot: &StoreSnapshot) -> Vec<String> {
        snapshot.tasks.iter().map(|t| t.id.clone()).collect()
    }

    fn store_with(service: Arc<ScriptedService>) -> TaskStore {
        TaskStore::new(service)
    }

    async fn seeded_store(tasks: Vec<Task>) -> (Arc<ScriptedService>, TaskStore) {
        let service = Arc::new(ScriptedService::default());
        ScriptedService::push(&service.list, Reply::Ready(Ok(tasks)));
        let store = store_with(service.clone());
        store.refresh().await.expect("seed refresh");
        (service, store)
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut state = StoreState::new();
        let first = state.begin_fetch(Some("alpha".to_string()));
        let second = state.begin_fetch(Some("beta".to_string()));

        let applied = state.complete_fetch(&second, Ok(vec![build_task("2", "beta")]));
        assert_eq!(
            applied.expect("applied"),
            FetchOutcome::Applied {
                count: 1,
                query: Some("beta".to_string())
            }
        );
        assert!(!state.loading());

        let late = state.complete_fetch(&first, Ok(vec![build_task("1", "alpha")]));
        assert_eq!(late.expect("late"), FetchOutcome::Superseded);
        assert_eq!(state.tasks()[0].id, "2");
        assert_eq!(state.last_query(), Some("beta"));
    }

    #[test]
    fn test_superseded_failure_is_not_reported() {
        let mut state = StoreState::new();
        let first = state.begin_fetch(None);
        let _second = state.begin_fetch(None);

        let outcome = state.complete_fetch(&first, Err(network_error()));
        assert_eq!(outcome.expect("ignored"), FetchOutcome::Superseded);
        assert!(state.loading(), "newer fetch still in flight");
    }

    #[test]
    fn test_loading_keeps_previous_tasks_visible() {
        let mut state = StoreState::new();
        let ticket = state.begin_fetch(None);
        state
            .complete_fetch(&ticket, Ok(vec![build_task("1", "Build")]))
            .expect("seed");

        let _pending = state.begin_fetch(None);
        assert!(state.loading());
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn test_abandoned_fetch_clears_loading() {
        let mut state = StoreState::new();
        let ticket = state.begin_fetch(None);
        state.abandon_fetch(&ticket);
        assert!(!state.loading());
    }

    #[tokio::test]
    async fn test_refresh_replaces_tasks() {
        let (_service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["1"]);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.last_query, None);
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_tasks() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        ScriptedService::push(&service.list, Reply::Ready(Err(network_error())));

        let err = store.refresh().await.expect_err("network");
        assert_eq!(err.kind(), ErrorKind::Network);
        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["1"]);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_blank_search_is_refresh() {
        for blank in ["", "   "] {
            let (service, store) = seeded_store(vec![]).await;
            ScriptedService::push(&service.list, Reply::Ready(Ok(vec![build_task("1", "Build")])));

            let outcome = store.search(blank).await.expect("refresh");
            assert_eq!(outcome, FetchOutcome::Applied { count: 1, query: None });
            assert_eq!(store.snapshot().last_query, None);
        }
    }

    #[tokio::test]
    async fn test_search_records_query_and_accepts_empty() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        ScriptedService::push(&service.find, Reply::Ready(Ok(Vec::new())));

        let outcome = store.search("  zzz ").await.expect("no match is fine");
        assert_eq!(
            outcome,
            FetchOutcome::Applied {
                count: 0,
                query: Some("zzz".to_string())
            }
        );
        let snapshot = store.snapshot();
        assert!(snapshot.tasks.is_empty());
        assert_eq!(snapshot.last_query.as_deref(), Some("zzz"));
    }

    #[tokio::test]
    async fn test_search_not_found_shows_empty_list() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        ScriptedService::push(
            &service.find,
            Reply::Ready(Err(TaskError::NotFound {
                message: "no tasks".to_string(),
            })),
        );

        assert_eq!(
            store.search("zzz").await.expect("empty"),
            FetchOutcome::Applied {
                count: 0,
                query: Some("zzz".to_string())
            }
        );
        assert!(store.snapshot().tasks.is_empty());
    }

    #[tokio::test]
    async fn test_search_network_failure_keeps_tasks() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        ScriptedService::push(&service.find, Reply::Ready(Err(network_error())));

        store.search("Build").await.expect_err("network");
        assert_eq!(ids(&store.snapshot()), vec!["1"]);
    }

    #[tokio::test]
    async fn test_last_issued_search_wins() {
        let service = Arc::new(ScriptedService::default());
        let (tx_slow, rx_slow) = oneshot::channel();
        let (tx_fast, rx_fast) = oneshot::channel();
        ScriptedService::push(&service.find, Reply::Gated(rx_slow));
        ScriptedService::push(&service.find, Reply::Gated(rx_fast));
        let store = Arc::new(store_with(service.clone()));

        let slow = tokio::spawn({
            let store = store.clone();
            async move { store.search("alpha").await }
        });
        while service.calls() < 1 {
            tokio::task::yield_now().await;
        }
        let fast = tokio::spawn({
            let store = store.clone();
            async move { store.search("beta").await }
        });
        while service.calls() < 2 {
            tokio::task::yield_now().await;
        }

        tx_fast
            .send(Ok(vec![build_task("2", "beta")]))
            .expect("fast gate");
        let fast = fast.await.expect("join").expect("fast search");
        assert_eq!(
            fast,
            FetchOutcome::Applied {
                count: 1,
                query: Some("beta".to_string())
            }
        );

        tx_slow
            .send(Ok(vec![build_task("1", "alpha")]))
            .expect("slow gate");
        let slow = slow.await.expect("join").expect("slow search");
        assert_eq!(slow, FetchOutcome::Superseded);

        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["2"]);
        assert_eq!(snapshot.last_query.as_deref(), Some("beta"));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_dropped_fetch_does_not_stick_loading() {
        let service = Arc::new(ScriptedService::default());
        let (_tx, rx) = oneshot::channel();
        ScriptedService::push(&service.list, Reply::Gated(rx));
        let store = Arc::new(store_with(service.clone()));

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        while service.calls() < 1 {
            tokio::task::yield_now().await;
        }
        assert!(store.is_loading());

        handle.abort();
        let _ = handle.await;
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_save_create_appends_once() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        ScriptedService::push(&service.upsert, Reply::Ready(Ok(build_task("2", "Deploy"))));

        let saved = store
            .save(TaskInput::create("Deploy", "Ops", "deploy.sh"))
            .await
            .expect("save");
        assert_eq!(saved.id, "2");
        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["1", "2"]);
        assert_eq!(snapshot.tasks.iter().filter(|t| t.id == "2").count(), 1);
        assert_eq!(service.calls(), 2, "no refetch after save");
    }

    #[tokio::test]
    async fn test_save_update_replaces_in_place() {
        let (service, store) = seeded_store(vec![
            build_task("1", "Build"),
            build_task("2", "Deploy"),
            build_task("3", "Lint"),
        ])
        .await;
        ScriptedService::push(&service.upsert, Reply::Ready(Ok(build_task("2", "Deploy v2"))));

        store
            .save(TaskInput::update("2", "Deploy v2", "Dev", "make"))
            .await
            .expect("update");
        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["1", "2", "3"]);
        assert_eq!(snapshot.tasks[1].name, "Deploy v2");
    }

    #[tokio::test]
    async fn test_remove_success_and_failure() {
        let (service, store) =
            seeded_store(vec![build_task("1", "Build"), build_task("2", "Deploy")]).await;

        ScriptedService::push(
            &service.delete,
            Reply::Ready(Err(TaskError::NotFound {
                message: "gone".to_string(),
            })),
        );
        store.remove("1").await.expect_err("not found");
        assert_eq!(ids(&store.snapshot()), vec!["1", "2"]);

        ScriptedService::push(&service.delete, Reply::Ready(Ok("Task deleted".to_string())));
        let confirmation = store.remove("1").await.expect("deleted");
        assert_eq!(confirmation, "Task deleted");
        assert_eq!(ids(&store.snapshot()), vec!["2"]);
    }

    #[tokio::test]
    async fn test_execute_merges_new_record() {
        let (service, store) =
            seeded_store(vec![build_task("1", "Build"), build_task("2", "Deploy")]).await;
        let mut executed = build_task("1", "Build");
        executed.task_executions.push(build_execution("ok"));
        ScriptedService::push(&service.execute, Reply::Ready(Ok(executed)));

        store.execute("1").await.expect("execute");
        let snapshot = store.snapshot();
        assert_eq!(ids(&snapshot), vec!["1", "2"]);
        assert_eq!(snapshot.tasks[0].task_executions.len(), 1);
        assert_eq!(
            snapshot.tasks[0].task_executions[0].output.as_deref(),
            Some("ok")
        );
        assert!(!snapshot.is_executing("1"));
    }

    #[tokio::test]
    async fn test_execution_error_still_ingests_task() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        let mut attempted = build_task("1", "Build");
        attempted.task_executions.push(build_execution("command not found"));
        ScriptedService::push(
            &service.execute,
            Reply::Ready(Err(TaskError::Execution {
                message: "exit 127".to_string(),
                task: Some(Box::new(attempted)),
            })),
        );

        let err = store.execute("1").await.expect_err("execution failed");
        assert_eq!(err.kind(), ErrorKind::Execution);
        let task = store.task("1").expect("still listed");
        assert_eq!(task.task_executions.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_marks_task_while_in_flight() {
        let (service, store) = seeded_store(vec![build_task("1", "Build")]).await;
        let (tx, rx) = oneshot::channel();
        ScriptedService::push(&service.execute, Reply::Gated(rx));
        let store = Arc::new(store);

        let handle = tokio::spawn({
            let store = store.clone();
            async move { store.execute("1").await }
        });
        while service.calls() < 2 {
            tokio::task::yield_now().await;
        }
        assert!(store.snapshot().is_executing("1"));

        tx.send(Ok(build_task("1", "Build"))).expect("gate");
        handle.await.expect("join").expect("execute");
        assert!(!store.snapshot().is_executing("1"));
    }
}
