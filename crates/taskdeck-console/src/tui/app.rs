/*
[INPUT]:  Shared TaskStore, UI event sender, log buffer, console configuration
[OUTPUT]: AppState driving selection, modals, and spawned store operations
[POS]:    TUI app state and user intent dispatch
[UPDATE]: When adding user intents or changing how results are surfaced
*/

use std::future::Future;
use std::sync::Arc;

use ratatui::widgets::TableState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use taskdeck_adapter::{Task, TaskError};
use taskdeck_console::store::describe_failure;
use taskdeck_console::{
    ConsoleConfig, ExecutionViewer, FetchOutcome, FormController, FormError, Page, StoreSnapshot,
    TaskStore,
};

use super::runtime::{LogBufferHandle, UiEvent};

/// Completion of a spawned store operation.
#[derive(Debug)]
pub(super) enum OpEvent {
    Fetched(Result<FetchOutcome, TaskError>),
    Saved(Result<Task, TaskError>),
    Removed {
        id: String,
        result: Result<String, TaskError>,
    },
    Executed {
        id: String,
        result: Result<Task, TaskError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StatusLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub(super) struct StatusMessage {
    pub(super) text: String,
    pub(super) level: StatusLevel,
}

#[derive(Debug, Clone)]
pub(super) struct PendingDelete {
    pub(super) id: String,
    pub(super) name: String,
}

#[derive(Debug, Default)]
pub(super) struct SearchBar {
    pub(super) editing: bool,
    pub(super) input: String,
}

pub(super) struct AppState {
    pub(super) store: Arc<TaskStore>,
    events: UnboundedSender<UiEvent>,
    pub(super) log_buffer: LogBufferHandle,
    pub(super) base_url: String,
    pub(super) snapshot: StoreSnapshot,
    pub(super) form: FormController,
    pub(super) viewer: ExecutionViewer,
    pub(super) pending_delete: Option<PendingDelete>,
    pub(super) search: SearchBar,
    pub(super) selected: usize,
    pub(super) table_state: TableState,
    pub(super) page_size: usize,
    pub(super) status: StatusMessage,
    pub(super) show_logs: bool,
    pub(super) should_quit: bool,
}

impl AppState {
    pub(super) fn new(
        store: Arc<TaskStore>,
        events: UnboundedSender<UiEvent>,
        log_buffer: LogBufferHandle,
        config: &ConsoleConfig,
    ) -> Self {
        Self {
            store,
            events,
            log_buffer,
            base_url: config.service.base_url.clone(),
            snapshot: StoreSnapshot::default(),
            form: FormController::new(),
            viewer: ExecutionViewer::with_page_size(config.ui.history_page_size),
            pending_delete: None,
            search: SearchBar::default(),
            selected: 0,
            table_state: TableState::default(),
            page_size: config.ui.page_size,
            status: StatusMessage {
                text: "Ready".to_string(),
                level: StatusLevel::Info,
            },
            show_logs: false,
            should_quit: false,
        }
    }

    /// Pull the store's current state and keep the selection on a row that
    /// exists.
    pub(super) fn sync_snapshot(&mut self) {
        self.snapshot = self.store.snapshot();
        let len = self.snapshot.tasks.len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
            return;
        }
        self.selected = self.selected.min(len - 1);
        let offset = self.page().range().start;
        self.table_state.select(Some(self.selected - offset));
    }

    pub(super) fn page(&self) -> Page {
        Page::containing(self.selected, self.page_size, self.snapshot.tasks.len())
    }

    pub(super) fn selected_task(&self) -> Option<&Task> {
        self.snapshot.tasks.get(self.selected)
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let len = self.snapshot.tasks.len();
        if len == 0 {
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    pub(super) fn next_page(&mut self) {
        self.move_selection(self.page_size as isize);
    }

    pub(super) fn prev_page(&mut self) {
        self.move_selection(-(self.page_size as isize));
    }

    pub(super) fn set_status(&mut self, level: StatusLevel, text: impl Into<String>) {
        self.status = StatusMessage {
            text: text.into(),
            level,
        };
    }

    fn spawn_op<F>(&self, op: F)
    where
        F: Future<Output = OpEvent> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let _ = events.send(UiEvent::Op(op.await));
        });
    }

    pub(super) fn refresh(&mut self) {
        let store = self.store.clone();
        self.spawn_op(async move { OpEvent::Fetched(store.refresh().await) });
    }

    pub(super) fn begin_search(&mut self) {
        self.search.editing = true;
    }

    pub(super) fn submit_search(&mut self) {
        self.search.editing = false;
        self.selected = 0;
        let query = self.search.input.clone();
        let store = self.store.clone();
        self.spawn_op(async move { OpEvent::Fetched(store.search(&query).await) });
    }

    pub(super) fn clear_search(&mut self) {
        self.search = SearchBar::default();
        self.selected = 0;
        self.refresh();
    }

    pub(super) fn open_create(&mut self) {
        self.form.open_create();
    }

    pub(super) fn open_edit(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id.clone()) else {
            self.set_status(StatusLevel::Info, "Select a task to edit");
            return;
        };
        match self.store.task(&id) {
            Some(task) => self.form.open_edit(&task),
            None => self.set_status(StatusLevel::Error, "The task no longer exists. Refresh the list."),
        }
    }

    pub(super) fn submit_form(&mut self) {
        match self.form.begin_submit() {
            Ok(input) => {
                let store = self.store.clone();
                self.spawn_op(async move { OpEvent::Saved(store.save(input).await) });
            }
            Err(FormError::Invalid(violations)) => {
                self.set_status(
                    StatusLevel::Error,
                    format!("Please fix {} field(s) before saving", violations.len()),
                );
            }
            Err(err) => debug!(error = %err, "form submit ignored"),
        }
    }

    pub(super) fn request_delete(&mut self) {
        self.pending_delete = self.selected_task().map(|task| PendingDelete {
            id: task.id.clone(),
            name: task.name.clone(),
        });
    }

    pub(super) fn confirm_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let store = self.store.clone();
        self.spawn_op(async move {
            let result = store.remove(&pending.id).await;
            OpEvent::Removed {
                id: pending.id,
                result,
            }
        });
    }

    pub(super) fn execute_selected(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        if self.store.is_executing(&task.id) {
            self.set_status(StatusLevel::Info, format!("{} is already running", task.name));
            return;
        }

        self.set_status(StatusLevel::Info, format!("Executing {}...", task.name));
        let store = self.store.clone();
        self.spawn_op(async move {
            let result = store.execute(&task.id).await;
            OpEvent::Executed {
                id: task.id,
                result,
            }
        });
    }

    pub(super) fn open_history(&mut self) {
        let Some(id) = self.selected_task().map(|task| task.id.clone()) else {
            return;
        };
        if let Some(task) = self.store.task(&id) {
            self.viewer.open(task);
        }
    }

    pub(super) fn apply_op(&mut self, op: OpEvent) {
        match op {
            OpEvent::Fetched(Ok(FetchOutcome::Applied { count, query })) => {
                let text = match query {
                    Some(query) if count == 0 => format!("No tasks match \"{query}\""),
                    Some(query) => format!("Found {count} task(s) matching \"{query}\""),
                    None => format!("Loaded {count} task(s)"),
                };
                self.set_status(StatusLevel::Info, text);
            }
            OpEvent::Fetched(Ok(FetchOutcome::Superseded)) => {}
            OpEvent::Fetched(Err(err)) => {
                self.set_status(StatusLevel::Error, describe_failure("load tasks", &err));
            }
            OpEvent::Saved(result) => {
                let outcome = self.form.finish_submit(result);
                if outcome.is_saved() {
                    self.set_status(StatusLevel::Success, outcome.message());
                    self.refresh();
                } else {
                    self.set_status(StatusLevel::Error, outcome.message());
                }
            }
            OpEvent::Removed { id, result } => match result {
                Ok(_) => {
                    debug!(task_id = %id, "delete confirmed");
                    self.set_status(StatusLevel::Success, "Task deleted successfully");
                }
                Err(err) => {
                    self.set_status(StatusLevel::Error, describe_failure("delete task", &err));
                }
            },
            OpEvent::Executed { id, result } => match result {
                Ok(task) => {
                    self.set_status(StatusLevel::Success, "Task executed successfully");
                    let latest = self.store.task(&id).unwrap_or(task);
                    self.viewer.open(latest);
                }
                Err(err) => {
                    self.set_status(StatusLevel::Error, describe_failure("execute task", &err));
                }
            },
        }
    }
}
