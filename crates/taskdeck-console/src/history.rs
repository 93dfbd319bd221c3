/*
[INPUT]:  Task snapshot chosen at view time
[OUTPUT]: Read-only execution rows, summary, and paged views
[POS]:    Workflow layer - execution history viewer
[UPDATE]: When execution display fields change
*/

//! Execution history viewer.
//!
//! The viewer holds its own copy of the task taken when it was opened. It
//! never fetches and is not updated while open; reopening reads the store
//! again.

use chrono::{DateTime, FixedOffset, Local, TimeDelta};
use taskdeck_adapter::{Task, TaskExecution};

use crate::paging::{HISTORY_PAGE_SIZE, Page};

pub const NO_OUTPUT: &str = "No output available";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Display form of one execution record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRow {
    /// 1-based position in server order
    pub number: usize,
    pub started: String,
    pub ended: String,
    pub duration: String,
    pub output: String,
    pub output_len: usize,
}

impl ExecutionRow {
    pub fn from_execution(number: usize, execution: &TaskExecution) -> Self {
        Self {
            number,
            started: format_timestamp(&execution.start_time, execution.started_at()),
            ended: format_timestamp(&execution.end_time, execution.ended_at()),
            duration: format_duration(execution.duration()),
            output: match execution.output.as_deref() {
                Some(output) if !output.is_empty() => output.to_string(),
                _ => NO_OUTPUT.to_string(),
            },
            output_len: execution.output_len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySummary {
    pub task_id: String,
    pub name: String,
    pub owner: String,
    pub command: String,
    pub total_executions: usize,
}

#[derive(Debug, Clone)]
pub struct ExecutionViewer {
    task: Option<Task>,
    page: usize,
    page_size: usize,
}

impl Default for ExecutionViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionViewer {
    pub fn new() -> Self {
        Self::with_page_size(HISTORY_PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            task: None,
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.task.is_some()
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Show `task` as it is now; the viewer keeps this copy until closed.
    pub fn open(&mut self, task: Task) {
        self.task = Some(task);
        self.page = 0;
    }

    pub fn close(&mut self) {
        self.task = None;
        self.page = 0;
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        self.task.as_ref().map(|task| HistorySummary {
            task_id: task.id.clone(),
            name: task.name.clone(),
            owner: task.owner.clone(),
            command: task.command.clone(),
            total_executions: task.execution_count(),
        })
    }

    /// All records in server order.
    pub fn rows(&self) -> Vec<ExecutionRow> {
        self.task
            .as_ref()
            .map(|task| execution_rows(&task.task_executions))
            .unwrap_or_default()
    }

    pub fn page(&self) -> Page {
        let total = self.task.as_ref().map_or(0, Task::execution_count);
        Page::new(self.page, self.page_size, total)
    }

    /// Records on the current page, numbered by their position overall.
    pub fn page_rows(&self) -> Vec<ExecutionRow> {
        self.page().slice(&self.rows()).to_vec()
    }

    pub fn next_page(&mut self) {
        self.page = self.page().next().index();
    }

    pub fn prev_page(&mut self) {
        self.page = self.page().prev().index();
    }
}

pub fn execution_rows(executions: &[TaskExecution]) -> Vec<ExecutionRow> {
    executions
        .iter()
        .enumerate()
        .map(|(i, execution)| ExecutionRow::from_execution(i + 1, execution))
        .collect()
}

/// Local time when the value parses, the raw string otherwise.
pub fn format_timestamp(raw: &str, parsed: Option<DateTime<FixedOffset>>) -> String {
    match parsed {
        Some(parsed) => parsed.with_timezone(&Local).format(TIME_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

pub fn format_duration(duration: Option<TimeDelta>) -> String {
    match duration {
        Some(duration) => {
            let seconds = duration.num_milliseconds() as f64 / 1000.0;
            format!("{seconds:.2}s")
        }
        None => "N/A".to_string(),
    }
}
