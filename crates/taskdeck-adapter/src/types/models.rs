/*
[INPUT]:  Task service JSON schema (camelCase fields, ISO-8601 timestamps)
[OUTPUT]: Typed Task / TaskExecution structs with serde support
[POS]:    Data layer - models returned by the task service
[UPDATE]: When the task service schema changes
*/

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A named shell command with ownership metadata and its execution history.
///
/// `id` is assigned by the server and never changes. `task_executions` is
/// appended by the server only; the client never synthesizes records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub command: String,
    #[serde(default)]
    pub task_executions: Vec<TaskExecution>,
}

impl Task {
    pub fn execution_count(&self) -> usize {
        self.task_executions.len()
    }
}

/// One run of a task's command, as recorded by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecution {
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TaskExecution {
    pub fn started_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.start_time)
    }

    pub fn ended_at(&self) -> Option<DateTime<FixedOffset>> {
        parse_timestamp(&self.end_time)
    }

    /// `end_time - start_time`, or `None` if either side does not parse.
    pub fn duration(&self) -> Option<TimeDelta> {
        Some(self.ended_at()? - self.started_at()?)
    }

    /// Output length in characters; a missing output counts as empty.
    pub fn output_len(&self) -> usize {
        self.output.as_deref().map_or(0, |out| out.chars().count())
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (with offset) and offset-less local date-times such as
/// `2024-01-01T10:00:00.123`, which are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}
