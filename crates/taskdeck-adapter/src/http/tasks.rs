/*
[INPUT]:  Task ids, name queries, and upsert bodies
[OUTPUT]: Typed task service results (Task, Vec<Task>, confirmations)
[POS]:    HTTP layer - task endpoints
[UPDATE]: When adding task endpoints or changing response formats
[UPDATE]: 2026-10-16 Added single-task lookup and connection check
*/

use reqwest::Method;
use tracing::info;

use crate::http::error::{ErrorKind, Operation, Result, TaskError};
use crate::http::TaskClient;
use crate::types::{OneOrMany, Task, TaskInput};

/// Outcome of a connection check against the task service.
#[derive(Debug, Clone)]
pub enum ConnectionReport {
    Reachable { task_count: usize },
    Unreachable(TaskError),
}

impl ConnectionReport {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ConnectionReport::Reachable { .. })
    }

    pub fn summary(&self) -> String {
        match self {
            ConnectionReport::Reachable { task_count } => {
                format!("Connected. Found {task_count} tasks.")
            }
            ConnectionReport::Unreachable(err) => match err.kind() {
                ErrorKind::Network => {
                    "Network error: the backend is not running or not reachable.".to_string()
                }
                ErrorKind::NotFound => "Endpoint not found: check the base URL.".to_string(),
                _ => format!("Error: {err}"),
            },
        }
    }
}

impl TaskClient {
    /// Fetch the full task collection
    ///
    /// GET /tasks
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let url = self.endpoint(&["tasks"], &[])?;
        let builder = self.request(Method::GET, url);
        self.send_json(builder, Operation::ListTasks).await
    }

    /// Fetch one task by id
    ///
    /// GET /tasks?id={id}
    pub async fn get_task(&self, id: &str) -> Result<Task> {
        let url = self.endpoint(&["tasks"], &[("id", id)])?;
        let builder = self.request(Method::GET, url);
        let found: OneOrMany = self.send_json(builder, Operation::GetTask).await?;
        found
            .into_vec()
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound {
                message: format!("task {id} not found"),
            })
    }

    /// Server-side filter by name. No match is an empty list, not an error.
    ///
    /// GET /tasks/find?name={name}
    pub async fn find_tasks_by_name(&self, name: &str) -> Result<Vec<Task>> {
        let url = self.endpoint(&["tasks", "find"], &[("name", name)])?;
        let builder = self.request(Method::GET, url);
        match self.send_json(builder, Operation::FindTasks).await {
            Err(err) if err.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }

    /// Create (no id) or update (with id) a task
    ///
    /// PUT /tasks
    pub async fn create_or_update(&self, input: &TaskInput) -> Result<Task> {
        let url = self.endpoint(&["tasks"], &[])?;
        let builder = self.request(Method::PUT, url).json(input);
        let task: Task = self.send_json(builder, Operation::Upsert).await?;
        info!(
            task_id = %task.id,
            updated = input.is_update(),
            "task saved"
        );
        Ok(task)
    }

    /// Delete a task, returning the server's confirmation text
    ///
    /// DELETE /tasks/{id}
    pub async fn delete_task(&self, id: &str) -> Result<String> {
        let url = self.endpoint(&["tasks", id], &[])?;
        let builder = self.request(Method::DELETE, url);
        let confirmation = self.send_text(builder, Operation::Delete).await?;
        info!(task_id = %id, "task deleted");
        Ok(confirmation)
    }

    /// Run the task's command on the server; the returned task carries the
    /// appended execution record
    ///
    /// PUT /tasks/{id}/execute
    pub async fn execute_task(&self, id: &str) -> Result<Task> {
        let url = self.endpoint(&["tasks", id, "execute"], &[])?;
        let builder = self.request(Method::PUT, url);
        let task: Task = self.send_json(builder, Operation::Execute).await?;
        info!(
            task_id = %task.id,
            executions = task.execution_count(),
            "task executed"
        );
        Ok(task)
    }

    /// Probe the service by listing tasks
    pub async fn check_connection(&self) -> ConnectionReport {
        match self.list_tasks().await {
            Ok(tasks) => ConnectionReport::Reachable {
                task_count: tasks.len(),
            },
            Err(err) => ConnectionReport::Unreachable(err),
        }
    }
}
