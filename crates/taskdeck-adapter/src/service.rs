/*
[INPUT]:  Task service operations needed by the client-side store
[OUTPUT]: TaskService trait and its reqwest-backed implementation
[POS]:    Service seam - what higher layers depend on instead of TaskClient
[UPDATE]: When the store needs a new remote operation
*/

use async_trait::async_trait;

use crate::http::{Result, TaskClient};
use crate::types::{Task, TaskInput};

/// Remote task operations, one request/response round trip each, no retry.
///
/// Every failure is already normalized into a [`crate::TaskError`].
#[async_trait]
pub trait TaskService: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    async fn find_tasks_by_name(&self, name: &str) -> Result<Vec<Task>>;

    async fn create_or_update(&self, input: &TaskInput) -> Result<Task>;

    async fn delete_task(&self, id: &str) -> Result<String>;

    async fn execute_task(&self, id: &str) -> Result<Task>;
}

#[async_trait]
impl TaskService for TaskClient {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        TaskClient::list_tasks(self).await
    }

    async fn find_tasks_by_name(&self, name: &str) -> Result<Vec<Task>> {
        TaskClient::find_tasks_by_name(self, name).await
    }

    async fn create_or_update(&self, input: &TaskInput) -> Result<Task> {
        TaskClient::create_or_update(self, input).await
    }

    async fn delete_task(&self, id: &str) -> Result<String> {
        TaskClient::delete_task(self, id).await
    }

    async fn execute_task(&self, id: &str) -> Result<Task> {
        TaskClient::execute_task(self, id).await
    }
}
