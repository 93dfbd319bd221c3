/*
[INPUT]:  Mock server and task fixtures
[OUTPUT]: Shared helpers for console integration tests
[POS]:    Test infrastructure - shared across console test modules
[UPDATE]: When adding new test patterns or fixtures
*/

#![allow(dead_code)]

use std::sync::Arc;

use taskdeck_adapter::{ClientConfig, TaskClient};
use taskdeck_console::TaskStore;
use wiremock::MockServer;

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Store backed by a real HTTP client pointed at the mock server
pub fn store_for(server: &MockServer) -> Arc<TaskStore> {
    let client = TaskClient::with_config(ClientConfig::with_base_url(server.uri()))
        .expect("client init");
    Arc::new(TaskStore::new(Arc::new(client)))
}

/// Task JSON as the service renders it
pub fn task_json(id: &str, name: &str, executions: usize) -> serde_json::Value {
    let executions = (0..executions)
        .map(|run| {
            serde_json::json!({
                "startTime": format!("2024-01-01T10:00:0{run}Z"),
                "endTime": format!("2024-01-01T10:00:0{run}.5Z"),
                "output": format!("run {run}"),
            })
        })
        .collect::<Vec<_>>();
    serde_json::json!({
        "id": id,
        "name": name,
        "owner": "Dev",
        "command": "make",
        "taskExecutions": executions,
    })
}
