/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskdeck-adapter tests

use taskdeck_adapter::{ClientConfig, TaskClient};
use wiremock::MockServer;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> TaskClient {
    TaskClient::with_config(ClientConfig::with_base_url(server.uri())).expect("client init")
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
