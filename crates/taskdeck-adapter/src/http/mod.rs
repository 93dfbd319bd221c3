/*
[INPUT]:  HTTP client configuration and task endpoints
[OUTPUT]: HTTP responses and typed task service results
[POS]:    HTTP layer - REST communication with the task service
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod tasks;

pub use error::{ErrorKind, Operation, Result, TaskError};

pub use client::{ClientConfig, DEFAULT_BASE_URL, TaskClient};
pub use tasks::ConnectionReport;
