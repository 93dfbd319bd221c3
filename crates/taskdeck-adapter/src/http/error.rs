/*
[INPUT]:  Transport failures and non-success task service responses
[OUTPUT]: Normalized TaskError kinds with user-facing messages
[POS]:    Error handling layer - the only error type leaving the adapter
[UPDATE]: When the server error format or the error taxonomy changes
*/

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::responses::ErrorBody;
use crate::types::{FieldError, Task};

/// Which task service operation produced a response.
///
/// Normalization depends on it: a 5xx from the execute endpoint means the
/// command failed to run, not that the service is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListTasks,
    GetTask,
    FindTasks,
    Upsert,
    Delete,
    Execute,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::ListTasks => "list tasks",
            Operation::GetTask => "get task",
            Operation::FindTasks => "find tasks",
            Operation::Upsert => "save task",
            Operation::Delete => "delete task",
            Operation::Execute => "execute task",
        }
    }
}

/// Normalized error kinds. Higher layers branch on these, never on status
/// codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Validation,
    Server,
    Execution,
    Unknown,
}

/// Main error type for task service operations
#[derive(Error, Debug, Clone)]
pub enum TaskError {
    /// No response reached the client
    #[error("task service unreachable: {message}")]
    Network { message: String },

    /// Target task does not exist (404)
    #[error("not found: {message}")]
    NotFound { message: String },

    /// Server rejected the input
    #[error("validation failed: {message}")]
    Validation {
        message: String,
        field_errors: Vec<FieldError>,
    },

    /// Server-side failure (5xx)
    #[error("server error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// The command failed to run; `task` holds the updated task when the
    /// server sent it back
    #[error("execution failed: {message}")]
    Execution {
        message: String,
        task: Option<Box<Task>>,
    },

    /// Anything else, including undecodable responses
    #[error("unexpected error: {message}")]
    Unknown { message: String },
}

impl TaskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TaskError::Network { .. } => ErrorKind::Network,
            TaskError::NotFound { .. } => ErrorKind::NotFound,
            TaskError::Validation { .. } => ErrorKind::Validation,
            TaskError::Server { .. } => ErrorKind::Server,
            TaskError::Execution { .. } => ErrorKind::Execution,
            TaskError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        TaskError::Unknown {
            message: message.into(),
        }
    }

    /// Field errors attached to a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            TaskError::Validation { field_errors, .. } => field_errors,
            _ => &[],
        }
    }

    /// Task state the server returned alongside a failed execution.
    pub fn execution_task(&self) -> Option<&Task> {
        match self {
            TaskError::Execution { task, .. } => task.as_deref(),
            _ => None,
        }
    }

    /// Message suitable for a status line.
    pub fn user_message(&self) -> String {
        match self {
            TaskError::Network { .. } => {
                "Cannot reach the task service. Check that the backend is running.".to_string()
            }
            TaskError::NotFound { .. } => {
                "The task no longer exists. Refresh the list.".to_string()
            }
            TaskError::Validation {
                message,
                field_errors,
            } => {
                if field_errors.is_empty() {
                    format!("Invalid input: {message}")
                } else {
                    let fields = field_errors
                        .iter()
                        .map(|err| format!("{}: {}", err.field, err.message))
                        .collect::<Vec<_>>()
                        .join("; ");
                    format!("Invalid input: {fields}")
                }
            }
            TaskError::Execution { message, .. } => format!("Task execution failed: {message}"),
            TaskError::Server { .. } | TaskError::Unknown { .. } => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Normalize a transport-level failure.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            TaskError::Network {
                message: err.to_string(),
            }
        } else {
            TaskError::Unknown {
                message: err.to_string(),
            }
        }
    }

    /// Normalize a non-success response.
    pub(crate) fn from_status(operation: Operation, status: StatusCode, body: &str) -> Self {
        let parsed = ErrorBody::parse(body);
        let message = parsed.message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });

        if status == StatusCode::NOT_FOUND {
            return TaskError::NotFound { message };
        }

        if status.is_server_error() {
            if operation == Operation::Execute {
                return TaskError::Execution {
                    message,
                    task: parsed.task(body).map(Box::new),
                };
            }
            return TaskError::Server {
                status: status.as_u16(),
                message,
            };
        }

        if status.is_client_error() {
            let field_errors = parsed.field_errors();
            let is_validation = status == StatusCode::BAD_REQUEST
                || status == StatusCode::UNPROCESSABLE_ENTITY
                || !field_errors.is_empty();
            if is_validation {
                return TaskError::Validation {
                    message,
                    field_errors,
                };
            }
        }

        TaskError::Unknown {
            message: format!("{} (status {})", message, status.as_u16()),
        }
    }
}

impl From<url::ParseError> for TaskError {
    fn from(err: url::ParseError) -> Self {
        TaskError::Unknown {
            message: format!("invalid url: {err}"),
        }
    }
}

/// Result type alias for task service operations
pub type Result<T> = std::result::Result<T, TaskError>;
