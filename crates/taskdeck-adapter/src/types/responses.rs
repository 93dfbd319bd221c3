/*
[INPUT]:  Raw task service response bodies (success and failure)
[OUTPUT]: Decoding helpers for single-or-list payloads and error bodies
[POS]:    Data layer - response shapes that are not plain models
[UPDATE]: When the server changes its error or lookup body format
*/

use serde::Deserialize;
use serde_json::Value;

use super::models::Task;

/// `GET /tasks?id=` answers with either one task or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(Box<Task>),
    Many(Vec<Task>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<Task> {
        match self {
            OneOrMany::One(task) => vec![*task],
            OneOrMany::Many(tasks) => tasks,
        }
    }
}

/// A single rejected field reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Loosely-typed error body. Covers plain `{message}` / `{error}` bodies and
/// both map and list shapes of `errors`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
    #[serde(default)]
    task: Option<Task>,
}

impl ErrorBody {
    pub(crate) fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Best human-readable message: explicit message, then error label, then
    /// the raw body if it is short plain text.
    pub(crate) fn message(&self, raw: &str) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.error.clone())
            .filter(|msg| !msg.trim().is_empty())
            .or_else(|| {
                let raw = raw.trim();
                (!raw.is_empty() && !raw.starts_with('{') && raw.len() <= 200)
                    .then(|| raw.to_string())
            })
    }

    pub(crate) fn field_errors(&self) -> Vec<FieldError> {
        match &self.errors {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(field, message)| FieldError {
                    field: field.clone(),
                    message: value_text(message),
                })
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| {
                    let field = item.get("field")?.as_str()?.to_string();
                    let message = item
                        .get("defaultMessage")
                        .or_else(|| item.get("message"))
                        .map(value_text)
                        .unwrap_or_default();
                    Some(FieldError { field, message })
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Task attached to a failed execution, either nested under `task` or as
    /// the whole body.
    pub(crate) fn task(self, raw: &str) -> Option<Task> {
        self.task.or_else(|| serde_json::from_str::<Task>(raw).ok())
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
