/*
[INPUT]:  Task fields collected by the client
[OUTPUT]: Upsert request body for PUT /tasks
[POS]:    Data layer - request types sent to the task service
[UPDATE]: When the upsert contract or field limits change
*/

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::models::Task;

/// Allowed length of `name`, in characters.
pub const NAME_LENGTH: RangeInclusive<usize> = 3..=100;
/// Allowed length of `owner`, in characters.
pub const OWNER_LENGTH: RangeInclusive<usize> = 2..=50;
/// Allowed length of `command`, in characters.
pub const COMMAND_LENGTH: RangeInclusive<usize> = 1..=500;

/// Body of the upsert request. Without `id` the server creates a task,
/// with `id` it updates the task identified by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub owner: String,
    pub command: String,
}

impl TaskInput {
    pub fn create(
        name: impl Into<String>,
        owner: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            owner: owner.into(),
            command: command.into(),
        }
    }

    pub fn update(
        id: impl Into<String>,
        name: impl Into<String>,
        owner: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::create(name, owner, command)
        }
    }

    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}

impl From<&Task> for TaskInput {
    fn from(task: &Task) -> Self {
        Self::update(&task.id, &task.name, &task.owner, &task.command)
    }
}
