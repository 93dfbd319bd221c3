/*
[INPUT]:  Open/edit intents, field edits, and save results from the store
[OUTPUT]: Create/edit form state machine with validation and submit outcomes
[POS]:    Workflow layer - task form controller
[UPDATE]: When field rules or the submit sequence change
*/

use std::ops::RangeInclusive;

use taskdeck_adapter::{
    COMMAND_LENGTH, FieldError, NAME_LENGTH, OWNER_LENGTH, Task, TaskError, TaskInput,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Create,
    /// Editing the task with this id; fields were copied at open time
    Edit { id: String },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }

    fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit { .. } => "update",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    Name,
    Owner,
    Command,
}

impl TaskField {
    pub const ALL: [TaskField; 3] = [TaskField::Name, TaskField::Owner, TaskField::Command];

    pub fn label(self) -> &'static str {
        match self {
            TaskField::Name => "Name",
            TaskField::Owner => "Owner",
            TaskField::Command => "Command",
        }
    }

    pub fn length(self) -> RangeInclusive<usize> {
        match self {
            TaskField::Name => NAME_LENGTH,
            TaskField::Owner => OWNER_LENGTH,
            TaskField::Command => COMMAND_LENGTH,
        }
    }

    /// Match a server-side field name.
    pub fn from_server_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "name" => Some(TaskField::Name),
            "owner" => Some(TaskField::Owner),
            "command" => Some(TaskField::Command),
            _ => None,
        }
    }

    fn next(self) -> Self {
        match self {
            TaskField::Name => TaskField::Owner,
            TaskField::Owner => TaskField::Command,
            TaskField::Command => TaskField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            TaskField::Name => TaskField::Command,
            TaskField::Owner => TaskField::Name,
            TaskField::Command => TaskField::Owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskFields {
    pub name: String,
    pub owner: String,
    pub command: String,
}

impl TaskFields {
    pub fn get(&self, field: TaskField) -> &str {
        match field {
            TaskField::Name => &self.name,
            TaskField::Owner => &self.owner,
            TaskField::Command => &self.command,
        }
    }

    fn get_mut(&mut self, field: TaskField) -> &mut String {
        match field {
            TaskField::Name => &mut self.name,
            TaskField::Owner => &mut self.owner,
            TaskField::Command => &mut self.command,
        }
    }

    /// Check every field; an empty result means the fields may be submitted.
    pub fn validate(&self) -> Vec<FieldViolation> {
        TaskField::ALL
            .into_iter()
            .filter_map(|field| validate_field(field, self.get(field)))
            .collect()
    }
}

impl From<&Task> for TaskFields {
    fn from(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            owner: task.owner.clone(),
            command: task.command.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: TaskField,
    pub message: String,
}

fn validate_field(field: TaskField, value: &str) -> Option<FieldViolation> {
    let message = if value.trim().is_empty() {
        format!("{} is required", field.label())
    } else {
        let range = field.length();
        let len = value.chars().count();
        if range.contains(&len) {
            return None;
        }
        format!(
            "{} must be between {} and {} characters",
            field.label(),
            range.start(),
            range.end()
        )
    };
    Some(FieldViolation { field, message })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("the task form is not open")]
    NotOpen,

    #[error("the task is already being saved")]
    AlreadySubmitting,

    #[error("{} invalid field(s)", .0.len())]
    Invalid(Vec<FieldViolation>),
}

/// Result of a completed save round trip.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Saved and closed; the caller refreshes the list
    Saved { task: Task, message: String },
    /// Save failed; the form is open again with its fields intact
    Failed { message: String, error: TaskError },
}

impl SubmitOutcome {
    pub fn message(&self) -> &str {
        match self {
            SubmitOutcome::Saved { message, .. } | SubmitOutcome::Failed { message, .. } => {
                message
            }
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

#[derive(Debug, Clone)]
pub struct FormController {
    phase: FormPhase,
    mode: FormMode,
    fields: TaskFields,
    focus: TaskField,
    violations: Vec<FieldViolation>,
    error: Option<String>,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    pub fn new() -> Self {
        Self {
            phase: FormPhase::Closed,
            mode: FormMode::Create,
            fields: TaskFields::default(),
            focus: TaskField::Name,
            violations: Vec::new(),
            error: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase != FormPhase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn fields(&self) -> &TaskFields {
        &self.fields
    }

    pub fn focus(&self) -> TaskField {
        self.focus
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn violation_for(&self, field: TaskField) -> Option<&str> {
        self.violations
            .iter()
            .find(|violation| violation.field == field)
            .map(|violation| violation.message.as_str())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create New Task",
            FormMode::Edit { .. } => "Edit Task",
        }
    }

    /// Open with blank fields. Ignored while a save is in flight.
    pub fn open_create(&mut self) {
        if self.is_submitting() {
            debug!("open ignored while submitting");
            return;
        }
        self.reset();
        self.phase = FormPhase::Open;
    }

    /// Open on a copy of the task's fields. Later changes to the task do not
    /// reach the form. Ignored while a save is in flight.
    pub fn open_edit(&mut self, task: &Task) {
        if self.is_submitting() {
            debug!(task_id = %task.id, "open ignored while submitting");
            return;
        }
        self.reset();
        self.mode = FormMode::Edit {
            id: task.id.clone(),
        };
        self.fields = TaskFields::from(task);
        self.phase = FormPhase::Open;
    }

    /// Discard the form. A submitting form only leaves through
    /// [`FormController::finish_submit`].
    pub fn close(&mut self) {
        if self.is_submitting() {
            debug!("close ignored while submitting");
            return;
        }
        self.reset();
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn editable(&self) -> bool {
        self.phase == FormPhase::Open
    }

    pub fn set_field(&mut self, field: TaskField, value: impl Into<String>) {
        if !self.editable() {
            return;
        }
        *self.fields.get_mut(field) = value.into();
        self.clear_violation(field);
    }

    pub fn push_char(&mut self, ch: char) {
        if !self.editable() {
            return;
        }
        self.fields.get_mut(self.focus).push(ch);
        self.clear_violation(self.focus);
    }

    pub fn pop_char(&mut self) {
        if !self.editable() {
            return;
        }
        self.fields.get_mut(self.focus).pop();
        self.clear_violation(self.focus);
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    fn clear_violation(&mut self, field: TaskField) {
        self.violations.retain(|violation| violation.field != field);
    }

    /// Run client-side validation and record violations for display.
    pub fn validate(&mut self) -> bool {
        self.violations = self.fields.validate();
        if let Some(first) = self.violations.first() {
            self.focus = first.field;
        }
        self.violations.is_empty()
    }

    /// Validate and move to `Submitting`, returning the request to send.
    /// Nothing is sent when validation fails.
    pub fn begin_submit(&mut self) -> Result<TaskInput, FormError> {
        match self.phase {
            FormPhase::Closed => return Err(FormError::NotOpen),
            FormPhase::Submitting => return Err(FormError::AlreadySubmitting),
            FormPhase::Open => {}
        }

        self.error = None;
        if !self.validate() {
            debug!(violations = self.violations.len(), "task form rejected locally");
            return Err(FormError::Invalid(self.violations.clone()));
        }

        let TaskFields {
            name,
            owner,
            command,
        } = self.fields.clone();
        let input = match &self.mode {
            FormMode::Create => TaskInput::create(name, owner, command),
            FormMode::Edit { id } => TaskInput::update(id.clone(), name, owner, command),
        };
        self.phase = FormPhase::Submitting;
        Ok(input)
    }

    /// Apply the save result: close on success, reopen with the error on
    /// failure. A result arriving when no submit is pending leaves the form
    /// untouched.
    pub fn finish_submit(&mut self, result: Result<Task, TaskError>) -> SubmitOutcome {
        let verb = self.mode.verb();
        let was_submitting = self.is_submitting();
        if !was_submitting {
            warn!(phase = ?self.phase, "save result arrived with no submit pending");
        }

        match result {
            Ok(task) => {
                let message = if self.mode.is_edit() {
                    "Task updated successfully".to_string()
                } else {
                    "Task created successfully".to_string()
                };
                info!(task_id = %task.id, action = verb, "task form saved");
                if was_submitting {
                    self.reset();
                }
                SubmitOutcome::Saved { task, message }
            }
            Err(error) => {
                let message = format!("Failed to {verb} task: {}", error.user_message());
                if was_submitting {
                    self.phase = FormPhase::Open;
                    self.violations = server_violations(error.field_errors());
                    if let Some(first) = self.violations.first() {
                        self.focus = first.field;
                    }
                    self.error = Some(message.clone());
                }
                SubmitOutcome::Failed { message, error }
            }
        }
    }

    /// Validate, save through the store, and apply the result.
    pub async fn submit(&mut self, store: &TaskStore) -> Result<SubmitOutcome, FormError> {
        let input = self.begin_submit()?;
        let result = store.save(input).await;
        Ok(self.finish_submit(result))
    }
}

fn server_violations(errors: &[FieldError]) -> Vec<FieldViolation> {
    errors
        .iter()
        .filter_map(|err| {
            TaskField::from_server_name(&err.field).map(|field| FieldViolation {
                field,
                message: err.message.clone(),
            })
        })
        .collect()
}
