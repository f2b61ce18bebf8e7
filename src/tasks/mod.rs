//! Task operations shared by every backend.
//!
//! Handlers never talk to a store directly: form input is coerced here and
//! stored tasks come back as [`TaskView`]s with their display strings filled in.

pub mod format;

use serde::Deserialize;

use crate::error::TodoError;
use crate::store::{Task, TaskFields, TaskId, TaskStore};

pub use format::{cost_label, duration_label, normalize_due_date, TaskView};

/// Raw task form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub due: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub cost: String,
}

impl TaskInput {
    /// Numeric fields that do not parse as a non-negative integer become 0.
    pub fn into_fields(self) -> TaskFields {
        TaskFields {
            description: self.task,
            due: self.due,
            duration_minutes: coerce_amount(&self.duration),
            cost: coerce_amount(&self.cost),
        }
    }
}

/// Lenient integer parse: `"30"` is 30, `""`, `"-5"` and `"abc"` are 0.
pub fn coerce_amount(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}

/// Parses a task id from form or query text.
pub fn parse_task_id(raw: &str) -> Option<TaskId> {
    raw.trim().parse().ok()
}

pub struct TaskService<S> {
    store: S,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn list(&self, owner: &str) -> Result<Vec<TaskView>, TodoError> {
        let tasks = self.store.list_all(owner).await?;
        Ok(tasks.into_iter().map(TaskView::from).collect())
    }

    pub async fn add(&self, owner: &str, input: TaskInput) -> Result<Task, TodoError> {
        let task = self.store.insert(owner, input.into_fields()).await?;
        tracing::info!(owner, task_id = task.id, "task created");
        Ok(task)
    }

    pub async fn get(&self, owner: &str, id: TaskId) -> Result<TaskView, TodoError> {
        let task = self.store.get(owner, id).await?;
        Ok(task.into())
    }

    pub async fn update(&self, owner: &str, id: TaskId, input: TaskInput) -> Result<(), TodoError> {
        self.store.update(owner, id, input.into_fields()).await?;
        tracing::info!(owner, task_id = id, "task updated");
        Ok(())
    }

    pub async fn toggle(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        self.store.toggle_done(owner, id).await?;
        tracing::info!(owner, task_id = id, "task toggled");
        Ok(())
    }

    pub async fn delete(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        self.store.delete(owner, id).await?;
        tracing::info!(owner, task_id = id, "task deleted");
        Ok(())
    }
}
