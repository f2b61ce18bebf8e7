//! Task persistence.
//!
//! Every backend implements [`TaskStore`] and keeps one task collection per
//! owner. Collections are never shared or merged between owners.

pub mod file;
pub mod memory;
pub mod postgres;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::TodoError;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type TaskId = i64;

// MODELS

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    #[serde(default)]
    pub due: String,
    #[serde(default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub done: bool,
}

/// The editable part of a task, already coerced from form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub description: String,
    pub due: String,
    pub duration_minutes: u32,
    pub cost: u32,
}

impl Task {
    pub fn new(id: TaskId, fields: TaskFields) -> Self {
        Self {
            id,
            description: fields.description,
            due: fields.due,
            duration_minutes: fields.duration_minutes,
            cost: fields.cost,
            done: false,
        }
    }

    pub fn apply(&mut self, fields: TaskFields) {
        self.description = fields.description;
        self.due = fields.due;
        self.duration_minutes = fields.duration_minutes;
        self.cost = fields.cost;
    }
}

/// Storage contract shared by all backends.
///
/// `get`, `update` and `toggle_done` fail with [`TodoError::NotFound`] when the
/// id is not in the owner's collection. `delete` of a missing id succeeds.
pub trait TaskStore: Send + Sync {
    fn list_all(&self, owner: &str) -> impl Future<Output = Result<Vec<Task>, TodoError>> + Send;

    fn insert(
        &self,
        owner: &str,
        fields: TaskFields,
    ) -> impl Future<Output = Result<Task, TodoError>> + Send;

    fn get(&self, owner: &str, id: TaskId) -> impl Future<Output = Result<Task, TodoError>> + Send;

    fn update(
        &self,
        owner: &str,
        id: TaskId,
        fields: TaskFields,
    ) -> impl Future<Output = Result<(), TodoError>> + Send;

    fn toggle_done(
        &self,
        owner: &str,
        id: TaskId,
    ) -> impl Future<Output = Result<(), TodoError>> + Send;

    fn delete(&self, owner: &str, id: TaskId) -> impl Future<Output = Result<(), TodoError>> + Send;
}

/// Backend chosen at startup.
pub enum Store {
    Memory(MemoryStore),
    File(FileStore),
    Postgres(PgStore),
}

impl Store {
    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::File(_) => "file",
            Store::Postgres(_) => "postgres",
        }
    }
}

impl TaskStore for Store {
    async fn list_all(&self, owner: &str) -> Result<Vec<Task>, TodoError> {
        match self {
            Store::Memory(s) => s.list_all(owner).await,
            Store::File(s) => s.list_all(owner).await,
            Store::Postgres(s) => s.list_all(owner).await,
        }
    }

    async fn insert(&self, owner: &str, fields: TaskFields) -> Result<Task, TodoError> {
        match self {
            Store::Memory(s) => s.insert(owner, fields).await,
            Store::File(s) => s.insert(owner, fields).await,
            Store::Postgres(s) => s.insert(owner, fields).await,
        }
    }

    async fn get(&self, owner: &str, id: TaskId) -> Result<Task, TodoError> {
        match self {
            Store::Memory(s) => s.get(owner, id).await,
            Store::File(s) => s.get(owner, id).await,
            Store::Postgres(s) => s.get(owner, id).await,
        }
    }

    async fn update(&self, owner: &str, id: TaskId, fields: TaskFields) -> Result<(), TodoError> {
        match self {
            Store::Memory(s) => s.update(owner, id, fields).await,
            Store::File(s) => s.update(owner, id, fields).await,
            Store::Postgres(s) => s.update(owner, id, fields).await,
        }
    }

    async fn toggle_done(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        match self {
            Store::Memory(s) => s.toggle_done(owner, id).await,
            Store::File(s) => s.toggle_done(owner, id).await,
            Store::Postgres(s) => s.toggle_done(owner, id).await,
        }
    }

    async fn delete(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        match self {
            Store::Memory(s) => s.delete(owner, id).await,
            Store::File(s) => s.delete(owner, id).await,
            Store::Postgres(s) => s.delete(owner, id).await,
        }
    }
}
