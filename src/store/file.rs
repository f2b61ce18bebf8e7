use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::fs;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Task, TaskFields, TaskId, TaskStore};
use crate::error::TodoError;

/// One JSON file per owner under a fixed directory.
///
/// Every operation re-reads the owner's file and every mutation rewrites it in
/// full. A per-owner lock is held across the read-modify-write, and writes go
/// through a temp file plus rename.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the owner's collection file.
    pub fn path_for(&self, owner: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(owner)))
    }

    async fn lock(&self, owner: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(owner.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    async fn read(&self, owner: &str) -> Result<Vec<Task>, TodoError> {
        let bytes = match fs::read(self.path_for(owner)).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write(&self, owner: &str, tasks: &[Task]) -> Result<(), TodoError> {
        fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(owner);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(tasks)?;

        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &path).await?;

        tracing::debug!(owner, path = %path.display(), count = tasks.len(), "task file written");
        Ok(())
    }
}

/// Escapes everything outside `[a-z0-9_-]` so an owner name can never leave
/// the data directory. Uppercase letters are escaped too: `Alice` and `alice`
/// must not share a file on case-insensitive filesystems.
fn file_stem(owner: &str) -> String {
    let mut stem = String::with_capacity(owner.len());
    for byte in owner.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'_' || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("%{:02X}", byte));
        }
    }
    stem
}

fn position(tasks: &[Task], id: TaskId) -> Result<usize, TodoError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| TodoError::not_found(id))
}

impl TaskStore for FileStore {
    async fn list_all(&self, owner: &str) -> Result<Vec<Task>, TodoError> {
        let _guard = self.lock(owner).await;
        self.read(owner).await
    }

    async fn insert(&self, owner: &str, fields: TaskFields) -> Result<Task, TodoError> {
        let _guard = self.lock(owner).await;
        let mut tasks = self.read(owner).await?;

        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let task = Task::new(next_id, fields);
        tasks.push(task.clone());

        self.write(owner, &tasks).await?;
        Ok(task)
    }

    async fn get(&self, owner: &str, id: TaskId) -> Result<Task, TodoError> {
        let _guard = self.lock(owner).await;
        let tasks = self.read(owner).await?;
        let index = position(&tasks, id)?;
        Ok(tasks[index].clone())
    }

    async fn update(&self, owner: &str, id: TaskId, fields: TaskFields) -> Result<(), TodoError> {
        let _guard = self.lock(owner).await;
        let mut tasks = self.read(owner).await?;
        let index = position(&tasks, id)?;
        tasks[index].apply(fields);
        self.write(owner, &tasks).await
    }

    async fn toggle_done(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        let _guard = self.lock(owner).await;
        let mut tasks = self.read(owner).await?;
        let index = position(&tasks, id)?;
        tasks[index].done = !tasks[index].done;
        self.write(owner, &tasks).await
    }

    async fn delete(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        let _guard = self.lock(owner).await;
        let mut tasks = self.read(owner).await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);

        // no file churn for a missing id
        if tasks.len() == before {
            return Ok(());
        }
        self.write(owner, &tasks).await
    }
}
