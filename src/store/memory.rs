use std::collections::HashMap;

use tokio::sync::Mutex;

use super::{Task, TaskFields, TaskId, TaskStore};
use crate::error::TodoError;

#[derive(Debug, Default)]
struct Collection {
    last_id: TaskId,
    tasks: Vec<Task>,
}

impl Collection {
    fn position(&self, id: TaskId) -> Result<usize, TodoError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TodoError::not_found(id))
    }
}

/// Process-local store. Nothing survives a restart, ids included.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    async fn list_all(&self, owner: &str) -> Result<Vec<Task>, TodoError> {
        let collections = self.collections.lock().await;
        Ok(collections
            .get(owner)
            .map(|c| c.tasks.clone())
            .unwrap_or_default())
    }

    async fn insert(&self, owner: &str, fields: TaskFields) -> Result<Task, TodoError> {
        let mut collections = self.collections.lock().await;
        let collection = collections.entry(owner.to_string()).or_default();
        collection.last_id += 1;
        let task = Task::new(collection.last_id, fields);
        collection.tasks.push(task.clone());
        Ok(task)
    }

    async fn get(&self, owner: &str, id: TaskId) -> Result<Task, TodoError> {
        let collections = self.collections.lock().await;
        collections
            .get(owner)
            .and_then(|c| c.tasks.iter().find(|t| t.id == id))
            .cloned()
            .ok_or_else(|| TodoError::not_found(id))
    }

    async fn update(&self, owner: &str, id: TaskId, fields: TaskFields) -> Result<(), TodoError> {
        let mut collections = self.collections.lock().await;
        let collection = collections
            .get_mut(owner)
            .ok_or_else(|| TodoError::not_found(id))?;
        let index = collection.position(id)?;
        collection.tasks[index].apply(fields);
        Ok(())
    }

    async fn toggle_done(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        let mut collections = self.collections.lock().await;
        let collection = collections
            .get_mut(owner)
            .ok_or_else(|| TodoError::not_found(id))?;
        let index = collection.position(id)?;
        let task = &mut collection.tasks[index];
        task.done = !task.done;
        Ok(())
    }

    async fn delete(&self, owner: &str, id: TaskId) -> Result<(), TodoError> {
        let mut collections = self.collections.lock().await;
        if let Some(collection) = collections.get_mut(owner) {
            collection.tasks.retain(|t| t.id != id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(description: &str) -> TaskFields {
        TaskFields {
            description: description.to_string(),
            due: "2025-12-12".to_string(),
            duration_minutes: 30,
            cost: 500,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids_in_insertion_order() {
        let store = MemoryStore::new();
        let a = store.insert("alice", fields("a")).await.unwrap();
        let b = store.insert("alice", fields("b")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(!b.done);

        let listed = store.list_all("alice").await.unwrap();
        let names: Vec<_> = listed.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_owners_are_isolated() {
        let store = MemoryStore::new();
        let task = store.insert("alice", fields("secret")).await.unwrap();

        assert!(store.list_all("bob").await.unwrap().is_empty());
        assert!(matches!(
            store.get("bob", task.id).await,
            Err(TodoError::NotFound(_))
        ));
        assert!(matches!(
            store.toggle_done("bob", task.id).await,
            Err(TodoError::NotFound(_))
        ));
        store.delete("bob", task.id).await.unwrap();
        assert_eq!(store.list_all("alice").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryStore::new();
        let first = store.insert("alice", fields("a")).await.unwrap();
        store.delete("alice", first.id).await.unwrap();
        let second = store.insert("alice", fields("b")).await.unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_update_missing_leaves_collection_unchanged() {
        let store = MemoryStore::new();
        store.insert("alice", fields("a")).await.unwrap();
        let before = store.list_all("alice").await.unwrap();

        let result = store.update("alice", 99, fields("changed")).await;

        assert!(matches!(result, Err(TodoError::NotFound(_))));
        assert_eq!(store.list_all("alice").await.unwrap(), before);
    }
}
