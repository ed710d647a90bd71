use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::{
    error::StoreError,
    store::{FieldUpdates, TaskStore},
    task::{Task, TaskId},
};

/// Process-local task store. Existence checks and mutations happen under a
/// single lock acquisition, matching the backend's per-key atomicity.
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    items: Arc<Mutex<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> Result<usize, StoreError> { Ok(self.lock()?.len()) }

    pub fn is_empty(&self) -> Result<bool, StoreError> { Ok(self.lock()?.is_empty()) }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TaskId, Task>>, StoreError> {
        self.items.lock().map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".into()))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn put(&self, task: &Task) -> Result<(), StoreError> {
        self.lock()?.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn get_by_key(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    async fn conditional_update(&self, id: &TaskId, updates: &FieldUpdates) -> Result<Task, StoreError> {
        let mut map = self.lock()?;
        let task = map.get_mut(id).ok_or(StoreError::ConditionFailed)?;
        updates.apply_to(task);
        Ok(task.clone())
    }

    async fn conditional_delete(&self, id: &TaskId) -> Result<(), StoreError> {
        self.lock()?.remove(id).map(|_| ()).ok_or(StoreError::ConditionFailed)
    }
}
