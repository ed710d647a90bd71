use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::StoreError;
use super::patch::Patch;
use super::task::{Task, TaskId, TaskStatus};

/// Sparse set of assignments for one conditional update. Only `Present`
/// fields are written; `updated_at` is always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdates {
    pub title: Patch<String>,
    pub description: Patch<Option<String>>,
    pub status: Patch<TaskStatus>,
    pub updated_at: DateTime<Utc>,
}

impl FieldUpdates {
    pub fn touching_only_timestamp(updated_at: DateTime<Utc>) -> Self {
        Self { title: Patch::Absent, description: Patch::Absent, status: Patch::Absent, updated_at }
    }

    /// Applies the assignments to an in-memory copy of a task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Patch::Present(title) = &self.title { task.title = title.clone(); }
        if let Patch::Present(description) = &self.description { task.description = description.clone(); }
        if let Patch::Present(status) = &self.status { task.status = *status; }
        task.updated_at = self.updated_at;
    }
}

/// Storage adapter for tasks. Holds no business rules; conditional
/// operations must check existence and mutate atomically.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    async fn put(&self, task: &Task) -> Result<(), StoreError>;
    async fn get_by_key(&self, id: &TaskId) -> Result<Option<Task>, StoreError>;
    async fn scan_all(&self) -> Result<Vec<Task>, StoreError>;
    /// Fails with `StoreError::ConditionFailed` when `id` does not exist.
    async fn conditional_update(&self, id: &TaskId, updates: &FieldUpdates) -> Result<Task, StoreError>;
    /// Fails with `StoreError::ConditionFailed` when `id` does not exist.
    async fn conditional_delete(&self, id: &TaskId) -> Result<(), StoreError>;
}
