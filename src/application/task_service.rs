use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::clock::{Clock, IdGenerator, SystemClock, UuidV4Generator};
use crate::domain::error::{ServiceError, StoreError};
use crate::domain::store::{FieldUpdates, TaskStore};
use crate::domain::task::{validate_description, validate_title, CreateTask, Task, TaskId, TaskStatus, UpdateTask};

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Caller-facing task operations. Absence is `None`/`false`, never an error.
#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn create(&self, input: CreateTask) -> Result<Task>;
    async fn find_all(&self) -> Result<Vec<Task>>;
    async fn find_one(&self, id: &TaskId) -> Result<Option<Task>>;
    async fn update(&self, id: &TaskId, patch: UpdateTask) -> Result<Option<Task>>;
    async fn remove(&self, id: &TaskId) -> Result<bool>;
}

pub struct TaskServiceImpl<S: TaskStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S: TaskStore> Clone for TaskServiceImpl<S> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), clock: self.clock.clone(), ids: self.ids.clone() }
    }
}

impl<S: TaskStore> TaskServiceImpl<S> {
    pub fn new(store: S) -> Self {
        Self::with_capabilities(store, Arc::new(SystemClock), Arc::new(UuidV4Generator))
    }

    pub fn with_capabilities(store: S, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store: Arc::new(store), clock, ids }
    }

    pub fn store(&self) -> &S { &self.store }
}

fn parse_status(raw: &str) -> std::result::Result<TaskStatus, ServiceError> {
    raw.parse::<TaskStatus>().map_err(ServiceError::from)
}

/// Validates every supplied field and turns the patch into store assignments.
fn build_field_updates(patch: UpdateTask, now: chrono::DateTime<chrono::Utc>) -> Result<FieldUpdates> {
    let title = patch.title.try_map(|t| validate_title(&t).map(|_| t))?;
    let description = patch.description.try_map(|d| match d {
        Some(d) => validate_description(&d).map(|_| Some(d)),
        None => Ok(None),
    })?;
    let status = patch.status.try_map(|s| parse_status(&s))?;
    Ok(FieldUpdates { title, description, status, updated_at: now })
}

fn log_store_failure(op: &'static str, err: &StoreError) {
    tracing::warn!(operation = op, error = %err, "task store call failed");
}

#[async_trait]
impl<S: TaskStore> TaskService for TaskServiceImpl<S> {
    async fn create(&self, input: CreateTask) -> Result<Task> {
        validate_title(&input.title)?;
        if let Some(description) = &input.description {
            validate_description(description)?;
        }
        let status = match input.status.as_deref() {
            Some(raw) => parse_status(raw)?,
            None => TaskStatus::default(),
        };

        let now = self.clock.now();
        let task = Task {
            id: self.ids.next_id(),
            title: input.title,
            description: input.description,
            status,
            created_at: now,
            updated_at: now,
        };
        self.store.put(&task).await.inspect_err(|e| log_store_failure("put", e))?;
        tracing::info!(id = %task.id, status = task.status.as_str(), "task created");
        Ok(task)
    }

    async fn find_all(&self) -> Result<Vec<Task>> {
        let tasks = self.store.scan_all().await.inspect_err(|e| log_store_failure("scan", e))?;
        tracing::debug!(count = tasks.len(), "tasks listed");
        Ok(tasks)
    }

    async fn find_one(&self, id: &TaskId) -> Result<Option<Task>> {
        let task = self.store.get_by_key(id).await.inspect_err(|e| log_store_failure("get", e))?;
        tracing::debug!(%id, found = task.is_some(), "task lookup");
        Ok(task)
    }

    async fn update(&self, id: &TaskId, patch: UpdateTask) -> Result<Option<Task>> {
        let updates = build_field_updates(patch, self.clock.now())?;
        match self.store.conditional_update(id, &updates).await {
            Ok(task) => {
                tracing::info!(%id, status_changed = updates.status.is_present(), "task updated");
                Ok(Some(task))
            }
            Err(StoreError::ConditionFailed) => {
                tracing::debug!(%id, "update target missing");
                Ok(None)
            }
            Err(e) => {
                log_store_failure("update", &e);
                Err(e.into())
            }
        }
    }

    async fn remove(&self, id: &TaskId) -> Result<bool> {
        match self.store.conditional_delete(id).await {
            Ok(()) => {
                tracing::info!(%id, "task removed");
                Ok(true)
            }
            Err(StoreError::ConditionFailed) => {
                tracing::debug!(%id, "delete target missing");
                Ok(false)
            }
            Err(e) => {
                log_store_failure("delete", &e);
                Err(e.into())
            }
        }
    }
}
