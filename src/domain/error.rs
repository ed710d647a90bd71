use thiserror::Error;

/// Input rejected before any store call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must be between 1 and 255 characters (got {len})")]
    TitleLength { len: usize },
    #[error("description must be at most 1000 characters (got {len})")]
    DescriptionTooLong { len: usize },
    #[error("status must be one of todo, in-progress, completed (got {0:?})")]
    UnknownStatus(String),
}

/// Errors reported by a `TaskStore` implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The item a conditional write targeted does not exist.
    #[error("condition check failed")]
    ConditionFailed,
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed item: {0}")]
    Malformed(String),
}

/// Errors surfaced by the task service. Absence is not one of them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("task store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("stored task is corrupt: {0}")]
    CorruptRecord(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConditionFailed => {
                ServiceError::StoreUnavailable("unexpected condition failure".to_string())
            }
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
            StoreError::Malformed(msg) => ServiceError::CorruptRecord(msg),
        }
    }
}
