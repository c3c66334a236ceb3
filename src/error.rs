use axum::extract::rejection::JsonRejection;
use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    LockError(String),
    DuplicateId(String),
}

impl std::error::Error for StoreError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StoreError::*;
        match self {
            LockError(s) => write!(f, "LockError: {}", s),
            DuplicateId(s) => write!(f, "DuplicateId: {}", s),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("StoreError: {}", crate::unpack_error(.0))]
    Store(#[source] StoreError),
    #[error("{0}")]
    InvalidBody(#[from] JsonRejection),
}

impl HandlerError {
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerError::Store(StoreError::LockError(_)) => "store.lock_poisoned",
            HandlerError::Store(StoreError::DuplicateId(_)) => "store.duplicate_id",
            HandlerError::InvalidBody(_) => "entity.parse.failed",
        }
    }
}

impl From<StoreError> for HandlerError {
    fn from(error: StoreError) -> Self {
        HandlerError::Store(error)
    }
}
