use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid record ID: {0}")]
    InvalidRecordId(String),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
