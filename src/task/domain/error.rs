//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The priority lies outside the supported 1–5 range.
    #[error("invalid priority {0}, expected a value between 1 and 5")]
    InvalidPriority(i64),

    /// The due date does not follow `YYYY-MM-DD`.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The owner identifier is not a UUID.
    #[error("invalid owner identifier '{0}'")]
    InvalidOwner(String),
}
