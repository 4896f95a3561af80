//! Domain error types.

use thiserror::Error;

/// Errors raised while constructing value objects
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// A required identifier was empty
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// Message content exceeded the character limit
    #[error("message content is too long ({actual} characters, max {max})")]
    ContentTooLong { max: usize, actual: usize },
}

/// Errors reported by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store could not be reached or refused the operation
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

/// Errors reported by the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The job queue is at capacity
    #[error("notification queue is full")]
    QueueFull,

    /// The job queue has been shut down
    #[error("notification queue is closed")]
    QueueClosed,

    /// A single delivery attempt failed
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// A single delivery attempt did not finish in time
    #[error("delivery timed out")]
    Timeout,
}
