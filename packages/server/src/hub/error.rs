//! Hub error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HubError {
    /// The event loop has stopped (server shutting down)
    #[error("hub event loop is not running")]
    Closed,

    /// A room event could not be serialized for the wire
    #[error("failed to encode room event: {0}")]
    Encode(#[from] serde_json::Error),
}
