//! Error types for the terminal client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL or connection parameters are unusable
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// The server refused the handshake (e.g. empty room or user id)
    #[error("Connection rejected by server: {0}")]
    Rejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
