//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use hiroma_server::domain::value_object::MAX_CONTENT_CHARS;
use url::Url;

use crate::error::ClientError;

/// Why an input line is not sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRejection {
    Empty,
    TooLong { chars: usize },
    /// The encoded frame would exceed the server's frame limit
    FrameTooLarge { bytes: usize, max: usize },
}

/// Default frame limit of the server, in bytes
pub const DEFAULT_MAX_FRAME_BYTES: usize = 512;

/// Check if the client should exit immediately based on the error type.
///
/// Rejected handshakes and bad URLs will not get better by retrying.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Rejected(_) | ClientError::InvalidUrl(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Trim an input line, check it against the server's limits and encode it as
/// a chat frame: `{"type":"message","content":...}`
pub fn prepare_input(line: &str, max_frame_bytes: usize) -> Result<String, InputRejection> {
    let line = line.trim();
    if line.is_empty() {
        return Err(InputRejection::Empty);
    }
    let chars = line.chars().count();
    if chars > MAX_CONTENT_CHARS {
        return Err(InputRejection::TooLong { chars });
    }

    let frame = serde_json::json!({ "type": "message", "content": line }).to_string();
    if frame.len() > max_frame_bytes {
        return Err(InputRejection::FrameTooLarge {
            bytes: frame.len(),
            max: max_frame_bytes,
        });
    }
    Ok(frame)
}

/// Build `{base}/{room}/{user}?username=<name>` with proper escaping
pub fn connection_url(
    base: &str,
    room_id: &str,
    user_id: &str,
    username: Option<&str>,
) -> Result<Url, ClientError> {
    let mut url = Url::parse(base).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push(room_id)
        .push(user_id);
    if let Some(username) = username {
        url.query_pairs_mut().append_pair("username", username);
    }
    Ok(url)
}
