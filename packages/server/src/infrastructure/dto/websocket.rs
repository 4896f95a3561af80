//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::RoomEvent;

/// A member as shown to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub room_id: String,
    /// Always true: only connected members are listed
    pub online: bool,
}

/// Frames sent from the server to clients, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Message {
        id: String,
        room_id: String,
        user_id: String,
        username: String,
        content: String,
        /// RFC 3339, UTC
        timestamp: String,
    },
    UserJoined {
        room_id: String,
        user_id: String,
        username: String,
        /// Members after the join, in join order
        data: Vec<UserDto>,
    },
    UserLeft {
        room_id: String,
        user_id: String,
        username: String,
        /// Members after the leave, in join order
        data: Vec<UserDto>,
    },
}

/// Frame sent from a client to the server.
///
/// Only `content` is read. Identity fields a client may add (`room_id`,
/// `user_id`, `username`) are ignored and taken from the session instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundFrame {
    #[serde(default)]
    pub content: String,
}

/// Serialize a room event into one text frame
pub fn encode_room_event(event: &RoomEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&OutboundMessage::from(event))
}

/// Decode a client frame (text or binary payload)
pub fn decode_inbound(payload: &[u8]) -> Result<InboundFrame, serde_json::Error> {
    serde_json::from_slice(payload)
}
