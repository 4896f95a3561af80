//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::UserDto;

/// `GET /rooms/{room_id}/users`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomUsersDto {
    pub room_id: String,
    pub users: Vec<UserDto>,
    pub count: usize,
}

/// One entry of `GET /rooms`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummaryDto {
    pub id: String,
    pub name: String,
    pub active_users: usize,
}

/// One entry of `GET /rooms/{room_id}/messages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageDto {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    /// RFC 3339, UTC
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthDto {
    pub status: String,
    pub message: String,
    /// Unix seconds
    pub timestamp: i64,
}

/// Body of `POST /queue-email`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueEmailRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDto {
    pub error: String,
}

impl ErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponseDto {
    pub message: String,
}

/// Query of the WebSocket upgrade route
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectQuery {
    pub username: Option<String>,
}

/// Query of the history route; `limit` stays a string so junk falls back to the default
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}
