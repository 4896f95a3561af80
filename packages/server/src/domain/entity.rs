//! Entities.

use super::value_object::{MessageContent, MessageId, RoomId, Timestamp, UserId, Username};

/// Identity of a room member as shown in presence snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub user_id: UserId,
    pub username: Username,
    pub room_id: RoomId,
}

/// A chat message accepted by the hub.
///
/// `room_id`, `user_id` and `username` always come from the sender's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: Username,
    pub content: MessageContent,
    pub sent_at: Timestamp,
}
