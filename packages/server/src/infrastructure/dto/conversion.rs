//! Conversion logic between DTOs and domain entities.

use hiroma_shared::time::timestamp_to_rfc3339;

use crate::{
    domain::{ChatMessage, MemberProfile, RoomEvent},
    hub::RoomSnapshot,
};

use super::{http, websocket as ws};

// ========================================
// Domain → WebSocket DTO
// ========================================

impl From<&MemberProfile> for ws::UserDto {
    fn from(member: &MemberProfile) -> Self {
        Self {
            id: member.user_id.to_string(),
            username: member.username.to_string(),
            room_id: member.room_id.to_string(),
            online: true,
        }
    }
}

fn users(members: &[MemberProfile]) -> Vec<ws::UserDto> {
    members.iter().map(ws::UserDto::from).collect()
}

impl From<&RoomEvent> for ws::OutboundMessage {
    fn from(event: &RoomEvent) -> Self {
        match event {
            RoomEvent::Message(message) => Self::Message {
                id: message.id.to_string(),
                room_id: message.room_id.to_string(),
                user_id: message.user_id.to_string(),
                username: message.username.to_string(),
                content: message.content.as_str().to_string(),
                timestamp: timestamp_to_rfc3339(message.sent_at.value()),
            },
            RoomEvent::UserJoined { member, members } => Self::UserJoined {
                room_id: member.room_id.to_string(),
                user_id: member.user_id.to_string(),
                username: member.username.to_string(),
                data: users(members),
            },
            RoomEvent::UserLeft { member, members } => Self::UserLeft {
                room_id: member.room_id.to_string(),
                user_id: member.user_id.to_string(),
                username: member.username.to_string(),
                data: users(members),
            },
        }
    }
}

// ========================================
// Domain → HTTP DTO
// ========================================

impl From<ChatMessage> for http::MessageDto {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            room_id: message.room_id.into_string(),
            user_id: message.user_id.into_string(),
            username: message.username.into_string(),
            content: message.content.into_string(),
            timestamp: timestamp_to_rfc3339(message.sent_at.value()),
        }
    }
}

impl From<&RoomSnapshot> for http::RoomSummaryDto {
    fn from(room: &RoomSnapshot) -> Self {
        Self {
            id: room.id.to_string(),
            name: room.name.clone(),
            active_users: room.active_members(),
        }
    }
}
