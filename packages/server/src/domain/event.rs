//! Events delivered to the members of a room.

use super::{
    entity::{ChatMessage, MemberProfile},
    value_object::RoomId,
};

/// Everything the hub broadcasts is one of these, scoped to exactly one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomEvent {
    /// A chat message posted to the room
    Message(ChatMessage),
    /// `member` joined; `members` is the membership after the join
    UserJoined {
        member: MemberProfile,
        members: Vec<MemberProfile>,
    },
    /// `member` left; `members` is the membership after the leave
    UserLeft {
        member: MemberProfile,
        members: Vec<MemberProfile>,
    },
}

impl RoomEvent {
    /// The room this event belongs to
    pub fn room_id(&self) -> &RoomId {
        match self {
            Self::Message(message) => &message.room_id,
            Self::UserJoined { member, .. } | Self::UserLeft { member, .. } => &member.room_id,
        }
    }
}
