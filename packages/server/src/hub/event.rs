//! Inputs of the hub event loop.

use axum::extract::ws::Utf8Bytes;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{ClientId, MemberProfile, RoomId, UserId};

/// Producer side of a client's outbound buffer (serialized frames, shared between members)
pub type OutboundSender = mpsc::Sender<Utf8Bytes>;
/// Consumer side of a client's outbound buffer, drained by the session
pub type OutboundReceiver = mpsc::Receiver<Utf8Bytes>;

/// The registry's reference to one live connection.
///
/// The registry holds the only [`OutboundSender`]; dropping this handle closes
/// the client's outbound buffer.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    pub client_id: ClientId,
    pub profile: MemberProfile,
    pub outbound: OutboundSender,
}

impl ClientHandle {
    pub fn room_id(&self) -> &RoomId {
        &self.profile.room_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.profile.user_id
    }
}

/// A connection leaving its room (teardown or eviction)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub client_id: ClientId,
}

/// A chat frame read by a session, stamped with the session's identity
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub client_id: ClientId,
    pub profile: MemberProfile,
    /// Raw text; validated by the hub
    pub content: String,
}

/// Everything the hub event loop reacts to
#[derive(Debug)]
pub enum HubEvent {
    Join {
        client: ClientHandle,
        registered: oneshot::Sender<()>,
    },
    Leave(Departure),
    Message(InboundMessage),
}

impl HubEvent {
    /// Short name used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave(_) => "leave",
            Self::Message(_) => "message",
        }
    }
}
