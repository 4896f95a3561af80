//! Fan-out of room events to member outbound buffers.

use axum::extract::ws::Utf8Bytes;
use tokio::sync::mpsc::error::TrySendError;

use crate::{domain::RoomEvent, infrastructure::dto::websocket::encode_room_event};

use super::{HubError, event::Departure, registry::RoomRegistry};

/// Serialize `event` once and enqueue it on every member of its room.
///
/// Never waits: a member whose buffer is full (too slow to keep up) or already
/// closed is returned as a [`Departure`] for the caller to evict. Every other
/// member receives the event. An absent room is a no-op.
pub fn broadcast(registry: &RoomRegistry, event: &RoomEvent) -> Result<Vec<Departure>, HubError> {
    let Some(room) = registry.lookup_room(event.room_id()) else {
        return Ok(Vec::new());
    };

    let payload = Utf8Bytes::from(encode_room_event(event)?);
    let mut evicted = Vec::new();

    for client in room.clients() {
        match client.outbound.try_send(payload.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!(
                    room_id = %room.id(),
                    user_id = %client.user_id(),
                    client_id = %client.client_id,
                    "outbound buffer full, disconnecting slow client"
                );
                evicted.push(departure_of(client));
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(
                    room_id = %room.id(),
                    user_id = %client.user_id(),
                    client_id = %client.client_id,
                    "outbound buffer already closed"
                );
                evicted.push(departure_of(client));
            }
        }
    }

    Ok(evicted)
}

fn departure_of(client: &super::ClientHandle) -> Departure {
    Departure {
        room_id: client.room_id().clone(),
        user_id: client.user_id().clone(),
        client_id: client.client_id,
    }
}
