//! Cloneable front door of the hub event loop.

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ClientId, MemberProfile};

use super::{
    HubError,
    event::{ClientHandle, Departure, HubEvent, InboundMessage, OutboundReceiver},
};

/// Sender side of the hub's event channel, shared by every session.
#[derive(Debug, Clone)]
pub struct HubHandle {
    events: mpsc::Sender<HubEvent>,
    outbound_capacity: usize,
}

/// What a session gets back from a successful join
#[derive(Debug)]
pub struct Registration {
    pub client_id: ClientId,
    /// Frames to write to this connection; closed when the hub drops the client
    pub outbound: OutboundReceiver,
}

impl HubHandle {
    pub(super) fn new(events: mpsc::Sender<HubEvent>, outbound_capacity: usize) -> Self {
        Self {
            events,
            outbound_capacity,
        }
    }

    /// Register a new connection and wait until the hub has inserted it.
    pub async fn join(&self, profile: MemberProfile) -> Result<Registration, HubError> {
        let client_id = ClientId::generate();
        let (outbound, receiver) = mpsc::channel(self.outbound_capacity);
        let (registered, ack) = oneshot::channel();

        self.events
            .send(HubEvent::Join {
                client: ClientHandle {
                    client_id,
                    profile,
                    outbound,
                },
                registered,
            })
            .await
            .map_err(|_| HubError::Closed)?;
        ack.await.map_err(|_| HubError::Closed)?;

        Ok(Registration {
            client_id,
            outbound: receiver,
        })
    }

    /// Tell the hub a connection is gone. A stopped hub needs no cleanup.
    pub async fn leave(&self, departure: Departure) {
        if self.events.send(HubEvent::Leave(departure)).await.is_err() {
            tracing::debug!("hub already stopped, skipping leave");
        }
    }

    /// Hand a chat frame to the hub for validation and broadcast
    pub async fn post(&self, message: InboundMessage) -> Result<(), HubError> {
        self.events
            .send(HubEvent::Message(message))
            .await
            .map_err(|_| HubError::Closed)
    }
}
