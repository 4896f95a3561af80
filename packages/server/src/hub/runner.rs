//! Hub event loop.
//!
//! ハブはルームレジストリを所有する唯一のタスクです。参加・離脱・メッセージの
//! 各イベントを 1 つずつ最後まで処理してから次のイベントを取り出すため、
//! レジストリに対するロックは不要です。

use std::{
    collections::{HashSet, VecDeque},
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use hiroma_shared::time::Clock;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::domain::{
    ChatMessage, EmailJob, MessageContent, MessageId, MessageStore, NotificationQueue,
    OfflineRecipients, RoomEvent, RoomId, Timestamp, UserId,
};

use super::{
    HubError, broadcast,
    event::{ClientHandle, Departure, HubEvent, InboundMessage},
    handle::HubHandle,
    persistence::{DEFAULT_PERSIST_CAPACITY, Persister},
    presence,
    registry::RoomRegistry,
    view::{RegistryView, RoomSnapshot},
};

/// Collaborators the hub calls into
#[derive(Clone)]
pub struct HubDeps {
    pub store: Arc<dyn MessageStore>,
    pub notifications: Arc<dyn NotificationQueue>,
    pub offline: Arc<dyn OfflineRecipients>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Copy)]
pub struct HubConfig {
    /// Capacity of the hub's event channel
    pub event_capacity: usize,
    /// Capacity of each client's outbound buffer, in frames
    pub outbound_capacity: usize,
    /// Messages waiting for the persistence writer
    pub persist_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
            outbound_capacity: 256,
            persist_capacity: DEFAULT_PERSIST_CAPACITY,
        }
    }
}

pub struct Hub {
    registry: RoomRegistry,
    view: RegistryView,
    events: mpsc::Receiver<HubEvent>,
    evictions: VecDeque<Departure>,
    persister: Persister,
    deps: HubDeps,
}

impl Hub {
    /// Build the hub and spawn its persistence writer (needs a tokio runtime).
    pub fn new(deps: HubDeps, config: HubConfig) -> (Self, HubHandle) {
        let (sender, events) = mpsc::channel(config.event_capacity);
        let hub = Self {
            registry: RoomRegistry::new(),
            view: RegistryView::new(),
            events,
            evictions: VecDeque::new(),
            persister: Persister::spawn(Arc::clone(&deps.store), config.persist_capacity),
            deps,
        };
        (hub, HubHandle::new(sender, config.outbound_capacity))
    }

    /// Read path for callers outside the loop
    pub fn view(&self) -> RegistryView {
        self.view.clone()
    }

    /// Process events until `shutdown` is cancelled or every handle is dropped.
    ///
    /// On exit the registry is dropped, which closes every client's outbound
    /// buffer; sessions then flush what is queued and close their connection.
    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!("hub event loop started");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                event = self.events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
            }
        }

        let rooms = self.registry.room_count();
        self.view.clear();
        tracing::info!(rooms, "hub event loop stopped");
    }

    /// Handle one event completely, then any evictions it caused.
    ///
    /// Errors and panics stop at this boundary; the loop keeps running.
    fn dispatch(&mut self, event: HubEvent) {
        let kind = event.kind();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let handled = self.handle(event);
            self.drain_evictions();
            handled
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(error)) => tracing::error!(event = kind, %error, "failed to handle hub event"),
            Err(_) => tracing::error!(event = kind, "hub event handler panicked"),
        }
    }

    fn handle(&mut self, event: HubEvent) -> Result<(), HubError> {
        match event {
            HubEvent::Join { client, registered } => self.handle_join(client, registered),
            HubEvent::Leave(departure) => self.handle_leave(departure),
            HubEvent::Message(message) => self.handle_message(message),
        }
    }

    fn handle_join(
        &mut self,
        client: ClientHandle,
        registered: oneshot::Sender<()>,
    ) -> Result<(), HubError> {
        let profile = client.profile.clone();
        let client_id = client.client_id;
        let outcome = self.registry.upsert_member(client);

        if let Some(replaced) = outcome.replaced {
            // Dropping the old handle closes its buffer; that session winds down on its own
            tracing::info!(
                room_id = %profile.room_id,
                user_id = %profile.user_id,
                client_id = %replaced.client_id,
                "connection replaced by a newer one"
            );
        }

        if registered.send(()).is_err() {
            tracing::debug!(client_id = %client_id, "session gone before registration completed");
            self.registry
                .remove_member(&profile.room_id, &profile.user_id, client_id);
            self.publish(&profile.room_id);
            return Ok(());
        }
        self.publish(&profile.room_id);

        tracing::info!(
            room_id = %profile.room_id,
            user_id = %profile.user_id,
            client_id = %client_id,
            room_created = outcome.room_created,
            "client joined"
        );

        match presence::joined(&self.registry, profile) {
            Some(event) => self.broadcast(&event),
            None => Ok(()),
        }
    }

    fn handle_leave(&mut self, departure: Departure) -> Result<(), HubError> {
        let Some(removal) = self.registry.remove_member(
            &departure.room_id,
            &departure.user_id,
            departure.client_id,
        ) else {
            tracing::debug!(
                room_id = %departure.room_id,
                user_id = %departure.user_id,
                client_id = %departure.client_id,
                "leave for a connection that is not registered"
            );
            return Ok(());
        };
        self.publish(&departure.room_id);

        tracing::info!(
            room_id = %departure.room_id,
            user_id = %departure.user_id,
            client_id = %departure.client_id,
            room_closed = removal.room_closed,
            "client left"
        );

        let member = removal.client.profile.clone();
        drop(removal.client);

        if removal.room_closed {
            return Ok(());
        }
        match presence::left(&self.registry, member) {
            Some(event) => self.broadcast(&event),
            None => Ok(()),
        }
    }

    fn handle_message(&mut self, message: InboundMessage) -> Result<(), HubError> {
        let InboundMessage {
            client_id,
            profile,
            content,
        } = message;

        let is_current = self
            .registry
            .lookup_room(&profile.room_id)
            .is_some_and(|room| room.is_current(&profile.user_id, client_id));
        if !is_current {
            tracing::debug!(
                room_id = %profile.room_id,
                user_id = %profile.user_id,
                client_id = %client_id,
                "dropping message from a connection that is no longer registered"
            );
            return Ok(());
        }

        let content = match MessageContent::new(content) {
            Ok(content) => content,
            Err(error) => {
                tracing::warn!(
                    room_id = %profile.room_id,
                    user_id = %profile.user_id,
                    %error,
                    "dropping invalid message"
                );
                return Ok(());
            }
        };

        let message = ChatMessage {
            id: MessageId::generate(),
            room_id: profile.room_id,
            user_id: profile.user_id,
            username: profile.username,
            content,
            sent_at: Timestamp::new(self.deps.clock.now_millis()),
        };

        self.persister.submit(message.clone());
        self.notify_offline(&message);
        self.broadcast(&RoomEvent::Message(message))
    }

    fn notify_offline(&self, message: &ChatMessage) {
        let Some(room) = self.registry.lookup_room(&message.room_id) else {
            return;
        };
        let online: HashSet<UserId> = room.member_ids().cloned().collect();
        let recipients = self
            .deps
            .offline
            .offline_recipients(&message.room_id, &online);
        if recipients.is_empty() {
            return;
        }

        let subject = format!("New message in {}", room.name());
        let body = format!("{}: {}", message.username, message.content.as_str());
        for to in recipients {
            let job = EmailJob {
                to,
                subject: subject.clone(),
                body: body.clone(),
            };
            if let Err(error) = self.deps.notifications.enqueue(job) {
                tracing::warn!(room_id = %message.room_id, %error, "failed to queue notification");
            }
        }
    }

    fn broadcast(&mut self, event: &RoomEvent) -> Result<(), HubError> {
        let evicted = broadcast(&self.registry, event)?;
        self.evictions.extend(evicted);
        Ok(())
    }

    fn drain_evictions(&mut self) {
        while let Some(departure) = self.evictions.pop_front() {
            tracing::info!(
                room_id = %departure.room_id,
                user_id = %departure.user_id,
                client_id = %departure.client_id,
                "evicting client"
            );
            if let Err(error) = self.handle_leave(departure) {
                tracing::error!(%error, "failed to evict client");
            }
        }
    }

    fn publish(&self, room_id: &RoomId) {
        let snapshot = self.registry.lookup_room(room_id).map(RoomSnapshot::from);
        self.view.publish(room_id, snapshot);
    }
}
