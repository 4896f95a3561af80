//! Helpers shared by the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use hiroma_server::{
    config::SessionConfig,
    domain::{EmailJob, EmailSender, MemberProfile, NotificationError, RoomId, UserId, Username},
    hub::{Hub, HubConfig, HubDeps, HubHandle, OutboundReceiver, RegistryView},
    infrastructure::notification::{
        InMemorySubscriberDirectory, InProcessNotificationQueue, RetryPolicy, SubscriptionEntry,
    },
    infrastructure::repository::InMemoryMessageStore,
    ui::{Server, state::AppState},
    usecase::{
        GetRoomMembersUseCase, GetRoomMessagesUseCase, ListRoomsUseCase, QueueEmailUseCase,
    },
};
use hiroma_shared::time::SystemClock;
use tokio::{net::TcpListener, sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

pub const WAIT: Duration = Duration::from_secs(5);

/// Email sender that forwards every job to a channel
pub struct RecordingSender {
    sent: mpsc::UnboundedSender<EmailJob>,
}

impl RecordingSender {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EmailJob>) {
        let (sent, receiver) = mpsc::unbounded_channel();
        (Self { sent }, receiver)
    }
}

#[async_trait]
impl EmailSender for RecordingSender {
    async fn send(&self, job: &EmailJob) -> Result<(), NotificationError> {
        let _ = self.sent.send(job.clone());
        Ok(())
    }
}

/// A running hub with in-memory collaborators
pub struct TestHub {
    pub handle: HubHandle,
    pub view: RegistryView,
    pub store: Arc<InMemoryMessageStore>,
    pub subscribers: Arc<InMemorySubscriberDirectory>,
    pub emails: mpsc::UnboundedReceiver<EmailJob>,
    pub shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl TestHub {
    pub fn start(config: HubConfig) -> Self {
        Self::with_subscribers(config, Vec::new())
    }

    /// Start with a directory built from `room:user:address` entries
    pub fn with_subscribers(config: HubConfig, entries: Vec<SubscriptionEntry>) -> Self {
        let shutdown = CancellationToken::new();
        let store = Arc::new(InMemoryMessageStore::default());
        let subscribers = Arc::new(InMemorySubscriberDirectory::from_entries(entries));
        let (sender, emails) = RecordingSender::new();
        let notifications = Arc::new(InProcessNotificationQueue::spawn(
            Arc::new(sender),
            2,
            64,
            RetryPolicy::default(),
            shutdown.clone(),
        ));

        let (hub, handle) = Hub::new(
            HubDeps {
                store: store.clone(),
                notifications,
                offline: subscribers.clone(),
                clock: Arc::new(SystemClock),
            },
            config,
        );
        let view = hub.view();
        let task = tokio::spawn(hub.run(shutdown.clone()));

        Self {
            handle,
            view,
            store,
            subscribers,
            emails,
            shutdown,
            task,
        }
    }

    pub async fn stop(mut self) {
        self.shutdown.cancel();
        let _ = (&mut self.task).await;
    }
}

impl Drop for TestHub {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

pub fn profile(room_id: &str, user_id: &str, name: &str) -> MemberProfile {
    MemberProfile {
        user_id: user(user_id),
        username: Username::or_anonymous(Some(name.to_string())),
        room_id: room(room_id),
    }
}

/// Next frame of an outbound buffer as JSON; `None` when the buffer is closed
pub async fn next_frame(outbound: &mut OutboundReceiver) -> Option<serde_json::Value> {
    let frame = tokio::time::timeout(WAIT, outbound.recv())
        .await
        .expect("timed out waiting for a frame")?;
    Some(serde_json::from_str(frame.as_str()).unwrap())
}

/// A full server bound to an ephemeral port
pub struct TestServer {
    pub port: u16,
    pub store: Arc<InMemoryMessageStore>,
    pub shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl TestServer {
    pub async fn start(session: SessionConfig) -> Self {
        let shutdown = CancellationToken::new();
        let store = Arc::new(InMemoryMessageStore::default());
        let (sender, _emails) = RecordingSender::new();
        let notifications = Arc::new(InProcessNotificationQueue::spawn(
            Arc::new(sender),
            1,
            16,
            RetryPolicy::default(),
            shutdown.clone(),
        ));

        let (hub, handle) = Hub::new(
            HubDeps {
                store: store.clone(),
                notifications: notifications.clone(),
                offline: Arc::new(InMemorySubscriberDirectory::new()),
                clock: Arc::new(SystemClock),
            },
            HubConfig::default(),
        );
        let view = hub.view();
        tokio::spawn(hub.run(shutdown.clone()));

        let state = AppState {
            hub: handle,
            session,
            shutdown: shutdown.clone(),
            get_room_members_usecase: Arc::new(GetRoomMembersUseCase::new(view.clone())),
            list_rooms_usecase: Arc::new(ListRoomsUseCase::new(view)),
            get_room_messages_usecase: Arc::new(GetRoomMessagesUseCase::new(store.clone())),
            queue_email_usecase: Arc::new(QueueEmailUseCase::new(notifications)),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = Server::new(state, vec!["http://localhost:3000".to_string()]);
        let task = tokio::spawn(server.serve(listener, Duration::from_secs(2)));

        Self {
            port,
            store,
            shutdown,
            task,
        }
    }

    pub fn ws_url(&self, room_id: &str, user_id: &str) -> String {
        format!("ws://127.0.0.1:{}/ws/{}/{}", self.port, room_id, user_id)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Cancel the server and wait for it to finish
    pub async fn stop(mut self) -> std::io::Result<()> {
        self.shutdown.cancel();
        (&mut self.task).await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
