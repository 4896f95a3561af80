//! Room-based WebSocket chat relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroma-server
//! cargo run --bin hiroma-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroma_server::{
    config::{Args, ServerConfig},
    hub::{Hub, HubDeps},
    infrastructure::{
        notification::{
            DEFAULT_QUEUE_CAPACITY, InMemorySubscriberDirectory, InProcessNotificationQueue,
            LogEmailSender,
        },
        repository::InMemoryMessageStore,
    },
    ui::{Server, signal::shutdown_signal, state::AppState},
    usecase::{
        GetRoomMembersUseCase, GetRoomMessagesUseCase, ListRoomsUseCase, QueueEmailUseCase,
    },
};
use hiroma_shared::{logger::setup_logger, time::SystemClock};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() {
    // .env is optional
    let dotenv = dotenvy::dotenv();

    let args = Args::parse();
    setup_logger(env!("CARGO_BIN_NAME"), "info", args.log_format);
    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let config = match ServerConfig::try_from(args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize dependencies in order:
    // 1. Collaborators (store, notification queue, subscriber directory)
    // 2. Hub event loop
    // 3. UseCases
    // 4. AppState
    // 5. Server
    let shutdown = CancellationToken::new();

    // 1. Collaborators
    let store = Arc::new(InMemoryMessageStore::new(config.history_capacity));
    let notifications = Arc::new(InProcessNotificationQueue::spawn(
        Arc::new(LogEmailSender),
        config.notification_workers,
        DEFAULT_QUEUE_CAPACITY,
        config.retry,
        shutdown.clone(),
    ));
    let subscribers = Arc::new(InMemorySubscriberDirectory::from_entries(
        config.subscribers.iter().cloned(),
    ));
    tracing::info!(subscribers = config.subscribers.len(), "subscriber directory loaded");

    // 2. Hub
    let (hub, hub_handle) = Hub::new(
        HubDeps {
            store: store.clone(),
            notifications: notifications.clone(),
            offline: subscribers,
            clock: Arc::new(SystemClock),
        },
        config.hub,
    );
    let view = hub.view();
    let hub_task = tokio::spawn(hub.run(shutdown.clone()));

    // 3. UseCases
    let get_room_members_usecase = Arc::new(GetRoomMembersUseCase::new(view.clone()));
    let list_rooms_usecase = Arc::new(ListRoomsUseCase::new(view));
    let get_room_messages_usecase = Arc::new(GetRoomMessagesUseCase::new(store));
    let queue_email_usecase = Arc::new(QueueEmailUseCase::new(notifications));

    // 4. AppState
    let state = AppState {
        hub: hub_handle,
        session: config.session,
        shutdown: shutdown.clone(),
        get_room_members_usecase,
        list_rooms_usecase,
        get_room_messages_usecase,
        queue_email_usecase,
    };

    // Cancel everything on SIGINT/SIGTERM
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    // 5. Run the server
    let server = Server::new(state, config.allowed_origins.clone());
    let result = server
        .run(&config.host, config.port, config.shutdown_grace)
        .await;

    shutdown.cancel();
    if let Err(e) = hub_task.await {
        tracing::error!("Hub task failed: {}", e);
    }

    if let Err(e) = result {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
