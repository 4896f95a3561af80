//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{
        get_room_messages, get_room_users, health_check, list_rooms, queue_email,
        websocket_handler,
    },
    state::AppState,
};

/// WebSocket chat relay server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(state, config.allowed_origins.clone());
/// server.run(&config.host, config.port, config.shutdown_grace).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    allowed_origins: Vec<String>,
}

impl Server {
    pub fn new(state: AppState, allowed_origins: Vec<String>) -> Self {
        Self {
            state: Arc::new(state),
            allowed_origins,
        }
    }

    /// Build the router with every route, CORS and request tracing
    pub fn router(&self) -> Router {
        let origins: Vec<HeaderValue> = self
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        let cors = CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/{room_id}/{user_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/rooms", get(list_rooms))
            .route("/rooms/{room_id}/users", get(get_room_users))
            .route("/rooms/{room_id}/messages", get(get_room_messages))
            .route("/queue-email", post(queue_email))
            .route("/health", get(health_check))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Serve on `listener` until the shutdown token of the state is cancelled.
    ///
    /// Open connections get at most `grace` to finish after that.
    pub async fn serve(self, listener: TcpListener, grace: Duration) -> std::io::Result<()> {
        let app = self.router();
        let shutdown = self.state.shutdown.clone();

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future();
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => return result,
            _ = shutdown.cancelled() => {}
        }

        match tokio::time::timeout(grace, &mut server).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(?grace, "connections still open after grace period, forcing exit");
                Ok(())
            }
        }
    }

    /// Bind to `host:port` and serve
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(
        self,
        host: &str,
        port: u16,
        grace: Duration,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("WebSocket endpoint: ws://{}/ws/{{room_id}}/{{user_id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, grace).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
