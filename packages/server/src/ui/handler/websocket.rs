//! WebSocket connection handler.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    domain::{MemberProfile, RoomId, UserId, Username},
    infrastructure::dto::http::ConnectQuery,
    ui::{session, state::AppState},
};

/// `GET /ws/{room_id}/{user_id}?username=<name>`
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((room_id, user_id)): Path<(String, String)>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> RoomId / UserId (Domain Model)
    let room_id = RoomId::new(room_id).map_err(|error| {
        tracing::warn!(%error, "rejecting connection");
        StatusCode::BAD_REQUEST
    })?;
    let user_id = UserId::new(user_id).map_err(|error| {
        tracing::warn!(%error, "rejecting connection");
        StatusCode::BAD_REQUEST
    })?;

    let profile = MemberProfile {
        user_id,
        username: Username::or_anonymous(query.username),
        room_id,
    };
    tracing::debug!(
        room_id = %profile.room_id,
        user_id = %profile.user_id,
        username = %profile.username,
        "upgrading connection"
    );

    let limit = state.session.max_frame_bytes;
    Ok(ws
        .max_message_size(limit)
        .max_frame_size(limit)
        .on_upgrade(move |socket| session::run(socket, profile, state)))
}
