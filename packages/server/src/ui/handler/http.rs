//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    domain::{EmailJob, RoomId},
    infrastructure::dto::{
        http::{
            ErrorDto, HealthDto, HistoryQuery, MessageDto, MessageResponseDto, QueueEmailRequest,
            RoomSummaryDto, RoomUsersDto,
        },
        websocket::UserDto,
    },
    ui::state::AppState,
    usecase::{QueueEmailError, get_room_messages::parse_limit},
};
use hiroma_shared::time::get_utc_timestamp_secs;

type ApiError = (StatusCode, Json<ErrorDto>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(ErrorDto::new(message)))
}

fn parse_room_id(room_id: String) -> Result<RoomId, ApiError> {
    RoomId::new(room_id).map_err(|_| api_error(StatusCode::BAD_REQUEST, "Invalid room id"))
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        message: "Hiroma chat server is running".to_string(),
        timestamp: get_utc_timestamp_secs(),
    })
}

/// Get list of live rooms
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.list_rooms_usecase.execute();

    // Domain Model から DTO への変換
    Json(rooms.iter().map(RoomSummaryDto::from).collect())
}

/// Get connected members of a room; an empty room is not an error
pub async fn get_room_users(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomUsersDto>, ApiError> {
    let room_id = parse_room_id(room_id)?;
    let members = state.get_room_members_usecase.execute(&room_id);

    let users: Vec<UserDto> = members.iter().map(UserDto::from).collect();
    Ok(Json(RoomUsersDto {
        room_id: room_id.into_string(),
        count: users.len(),
        users,
    }))
}

/// Get recent messages of a room, oldest first
pub async fn get_room_messages(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let room_id = parse_room_id(room_id)?;
    let limit = parse_limit(query.limit.as_deref());

    match state.get_room_messages_usecase.execute(&room_id, limit).await {
        Ok(messages) => Ok(Json(messages.into_iter().map(MessageDto::from).collect())),
        Err(error) => {
            tracing::error!(%room_id, %error, "failed to fetch messages");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch messages",
            ))
        }
    }
}

/// Queue an email job by hand
pub async fn queue_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueueEmailRequest>, JsonRejection>,
) -> Result<Json<MessageResponseDto>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(%rejection, "invalid email payload");
        api_error(StatusCode::BAD_REQUEST, "Invalid request payload")
    })?;

    let job = EmailJob {
        to: request.to,
        subject: request.subject,
        body: request.body,
    };
    match state.queue_email_usecase.execute(job) {
        Ok(()) => Ok(Json(MessageResponseDto {
            message: "Email queued successfully".to_string(),
        })),
        Err(QueueEmailError::MissingFields) => Err(api_error(
            StatusCode::BAD_REQUEST,
            "Missing required fields: to, subject, body",
        )),
        Err(QueueEmailError::Queue(error)) => {
            tracing::error!(%error, "failed to queue email");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to queue email",
            ))
        }
    }
}
