//! Request handlers.

mod http;
mod websocket;

pub use http::{get_room_messages, get_room_users, health_check, list_rooms, queue_email};
pub use websocket::websocket_handler;
