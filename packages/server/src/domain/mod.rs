//! Domain layer for the chat relay.
//!
//! Value objects, entities and the interfaces of the collaborators the hub
//! depends on. Nothing here knows about WebSocket, HTTP or JSON.

pub mod entity;
pub mod error;
pub mod event;
pub mod notification;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, MemberProfile};
pub use error::{NotificationError, RepositoryError, ValueObjectError};
pub use event::RoomEvent;
pub use notification::{EmailJob, EmailSender, NotificationQueue, OfflineRecipients};
pub use repository::MessageStore;
pub use value_object::{ClientId, MessageContent, MessageId, RoomId, Timestamp, UserId, Username};
