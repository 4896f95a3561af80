//! Notification collaborator interfaces.
//!
//! Email notifications for room subscribers who are not connected are an
//! advisory side effect of a chat message: nothing here may block or fail
//! delivery to the room.

use std::collections::HashSet;

use async_trait::async_trait;

use super::{NotificationError, RoomId, UserId};

/// One email to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailJob {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Asynchronous job queue owning delivery, retry and timeout.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationQueue: Send + Sync {
    /// Accept a job for later delivery without waiting for it
    fn enqueue(&self, job: EmailJob) -> Result<(), NotificationError>;
}

/// Performs a single delivery attempt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, job: &EmailJob) -> Result<(), NotificationError>;
}

/// Decides which addresses should be notified of a message in a room.
#[cfg_attr(test, mockall::automock)]
pub trait OfflineRecipients: Send + Sync {
    /// Addresses of the room's subscribers that are not in `online`
    fn offline_recipients(&self, room_id: &RoomId, online: &HashSet<UserId>) -> Vec<String>;
}
