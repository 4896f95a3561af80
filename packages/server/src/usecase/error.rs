//! UseCase error types.

use thiserror::Error;

use crate::domain::{NotificationError, RepositoryError};

/// メッセージ履歴取得のエラー
#[derive(Debug, Error)]
pub enum GetRoomMessagesError {
    #[error("failed to fetch messages: {0}")]
    Repository(#[from] RepositoryError),
}

/// メール送信ジョブ投入のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueEmailError {
    /// to / subject / body のいずれかが空
    #[error("missing required fields: to, subject, body")]
    MissingFields,

    #[error("failed to queue email: {0}")]
    Queue(#[from] NotificationError),
}
