//! Repository trait 定義
//!
//! ハブが必要とするメッセージ履歴ストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{ChatMessage, RepositoryError, RoomId};

/// Default number of messages returned by a history request
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Message history store.
///
/// The hub calls [`MessageStore::save`] fire-and-forget for every accepted
/// chat message; a failure is logged and never reaches the sender.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message
    async fn save(&self, message: ChatMessage) -> Result<(), RepositoryError>;

    /// Up to `limit` most recent messages of a room, oldest first
    async fn list_recent(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;
}
