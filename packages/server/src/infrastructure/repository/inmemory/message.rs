//! InMemory Message Store 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! ルームごとに VecDeque をリングバッファとして使用し、容量を超えた分は
//! 古いメッセージから破棄します。プロセス再起動で履歴は失われます。

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageStore, RepositoryError, RoomId};

/// Default number of messages retained per room
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// インメモリ Message Store 実装
pub struct InMemoryMessageStore {
    /// ルーム ID → 送信順のメッセージ
    rooms: Mutex<HashMap<RoomId, VecDeque<ChatMessage>>>,
    /// ルームごとの保持件数の上限
    capacity: usize,
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn save(&self, message: ChatMessage) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.lock().await;
        let history = rooms.entry(message.room_id.clone()).or_default();
        if history.len() >= self.capacity {
            history.pop_front();
        }
        history.push_back(message);
        Ok(())
    }

    async fn list_recent(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rooms = self.rooms.lock().await;
        let Some(history) = rooms.get(room_id) else {
            return Ok(Vec::new());
        };
        let skip = history.len().saturating_sub(limit);
        Ok(history.iter().skip(skip).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, MessageId, Timestamp, UserId, Username};

    fn message(room: &str, content: &str, at: i64) -> ChatMessage {
        ChatMessage {
            id: MessageId::generate(),
            room_id: RoomId::new(room.to_string()).unwrap(),
            user_id: UserId::new("alice".to_string()).unwrap(),
            username: Username::or_anonymous(Some("Alice".to_string())),
            content: MessageContent::new(content.to_string()).unwrap(),
            sent_at: Timestamp::new(at),
        }
    }

    fn contents(messages: &[ChatMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.content.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_recent_returns_latest_oldest_first() {
        // テスト項目: 直近 limit 件が古い順で返される
        // given (前提条件):
        let store = InMemoryMessageStore::default();
        for (i, text) in ["a", "b", "c", "d"].iter().enumerate() {
            store.save(message("lobby", text, i as i64)).await.unwrap();
        }

        // when (操作):
        let recent = store
            .list_recent(&RoomId::new("lobby".into()).unwrap(), 2)
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(contents(&recent), vec!["c", "d"]);
    }

    #[tokio::test]
    async fn test_unknown_room_is_empty() {
        // テスト項目: メッセージのないルームは空の履歴を返す
        // given (前提条件):
        let store = InMemoryMessageStore::default();
        store.save(message("lobby", "hi", 0)).await.unwrap();

        // when (操作):
        let recent = store
            .list_recent(&RoomId::new("other".into()).unwrap(), 50)
            .await
            .unwrap();

        // then (期待する結果):
        assert!(recent.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest() {
        // テスト項目: 保持件数を超えると古いメッセージから破棄される
        // given (前提条件):
        let store = InMemoryMessageStore::new(2);

        // when (操作):
        for (i, text) in ["a", "b", "c"].iter().enumerate() {
            store.save(message("lobby", text, i as i64)).await.unwrap();
        }

        // then (期待する結果):
        let recent = store
            .list_recent(&RoomId::new("lobby".into()).unwrap(), 50)
            .await
            .unwrap();
        assert_eq!(contents(&recent), vec!["b", "c"]);
    }
}
