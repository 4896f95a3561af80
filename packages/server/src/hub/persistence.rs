//! Ordered, fire-and-forget message persistence.
//!
//! The hub hands every accepted message to a single writer task over a bounded
//! channel. One writer means saves reach the store in acceptance order, so the
//! history stays chronological; the bound caps how many saves can be pending.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::{ChatMessage, MessageStore};

/// Default number of messages waiting to be saved
pub const DEFAULT_PERSIST_CAPACITY: usize = 1024;

/// Hub-side handle of the writer task
#[derive(Debug, Clone)]
pub struct Persister {
    pending: mpsc::Sender<ChatMessage>,
}

impl Persister {
    /// Spawn the writer task. It saves until every `Persister` is dropped,
    /// finishing what is already queued.
    pub fn spawn(store: Arc<dyn MessageStore>, capacity: usize) -> Self {
        let (pending, mut queue) = mpsc::channel::<ChatMessage>(capacity.max(1));

        tokio::spawn(async move {
            while let Some(message) = queue.recv().await {
                let message_id = message.id;
                let room_id = message.room_id.clone();
                if let Err(error) = store.save(message).await {
                    tracing::error!(%room_id, %message_id, %error, "failed to persist message");
                }
            }
            tracing::debug!("persistence writer stopped");
        });

        Self { pending }
    }

    /// Queue `message` for saving without waiting. Dropped messages are logged.
    pub fn submit(&self, message: ChatMessage) {
        match self.pending.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                tracing::warn!(
                    room_id = %message.room_id,
                    message_id = %message.id,
                    "persistence queue full, message not saved"
                );
            }
            Err(TrySendError::Closed(message)) => {
                tracing::error!(
                    room_id = %message.room_id,
                    message_id = %message.id,
                    "persistence writer stopped, message not saved"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            MessageContent, MessageId, RoomId, Timestamp, UserId, Username,
            repository::MockMessageStore,
        },
        infrastructure::repository::InMemoryMessageStore,
    };
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    fn message(content: &str) -> ChatMessage {
        ChatMessage {
            id: MessageId::generate(),
            room_id: RoomId::new("lobby".to_string()).unwrap(),
            user_id: UserId::new("alice".to_string()).unwrap(),
            username: Username::or_anonymous(Some("Alice".to_string())),
            content: MessageContent::new(content.to_string()).unwrap(),
            sent_at: Timestamp::new(0),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_is_saved_in_submission_order() {
        // テスト項目: 連続して投入したメッセージが投入順に保存される（マルチスレッドランタイム）
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new(1000));
        let persister = Persister::spawn(store.clone(), 512);
        let expected: Vec<String> = (0..200).map(|i| format!("m{i}")).collect();

        // when (操作):
        for content in &expected {
            persister.submit(message(content));
        }
        let lobby = RoomId::new("lobby".to_string()).unwrap();
        let mut saved = Vec::new();
        for _ in 0..200 {
            saved = store.list_recent(&lobby, 1000).await.unwrap();
            if saved.len() == expected.len() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        // then (期待する結果):
        let contents: Vec<&str> = saved.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, expected);
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        // テスト項目: 保存待ちが上限に達すると呼び出し側を待たせずにメッセージを捨てる
        // given (前提条件):
        let saves = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&saves);
        let mut store = MockMessageStore::new();
        store.expect_save().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let persister = Persister::spawn(Arc::new(store), 2);

        // when (操作): 書き込みタスクが動く前に 10 件投入する
        for i in 0..10 {
            persister.submit(message(&format!("m{i}")));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        // then (期待する結果):
        assert_eq!(saves.load(Ordering::SeqCst), 2);
    }
}
