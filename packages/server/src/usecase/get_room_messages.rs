//! UseCase: ルームのメッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{
    ChatMessage, MessageStore, RoomId, repository::DEFAULT_HISTORY_LIMIT,
};

use super::error::GetRoomMessagesError;

/// メッセージ履歴取得のユースケース
pub struct GetRoomMessagesUseCase {
    /// MessageStore（データアクセス層の抽象化）
    store: Arc<dyn MessageStore>,
}

impl GetRoomMessagesUseCase {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// 直近 `limit` 件を古い順で返す
    pub async fn execute(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, GetRoomMessagesError> {
        let messages = self.store.list_recent(room_id, limit).await?;
        Ok(messages)
    }
}

/// Parse the `limit` query parameter; missing, unparsable or non-positive values
/// fall back to [`DEFAULT_HISTORY_LIMIT`]
pub fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|limit| *limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RepositoryError, repository::MockMessageStore};

    #[test]
    fn test_parse_limit() {
        // テスト項目: limit の解釈（不正値や 0 以下は既定値 50 になる）
        // given (前提条件):
        let cases = [
            (None, 50),
            (Some("10"), 10),
            (Some("0"), 50),
            (Some("-3"), 50),
            (Some("abc"), 50),
        ];

        for (raw, expected) in cases {
            // when (操作):
            let limit = parse_limit(raw);

            // then (期待する結果):
            assert_eq!(limit, expected, "raw = {raw:?}");
        }
    }

    #[tokio::test]
    async fn test_execute_passes_room_and_limit() {
        // テスト項目: ルーム ID と件数がそのままストアに渡される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_list_recent()
            .withf(|room_id, limit| room_id.as_str() == "lobby" && *limit == 20)
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let usecase = GetRoomMessagesUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase
            .execute(&RoomId::new("lobby".into()).unwrap(), 20)
            .await;

        // then (期待する結果):
        assert!(result.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_reported() {
        // テスト項目: ストアの失敗はエラーとして返される
        // given (前提条件):
        let mut store = MockMessageStore::new();
        store
            .expect_list_recent()
            .returning(|_, _| Err(RepositoryError::Unavailable("down".into())));
        let usecase = GetRoomMessagesUseCase::new(Arc::new(store));

        // when (操作):
        let result = usecase
            .execute(&RoomId::new("lobby".into()).unwrap(), 50)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(GetRoomMessagesError::Repository(_))));
    }
}
