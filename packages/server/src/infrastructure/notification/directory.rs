//! Room subscriptions used to pick notification recipients.

use std::{
    collections::{HashMap, HashSet},
    str::FromStr,
};

use parking_lot::RwLock;

use crate::domain::{OfflineRecipients, RoomId, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Subscription {
    user_id: UserId,
    address: String,
}

/// One `room:user:address` entry given on the command line or in `SUBSCRIBERS`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub address: String,
}

impl FromStr for SubscriptionEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(3, ':').map(str::trim);
        let (Some(room), Some(user), Some(address)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(format!("invalid subscriber '{s}' (expected room:user:address)"));
        };
        if !address.contains('@') {
            return Err(format!("invalid subscriber '{s}': '{address}' is not an email address"));
        }

        Ok(Self {
            room_id: RoomId::new(room.to_string()).map_err(|e| format!("invalid subscriber '{s}': {e}"))?,
            user_id: UserId::new(user.to_string()).map_err(|e| format!("invalid subscriber '{s}': {e}"))?,
            address: address.to_string(),
        })
    }
}

/// Subscribers of each room with their email address.
///
/// A subscriber counts as offline when their user id is not among the
/// room's connected members.
#[derive(Debug, Default)]
pub struct InMemorySubscriberDirectory {
    rooms: RwLock<HashMap<RoomId, Vec<Subscription>>>,
}

impl InMemorySubscriberDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-filled from configuration
    pub fn from_entries(entries: impl IntoIterator<Item = SubscriptionEntry>) -> Self {
        let directory = Self::new();
        for entry in entries {
            directory.subscribe(entry.room_id, entry.user_id, entry.address);
        }
        directory
    }

    /// Subscribe `user_id` to `room_id`, replacing any previous address
    pub fn subscribe(&self, room_id: RoomId, user_id: UserId, address: impl Into<String>) {
        let mut rooms = self.rooms.write();
        let subscriptions = rooms.entry(room_id).or_default();
        subscriptions.retain(|subscription| subscription.user_id != user_id);
        subscriptions.push(Subscription {
            user_id,
            address: address.into(),
        });
    }

    pub fn unsubscribe(&self, room_id: &RoomId, user_id: &UserId) {
        let mut rooms = self.rooms.write();
        if let Some(subscriptions) = rooms.get_mut(room_id) {
            subscriptions.retain(|subscription| &subscription.user_id != user_id);
            if subscriptions.is_empty() {
                rooms.remove(room_id);
            }
        }
    }
}

impl OfflineRecipients for InMemorySubscriberDirectory {
    fn offline_recipients(&self, room_id: &RoomId, online: &HashSet<UserId>) -> Vec<String> {
        self.rooms
            .read()
            .get(room_id)
            .map(|subscriptions| {
                subscriptions
                    .iter()
                    .filter(|subscription| !online.contains(&subscription.user_id))
                    .map(|subscription| subscription.address.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> RoomId {
        RoomId::new("lobby".into()).unwrap()
    }

    fn user(id: &str) -> UserId {
        UserId::new(id.into()).unwrap()
    }

    #[test]
    fn test_only_disconnected_subscribers_are_reported() {
        // テスト項目: 接続中のユーザーを除いた購読者のアドレスが返される
        // given (前提条件):
        let directory = InMemorySubscriberDirectory::new();
        directory.subscribe(room(), user("alice"), "alice@example.com");
        directory.subscribe(room(), user("bob"), "bob@example.com");
        let online = HashSet::from([user("alice")]);

        // when (操作):
        let recipients = directory.offline_recipients(&room(), &online);

        // then (期待する結果):
        assert_eq!(recipients, vec!["bob@example.com".to_string()]);
    }

    #[test]
    fn test_resubscribe_replaces_address() {
        // テスト項目: 同じユーザーの再購読はアドレスを置き換える
        // given (前提条件):
        let directory = InMemorySubscriberDirectory::new();
        directory.subscribe(room(), user("bob"), "old@example.com");

        // when (操作):
        directory.subscribe(room(), user("bob"), "new@example.com");

        // then (期待する結果):
        let recipients = directory.offline_recipients(&room(), &HashSet::new());
        assert_eq!(recipients, vec!["new@example.com".to_string()]);
    }

    #[test]
    fn test_empty_directory_reports_nobody() {
        // テスト項目: 購読者がいなければ誰にも通知しない
        // given (前提条件):
        let directory = InMemorySubscriberDirectory::new();
        directory.subscribe(room(), user("bob"), "bob@example.com");
        directory.unsubscribe(&room(), &user("bob"));

        // when (操作):
        let recipients = directory.offline_recipients(&room(), &HashSet::new());

        // then (期待する結果):
        assert!(recipients.is_empty());
    }

    #[test]
    fn test_entry_is_parsed() {
        // テスト項目: room:user:address 形式の購読設定が解析される
        // given (前提条件):
        let input = " lobby:carol:carol@example.com ";

        // when (操作):
        let entry: SubscriptionEntry = input.parse().unwrap();

        // then (期待する結果):
        assert_eq!(entry.room_id, room());
        assert_eq!(entry.user_id, user("carol"));
        assert_eq!(entry.address, "carol@example.com");
    }

    #[test]
    fn test_malformed_entries_are_rejected() {
        // テスト項目: 項目不足・空の ID・メールアドレスでない宛先は拒否される
        // given (前提条件):
        let inputs = ["lobby:carol", ":carol:carol@example.com", "lobby:carol:nobody"];

        // when (操作) / then (期待する結果):
        for input in inputs {
            assert!(input.parse::<SubscriptionEntry>().is_err(), "{input}");
        }
    }

    #[test]
    fn test_directory_from_entries_reports_offline_subscribers() {
        // テスト項目: 設定から作ったディレクトリがオフラインの購読者を返す
        // given (前提条件):
        let entries = vec![
            "lobby:alice:alice@example.com".parse().unwrap(),
            "lobby:carol:carol@example.com".parse().unwrap(),
        ];
        let directory = InMemorySubscriberDirectory::from_entries(entries);

        // when (操作):
        let online: HashSet<UserId> = [user("alice")].into_iter().collect();
        let recipients = directory.offline_recipients(&room(), &online);

        // then (期待する結果):
        assert_eq!(recipients, vec!["carol@example.com".to_string()]);
    }
}
