//! Presence notifier: membership snapshots carried by join/leave events.

use crate::domain::{MemberProfile, RoomEvent, RoomId};

use super::registry::RoomRegistry;

/// Current members of a room ordered by join sequence; empty if the room is absent
pub fn member_snapshot(registry: &RoomRegistry, room_id: &RoomId) -> Vec<MemberProfile> {
    registry
        .lookup_room(room_id)
        .map(|room| room.profiles())
        .unwrap_or_default()
}

/// `user_joined` event for `member`, or `None` if its room is not registered
pub fn joined(registry: &RoomRegistry, member: MemberProfile) -> Option<RoomEvent> {
    let members = member_snapshot(registry, &member.room_id);
    (!members.is_empty()).then_some(RoomEvent::UserJoined { member, members })
}

/// `user_left` event for `member`, or `None` when nobody is left to tell
pub fn left(registry: &RoomRegistry, member: MemberProfile) -> Option<RoomEvent> {
    let members = member_snapshot(registry, &member.room_id);
    (!members.is_empty()).then_some(RoomEvent::UserLeft { member, members })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ClientId, UserId, Username},
        hub::ClientHandle,
    };
    use tokio::sync::mpsc;

    fn profile(room: &str, user: &str) -> MemberProfile {
        MemberProfile {
            user_id: UserId::new(user.to_string()).unwrap(),
            username: Username::or_anonymous(Some(user.to_uppercase())),
            room_id: RoomId::new(room.to_string()).unwrap(),
        }
    }

    fn join(registry: &mut RoomRegistry, room: &str, user: &str) -> ClientId {
        let (outbound, _rx) = mpsc::channel(1);
        let client_id = ClientId::generate();
        registry.upsert_member(ClientHandle {
            client_id,
            profile: profile(room, user),
            outbound,
        });
        client_id
    }

    #[test]
    fn test_snapshot_of_absent_room_is_empty() {
        // テスト項目: 存在しないルームのスナップショットは空
        // given (前提条件):
        let registry = RoomRegistry::new();

        // when (操作):
        let members = member_snapshot(&registry, &RoomId::new("x".into()).unwrap());

        // then (期待する結果):
        assert!(members.is_empty());
    }

    #[test]
    fn test_joined_event_carries_current_members() {
        // テスト項目: 参加イベントは現在のメンバー一覧（参加順）を持つ
        // given (前提条件):
        let mut registry = RoomRegistry::new();
        join(&mut registry, "lobby", "a");
        join(&mut registry, "lobby", "b");

        // when (操作):
        let event = joined(&registry, profile("lobby", "b"));

        // then (期待する結果):
        match event {
            Some(RoomEvent::UserJoined { member, members }) => {
                assert_eq!(member.user_id.as_str(), "b");
                let ids: Vec<&str> = members.iter().map(|m| m.user_id.as_str()).collect();
                assert_eq!(ids, vec!["a", "b"]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_left_event_is_skipped_for_empty_room() {
        // テスト項目: 誰も残っていないルームには離脱イベントを作らない
        // given (前提条件):
        let registry = RoomRegistry::new();

        // when (操作):
        let event = left(&registry, profile("lobby", "a"));

        // then (期待する結果):
        assert!(event.is_none());
    }
}
