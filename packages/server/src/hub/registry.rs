//! Room registry: rooms and the clients connected to them.
//!
//! Pure data. Mutated only by the hub event loop, so no locking happens here.
//! Invariant: every room present in the registry has at least one member.

use std::collections::HashMap;

use crate::domain::{ClientId, MemberProfile, RoomId, UserId};

use super::event::ClientHandle;

#[derive(Debug)]
struct Member {
    client: ClientHandle,
    joined_seq: u64,
}

/// A room and its members, keyed by user id (at most one client per user).
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    name: String,
    members: HashMap<UserId, Member>,
}

impl Room {
    fn new(id: RoomId) -> Self {
        // The display name defaults to the identifier
        let name = id.as_str().to_string();
        Self {
            id,
            name,
            members: HashMap::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of connected members
    pub fn active_members(&self) -> usize {
        self.members.len()
    }

    /// Connected clients, in no particular order
    pub fn clients(&self) -> impl Iterator<Item = &ClientHandle> {
        self.members.values().map(|member| &member.client)
    }

    /// User ids of the connected members
    pub fn member_ids(&self) -> impl Iterator<Item = &UserId> {
        self.members.keys()
    }

    /// Whether `client_id` is the registered connection for `user_id`
    pub fn is_current(&self, user_id: &UserId, client_id: ClientId) -> bool {
        self.members
            .get(user_id)
            .is_some_and(|member| member.client.client_id == client_id)
    }

    /// Member profiles ordered by join sequence
    pub fn profiles(&self) -> Vec<MemberProfile> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by_key(|member| member.joined_seq);
        members
            .into_iter()
            .map(|member| member.client.profile.clone())
            .collect()
    }
}

/// Result of [`RoomRegistry::upsert_member`]
#[derive(Debug)]
pub struct UpsertOutcome {
    /// The room did not exist before this join
    pub room_created: bool,
    /// Previous connection of the same user, no longer referenced by the registry
    pub replaced: Option<ClientHandle>,
}

/// Result of [`RoomRegistry::remove_member`]
#[derive(Debug)]
pub struct Removal {
    pub client: ClientHandle,
    /// The room became empty and was removed from the registry
    pub room_closed: bool,
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
    next_join_seq: u64,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `client` into its room, creating the room if needed.
    ///
    /// Last writer wins: an existing entry for the same user id is replaced
    /// and handed back to the caller.
    pub fn upsert_member(&mut self, client: ClientHandle) -> UpsertOutcome {
        let room_id = client.room_id().clone();
        let user_id = client.user_id().clone();

        let room_created = !self.rooms.contains_key(&room_id);
        let room = self
            .rooms
            .entry(room_id.clone())
            .or_insert_with(|| Room::new(room_id));

        self.next_join_seq += 1;
        let replaced = room
            .members
            .insert(
                user_id,
                Member {
                    client,
                    joined_seq: self.next_join_seq,
                },
            )
            .map(|member| member.client);

        UpsertOutcome {
            room_created,
            replaced,
        }
    }

    /// Remove `user_id` from `room_id` if its entry belongs to `client_id`.
    ///
    /// Returns `None` (a no-op) when the room, the user or the connection does
    /// not match. Deletes the room when its last member leaves.
    pub fn remove_member(
        &mut self,
        room_id: &RoomId,
        user_id: &UserId,
        client_id: ClientId,
    ) -> Option<Removal> {
        let room = self.rooms.get_mut(room_id)?;
        if !room.is_current(user_id, client_id) {
            return None;
        }

        let member = room.members.remove(user_id)?;
        let room_closed = room.members.is_empty();
        if room_closed {
            self.rooms.remove(room_id);
        }

        Some(Removal {
            client: member.client,
            room_closed,
        })
    }

    pub fn lookup_room(&self, room_id: &RoomId) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Clients of a room; empty when the room is absent
    pub fn list_members(&self, room_id: &RoomId) -> Vec<&ClientHandle> {
        self.rooms
            .get(room_id)
            .map(|room| room.clients().collect())
            .unwrap_or_default()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }
}
