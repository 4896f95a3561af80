//! Read-only copy of the registry for callers outside the event loop.
//!
//! The hub republishes a room's snapshot after every mutation of that room.
//! Readers take the read lock only long enough to clone a snapshot, and the
//! hub takes the write lock only long enough to swap one in.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::domain::{MemberProfile, RoomId};

use super::registry::Room;

/// Point-in-time copy of one room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSnapshot {
    pub id: RoomId,
    pub name: String,
    /// Ordered by join sequence
    pub members: Vec<MemberProfile>,
}

impl RoomSnapshot {
    pub fn active_members(&self) -> usize {
        self.members.len()
    }
}

impl From<&Room> for RoomSnapshot {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id().clone(),
            name: room.name().to_string(),
            members: room.profiles(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistryView {
    rooms: Arc<RwLock<HashMap<RoomId, RoomSnapshot>>>,
}

impl RegistryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot of `room_id`; `None` removes the room
    pub(crate) fn publish(&self, room_id: &RoomId, snapshot: Option<RoomSnapshot>) {
        let mut rooms = self.rooms.write();
        match snapshot {
            Some(snapshot) => {
                rooms.insert(room_id.clone(), snapshot);
            }
            None => {
                rooms.remove(room_id);
            }
        }
    }

    pub(crate) fn clear(&self) {
        self.rooms.write().clear();
    }

    /// Snapshot of one room; `None` means nobody is connected to it
    pub fn room(&self, room_id: &RoomId) -> Option<RoomSnapshot> {
        self.rooms.read().get(room_id).cloned()
    }

    /// Snapshots of all live rooms, sorted by room id
    pub fn rooms(&self) -> Vec<RoomSnapshot> {
        let mut rooms: Vec<RoomSnapshot> = self.rooms.read().values().cloned().collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }
}
