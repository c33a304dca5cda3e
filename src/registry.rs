//! Room registry
//!
//! The name-to-room table, built once at startup and read-only afterwards.
//! Every lookup is an exact, case-sensitive match; nothing is ever inserted
//! or removed while the server runs, so the registry is shared as a plain
//! `Arc` with no locking.

use std::collections::BTreeMap;

use crate::error::AppError;
use crate::room::{Room, RoomHandle};

/// The static room table. Enumeration order is sorted by room name.
#[derive(Debug)]
pub struct Registry {
    rooms: BTreeMap<String, RoomHandle>,
}

impl Registry {
    /// Build the registry from the startup room-name list, spawning one
    /// broadcaster task per room. Duplicate names collapse to a single
    /// room. Fails if the list is empty.
    pub fn build<I, S>(names: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rooms = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            rooms
                .entry(name.to_string())
                .or_insert_with(|| Room::spawn(name));
        }
        if rooms.is_empty() {
            return Err(AppError::NoRooms);
        }
        Ok(Self { rooms })
    }

    /// Look up a room by exact name.
    pub fn lookup(&self, name: &str) -> Option<&RoomHandle> {
        self.rooms.get(name)
    }

    /// All rooms in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &RoomHandle> {
        self.rooms.values()
    }

    /// Number of rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
