//! The generated map: rooms, corridors, bounds, seed and spawn point.
//!
//! `OfficeMap` owns the room and corridor lists; the id lookup tables are
//! derived caches that can be rebuilt from the lists at any time (they are
//! skipped by serde and restored with `rebuild_index`). The mutation API
//! keeps the symmetric connection sets consistent and prunes corridors that
//! would dangle after a room removal.

mod corridor;
mod room;

pub use corridor::{
    Corridor, CorridorId, CorridorKind, CorridorShape, MAX_CORRIDOR_WIDTH, MIN_CORRIDOR_WIDTH,
};
pub use room::{Doorway, Placement, Room, RoomClass, RoomId};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Pos, Rect};

/// A generated office level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeMap {
    pub bounds: Rect,
    pub seed: u64,
    pub spawn: Pos,
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
    next_room_id: u32,
    next_corridor_id: u32,
    #[serde(skip)]
    room_index: HashMap<RoomId, usize>,
    #[serde(skip)]
    corridor_index: HashMap<CorridorId, usize>,
}

impl OfficeMap {
    /// Create an empty map with the given bounds and seed.
    pub fn new(bounds: Rect, seed: u64) -> Self {
        Self {
            bounds,
            seed,
            spawn: bounds.center(),
            rooms: Vec::new(),
            corridors: Vec::new(),
            next_room_id: 0,
            next_corridor_id: 0,
            room_index: HashMap::new(),
            corridor_index: HashMap::new(),
        }
    }

    /// Rebuild the id lookup tables from the owned lists. Required after
    /// deserialization.
    pub fn rebuild_index(&mut self) {
        self.room_index = self
            .rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id, i))
            .collect();
        self.corridor_index = self
            .corridors
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
    }

    /// Register a room and assign it the next sequential id.
    pub fn add_room(&mut self, bounds: Rect) -> RoomId {
        let id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        self.room_index.insert(id, self.rooms.len());
        self.rooms.push(Room::new(id, bounds));
        id
    }

    /// Remove a room, pruning corridors touching it and the symmetric
    /// connection entries on its neighbors.
    pub fn remove_room(&mut self, id: RoomId) -> Option<Room> {
        let idx = self.room_index.get(&id).copied()?;
        let room = self.rooms.remove(idx);
        self.corridors.retain(|c| !c.touches(id));
        for other in &mut self.rooms {
            other.connections.remove(&id);
        }
        self.rebuild_index();
        Some(room)
    }

    /// Register a corridor and connect its endpoint rooms. Self-loops and
    /// unknown endpoints are rejected.
    pub fn add_corridor(
        &mut self,
        rooms: (RoomId, RoomId),
        path: Vec<Pos>,
        width: u32,
        kind: CorridorKind,
    ) -> Option<CorridorId> {
        if rooms.0 == rooms.1 {
            return None;
        }
        if !self.room_index.contains_key(&rooms.0) || !self.room_index.contains_key(&rooms.1) {
            return None;
        }
        let id = CorridorId(self.next_corridor_id);
        self.next_corridor_id += 1;
        self.corridor_index.insert(id, self.corridors.len());
        self.corridors
            .push(Corridor::new(id, rooms, path, width, kind));
        self.connect_rooms(rooms.0, rooms.1);
        Some(id)
    }

    /// Remove a corridor. The connection entry between its endpoints is
    /// dropped unless another corridor still links them.
    pub fn remove_corridor(&mut self, id: CorridorId) -> Option<Corridor> {
        let idx = self.corridor_index.get(&id).copied()?;
        let corridor = self.corridors.remove(idx);
        let (a, b) = corridor.rooms;
        let still_linked = self.corridors.iter().any(|c| c.connects(a, b));
        if !still_linked {
            if let Some(room) = self.room_mut(a) {
                room.connections.remove(&b);
            }
            if let Some(room) = self.room_mut(b) {
                room.connections.remove(&a);
            }
        }
        self.rebuild_index();
        Some(corridor)
    }

    fn connect_rooms(&mut self, a: RoomId, b: RoomId) {
        if let Some(room) = self.room_mut(a) {
            room.connections.insert(b);
        }
        if let Some(room) = self.room_mut(b) {
            room.connections.insert(a);
        }
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.room_index.get(&id).map(|&i| &self.rooms[i])
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        let idx = self.room_index.get(&id).copied()?;
        Some(&mut self.rooms[idx])
    }

    pub fn corridor(&self, id: CorridorId) -> Option<&Corridor> {
        self.corridor_index.get(&id).map(|&i| &self.corridors[i])
    }

    pub fn corridor_mut(&mut self, id: CorridorId) -> Option<&mut Corridor> {
        let idx = self.corridor_index.get(&id).copied()?;
        Some(&mut self.corridors[idx])
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn corridor_count(&self) -> usize {
        self.corridors.len()
    }

    /// Room ids in ascending order.
    pub fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids
    }
}
