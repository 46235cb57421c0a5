//! Corridor structure and derived shape classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Pos;

use super::RoomId;

/// Corridor width bounds. Widths outside this range are clamped at
/// construction time.
pub const MIN_CORRIDOR_WIDTH: u32 = 1;
pub const MAX_CORRIDOR_WIDTH: u32 = 5;

/// Stable corridor identifier, assigned in creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CorridorId(pub u32);

impl fmt::Display for CorridorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a corridor came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum CorridorKind {
    /// MST backbone segment between core rooms.
    Primary,
    /// Connector from a leaf room to the backbone.
    Secondary,
    /// Added by the connectivity repair pass.
    Repair,
}

/// Shape classification derived from the number of direction changes
/// along the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum CorridorShape {
    Straight,
    LShaped,
    ZShaped,
    Complex,
}

/// A corridor between two distinct rooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    pub id: CorridorId,
    /// The two connected room ids. Never equal.
    pub rooms: (RoomId, RoomId),
    /// Tile path from the first room's boundary to the second's. Each
    /// consecutive pair differs by exactly one axis-aligned step.
    pub path: Vec<Pos>,
    /// Width in tiles, clamped to `[MIN_CORRIDOR_WIDTH, MAX_CORRIDOR_WIDTH]`.
    pub width: u32,
    pub kind: CorridorKind,
}

impl Corridor {
    pub fn new(
        id: CorridorId,
        rooms: (RoomId, RoomId),
        path: Vec<Pos>,
        width: u32,
        kind: CorridorKind,
    ) -> Self {
        Self {
            id,
            rooms,
            path,
            width: width.clamp(MIN_CORRIDOR_WIDTH, MAX_CORRIDOR_WIDTH),
            kind,
        }
    }

    /// Path length in tiles.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn connects(&self, a: RoomId, b: RoomId) -> bool {
        (self.rooms.0 == a && self.rooms.1 == b) || (self.rooms.0 == b && self.rooms.1 == a)
    }

    pub fn touches(&self, room: RoomId) -> bool {
        self.rooms.0 == room || self.rooms.1 == room
    }

    /// The opposite endpoint, if `room` is one of the two.
    pub fn other_end(&self, room: RoomId) -> Option<RoomId> {
        if self.rooms.0 == room {
            Some(self.rooms.1)
        } else if self.rooms.1 == room {
            Some(self.rooms.0)
        } else {
            None
        }
    }

    /// Number of direction changes along the path.
    pub fn turns(&self) -> usize {
        if self.path.len() < 3 {
            return 0;
        }
        self.path
            .windows(3)
            .filter(|w| {
                let d1 = (w[1].x - w[0].x, w[1].y - w[0].y);
                let d2 = (w[2].x - w[1].x, w[2].y - w[1].y);
                d1 != d2
            })
            .count()
    }

    /// Shape classification from the turn count: 0 turns is straight,
    /// 1 is an L, 2 a Z, anything more is complex.
    pub fn shape(&self) -> CorridorShape {
        match self.turns() {
            0 => CorridorShape::Straight,
            1 => CorridorShape::LShaped,
            2 => CorridorShape::ZShaped,
            _ => CorridorShape::Complex,
        }
    }

    /// Check the path invariants: contiguous single steps, no revisits,
    /// no self-loop endpoints.
    pub fn is_well_formed(&self) -> bool {
        if self.rooms.0 == self.rooms.1 {
            return false;
        }
        if self.path.windows(2).any(|w| !w[0].is_adjacent(w[1])) {
            return false;
        }
        let mut seen = std::collections::HashSet::with_capacity(self.path.len());
        self.path.iter().all(|p| seen.insert(*p))
    }
}
