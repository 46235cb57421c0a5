//! Room structure and semantic classification types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Dir, Pos, Rect};

/// Stable room identifier, assigned in creation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a class of room likes to sit relative to the map center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Scores higher near the map center.
    Center,
    /// Scores higher near the map edge.
    Edge,
    /// Indifferent to position.
    Any,
}

/// Semantic classification of a room.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum RoomClass {
    /// Not yet classified.
    #[default]
    Unassigned,
    /// Private office.
    Office,
    /// Open-plan workspace with desk clusters.
    OpenPlan,
    /// Conference room.
    Conference,
    /// Server room.
    ServerRoom,
    /// Break room / kitchenette.
    BreakRoom,
    /// Storage / supply closet.
    Storage,
    /// Reception area.
    Reception,
    /// Entrance lobby.
    Lobby,
    /// Executive office ("corner office").
    Executive,
    /// Utility / electrical room.
    Utility,
}

impl RoomClass {
    /// All classes, including `Unassigned`.
    pub const ALL: [RoomClass; 11] = [
        RoomClass::Unassigned,
        RoomClass::Office,
        RoomClass::OpenPlan,
        RoomClass::Conference,
        RoomClass::ServerRoom,
        RoomClass::BreakRoom,
        RoomClass::Storage,
        RoomClass::Reception,
        RoomClass::Lobby,
        RoomClass::Executive,
        RoomClass::Utility,
    ];

    /// Classes the classifier may assign.
    pub const ASSIGNABLE: [RoomClass; 10] = [
        RoomClass::Office,
        RoomClass::OpenPlan,
        RoomClass::Conference,
        RoomClass::ServerRoom,
        RoomClass::BreakRoom,
        RoomClass::Storage,
        RoomClass::Reception,
        RoomClass::Lobby,
        RoomClass::Executive,
        RoomClass::Utility,
    ];

    /// Preferred interior area band `(lo, hi)` in tiles. Rooms inside the
    /// band get a perfect size-fit score.
    pub fn preferred_area(self) -> (i64, i64) {
        match self {
            RoomClass::Unassigned => (0, i64::MAX),
            RoomClass::Office => (20, 60),
            RoomClass::OpenPlan => (80, 400),
            RoomClass::Conference => (40, 120),
            RoomClass::ServerRoom => (20, 80),
            RoomClass::BreakRoom => (25, 90),
            RoomClass::Storage => (6, 30),
            RoomClass::Reception => (40, 150),
            RoomClass::Lobby => (80, 300),
            RoomClass::Executive => (35, 100),
            RoomClass::Utility => (6, 25),
        }
    }

    /// Position preference relative to the map center.
    pub fn placement(self) -> Placement {
        match self {
            RoomClass::Lobby | RoomClass::Reception | RoomClass::OpenPlan => Placement::Center,
            RoomClass::ServerRoom
            | RoomClass::Storage
            | RoomClass::Utility
            | RoomClass::Executive => Placement::Edge,
            _ => Placement::Any,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RoomClass::Unassigned => "Unclassified room",
            RoomClass::Office => "Private office",
            RoomClass::OpenPlan => "Open-plan workspace",
            RoomClass::Conference => "Conference room",
            RoomClass::ServerRoom => "Server room",
            RoomClass::BreakRoom => "Break room",
            RoomClass::Storage => "Storage room",
            RoomClass::Reception => "Reception area",
            RoomClass::Lobby => "Entrance lobby",
            RoomClass::Executive => "Executive office",
            RoomClass::Utility => "Utility room",
        }
    }
}

/// A doorway on a room's boundary ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doorway {
    /// Grid position, on the owning room's boundary.
    pub pos: Pos,
    /// Direction leading out of the room.
    pub dir: Dir,
    /// Door width in tiles, at least 1.
    pub width: u32,
}

/// A generated room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub bounds: Rect,
    pub class: RoomClass,
    /// Rooms reachable through a single corridor. Kept symmetric by the
    /// map's mutation API.
    pub connections: BTreeSet<RoomId>,
    /// Doorways in creation order.
    pub doorways: Vec<Doorway>,
}

impl Room {
    pub fn new(id: RoomId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            class: RoomClass::Unassigned,
            connections: BTreeSet::new(),
            doorways: Vec::new(),
        }
    }

    pub fn center(&self) -> Pos {
        self.bounds.center()
    }

    pub fn area(&self) -> i64 {
        self.bounds.area()
    }

    pub fn is_connected_to(&self, other: RoomId) -> bool {
        self.connections.contains(&other)
    }

    /// Record a doorway. Positions off the boundary ring are rejected so
    /// the doorway invariant cannot be violated by a buggy router.
    pub fn add_doorway(&mut self, pos: Pos, dir: Dir, width: u32) -> bool {
        if !self.bounds.on_boundary(pos) {
            return false;
        }
        let doorway = Doorway {
            pos,
            dir,
            width: width.max(1),
        };
        if !self.doorways.contains(&doorway) {
            self.doorways.push(doorway);
        }
        true
    }
}
