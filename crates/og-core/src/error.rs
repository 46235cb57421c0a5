//! Error taxonomy for the generation pipeline.
//!
//! Three tiers, reported through different channels:
//! - caller-contract violations are `GenError` and fail fast;
//! - generation-quality issues are handled by documented fallbacks and
//!   surface as `Warning`s;
//! - connectivity failures are carried in `ConnectivityReport` values so
//!   callers can decide to retry with another seed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::{CorridorId, RoomClass, RoomId};

/// Hard errors: invalid input or configuration. Never produced by
/// in-bounds generation randomness.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenError {
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("map bounds {width}x{height} too small for min partition size {min_partition_size}")]
    BoundsTooSmall {
        width: i32,
        height: i32,
        min_partition_size: i32,
    },

    #[error("unknown room id {0}")]
    UnknownRoom(RoomId),

    #[error("override assigns {class} to room {room}, but {class} is not in the allowed set")]
    OverrideNotAllowed { room: RoomId, class: RoomClass },
}

/// Pathfinding failures. Out-of-grid endpoints are a caller error and
/// reported distinctly from an honest "no path exists".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    #[error("start or goal outside the grid")]
    OutOfBounds,

    #[error("no path between start and goal")]
    NoPath,
}

/// Soft findings collected during generation. Never fatal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// A corridor route could not be found; the connection was skipped.
    CorridorUnrouted { from: RoomId, to: RoomId },
    /// A corridor narrower than the configured secondary width.
    NarrowCorridor { corridor: CorridorId, width: u32 },
    /// A room ended up with no doorways.
    DoorlessRoom(RoomId),
    /// A class with a distribution target received no rooms.
    ClassTargetMissed(RoomClass),
    /// A BSP leaf was too small to hold a room and was skipped.
    LeafSkipped { width: i32, height: i32 },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::CorridorUnrouted { from, to } => {
                write!(f, "no route found between rooms {from} and {to}")
            }
            Warning::NarrowCorridor { corridor, width } => {
                write!(f, "corridor {corridor} is suspiciously narrow (width {width})")
            }
            Warning::DoorlessRoom(id) => write!(f, "room {id} has no doorways"),
            Warning::ClassTargetMissed(class) => {
                write!(f, "no rooms were assigned the targeted class {class}")
            }
            Warning::LeafSkipped { width, height } => {
                write!(f, "partition leaf {width}x{height} too small for a room, skipped")
            }
        }
    }
}

/// Result of the reachability check over the room graph. A failed check
/// is a value, not an error: partial connectivity is meaningful to a
/// caller that may regenerate with a new seed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    /// True when every room is reachable from every other.
    pub fully_connected: bool,
    /// Rooms unreachable from the traversal origin, ascending id.
    pub unreachable: Vec<RoomId>,
    /// Human-readable explanations for each failure.
    pub errors: Vec<String>,
}

impl ConnectivityReport {
    pub fn connected() -> Self {
        Self {
            fully_connected: true,
            unreachable: Vec::new(),
            errors: Vec::new(),
        }
    }
}
