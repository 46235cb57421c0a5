//! og-core: Procedural office level generation
//!
//! This crate contains the whole generation pipeline with no I/O
//! dependencies. It is designed to be pure and testable: given the same
//! configuration, `Generator` always produces the same map, byte for
//! byte.
//!
//! The pipeline in order: `bsp` partitions the bounds, `rooms` carves a
//! room into each leaf, `classify` assigns functional classes, and
//! `corridors` routes the corridor network over `pathfind`. `tiles`
//! rasterizes the result for renderers; `generator` ties the stages
//! together.

pub mod bsp;
pub mod classify;
pub mod corridors;
pub mod error;
pub mod generator;
pub mod geometry;
pub mod map;
pub mod pathfind;
pub mod rng;
pub mod rooms;
pub mod tiles;

pub use bsp::{BspConfig, PartitionNode, SplitPreference};
pub use classify::{ClassifyConfig, DistributionRule};
pub use corridors::CorridorConfig;
pub use error::{ConnectivityReport, GenError, PathError, Warning};
pub use generator::{GenStage, Generated, GenerationConfig, GenerationObserver, Generator};
pub use geometry::{Dir, Pos, Rect, SplitAxis};
pub use map::{
    Corridor, CorridorId, CorridorKind, CorridorShape, Doorway, OfficeMap, Placement, Room,
    RoomClass, RoomId,
};
pub use rng::GenRng;
pub use rooms::RoomConfig;
pub use tiles::{rasterize, TileGrid, TileKind};
