//! og-save: Save/restore for generated office maps
//!
//! Maps are stored as JSON with a small versioned header so old files
//! are rejected cleanly instead of deserializing into garbage. Loading
//! rebuilds the map's id lookup tables, which are not serialized.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use og_core::OfficeMap;

/// Current map file format version
pub const MAP_VERSION: u32 = 1;

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Map file not found")]
    NotFound,

    #[error("Incompatible map version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid map file header")]
    InvalidHeader,
}

/// Map file header for versioning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapHeader {
    /// Magic identifier
    pub magic: String,
    /// Map format version
    pub version: u32,
    /// Seed the map was generated from
    pub seed: u64,
    /// Map width in tiles
    pub width: i32,
    /// Map height in tiles
    pub height: i32,
    /// Room count, for listings without a full parse
    pub rooms: usize,
    /// Timestamp of save
    pub timestamp: u64,
}

impl MapHeader {
    const MAGIC: &'static str = "OGMAP";

    pub fn new(map: &OfficeMap) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: MAP_VERSION,
            seed: map.seed,
            width: map.bounds.width,
            height: map.bounds.height,
            rooms: map.room_count(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != MAP_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: MAP_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete map file structure
#[derive(Serialize, Deserialize)]
pub struct MapFile {
    pub header: MapHeader,
    pub map: OfficeMap,
}

/// Save a map to a file
pub fn save_map(map: &OfficeMap, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let map_file = MapFile {
        header: MapHeader::new(map),
        map: map.clone(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &map_file)?;
    Ok(())
}

/// Save a map to a compact file (no pretty printing)
pub fn save_map_compact(map: &OfficeMap, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let map_file = MapFile {
        header: MapHeader::new(map),
        map: map.clone(),
    };

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &map_file)?;
    Ok(())
}

/// Load a map from a file
pub fn load_map(path: impl AsRef<Path>) -> Result<OfficeMap, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let map_file: MapFile = serde_json::from_reader(reader)?;

    map_file.header.validate()?;
    let mut map = map_file.map;
    map.rebuild_index();
    Ok(map)
}

/// Load only the header from a map file (for listings)
pub fn load_header(path: impl AsRef<Path>) -> Result<MapHeader, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let map_file: MapFile = serde_json::from_reader(reader)?;
    map_file.header.validate()?;
    Ok(map_file.header)
}

/// Check if a map file exists
pub fn map_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Delete a map file
pub fn delete_map(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use og_core::{GenerationConfig, Generator, RoomId};
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("og-save-test-{}-{name}.json", std::process::id()));
        path
    }

    fn sample_map() -> OfficeMap {
        Generator::new(GenerationConfig::new(60, 60, 42))
            .generate()
            .unwrap()
            .map
    }

    #[test]
    fn test_round_trip() {
        let map = sample_map();
        let path = scratch_path("round-trip");

        save_map(&map, &path).unwrap();
        let loaded = load_map(&path).unwrap();
        delete_map(&path).unwrap();

        assert_eq!(loaded.seed, map.seed);
        assert_eq!(loaded.bounds, map.bounds);
        assert_eq!(loaded.spawn, map.spawn);
        assert_eq!(loaded.rooms, map.rooms);
        assert_eq!(loaded.corridors, map.corridors);
        // Nothing drifts through a full cycle, hidden counters included
        assert_eq!(
            serde_json::to_string(&loaded).unwrap(),
            serde_json::to_string(&map).unwrap()
        );
        // Index rebuilt: id lookups work after load
        let id = map.rooms[0].id;
        assert_eq!(loaded.room(id).unwrap().bounds, map.room(id).unwrap().bounds);
    }

    #[test]
    fn test_compact_round_trip() {
        let map = sample_map();
        let path = scratch_path("compact");

        save_map_compact(&map, &path).unwrap();
        let loaded = load_map(&path).unwrap();
        delete_map(&path).unwrap();

        assert_eq!(loaded.room_count(), map.room_count());
    }

    #[test]
    fn test_header_only() {
        let map = sample_map();
        let path = scratch_path("header");

        save_map(&map, &path).unwrap();
        let header = load_header(&path).unwrap();
        delete_map(&path).unwrap();

        assert_eq!(header.seed, 42);
        assert_eq!(header.rooms, map.room_count());
    }

    #[test]
    fn test_missing_file() {
        let err = load_map(scratch_path("missing")).unwrap_err();
        assert!(matches!(err, SaveError::NotFound));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let header = MapHeader {
            version: MAP_VERSION + 1,
            ..MapHeader::new(&sample_map())
        };
        assert!(matches!(
            header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_bad_magic_rejected() {
        let header = MapHeader {
            magic: "NOPE".to_string(),
            ..MapHeader::new(&sample_map())
        };
        assert!(matches!(header.validate(), Err(SaveError::InvalidHeader)));
    }

    #[test]
    fn test_unknown_room_lookup_after_load() {
        let map = sample_map();
        let path = scratch_path("unknown-room");
        save_map(&map, &path).unwrap();
        let loaded = load_map(&path).unwrap();
        delete_map(&path).unwrap();
        assert!(loaded.room(RoomId(u32::MAX)).is_none());
    }
}
