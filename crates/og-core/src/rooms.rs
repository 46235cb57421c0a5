//! Room builder: derives room rectangles from partition leaves.
//!
//! Each sufficiently large leaf gets a room strictly inside its bounds,
//! inset by a fixed margin plus a small per-side random shrink so rooms
//! do not fill their partitions uniformly. Leaves too small to hold a
//! valid room are skipped; that is a quality fallback, not an error.
//! Rooms are registered in leaf traversal order, which is what makes the
//! sequential id assignment deterministic.

use serde::{Deserialize, Serialize};

use crate::bsp::PartitionNode;
use crate::error::{GenError, Warning};
use crate::geometry::Rect;
use crate::map::OfficeMap;
use crate::rng::GenRng;

/// Room builder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Fixed inset from the leaf bounds on every side.
    pub margin: i32,
    /// Maximum extra random shrink per side, in tiles.
    pub jitter: i32,
    /// Minimum room side length after inset.
    pub min_room_size: i32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            margin: 1,
            jitter: 1,
            min_room_size: 4,
        }
    }
}

impl RoomConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.margin < 0 {
            return Err(GenError::InvalidConfig {
                field: "margin",
                reason: format!("must be non-negative, got {}", self.margin),
            });
        }
        if self.jitter < 0 {
            return Err(GenError::InvalidConfig {
                field: "jitter",
                reason: format!("must be non-negative, got {}", self.jitter),
            });
        }
        if self.min_room_size < 2 {
            return Err(GenError::InvalidConfig {
                field: "min_room_size",
                reason: format!("must be at least 2, got {}", self.min_room_size),
            });
        }
        Ok(())
    }
}

/// Build rooms from the partition tree's leaves and register them on the
/// map. Returns warnings for skipped leaves.
pub fn build_rooms(
    root: &mut PartitionNode,
    config: &RoomConfig,
    map: &mut OfficeMap,
    rng: &mut GenRng,
) -> Vec<Warning> {
    let mut warnings = Vec::new();
    root.for_each_leaf_mut(&mut |leaf| {
        let inset = leaf.bounds.inset(config.margin);
        // Leaves that cannot fit a room even before jitter consume no
        // RNG draws, so skipping is deterministic too.
        if inset.width < config.min_room_size || inset.height < config.min_room_size {
            warnings.push(Warning::LeafSkipped {
                width: leaf.bounds.width,
                height: leaf.bounds.height,
            });
            return;
        }

        // Per-side shrink draws in fixed order: left, top, right, bottom.
        let slack_x = (inset.width - config.min_room_size).min(config.jitter);
        let slack_y = (inset.height - config.min_room_size).min(config.jitter);
        let left = rng.below(slack_x as u32 + 1) as i32;
        let top = rng.below(slack_y as u32 + 1) as i32;
        let right = rng.below((slack_x - left) as u32 + 1) as i32;
        let bottom = rng.below((slack_y - top) as u32 + 1) as i32;

        let room = Rect::new(
            inset.x + left,
            inset.y + top,
            inset.width - left - right,
            inset.height - top - bottom,
        );
        debug_assert!(room.width >= config.min_room_size);
        debug_assert!(room.height >= config.min_room_size);

        leaf.room = Some(room);
        map.add_room(room);
    });
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{partition, BspConfig};

    fn build(seed: u64) -> (OfficeMap, Vec<Warning>) {
        let bsp = BspConfig::default();
        let rooms = RoomConfig::default();
        let mut rng = GenRng::new(seed);
        let bounds = Rect::new(0, 0, 100, 100);
        let mut root = partition(bounds, &bsp, &mut rng);
        let mut map = OfficeMap::new(bounds, seed);
        let warnings = build_rooms(&mut root, &rooms, &mut map, &mut rng);
        (map, warnings)
    }

    #[test]
    fn test_rooms_inside_leaves() {
        let bsp = BspConfig::default();
        let rooms = RoomConfig::default();
        let mut rng = GenRng::new(12345);
        let bounds = Rect::new(0, 0, 100, 100);
        let mut root = partition(bounds, &bsp, &mut rng);
        let mut map = OfficeMap::new(bounds, 12345);
        build_rooms(&mut root, &rooms, &mut map, &mut rng);

        assert!(map.room_count() >= 1);
        for leaf in root.leaves() {
            if let Some(room) = leaf.room {
                assert!(leaf.bounds.contains_rect(&room));
                assert!(room.width >= rooms.min_room_size);
                assert!(room.height >= rooms.min_room_size);
            }
        }
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let (map, _) = build(999);
        for (i, a) in map.rooms.iter().enumerate() {
            for b in &map.rooms[i + 1..] {
                assert!(
                    !a.bounds.intersects(&b.bounds),
                    "rooms {} and {} overlap",
                    a.id,
                    b.id
                );
            }
        }
    }

    #[test]
    fn test_deterministic_build() {
        let (a, _) = build(4242);
        let (b, _) = build(4242);
        assert_eq!(a.room_count(), b.room_count());
        for (ra, rb) in a.rooms.iter().zip(&b.rooms) {
            assert_eq!(ra.id, rb.id);
            assert_eq!(ra.bounds, rb.bounds);
        }
    }

    #[test]
    fn test_small_leaf_skipped() {
        let rooms = RoomConfig {
            margin: 1,
            jitter: 0,
            min_room_size: 20,
        };
        let mut root = partition(
            Rect::new(0, 0, 15, 15),
            &BspConfig::default(),
            &mut GenRng::new(1),
        );
        let mut map = OfficeMap::new(Rect::new(0, 0, 15, 15), 1);
        let warnings = build_rooms(&mut root, &rooms, &mut map, &mut GenRng::new(1));
        assert_eq!(map.room_count(), 0);
        assert!(matches!(warnings[0], Warning::LeafSkipped { .. }));
    }

    #[test]
    fn test_config_validation() {
        assert!(RoomConfig::default().validate().is_ok());
        assert!(RoomConfig {
            margin: -1,
            ..RoomConfig::default()
        }
        .validate()
        .is_err());
        assert!(RoomConfig {
            min_room_size: 1,
            ..RoomConfig::default()
        }
        .validate()
        .is_err());
    }
}
