//! The generation pipeline.
//!
//! `Generator` runs the full sequence: partition the bounds, carve rooms
//! into the leaves, classify them, connect everything with the two-pass
//! corridor generator, tidy the corridor network, then validate and
//! repair connectivity. A single seeded rng is threaded through every
//! stage in a fixed order, so the whole map is a pure function of the
//! configuration.
//!
//! Stage boundaries are reported through `GenerationObserver`, which a
//! caller can use for progress display or debugging snapshots.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::bsp::{partition, BspConfig, PartitionNode};
use crate::classify::{classify, ClassifyConfig};
use crate::corridors::{
    connect, optimize, repair_connectivity, resolve_intersections, CorridorConfig,
};
use crate::error::{ConnectivityReport, GenError, Warning};
use crate::geometry::{Pos, Rect};
use crate::map::{OfficeMap, RoomClass};
use crate::rng::GenRng;
use crate::rooms::{build_rooms, RoomConfig};

/// Full configuration for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub width: i32,
    pub height: i32,
    pub seed: u64,
    pub bsp: BspConfig,
    pub rooms: RoomConfig,
    pub corridors: CorridorConfig,
    pub classify: ClassifyConfig,
}

impl GenerationConfig {
    /// A config with the given bounds and seed and default knobs.
    pub fn new(width: i32, height: i32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GenError> {
        if self.width < self.bsp.min_partition_size || self.height < self.bsp.min_partition_size {
            return Err(GenError::BoundsTooSmall {
                width: self.width,
                height: self.height,
                min_partition_size: self.bsp.min_partition_size,
            });
        }
        self.bsp.validate()?;
        self.rooms.validate()?;
        self.corridors.validate()?;
        self.classify.validate()?;
        Ok(())
    }
}

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, strum::Display)]
pub enum GenStage {
    Partition,
    Rooms,
    Classify,
    Connect,
    Optimize,
    Validate,
    Finalize,
}

/// Callback surface for watching a generation run. All methods default
/// to no-ops.
pub trait GenerationObserver {
    /// Called after each stage completes, with the map so far.
    fn stage_done(&mut self, _stage: GenStage, _map: &OfficeMap) {}
    /// Called for each warning as it is raised.
    fn warning(&mut self, _warning: &Warning) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl GenerationObserver for NoopObserver {}

/// Everything a run produces: the map, the partition tree it came from,
/// the final connectivity report and the soft warnings raised along the
/// way.
#[derive(Debug)]
pub struct Generated {
    pub map: OfficeMap,
    pub tree: PartitionNode,
    pub report: ConnectivityReport,
    pub warnings: Vec<Warning>,
}

/// Runs the pipeline for one configuration.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GenerationConfig,
}

impl Generator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate a map, discarding stage callbacks.
    pub fn generate(&self) -> Result<Generated, GenError> {
        self.generate_observed(&mut NoopObserver)
    }

    /// Generate a map, reporting stage boundaries and warnings to the
    /// observer.
    pub fn generate_observed(
        &self,
        observer: &mut dyn GenerationObserver,
    ) -> Result<Generated, GenError> {
        let config = &self.config;
        config.validate()?;

        let bounds = Rect::new(0, 0, config.width, config.height);
        let mut rng = GenRng::new(config.seed);
        let mut map = OfficeMap::new(bounds, config.seed);
        let mut warnings = Vec::new();

        let mut tree = partition(bounds, &config.bsp, &mut rng);
        observer.stage_done(GenStage::Partition, &map);

        warnings.extend(build_rooms(&mut tree, &config.rooms, &mut map, &mut rng));
        observer.stage_done(GenStage::Rooms, &map);

        warnings.extend(classify(&mut map, &config.classify, config.seed)?);
        observer.stage_done(GenStage::Classify, &map);

        warnings.extend(connect(&mut map, &config.corridors, &mut rng));
        observer.stage_done(GenStage::Connect, &map);

        optimize(&mut map, &config.corridors);
        resolve_intersections(&mut map);
        observer.stage_done(GenStage::Optimize, &map);

        let report = repair_connectivity(&mut map, &config.corridors, &mut rng);
        observer.stage_done(GenStage::Validate, &map);

        map.spawn = spawn_point(&map);
        warnings.extend(quality_warnings(&map, &config.corridors));
        for warning in &warnings {
            observer.warning(warning);
        }
        observer.stage_done(GenStage::Finalize, &map);

        Ok(Generated {
            map,
            tree,
            report,
            warnings,
        })
    }
}

/// Spawn in the lobby when there is one, else the reception, else the
/// largest room. Falls back to the bounds center on an empty map.
fn spawn_point(map: &OfficeMap) -> Pos {
    for class in [RoomClass::Lobby, RoomClass::Reception] {
        let pick = map
            .rooms
            .iter()
            .filter(|r| r.class == class)
            .max_by_key(|r| (r.area(), std::cmp::Reverse(r.id)));
        if let Some(room) = pick {
            return room.center();
        }
    }
    map.rooms
        .iter()
        .max_by_key(|r| (r.area(), std::cmp::Reverse(r.id)))
        .map(|r| r.center())
        .unwrap_or(map.bounds.center())
}

/// Post-run quality checks that do not justify failing the whole run.
fn quality_warnings(map: &OfficeMap, config: &CorridorConfig) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if map.room_count() > 1 {
        for room in &map.rooms {
            if room.doorways.is_empty() {
                warnings.push(Warning::DoorlessRoom(room.id));
            }
        }
    }
    for corridor in &map.corridors {
        if corridor.width < config.secondary_width {
            warnings.push(Warning::NarrowCorridor {
                corridor: corridor.id,
                width: corridor.width,
            });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(seed: u64) -> Generated {
        Generator::new(GenerationConfig::new(100, 100, seed))
            .generate()
            .unwrap()
    }

    #[test]
    fn test_full_run_produces_rooms_and_corridors() {
        let out = run(12345);
        assert!(out.map.room_count() >= 2);
        assert!(!out.map.corridors.is_empty());
    }

    #[test]
    fn test_full_run_is_connected() {
        for seed in [1, 12345, 9999] {
            let out = run(seed);
            assert!(
                out.report.fully_connected,
                "seed {seed}: unreachable {:?}",
                out.report.unreachable
            );
        }
    }

    #[test]
    fn test_same_seed_same_map() {
        let a = run(12345);
        let b = run(12345);
        let dump = |g: &Generated| serde_json::to_string(&g.map).unwrap();
        assert_eq!(dump(&a), dump(&b));
        assert_eq!(a.warnings.len(), b.warnings.len());
    }

    #[test]
    fn test_different_seed_different_map() {
        let a = run(12345);
        let b = run(54321);
        let dump = |g: &Generated| serde_json::to_string(&g.map).unwrap();
        assert_ne!(dump(&a), dump(&b));
    }

    #[test]
    fn test_every_room_classified() {
        let out = run(7);
        assert!(out
            .map
            .rooms
            .iter()
            .all(|r| r.class != RoomClass::Unassigned));
    }

    #[test]
    fn test_spawn_inside_a_room() {
        let out = run(3);
        assert!(out
            .map
            .rooms
            .iter()
            .any(|r| r.bounds.contains(out.map.spawn)));
    }

    #[test]
    fn test_bounds_too_small_rejected() {
        let err = Generator::new(GenerationConfig::new(5, 100, 1))
            .generate()
            .unwrap_err();
        assert!(matches!(err, GenError::BoundsTooSmall { .. }));
    }

    #[test]
    fn test_bad_knob_rejected() {
        let mut config = GenerationConfig::new(100, 100, 1);
        config.bsp.split_variation = 0.9;
        assert!(Generator::new(config).generate().is_err());
    }

    #[test]
    fn test_observer_sees_all_stages() {
        #[derive(Default)]
        struct Recorder(Vec<GenStage>);
        impl GenerationObserver for Recorder {
            fn stage_done(&mut self, stage: GenStage, _map: &OfficeMap) {
                self.0.push(stage);
            }
        }

        let mut recorder = Recorder::default();
        Generator::new(GenerationConfig::new(100, 100, 12345))
            .generate_observed(&mut recorder)
            .unwrap();
        assert_eq!(
            recorder.0,
            vec![
                GenStage::Partition,
                GenStage::Rooms,
                GenStage::Classify,
                GenStage::Connect,
                GenStage::Optimize,
                GenStage::Validate,
                GenStage::Finalize,
            ]
        );
    }

    #[test]
    fn test_partition_tree_returned() {
        let out = run(12345);
        let leaves = out.tree.leaves();
        assert!(!leaves.is_empty());
        assert!(out.map.room_count() <= leaves.len());
    }
}
