//! Rule-driven room classification.
//!
//! Classification is a pure function of `(rooms, map bounds, config,
//! seed)`: it runs on its own RNG stream derived from the seed, so it
//! does not depend on how many draws earlier pipeline stages consumed.
//! Each room is scored against every allowed class (size fit plus
//! position fit), a seeded weighted-random pick chooses among the top
//! candidates, then a soft correction pass nudges class counts toward
//! the configured distribution targets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GenError, Warning};
use crate::map::{OfficeMap, Placement, RoomClass, RoomId};
use crate::rng::GenRng;

/// Stream tweak applied to the map seed for the classifier's own RNG.
const CLASSIFY_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Soft distribution target for one class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionRule {
    /// Desired share of all rooms, in [0, 1].
    pub target_fraction: f64,
    /// Hard-ish floor: correction pulls rooms in below this count.
    pub min_count: u32,
    /// Cap: correction pushes rooms out above this count.
    pub max_count: Option<u32>,
}

impl DistributionRule {
    pub fn fraction(target_fraction: f64) -> Self {
        Self {
            target_fraction,
            min_count: 0,
            max_count: None,
        }
    }
}

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    /// Classes the classifier may assign, in scoring order.
    pub allowed: Vec<RoomClass>,
    /// How much the weighted pick may stray from the top score, in
    /// [0, 1]. Zero means strict argmax.
    pub randomness_factor: f64,
    pub size_weight: f64,
    pub position_weight: f64,
    /// Distribution targets per class.
    pub rules: BTreeMap<RoomClass, DistributionRule>,
    /// Designer overrides: room id pinned to a class, bypassing scoring.
    pub overrides: BTreeMap<RoomId, RoomClass>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        let mut rules = BTreeMap::new();
        rules.insert(RoomClass::Office, DistributionRule::fraction(0.35));
        rules.insert(RoomClass::OpenPlan, DistributionRule::fraction(0.15));
        rules.insert(RoomClass::Conference, DistributionRule::fraction(0.10));
        rules.insert(RoomClass::Storage, DistributionRule::fraction(0.10));
        rules.insert(RoomClass::BreakRoom, DistributionRule::fraction(0.08));
        rules.insert(
            RoomClass::ServerRoom,
            DistributionRule {
                target_fraction: 0.05,
                min_count: 1,
                max_count: None,
            },
        );
        rules.insert(
            RoomClass::Lobby,
            DistributionRule {
                target_fraction: 0.04,
                min_count: 1,
                max_count: Some(1),
            },
        );
        Self {
            allowed: RoomClass::ASSIGNABLE.to_vec(),
            randomness_factor: 0.3,
            size_weight: 0.6,
            position_weight: 0.4,
            rules,
            overrides: BTreeMap::new(),
        }
    }
}

impl ClassifyConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        if self.allowed.is_empty() {
            return Err(GenError::InvalidConfig {
                field: "allowed",
                reason: "allowed class set is empty".into(),
            });
        }
        if self.allowed.contains(&RoomClass::Unassigned) {
            return Err(GenError::InvalidConfig {
                field: "allowed",
                reason: "Unassigned cannot be an assignable class".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.randomness_factor) {
            return Err(GenError::InvalidConfig {
                field: "randomness_factor",
                reason: format!("must be in [0, 1], got {}", self.randomness_factor),
            });
        }
        if self.size_weight < 0.0 || self.position_weight < 0.0 {
            return Err(GenError::InvalidConfig {
                field: "size_weight/position_weight",
                reason: "weights must be non-negative".into(),
            });
        }
        if self.size_weight + self.position_weight <= 0.0 {
            return Err(GenError::InvalidConfig {
                field: "size_weight/position_weight",
                reason: "at least one weight must be positive".into(),
            });
        }
        for (class, rule) in &self.rules {
            if !(0.0..=1.0).contains(&rule.target_fraction) {
                return Err(GenError::InvalidConfig {
                    field: "rules",
                    reason: format!(
                        "target fraction for {class} must be in [0, 1], got {}",
                        rule.target_fraction
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Assign a class to every room on the map.
///
/// Overrides naming a class outside the allowed set or an unknown room
/// id are caller-contract errors. Identical `(map, config, seed)` inputs
/// always produce identical classifications.
pub fn classify(
    map: &mut OfficeMap,
    config: &ClassifyConfig,
    seed: u64,
) -> Result<Vec<Warning>, GenError> {
    config.validate()?;
    let mut pins: BTreeMap<RoomId, usize> = BTreeMap::new();
    for (&room, &class) in &config.overrides {
        if map.room(room).is_none() {
            return Err(GenError::UnknownRoom(room));
        }
        let Some(idx) = config.allowed.iter().position(|c| *c == class) else {
            return Err(GenError::OverrideNotAllowed { room, class });
        };
        pins.insert(room, idx);
    }

    let mut rng = GenRng::new(seed ^ CLASSIFY_STREAM);
    let center = map.bounds.center();
    let half_diag = center.euclidean(crate::geometry::Pos::new(map.bounds.x, map.bounds.y));

    // Score every room against every allowed class, rooms in creation
    // (id) order.
    let scores: Vec<Vec<f64>> = map
        .rooms
        .iter()
        .map(|room| {
            let dist = if half_diag > 0.0 {
                (room.center().euclidean(center) / half_diag).min(1.0)
            } else {
                0.0
            };
            config
                .allowed
                .iter()
                .map(|class| score(room.area(), dist, *class, config))
                .collect()
        })
        .collect();

    // Initial assignment.
    let mut assigned: Vec<usize> = Vec::with_capacity(map.rooms.len());
    let mut pinned: Vec<bool> = Vec::with_capacity(map.rooms.len());
    for (i, room) in map.rooms.iter().enumerate() {
        if let Some(&idx) = pins.get(&room.id) {
            assigned.push(idx);
            pinned.push(true);
            continue;
        }
        assigned.push(pick_class(&scores[i], config, &mut rng));
        pinned.push(false);
    }

    correct_distribution(&mut assigned, &pinned, &scores, config);

    for (room, class_idx) in map.rooms.iter_mut().zip(&assigned) {
        room.class = config.allowed[*class_idx];
    }

    let mut warnings = Vec::new();
    for (class, rule) in &config.rules {
        if rule.target_fraction <= 0.0 && rule.min_count == 0 {
            continue;
        }
        if !map.rooms.iter().any(|r| r.class == *class) {
            warnings.push(Warning::ClassTargetMissed(*class));
        }
    }
    Ok(warnings)
}

/// Combined size/position score for one (room, class) pair, in [0, 1].
fn score(area: i64, center_dist: f64, class: RoomClass, config: &ClassifyConfig) -> f64 {
    let (lo, hi) = class.preferred_area();
    let size_fit = if area < lo {
        area as f64 / lo as f64
    } else if area > hi {
        hi as f64 / area as f64
    } else {
        1.0
    };
    let position_fit = match class.placement() {
        Placement::Center => 1.0 - center_dist,
        Placement::Edge => center_dist,
        Placement::Any => 0.5,
    };
    (config.size_weight * size_fit + config.position_weight * position_fit)
        / (config.size_weight + config.position_weight)
}

/// Weighted pick among the candidates within `randomness_factor` of the
/// best score. With zero randomness this is a strict argmax with
/// first-in-config-order tie-breaking.
fn pick_class(scores: &[f64], config: &ClassifyConfig, rng: &mut GenRng) -> usize {
    let best = scores.iter().copied().fold(f64::MIN, f64::max);
    if config.randomness_factor <= 0.0 || best <= 0.0 {
        return scores
            .iter()
            .position(|s| *s == best)
            .unwrap_or(0);
    }
    let floor = best * (1.0 - config.randomness_factor);
    let weights: Vec<f64> = scores
        .iter()
        .map(|s| if *s >= floor { *s } else { 0.0 })
        .collect();
    rng.weighted_index(&weights)
}

/// Minimum score a room must have for a class before the correction
/// pass will move it there.
const MIN_MOVE_SCORE: f64 = 0.1;

/// Nudge class counts toward the configured targets. Soft by design:
/// bounded number of moves, never touches pinned rooms, never forces a
/// room into a class it scores badly for.
fn correct_distribution(
    assigned: &mut [usize],
    pinned: &[bool],
    scores: &[Vec<f64>],
    config: &ClassifyConfig,
) {
    let n = assigned.len();
    if n == 0 {
        return;
    }
    let max_moves = 3 * config.allowed.len();

    for _ in 0..max_moves {
        let mut counts = vec![0i64; config.allowed.len()];
        for &a in assigned.iter() {
            counts[a] += 1;
        }

        // Deviation from target for each ruled class; classes above
        // max_count or below min_count always qualify.
        let mut over: Option<(usize, f64)> = None;
        let mut under: Option<(usize, f64)> = None;
        for (idx, class) in config.allowed.iter().enumerate() {
            let Some(rule) = config.rules.get(class) else {
                continue;
            };
            let target = rule.target_fraction * n as f64;
            let count = counts[idx] as f64;
            let dev = count - target;

            let over_cap = rule
                .max_count
                .is_some_and(|cap| counts[idx] > cap as i64);
            if over_cap || dev > 1.0 {
                let severity = if over_cap { dev + 1000.0 } else { dev };
                if over.is_none_or(|(_, s)| severity > s) {
                    over = Some((idx, severity));
                }
            }
            let under_floor = counts[idx] < rule.min_count as i64;
            if under_floor || dev < -1.0 {
                let severity = if under_floor { dev - 1000.0 } else { dev };
                if under.is_none_or(|(_, s)| severity < s) {
                    under = Some((idx, severity));
                }
            }
        }

        let (Some((from, _)), Some((to, _))) = (over, under) else {
            break;
        };
        if from == to {
            break;
        }

        // Move the room that loses the least: lowest score for its
        // current class, acceptable score for the destination.
        let mut candidate: Option<(usize, f64)> = None;
        for (i, &a) in assigned.iter().enumerate() {
            if a != from || pinned[i] || scores[i][to] < MIN_MOVE_SCORE {
                continue;
            }
            if candidate.is_none_or(|(_, s)| scores[i][from] < s) {
                candidate = Some((i, scores[i][from]));
            }
        }
        let Some((room_idx, _)) = candidate else {
            break;
        };
        assigned[room_idx] = to;
    }
}
