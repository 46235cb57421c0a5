//! Two-pass corridor generation.
//!
//! Pass 1 picks a set of core rooms (large and well spread out), joins
//! them with a minimum-spanning-tree backbone of wide primary corridors,
//! each routed by the grid pathfinder. Pass 2 attaches every remaining
//! room to the backbone with narrower secondary corridors, in ascending
//! room id order so output is stable for a fixed seed. A validation pass
//! then checks full reachability over the room graph and runs a bounded
//! repair loop; what remains unreachable is reported, never thrown.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::error::{ConnectivityReport, GenError, Warning};
use crate::geometry::{Dir, Pos};
use crate::map::{
    CorridorId, CorridorKind, OfficeMap, Room, RoomId, MAX_CORRIDOR_WIDTH, MIN_CORRIDOR_WIDTH,
};
use crate::pathfind::{find_path, Grid, Manhattan};
use crate::rng::GenRng;

/// Corridor generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorridorConfig {
    /// Width of MST backbone corridors.
    pub primary_width: u32,
    /// Width of leaf connectors.
    pub secondary_width: u32,
    /// Floor on the core room count, so sparse maps still get a backbone.
    pub min_core_rooms: usize,
    /// Fraction of all rooms promoted to core, in (0, 1].
    pub core_fraction: f64,
    /// Retry budget for the connectivity repair loop.
    pub repair_attempts: u32,
    /// Path smoothing factor, in [0, 1]: the fraction of a path that one
    /// straightened segment may span. Zero disables `optimize`.
    pub smoothing: f64,
}

impl Default for CorridorConfig {
    fn default() -> Self {
        Self {
            primary_width: 3,
            secondary_width: 2,
            min_core_rooms: 3,
            core_fraction: 0.35,
            repair_attempts: 8,
            smoothing: 1.0,
        }
    }
}

impl CorridorConfig {
    pub fn validate(&self) -> Result<(), GenError> {
        for (field, width) in [
            ("primary_width", self.primary_width),
            ("secondary_width", self.secondary_width),
        ] {
            if !(MIN_CORRIDOR_WIDTH..=MAX_CORRIDOR_WIDTH).contains(&width) {
                return Err(GenError::InvalidConfig {
                    field,
                    reason: format!(
                        "must be in [{MIN_CORRIDOR_WIDTH}, {MAX_CORRIDOR_WIDTH}], got {width}"
                    ),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.core_fraction) || self.core_fraction == 0.0 {
            return Err(GenError::InvalidConfig {
                field: "core_fraction",
                reason: format!("must be in (0, 1], got {}", self.core_fraction),
            });
        }
        if !(0.0..=1.0).contains(&self.smoothing) {
            return Err(GenError::InvalidConfig {
                field: "smoothing",
                reason: format!("must be in [0, 1], got {}", self.smoothing),
            });
        }
        Ok(())
    }
}

/// Tracks which rooms already belong to the same connected component,
/// as equivalence classes over indices.
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    classes: Vec<usize>,
}

impl ConnectivityTracker {
    pub fn new(n: usize) -> Self {
        Self {
            classes: (0..n).collect(),
        }
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        a < self.classes.len() && b < self.classes.len() && self.classes[a] == self.classes[b]
    }

    pub fn merge(&mut self, a: usize, b: usize) {
        if a >= self.classes.len() || b >= self.classes.len() {
            return;
        }
        let old = self.classes[b];
        let new = self.classes[a];
        for class in &mut self.classes {
            if *class == old {
                *class = new;
            }
        }
    }

    pub fn all_connected(&self) -> bool {
        self.classes.windows(2).all(|w| w[0] == w[1])
    }
}

/// Select the rooms that anchor the primary backbone: greedy pick
/// maximizing size and pairwise spread, with a floor so sparse maps
/// still get one. Deterministic; ties break toward lower room ids.
pub fn select_core_rooms(map: &OfficeMap, config: &CorridorConfig) -> Vec<RoomId> {
    let n = map.room_count();
    if n == 0 {
        return Vec::new();
    }
    let want = ((n as f64 * config.core_fraction).round() as usize)
        .max(config.min_core_rooms)
        .min(n);

    let mut rooms: Vec<&Room> = map.rooms.iter().collect();
    rooms.sort_by_key(|r| r.id);
    let max_area = rooms.iter().map(|r| r.area()).max().unwrap_or(1).max(1);
    let diag = Pos::new(map.bounds.x, map.bounds.y)
        .euclidean(Pos::new(map.bounds.right(), map.bounds.bottom()))
        .max(1.0);

    let mut chosen: Vec<RoomId> = Vec::with_capacity(want);
    // Seed with the largest room, lower id on ties.
    let Some(first) = rooms
        .iter()
        .max_by(|a, b| a.area().cmp(&b.area()).then_with(|| b.id.cmp(&a.id)))
    else {
        return chosen;
    };
    chosen.push(first.id);

    while chosen.len() < want {
        let mut best: Option<(RoomId, f64)> = None;
        for room in &rooms {
            if chosen.contains(&room.id) {
                continue;
            }
            let area_score = room.area() as f64 / max_area as f64;
            let spread = chosen
                .iter()
                .map(|id| {
                    map.room(*id)
                        .map(|r| r.center().euclidean(room.center()))
                        .unwrap_or(0.0)
                })
                .fold(f64::MAX, f64::min)
                / diag;
            let score = area_score + spread;
            let better = match best {
                None => true,
                Some((_, s)) => score > s,
            };
            if better {
                best = Some((room.id, score));
            }
        }
        match best {
            Some((id, _)) => chosen.push(id),
            None => break,
        }
    }
    chosen.sort_unstable();
    chosen
}

/// Build the routing grid: interiors of every room are impassable,
/// room tiles are expensive, existing corridor tiles are cheap so new
/// routes coalesce with old ones.
fn routing_grid(map: &OfficeMap) -> Grid {
    let b = map.bounds;
    let mut grid = Grid::new(b.width, b.height);
    for y in 0..b.height {
        for x in 0..b.width {
            grid.set_cost(Pos::new(x, y), 2);
        }
    }
    for room in &map.rooms {
        let interior = room.bounds.interior();
        for y in interior.y..interior.bottom() {
            for x in interior.x..interior.right() {
                grid.block(Pos::new(x - b.x, y - b.y));
            }
        }
        // Perimeter ring stays passable but costly, so corridors only
        // graze rooms when the pathfinder has no better option.
        for y in room.bounds.y..room.bounds.bottom() {
            for x in room.bounds.x..room.bounds.right() {
                let p = Pos::new(x - b.x, y - b.y);
                if !grid.is_blocked(p) {
                    grid.set_cost(p, 4);
                }
            }
        }
    }
    for corridor in &map.corridors {
        for p in &corridor.path {
            grid.set_cost(Pos::new(p.x - b.x, p.y - b.y), 1);
        }
    }
    grid
}

/// Pick a doorway position on the wall of `room` facing `target`, and
/// the outward direction there.
fn door_point(room: &Room, target: Pos, rng: &mut GenRng) -> (Pos, Dir) {
    let b = room.bounds;
    let c = room.center();
    let dx = target.x - c.x;
    let dy = target.y - c.y;
    if dx.abs() > dy.abs() {
        let y = b.y + rng.below(b.height as u32) as i32;
        if dx > 0 {
            (Pos::new(b.right() - 1, y), Dir::East)
        } else {
            (Pos::new(b.x, y), Dir::West)
        }
    } else {
        let x = b.x + rng.below(b.width as u32) as i32;
        if dy > 0 {
            (Pos::new(x, b.bottom() - 1), Dir::South)
        } else {
            (Pos::new(x, b.y), Dir::North)
        }
    }
}

/// Route one corridor between two rooms and record it on the map,
/// carving doorways at both ends. Returns None when the pathfinder
/// finds no route; the connection is then left unformed.
fn route_corridor(
    map: &mut OfficeMap,
    a: RoomId,
    b: RoomId,
    width: u32,
    kind: CorridorKind,
    rng: &mut GenRng,
) -> Option<CorridorId> {
    let bounds = map.bounds;
    let (start, start_dir, goal, goal_dir) = {
        let room_a = map.room(a)?;
        let room_b = map.room(b)?;
        let (start, start_dir) = door_point(room_a, room_b.center(), rng);
        let (goal, goal_dir) = door_point(room_b, room_a.center(), rng);
        (start, start_dir, goal, goal_dir)
    };

    let grid = routing_grid(map);
    let to_grid = |p: Pos| Pos::new(p.x - bounds.x, p.y - bounds.y);
    let path = find_path(&grid, to_grid(start), to_grid(goal), &Manhattan).ok()?;
    let path: Vec<Pos> = path
        .into_iter()
        .map(|p| Pos::new(p.x + bounds.x, p.y + bounds.y))
        .collect();

    let id = map.add_corridor((a, b), path, width, kind)?;
    if let Some(room) = map.room_mut(a) {
        room.add_doorway(start, start_dir, width);
    }
    if let Some(room) = map.room_mut(b) {
        room.add_doorway(goal, goal_dir, width);
    }
    Some(id)
}

/// Connect all rooms: MST backbone over core rooms, then secondary
/// connectors for everything else. Returns soft warnings; reachability
/// is checked separately by `validate_connectivity`.
pub fn connect(map: &mut OfficeMap, config: &CorridorConfig, rng: &mut GenRng) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if map.room_count() < 2 {
        return warnings;
    }

    // Pass 1: MST over core rooms, Kruskal with (weight, id) ordering.
    let core = select_core_rooms(map, config);
    let mut edges: Vec<(f64, usize, usize)> = Vec::new();
    for i in 0..core.len() {
        for j in (i + 1)..core.len() {
            let d = map
                .room(core[i])
                .zip(map.room(core[j]))
                .map(|(a, b)| a.center().euclidean(b.center()))
                .unwrap_or(f64::MAX);
            edges.push((d, i, j));
        }
    }
    edges.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut tracker = ConnectivityTracker::new(core.len());
    for (_, i, j) in edges {
        if tracker.are_connected(i, j) {
            continue;
        }
        tracker.merge(i, j);
        if route_corridor(
            map,
            core[i],
            core[j],
            config.primary_width,
            CorridorKind::Primary,
            rng,
        )
        .is_none()
        {
            warnings.push(Warning::CorridorUnrouted {
                from: core[i],
                to: core[j],
            });
        }
    }

    // Pass 2: attach every remaining room to the nearest reached room,
    // ascending id for stable output.
    let mut reached = reachable_from(map, core[0]);
    for id in map.room_ids() {
        if reached.contains(&id) {
            continue;
        }
        let center = match map.room(id) {
            Some(r) => r.center(),
            None => continue,
        };
        let nearest = reached
            .iter()
            .filter_map(|rid| map.room(*rid).map(|r| (*rid, r.center().euclidean(center))))
            .min_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
        let Some((target, _)) = nearest else { continue };
        match route_corridor(
            map,
            id,
            target,
            config.secondary_width,
            CorridorKind::Secondary,
            rng,
        ) {
            Some(_) => {
                reached.insert(id);
            }
            None => warnings.push(Warning::CorridorUnrouted {
                from: id,
                to: target,
            }),
        }
    }

    warnings
}

/// All rooms reachable from `start` over the connection graph.
fn reachable_from(map: &OfficeMap, start: RoomId) -> BTreeSet<RoomId> {
    let mut reached = BTreeSet::new();
    if map.room(start).is_none() {
        return reached;
    }
    let mut queue = VecDeque::from([start]);
    reached.insert(start);
    while let Some(id) = queue.pop_front() {
        if let Some(room) = map.room(id) {
            for &next in &room.connections {
                if reached.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    reached
}

/// Check that every room is reachable from every other via corridors.
pub fn validate_connectivity(map: &OfficeMap) -> ConnectivityReport {
    let ids = map.room_ids();
    let Some(&origin) = ids.first() else {
        return ConnectivityReport::connected();
    };
    let reached = reachable_from(map, origin);
    let unreachable: Vec<RoomId> = ids.into_iter().filter(|id| !reached.contains(id)).collect();
    if unreachable.is_empty() {
        ConnectivityReport::connected()
    } else {
        let errors = unreachable
            .iter()
            .map(|id| format!("room {id} is unreachable from room {origin}"))
            .collect();
        ConnectivityReport {
            fully_connected: false,
            unreachable,
            errors,
        }
    }
}

/// Bounded repair loop: each attempt routes one corridor from the first
/// unreachable room to the nearest reached room, then re-validates.
/// Returns the final report; rooms still listed there defeated the
/// retry budget and are the caller's decision.
pub fn repair_connectivity(
    map: &mut OfficeMap,
    config: &CorridorConfig,
    rng: &mut GenRng,
) -> ConnectivityReport {
    for _ in 0..config.repair_attempts {
        let report = validate_connectivity(map);
        if report.fully_connected {
            return report;
        }
        let Some(&orphan) = report.unreachable.first() else {
            return report;
        };
        let ids = map.room_ids();
        let origin = ids[0];
        let reached = reachable_from(map, origin);
        let center = match map.room(orphan) {
            Some(r) => r.center(),
            None => continue,
        };
        let nearest = reached
            .iter()
            .filter_map(|rid| map.room(*rid).map(|r| (*rid, r.center().euclidean(center))))
            .min_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.0.cmp(&b.0))
            });
        if let Some((target, _)) = nearest {
            route_corridor(
                map,
                orphan,
                target,
                config.secondary_width,
                CorridorKind::Repair,
                rng,
            );
        }
    }
    validate_connectivity(map)
}

///// Straighten corridor paths. Each path is rebuilt greedily: from the
/// current tile, the farthest downstream waypoint reachable by an
/// at-most-L-shaped run over unblocked tiles replaces the original
/// jagged stretch. Endpoints never move, so doorways and connectivity
/// are untouched. `smoothing` caps how much of a path one straightened
/// segment may span. Returns the number of tiles removed.
pub fn optimize(map: &mut OfficeMap, config: &CorridorConfig) -> usize {
    if config.smoothing <= 0.0 {
        return 0;
    }
    let grid = routing_grid(map);
    let origin = Pos::new(map.bounds.x, map.bounds.y);
    let mut removed = 0;
    for corridor in &mut map.corridors {
        let window = ((corridor.path.len() as f64 * config.smoothing).ceil() as usize).max(1);
        let slim = straighten(&corridor.path, &grid, origin, window);
        if slim != corridor.path {
            removed += corridor.path.len() - slim.len();
            corridor.path = slim;
        }
    }
    removed
}

fn straighten(path: &[Pos], grid: &Grid, origin: Pos, window: usize) -> Vec<Pos> {
    if path.len() < 3 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    let mut taken: HashSet<Pos> = HashSet::from([path[0]]);
    let mut i = 0;
    while i + 1 < path.len() {
        let hi = (i + window).min(path.len() - 1);
        let mut advanced = false;
        for j in (i + 1..=hi).rev() {
            let Some(seg) = l_segment(path[i], path[j], grid, origin, &taken) else {
                continue;
            };
            for p in seg.into_iter().skip(1) {
                taken.insert(p);
                out.push(p);
            }
            i = j;
            advanced = true;
            break;
        }
        if !advanced {
            // Fall back to the original step. A collision with an
            // already rebuilt tile would break the no-revisit
            // invariant, so the corridor keeps its original path.
            let next = path[i + 1];
            if !taken.insert(next) {
                return path.to_vec();
            }
            out.push(next);
            i += 1;
        }
    }
    out
}

/// An L-shaped (or straight) tile run from `a` to `b` that avoids
/// blocked cells and tiles already claimed by the rebuilt path, if one
/// exists. The horizontal-first corner is tried before the
/// vertical-first one.
fn l_segment(a: Pos, b: Pos, grid: &Grid, origin: Pos, taken: &HashSet<Pos>) -> Option<Vec<Pos>> {
    'corner: for corner in [Pos::new(b.x, a.y), Pos::new(a.x, b.y)] {
        let mut seg = vec![a];
        extend_run(&mut seg, corner);
        extend_run(&mut seg, b);
        for p in &seg[1..] {
            let local = Pos::new(p.x - origin.x, p.y - origin.y);
            if !grid.in_bounds(local) || grid.is_blocked(local) || taken.contains(p) {
                continue 'corner;
            }
        }
        return Some(seg);
    }
    None
}

/// Extend a segment with the axis-aligned run from its last tile to
/// `to`, excluding the tile it already ends on.
fn extend_run(seg: &mut Vec<Pos>, to: Pos) {
    let Some(&from) = seg.last() else {
        return;
    };
    let dx = (to.x - from.x).signum();
    let dy = (to.y - from.y).signum();
    let mut cur = from;
    while cur != to {
        cur = Pos::new(cur.x + dx, cur.y + dy);
        seg.push(cur);
    }
}

/// Deduplicate tiles shared between distinct corridors. Overlapping
/// tiles belong to the lowest-id corridor; later corridors shed shared
/// tiles only from their path ends, since dropping interior tiles would
/// break contiguity. Returns the number of tiles shed.
pub fn resolve_intersections(map: &mut OfficeMap) -> usize {
    let mut owned: HashSet<Pos> = HashSet::new();
    let mut removed = 0;

    let mut order: Vec<usize> = (0..map.corridors.len()).collect();
    order.sort_by_key(|&i| map.corridors[i].id);
    for idx in order {
        let corridor = &mut map.corridors[idx];
        while corridor.path.len() > 2 && owned.contains(&corridor.path[0]) {
            corridor.path.remove(0);
            removed += 1;
        }
        while corridor.path.len() > 2 && corridor.path.last().is_some_and(|p| owned.contains(p)) {
            corridor.path.pop();
            removed += 1;
        }
        owned.extend(corridor.path.iter().copied());
    }
    removed
}

/// Total corridor network length in tiles.
pub fn total_length(map: &OfficeMap) -> usize {
    map.corridors.iter().map(|c| c.len()).sum()
}

/// Ordered list of corridors to traverse from room `a` to room `b`,
/// found by breadth-first search over the corridor network. `None` when
/// either room is unknown or no route exists; `Some(vec![])` when
/// `a == b`.
pub fn shortest_route(map: &OfficeMap, a: RoomId, b: RoomId) -> Option<Vec<CorridorId>> {
    map.room(a)?;
    map.room(b)?;
    if a == b {
        return Some(Vec::new());
    }

    let mut prev: HashMap<RoomId, (RoomId, CorridorId)> = HashMap::new();
    let mut queue = VecDeque::from([a]);
    let mut seen = BTreeSet::from([a]);
    'search: while let Some(id) = queue.pop_front() {
        // Deterministic expansion: corridors in id order.
        let mut hops: Vec<(RoomId, CorridorId)> = map
            .corridors
            .iter()
            .filter_map(|c| c.other_end(id).map(|o| (o, c.id)))
            .collect();
        hops.sort_by_key(|h| h.1);
        for (next, corridor) in hops {
            if seen.insert(next) {
                prev.insert(next, (id, corridor));
                if next == b {
                    break 'search;
                }
                queue.push_back(next);
            }
        }
    }

    if !prev.contains_key(&b) {
        return None;
    }
    let mut route = Vec::new();
    let mut cur = b;
    while cur != a {
        let (before, corridor) = prev[&cur];
        route.push(corridor);
        cur = before;
    }
    route.reverse();
    Some(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn corner_map() -> OfficeMap {
        // 4 rooms at the corners of a 20x20 square inside a larger map
        let mut map = OfficeMap::new(Rect::new(0, 0, 40, 40), 0);
        map.add_room(Rect::new(2, 2, 6, 6));
        map.add_room(Rect::new(22, 2, 6, 6));
        map.add_room(Rect::new(2, 22, 6, 6));
        map.add_room(Rect::new(22, 22, 6, 6));
        map
    }

    fn grid_map(n_per_side: i32, room_side: i32) -> OfficeMap {
        let pitch = room_side + 6;
        let size = n_per_side * pitch + 6;
        let mut map = OfficeMap::new(Rect::new(0, 0, size, size), 0);
        for gy in 0..n_per_side {
            for gx in 0..n_per_side {
                map.add_room(Rect::new(
                    3 + gx * pitch,
                    3 + gy * pitch,
                    room_side,
                    room_side,
                ));
            }
        }
        map
    }

    #[test]
    fn test_tracker_merge() {
        let mut tracker = ConnectivityTracker::new(4);
        assert!(!tracker.are_connected(0, 1));
        tracker.merge(0, 1);
        tracker.merge(1, 2);
        assert!(tracker.are_connected(0, 2));
        assert!(!tracker.all_connected());
        tracker.merge(2, 3);
        assert!(tracker.all_connected());
    }

    #[test]
    fn test_core_selection_floor() {
        let map = corner_map();
        let config = CorridorConfig {
            core_fraction: 0.1,
            min_core_rooms: 3,
            ..CorridorConfig::default()
        };
        let core = select_core_rooms(&map, &config);
        assert_eq!(core.len(), 3);
    }

    #[test]
    fn test_core_selection_spreads() {
        let map = grid_map(3, 6);
        let config = CorridorConfig {
            core_fraction: 0.4,
            min_core_rooms: 2,
            ..CorridorConfig::default()
        };
        let core = select_core_rooms(&map, &config);
        // Picked rooms should not be huddled: max pairwise distance of
        // the selection should span a good part of the map.
        let mut max_d: f64 = 0.0;
        for i in 0..core.len() {
            for j in (i + 1)..core.len() {
                let a = map.room(core[i]).unwrap().center();
                let b = map.room(core[j]).unwrap().center();
                max_d = max_d.max(a.euclidean(b));
            }
        }
        assert!(max_d > map.bounds.width as f64 * 0.5);
    }

    #[test]
    fn test_mst_primary_corridor_bound() {
        // 4 rooms at grid corners: MST uses at most N-1 = 3 primaries
        let mut map = corner_map();
        let config = CorridorConfig {
            min_core_rooms: 4,
            core_fraction: 1.0,
            ..CorridorConfig::default()
        };
        let mut rng = GenRng::new(42);
        connect(&mut map, &config, &mut rng);
        let primaries = map
            .corridors
            .iter()
            .filter(|c| c.kind == CorridorKind::Primary)
            .count();
        assert!(primaries <= 3, "expected <= 3 primaries, got {primaries}");
    }

    #[test]
    fn test_connect_reaches_everything() {
        let mut map = grid_map(4, 6);
        let config = CorridorConfig::default();
        let mut rng = GenRng::new(12345);
        connect(&mut map, &config, &mut rng);
        let report = repair_connectivity(&mut map, &config, &mut rng);
        assert!(
            report.fully_connected,
            "unreachable rooms: {:?}",
            report.unreachable
        );
    }

    #[test]
    fn test_corridors_well_formed() {
        let mut map = grid_map(3, 6);
        let mut rng = GenRng::new(7);
        connect(&mut map, &CorridorConfig::default(), &mut rng);
        assert!(!map.corridors.is_empty());
        for corridor in &map.corridors {
            assert!(corridor.is_well_formed(), "corridor {} is malformed", corridor.id);
            assert!((MIN_CORRIDOR_WIDTH..=MAX_CORRIDOR_WIDTH).contains(&corridor.width));
        }
    }

    #[test]
    fn test_connect_deterministic() {
        let snapshot = |seed: u64| {
            let mut map = grid_map(4, 6);
            let mut rng = GenRng::new(seed);
            connect(&mut map, &CorridorConfig::default(), &mut rng);
            map.corridors
                .iter()
                .map(|c| (c.id, c.rooms, c.path.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(snapshot(99), snapshot(99));
    }

    #[test]
    fn test_seeds_change_routes() {
        let snapshot = |seed: u64| {
            let mut map = grid_map(4, 6);
            let mut rng = GenRng::new(seed);
            connect(&mut map, &CorridorConfig::default(), &mut rng);
            map.corridors
                .iter()
                .map(|c| c.path.clone())
                .collect::<Vec<_>>()
        };
        assert_ne!(snapshot(1), snapshot(2));
    }

    #[test]
    fn test_doorways_on_boundaries() {
        let mut map = grid_map(3, 6);
        let mut rng = GenRng::new(3);
        connect(&mut map, &CorridorConfig::default(), &mut rng);
        for room in &map.rooms {
            for doorway in &room.doorways {
                assert!(room.bounds.on_boundary(doorway.pos));
            }
        }
    }

    #[test]
    fn test_validate_reports_orphans() {
        let mut map = corner_map();
        // Only connect three of the four rooms
        let mut rng = GenRng::new(1);
        route_corridor(
            &mut map,
            RoomId(0),
            RoomId(1),
            2,
            CorridorKind::Primary,
            &mut rng,
        )
        .unwrap();
        route_corridor(
            &mut map,
            RoomId(1),
            RoomId(2),
            2,
            CorridorKind::Primary,
            &mut rng,
        )
        .unwrap();

        let report = validate_connectivity(&map);
        assert!(!report.fully_connected);
        assert_eq!(report.unreachable, vec![RoomId(3)]);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_repair_fixes_orphans() {
        let mut map = corner_map();
        let mut rng = GenRng::new(1);
        route_corridor(
            &mut map,
            RoomId(0),
            RoomId(1),
            2,
            CorridorKind::Primary,
            &mut rng,
        )
        .unwrap();

        let config = CorridorConfig::default();
        let report = repair_connectivity(&mut map, &config, &mut rng);
        assert!(report.fully_connected);
        assert!(map
            .corridors
            .iter()
            .any(|c| c.kind == CorridorKind::Repair));
    }

    #[test]
    fn test_optimize_preserves_structure() {
        let mut map = grid_map(3, 6);
        let mut rng = GenRng::new(11);
        let config = CorridorConfig::default();
        connect(&mut map, &config, &mut rng);
        let before = validate_connectivity(&map);
        let endpoints: Vec<_> = map
            .corridors
            .iter()
            .map(|c| (*c.path.first().unwrap(), *c.path.last().unwrap()))
            .collect();

        optimize(&mut map, &config);

        for (corridor, (first, last)) in map.corridors.iter().zip(&endpoints) {
            assert!(corridor.is_well_formed());
            assert_eq!(corridor.path.first().unwrap(), first);
            assert_eq!(corridor.path.last().unwrap(), last);
        }
        assert_eq!(
            validate_connectivity(&map).fully_connected,
            before.fully_connected
        );
    }

    #[test]
    fn test_optimize_straightens_staircase() {
        // Two rooms joined by a hand-built serpentine corridor across
        // open ground. Aligned endpoints make a straight line legal, so
        // the staircase must collapse.
        let mut map = OfficeMap::new(Rect::new(0, 0, 30, 10), 0);
        let a = map.add_room(Rect::new(1, 1, 4, 4));
        let b = map.add_room(Rect::new(15, 1, 4, 4));

        let mut path = vec![Pos::new(4, 2)];
        let mut y = 2;
        for x in 5..15 {
            path.push(Pos::new(x, y));
            y = if y == 2 { 3 } else { 2 };
            path.push(Pos::new(x, y));
        }
        path.push(Pos::new(15, 2));
        let id = map
            .add_corridor((a, b), path.clone(), 2, CorridorKind::Primary)
            .unwrap();
        let turns_before = map.corridor(id).unwrap().turns();
        assert!(turns_before >= 10);

        let removed = optimize(&mut map, &CorridorConfig::default());

        let corridor = map.corridor(id).unwrap();
        assert!(removed > 0, "staircase was left untouched");
        assert!(corridor.path.len() < path.len());
        assert!(corridor.turns() < turns_before);
        assert!(corridor.is_well_formed());
        assert_eq!(*corridor.path.first().unwrap(), Pos::new(4, 2));
        assert_eq!(*corridor.path.last().unwrap(), Pos::new(15, 2));
    }

    #[test]
    fn test_optimize_disabled_by_zero_smoothing() {
        let mut map = grid_map(3, 6);
        let mut rng = GenRng::new(11);
        let config = CorridorConfig {
            smoothing: 0.0,
            ..CorridorConfig::default()
        };
        connect(&mut map, &config, &mut rng);
        assert_eq!(optimize(&mut map, &config), 0);
    }

    #[test]
    fn test_resolve_intersections() {
        let mut map = grid_map(3, 6);
        let mut rng = GenRng::new(5);
        connect(&mut map, &CorridorConfig::default(), &mut rng);
        resolve_intersections(&mut map);

        for corridor in &map.corridors {
            assert!(corridor.is_well_formed());
            assert!(corridor.path.len() >= 2);
            // End tiles of a trimmed corridor never sit on an
            // earlier corridor's path.
            for earlier in &map.corridors {
                if earlier.id >= corridor.id || corridor.path.len() <= 2 {
                    continue;
                }
                let tiles: HashSet<Pos> = earlier.path.iter().copied().collect();
                assert!(!tiles.contains(corridor.path.first().unwrap()));
                assert!(!tiles.contains(corridor.path.last().unwrap()));
            }
        }
    }

    #[test]
    fn test_total_length() {
        let mut map = corner_map();
        let mut rng = GenRng::new(2);
        route_corridor(
            &mut map,
            RoomId(0),
            RoomId(1),
            2,
            CorridorKind::Primary,
            &mut rng,
        )
        .unwrap();
        assert_eq!(total_length(&map), map.corridors[0].len());
    }

    #[test]
    fn test_shortest_route() {
        let mut map = corner_map();
        let mut rng = GenRng::new(4);
        let c01 = route_corridor(
            &mut map,
            RoomId(0),
            RoomId(1),
            2,
            CorridorKind::Primary,
            &mut rng,
        )
        .unwrap();
        let c12 = route_corridor(
            &mut map,
            RoomId(1),
            RoomId(2),
            2,
            CorridorKind::Primary,
            &mut rng,
        )
        .unwrap();

        assert_eq!(
            shortest_route(&map, RoomId(0), RoomId(2)),
            Some(vec![c01, c12])
        );
        assert_eq!(shortest_route(&map, RoomId(0), RoomId(0)), Some(vec![]));
        assert_eq!(shortest_route(&map, RoomId(0), RoomId(3)), None);
        assert_eq!(shortest_route(&map, RoomId(0), RoomId(9)), None);
    }

    #[test]
    fn test_config_validation() {
        assert!(CorridorConfig::default().validate().is_ok());
        assert!(CorridorConfig {
            primary_width: 0,
            ..CorridorConfig::default()
        }
        .validate()
        .is_err());
        assert!(CorridorConfig {
            secondary_width: 9,
            ..CorridorConfig::default()
        }
        .validate()
        .is_err());
        assert!(CorridorConfig {
            core_fraction: 0.0,
            ..CorridorConfig::default()
        }
        .validate()
        .is_err());
    }
}
