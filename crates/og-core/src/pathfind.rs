//! A* shortest-path search over a 2D obstacle grid.
//!
//! 4-connected cells, Manhattan heuristic by default (swappable through
//! the `Heuristic` trait), optional per-cell movement-cost overlay.
//! Tie-breaking in the open set is fully ordered (f, then g, then
//! insertion sequence) so identical inputs always produce identical
//! paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::PathError;
use crate::geometry::{Dir, Pos};

/// Obstacle grid with an optional non-uniform movement cost overlay.
#[derive(Debug, Clone)]
pub struct Grid {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
    cost: Vec<u32>,
}

impl Grid {
    /// Create an open grid with uniform movement cost 1.
    pub fn new(width: i32, height: i32) -> Self {
        let n = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            blocked: vec![false; n],
            cost: vec![1; n],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn idx(&self, pos: Pos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn block(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            let i = self.idx(pos);
            self.blocked[i] = true;
        }
    }

    pub fn unblock(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            let i = self.idx(pos);
            self.blocked[i] = false;
        }
    }

    pub fn is_blocked(&self, pos: Pos) -> bool {
        self.in_bounds(pos) && self.blocked[self.idx(pos)]
    }

    /// Set the cost of entering a cell. Zero is treated as 1.
    pub fn set_cost(&mut self, pos: Pos, cost: u32) {
        if self.in_bounds(pos) {
            let i = self.idx(pos);
            self.cost[i] = cost.max(1);
        }
    }

    /// Cost of entering a cell. Out-of-bounds positions report the
    /// base cost of 1, mirroring `is_blocked`.
    pub fn cost(&self, pos: Pos) -> u32 {
        if self.in_bounds(pos) {
            self.cost[self.idx(pos)]
        } else {
            1
        }
    }
}

/// Admissible distance estimate for the search.
pub trait Heuristic {
    fn estimate(&self, from: Pos, to: Pos) -> u32;
}

/// Manhattan distance, the default for 4-connected grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, from: Pos, to: Pos) -> u32 {
        from.manhattan(to)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Open {
    f: u32,
    g: u32,
    seq: u32,
    idx: usize,
}

// Min-heap ordering with deterministic tie-breaks.
impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.g.cmp(&self.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a shortest path from `start` to `goal`, inclusive of both.
///
/// Out-of-grid endpoints are a caller error (`PathError::OutOfBounds`);
/// a blocked endpoint or an unreachable goal is `PathError::NoPath`.
pub fn find_path(
    grid: &Grid,
    start: Pos,
    goal: Pos,
    heuristic: &impl Heuristic,
) -> Result<Vec<Pos>, PathError> {
    if !grid.in_bounds(start) || !grid.in_bounds(goal) {
        return Err(PathError::OutOfBounds);
    }
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return Err(PathError::NoPath);
    }
    if start == goal {
        return Ok(vec![start]);
    }

    let n = (grid.width * grid.height) as usize;
    let mut g_score = vec![u32::MAX; n];
    let mut came_from = vec![usize::MAX; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u32;

    let start_idx = grid.idx(start);
    let goal_idx = grid.idx(goal);
    g_score[start_idx] = 0;
    heap.push(Open {
        f: heuristic.estimate(start, goal),
        g: 0,
        seq,
        idx: start_idx,
    });

    while let Some(Open { g, idx, .. }) = heap.pop() {
        if idx == goal_idx {
            return Ok(reconstruct(grid, &came_from, goal_idx));
        }
        if g > g_score[idx] {
            continue; // stale entry
        }
        let pos = Pos::new(idx as i32 % grid.width, idx as i32 / grid.width);
        for dir in Dir::ALL {
            let next = pos.step(dir);
            if !grid.in_bounds(next) || grid.is_blocked(next) {
                continue;
            }
            let next_idx = grid.idx(next);
            let tentative = g + grid.cost(next);
            if tentative < g_score[next_idx] {
                g_score[next_idx] = tentative;
                came_from[next_idx] = idx;
                seq += 1;
                heap.push(Open {
                    f: tentative + heuristic.estimate(next, goal),
                    g: tentative,
                    seq,
                    idx: next_idx,
                });
            }
        }
    }

    Err(PathError::NoPath)
}

fn reconstruct(grid: &Grid, came_from: &[usize], goal_idx: usize) -> Vec<Pos> {
    let mut path = Vec::new();
    let mut idx = goal_idx;
    loop {
        path.push(Pos::new(idx as i32 % grid.width, idx as i32 / grid.width));
        idx = came_from[idx];
        if idx == usize::MAX {
            break;
        }
    }
    path.reverse();
    path
}

/// Remove redundant collinear waypoints, keeping endpoints and every
/// direction change. The returned waypoints still describe the same
/// tile path when connected by straight segments.
pub fn smooth(path: &[Pos]) -> Vec<Pos> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let mut out = vec![path[0]];
    for w in path.windows(3) {
        let d1 = (w[1].x - w[0].x, w[1].y - w[0].y);
        let d2 = (w[2].x - w[1].x, w[2].y - w[1].y);
        if d1 != d2 {
            out.push(w[1]);
        }
    }
    out.push(*path.last().unwrap());
    out
}
