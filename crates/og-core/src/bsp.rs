//! Recursive space partitioning.
//!
//! Carves the map rectangle into candidate room regions by repeatedly
//! splitting nodes in two. All randomness comes from the one `GenRng`
//! threaded through the recursion, and draws happen in a fixed order per
//! node (stop roll, axis pick when needed, offset roll) with the left
//! child always recursed before the right. That ordering is what makes
//! the whole tree reproducible for a fixed seed; do not reorder it.

use serde::{Deserialize, Serialize};

use crate::error::GenError;
use crate::geometry::{Rect, SplitAxis};
use crate::rng::GenRng;

/// Which axis the partitioner prefers to cut along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SplitPreference {
    /// Cut across the longer side (ties broken randomly).
    #[default]
    LongestAxis,
    /// Horizontal cuts only.
    Horizontal,
    /// Vertical cuts only.
    Vertical,
    /// Alternate by depth: horizontal on even depths, vertical on odd.
    Alternate,
}

/// Partitioner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BspConfig {
    /// Minimum side length of any partition, in tiles.
    pub min_partition_size: i32,
    /// Maximum recursion depth.
    pub max_depth: u32,
    pub split_preference: SplitPreference,
    /// Split offset perturbation as a fraction of the cut side length,
    /// in [0, 0.5].
    pub split_variation: f64,
    /// Per-node probability of stopping early, in [0, 1). Never applied
    /// at the root.
    pub stop_chance: f64,
}

impl Default for BspConfig {
    fn default() -> Self {
        Self {
            min_partition_size: 10,
            max_depth: 5,
            split_preference: SplitPreference::LongestAxis,
            split_variation: 0.25,
            stop_chance: 0.1,
        }
    }
}

impl BspConfig {
    /// Reject out-of-range configuration. Invalid values are errors, not
    /// silently clamped.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.min_partition_size < 1 {
            return Err(GenError::InvalidConfig {
                field: "min_partition_size",
                reason: format!("must be at least 1, got {}", self.min_partition_size),
            });
        }
        if !(0.0..=0.5).contains(&self.split_variation) {
            return Err(GenError::InvalidConfig {
                field: "split_variation",
                reason: format!("must be in [0, 0.5], got {}", self.split_variation),
            });
        }
        if !(0.0..1.0).contains(&self.stop_chance) {
            return Err(GenError::InvalidConfig {
                field: "stop_chance",
                reason: format!("must be in [0, 1), got {}", self.stop_chance),
            });
        }
        Ok(())
    }
}

/// A node in the partition tree. Either a leaf (no children, may later
/// hold a room rectangle) or an internal node with exactly two children
/// whose rectangles tile this node's rectangle.
#[derive(Debug, Clone)]
pub struct PartitionNode {
    pub bounds: Rect,
    pub depth: u32,
    /// Cut orientation, set on internal nodes.
    pub axis: Option<SplitAxis>,
    /// Size of the first child along the cut dimension.
    pub offset: Option<i32>,
    pub children: Option<Box<(PartitionNode, PartitionNode)>>,
    /// Room rectangle attached by the room builder, leaves only.
    pub room: Option<Rect>,
}

impl PartitionNode {
    fn leaf(bounds: Rect, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            axis: None,
            offset: None,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Leaves in traversal order (left child before right). Room ids are
    /// assigned in this order, so it must stay stable.
    pub fn leaves(&self) -> Vec<&PartitionNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a PartitionNode>) {
        match &self.children {
            None => out.push(self),
            Some(pair) => {
                pair.0.collect_leaves(out);
                pair.1.collect_leaves(out);
            }
        }
    }

    /// Visit leaves mutably in traversal order.
    pub fn for_each_leaf_mut(&mut self, f: &mut impl FnMut(&mut PartitionNode)) {
        match &mut self.children {
            None => f(self),
            Some(pair) => {
                pair.0.for_each_leaf_mut(f);
                pair.1.for_each_leaf_mut(f);
            }
        }
    }
}

/// Recursively partition `bounds` under the config's constraints.
pub fn partition(bounds: Rect, config: &BspConfig, rng: &mut GenRng) -> PartitionNode {
    let mut root = PartitionNode::leaf(bounds, 0);
    split_node(&mut root, config, rng);
    root
}

fn split_node(node: &mut PartitionNode, config: &BspConfig, rng: &mut GenRng) {
    if node.depth >= config.max_depth {
        return;
    }
    // Stop roll first: it must consume its draw before the axis and
    // offset rolls, or sibling subtrees would desynchronize.
    if node.depth > 0 && rng.chance(config.stop_chance) {
        return;
    }

    let Some(axis) = choose_axis(node, config, rng) else {
        return;
    };

    let length = match axis {
        SplitAxis::Horizontal => node.bounds.height,
        SplitAxis::Vertical => node.bounds.width,
    };
    let min = config.min_partition_size;
    let mid = length as f64 / 2.0;
    let shift = rng.signed_fraction() * config.split_variation * length as f64;
    let offset = ((mid + shift).round() as i32).clamp(min, length - min);

    let (first, second) = node.bounds.split(axis, offset);
    node.axis = Some(axis);
    node.offset = Some(offset);
    let mut left = PartitionNode::leaf(first, node.depth + 1);
    let mut right = PartitionNode::leaf(second, node.depth + 1);
    split_node(&mut left, config, rng);
    split_node(&mut right, config, rng);
    node.children = Some(Box::new((left, right)));
}

/// Pick the cut axis, or None if no feasible axis exists and the node
/// stays a leaf.
fn choose_axis(node: &PartitionNode, config: &BspConfig, rng: &mut GenRng) -> Option<SplitAxis> {
    let min = config.min_partition_size;
    let h_ok = node.bounds.height >= 2 * min;
    let v_ok = node.bounds.width >= 2 * min;

    match config.split_preference {
        SplitPreference::Horizontal => h_ok.then_some(SplitAxis::Horizontal),
        SplitPreference::Vertical => v_ok.then_some(SplitAxis::Vertical),
        SplitPreference::Alternate => {
            let (primary, primary_ok, fallback, fallback_ok) = if node.depth % 2 == 0 {
                (SplitAxis::Horizontal, h_ok, SplitAxis::Vertical, v_ok)
            } else {
                (SplitAxis::Vertical, v_ok, SplitAxis::Horizontal, h_ok)
            };
            if primary_ok {
                Some(primary)
            } else if fallback_ok {
                Some(fallback)
            } else {
                None
            }
        }
        SplitPreference::LongestAxis => {
            if node.bounds.width > node.bounds.height {
                if v_ok {
                    Some(SplitAxis::Vertical)
                } else if h_ok {
                    Some(SplitAxis::Horizontal)
                } else {
                    None
                }
            } else if node.bounds.height > node.bounds.width {
                if h_ok {
                    Some(SplitAxis::Horizontal)
                } else if v_ok {
                    Some(SplitAxis::Vertical)
                } else {
                    None
                }
            } else if h_ok && v_ok {
                // Square and both feasible: one draw decides.
                if rng.one_in(2) {
                    Some(SplitAxis::Horizontal)
                } else {
                    Some(SplitAxis::Vertical)
                }
            } else {
                None
            }
        }
    }
}
