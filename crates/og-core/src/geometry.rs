//! Integer grid primitives shared by every generation stage.
//!
//! Coordinates are `i32` so partition arithmetic never needs the
//! saturating-sub dance an unsigned representation would force.

use serde::{Deserialize, Serialize};

/// A position on the tile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Euclidean distance to another position.
    pub fn euclidean(self, other: Pos) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Position one step in the given direction.
    pub fn step(self, dir: Dir) -> Pos {
        let (dx, dy) = dir.delta();
        Pos::new(self.x + dx, self.y + dy)
    }

    /// True if the two positions differ by exactly one axis-aligned step.
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }
}

/// Cardinal direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Dir {
    North,
    South,
    East,
    West,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::North, Dir::South, Dir::East, Dir::West];

    /// Unit delta for this direction. North is negative y.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::North => (0, -1),
            Dir::South => (0, 1),
            Dir::East => (1, 0),
            Dir::West => (-1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::South => Dir::North,
            Dir::East => Dir::West,
            Dir::West => Dir::East,
        }
    }
}

/// Orientation of a partition cut. A horizontal cut stacks the two
/// children top/bottom (it divides the height); a vertical cut places
/// them side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitAxis {
    Horizontal,
    Vertical,
}

/// An axis-aligned integer rectangle. `x`/`y` is the top-left corner;
/// the right and bottom edges are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    pub fn center(&self) -> Pos {
        Pos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x < self.right() && pos.y >= self.y && pos.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Shrink the rectangle by `margin` on every side. May produce an
    /// invalid rectangle; callers check `is_valid`.
    pub fn inset(&self, margin: i32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2 * margin,
            self.height - 2 * margin,
        )
    }

    /// True if `pos` lies on the one-tile-wide perimeter ring of the
    /// rectangle (still inside it).
    pub fn on_boundary(&self, pos: Pos) -> bool {
        self.contains(pos)
            && (pos.x == self.x
                || pos.x == self.right() - 1
                || pos.y == self.y
                || pos.y == self.bottom() - 1)
    }

    /// Interior of the rectangle (everything but the perimeter ring).
    pub fn interior(&self) -> Rect {
        self.inset(1)
    }

    /// Split into two rectangles that exactly tile this one. `offset` is
    /// the size of the first child along the cut dimension.
    pub fn split(&self, axis: SplitAxis, offset: i32) -> (Rect, Rect) {
        match axis {
            SplitAxis::Horizontal => (
                Rect::new(self.x, self.y, self.width, offset),
                Rect::new(self.x, self.y + offset, self.width, self.height - offset),
            ),
            SplitAxis::Vertical => (
                Rect::new(self.x, self.y, offset, self.height),
                Rect::new(self.x + offset, self.y, self.width - offset, self.height),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 6, 5);
        assert_eq!(r.right(), 16);
        assert_eq!(r.bottom(), 25);
        assert_eq!(r.area(), 30);
        assert_eq!(r.center(), Pos::new(13, 22));
    }

    #[test]
    fn test_rect_contains() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains(Pos::new(0, 0)));
        assert!(r.contains(Pos::new(9, 9)));
        assert!(!r.contains(Pos::new(10, 9)));
        assert!(!r.contains(Pos::new(-1, 5)));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(10, 0, 5, 5);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Edges are exclusive, so touching rectangles do not intersect
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_rect_split_tiles_parent() {
        let r = Rect::new(2, 3, 20, 10);
        let (top, bottom) = r.split(SplitAxis::Horizontal, 4);
        assert_eq!(top, Rect::new(2, 3, 20, 4));
        assert_eq!(bottom, Rect::new(2, 7, 20, 6));
        assert_eq!(top.area() + bottom.area(), r.area());

        let (left, right) = r.split(SplitAxis::Vertical, 8);
        assert_eq!(left.bottom(), r.bottom());
        assert_eq!(right.x, 10);
        assert!(!left.intersects(&right));
    }

    #[test]
    fn test_rect_boundary() {
        let r = Rect::new(0, 0, 5, 5);
        assert!(r.on_boundary(Pos::new(0, 2)));
        assert!(r.on_boundary(Pos::new(4, 4)));
        assert!(!r.on_boundary(Pos::new(2, 2)));
        assert!(!r.on_boundary(Pos::new(5, 0)));
    }

    #[test]
    fn test_inset() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.inset(2), Rect::new(2, 2, 6, 6));
        assert!(!r.inset(5).is_valid());
    }

    #[test]
    fn test_pos_adjacency() {
        let p = Pos::new(3, 3);
        assert!(p.is_adjacent(Pos::new(3, 4)));
        assert!(p.is_adjacent(Pos::new(2, 3)));
        assert!(!p.is_adjacent(Pos::new(4, 4)));
        assert!(!p.is_adjacent(p));
    }

    #[test]
    fn test_dir_round_trip() {
        for dir in Dir::ALL {
            let p = Pos::new(0, 0).step(dir);
            assert!(p.is_adjacent(Pos::new(0, 0)));
            assert_eq!(p.step(dir.opposite()), Pos::new(0, 0));
        }
    }
}
