//! Rasterization of a map into a tile grid.
//!
//! The generator works on rectangles and paths; renderers want tiles.
//! `rasterize` paints rooms (wall ring, floor interior), corridors
//! widened to their recorded width, doorways, and the spawn position
//! into a dense row-major grid.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

use crate::geometry::Pos;
use crate::map::OfficeMap;

/// What occupies one map tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, strum::Display,
)]
pub enum TileKind {
    #[default]
    Void,
    Floor,
    Wall,
    CorridorFloor,
    Door,
    Spawn,
}

impl TileKind {
    /// Single-character glyph for text rendering.
    pub fn glyph(self) -> char {
        match self {
            TileKind::Void => ' ',
            TileKind::Floor => '.',
            TileKind::Wall => '#',
            TileKind::CorridorFloor => ',',
            TileKind::Door => '+',
            TileKind::Spawn => '@',
        }
    }

    /// True for tiles an occupant can stand on.
    pub fn is_walkable(self) -> bool {
        matches!(
            self,
            TileKind::Floor | TileKind::CorridorFloor | TileKind::Door | TileKind::Spawn
        )
    }
}

/// Dense row-major tile grid covering the map bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    /// Offset of tile (0, 0) in map coordinates.
    pub origin: Pos,
    tiles: Vec<TileKind>,
}

impl TileGrid {
    pub fn new(width: i32, height: i32, origin: Pos) -> Self {
        let n = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            origin,
            tiles: vec![TileKind::Void; n],
        }
    }

    fn idx(&self, pos: Pos) -> Option<usize> {
        let x = pos.x - self.origin.x;
        let y = pos.y - self.origin.y;
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    /// Tile at a map coordinate. Out of bounds reads as Void.
    pub fn get(&self, pos: Pos) -> TileKind {
        self.idx(pos)
            .map(|i| self.tiles[i])
            .unwrap_or(TileKind::Void)
    }

    /// Set a tile; writes outside the grid are dropped.
    pub fn set(&mut self, pos: Pos, kind: TileKind) {
        if let Some(i) = self.idx(pos) {
            self.tiles[i] = kind;
        }
    }

    /// Set a tile only when the current tile is Void.
    fn set_if_void(&mut self, pos: Pos, kind: TileKind) {
        if let Some(i) = self.idx(pos) {
            if self.tiles[i] == TileKind::Void {
                self.tiles[i] = kind;
            }
        }
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }

    /// Render to text, one row per line.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let i = (y * self.width + x) as usize;
                out.push(self.tiles[i].glyph());
            }
            out.push('\n');
        }
        out
    }
}

/// Paint the map into tiles. Rooms first (wall ring, floor interior),
/// then corridors widened to their width, then doorways punched through
/// walls, then the spawn marker.
pub fn rasterize(map: &OfficeMap) -> TileGrid {
    let b = map.bounds;
    let mut grid = TileGrid::new(b.width, b.height, Pos::new(b.x, b.y));

    for room in &map.rooms {
        let r = room.bounds;
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                let p = Pos::new(x, y);
                let kind = if r.on_boundary(p) {
                    TileKind::Wall
                } else {
                    TileKind::Floor
                };
                grid.set(p, kind);
            }
        }
    }

    for corridor in &map.corridors {
        let half = corridor.width as i32 / 2;
        for tile in &corridor.path {
            for dy in 0..corridor.width as i32 {
                for dx in 0..corridor.width as i32 {
                    let p = Pos::new(tile.x + dx - half, tile.y + dy - half);
                    grid.set_if_void(p, TileKind::CorridorFloor);
                }
            }
        }
    }

    for room in &map.rooms {
        for doorway in &room.doorways {
            grid.set(doorway.pos, TileKind::Door);
        }
    }

    grid.set(map.spawn, TileKind::Spawn);

    grid
}
