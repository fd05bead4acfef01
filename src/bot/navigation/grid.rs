use bevy::prelude::*;
use smallvec::SmallVec;

use crate::bot::arena::ArenaConfig;
use crate::bot::geometry::rect_from_origin;
use super::types::TileCoord;

/// Partition of the board into equally sized tiles, the vertex set of the
/// search graph.
///
/// Tile `(x, y)` covers `[x * w, (x + 1) * w) × [y * h, (y + 1) * h)`. Any
/// strip narrower than a tile at the right or bottom edge is folded into the
/// last column/row by [`TileGrid::tile_of`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileGrid {
    board: Vec2,
    tile_size: Vec2,
    columns: usize,
    rows: usize,
}

impl TileGrid {
    pub fn new(board: Vec2, tile_size: Vec2) -> Self {
        let tile_size = if tile_size.x > 0.0 && tile_size.y > 0.0 {
            tile_size
        } else {
            warn!("Invalid tile size {:?}, falling back to 1x1 tiles", tile_size);
            Vec2::ONE
        };
        let columns = ((board.x / tile_size.x).floor() as usize).max(1);
        let rows = ((board.y / tile_size.y).floor() as usize).max(1);
        Self { board, tile_size, columns, rows }
    }

    /// Tiles are the size of the agent's footprint.
    pub fn from_arena(arena: &ArenaConfig) -> Self {
        Self::new(arena.board_size(), arena.agent_size())
    }

    pub fn board_size(&self) -> Vec2 {
        self.board
    }

    pub fn tile_size(&self) -> Vec2 {
        self.tile_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Tile containing a board point. Points off the board clamp to the nearest edge tile.
    pub fn tile_of(&self, point: Vec2) -> TileCoord {
        let x = (point.x / self.tile_size.x).floor().max(0.0) as usize;
        let y = (point.y / self.tile_size.y).floor().max(0.0) as usize;
        TileCoord::new(x.min(self.columns - 1), y.min(self.rows - 1))
    }

    pub fn tile_bounds(&self, coord: TileCoord) -> Rect {
        let origin = Vec2::new(coord.x as f32, coord.y as f32) * self.tile_size;
        rect_from_origin(origin, self.tile_size.x, self.tile_size.y)
    }

    pub fn tile_center(&self, coord: TileCoord) -> Vec2 {
        (Vec2::new(coord.x as f32, coord.y as f32) + Vec2::splat(0.5)) * self.tile_size
    }

    #[inline]
    pub fn index_of(&self, coord: TileCoord) -> usize {
        coord.y * self.columns + coord.x
    }

    /// Up, down, left and right neighbours that lie on the board. No diagonals.
    pub fn neighbors(&self, coord: TileCoord) -> SmallVec<[TileCoord; 4]> {
        let mut out = SmallVec::new();
        if coord.y > 0 {
            out.push(TileCoord::new(coord.x, coord.y - 1));
        }
        if coord.y + 1 < self.rows {
            out.push(TileCoord::new(coord.x, coord.y + 1));
        }
        if coord.x > 0 {
            out.push(TileCoord::new(coord.x - 1, coord.y));
        }
        if coord.x + 1 < self.columns {
            out.push(TileCoord::new(coord.x + 1, coord.y));
        }
        out
    }

    /// Distance at which a waypoint counts as reached.
    pub fn snap_distance(&self, fraction: f32) -> f32 {
        self.tile_size.min_element() * fraction
    }
}
