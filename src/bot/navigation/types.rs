use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::bot::arena::Wall;
use crate::bot::geometry::{intersects, rect_from_origin};

/// Static hazard on the board. Immutable once built; registered with the
/// navigator at the start of a round and dropped wholesale at its end.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    bounds: Rect,
}

impl Obstacle {
    pub fn new(origin: Vec2, width: f32, height: f32) -> Self {
        Self { bounds: rect_from_origin(origin, width, height) }
    }

    pub fn from_rect(bounds: Rect) -> Self {
        Self { bounds }
    }

    pub fn from_wall(wall: &Wall) -> Self {
        Self { bounds: wall.bounds() }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether a tile with the given bounds is unusable because of this obstacle.
    #[inline]
    pub fn blocks(&self, tile: Rect) -> bool {
        intersects(self.bounds, tile)
    }
}

/// Momentary steering decision produced by a navigator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NavAction {
    /// Keep going, facing `heading` (radians, counter-clockwise from +x).
    Go { heading: f32 },
    /// Halt where we are. Not produced by the tile navigator today; reserved
    /// for navigators that react to moving hazards.
    Stop,
}

/// Integer lattice position of a tile: board coordinate floor-divided by the tile size.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: usize,
    pub y: usize,
}

impl TileCoord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Grid distance with 4-connected moves.
    pub fn manhattan(self, other: TileCoord) -> u32 {
        (self.x.abs_diff(other.x) + self.y.abs_diff(other.y)) as u32
    }
}

/// Search record for one tile, stored in the per-search node arena.
///
/// Identity is the tile coordinate alone: two records for the same tile are
/// interchangeable whatever their scores, which is what lets the arena double
/// as the visited set.
#[derive(Clone, Copy, Debug)]
pub struct TileNode {
    pub coord: TileCoord,
    /// Steps from the source along the best known route; `u32::MAX` until reached.
    pub g_score: u32,
    /// Manhattan distance to the destination tile.
    pub h_score: u32,
    /// Arena key of the predecessor on the best known route.
    pub parent: Option<TileCoord>,
}

impl TileNode {
    pub fn new(coord: TileCoord, h_score: u32) -> Self {
        Self {
            coord,
            g_score: u32::MAX,
            h_score,
            parent: None,
        }
    }

    #[inline]
    pub fn f_score(&self) -> u32 {
        self.g_score.saturating_add(self.h_score)
    }
}

impl PartialEq for TileNode {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord
    }
}

impl Eq for TileNode {}

impl Hash for TileNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.coord.hash(state);
    }
}

/// Open-list heap entry. Popped in order of lowest f, then lowest h (prefer
/// tiles nearer the goal), then tile coordinate so ties resolve the same way
/// every run. `g` identifies entries made stale by a later improvement.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) struct OpenEntry {
    pub f: u32,
    pub h: u32,
    pub g: u32,
    pub coord: TileCoord,
}

impl OpenEntry {
    pub fn of(node: &TileNode) -> Self {
        Self {
            f: node.f_score(),
            h: node.h_score,
            g: node.g_score,
            coord: node.coord,
        }
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.coord.cmp(&self.coord))
            .then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
