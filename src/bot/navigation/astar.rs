use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use helmsman_macros::profile;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::collections::BinaryHeap;

use crate::bot::geometry::clamp_to_board;
use super::grid::TileGrid;
use super::types::{Obstacle, OpenEntry, TileCoord, TileNode};

/// Everything one search needs, passed down explicitly. The obstacle slice is
/// the search's private snapshot; it is never re-read from the navigator.
#[derive(Clone, Copy)]
pub struct SearchContext<'a> {
    pub grid: &'a TileGrid,
    pub obstacles: &'a [Obstacle],
}

impl<'a> SearchContext<'a> {
    pub fn new(grid: &'a TileGrid, obstacles: &'a [Obstacle]) -> Self {
        Self { grid, obstacles }
    }

    pub fn is_blocked(&self, coord: TileCoord) -> bool {
        let bounds = self.grid.tile_bounds(coord);
        self.obstacles.iter().any(|obstacle| obstacle.blocks(bounds))
    }
}

fn reconstruct_path(nodes: &FxHashMap<TileCoord, TileNode>, goal: TileCoord) -> Vec<TileCoord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(parent) = nodes.get(&current).and_then(|node| node.parent) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

/// A* over the 4-connected tile graph with unit step cost and the Manhattan
/// heuristic.
///
/// Returns the tiles from `start` to `goal` inclusive, or `None` when the
/// obstacles leave no route. Tiles whose bounds overlap an obstacle are never
/// entered; the start tile itself is exempt since the agent is already on it.
#[profile(10)]
pub fn find_tile_path(ctx: &SearchContext, start: TileCoord, goal: TileCoord) -> Option<Vec<TileCoord>> {
    let grid = ctx.grid;

    // Node arena keyed by tile; parent links are keys into it.
    let mut nodes: FxHashMap<TileCoord, TileNode> = FxHashMap::default();
    let mut closed = FixedBitSet::with_capacity(grid.tile_count());
    let mut open = BinaryHeap::new();

    let mut start_node = TileNode::new(start, start.manhattan(goal));
    start_node.g_score = 0;
    open.push(OpenEntry::of(&start_node));
    nodes.insert(start, start_node);

    while let Some(entry) = open.pop() {
        let current = entry.coord;
        let index = grid.index_of(current);
        if closed.contains(index) {
            continue;
        }
        // Superseded by a cheaper entry for the same tile.
        if nodes.get(&current).map_or(true, |node| node.g_score != entry.g) {
            continue;
        }
        closed.insert(index);

        if current == goal {
            return Some(reconstruct_path(&nodes, goal));
        }

        let tentative_g = entry.g + 1;
        for neighbor in grid.neighbors(current) {
            if closed.contains(grid.index_of(neighbor)) || ctx.is_blocked(neighbor) {
                continue;
            }

            match nodes.entry(neighbor) {
                Entry::Occupied(mut occupied) => {
                    let node = occupied.get_mut();
                    if tentative_g < node.g_score {
                        node.g_score = tentative_g;
                        node.parent = Some(current);
                        open.push(OpenEntry::of(node));
                    }
                }
                Entry::Vacant(vacant) => {
                    let mut node = TileNode::new(neighbor, neighbor.manhattan(goal));
                    node.g_score = tentative_g;
                    node.parent = Some(current);
                    open.push(OpenEntry::of(&node));
                    vacant.insert(node);
                }
            }
        }
    }

    None
}

/// Board-space waypoints for a trip from `source` to `destination`.
///
/// The tile path is turned into tile centers, followed by the exact
/// destination (clamped to the board) unless it already coincides with the
/// last center. Empty when there is no route.
pub fn plan_waypoints(ctx: &SearchContext, source: Vec2, destination: Vec2) -> Vec<Vec2> {
    let grid = ctx.grid;
    let start = grid.tile_of(source);
    let goal = grid.tile_of(destination);

    let Some(tiles) = find_tile_path(ctx, start, goal) else {
        return Vec::new();
    };

    let mut waypoints: Vec<Vec2> = tiles.iter().map(|&tile| grid.tile_center(tile)).collect();
    let destination = clamp_to_board(destination, grid.board_size());
    if waypoints.last() != Some(&destination) {
        waypoints.push(destination);
    }
    waypoints
}
