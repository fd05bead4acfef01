use bevy::prelude::*;

use super::types::{NavAction, Obstacle};

/// Capability set every pathfinding strategy offers the brain.
///
/// All methods take `&self`: implementations own their mutable state behind
/// their own execution contexts, and the brain only ever talks to them from
/// the game-loop thread.
pub trait Navigator {
    /// True once at least one obstacle has been registered this round.
    fn has_obstacles(&self) -> bool;

    /// Register a static obstacle. Searches already running keep the snapshot
    /// they started with.
    fn add_obstacle(&self, obstacle: Obstacle);

    /// Forget every obstacle (round boundary).
    fn clear_obstacles(&self);

    /// Queue a path computation and return immediately. Requests run one at a
    /// time in submission order; the latest to finish wins.
    fn recalculate(&self, source: Vec2, destination: Vec2);

    /// Block until every request queued so far has finished and been published.
    fn wait_for_recalculation(&self);

    /// Steering for an agent at `position`, advancing along the current path.
    /// `None` when there is no path or its end has been reached. Never blocks
    /// on a search and never starts one.
    fn next_action(&self, position: Vec2) -> Option<NavAction>;
}
