//! Types exchanged with the surrounding bot: game-state snapshots coming in,
//! commands going out. Transport and wire encoding live outside this crate;
//! everything here derives serde so the transport layer can decode straight
//! into it.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::geometry::rect_from_center;

/// Server-assigned identifier of a tracked entity.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Our own agent as seen in a snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub position: Vec2,
    /// Whether the agent is currently travelling. A heading change sent to a
    /// stationary agent must be followed by an explicit [`Command::Move`].
    pub moving: bool,
}

/// Any other entity the server tracks (opponents, pickups, ...).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntity {
    pub position: Vec2,
}

/// Static wall, described by its center and extent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Wall {
    pub fn bounds(&self) -> Rect {
        rect_from_center(self.center, self.width, self.height)
    }
}

/// One frame of game state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub me: AgentState,
    #[serde(default)]
    pub others: BTreeMap<EntityId, TrackedEntity>,
    #[serde(default)]
    pub walls: Vec<Wall>,
}

impl GameState {
    pub fn position_of(&self, id: EntityId) -> Option<Vec2> {
        self.others.get(&id).map(|entity| entity.position)
    }
}

/// Per-game settings announced by the server on connect.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub board_width: f32,
    pub board_height: f32,
    /// Footprint of our agent; the navigator uses it as the tile size.
    pub agent_width: f32,
    pub agent_height: f32,
}

impl ArenaConfig {
    pub fn board_size(&self) -> Vec2 {
        Vec2::new(self.board_width, self.board_height)
    }

    pub fn agent_size(&self) -> Vec2 {
        Vec2::new(self.agent_width, self.agent_height)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            board_width: 500.0,
            board_height: 500.0,
            agent_width: 10.0,
            agent_height: 10.0,
        }
    }
}

/// Outward command vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Face the given heading (radians, see [`super::geometry::heading_to`]).
    /// Does not start motion on its own.
    TurnTo { heading: f32 },
    /// Start (or keep) moving along the current heading.
    Move,
    Stop,
}
