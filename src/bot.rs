//! Spatial reasoning for one autonomous arena agent.
//!
//! The [`brain::Brain`] turns game-state snapshots into outward commands. It
//! owns a [`navigation::Navigator`], which keeps the static obstacles of the
//! current round and a path computed by tile-based A* on a background thread.

pub mod arena;
pub mod brain;
pub mod config;
pub mod geometry;
pub mod navigation;

pub use arena::{AgentState, ArenaConfig, Command, EntityId, GameState, TrackedEntity, Wall};
pub use brain::{Brain, NavigationTarget};
pub use config::BrainConfig;
pub use navigation::{NavAction, Navigator, Obstacle, SpatialNavigator, TileCoord, TileGrid};
