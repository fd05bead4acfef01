mod astar;
mod grid;
mod navigator;
mod spatial;
mod types;


// ============================================================================
// PUBLIC API
// ============================================================================

pub use astar::{find_tile_path, plan_waypoints, SearchContext};
pub use grid::TileGrid;
pub use navigator::Navigator;
pub use spatial::SpatialNavigator;
pub use types::{NavAction, Obstacle, TileCoord, TileNode};
