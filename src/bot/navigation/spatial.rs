//! Tile-based navigator running on two dedicated threads.
//!
//! * The **state context** (`nav-state`) owns the obstacle set and the current
//!   path. Every read and write of either goes through its request queue, so
//!   it is the single writer of both.
//! * The **search context** (`nav-search`) runs A* jobs strictly one at a
//!   time in submission order. Each job asks the state context for a private
//!   obstacle snapshot, searches without touching shared state, and commits
//!   its result back with a single [`StateRequest::CommitPath`].
//!
//! Both contexts talk over crossbeam channels; nothing is shared behind a lock.

use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use helmsman_macros::profile;
use std::collections::VecDeque;
use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::bot::arena::ArenaConfig;
use crate::bot::config::BrainConfig;
use crate::bot::geometry::{distance, heading_to};
use super::astar::{plan_waypoints, SearchContext};
use super::grid::TileGrid;
use super::navigator::Navigator;
use super::types::{NavAction, Obstacle};

pub(super) enum StateRequest {
    AddObstacle(Obstacle),
    ClearObstacles,
    HasObstacles(Sender<bool>),
    SnapshotObstacles(Sender<Vec<Obstacle>>),
    CommitPath(Vec<Vec2>),
    NextAction { position: Vec2, reply: Sender<Option<NavAction>> },
    RemainingPath(Sender<Vec<Vec2>>),
    Shutdown,
}

enum SearchRequest {
    Recalculate { source: Vec2, destination: Vec2 },
    /// Answered once every earlier request has been processed.
    Drain(Sender<()>),
    Shutdown,
}

/// Data owned by the state context.
pub(super) struct NavigatorState {
    pub(super) obstacles: Vec<Obstacle>,
    pub(super) path: VecDeque<Vec2>,
    pub(super) snap_distance: f32,
}

impl NavigatorState {
    pub(super) fn new(snap_distance: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            path: VecDeque::new(),
            snap_distance,
        }
    }

    /// Returns `false` once the context should stop.
    pub(super) fn handle(&mut self, request: StateRequest) -> bool {
        match request {
            StateRequest::AddObstacle(obstacle) => self.obstacles.push(obstacle),
            StateRequest::ClearObstacles => self.obstacles.clear(),
            StateRequest::HasObstacles(reply) => {
                let _ = reply.send(!self.obstacles.is_empty());
            }
            StateRequest::SnapshotObstacles(reply) => {
                let _ = reply.send(self.obstacles.clone());
            }
            StateRequest::CommitPath(waypoints) => self.path = VecDeque::from(waypoints),
            StateRequest::NextAction { position, reply } => {
                let _ = reply.send(self.next_action(position));
            }
            StateRequest::RemainingPath(reply) => {
                let _ = reply.send(self.path.iter().copied().collect());
            }
            StateRequest::Shutdown => return false,
        }
        true
    }

    /// Drop every leading waypoint already within snapping distance, then
    /// steer towards the first one left.
    pub(super) fn next_action(&mut self, position: Vec2) -> Option<NavAction> {
        while let Some(&waypoint) = self.path.front() {
            if distance(position, waypoint) <= self.snap_distance {
                self.path.pop_front();
                continue;
            }
            return Some(NavAction::Go { heading: heading_to(position, waypoint) });
        }
        None
    }
}

fn run_state_context(requests: Receiver<StateRequest>, snap_distance: f32) {
    let mut state = NavigatorState::new(snap_distance);
    for request in requests.iter() {
        if !state.handle(request) {
            break;
        }
    }
    debug!("[NAV] state context stopped");
}

#[profile(10)]
fn run_search(grid: &TileGrid, obstacles: &[Obstacle], source: Vec2, destination: Vec2) -> Vec<Vec2> {
    plan_waypoints(&SearchContext::new(grid, obstacles), source, destination)
}

fn run_search_context(
    grid: TileGrid,
    requests: Receiver<SearchRequest>,
    state: Sender<StateRequest>,
    slow_search: Duration,
) {
    for request in requests.iter() {
        match request {
            SearchRequest::Recalculate { source, destination } => {
                let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
                if state.send(StateRequest::SnapshotObstacles(reply_tx)).is_err() {
                    warn!("[NAV] state context is gone, stopping search context");
                    break;
                }
                let Ok(obstacles) = reply_rx.recv() else {
                    warn!("[NAV] state context is gone, stopping search context");
                    break;
                };

                let start_time = Instant::now();
                let waypoints = run_search(&grid, &obstacles, source, destination);
                let elapsed = start_time.elapsed();
                if elapsed > slow_search {
                    warn!("[NAV] Slow search: {:?} from {:?} to {:?} against {} obstacles",
                          elapsed, source, destination, obstacles.len());
                }

                if waypoints.is_empty() {
                    debug!("[NAV] no route from {:?} to {:?}", source, destination);
                } else {
                    info!("[NAV] publishing path with {} waypoints to {:?}", waypoints.len(), destination);
                }

                if state.send(StateRequest::CommitPath(waypoints)).is_err() {
                    warn!("[NAV] state context is gone, stopping search context");
                    break;
                }
            }
            SearchRequest::Drain(reply) => {
                let _ = reply.send(());
            }
            SearchRequest::Shutdown => break,
        }
    }
    debug!("[NAV] search context stopped");
}

/// [`Navigator`] backed by A* over agent-sized tiles.
pub struct SpatialNavigator {
    grid: TileGrid,
    state_tx: Sender<StateRequest>,
    search_tx: Sender<SearchRequest>,
    state_handle: Option<JoinHandle<()>>,
    search_handle: Option<JoinHandle<()>>,
}

impl SpatialNavigator {
    /// Spawn a navigator whose tiles match the agent's footprint.
    pub fn spawn(arena: &ArenaConfig, config: &BrainConfig) -> io::Result<Self> {
        Self::with_grid(TileGrid::from_arena(arena), config)
    }

    pub fn with_grid(grid: TileGrid, config: &BrainConfig) -> io::Result<Self> {
        let (state_tx, state_rx) = crossbeam_channel::unbounded();
        let (search_tx, search_rx) = crossbeam_channel::unbounded();

        let snap_distance = grid.snap_distance(config.snap_fraction);
        let state_handle = thread::Builder::new()
            .name("nav-state".into())
            .spawn(move || run_state_context(state_rx, snap_distance))?;

        let worker_state_tx = state_tx.clone();
        let slow_search = Duration::from_millis(config.slow_search_warn_ms);
        let search_handle = thread::Builder::new()
            .name("nav-search".into())
            .spawn(move || run_search_context(grid, search_rx, worker_state_tx, slow_search));
        let search_handle = match search_handle {
            Ok(handle) => handle,
            Err(e) => {
                let _ = state_tx.send(StateRequest::Shutdown);
                let _ = state_handle.join();
                return Err(e);
            }
        };

        info!("[NAV] navigator ready: {}x{} tiles of {:?}", grid.columns(), grid.rows(), grid.tile_size());

        Ok(Self {
            grid,
            state_tx,
            search_tx,
            state_handle: Some(state_handle),
            search_handle: Some(search_handle),
        })
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Copy of the waypoints not yet reached.
    pub fn remaining_path(&self) -> Vec<Vec2> {
        self.query(StateRequest::RemainingPath)
    }

    fn post(&self, request: StateRequest) {
        if self.state_tx.send(request).is_err() {
            warn!("[NAV] state context is gone, dropping update");
        }
    }

    /// Synchronous round trip through the state context. A dead context
    /// answers with `T::default()`.
    fn query<T: Default>(&self, make: impl FnOnce(Sender<T>) -> StateRequest) -> T {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        if self.state_tx.send(make(reply_tx)).is_err() {
            warn!("[NAV] state context is gone");
            return T::default();
        }
        reply_rx.recv().unwrap_or_else(|_| {
            warn!("[NAV] state context dropped a query");
            T::default()
        })
    }
}

impl Navigator for SpatialNavigator {
    fn has_obstacles(&self) -> bool {
        self.query(StateRequest::HasObstacles)
    }

    fn add_obstacle(&self, obstacle: Obstacle) {
        self.post(StateRequest::AddObstacle(obstacle));
    }

    fn clear_obstacles(&self) {
        self.post(StateRequest::ClearObstacles);
    }

    fn recalculate(&self, source: Vec2, destination: Vec2) {
        if self.search_tx.send(SearchRequest::Recalculate { source, destination }).is_err() {
            warn!("[NAV] search context is gone, dropping recalculation");
        }
    }

    fn wait_for_recalculation(&self) {
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        if self.search_tx.send(SearchRequest::Drain(reply_tx)).is_err() {
            warn!("[NAV] search context is gone");
            return;
        }
        let _ = reply_rx.recv();
    }

    fn next_action(&self, position: Vec2) -> Option<NavAction> {
        self.query(|reply| StateRequest::NextAction { position, reply })
    }
}

impl Drop for SpatialNavigator {
    fn drop(&mut self) {
        // Queued searches still run to completion before the worker sees this.
        let _ = self.search_tx.send(SearchRequest::Shutdown);
        if let Some(handle) = self.search_handle.take() {
            if handle.join().is_err() {
                warn!("[NAV] search context panicked");
            }
        }
        let _ = self.state_tx.send(StateRequest::Shutdown);
        if let Some(handle) = self.state_handle.take() {
            if handle.join().is_err() {
                warn!("[NAV] state context panicked");
            }
        }
    }
}
