//! Per-agent decision layer between the game loop and a [`Navigator`].
//!
//! The game loop calls [`Brain::remember`] with every snapshot,
//! [`Brain::set_navigation_target`] whenever its strategy changes its mind,
//! [`Brain::optimal_move`] once per frame, and [`Brain::forget_round_info`]
//! at round boundaries. All four run on the game-loop thread.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::io;
use std::time::{Duration, Instant};

use super::arena::{ArenaConfig, Command, EntityId, GameState};
use super::config::BrainConfig;
use super::navigation::{NavAction, Navigator, Obstacle, SpatialNavigator};

/// Where the agent wants to go.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavigationTarget {
    /// A fixed board point; the path is only recomputed when the target changes.
    Point(Vec2),
    /// Another tracked entity, looked up in the latest snapshot each time the
    /// path is recomputed. Recomputed on a fixed poll interval while it moves.
    Entity(EntityId),
}

pub struct Brain<N: Navigator = SpatialNavigator> {
    navigator: N,
    config: BrainConfig,
    state: Option<GameState>,
    target: Option<NavigationTarget>,
    poll_interval: Option<Duration>,
    last_recalculation: Option<Instant>,
    /// A recalculation was requested before any snapshot arrived.
    recalculation_pending: bool,
    /// The last command turned a stationary agent; the next one must be `Move`.
    resume_pending: bool,
}

impl Brain<SpatialNavigator> {
    /// Brain backed by a freshly spawned tile navigator.
    pub fn spawn(arena: &ArenaConfig, config: BrainConfig) -> io::Result<Self> {
        let navigator = SpatialNavigator::spawn(arena, &config)?;
        Ok(Self::new(navigator, config))
    }
}

impl<N: Navigator> Brain<N> {
    pub fn new(navigator: N, config: BrainConfig) -> Self {
        Self {
            navigator,
            config,
            state: None,
            target: None,
            poll_interval: None,
            last_recalculation: None,
            recalculation_pending: false,
            resume_pending: false,
        }
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn target(&self) -> Option<NavigationTarget> {
        self.target
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval
    }

    pub fn is_resume_pending(&self) -> bool {
        self.resume_pending
    }

    pub fn remember(&mut self, state: GameState) {
        self.remember_at(state, Instant::now());
    }

    /// [`Brain::remember`] with an explicit clock reading.
    ///
    /// Walls become obstacles the first time a round's snapshot is seen; the
    /// navigator keeps them until [`Brain::forget_round_info`]. Registration
    /// happens before any poll-driven recalculation so that search sees them.
    pub fn remember_at(&mut self, state: GameState, now: Instant) {
        if !state.walls.is_empty() && !self.navigator.has_obstacles() {
            for wall in &state.walls {
                self.navigator.add_obstacle(Obstacle::from_wall(wall));
            }
            info!("[BRAIN] registered {} walls as obstacles", state.walls.len());
        }

        self.state = Some(state);

        let poll_due = match (self.poll_interval, self.last_recalculation) {
            (Some(_), None) => true,
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            (None, _) => false,
        };
        if poll_due || self.recalculation_pending {
            self.recalculate(now);
        }
    }

    pub fn set_navigation_target(&mut self, target: NavigationTarget) {
        self.set_navigation_target_at(target, Instant::now());
    }

    /// [`Brain::set_navigation_target`] with an explicit clock reading.
    pub fn set_navigation_target_at(&mut self, target: NavigationTarget, now: Instant) {
        let changed = self.target != Some(target);
        self.target = Some(target);
        if !changed && self.last_recalculation.is_some() {
            return;
        }

        self.poll_interval = match target {
            NavigationTarget::Entity(_) => Some(self.config.entity_poll_interval()),
            NavigationTarget::Point(_) => None,
        };
        self.recalculate(now);
    }

    /// Drop everything tied to the finished round.
    ///
    /// The target survives, but the path planned for it was searched against
    /// the old walls, so the first snapshot of the next round re-plans it
    /// (after registering the new walls) and an entity target resumes polling.
    pub fn forget_round_info(&mut self) {
        self.navigator.clear_obstacles();
        self.state = None;
        self.resume_pending = false;
        self.recalculation_pending = self.target.is_some();
        self.poll_interval = match self.target {
            Some(NavigationTarget::Entity(_)) => Some(self.config.entity_poll_interval()),
            _ => None,
        };
        self.last_recalculation = None;
        info!("[BRAIN] round info cleared");
    }

    /// Command for this frame, or `None` when no snapshot has been remembered.
    pub fn optimal_move(&mut self) -> Option<Command> {
        if self.resume_pending {
            self.resume_pending = false;
            return Some(Command::Move);
        }

        let Some(me) = self.state.as_ref().map(|state| state.me) else {
            warn!("[BRAIN] asked for a move before any game state arrived");
            return None;
        };

        let Some(target) = self.target else {
            debug!("[BRAIN] no navigation target, keep moving");
            return Some(Command::Move);
        };

        match self.navigator.next_action(me.position) {
            None => {
                debug!("[BRAIN] no path towards {:?}, keep moving", target);
                Some(Command::Move)
            }
            Some(NavAction::Go { heading }) => {
                if !me.moving {
                    self.resume_pending = true;
                }
                Some(Command::TurnTo { heading })
            }
            Some(NavAction::Stop) => Some(Command::Stop),
        }
    }

    fn recalculate(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };
        let Some(state) = self.state.as_ref() else {
            debug!("[BRAIN] no game state yet, deferring recalculation towards {:?}", target);
            self.recalculation_pending = true;
            return;
        };

        self.recalculation_pending = false;
        self.last_recalculation = Some(now);

        let destination = match target {
            NavigationTarget::Point(point) => Some(point),
            NavigationTarget::Entity(id) => state.position_of(id),
        };
        match destination {
            Some(destination) => self.navigator.recalculate(state.me.position, destination),
            None => debug!("[BRAIN] target {:?} is not in the latest snapshot, retrying on next poll", target),
        }
    }
}
