use bevy::prelude::*;

use helmsman::bot::{
    AgentState, ArenaConfig, Brain, BrainConfig, Command, EntityId, GameState, NavigationTarget, Navigator,
    TrackedEntity, Wall,
};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const BRAIN_CONFIG_PATH: &str = "assets/brain_config.ron";
const SCENARIO_PATH: &str = "assets/scenario.ron";

/// Simulated time between two frames.
const FRAME: Duration = Duration::from_millis(50);

/// One round played by the demo.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
struct Scenario {
    arena: ArenaConfig,
    walls: Vec<Wall>,
    start: Vec2,
    target: NavigationTarget,
    others: BTreeMap<EntityId, TrackedEntity>,
    /// Board units per frame.
    speed: f32,
    max_frames: u32,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            arena: ArenaConfig::default(),
            walls: vec![Wall { center: Vec2::new(250.0, 200.0), width: 20.0, height: 300.0 }],
            start: Vec2::new(100.0, 200.0),
            target: NavigationTarget::Point(Vec2::new(400.0, 200.0)),
            others: BTreeMap::new(),
            speed: 2.0,
            max_frames: 2000,
        }
    }
}

impl Scenario {
    fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match ron::from_str::<Scenario>(&contents) {
                Ok(scenario) => {
                    info!("Loaded scenario from {}", path.display());
                    scenario
                }
                Err(e) => {
                    error!("Failed to parse scenario: {}", e);
                    error!("Using built-in scenario");
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                error!("Using built-in scenario");
                Self::default()
            }
        }
    }
}

/// Stand-in for the game server: integrates the agent's motion between frames.
struct Kinematics {
    position: Vec2,
    heading: f32,
    moving: bool,
    speed: f32,
    board: Vec2,
}

impl Kinematics {
    fn apply(&mut self, command: Command) {
        match command {
            Command::TurnTo { heading } => self.heading = heading,
            Command::Move => self.moving = true,
            Command::Stop => self.moving = false,
        }
    }

    fn step(&mut self) {
        if !self.moving {
            return;
        }
        // Headings count counter-clockwise with y pointing up; the board's y grows downward.
        let velocity = Vec2::new(self.heading.cos(), -self.heading.sin()) * self.speed;
        self.position = (self.position + velocity).clamp(Vec2::ZERO, self.board);
    }
}

fn setup_file_logging() -> Option<String> {
    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create logs directory: {}", e);
        tracing_subscriber::registry()
            .with(default_filter())
            .with(fmt::layer().with_target(false))
            .init();
        return None;
    }

    // Keep only the last 25 runs
    cleanup_old_logs(&log_dir, 25);

    let now = chrono::Local::now();
    let log_filename = format!("helmsman_{}.log", now.format("%Y%m%d_%H%M%S"));
    let log_path = log_dir.join(&log_filename).to_string_lossy().to_string();

    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false);
    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    tracing_subscriber::registry()
        .with(default_filter())
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Some(log_path)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("helmsman=info"))
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .map(|s| s.starts_with("helmsman") && s.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn play_round(brain: &mut Brain, scenario: &Scenario) {
    let mut agent = Kinematics {
        position: scenario.start,
        heading: 0.0,
        moving: false,
        speed: scenario.speed,
        board: scenario.arena.board_size(),
    };
    let snapshot = |agent: &Kinematics| GameState {
        me: AgentState { position: agent.position, moving: agent.moving },
        others: scenario.others.clone(),
        walls: scenario.walls.clone(),
    };

    let clock = Instant::now();
    brain.remember_at(snapshot(&agent), clock);
    brain.set_navigation_target_at(scenario.target, clock);
    brain.navigator().wait_for_recalculation();

    let planned = brain.navigator().remaining_path();
    if planned.is_empty() {
        warn!("[DEMO] no route from {:?} to {:?}", scenario.start, scenario.target);
    } else {
        info!("[DEMO] planned {} waypoints from {:?} to {:?}", planned.len(), scenario.start, scenario.target);
    }

    for frame in 1..=scenario.max_frames {
        let now = clock + FRAME * frame;
        brain.remember_at(snapshot(&agent), now);
        if let Some(command) = brain.optimal_move() {
            debug!("[DEMO] frame {}: {:?} at {:?}", frame, command, agent.position);
            agent.apply(command);
        }
        if !planned.is_empty() && brain.navigator().remaining_path().is_empty() {
            info!("[DEMO] arrived at {:?} after {} frames", agent.position, frame);
            return;
        }
        agent.step();
    }

    warn!("[DEMO] gave up after {} frames at {:?}", scenario.max_frames, agent.position);
}

fn main() {
    let log_file = setup_file_logging();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Helmsman - headless navigation demo                     ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    match &log_file {
        Some(path) => println!("║  Log file: {:<45} ║", path),
        None => println!("║  Log file: {:<45} ║", "(stdout only)"),
    }
    println!("╚══════════════════════════════════════════════════════════╝");

    let config = BrainConfig::load(BRAIN_CONFIG_PATH);
    let scenario = Scenario::load(Path::new(SCENARIO_PATH));

    let mut brain = match Brain::spawn(&scenario.arena, config) {
        Ok(brain) => brain,
        Err(e) => {
            error!("Failed to start navigator threads: {}", e);
            std::process::exit(1);
        }
    };

    play_round(&mut brain, &scenario);
    brain.forget_round_info();
}
