use bevy::prelude::*;
use helmsman::bot::{BrainConfig, Navigator, Obstacle, SpatialNavigator, TileGrid};

const BOARD: f32 = 500.0;

fn spawn_navigator() -> SpatialNavigator {
    let grid = TileGrid::new(Vec2::splat(BOARD), Vec2::splat(10.0));
    SpatialNavigator::with_grid(grid, &BrainConfig::default()).expect("navigator threads spawn")
}

/// Scatter of axis-aligned blocks, reproducible from `seed`.
fn random_obstacles(seed: u64, count: usize) -> Vec<Obstacle> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| {
            let origin = Vec2::new(rng.f32() * 450.0, rng.f32() * 450.0);
            let width = 5.0 + rng.f32() * 40.0;
            let height = 5.0 + rng.f32() * 40.0;
            Obstacle::new(origin, width, height)
        })
        .collect()
}

fn random_point(rng: &mut fastrand::Rng) -> Vec2 {
    Vec2::new(rng.f32() * BOARD, rng.f32() * BOARD)
}

fn solve(navigator: &SpatialNavigator, source: Vec2, destination: Vec2) -> Vec<Vec2> {
    navigator.recalculate(source, destination);
    navigator.wait_for_recalculation();
    navigator.remaining_path()
}

#[test]
fn test_repeated_searches_are_identical() {
    let navigator = spawn_navigator();
    for obstacle in random_obstacles(1234, 40) {
        navigator.add_obstacle(obstacle);
    }

    let mut rng = fastrand::Rng::with_seed(99);
    for _ in 0..20 {
        let source = random_point(&mut rng);
        let destination = random_point(&mut rng);

        let first = solve(&navigator, source, destination);
        for run in 0..3 {
            let again = solve(&navigator, source, destination);
            assert_eq!(first, again, "Run {} from {:?} to {:?} diverged", run, source, destination);
        }
    }
}

#[test]
fn test_independent_navigators_agree() {
    let a = spawn_navigator();
    let b = spawn_navigator();
    for obstacle in random_obstacles(42, 60) {
        a.add_obstacle(obstacle);
        b.add_obstacle(obstacle);
    }

    let mut rng = fastrand::Rng::with_seed(5);
    let mut routed = 0;
    for _ in 0..25 {
        let source = random_point(&mut rng);
        let destination = random_point(&mut rng);

        let path_a = solve(&a, source, destination);
        let path_b = solve(&b, source, destination);
        assert_eq!(path_a, path_b, "Navigators disagree from {:?} to {:?}", source, destination);
        if !path_a.is_empty() {
            routed += 1;
        }
    }

    println!("{} of 25 random trips found a route", routed);
}

#[test]
fn test_paths_avoid_random_obstacles() {
    let navigator = spawn_navigator();
    let obstacles = random_obstacles(777, 50);
    for obstacle in &obstacles {
        navigator.add_obstacle(*obstacle);
    }

    let grid = *navigator.grid();
    let mut rng = fastrand::Rng::with_seed(31);
    for _ in 0..20 {
        let source = random_point(&mut rng);
        let destination = random_point(&mut rng);
        let path = solve(&navigator, source, destination);
        let Some((&last, centers)) = path.split_last() else {
            continue;
        };

        // Past the start tile, every center belongs to a free tile.
        for point in centers.iter().skip(1) {
            let tile = grid.tile_of(*point);
            assert_eq!(grid.tile_center(tile), *point);
            assert!(obstacles.iter().all(|o| !o.blocks(grid.tile_bounds(tile))),
                "Waypoint {:?} sits on a blocked tile", point);
        }
        assert!(last.distance(destination) <= grid.tile_size().max_element());
    }
}
