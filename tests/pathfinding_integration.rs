use bevy::prelude::*;
use helmsman::bot::{BrainConfig, NavAction, Navigator, Obstacle, SpatialNavigator, TileGrid};

/// 500x500 board, 10x10 tiles.
fn spawn_navigator() -> SpatialNavigator {
    let grid = TileGrid::new(Vec2::new(500.0, 500.0), Vec2::new(10.0, 10.0));
    SpatialNavigator::with_grid(grid, &BrainConfig::default()).expect("navigator threads spawn")
}

#[test]
fn test_full_board_diagonal_path() {
    let navigator = spawn_navigator();
    let destination = Vec2::new(499.0, 499.0);

    navigator.recalculate(Vec2::ZERO, destination);
    navigator.wait_for_recalculation();

    let path = navigator.remaining_path();
    assert_eq!(path.len(), 100, "Expected 99 tile centers plus the destination");
    assert!(path.last().unwrap().distance(destination) <= 10.0);
    assert!(matches!(navigator.next_action(Vec2::ZERO), Some(NavAction::Go { .. })));
}

#[test]
fn test_sealed_strip_yields_no_action() {
    let navigator = spawn_navigator();
    navigator.add_obstacle(Obstacle::new(Vec2::new(240.0, 0.0), 20.0, 500.0));
    assert!(navigator.has_obstacles());

    navigator.recalculate(Vec2::new(100.0, 250.0), Vec2::new(400.0, 250.0));
    navigator.wait_for_recalculation();

    assert!(navigator.remaining_path().is_empty());
    assert_eq!(navigator.next_action(Vec2::new(100.0, 250.0)), None);
}

#[test]
fn test_gap_in_strip_is_found() {
    let navigator = spawn_navigator();
    // Same strip with a one-tile gap at y in [300, 310].
    navigator.add_obstacle(Obstacle::new(Vec2::new(240.0, 0.0), 20.0, 300.0));
    navigator.add_obstacle(Obstacle::new(Vec2::new(240.0, 310.0), 20.0, 190.0));

    navigator.recalculate(Vec2::new(100.0, 250.0), Vec2::new(400.0, 250.0));
    navigator.wait_for_recalculation();

    let path = navigator.remaining_path();
    assert!(!path.is_empty());
    let crossing: Vec<_> = path.iter().filter(|p| p.x > 240.0 && p.x < 260.0).collect();
    assert!(!crossing.is_empty());
    for point in crossing {
        assert_eq!(point.y, 305.0, "Crossed the strip outside the gap at {:?}", point);
    }
}

#[test]
fn test_consumption_shrinks_path_until_empty() {
    let navigator = spawn_navigator();
    navigator.recalculate(Vec2::new(5.0, 5.0), Vec2::new(205.0, 5.0));
    navigator.wait_for_recalculation();

    let waypoints = navigator.remaining_path();
    assert_eq!(waypoints.len(), 21);

    let mut remaining = waypoints.len();
    for waypoint in waypoints {
        let action = navigator.next_action(waypoint);
        let now = navigator.remaining_path().len();
        assert!(now < remaining, "Path did not shrink at {:?}", waypoint);
        remaining = now;
        if remaining > 0 {
            // Everything left lies to the east.
            match action {
                Some(NavAction::Go { heading }) => assert!(heading.abs() < 1e-4),
                other => panic!("Expected Go, got {:?}", other),
            }
        } else {
            assert_eq!(action, None);
        }
    }

    assert_eq!(navigator.next_action(Vec2::new(205.0, 5.0)), None);
}

#[test]
fn test_later_request_wins() {
    let navigator = spawn_navigator();
    navigator.recalculate(Vec2::new(5.0, 5.0), Vec2::new(495.0, 495.0));
    navigator.recalculate(Vec2::new(5.0, 5.0), Vec2::new(45.0, 5.0));
    navigator.wait_for_recalculation();

    let path = navigator.remaining_path();
    assert_eq!(path.len(), 5);
    assert_eq!(*path.last().unwrap(), Vec2::new(45.0, 5.0));
}

#[test]
fn test_duplicate_obstacle_registration() {
    let once = spawn_navigator();
    let twice = spawn_navigator();
    let wall = Obstacle::new(Vec2::new(100.0, 50.0), 30.0, 300.0);

    once.add_obstacle(wall);
    twice.add_obstacle(wall);
    twice.add_obstacle(wall);

    for navigator in [&once, &twice] {
        navigator.recalculate(Vec2::new(20.0, 200.0), Vec2::new(300.0, 200.0));
        navigator.wait_for_recalculation();
    }

    assert!(!once.remaining_path().is_empty());
    assert_eq!(once.remaining_path(), twice.remaining_path());
}

#[test]
fn test_clear_obstacles_reopens_board() {
    let navigator = spawn_navigator();
    navigator.add_obstacle(Obstacle::new(Vec2::new(240.0, 0.0), 20.0, 500.0));
    navigator.clear_obstacles();
    assert!(!navigator.has_obstacles());

    navigator.recalculate(Vec2::new(105.0, 255.0), Vec2::new(405.0, 255.0));
    navigator.wait_for_recalculation();
    // 31 tile centers in a straight row; the destination is itself a center.
    assert_eq!(navigator.remaining_path().len(), 31);
}

#[test]
fn test_search_ignores_obstacles_added_after_it_finished() {
    let navigator = spawn_navigator();
    navigator.recalculate(Vec2::new(100.0, 250.0), Vec2::new(400.0, 250.0));
    navigator.wait_for_recalculation();
    let before = navigator.remaining_path();

    navigator.add_obstacle(Obstacle::new(Vec2::new(240.0, 0.0), 20.0, 500.0));
    assert_eq!(navigator.remaining_path(), before);

    navigator.recalculate(Vec2::new(100.0, 250.0), Vec2::new(400.0, 250.0));
    navigator.wait_for_recalculation();
    assert!(navigator.remaining_path().is_empty());
}

#[test]
fn test_drop_with_queued_searches() {
    let navigator = spawn_navigator();
    for i in 0..8 {
        navigator.recalculate(Vec2::ZERO, Vec2::new(499.0, 60.0 * i as f32));
    }
    drop(navigator);
}
