//! Tower-defense session tests through the facade

use arcade::defense::types::{GridCell, TowerKind};
use arcade::defense::{CommandError, DefenseConfig, DefenseEvent, Path, Simulation, Status};
use arcade::defense::glam::Vec2;

const DT: f32 = 1.0 / 60.0;

/// Tick until the current wave has drained and the field is clear
fn run_wave(sim: &mut Simulation) -> u32 {
    let mut ticks = 0;
    while !sim.can_start_next_wave() && !sim.game_over() && ticks < 60 * 600 {
        sim.update(DT);
        ticks += 1;
    }
    ticks
}

#[test]
fn test_scout_wave_one_end_to_end() {
    let mut sim = Simulation::new(DefenseConfig::default());
    assert_eq!(sim.money(), 260);

    sim.place_tower(GridCell::new(2, 3), TowerKind::Scout).unwrap();
    assert_eq!(sim.money(), 180);

    let started = sim.start_next_wave().unwrap();
    assert_eq!(started.wave, 1);
    assert_eq!(started.enemy_count, 10);
    assert!(!sim.can_start_next_wave());
    assert_eq!(sim.status(), Status::WaveActive);

    let ticks = run_wave(&mut sim);
    assert!(ticks > 0);
    assert!(!sim.game_over());
    assert!(sim.enemies().is_empty());
    assert!(sim.can_start_next_wave());
    assert_eq!(sim.status(), Status::Intermission);

    // Ticking on in intermission never advances the wave counter
    for _ in 0..600 {
        sim.update(DT);
    }
    assert_eq!(sim.wave_number(), 1);

    let events = sim.drain_events();
    assert!(events.contains(&DefenseEvent::WaveCleared { wave: 1 }));
    let kills = events
        .iter()
        .filter(|event| matches!(event, DefenseEvent::EnemyKilled { .. }))
        .count();
    let escapes = events
        .iter()
        .filter(|event| matches!(event, DefenseEvent::EnemyEscaped { .. }))
        .count();
    assert_eq!(kills + escapes, 10);
    assert_eq!(sim.lives(), 20 - escapes as u32);
}

#[test]
fn test_undefended_wave_costs_one_life_per_grunt() {
    let mut sim = Simulation::new(DefenseConfig::default());
    sim.start_next_wave().unwrap();
    run_wave(&mut sim);

    assert_eq!(sim.lives(), 10);
    assert_eq!(sim.money(), 260);
    let escapes = sim
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, DefenseEvent::EnemyEscaped { .. }))
        .count();
    assert_eq!(escapes, 10);
}

#[test]
fn test_next_wave_refused_while_running() {
    let mut sim = Simulation::new(DefenseConfig::default());
    sim.start_next_wave().unwrap();
    assert_eq!(sim.start_next_wave(), Err(CommandError::WaveInProgress));
    assert_eq!(sim.wave_number(), 1);
}

#[test]
fn test_placement_rules() {
    let mut sim = Simulation::new(DefenseConfig::default());

    assert_eq!(
        sim.place_tower(GridCell::new(16, 0), TowerKind::Scout),
        Err(CommandError::OutOfBounds)
    );
    assert_eq!(
        sim.place_tower(GridCell::new(0, 1), TowerKind::Scout),
        Err(CommandError::TooCloseToPath)
    );

    sim.place_tower(GridCell::new(0, 0), TowerKind::Cannon).unwrap();
    assert_eq!(
        sim.place_tower(GridCell::new(0, 0), TowerKind::Scout),
        Err(CommandError::Occupied)
    );
    assert_eq!(
        sim.place_tower(GridCell::new(2, 3), TowerKind::Burst),
        Err(CommandError::CannotAffordPlacement {
            name: "Burst".to_string(),
            shortfall: 20
        })
    );
    assert_eq!(sim.status_message(), "Need 20 more to place Burst.");
    assert_eq!(sim.money(), 95);
}

#[test]
fn test_upgrade_and_sell() {
    let mut sim = Simulation::new(DefenseConfig::default());
    sim.place_tower(GridCell::new(0, 0), TowerKind::Scout).unwrap();

    sim.select_tower(GridCell::new(0, 0)).unwrap();
    assert_eq!(sim.upgrade_tower(), Ok(2));
    assert_eq!(sim.money(), 110);

    assert_eq!(sim.sell_tower(), Ok(105));
    assert_eq!(sim.money(), 215);
    assert!(sim.towers().is_empty());
    assert_eq!(sim.sell_tower(), Err(CommandError::NoTowerSelected));
}

#[test]
fn test_path_endpoints_and_continuity() {
    let config = DefenseConfig::default();
    let path = Path::new(config.waypoints.clone());

    assert_eq!(path.total_length(), 1580.0);
    assert_eq!(path.point_at_distance(0.0), Vec2::new(-40.0, 90.0));
    assert_eq!(path.point_at_distance(path.total_length()), Vec2::new(1000.0, 390.0));
    assert_eq!(path.point_at_distance(5_000.0), Vec2::new(1000.0, 390.0));

    let mut previous = path.point_at_distance(0.0);
    for step in 1..=158 {
        let point = path.point_at_distance(step as f32 * 10.0);
        assert!(point.distance(previous) <= 10.0 + 1e-3);
        previous = point;
    }
}

#[test]
fn test_restart_resets_economy() {
    let mut sim = Simulation::new(DefenseConfig::default());
    sim.place_tower(GridCell::new(0, 0), TowerKind::Scout).unwrap();
    sim.start_next_wave().unwrap();
    run_wave(&mut sim);

    sim.restart();
    assert_eq!(sim.money(), 260);
    assert_eq!(sim.lives(), 20);
    assert_eq!(sim.wave_number(), 0);
    assert!(sim.towers().is_empty());
    assert!(sim.drain_events().is_empty());
}
