//! Headless drivers and their JSON output

use arcade::defense::DefenseConfig;
use arcade::headless::{run_defense, run_tetris};
use arcade::tetris::TetrisConfig;

#[test]
fn test_tetris_snapshot_json_shape() {
    let snapshot = run_tetris(TetrisConfig::with_seed(11), 240);
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["seed"], 11);
    assert_eq!(json["board"].as_array().unwrap().len(), 22);
    assert_eq!(json["board"][0].as_array().unwrap().len(), 10);
    assert_eq!(json["next_queue"].as_array().unwrap().len(), 5);
    assert!(json["score"].as_u64().unwrap() > 0);
}

#[test]
fn test_different_seeds_diverge() {
    let a = run_tetris(TetrisConfig::with_seed(1), 600);
    let b = run_tetris(TetrisConfig::with_seed(2), 600);
    assert_ne!(a.board, b.board);
}

#[test]
fn test_defense_autoplay_is_deterministic() {
    let a = run_defense(DefenseConfig::default(), 2);
    let b = run_defense(DefenseConfig::default(), 2);
    assert_eq!(a, b);
    assert_eq!(a.wave, 2);

    let json = serde_json::to_value(&a).unwrap();
    assert_eq!(json["wave"], 2);
    assert!(json["towers"].as_array().unwrap().len() >= 1);
}

#[test]
fn test_defense_config_override_from_json() {
    let config: DefenseConfig = serde_json::from_str(r#"{ "start_money": 1000 }"#).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.start_lives, 20);

    let snapshot = run_defense(config, 0);
    assert_eq!(snapshot.money, 1000);
}
