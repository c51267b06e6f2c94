//! Scripted drivers that run either engine without a frontend
//!
//! Both drivers are deterministic: the same seed (or config) and the same
//! length always produce the same final snapshot.

use tracing::{debug, info};

use crate::defense::types::{GridCell, TowerKind};
use crate::defense::{DefenseConfig, DefenseSnapshot, Simulation};
use crate::tetris::types::GameAction;
use crate::tetris::{GameSnapshot, GameState, TetrisConfig};

/// Milliseconds per frame for the falling-block driver
pub const FRAME_MS: u32 = 16;

/// Frames spent on each piece before it is hard dropped
const FRAMES_PER_PIECE: u32 = 12;

/// Seconds per tick for the tower-defense driver
pub const DEFENSE_TICK: f32 = 1.0 / 60.0;

/// Give up on a wave after this many ticks (five minutes of game time)
const MAX_WAVE_TICKS: u32 = 60 * 60 * 5;

/// Build rotation for the autoplayer
const BUILD_ORDER: [TowerKind; 3] = [TowerKind::Scout, TowerKind::Cannon, TowerKind::Burst];

/// Scripted intent for `frame`, given the id of the piece in play.
///
/// Every piece gets an optional rotation, a column shift derived from its
/// id, then a hard drop on the last frame of its slot.
fn scripted_action(frame: u32, piece_id: u32) -> Option<GameAction> {
    let step = frame % FRAMES_PER_PIECE;
    let shift = (piece_id % 7) as i32 - 3;

    match step {
        0 if piece_id % 2 == 0 => Some(GameAction::RotateCw),
        s if s >= 1 && (s as i32) <= shift.abs() => Some(if shift < 0 {
            GameAction::MoveLeft
        } else {
            GameAction::MoveRight
        }),
        s if s == FRAMES_PER_PIECE - 1 => Some(GameAction::HardDrop),
        _ => None,
    }
}

/// Play `frames` frames of a scripted session and return the final snapshot.
///
/// Stops early on game over.
pub fn run_tetris(config: TetrisConfig, frames: u32) -> GameSnapshot {
    let mut game = GameState::new(config);
    game.start();

    for frame in 0..frames {
        if game.game_over() {
            break;
        }
        if let Some(action) = scripted_action(frame, game.piece_id()) {
            game.apply_action(action);
        }
        game.update(FRAME_MS);
        if let Some(event) = game.take_last_event() {
            if event.lines_cleared > 0 {
                debug!(frame, lines = event.lines_cleared, score = game.score(), "lines cleared");
            }
        }
    }

    info!(
        seed = config.seed,
        frames,
        score = game.score(),
        lines = game.lines(),
        game_over = game.game_over(),
        "tetris run finished"
    );
    game.snapshot()
}

/// Open cells ordered by closeness to the path, nearest first.
fn build_sites(sim: &Simulation) -> Vec<GridCell> {
    let (columns, rows) = sim.config().grid_dimensions();
    let mut sites: Vec<(f32, GridCell)> = (0..rows)
        .flat_map(|row| (0..columns).map(move |column| GridCell::new(column, row)))
        .filter_map(|cell| {
            let center = sim.check_placement(cell).ok()?;
            Some((sim.path().distance_to_point(center), cell))
        })
        .collect();
    sites.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    sites.into_iter().map(|(_, cell)| cell).collect()
}

/// Spend money between waves: new towers first, then upgrades.
fn spend(sim: &mut Simulation) {
    let mut sites = build_sites(sim).into_iter();

    loop {
        let kind = BUILD_ORDER[sim.towers().len() % BUILD_ORDER.len()];
        let Some(cost) = sim.config().tower(kind).map(|spec| spec.build_cost()) else {
            break;
        };
        if sim.money() < cost {
            break;
        }
        let Some(cell) = sites.next() else {
            break;
        };
        if let Err(err) = sim.place_tower(cell, kind) {
            debug!(%err, column = cell.column, row = cell.row, "placement skipped");
        }
    }

    let cells: Vec<GridCell> = sim.towers().iter().map(|tower| tower.cell).collect();
    for cell in cells {
        if sim.select_tower(cell).is_err() {
            continue;
        }
        while sim.upgrade_tower().is_ok() {}
    }
    sim.deselect_tower();
}

/// Autoplay up to `waves` waves with a fixed build strategy.
///
/// Each wave runs until it clears or the base falls.
pub fn run_defense(config: DefenseConfig, waves: u32) -> DefenseSnapshot {
    let mut sim = Simulation::new(config);

    for _ in 0..waves {
        if sim.game_over() {
            break;
        }
        spend(&mut sim);
        if let Err(err) = sim.start_next_wave() {
            debug!(%err, "wave not started");
            break;
        }

        let mut ticks = 0;
        while ticks < MAX_WAVE_TICKS && !sim.game_over() && !sim.can_start_next_wave() {
            sim.update(DEFENSE_TICK);
            ticks += 1;
        }

        let events = sim.drain_events();
        debug!(wave = sim.wave_number(), ticks, events = events.len(), "wave finished");
    }

    info!(
        wave = sim.wave_number(),
        lives = sim.lives(),
        money = sim.money(),
        towers = sim.towers().len(),
        game_over = sim.game_over(),
        "defense run finished"
    );
    sim.snapshot()
}
