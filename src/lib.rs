//! Arcade rules engines (workspace facade crate).
//!
//! Re-exports the falling-block core (`tetris`), the tower-defense core
//! (`defense`) and their shared vocabulary (`types`); the engines live in
//! dedicated crates under `crates/`. [`headless`] drives either engine from a
//! script.

pub mod headless;

pub use arcade_defense as defense;
pub use arcade_tetris as tetris;
pub use arcade_types as types;
