//! Barkour - a retro endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character physics, obstacles, collisions)
//! - `game`: Screen state machine driving the simulation
//! - `input`: Raw device events to semantic actions
//! - `scene`: Abstract drawing surface and per-screen composition
//! - `renderer`: WebGPU backend for the drawing surface
//! - `persistence`: Local key-value records (high score, selection, settings)
//! - `leaderboard`: Cloud auth and scored-record store
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod game;
pub mod input;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod timer;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use game::{Action, Game, GameEvent, ScreenState, Services};
pub use settings::Settings;
pub use tuning::{CharacterKind, Difficulty, DifficultyProfile, Tuning};

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep (the balance numbers are tuned per 60 Hz tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches, breakpoints)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Shown top-right on every screen
    pub const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));
}
