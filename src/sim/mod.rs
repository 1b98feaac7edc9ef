//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (every rate is per tick)
//! - Seeded RNG passed in by the caller
//! - No rendering or platform dependencies

pub mod background;
pub mod character;
pub mod collision;
pub mod obstacle;
pub mod state;

pub use background::{Background, Cloud};
pub use character::Character;
pub use collision::{Rect, check_collisions};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleManager, Spawned};
pub use state::RoundState;
