//! Data-driven game balance
//!
//! A `Tuning` is built once at startup and shared read-only. World units are
//! pixels of the 1600x800 logical playfield; rates are per fixed tick.

use serde::{Deserialize, Serialize};

/// Difficulty levels offered on the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// First entry on the selection screen
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Selection order
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Key used in the score store and on screen
    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Index wraps around the three options
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

/// Playable characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CharacterKind {
    #[default]
    Buddy,
    Neet,
}

impl CharacterKind {
    pub const ALL: [CharacterKind; 2] = [CharacterKind::Buddy, CharacterKind::Neet];

    pub fn name(&self) -> &'static str {
        match self {
            CharacterKind::Buddy => "Buddy",
            CharacterKind::Neet => "Neet",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            CharacterKind::Buddy => 0,
            CharacterKind::Neet => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(&self) -> Self {
        Self::from_index(self.index() + Self::ALL.len() - 1)
    }
}

/// Immutable per-difficulty bundle driving scroll speed and spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    /// Scroll speed at round start (px/tick)
    pub initial_speed: f32,
    /// Added to the scroll speed every tick
    pub speed_increment: f32,
    pub max_speed: f32,
    /// Spawn distance range, in accumulated scroll px: [min, max)
    pub min_spawn_distance: f32,
    pub max_spawn_distance: f32,
    /// Obstacle height range: [min, max)
    pub min_obstacle_height: f32,
    pub max_obstacle_height: f32,
    /// Wall-clock grace period before the first obstacle may spawn
    pub first_obstacle_delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasTuning {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTuning {
    /// Ground line (top of the ground strip)
    pub y: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsTuning {
    pub gravity: f32,
    /// Negative: up is -y
    pub jump_velocity: f32,
    /// Terminal fall speed
    pub max_fall_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterTuning {
    pub width: f32,
    pub height: f32,
    pub x: f32,
    pub hitbox_padding: f32,
    /// Ticks per running animation frame
    pub frame_delay: u32,
    pub frame_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipeTuning {
    pub width: f32,
    pub hitbox_padding: f32,
    /// Spawn position past the right edge of the playfield
    pub spawn_margin: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTuning {
    /// Fraction of scroll speed applied to clouds
    pub cloud_parallax: f32,
    /// Fraction of scroll speed applied to the brick pattern
    pub ground_parallax: f32,
    pub cloud_width: f32,
    pub cloud_height: f32,
    pub brick_size: f32,
    pub cloud_start: Vec<(f32, f32)>,
    /// Recycled clouds re-enter at canvas width + this
    pub cloud_respawn_margin: f32,
    /// Recycled cloud height range: [min, max)
    pub cloud_min_y: f32,
    pub cloud_max_y: f32,
}

/// All game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub canvas: CanvasTuning,
    pub ground: GroundTuning,
    pub physics: PhysicsTuning,
    pub character: CharacterTuning,
    pub pipe: PipeTuning,
    pub background: BackgroundTuning,
    /// Points gained per tick
    pub score_per_tick: f64,
    /// Indexed by `Difficulty::index`
    pub difficulties: [DifficultyProfile; 3],
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            canvas: CanvasTuning {
                width: 1600.0,
                height: 800.0,
            },
            ground: GroundTuning {
                y: 600.0,
                height: 200.0,
            },
            physics: PhysicsTuning {
                gravity: 0.3,
                jump_velocity: -15.0,
                max_fall_speed: 15.0,
            },
            character: CharacterTuning {
                width: 96.0,
                height: 96.0,
                x: 200.0,
                hitbox_padding: 12.0,
                frame_delay: 5,
                frame_count: 2,
            },
            pipe: PipeTuning {
                width: 80.0,
                hitbox_padding: 4.0,
                spawn_margin: 20.0,
            },
            background: BackgroundTuning {
                cloud_parallax: 0.4,
                ground_parallax: 0.4,
                cloud_width: 128.0,
                cloud_height: 48.0,
                brick_size: 32.0,
                cloud_start: vec![(100.0, 50.0), (300.0, 80.0), (500.0, 60.0), (700.0, 40.0)],
                cloud_respawn_margin: 50.0,
                cloud_min_y: 60.0,
                cloud_max_y: 200.0,
            },
            score_per_tick: 0.5,
            difficulties: [
                DifficultyProfile {
                    difficulty: Difficulty::Easy,
                    initial_speed: 3.0,
                    speed_increment: 0.0003,
                    max_speed: 6.0,
                    min_spawn_distance: 700.0,
                    max_spawn_distance: 1400.0,
                    min_obstacle_height: 60.0,
                    max_obstacle_height: 100.0,
                    first_obstacle_delay_ms: 2000,
                },
                DifficultyProfile {
                    difficulty: Difficulty::Medium,
                    initial_speed: 5.0,
                    speed_increment: 0.0006,
                    max_speed: 9.0,
                    min_spawn_distance: 500.0,
                    max_spawn_distance: 1100.0,
                    min_obstacle_height: 60.0,
                    max_obstacle_height: 100.0,
                    first_obstacle_delay_ms: 1500,
                },
                DifficultyProfile {
                    difficulty: Difficulty::Hard,
                    initial_speed: 6.0,
                    speed_increment: 0.001,
                    max_speed: 13.0,
                    min_spawn_distance: 400.0,
                    max_spawn_distance: 900.0,
                    min_obstacle_height: 60.0,
                    max_obstacle_height: 100.0,
                    first_obstacle_delay_ms: 1000,
                },
            ],
        }
    }
}

impl Tuning {
    pub fn profile(&self, difficulty: Difficulty) -> &DifficultyProfile {
        &self.difficulties[difficulty.index()]
    }

    /// Resolve a difficulty by key, falling back to MEDIUM for unknown keys
    pub fn profile_for_key(&self, key: &str) -> &DifficultyProfile {
        match Difficulty::from_key(key) {
            Some(difficulty) => self.profile(difficulty),
            None => {
                log::warn!("Unknown difficulty level: {key}, defaulting to MEDIUM");
                self.profile(Difficulty::Medium)
            }
        }
    }

    /// Top of the character sprite when standing on the ground
    pub fn character_ground_y(&self) -> f32 {
        self.ground.y - self.character.height
    }

    /// Where new obstacles appear
    pub fn spawn_x(&self) -> f32 {
        self.canvas.width + self.pipe.spawn_margin
    }
}
