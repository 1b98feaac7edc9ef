//! Per-round counters: scroll speed, score, best score

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyProfile;

/// Scroll speed is stored in fixed point so that accumulating small per-tick
/// increments is exact and clamps land precisely on the profile maximum.
const SPEED_SCALE: f32 = 10_000.0;

fn to_speed_units(speed: f32) -> u32 {
    (speed.max(0.0) * SPEED_SCALE).round() as u32
}

/// Round counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundState {
    speed_units: u32,
    score: f64,
    high_score: u64,
}

impl RoundState {
    pub fn new(high_score: u64) -> Self {
        Self {
            speed_units: 0,
            score: 0.0,
            high_score,
        }
    }

    /// World px per tick
    pub fn speed(&self) -> f32 {
        self.speed_units as f32 / SPEED_SCALE
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Whole points, as displayed and persisted
    pub fn display_score(&self) -> u64 {
        self.score.floor() as u64
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Fresh round at the profile's starting speed
    pub fn start(&mut self, profile: &DifficultyProfile) {
        self.speed_units = to_speed_units(profile.initial_speed);
        self.score = 0.0;
    }

    /// Ramp speed toward the profile maximum; never decreases
    pub fn accelerate(&mut self, profile: &DifficultyProfile) {
        let max = to_speed_units(profile.max_speed);
        let step = to_speed_units(profile.speed_increment);
        self.speed_units = self.speed_units.saturating_add(step).min(max).max(self.speed_units);
    }

    pub fn add_score(&mut self, points: f64) {
        self.score += points;
    }

    /// Record the finished round. Returns true if it set a new best.
    pub fn record_high_score(&mut self) -> bool {
        let final_score = self.display_score();
        if final_score > self.high_score {
            self.high_score = final_score;
            true
        } else {
            false
        }
    }

    /// Zero score and speed, keep the best score
    pub fn clear(&mut self) {
        self.speed_units = 0;
        self.score = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Difficulty, Tuning};

    #[test]
    fn test_easy_speed_clamps_at_max() {
        let tuning = Tuning::default();
        let profile = tuning.profile(Difficulty::Easy);
        let mut round = RoundState::new(0);
        round.start(profile);
        assert_eq!(round.speed(), 3.0);

        for _ in 0..10_000 {
            round.accelerate(profile);
        }
        assert_eq!(round.speed(), 6.0);

        for _ in 0..10 {
            round.accelerate(profile);
        }
        assert_eq!(round.speed(), 6.0);
    }

    #[test]
    fn test_high_score_only_increases() {
        let mut round = RoundState::new(100);
        round.add_score(99.5);
        assert!(!round.record_high_score());
        assert_eq!(round.high_score(), 100);

        round.clear();
        round.add_score(150.5);
        assert!(round.record_high_score());
        assert_eq!(round.high_score(), 150);
    }

    #[test]
    fn test_clear_keeps_high_score() {
        let tuning = Tuning::default();
        let mut round = RoundState::new(42);
        round.start(tuning.profile(Difficulty::Hard));
        round.add_score(10.0);
        round.clear();
        assert_eq!(round.speed(), 0.0);
        assert_eq!(round.score(), 0.0);
        assert_eq!(round.high_score(), 42);
    }
}
