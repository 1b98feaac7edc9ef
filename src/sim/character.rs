//! The running dog

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::{CharacterKind, CharacterTuning, PhysicsTuning, Tuning};

/// Player character. `pos` is the top-left of the sprite box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub kind: CharacterKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    /// Airborne after a jump; cleared on landing
    pub jumping: bool,
    /// Running animation frame
    pub frame_index: usize,
    frame_ticks: u32,
    /// Sprite top when standing on the ground line
    ground_y: f32,
    physics: PhysicsTuning,
    params: CharacterTuning,
}

impl Character {
    pub fn new(kind: CharacterKind, tuning: &Tuning) -> Self {
        let ground_y = tuning.character_ground_y();
        Self {
            kind,
            pos: Vec2::new(tuning.character.x, ground_y),
            size: Vec2::new(tuning.character.width, tuning.character.height),
            vel_y: 0.0,
            jumping: false,
            frame_index: 0,
            frame_ticks: 0,
            ground_y,
            physics: tuning.physics,
            params: tuning.character,
        }
    }

    /// Start a jump. Ignored while airborne (no double jump).
    pub fn jump(&mut self) -> bool {
        if self.jumping {
            return false;
        }
        self.vel_y = self.physics.jump_velocity;
        self.jumping = true;
        true
    }

    /// Integrate one tick of gravity
    pub fn update(&mut self) {
        self.vel_y = (self.vel_y + self.physics.gravity).min(self.physics.max_fall_speed);
        self.pos.y += self.vel_y;

        if self.pos.y >= self.ground_y {
            self.pos.y = self.ground_y;
            self.vel_y = 0.0;
            self.jumping = false;
        }

        // Run cycle only on the ground
        if !self.jumping {
            self.frame_ticks += 1;
            if self.frame_ticks >= self.params.frame_delay {
                self.frame_index = (self.frame_index + 1) % self.params.frame_count.max(1);
                self.frame_ticks = 0;
            }
        }
    }

    /// Sprite box
    pub fn sprite_rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Hitbox: sprite box shrunk by the fairness padding
    pub fn bounds(&self) -> Rect {
        self.sprite_rect().shrink(self.params.hitbox_padding)
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn max_fall_speed(&self) -> f32 {
        self.physics.max_fall_speed
    }

    /// Back on the ground, at rest, first animation frame
    pub fn reset(&mut self) {
        self.pos.y = self.ground_y;
        self.vel_y = 0.0;
        self.jumping = false;
        self.frame_index = 0;
        self.frame_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        Character::new(CharacterKind::Buddy, &Tuning::default())
    }

    #[test]
    fn test_starts_on_ground() {
        let c = character();
        assert_eq!(c.pos, Vec2::new(200.0, 504.0));
        assert!(!c.jumping);
    }

    #[test]
    fn test_second_jump_is_ignored() {
        let mut c = character();
        assert!(c.jump());
        assert_eq!(c.vel_y, -15.0);
        assert!(c.jumping);

        c.update();
        let vel_after_tick = c.vel_y;
        assert!(!c.jump());
        assert_eq!(c.vel_y, vel_after_tick);
        assert!(c.jumping);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let mut c = character();
        c.jump();
        let mut peak = c.pos.y;
        for _ in 0..200 {
            c.update();
            peak = peak.min(c.pos.y);
            assert!(c.pos.y <= c.ground_y());
        }
        assert!(!c.jumping);
        assert_eq!(c.pos.y, c.ground_y());
        assert_eq!(c.vel_y, 0.0);
        // v^2 / 2g = 225 / 0.6 = 375px, minus discretization
        assert!(c.ground_y() - peak > 300.0);
    }

    #[test]
    fn test_fall_speed_is_capped() {
        let mut c = character();
        c.pos.y = -5000.0;
        c.jumping = true;
        for _ in 0..120 {
            c.update();
            assert!(c.vel_y <= c.max_fall_speed());
        }
    }

    #[test]
    fn test_animation_only_while_grounded() {
        let mut c = character();
        for _ in 0..5 {
            c.update();
        }
        assert_eq!(c.frame_index, 1);

        c.jump();
        for _ in 0..10 {
            c.update();
        }
        assert_eq!(c.frame_index, 1);
    }

    #[test]
    fn test_reset_restores_ground_state() {
        let mut c = character();
        c.jump();
        for _ in 0..7 {
            c.update();
        }
        c.reset();
        assert_eq!(c.pos.y, c.ground_y());
        assert_eq!(c.vel_y, 0.0);
        assert!(!c.jumping);
        assert_eq!(c.frame_index, 0);
    }

    #[test]
    fn test_bounds_use_padding() {
        let c = character();
        let b = c.bounds();
        assert_eq!(b.x, 212.0);
        assert_eq!(b.w, 72.0);
    }
}
