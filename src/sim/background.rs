//! Decorative scrolling scenery: clouds and the brick ground pattern

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{BackgroundTuning, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
}

#[derive(Debug, Clone)]
pub struct Background {
    /// Brick pattern offset in (-brick_size, 0]
    pub ground_offset: f32,
    pub clouds: Vec<Cloud>,
    params: BackgroundTuning,
    canvas_width: f32,
}

impl Background {
    pub fn new(tuning: &Tuning) -> Self {
        let mut background = Self {
            ground_offset: 0.0,
            clouds: Vec::new(),
            params: tuning.background.clone(),
            canvas_width: tuning.canvas.width,
        };
        background.reset();
        background
    }

    pub fn update<R: Rng>(&mut self, scroll_speed: f32, rng: &mut R) {
        self.ground_offset -= scroll_speed * self.params.ground_parallax;
        if self.ground_offset <= -self.params.brick_size {
            self.ground_offset = 0.0;
        }

        let cloud_speed = scroll_speed * self.params.cloud_parallax;
        for cloud in &mut self.clouds {
            cloud.pos.x -= cloud_speed;
            if cloud.pos.x < -self.params.cloud_width {
                cloud.pos.x = self.canvas_width + self.params.cloud_respawn_margin;
                cloud.pos.y = rng.random_range(self.params.cloud_min_y..self.params.cloud_max_y);
            }
        }
    }

    pub fn cloud_size(&self) -> Vec2 {
        Vec2::new(self.params.cloud_width, self.params.cloud_height)
    }

    pub fn brick_size(&self) -> f32 {
        self.params.brick_size
    }

    pub fn reset(&mut self) {
        self.ground_offset = 0.0;
        self.clouds = self
            .params
            .cloud_start
            .iter()
            .map(|&(x, y)| Cloud { pos: Vec2::new(x, y) })
            .collect();
    }
}
