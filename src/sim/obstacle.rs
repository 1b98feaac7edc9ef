//! Obstacles and the distance-based spawner
//!
//! Spawning is keyed on accumulated scroll distance rather than time, so the
//! spacing between pipes looks the same at any frame rate: scroll speed is
//! the unit of throughput.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::{DifficultyProfile, PipeTuning, Tuning};

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Vertical pipe standing on the ground
    #[default]
    Pipe,
}

/// A scrolling obstacle. Size is fixed at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    hitbox_padding: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, size: Vec2, hitbox_padding: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            size,
            hitbox_padding,
        }
    }

    /// Pipe of the given height standing on the ground line
    pub fn pipe(id: u32, x: f32, height: f32, ground_y: f32, pipe: &PipeTuning) -> Self {
        Self::new(
            id,
            ObstacleKind::Pipe,
            Vec2::new(x, ground_y - height),
            Vec2::new(pipe.width, height),
            pipe.hitbox_padding,
        )
    }

    /// Scroll left by the world speed
    pub fn update(&mut self, scroll_speed: f32) {
        self.pos.x -= scroll_speed;
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }

    pub fn sprite_rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn bounds(&self) -> Rect {
        self.sprite_rect().shrink(self.hitbox_padding)
    }
}

/// A freshly spawned obstacle, reported to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawned {
    pub id: u32,
    pub height: f32,
    /// Scroll distance travelled since the previous spawn
    pub gap: f32,
}

/// Owns live obstacles and schedules new ones
#[derive(Debug, Clone)]
pub struct ObstacleManager {
    obstacles: Vec<Obstacle>,
    distance_since_spawn: f32,
    next_spawn_distance: f32,
    spawning: bool,
    profile: Option<DifficultyProfile>,
    pipe: PipeTuning,
    spawn_x: f32,
    ground_y: f32,
    next_id: u32,
}

/// Threshold used before any difficulty is set
const DEFAULT_SPAWN_DISTANCE: f32 = 300.0;

impl ObstacleManager {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacles: Vec::new(),
            distance_since_spawn: 0.0,
            next_spawn_distance: DEFAULT_SPAWN_DISTANCE,
            spawning: false,
            profile: None,
            pipe: tuning.pipe,
            spawn_x: tuning.spawn_x(),
            ground_y: tuning.ground.y,
            next_id: 1,
        }
    }

    pub fn set_difficulty(&mut self, profile: &DifficultyProfile) {
        self.next_spawn_distance = profile.min_spawn_distance;
        self.profile = Some(profile.clone());
    }

    /// Allow spawning (after the round's grace delay)
    pub fn enable_spawning(&mut self) {
        self.spawning = true;
    }

    pub fn spawning_enabled(&self) -> bool {
        self.spawning
    }

    /// Advance one tick: maybe spawn, then scroll and cull
    pub fn update<R: Rng>(&mut self, scroll_speed: f32, rng: &mut R) -> Option<Spawned> {
        self.distance_since_spawn += scroll_speed;

        let mut spawned = None;
        if self.distance_since_spawn >= self.next_spawn_distance {
            spawned = self.spawn(rng);
            // Distance restarts even when spawning is still disabled
            self.distance_since_spawn = 0.0;
        }

        for obstacle in &mut self.obstacles {
            obstacle.update(scroll_speed);
        }
        self.obstacles.retain(|o| !o.is_off_screen());

        spawned
    }

    fn spawn<R: Rng>(&mut self, rng: &mut R) -> Option<Spawned> {
        if !self.spawning {
            return None;
        }
        let profile = self.profile.as_ref()?;

        let height = rng
            .random_range(profile.min_obstacle_height..profile.max_obstacle_height)
            .floor();
        let id = self.next_id;
        self.next_id += 1;
        self.obstacles
            .push(Obstacle::pipe(id, self.spawn_x, height, self.ground_y, &self.pipe));

        let gap = self.distance_since_spawn;
        self.next_spawn_distance =
            rng.random_range(profile.min_spawn_distance..profile.max_spawn_distance);

        log::debug!(
            "Spawned pipe {id} (h={height}) after {gap:.0}px, next in {:.0}px",
            self.next_spawn_distance
        );

        Some(Spawned { id, height, gap })
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn next_spawn_distance(&self) -> f32 {
        self.next_spawn_distance
    }

    pub fn distance_since_spawn(&self) -> f32 {
        self.distance_since_spawn
    }

    /// Clear the field and disable spawning until re-enabled
    pub fn reset(&mut self) {
        self.obstacles.clear();
        self.distance_since_spawn = 0.0;
        if let Some(profile) = &self.profile {
            self.next_spawn_distance = profile.min_spawn_distance;
        }
        self.spawning = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn pipe_at(x: f32) -> Obstacle {
        Obstacle::pipe(1, x, 80.0, 600.0, &Tuning::default().pipe)
    }

    #[test]
    fn test_off_screen_uses_right_edge() {
        assert!(!pipe_at(0.0).is_off_screen());
        assert!(!pipe_at(-5.0).is_off_screen());
        assert!(!pipe_at(-80.0).is_off_screen());
        assert!(pipe_at(-80.5).is_off_screen());
        assert!(pipe_at(-85.0).is_off_screen());
    }

    #[test]
    fn test_pipe_stands_on_ground() {
        let p = pipe_at(100.0);
        assert_eq!(p.pos.y + p.size.y, 600.0);
        assert_eq!(p.bounds(), Rect::new(104.0, 524.0, 72.0, 72.0));
    }

    #[test]
    fn test_no_spawn_until_enabled() {
        let tuning = Tuning::default();
        let mut manager = ObstacleManager::new(&tuning);
        manager.set_difficulty(tuning.profile(Difficulty::Hard));
        let mut rng = Pcg32::seed_from_u64(1);

        for _ in 0..1000 {
            assert!(manager.update(6.0, &mut rng).is_none());
        }
        assert!(manager.obstacles().is_empty());

        manager.enable_spawning();
        let spawned = (0..1000).find_map(|_| manager.update(6.0, &mut rng));
        assert!(spawned.is_some());
    }

    #[test]
    fn test_no_spawn_without_profile() {
        let tuning = Tuning::default();
        let mut manager = ObstacleManager::new(&tuning);
        manager.enable_spawning();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(manager.update(6.0, &mut rng).is_none());
        }
    }

    #[test]
    fn test_first_spawn_at_min_distance() {
        let tuning = Tuning::default();
        let profile = tuning.profile(Difficulty::Easy);
        let mut manager = ObstacleManager::new(&tuning);
        manager.set_difficulty(profile);
        manager.enable_spawning();
        let mut rng = Pcg32::seed_from_u64(7);

        // 700 / 5 = 140 ticks
        for _ in 0..139 {
            assert!(manager.update(5.0, &mut rng).is_none());
        }
        let spawned = manager.update(5.0, &mut rng).expect("spawn at threshold");
        assert_eq!(spawned.gap, 700.0);
        assert_eq!(manager.distance_since_spawn(), 0.0);
        let next = manager.next_spawn_distance();
        assert!(next >= profile.min_spawn_distance && next < profile.max_spawn_distance);

        // Spawned at the right edge, then scrolled once
        let pipe = &manager.obstacles()[0];
        assert_eq!(pipe.pos.x, tuning.spawn_x() - 5.0);
    }

    #[test]
    fn test_overshoot_is_dropped_on_spawn() {
        let tuning = Tuning::default();
        let profile = tuning.profile(Difficulty::Hard);
        let mut manager = ObstacleManager::new(&tuning);
        manager.set_difficulty(profile);
        manager.enable_spawning();
        let mut rng = Pcg32::seed_from_u64(11);

        // 400 is not a multiple of 13: the crossing tick lands at 403
        let spawned = (0..100)
            .find_map(|_| manager.update(13.0, &mut rng))
            .expect("spawn");
        assert_eq!(spawned.gap, 403.0);
        assert!(spawned.gap < profile.min_spawn_distance + 13.0);
        assert_eq!(manager.distance_since_spawn(), 0.0);
    }

    #[test]
    fn test_obstacles_culled_off_left_edge() {
        let tuning = Tuning::default();
        let mut manager = ObstacleManager::new(&tuning);
        manager.set_difficulty(tuning.profile(Difficulty::Medium));
        manager.enable_spawning();
        let mut rng = Pcg32::seed_from_u64(3);

        for _ in 0..5000 {
            manager.update(9.0, &mut rng);
            assert!(manager.obstacles().iter().all(|o| !o.is_off_screen()));
        }
        // Screen holds at most a handful of pipes at this spacing
        assert!(manager.obstacles().len() <= 4);
    }

    #[test]
    fn test_reset_disables_spawning() {
        let tuning = Tuning::default();
        let profile = tuning.profile(Difficulty::Medium);
        let mut manager = ObstacleManager::new(&tuning);
        manager.set_difficulty(profile);
        manager.enable_spawning();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..500 {
            manager.update(9.0, &mut rng);
        }

        manager.reset();
        assert!(manager.obstacles().is_empty());
        assert!(!manager.spawning_enabled());
        assert_eq!(manager.distance_since_spawn(), 0.0);
        assert_eq!(manager.next_spawn_distance(), profile.min_spawn_distance);
    }
}
