//! Simulation invariants under random input

use std::rc::Rc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use barkour::consts::SIM_DT;
use barkour::persistence::{KeyValueStore, LocalRecords, MemoryStore};
use barkour::sim::{Character, ObstacleManager, Rect, RoundState};
use barkour::timer::ManualClock;
use barkour::{Action, CharacterKind, Difficulty, Game, ScreenState, Services, Tuning};

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop::sample::select(Difficulty::ALL.to_vec())
}

proptest! {
    #[test]
    fn speed_never_decreases_and_stays_capped(d in difficulty(), ticks in 0usize..20_000) {
        let tuning = Tuning::default();
        let profile = tuning.profile(d);
        let mut round = RoundState::new(0);
        round.start(profile);

        let mut last = round.speed();
        for _ in 0..ticks {
            round.accelerate(profile);
            prop_assert!(round.speed() >= last);
            prop_assert!(round.speed() <= profile.max_speed);
            last = round.speed();
        }
    }

    #[test]
    fn character_stays_above_ground(jumps in prop::collection::vec(any::<bool>(), 1..600)) {
        let tuning = Tuning::default();
        let mut character = Character::new(CharacterKind::Buddy, &tuning);

        for jump in jumps {
            if jump {
                character.jump();
            }
            character.update();
            prop_assert!(character.pos.y <= character.ground_y());
            prop_assert!(character.vel_y <= character.max_fall_speed());
        }
    }

    #[test]
    fn spawns_respect_profile_ranges(d in difficulty(), seed in any::<u64>()) {
        let tuning = Tuning::default();
        let profile = tuning.profile(d);
        let mut obstacles = ObstacleManager::new(&tuning);
        obstacles.set_difficulty(profile);
        obstacles.enable_spawning();
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut spawned = 0;
        for _ in 0..5_000 {
            if let Some(spawn) = obstacles.update(profile.max_speed, &mut rng) {
                spawned += 1;
                prop_assert!(spawn.height >= profile.min_obstacle_height);
                prop_assert!(spawn.height < profile.max_obstacle_height);
                prop_assert!(spawn.gap >= profile.min_spawn_distance);
                // The threshold is checked once per tick, so the travelled
                // distance may overshoot the drawn gap by one tick of scroll
                prop_assert!(spawn.gap < profile.max_spawn_distance + profile.max_speed);
            }
            let next = obstacles.next_spawn_distance();
            prop_assert!(next >= profile.min_spawn_distance);
            prop_assert!(next < profile.max_spawn_distance);
        }
        prop_assert!(spawned > 0);
    }

    #[test]
    fn separated_boxes_never_collide(
        x in -1000.0f32..1000.0,
        y in -1000.0f32..1000.0,
        w in 1.0f32..200.0,
        h in 1.0f32..200.0,
        gap in 0.5f32..100.0,
    ) {
        let a = Rect::new(x, y, w, h);
        let right = Rect::new(x + w + gap, y, w, h);
        let below = Rect::new(x, y + h + gap, w, h);
        prop_assert!(!a.overlaps(&right));
        prop_assert!(!a.overlaps(&below));
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn high_score_only_increases(seed in any::<u64>(), rounds in 1usize..4) {
        let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
        let clock = ManualClock::new();
        let services = Services::offline(store.clone(), Box::new(clock.clone()));
        let mut game = Game::new(Rc::new(Tuning::default()), services, seed);
        game.finish_loading();
        game.handle(Action::Confirm);
        game.handle(Action::Confirm);

        let records = LocalRecords::new(store);
        let mut best = records.high_score();
        for _ in 0..rounds {
            while game.screen() == ScreenState::Playing {
                clock.advance(1000.0 / 60.0);
                game.update(SIM_DT);
                if game.ticks() > 50_000 {
                    break;
                }
            }
            let current = records.high_score();
            prop_assert!(current >= best);
            prop_assert_eq!(current, game.round().high_score());
            best = current;
            game.handle(Action::Restart);
        }
    }
}
