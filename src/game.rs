//! Screen state machine
//!
//! `Game` owns the simulation and moves between screens:
//!
//! ```text
//! Loading -> SelectCharacter -> SelectDifficulty -> Playing -> GameOver
//!                 ^                                    ^           |
//!                 |                                    +- restart -+
//!                 +-------------- change character ----------------+
//! ```
//!
//! Transitions happen synchronously, either from `handle(Action)` or from the
//! collision check at the end of a tick. Collaborators (local records, clock,
//! session, score reporter) are injected through `Services`.

use std::rc::Rc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::leaderboard::{NullReporter, RoundReport, ScoreReporter, SessionHandle};
use crate::persistence::{KeyValueStore, LocalRecords};
use crate::sim::{Background, Character, ObstacleManager, RoundState, Spawned, check_collisions};
use crate::timer::{Clock, TimerHandle, TimerQueue};
use crate::tuning::{CharacterKind, Difficulty, Tuning};

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    /// Waiting for sprites
    #[default]
    Loading,
    SelectCharacter,
    SelectDifficulty,
    Playing,
    GameOver,
}

/// Semantic player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NavigatePrev,
    NavigateNext,
    Confirm,
    Jump,
    Restart,
    ChangeCharacter,
}

/// Character and difficulty chosen on the selection screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub character: CharacterKind,
    pub difficulty: Difficulty,
}

/// Things that happened since the last `drain_events`
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ScreenChanged { from: ScreenState, to: ScreenState },
    Jumped,
    ObstacleSpawned(Spawned),
    NewHighScore(u64),
    RoundOver(RoundReport),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    /// Grace delay elapsed
    EnableSpawning,
}

/// Injected collaborators
pub struct Services {
    pub store: Rc<dyn KeyValueStore>,
    pub clock: Box<dyn Clock>,
    pub session: SessionHandle,
    pub reporter: Box<dyn ScoreReporter>,
}

impl Services {
    /// No cloud: guest session, scores stay local
    pub fn offline(store: Rc<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            session: SessionHandle::new(),
            reporter: Box::new(NullReporter),
        }
    }
}

pub struct Game {
    tuning: Rc<Tuning>,
    records: LocalRecords,
    clock: Box<dyn Clock>,
    session: SessionHandle,
    reporter: Box<dyn ScoreReporter>,

    screen: ScreenState,
    selection: Selection,
    round: RoundState,
    character: Character,
    background: Background,
    obstacles: ObstacleManager,
    rng: Pcg32,

    timers: TimerQueue<TimerEvent>,
    spawn_timer: Option<TimerHandle>,
    accumulator: f32,
    /// Ticks simulated in the current round
    ticks: u64,

    events: Vec<GameEvent>,
    load_error: Option<String>,
}

impl Game {
    pub fn new(tuning: Rc<Tuning>, services: Services, seed: u64) -> Self {
        let records = LocalRecords::new(services.store);
        let selection = Selection {
            character: CharacterKind::from_index(records.selected_character()),
            difficulty: Difficulty::Easy,
        };
        let round = RoundState::new(records.high_score());
        let character = Character::new(selection.character, &tuning);
        let background = Background::new(&tuning);
        let obstacles = ObstacleManager::new(&tuning);

        log::info!(
            "Game created (seed {seed}, character {}, best {})",
            selection.character.name(),
            round.high_score()
        );

        Self {
            tuning,
            records,
            clock: services.clock,
            session: services.session,
            reporter: services.reporter,
            screen: ScreenState::Loading,
            selection,
            round,
            character,
            background,
            obstacles,
            rng: Pcg32::seed_from_u64(seed),
            timers: TimerQueue::new(),
            spawn_timer: None,
            accumulator: 0.0,
            ticks: 0,
            events: Vec::new(),
            load_error: None,
        }
    }

    /// Assets are ready
    pub fn finish_loading(&mut self) {
        if self.screen == ScreenState::Loading && self.load_error.is_none() {
            self.set_screen(ScreenState::SelectCharacter);
        }
    }

    /// Assets failed; the game stays on the loading screen
    pub fn fail_loading(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::error!("Asset loading failed: {message}");
        self.load_error = Some(message);
    }

    /// Apply an action. Returns false if the current screen ignores it.
    pub fn handle(&mut self, action: Action) -> bool {
        use Action::*;
        use ScreenState::*;

        match (self.screen, action) {
            (SelectCharacter, NavigatePrev) => {
                self.select_character(self.selection.character.prev());
            }
            (SelectCharacter, NavigateNext) => {
                self.select_character(self.selection.character.next());
            }
            (SelectCharacter, Confirm) => self.set_screen(SelectDifficulty),
            (SelectDifficulty, NavigatePrev) => {
                self.selection.difficulty = self.selection.difficulty.prev();
            }
            (SelectDifficulty, NavigateNext) => {
                self.selection.difficulty = self.selection.difficulty.next();
            }
            (SelectDifficulty, Confirm) => self.start_round(),
            (Playing, Jump) => {
                if self.character.jump() {
                    self.events.push(GameEvent::Jumped);
                }
            }
            (GameOver, Restart) => self.start_round(),
            (GameOver, ChangeCharacter) => self.change_character(),
            _ => return false,
        }
        true
    }

    /// Advance by a frame's worth of wall time
    pub fn update(&mut self, dt: f32) {
        let now = self.clock.now_ms();
        for event in self.timers.poll(now) {
            match event {
                TimerEvent::EnableSpawning => {
                    if self.screen == ScreenState::Playing {
                        self.obstacles.enable_spawning();
                        log::debug!("Spawning enabled after {} ticks", self.ticks);
                    }
                }
            }
        }

        if self.screen != ScreenState::Playing {
            self.accumulator = 0.0;
            return;
        }

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;

            if self.screen != ScreenState::Playing {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    /// One fixed tick of play. No-op outside `Playing`.
    pub fn step(&mut self) {
        if self.screen != ScreenState::Playing {
            return;
        }
        let tuning = Rc::clone(&self.tuning);
        let profile = tuning.profile(self.selection.difficulty);

        self.round.accelerate(profile);
        let speed = self.round.speed();

        self.character.update();
        self.background.update(speed, &mut self.rng);
        if let Some(spawned) = self.obstacles.update(speed, &mut self.rng) {
            self.events.push(GameEvent::ObstacleSpawned(spawned));
        }
        self.round.add_score(tuning.score_per_tick);
        self.ticks += 1;

        if check_collisions(&self.character, self.obstacles.obstacles()) {
            self.end_round();
        }
    }

    fn set_screen(&mut self, next: ScreenState) {
        if next == self.screen {
            return;
        }
        let from = self.screen;
        if from == ScreenState::Playing {
            self.cancel_spawn_timer();
        }
        log::info!("Screen {from:?} -> {next:?}");
        self.screen = next;
        self.events.push(GameEvent::ScreenChanged { from, to: next });
    }

    fn select_character(&mut self, kind: CharacterKind) {
        self.selection.character = kind;
        self.character.kind = kind;
        self.records.set_selected_character(kind.index());
    }

    fn cancel_spawn_timer(&mut self) {
        if let Some(handle) = self.spawn_timer.take() {
            handle.cancel();
        }
    }

    /// Fresh round with the current selection
    fn start_round(&mut self) {
        self.cancel_spawn_timer();

        let tuning = Rc::clone(&self.tuning);
        let profile = tuning.profile(self.selection.difficulty);

        self.character.kind = self.selection.character;
        self.character.reset();
        self.background.reset();
        self.obstacles.reset();
        self.obstacles.set_difficulty(profile);
        self.round.start(profile);
        self.accumulator = 0.0;
        self.ticks = 0;

        let handle = self.timers.schedule(
            self.clock.now_ms(),
            f64::from(profile.first_obstacle_delay_ms),
            TimerEvent::EnableSpawning,
        );
        self.spawn_timer = Some(handle);

        log::info!(
            "Round start: {} on {}",
            self.selection.character.name(),
            profile.difficulty.key()
        );
        self.set_screen(ScreenState::Playing);
    }

    /// Collision: record, report, show the game-over screen
    fn end_round(&mut self) {
        self.cancel_spawn_timer();

        let report = RoundReport {
            score: self.round.display_score(),
            difficulty: self.selection.difficulty,
            character: self.selection.character,
        };
        if self.round.record_high_score() {
            self.records.set_high_score(self.round.high_score());
            self.events.push(GameEvent::NewHighScore(self.round.high_score()));
        }
        if self.session.is_authenticated() {
            self.reporter.report(report);
        }
        log::info!(
            "Round over: score {} after {} ticks",
            report.score,
            self.ticks
        );
        self.events.push(GameEvent::RoundOver(report));
        self.set_screen(ScreenState::GameOver);
    }

    fn change_character(&mut self) {
        self.character.reset();
        self.background.reset();
        self.obstacles.reset();
        self.round.clear();
        self.set_screen(ScreenState::SelectCharacter);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Ticks simulated in the current round
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Grace timer still waiting to fire
    pub fn spawn_timer_pending(&self) -> bool {
        self.spawn_timer
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
            && !self.obstacles.spawning_enabled()
    }
}
