//! Raw device events to semantic actions
//!
//! Keyboard codes and pointer gestures are mapped per screen. The mapper does
//! not touch the game; the shell forwards the resulting `Action` to
//! `Game::handle`.

use std::collections::HashSet;

use crate::game::{Action, ScreenState};

/// Taps must be shorter than this
pub const TAP_MAX_MS: f64 = 300.0;
/// Taps must move less than this on both axes
pub const TAP_MAX_DISTANCE: f32 = 30.0;
/// Swipes must move more than this on either axis
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;

/// Selection screens split the canvas into thirds
const PREV_ZONE: f32 = 0.33;
const NEXT_ZONE: f32 = 0.67;
/// Game over: taps above this fraction of the height restart
const RESTART_ZONE: f32 = 0.6;

/// Keys the game reacts to (`KeyboardEvent.code`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    KeyC,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "Space" => Some(Key::Space),
            "Enter" | "NumpadEnter" => Some(Key::Enter),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "KeyC" => Some(Key::KeyC),
            _ => None,
        }
    }
}

/// Classified pointer stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap { x: f32, y: f32 },
    Swipe { dx: f32, dy: f32 },
    /// Neither: slow press or a short drag
    None,
}

impl Gesture {
    pub fn classify(start: PointerSample, end: PointerSample) -> Self {
        let dx = end.x - start.x;
        let dy = end.y - start.y;
        let duration = end.time_ms - start.time_ms;

        if duration < TAP_MAX_MS && dx.abs() < TAP_MAX_DISTANCE && dy.abs() < TAP_MAX_DISTANCE {
            Gesture::Tap { x: end.x, y: end.y }
        } else if dx.abs() > SWIPE_MIN_DISTANCE || dy.abs() > SWIPE_MIN_DISTANCE {
            Gesture::Swipe { dx, dy }
        } else {
            Gesture::None
        }
    }
}

/// Pointer position relative to the canvas, with a timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub time_ms: f64,
}

/// Displayed canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Zone of a tap along one axis
fn zone_action(pos: f32, extent: f32) -> Action {
    if pos < extent * PREV_ZONE {
        Action::NavigatePrev
    } else if pos > extent * NEXT_ZONE {
        Action::NavigateNext
    } else {
        Action::Confirm
    }
}

#[derive(Debug, Default)]
pub struct InputMapper {
    held: HashSet<Key>,
    pointer_start: Option<PointerSample>,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key press. Auto-repeat of a held key yields nothing.
    pub fn key_down(&mut self, screen: ScreenState, key: Key) -> Option<Action> {
        if !self.held.insert(key) {
            return None;
        }
        Self::map_key(screen, key)
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Focus lost: forget held keys
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pointer_start = None;
    }

    fn map_key(screen: ScreenState, key: Key) -> Option<Action> {
        match (screen, key) {
            (ScreenState::SelectCharacter, Key::ArrowLeft) => Some(Action::NavigatePrev),
            (ScreenState::SelectCharacter, Key::ArrowRight) => Some(Action::NavigateNext),
            (ScreenState::SelectDifficulty, Key::ArrowUp) => Some(Action::NavigatePrev),
            (ScreenState::SelectDifficulty, Key::ArrowDown) => Some(Action::NavigateNext),
            (
                ScreenState::SelectCharacter | ScreenState::SelectDifficulty,
                Key::Space | Key::Enter,
            ) => Some(Action::Confirm),
            (ScreenState::Playing, Key::Space) => Some(Action::Jump),
            (ScreenState::GameOver, Key::Space) => Some(Action::Restart),
            (ScreenState::GameOver, Key::KeyC) => Some(Action::ChangeCharacter),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, sample: PointerSample) {
        self.pointer_start = Some(sample);
    }

    pub fn cancel_pointer(&mut self) {
        self.pointer_start = None;
    }

    /// Pointer released: classify the stroke and map it for `screen`
    pub fn pointer_up(
        &mut self,
        screen: ScreenState,
        sample: PointerSample,
        viewport: Viewport,
    ) -> Option<Action> {
        let start = self.pointer_start.take()?;
        Self::map_gesture(screen, Gesture::classify(start, sample), viewport)
    }

    fn map_gesture(screen: ScreenState, gesture: Gesture, viewport: Viewport) -> Option<Action> {
        match (screen, gesture) {
            // Horizontal swipes pick the character
            (ScreenState::SelectCharacter, Gesture::Swipe { dx, dy }) if dx.abs() > dy.abs() => {
                Some(if dx > 0.0 {
                    Action::NavigateNext
                } else {
                    Action::NavigatePrev
                })
            }
            (ScreenState::SelectCharacter, Gesture::Tap { x, .. }) => {
                Some(zone_action(x, viewport.width))
            }
            // Vertical swipes pick the difficulty
            (ScreenState::SelectDifficulty, Gesture::Swipe { dx, dy }) if dy.abs() > dx.abs() => {
                Some(if dy > 0.0 {
                    Action::NavigateNext
                } else {
                    Action::NavigatePrev
                })
            }
            (ScreenState::SelectDifficulty, Gesture::Tap { y, .. }) => {
                Some(zone_action(y, viewport.height))
            }
            (ScreenState::Playing, Gesture::Tap { .. }) => Some(Action::Jump),
            (ScreenState::GameOver, Gesture::Tap { y, .. }) => {
                Some(if y < viewport.height * RESTART_ZONE {
                    Action::Restart
                } else {
                    Action::ChangeCharacter
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: Viewport = Viewport {
        width: 900.0,
        height: 450.0,
    };

    fn sample(x: f32, y: f32, time_ms: f64) -> PointerSample {
        PointerSample { x, y, time_ms }
    }

    fn stroke(
        mapper: &mut InputMapper,
        screen: ScreenState,
        from: (f32, f32),
        to: (f32, f32),
        duration: f64,
    ) -> Option<Action> {
        mapper.pointer_down(sample(from.0, from.1, 1000.0));
        mapper.pointer_up(screen, sample(to.0, to.1, 1000.0 + duration), VIEW)
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("Space"), Some(Key::Space));
        assert_eq!(Key::from_code("KeyC"), Some(Key::KeyC));
        assert_eq!(Key::from_code("KeyX"), None);
    }

    #[test]
    fn test_keys_per_screen() {
        let mut m = InputMapper::new();
        let mut press = |screen, key| {
            let action = m.key_down(screen, key);
            m.key_up(key);
            action
        };

        let cases = [
            (ScreenState::SelectCharacter, Key::ArrowLeft, Some(Action::NavigatePrev)),
            (ScreenState::SelectCharacter, Key::Enter, Some(Action::Confirm)),
            (ScreenState::SelectCharacter, Key::ArrowUp, None),
            (ScreenState::SelectDifficulty, Key::ArrowDown, Some(Action::NavigateNext)),
            (ScreenState::Playing, Key::Space, Some(Action::Jump)),
            (ScreenState::Playing, Key::Enter, None),
            (ScreenState::GameOver, Key::Space, Some(Action::Restart)),
            (ScreenState::GameOver, Key::KeyC, Some(Action::ChangeCharacter)),
            (ScreenState::Loading, Key::Space, None),
        ];
        for (screen, key, expected) in cases {
            assert_eq!(press(screen, key), expected, "{screen:?} {key:?}");
        }
    }

    #[test]
    fn test_key_repeat_suppressed() {
        let mut m = InputMapper::new();
        assert_eq!(m.key_down(ScreenState::Playing, Key::Space), Some(Action::Jump));
        assert_eq!(m.key_down(ScreenState::Playing, Key::Space), None);
        m.key_up(Key::Space);
        assert_eq!(m.key_down(ScreenState::Playing, Key::Space), Some(Action::Jump));
    }

    #[test]
    fn test_gesture_thresholds() {
        let tap = Gesture::classify(sample(0.0, 0.0, 0.0), sample(29.0, -29.0, 299.0));
        assert!(matches!(tap, Gesture::Tap { .. }));

        let slow = Gesture::classify(sample(0.0, 0.0, 0.0), sample(0.0, 0.0, 300.0));
        assert_eq!(slow, Gesture::None);

        let drag = Gesture::classify(sample(0.0, 0.0, 0.0), sample(40.0, 0.0, 100.0));
        assert_eq!(drag, Gesture::None);

        let swipe = Gesture::classify(sample(0.0, 0.0, 0.0), sample(0.0, 51.0, 800.0));
        assert_eq!(swipe, Gesture::Swipe { dx: 0.0, dy: 51.0 });
    }

    #[test]
    fn test_character_screen_touch() {
        let mut m = InputMapper::new();
        let screen = ScreenState::SelectCharacter;
        let cases = [
            ((100.0, 200.0), (100.0, 200.0), 50.0, Some(Action::NavigatePrev)),
            ((450.0, 200.0), (450.0, 200.0), 50.0, Some(Action::Confirm)),
            ((800.0, 200.0), (800.0, 200.0), 50.0, Some(Action::NavigateNext)),
            ((400.0, 200.0), (300.0, 210.0), 200.0, Some(Action::NavigatePrev)),
            ((300.0, 200.0), (400.0, 210.0), 200.0, Some(Action::NavigateNext)),
            // Vertical swipe does nothing here
            ((300.0, 100.0), (310.0, 300.0), 200.0, None),
        ];
        for (from, to, ms, expected) in cases {
            assert_eq!(stroke(&mut m, screen, from, to, ms), expected, "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn test_difficulty_screen_touch() {
        let mut m = InputMapper::new();
        let screen = ScreenState::SelectDifficulty;
        let cases = [
            ((450.0, 50.0), (450.0, 50.0), 50.0, Some(Action::NavigatePrev)),
            ((450.0, 225.0), (450.0, 225.0), 50.0, Some(Action::Confirm)),
            ((450.0, 400.0), (450.0, 400.0), 50.0, Some(Action::NavigateNext)),
            ((450.0, 300.0), (455.0, 100.0), 200.0, Some(Action::NavigatePrev)),
        ];
        for (from, to, ms, expected) in cases {
            assert_eq!(stroke(&mut m, screen, from, to, ms), expected, "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn test_playing_and_game_over_touch() {
        let mut m = InputMapper::new();
        let playing = ScreenState::Playing;
        let tap = stroke(&mut m, playing, (10.0, 10.0), (12.0, 12.0), 80.0);
        assert_eq!(tap, Some(Action::Jump));
        let swipe = stroke(&mut m, playing, (10.0, 10.0), (200.0, 10.0), 80.0);
        assert_eq!(swipe, None);

        let over = ScreenState::GameOver;
        let top = stroke(&mut m, over, (450.0, 100.0), (450.0, 100.0), 80.0);
        assert_eq!(top, Some(Action::Restart));
        let bottom = stroke(&mut m, over, (450.0, 400.0), (450.0, 400.0), 80.0);
        assert_eq!(bottom, Some(Action::ChangeCharacter));
    }

    #[test]
    fn test_pointer_up_without_down() {
        let mut m = InputMapper::new();
        assert_eq!(m.pointer_up(ScreenState::Playing, sample(0.0, 0.0, 0.0), VIEW), None);
        m.pointer_down(sample(0.0, 0.0, 0.0));
        m.cancel_pointer();
        assert_eq!(m.pointer_up(ScreenState::Playing, sample(0.0, 0.0, 10.0), VIEW), None);
    }
}
