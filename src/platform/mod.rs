//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic millisecond clock)
//! - Storage (LocalStorage on web)

#[cfg(target_arch = "wasm32")]
mod web {
    use gloo::storage::{LocalStorage, Storage};

    use crate::persistence::KeyValueStore;
    use crate::timer::Clock;

    /// `performance.now()`
    #[derive(Debug, Clone, Copy, Default)]
    pub struct PerformanceClock;

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or_else(js_sys::Date::now)
        }
    }

    /// Raw string values in `window.localStorage`. Failures (private mode,
    /// quota) are logged and otherwise ignored.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalStorageStore;

    impl KeyValueStore for LocalStorageStore {
        fn get(&self, key: &str) -> Option<String> {
            LocalStorage::raw().get_item(key).ok().flatten()
        }

        fn set(&self, key: &str, value: &str) {
            if LocalStorage::raw().set_item(key, value).is_err() {
                log::warn!("LocalStorage write failed for {key}");
            }
        }

        fn remove(&self, key: &str) {
            let _ = LocalStorage::raw().remove_item(key);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Instant;

    use crate::timer::Clock;

    /// Milliseconds since construction
    #[derive(Debug, Clone, Copy)]
    pub struct SystemClock {
        start: Instant,
    }

    impl Default for SystemClock {
        fn default() -> Self {
            Self {
                start: Instant::now(),
            }
        }
    }

    impl SystemClock {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl Clock for SystemClock {
        fn now_ms(&self) -> f64 {
            self.start.elapsed().as_secs_f64() * 1000.0
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::SystemClock;
#[cfg(target_arch = "wasm32")]
pub use web::{LocalStorageStore, PerformanceClock};

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::timer::Clock;

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
