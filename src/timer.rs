//! One-shot wall-clock timers
//!
//! Timers are measured against a `Clock`, not against simulation ticks, so a
//! delay lasts the same real time at any frame rate. Scheduling returns a
//! `TimerHandle`; cancelling it guarantees the event is never delivered.

use std::cell::Cell;
use std::rc::Rc;

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock driven by hand (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, now_ms: f64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.now.set(self.now.get() + delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Cancellation token for a scheduled event
#[derive(Debug, Clone)]
pub struct TimerHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[derive(Debug)]
struct Pending<E> {
    deadline_ms: f64,
    /// Insertion order, breaks deadline ties
    seq: u64,
    cancelled: Rc<Cell<bool>>,
    event: E,
}

/// Queue of pending one-shot events
#[derive(Debug)]
pub struct TimerQueue<E> {
    pending: Vec<Pending<E>>,
    next_seq: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to fire `delay_ms` after `now_ms`
    pub fn schedule(&mut self, now_ms: f64, delay_ms: f64, event: E) -> TimerHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.pending.push(Pending {
            deadline_ms: now_ms + delay_ms,
            seq: self.next_seq,
            cancelled: cancelled.clone(),
            event,
        });
        self.next_seq += 1;
        TimerHandle { cancelled }
    }

    /// Remove and return every due, uncancelled event in deadline order
    pub fn poll(&mut self, now_ms: f64) -> Vec<E> {
        // Cancelled entries are dropped whether due or not
        self.pending.retain(|p| !p.cancelled.get());

        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].deadline_ms <= now_ms {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.deadline_ms
                .partial_cmp(&b.deadline_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|p| p.event).collect()
    }

    /// Number of live (uncancelled) timers
    pub fn pending(&self) -> usize {
        self.pending.iter().filter(|p| !p.cancelled.get()).count()
    }

    pub fn clear(&mut self) {
        for p in &self.pending {
            p.cancelled.set(true);
        }
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_deadline() {
        let mut timers = TimerQueue::new();
        timers.schedule(1000.0, 500.0, "spawn");

        assert!(timers.poll(1499.0).is_empty());
        assert_eq!(timers.poll(1500.0), vec!["spawn"]);
        // One-shot
        assert!(timers.poll(5000.0).is_empty());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule(0.0, 100.0, 1);
        timers.schedule(0.0, 200.0, 2);
        handle.cancel();

        assert!(handle.is_cancelled());
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.poll(1000.0), vec![2]);
    }

    #[test]
    fn test_due_events_in_deadline_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(0.0, 300.0, 'c');
        timers.schedule(0.0, 100.0, 'a');
        timers.schedule(0.0, 200.0, 'b');
        timers.schedule(0.0, 100.0, 'a');

        assert_eq!(timers.poll(300.0), vec!['a', 'a', 'b', 'c']);
    }

    #[test]
    fn test_clear_cancels_outstanding_handles() {
        let mut timers = TimerQueue::new();
        let handle = timers.schedule(0.0, 10.0, ());
        timers.clear();
        assert!(handle.is_cancelled());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let view = clock.clone();
        clock.advance(16.0);
        clock.advance(16.0);
        assert_eq!(view.now_ms(), 32.0);
    }
}
