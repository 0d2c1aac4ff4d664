//! Timer queue and clocks
//!
//! Every delayed action of the widget is a [`Timer`] in one queue owned by the
//! engine. Scheduling a timer that is already pending replaces it, so each
//! timer kind behaves like a `clearTimeout` + `setTimeout` pair.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::session::RequestId;

/// Delayed work items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Timer {
    /// Snapshot the header position after the first render
    CaptureInitialView,
    /// Mount-time safety net forcing the page back to the top
    MountScrollPoll,
    /// Re-check whether the keyboard finished animating in
    FocusSettleCheck,
    MarkFullKeyboardShown,
    ReleaseFirstAppearance,
    /// Restore the page after the keyboard went away
    BlurRestore,
    RestoreFineTune,
    SendRestore,
    ImageLoadRestore,
    /// Client-side deadline of one chat request
    ChatDeadline(RequestId),
}

/// Monotonic time source
pub trait Clock {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Clock advanced by hand, shared between a test and the engine it drives
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.millis.store(at.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: Duration,
    seq: u64,
}

/// Pending timers keyed by kind
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: HashMap<Timer, Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `timer` at `now + after`, replacing a pending one of the same kind
    pub fn schedule(&mut self, timer: Timer, now: Duration, after: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            timer,
            Entry {
                due: now + after,
                seq,
            },
        );
    }

    pub fn cancel(&mut self, timer: Timer) -> bool {
        self.entries.remove(&timer).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_pending(&self, timer: Timer) -> bool {
        self.entries.contains_key(&timer)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest due time, if any timer is pending
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.values().map(|e| e.due).min()
    }

    /// Remove and return the earliest timer due at `now`.
    ///
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Option<Timer> {
        let (timer, _) = self
            .entries
            .iter()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(t, e)| (*t, *e))?;
        self.entries.remove(&timer);
        Some(timer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_pop_due_in_deadline_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Timer::BlurRestore, ms(0), ms(150));
        queue.schedule(Timer::FocusSettleCheck, ms(0), ms(100));

        assert_eq!(queue.pop_due(ms(99)), None);
        assert_eq!(queue.pop_due(ms(200)), Some(Timer::FocusSettleCheck));
        assert_eq!(queue.pop_due(ms(200)), Some(Timer::BlurRestore));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Timer::SendRestore, ms(0), ms(50));
        queue.schedule(Timer::ImageLoadRestore, ms(0), ms(50));
        assert_eq!(queue.pop_due(ms(50)), Some(Timer::SendRestore));
        assert_eq!(queue.pop_due(ms(50)), Some(Timer::ImageLoadRestore));
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut queue = TimerQueue::new();
        queue.schedule(Timer::BlurRestore, ms(0), ms(150));
        queue.schedule(Timer::BlurRestore, ms(100), ms(150));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(ms(250)));
    }

    #[test]
    fn test_cancel() {
        let mut queue = TimerQueue::new();
        queue.schedule(Timer::ChatDeadline(RequestId(1)), ms(0), ms(15_000));
        assert!(queue.is_pending(Timer::ChatDeadline(RequestId(1))));
        assert!(queue.cancel(Timer::ChatDeadline(RequestId(1))));
        assert!(!queue.cancel(Timer::ChatDeadline(RequestId(1))));
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_manual_clock_is_shared() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(ms(300));
        assert_eq!(clock.now(), ms(300));
        handle.set(ms(10));
        assert_eq!(clock.now(), ms(10));
    }
}
