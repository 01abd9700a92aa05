//! One-shot timers for deferred control actions
//!
//! The control loop is single threaded: nothing here spawns threads or sleeps.
//! The host loop asks [`TimerQueue::next_deadline`] how long it may wait, then
//! hands expired ids back to the owner via [`TimerQueue::take_expired`].

use std::time::{Duration, Instant};

/// Longest delay a one-shot can be scheduled with; longer delays saturate
pub const MAX_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Handle for a scheduled one-shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id, for logging
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Scheduler collaborator for deferred one-shot actions
pub trait Scheduler {
    /// Schedule a one-shot firing `delay` after `now`
    fn schedule_once(&mut self, now: Instant, delay: Duration) -> TimerId;

    /// Cancel a pending one-shot
    ///
    /// Returns false if the timer already fired or was never scheduled.
    fn cancel(&mut self, id: TimerId) -> bool;
}

/// Deadline-ordered queue of pending one-shots
#[derive(Debug, Default)]
pub struct TimerQueue {
    /// Pending timers, kept sorted by deadline
    pending: Vec<(Instant, TimerId)>,
    next_id: u64,
}

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Earliest pending deadline, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|(deadline, _)| *deadline)
    }

    /// Number of timers still pending
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether a specific timer is still pending
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|(_, pending)| *pending == id)
    }

    /// Remove and return every timer whose deadline is at or before `now`
    ///
    /// Ids come back in deadline order.
    pub fn take_expired(&mut self, now: Instant) -> Vec<TimerId> {
        let split = self.pending.partition_point(|(deadline, _)| *deadline <= now);
        self.pending.drain(..split).map(|(_, id)| id).collect()
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, now: Instant, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let delay = delay.min(MAX_DELAY);
        let deadline = now + delay;
        // Insert after any timer with the same deadline to keep FIFO order
        let at = self.pending.partition_point(|(d, _)| *d <= deadline);
        self.pending.insert(at, (deadline, id));

        log::trace!("timer: scheduled #{} in {:?}", id.0, delay);
        id
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.pending.iter().position(|(_, pending)| *pending == id) {
            Some(idx) => {
                self.pending.remove(idx);
                log::trace!("timer: cancelled #{}", id.0);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_in_deadline_order() {
        let now = Instant::now();
        let mut queue = TimerQueue::new();
        let late = queue.schedule_once(now, Duration::from_millis(300));
        let early = queue.schedule_once(now, Duration::from_millis(100));

        assert_eq!(queue.next_deadline(), Some(now + Duration::from_millis(100)));
        assert!(queue.take_expired(now + Duration::from_millis(50)).is_empty());
        assert_eq!(queue.take_expired(now + Duration::from_millis(100)), vec![early]);
        assert_eq!(queue.take_expired(now + Duration::from_secs(1)), vec![late]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_cancel() {
        let now = Instant::now();
        let mut queue = TimerQueue::new();
        let id = queue.schedule_once(now, Duration::from_millis(10));

        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert!(queue.take_expired(now + Duration::from_secs(1)).is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn test_equal_deadlines_fire_fifo() {
        let now = Instant::now();
        let mut queue = TimerQueue::new();
        let first = queue.schedule_once(now, Duration::from_millis(20));
        let second = queue.schedule_once(now, Duration::from_millis(20));

        assert_eq!(
            queue.take_expired(now + Duration::from_millis(20)),
            vec![first, second]
        );
    }

    #[test]
    fn test_huge_delay_saturates() {
        let now = Instant::now();
        let mut queue = TimerQueue::new();
        let id = queue.schedule_once(now, Duration::MAX);

        assert_eq!(queue.next_deadline(), Some(now + MAX_DELAY));
        assert!(queue.is_pending(id));
    }
}
