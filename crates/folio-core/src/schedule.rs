#![forbid(unsafe_code)]

//! Host-driven time: a deterministic clock, a timer queue and a
//! next-animation-frame queue.
//!
//! Nothing here sleeps or reads the system clock. The host moves time forward
//! ([`Scheduler::advance`] / [`Scheduler::set_time`]) and then drains due work
//! with [`Scheduler::pop_due`]. Timers are never cancelled.
//!
//! # Invariants
//!
//! 1. A timer never fires before its deadline.
//! 2. Due timers fire in deadline order; equal deadlines fire in the order
//!    they were scheduled.
//! 3. Time never moves backwards.

use core::cmp::Ordering;
use core::time::Duration;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::reveal::RevealTarget;

/// Deferred work, executed by [`crate::Portfolio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Put a block in its hidden/offset state and arm its transition.
    RevealStart(RevealTarget),
    /// Flip a block to its visible state (runs on an animation frame).
    RevealFinish(RevealTarget),
    /// The simulated send finished.
    CompleteSubmission,
    /// Auto-hide the success message.
    HideSuccess,
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: Duration,
    seq: u64,
    task: Task,
}

impl PartialEq for Timer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Timer {}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Timer and animation-frame queues over a [`DeterministicClock`].
#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    clock: DeterministicClock,
    timers: BinaryHeap<Reverse<Timer>>,
    frame: Vec<Task>,
    next_seq: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Run `task` once `delay` has elapsed from now.
    pub fn schedule_after(&mut self, delay: Duration, task: Task) {
        let due = self.clock.now().saturating_add(delay);
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(?task, due_ms = due.as_millis() as u64, "timer scheduled");
        self.timers.push(Reverse(Timer { due, seq, task }));
    }

    /// Run `task` on the next animation frame.
    pub fn request_frame(&mut self, task: Task) {
        self.frame.push(task);
    }

    /// Pop the earliest timer whose deadline has been reached.
    pub fn pop_due(&mut self) -> Option<Task> {
        let now = self.clock.now();
        match self.timers.peek() {
            Some(Reverse(timer)) if timer.due <= now => {
                self.timers.pop().map(|Reverse(timer)| timer.task)
            }
            _ => None,
        }
    }

    /// Take the tasks queued for the current animation frame.
    ///
    /// Tasks requested while these run belong to the following frame.
    pub fn take_frame(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.frame)
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.peek().map(|Reverse(timer)| timer.due)
    }

    #[must_use]
    pub fn wants_frame(&self) -> bool {
        !self.frame.is_empty()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        assert_eq!(c.now(), Duration::from_millis(10));

        c.set(Duration::from_millis(5));
        assert_eq!(c.now(), Duration::from_millis(10));

        // Saturation: don't panic or wrap.
        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now(), Duration::MAX);
    }

    #[test]
    fn timers_wait_for_their_deadline() {
        let mut s = Scheduler::new();
        s.schedule_after(Duration::from_millis(1500), Task::CompleteSubmission);
        assert_eq!(s.next_deadline(), Some(Duration::from_millis(1500)));

        s.advance(Duration::from_millis(1499));
        assert_eq!(s.pop_due(), None);

        s.advance(Duration::from_millis(1));
        assert_eq!(s.pop_due(), Some(Task::CompleteSubmission));
        assert_eq!(s.pop_due(), None);
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn equal_deadlines_fire_in_schedule_order() {
        let mut s = Scheduler::new();
        s.schedule_after(Duration::from_millis(100), Task::HideSuccess);
        s.schedule_after(Duration::ZERO, Task::RevealStart(RevealTarget(0)));
        s.schedule_after(Duration::from_millis(100), Task::CompleteSubmission);

        s.set_time(Duration::from_millis(100));
        assert_eq!(s.pop_due(), Some(Task::RevealStart(RevealTarget(0))));
        assert_eq!(s.pop_due(), Some(Task::HideSuccess));
        assert_eq!(s.pop_due(), Some(Task::CompleteSubmission));
        assert_eq!(s.pending_timers(), 0);
    }

    #[test]
    fn frame_tasks_are_taken_once() {
        let mut s = Scheduler::new();
        assert!(!s.wants_frame());
        s.request_frame(Task::RevealFinish(RevealTarget(3)));
        assert!(s.wants_frame());
        assert_eq!(s.take_frame(), vec![Task::RevealFinish(RevealTarget(3))]);
        assert!(!s.wants_frame());
        assert!(s.take_frame().is_empty());
    }
}
