//! Resume timers for suspended trigger instances
//!
//! A script suspends itself by scheduling a timer; when the timer comes
//! due the scheduler resumes the instance at its cursor. Timers belonging
//! to an instance whose state is discarded must be cancelled first so they
//! never fire against stale state.

use crate::identity::{InstanceId, TimerId};

/// A discrete tick (logical time unit)
pub type Tick = u64;

/// A pending resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResumeTimer {
    pub id: TimerId,
    pub instance: InstanceId,
    pub due: Tick,
}

/// Pending resume timers, ordered by due tick
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<ResumeTimer>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a resume `delay_ticks` after `current_tick`
    pub fn schedule(&mut self, instance: InstanceId, delay_ticks: Tick, current_tick: Tick) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = current_tick.saturating_add(delay_ticks);
        // stable: timers due on the same tick fire in scheduling order
        let at = self.pending.partition_point(|t| t.due <= due);
        self.pending.insert(at, ResumeTimer { id, instance, due });
        id
    }

    /// Cancel a timer; returns false if it was not pending
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|t| t.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|t| t.id == id)
    }

    /// Remove and return every timer due at or before `tick`
    pub fn take_due(&mut self, tick: Tick) -> Vec<ResumeTimer> {
        let split = self.pending.partition_point(|t| t.due <= tick);
        self.pending.drain(..split).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_take_due() {
        let mut timers = TimerQueue::new();
        let late = timers.schedule(InstanceId(1), 10, 0);
        let early = timers.schedule(InstanceId(2), 3, 0);
        let same = timers.schedule(InstanceId(3), 3, 0);

        let due = timers.take_due(5);
        assert_eq!(due.iter().map(|t| t.id).collect::<Vec<_>>(), vec![early, same]);
        assert!(timers.is_pending(late));
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(InstanceId(1), 5, 100);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(timers.take_due(1000).is_empty());
    }

    #[test]
    fn test_schedule_saturates() {
        let mut timers = TimerQueue::new();
        let id = timers.schedule(InstanceId(1), Tick::MAX, 7);
        assert!(timers.take_due(Tick::MAX - 1).is_empty());
        assert_eq!(timers.take_due(Tick::MAX).iter().map(|t| t.id).collect::<Vec<_>>(), vec![id]);
    }
}
