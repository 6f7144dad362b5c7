//! One-shot deferred events on the simulation clock
//!
//! Short visual resets (attack flash, warning banners, kill feed expiry) are
//! scheduled here instead of on a wall clock, so they advance with the same
//! fixed step as everything else and replay identically from a seed.

use super::entity::EntityId;

/// Deferred effects the simulation schedules for itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// Drop `is_attacking` after the swing flash
    EndAttackFlash(EntityId),
    DismissZoneWarning,
    /// Remove a kill feed entry by its sequence number
    ExpireKillFeed(u64),
}

#[derive(Debug, Clone)]
struct Pending<E> {
    remaining: f32,
    /// Insertion order, breaks ties between events due in the same step
    seq: u64,
    event: E,
}

#[derive(Debug, Clone)]
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

    /// Fire `event` once `delay` seconds of simulation time have passed
    pub fn schedule(&mut self, delay: f32, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            remaining: delay,
            seq,
            event,
        });
    }

    /// Advance the clock and return every event that came due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            self.pending[i].remaining -= dt;
            if self.pending[i].remaining <= 0.0 {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| {
            a.remaining
                .partial_cmp(&b.remaining)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter().map(|p| p.event).collect()
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
    fn test_fires_after_delay() {
        let mut q = TimerQueue::new();
        q.schedule(0.25, TimedEvent::DismissZoneWarning);
        assert!(q.advance(0.125).is_empty());
        assert_eq!(q.advance(0.125), vec![TimedEvent::DismissZoneWarning]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_fires_once() {
        let mut q = TimerQueue::new();
        q.schedule(0.1, TimedEvent::EndAttackFlash(EntityId(3)));
        assert_eq!(q.advance(1.0).len(), 1);
        assert!(q.advance(1.0).is_empty());
    }

    #[test]
    fn test_due_order_is_earliest_then_insertion() {
        let mut q = TimerQueue::new();
        q.schedule(0.5, 'c');
        q.schedule(0.25, 'a');
        q.schedule(0.25, 'b');
        q.schedule(2.0, 'z');
        assert_eq!(q.advance(1.0), vec!['a', 'b', 'c']);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut q = TimerQueue::new();
        q.schedule(0.0, 1u8);
        assert_eq!(q.advance(0.0), vec![1]);
    }
}
