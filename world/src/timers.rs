//! Logical timer queue for delayed level actions.

use std::time::Duration;

use delivery_rush_core::TimerKind;

#[derive(Clone, Copy, Debug)]
struct ScheduledTimer {
    due: Duration,
    sequence: u64,
    generation: u64,
    timer: TimerKind,
}

/// Deterministic queue of delayed actions keyed on the level clock.
///
/// Timers that fall due within the same tick fire in deadline order, ties
/// broken by scheduling order. Every entry records the generation it was
/// scheduled under; teardown discards pending entries and bumps the
/// generation so no action scheduled for a replaced level can fire.
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    now: Duration,
    next_sequence: u64,
    generation: u64,
    entries: Vec<ScheduledTimer>,
}

impl TimerQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schedule(&mut self, delay: Duration, timer: TimerKind) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.entries.push(ScheduledTimer {
            due: self.now.saturating_add(delay),
            sequence,
            generation: self.generation,
            timer,
        });
    }

    /// Advances the clock and moves every due timer into `fired`.
    pub(crate) fn advance(&mut self, dt: Duration, fired: &mut Vec<TimerKind>) {
        self.now = self.now.saturating_add(dt);
        let now = self.now;
        let generation = self.generation;

        let mut due: Vec<ScheduledTimer> = Vec::new();
        self.entries.retain(|entry| {
            if entry.generation != generation {
                false
            } else if entry.due <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });

        due.sort_by_key(|entry| (entry.due, entry.sequence));
        fired.extend(due.into_iter().map(|entry| entry.timer));
    }

    /// Discards every pending timer and opens a new generation, returning
    /// how many entries were dropped.
    pub(crate) fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
        dropped
    }

    /// Resets the clock for a fresh level. Pending entries must already be
    /// cancelled.
    pub(crate) fn rewind(&mut self) {
        debug_assert!(self.entries.is_empty(), "rewind requires an empty queue");
        self.now = Duration::ZERO;
    }

    /// Discards pending timers matching the predicate.
    pub(crate) fn cancel_matching<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(TimerKind) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(entry.timer));
        before - self.entries.len()
    }

    pub(crate) fn pending(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn now(&self) -> Duration {
        self.now
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_fire_once_their_delay_elapses() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(2_500), TimerKind::WaveStart { wave: 1 });

        let mut fired = Vec::new();
        queue.advance(Duration::from_millis(2_000), &mut fired);
        assert!(fired.is_empty());

        queue.advance(Duration::from_millis(500), &mut fired);
        assert_eq!(fired, vec![TimerKind::WaveStart { wave: 1 }]);
        assert_eq!(queue.pending(), 0);
        assert_eq!(queue.now(), Duration::from_millis(2_500));
    }

    #[test]
    fn simultaneous_timers_fire_in_deadline_then_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(300), TimerKind::DeliveryHouse);
        queue.schedule(Duration::from_millis(100), TimerKind::InvincibilityEnd);
        queue.schedule(Duration::from_millis(300), TimerKind::WaveStart { wave: 2 });

        let mut fired = Vec::new();
        queue.advance(Duration::from_secs(1), &mut fired);
        assert_eq!(
            fired,
            vec![
                TimerKind::InvincibilityEnd,
                TimerKind::DeliveryHouse,
                TimerKind::WaveStart { wave: 2 },
            ]
        );
    }

    #[test]
    fn cancelled_timers_never_fire() {
        let mut queue = TimerQueue::new();
        queue.schedule(Duration::from_millis(100), TimerKind::InvincibilityEnd);
        queue.schedule(Duration::from_millis(100), TimerKind::WaveStart { wave: 3 });

        assert_eq!(queue.cancel_matching(TimerKind::is_progression), 1);
        assert_eq!(queue.cancel_all(), 1);
        assert_eq!(queue.generation(), 1);

        let mut fired = Vec::new();
        queue.advance(Duration::from_secs(5), &mut fired);
        assert!(fired.is_empty());
    }
}
