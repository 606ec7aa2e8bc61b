#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Distance accrual, level scoring and high score bookkeeping.

use std::time::Duration;

use delivery_rush_core::{Event, FinalStats, LevelHandoff};
use log::{debug, info, warn};
use thiserror::Error;

/// Bonus granted per remaining life when a level is delivered.
pub const LIFE_BONUS: u64 = 100;

const FRAME_MILLIS: f64 = 16.67;
const RUNNING_RATE: f64 = 3.0;
const IDLE_RATE: f64 = 1.0;

/// Mid-level high score gains smaller than this stay in memory until the
/// level settles.
pub const PERSIST_STEP: u64 = 100;

/// Failure reported by a [`HighScoreStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying storage could not be read or written.
    #[error("high score storage failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be interpreted.
    #[error("stored high score is malformed: {0}")]
    Malformed(String),
}

/// Persistent home of the single `highScore` value.
pub trait HighScoreStore {
    /// Reads the persisted high score; `None` when nothing was stored yet.
    fn load(&mut self) -> Result<Option<u64>, StoreError>;

    /// Persists a new high score.
    fn store(&mut self, high_score: u64) -> Result<(), StoreError>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoryHighScoreStore {
    value: Option<u64>,
}

impl MemoryHighScoreStore {
    /// Creates a store that already holds the provided high score.
    #[must_use]
    pub const fn with_value(high_score: u64) -> Self {
        Self {
            value: Some(high_score),
        }
    }

    /// Value currently held by the store.
    #[must_use]
    pub const fn value(&self) -> Option<u64> {
        self.value
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&mut self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn store(&mut self, high_score: u64) -> Result<(), StoreError> {
        self.value = Some(high_score);
        Ok(())
    }
}

/// Score state carried across the levels of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunState {
    level: u32,
    total_score: u64,
    high_score: u64,
}

impl RunState {
    /// Current one-based level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Sum of the level scores folded in so far.
    #[must_use]
    pub const fn total_score(&self) -> u64 {
        self.total_score
    }

    /// Highest score known to the ledger.
    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }
}

/// Keeps the run total and the persisted high score in step with the level.
#[derive(Debug)]
pub struct ScoreLedger<S> {
    store: S,
    run: RunState,
    distance: f64,
    settled: bool,
    written: u64,
}

impl<S: HighScoreStore> ScoreLedger<S> {
    /// Creates a ledger for a run starting from the provided handoff.
    ///
    /// An unreadable or empty store yields a high score of zero.
    pub fn new(mut store: S, handoff: LevelHandoff) -> Self {
        let high_score = match store.load() {
            Ok(value) => value.unwrap_or(0),
            Err(error) => {
                warn!("could not read high score, starting from 0: {error}");
                0
            }
        };

        Self {
            store,
            run: RunState {
                level: handoff.level(),
                total_score: handoff.total_score(),
                high_score,
            },
            distance: 0.0,
            settled: false,
            written: high_score,
        }
    }

    /// Current run state.
    #[must_use]
    pub fn run(&self) -> RunState {
        self.run
    }

    /// Distance accrued in the current level, as last observed.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Borrows the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a level from the provided handoff, keeping the high score.
    ///
    /// A high score still held only in memory is written first.
    pub fn begin_level(&mut self, handoff: LevelHandoff) {
        self.flush();
        self.run.level = handoff.level();
        self.run.total_score = handoff.total_score();
        self.distance = 0.0;
        self.settled = false;
    }

    /// Computes the distance earned over `dt`.
    ///
    /// One unit accrues per 16.67 ms, three while the player runs right.
    #[must_use]
    pub fn tick(&self, dt: Duration, moving_right: bool) -> f64 {
        let rate = if moving_right { RUNNING_RATE } else { IDLE_RATE };
        rate * (dt.as_secs_f64() * 1_000.0 / FRAME_MILLIS)
    }

    /// Score the run would reach if the level ended now without a bonus.
    #[must_use]
    ///
    /// Once the level is settled its distance is already part of the total.
    pub fn provisional_total(&self) -> u64 {
        if self.settled {
            return self.run.total_score;
        }
        self.run.total_score.saturating_add(whole_units(self.distance))
    }

    /// Consumes world events, returning final statistics once the level ends.
    pub fn handle(&mut self, events: &[Event]) -> Option<FinalStats> {
        let mut stats = None;
        for event in events {
            match event {
                Event::DistanceAccrued { distance } => self.observe_distance(*distance),
                Event::LevelCompleted {
                    level,
                    distance,
                    lives,
                } => {
                    debug_assert_eq!(*level, self.run.level, "ledger tracks the live level");
                    stats = Some(self.complete_level(*distance, *lives));
                }
                Event::RunEnded { level, distance } => {
                    debug_assert_eq!(*level, self.run.level, "ledger tracks the live level");
                    stats = Some(self.game_over(*distance));
                }
                _ => {}
            }
        }
        stats
    }

    /// Folds a delivered level into the run total.
    ///
    /// # Panics
    ///
    /// Panics when the level was already settled.
    pub fn complete_level(&mut self, distance: f64, lives: u32) -> FinalStats {
        let bonus = u64::from(lives) * LIFE_BONUS;
        let stats = self.settle(distance, lives, bonus);
        info!(
            "level {} delivered: {} + {} bonus, total {}",
            stats.level, stats.distance, stats.bonus, stats.score
        );
        stats
    }

    /// Folds a lost level into the run total without a bonus.
    ///
    /// # Panics
    ///
    /// Panics when the level was already settled.
    pub fn game_over(&mut self, distance: f64) -> FinalStats {
        let stats = self.settle(distance, 0, 0);
        info!(
            "game over on level {} with total {} (high score {})",
            stats.level, stats.score, stats.high_score
        );
        stats
    }

    /// Starts a new run at the first level, keeping the high score.
    pub fn reset_run(&mut self) {
        self.begin_level(LevelHandoff::FIRST_LEVEL);
    }

    fn observe_distance(&mut self, distance: f64) {
        self.distance = distance;
        let provisional = self.provisional_total();
        if provisional > self.run.high_score {
            self.run.high_score = provisional;
            if provisional >= self.written.saturating_add(PERSIST_STEP) {
                self.persist();
            }
        }
    }

    fn settle(&mut self, distance: f64, lives: u32, bonus: u64) -> FinalStats {
        assert!(!self.settled, "level {} settled twice", self.run.level);
        self.settled = true;
        self.distance = distance;

        let whole = whole_units(distance);
        let level_score = whole.saturating_add(bonus);
        self.run.total_score = self.run.total_score.saturating_add(level_score);
        self.run.high_score = self.run.high_score.max(self.run.total_score);
        self.flush();

        FinalStats {
            score: self.run.total_score,
            level_score,
            distance: whole,
            lives,
            bonus,
            level: self.run.level,
            high_score: self.run.high_score,
        }
    }

    fn flush(&mut self) {
        if self.run.high_score > self.written {
            self.persist();
        }
    }

    fn persist(&mut self) {
        self.written = self.run.high_score;
        if let Err(error) = self.store.store(self.run.high_score) {
            warn!(
                "could not persist high score {}: {error}",
                self.run.high_score
            );
        } else {
            debug!("high score raised to {}", self.run.high_score);
        }
    }
}

fn whole_units(distance: f64) -> u64 {
    if distance.is_finite() && distance > 0.0 {
        distance.floor() as u64
    } else {
        0
    }
}
