#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Delivery Rush engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Title adapters show for the game.
pub const WELCOME_BANNER: &str = "Delivery Rush";

/// Movement requested by the player for the current tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementIntent {
    /// No horizontal input; the player stands still.
    #[default]
    Idle,
    /// Movement toward decreasing x coordinates.
    Left,
    /// Movement toward increasing x coordinates.
    Right,
}

impl MovementIntent {
    /// Sign applied to the player's movement speed.
    #[must_use]
    pub const fn direction(self) -> f32 {
        match self {
            Self::Idle => 0.0,
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Tears down the current level and starts a fresh one.
    BeginLevel {
        /// One-based level number to start.
        level: u32,
        /// Lives granted to the player at the start of the level.
        lives: u32,
        /// Number of waves that must clear before the delivery house appears.
        max_waves: u32,
    },
    /// Records the movement intent applied on subsequent ticks.
    SetMovementIntent {
        /// Direction the player wants to move in.
        intent: MovementIntent,
    },
    /// Advances the simulation clock, moves the player and fires due timers.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Schedules a delayed action on the level's timer queue.
    ScheduleTimer {
        /// Delay before the timer fires.
        delay: Duration,
        /// Action carried by the timer.
        timer: TimerKind,
    },
    /// Grows the world to the provided width.
    ExtendWorld {
        /// New world width in world units.
        width: u32,
    },
    /// Moves every enemy leftward and reaps those that left the world.
    AdvanceEnemies {
        /// Duration of simulated time to integrate enemy motion over.
        dt: Duration,
    },
    /// Starts a wave and spawns its enemies atomically.
    StartWave {
        /// One-based wave number being started.
        wave: u32,
        /// Enemies to create for the wave.
        spawns: Vec<EnemySpawn>,
    },
    /// Latches the passed flag of an enemy that crossed the player.
    MarkEnemyPassed {
        /// Identifier of the enemy that crossed the player.
        enemy: EnemyId,
    },
    /// Marks the active wave as cleared.
    ClearWave,
    /// Applies a defense-object hit: destroys the enemy and costs a life.
    DamageDefense {
        /// Identifier of the enemy that struck the defense object.
        enemy: EnemyId,
    },
    /// Ends the defense object's temporary invulnerability.
    EndInvincibility,
    /// Adds distance travelled to the level's running distance.
    AccrueDistance {
        /// Distance units to add.
        amount: f64,
    },
    /// Places the level's delivery house near the right edge of the world.
    SpawnDeliveryHouse,
    /// Marks the level as delivered.
    CompleteLevel,
    /// Ends the run after the player ran out of lives.
    EndRun,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new level began.
    LevelStarted {
        /// One-based level number.
        level: u32,
        /// Lives granted for the level.
        lives: u32,
        /// Initial world width.
        world_width: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports the player's position after the movement step.
    PlayerMoved {
        /// Position of the player after clamping to the world.
        position: WorldPoint,
        /// Horizontal velocity applied during the tick in units per second.
        velocity_x: f32,
    },
    /// Reports that a scheduled timer elapsed.
    TimerFired {
        /// Action carried by the timer.
        timer: TimerKind,
    },
    /// Confirms that the world grew to the right.
    WorldExtended {
        /// Newly added segment of the world.
        segment: WorldSegment,
    },
    /// Confirms that a wave started.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Identifiers of the enemies spawned for the wave.
        enemies: Vec<EnemyId>,
    },
    /// Confirms that an enemy was spawned.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the spawned enemy.
        kind: EnemyKind,
        /// Spawn position.
        position: WorldPoint,
    },
    /// Reports that an enemy crossed the player's x coordinate for the first time.
    EnemyPassed {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy left the world on the left.
    EnemyExited {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Reports that an enemy was destroyed by the defense object.
    EnemyDestroyed {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Confirms that the active wave cleared.
    WaveCleared {
        /// Wave number that cleared.
        wave: u32,
    },
    /// Damage signal emitted when the defense object absorbs a hit.
    DefenseHit {
        /// Enemy that struck the defense object.
        enemy: EnemyId,
        /// Lives left after the hit.
        lives_remaining: u32,
    },
    /// Reports that the defense object is vulnerable again.
    InvincibilityEnded,
    /// Reports that the last life was lost.
    LivesExhausted,
    /// Reports the running distance after accrual.
    DistanceAccrued {
        /// Total distance travelled in the level.
        distance: f64,
    },
    /// Confirms that the delivery house was placed.
    DeliveryHouseSpawned {
        /// Centre of the house.
        position: WorldPoint,
    },
    /// Reports that the player reached the delivery house.
    LevelCompleted {
        /// Level that was completed.
        level: u32,
        /// Distance travelled in the level.
        distance: f64,
        /// Lives left at completion.
        lives: u32,
    },
    /// Reports that the run ended with no lives left.
    RunEnded {
        /// Level reached.
        level: u32,
        /// Distance travelled in the level.
        distance: f64,
    },
}

/// Delayed actions stored on the world's timer queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// Starts the given wave when it fires.
    WaveStart {
        /// Wave to start.
        wave: u32,
    },
    /// Places the delivery house when it fires.
    DeliveryHouse,
    /// Ends the defense object's invulnerability when it fires.
    InvincibilityEnd,
}

impl TimerKind {
    /// Reports whether the timer drives level progression rather than a transient effect.
    #[must_use]
    pub const fn is_progression(self) -> bool {
        matches!(self, Self::WaveStart { .. } | Self::DeliveryHouse)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Types of enemies that roam the street.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Small, moderately fast robber.
    SmallRobber,
    /// Large, slow robber.
    LargeRobber,
    /// Small, fast thief.
    FastThief,
    /// The fastest enemy.
    MasterThief,
}

impl EnemyKind {
    /// Every enemy kind in catalogue order.
    pub const ALL: [EnemyKind; 4] = [
        Self::SmallRobber,
        Self::LargeRobber,
        Self::FastThief,
        Self::MasterThief,
    ];

    /// Leftward speed before difficulty scaling, in world units per second.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::SmallRobber => 120.0,
            Self::LargeRobber => 80.0,
            Self::FastThief => 160.0,
            Self::MasterThief => 220.0,
        }
    }

    /// Bounding box dimensions of the enemy.
    #[must_use]
    pub const fn extent(self) -> Extent {
        match self {
            Self::SmallRobber => Extent::new(16.0, 28.0),
            Self::LargeRobber => Extent::new(20.0, 36.0),
            Self::FastThief => Extent::new(16.0, 24.0),
            Self::MasterThief => Extent::new(24.0, 32.0),
        }
    }

    /// Human readable name of the enemy kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SmallRobber => "Small Robber",
            Self::LargeRobber => "Large Robber",
            Self::FastThief => "Fast Thief",
            Self::MasterThief => "Master Thief",
        }
    }
}

/// Location in world space expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns a copy of the point moved horizontally by `dx`.
    #[must_use]
    pub fn offset_x(self, dx: f32) -> Self {
        Self::new(self.x + dx, self.y)
    }
}

/// Width and height of an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    width: f32,
    height: f32,
}

impl Extent {
    /// Creates a new extent.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal size.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical size.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Bounds {
    /// Creates a box of the given extent centred on `center`.
    #[must_use]
    pub fn centered(center: WorldPoint, extent: Extent) -> Self {
        let half_width = extent.width() / 2.0;
        let half_height = extent.height() / 2.0;
        Self {
            left: center.x() - half_width,
            top: center.y() - half_height,
            right: center.x() + half_width,
            bottom: center.y() + half_height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Right edge.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.right
    }

    /// Top edge.
    #[must_use]
    pub const fn top(&self) -> f32 {
        self.top
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        self.bottom
    }

    /// Reports whether two boxes overlap. Touching edges count as overlap.
    #[must_use]
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.right < other.left
            || self.bottom < other.top
            || self.left > other.right
            || self.top > other.bottom)
    }
}

/// Capability of entities that occupy space and can overlap each other.
pub trait Collidable {
    /// Bounding box of the entity in world space.
    fn bounds(&self) -> Bounds;

    /// Reports whether this entity overlaps another collidable.
    fn overlaps(&self, other: &impl Collidable) -> bool
    where
        Self: Sized,
    {
        self.bounds().intersects(&other.bounds())
    }
}

impl Collidable for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

/// Half-open horizontal range `[start, end)` of the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSegment {
    start: u32,
    end: u32,
}

impl WorldSegment {
    /// Creates a new segment. `end` is clamped so that it never precedes `start`.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Inclusive start of the segment.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Exclusive end of the segment.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Length of the segment in world units.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Reports whether the segment covers no units.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Spawn parameters derived from a level's difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Fewest enemies a wave may contain.
    pub min_enemies: u32,
    /// Most enemies a wave may contain.
    pub max_enemies: u32,
    /// Spawn cadence indicator for the level.
    pub spawn_interval: Duration,
    /// Factor applied to every enemy's base speed.
    pub speed_multiplier: f32,
}

/// Request to create a single enemy as part of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Kind of enemy to create.
    pub kind: EnemyKind,
    /// Spawn position.
    pub position: WorldPoint,
    /// Leftward speed in world units per second, already scaled by difficulty.
    pub speed: f32,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position of the enemy's centre.
    pub position: WorldPoint,
    /// Leftward speed in world units per second.
    pub speed: f32,
    /// Whether the enemy has crossed the player's x coordinate at least once.
    pub has_passed: bool,
}

impl Collidable for EnemySnapshot {
    fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, self.kind.extent())
    }
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a live enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of live enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

}

/// Payload forwarded from a completed level into the next level's intro.
///
/// Adapters may hand over partially filled payloads; use
/// [`LevelHandoff::from_payload`] to obtain safe values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffPayload {
    /// Level to start, if provided.
    pub level: Option<u32>,
    /// Running total score, if provided.
    pub total_score: Option<u64>,
}

/// Validated inter-level handoff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelHandoff {
    level: u32,
    total_score: u64,
}

impl LevelHandoff {
    /// Handoff used when a fresh run starts.
    pub const FIRST_LEVEL: Self = Self {
        level: 1,
        total_score: 0,
    };

    /// Creates a handoff; a level of zero is promoted to the first level.
    #[must_use]
    pub const fn new(level: u32, total_score: u64) -> Self {
        let level = if level == 0 { 1 } else { level };
        Self { level, total_score }
    }

    /// Builds a handoff from an optional, possibly incomplete payload.
    ///
    /// Missing fields default to `level = 1` and `total_score = 0`. A zero
    /// level is malformed and also falls back to the first level.
    #[must_use]
    pub fn from_payload(payload: Option<&HandoffPayload>) -> Self {
        let Some(payload) = payload else {
            return Self::FIRST_LEVEL;
        };
        Self::new(
            payload.level.unwrap_or(1),
            payload.total_score.unwrap_or(0),
        )
    }

    /// Level to start.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Running total score carried into the level.
    #[must_use]
    pub const fn total_score(&self) -> u64 {
        self.total_score
    }
}

impl From<LevelHandoff> for HandoffPayload {
    fn from(handoff: LevelHandoff) -> Self {
        Self {
            level: Some(handoff.level),
            total_score: Some(handoff.total_score),
        }
    }
}

/// Final statistics reported at each terminal transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FinalStats {
    /// Running total score after folding in this level.
    pub score: u64,
    /// Score earned in this level including the bonus.
    pub level_score: u64,
    /// Whole distance units travelled in this level.
    pub distance: u64,
    /// Lives left when the level ended.
    pub lives: u32,
    /// Bonus awarded for remaining lives.
    pub bonus: u64,
    /// Level that ended.
    pub level: u32,
    /// Persisted high score after the transition.
    pub high_score: u64,
}

impl FinalStats {
    /// Reports whether the run total matches or beats the high score.
    #[must_use]
    pub const fn is_new_high_score(&self) -> bool {
        self.score >= self.high_score
    }

    /// Handoff that starts the level following this one.
    #[must_use]
    pub const fn next_level(&self) -> LevelHandoff {
        LevelHandoff::new(self.level.saturating_add(1), self.score)
    }
}
