#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Delivery Rush.

mod actors;
mod enemies;
mod timers;

use delivery_rush_core::{Command, Event, TimerKind, WorldSegment};
use log::{debug, info};

use actors::{Advance, DeliveryHouse, OrbitBox, Player};
use enemies::EnemyRegistry;
use timers::TimerQueue;

/// World width every level starts with.
pub const INITIAL_WORLD_WIDTH: u32 = 1_600;
/// Height of the playable street.
pub const WORLD_HEIGHT: f32 = 600.0;
/// Width of the camera viewport that follows the player.
pub const VIEWPORT_WIDTH: f32 = 800.0;

const DEFAULT_STARTING_LIVES: u32 = 7;
const DEFAULT_MAX_WAVES: u32 = 12;

/// Represents the authoritative Delivery Rush world state.
#[derive(Debug)]
pub struct World {
    level: u32,
    max_waves: u32,
    lives: u32,
    invincible: bool,
    distance: f64,
    wave: u32,
    wave_active: bool,
    world_width: u32,
    level_complete_triggered: bool,
    game_over: bool,
    player: Player,
    orbit: OrbitBox,
    enemies: EnemyRegistry,
    house: Option<DeliveryHouse>,
    timers: TimerQueue,
    tick_index: u64,
}

impl World {
    /// Creates a world holding the first level with default lives and waves.
    #[must_use]
    pub fn new() -> Self {
        Self::for_level(1, DEFAULT_STARTING_LIVES, DEFAULT_MAX_WAVES)
    }

    fn for_level(level: u32, lives: u32, max_waves: u32) -> Self {
        let player = Player::spawn();
        let orbit = OrbitBox::around(player.position());
        Self {
            level,
            max_waves,
            lives,
            invincible: false,
            distance: 0.0,
            wave: 1,
            wave_active: false,
            world_width: INITIAL_WORLD_WIDTH,
            level_complete_triggered: false,
            game_over: false,
            player,
            orbit,
            enemies: EnemyRegistry::new(),
            house: None,
            timers: TimerQueue::new(),
            tick_index: 0,
        }
    }

    fn is_finished(&self) -> bool {
        self.level_complete_triggered || self.game_over
    }

    fn teardown(&mut self) {
        let dropped = self.timers.cancel_all();
        if dropped > 0 {
            debug!("level {} teardown cancelled {dropped} timers", self.level);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// # Panics
///
/// Panics when a command would break a level invariant: starting a wave past
/// the configured maximum or below the current wave, spawning a second
/// delivery house, completing a level twice, or ending a run twice.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginLevel {
            level,
            lives,
            max_waves,
        } => {
            assert!(level >= 1, "levels are one-based");
            assert!(lives > 0, "a level must start with at least one life");
            assert!(max_waves >= 1, "a level needs at least one wave");

            world.teardown();
            let mut timers = std::mem::take(&mut world.timers);
            timers.rewind();
            *world = World::for_level(level, lives, max_waves);
            world.timers = timers;
            info!("level {level} started with {lives} lives and {max_waves} waves");
            out_events.push(Event::LevelStarted {
                level,
                lives,
                world_width: world.world_width,
            });
        }
        Command::SetMovementIntent { intent } => {
            world.player.steer(intent);
        }
        Command::Tick { dt } => {
            if world.is_finished() {
                return;
            }

            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.player.step(dt, world.world_width);
            world.orbit.advance(dt);
            world.orbit.follow(world.player.position());
            out_events.push(Event::PlayerMoved {
                position: world.player.position(),
                velocity_x: world.player.velocity_x(),
            });

            let mut fired = Vec::new();
            world.timers.advance(dt, &mut fired);
            for timer in fired {
                debug!("timer {timer:?} fired at tick {}", world.tick_index);
                out_events.push(Event::TimerFired { timer });
            }
        }
        Command::ScheduleTimer { delay, timer } => {
            if world.is_finished() {
                return;
            }
            world.timers.schedule(delay, timer);
        }
        Command::ExtendWorld { width } => {
            if width <= world.world_width {
                return;
            }

            let segment = WorldSegment::new(world.world_width, width);
            world.world_width = width;
            debug!(
                "world extended to {width} (segment {}..{})",
                segment.start(),
                segment.end()
            );
            out_events.push(Event::WorldExtended { segment });
        }
        Command::AdvanceEnemies { dt } => {
            if world.is_finished() {
                return;
            }

            let mut exited = Vec::new();
            world.enemies.advance_all(dt, &mut exited);
            for enemy in exited {
                out_events.push(Event::EnemyExited { enemy });
            }
        }
        Command::StartWave { wave, spawns } => {
            if world.is_finished() {
                return;
            }

            assert!(
                (1..=world.max_waves).contains(&wave),
                "wave {wave} outside 1..={}",
                world.max_waves
            );
            assert!(
                wave >= world.wave,
                "wave counter cannot decrease from {} to {wave}",
                world.wave
            );

            world.wave = wave;
            world.wave_active = true;

            let mut enemies = Vec::with_capacity(spawns.len());
            for spawn in &spawns {
                let enemy = world.enemies.spawn(spawn);
                enemies.push(enemy);
                out_events.push(Event::EnemySpawned {
                    enemy,
                    kind: spawn.kind,
                    position: spawn.position,
                });
            }

            info!(
                "wave {wave}/{} started with {} enemies ({} alive)",
                world.max_waves,
                enemies.len(),
                world.enemies.len()
            );
            out_events.push(Event::WaveStarted { wave, enemies });
        }
        Command::MarkEnemyPassed { enemy } => {
            if let Some(record) = world.enemies.get_mut(enemy) {
                if record.mark_passed() {
                    out_events.push(Event::EnemyPassed { enemy });
                }
            }
        }
        Command::ClearWave => {
            if !world.wave_active {
                return;
            }

            world.wave_active = false;
            info!("wave {}/{} cleared", world.wave, world.max_waves);
            out_events.push(Event::WaveCleared { wave: world.wave });
        }
        Command::DamageDefense { enemy } => {
            if world.is_finished() || world.invincible {
                return;
            }
            assert!(world.lives > 0, "defense hit with no lives left");

            let Some(enemy) = world.enemies.remove(enemy) else {
                return;
            };
            out_events.push(Event::EnemyDestroyed { enemy });

            world.lives -= 1;
            world.invincible = true;
            debug!("defense hit by {enemy:?}, {} lives left", world.lives);
            out_events.push(Event::DefenseHit {
                enemy,
                lives_remaining: world.lives,
            });

            if world.lives == 0 {
                let dropped = world.timers.cancel_matching(TimerKind::is_progression);
                debug!("lives exhausted, dropped {dropped} progression timers");
                out_events.push(Event::LivesExhausted);
            }
        }
        Command::EndInvincibility => {
            if !world.invincible {
                return;
            }

            world.invincible = false;
            out_events.push(Event::InvincibilityEnded);
        }
        Command::AccrueDistance { amount } => {
            if world.is_finished() {
                return;
            }

            debug_assert!(amount >= 0.0, "distance never decreases");
            world.distance += amount.max(0.0);
            out_events.push(Event::DistanceAccrued {
                distance: world.distance,
            });
        }
        Command::SpawnDeliveryHouse => {
            if world.is_finished() {
                return;
            }

            assert!(
                world.house.is_none(),
                "level {} already has a delivery house",
                world.level
            );
            let house = DeliveryHouse::near_right_edge(world.world_width);
            let position = house.position();
            world.house = Some(house);
            info!("delivery house placed at x = {}", position.x());
            out_events.push(Event::DeliveryHouseSpawned { position });
        }
        Command::CompleteLevel => {
            if world.game_over {
                return;
            }

            assert!(
                !world.level_complete_triggered,
                "level {} completed twice",
                world.level
            );
            assert!(
                world.house.is_some(),
                "level {} completed without a delivery house",
                world.level
            );

            world.level_complete_triggered = true;
            world.teardown();
            info!(
                "level {} delivered with {} lives at distance {:.1}",
                world.level, world.lives, world.distance
            );
            out_events.push(Event::LevelCompleted {
                level: world.level,
                distance: world.distance,
                lives: world.lives,
            });
        }
        Command::EndRun => {
            assert!(!world.game_over, "run ended twice");
            if world.level_complete_triggered {
                return;
            }

            world.game_over = true;
            world.teardown();
            info!(
                "run ended on level {} at distance {:.1}",
                world.level, world.distance
            );
            out_events.push(Event::RunEnded {
                level: world.level,
                distance: world.distance,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{World, VIEWPORT_WIDTH};
    use delivery_rush_core::{Bounds, Collidable, EnemyView, WorldPoint};

    /// Immutable copy of the per-level counters.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct LevelSnapshot {
        /// One-based level number.
        pub level: u32,
        /// Distance travelled in the level.
        pub distance: f64,
        /// Lives left.
        pub lives: u32,
        /// Whether the defense object currently ignores hits.
        pub invincible: bool,
        /// Current wave number.
        pub wave: u32,
        /// Number of waves in the level.
        pub max_waves: u32,
        /// Whether a wave is in progress.
        pub wave_active: bool,
        /// Current world width.
        pub world_width: u32,
        /// Whether the player already reached the delivery house.
        pub level_complete_triggered: bool,
        /// Whether the run ended with no lives left.
        pub game_over: bool,
    }

    /// Captures the level counters.
    #[must_use]
    pub fn level_state(world: &World) -> LevelSnapshot {
        LevelSnapshot {
            level: world.level,
            distance: world.distance,
            lives: world.lives,
            invincible: world.invincible,
            wave: world.wave,
            max_waves: world.max_waves,
            wave_active: world.wave_active,
            world_width: world.world_width,
            level_complete_triggered: world.level_complete_triggered,
            game_over: world.game_over,
        }
    }

    /// Current world width.
    #[must_use]
    pub fn world_width(world: &World) -> u32 {
        world.world_width
    }

    /// Position of the player's centre.
    #[must_use]
    pub fn player_position(world: &World) -> WorldPoint {
        world.player.position()
    }

    /// Horizontal velocity of the player in units per second.
    #[must_use]
    pub fn player_velocity_x(world: &World) -> f32 {
        world.player.velocity_x()
    }

    /// Bounding box of the player.
    #[must_use]
    pub fn player_bounds(world: &World) -> Bounds {
        world.player.bounds()
    }

    /// Bounding box of the orbiting defense object.
    #[must_use]
    pub fn defense_bounds(world: &World) -> Bounds {
        world.orbit.bounds()
    }

    /// Position of the delivery house, once spawned.
    #[must_use]
    pub fn house_position(world: &World) -> Option<WorldPoint> {
        world.house.as_ref().map(|house| house.position())
    }

    /// Bounding box of the delivery house, once spawned.
    #[must_use]
    pub fn house_bounds(world: &World) -> Option<Bounds> {
        world.house.as_ref().map(|house| house.bounds())
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Right edge of the camera viewport following the player.
    #[must_use]
    pub fn camera_right_edge(world: &World) -> f32 {
        let half_view = VIEWPORT_WIDTH / 2.0;
        let max_left = (world.world_width as f32 - VIEWPORT_WIDTH).max(0.0);
        let left = (world.player.position().x() - half_view).clamp(0.0, max_left);
        left + VIEWPORT_WIDTH
    }

    /// Level clock driving the timer queue.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.timers.now()
    }

    /// Number of timers still waiting to fire.
    #[must_use]
    pub fn pending_timers(world: &World) -> usize {
        world.timers.pending()
    }

    /// Timer generation; bumped whenever a level is torn down.
    #[must_use]
    pub fn timer_generation(world: &World) -> u64 {
        world.timers.generation()
    }

    /// Number of ticks processed since the level began.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}
