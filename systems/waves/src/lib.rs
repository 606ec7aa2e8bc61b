#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave controller that spawns enemies and tracks wave completion.

use std::collections::BTreeSet;

use delivery_rush_core::{Command, EnemyId, EnemyKind, EnemySpawn, EnemyView, Event, WorldPoint};
use delivery_rush_system_difficulty::difficulty;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Minimum distance ahead of the player at which enemies appear.
pub const SPAWN_LEAD: f32 = 100.0;
/// Horizontal gap between consecutive enemies of a wave.
pub const SPAWN_SPACING: f32 = 30.0;

const SEED_DOMAIN: &[u8] = b"delivery-rush/waves";

/// Pure system that plans waves and reports when the active wave is resolved.
#[derive(Debug)]
pub struct WaveController {
    global_seed: u64,
    level: u32,
    rng: ChaCha8Rng,
    pending: BTreeSet<EnemyId>,
    active: bool,
    complete: bool,
}

impl WaveController {
    /// Creates a controller whose randomness is derived from the global seed
    /// and the starting level.
    #[must_use]
    pub fn new(global_seed: u64, level: u32) -> Self {
        Self {
            global_seed,
            level,
            rng: level_rng(global_seed, level),
            pending: BTreeSet::new(),
            active: false,
            complete: false,
        }
    }

    /// Level the controller is currently seeded for.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Rolls the enemies of the next wave for the provided level.
    ///
    /// Enemies line up at the camera's right edge, or 100 units ahead of the
    /// player when that is further, spaced 30 units apart.
    pub fn plan_wave(
        &mut self,
        level: u32,
        player: WorldPoint,
        camera_right: f32,
    ) -> Vec<EnemySpawn> {
        let difficulty = difficulty(level);
        let count = self
            .rng
            .gen_range(difficulty.min_enemies..=difficulty.max_enemies);
        let base_x = camera_right.max(player.x() + SPAWN_LEAD);

        let mut spawns = Vec::with_capacity(count as usize);
        for index in 0..count {
            let x = base_x + index as f32 * SPAWN_SPACING;
            if x <= player.x() {
                continue;
            }

            let kind = EnemyKind::ALL[self.rng.gen_range(0..EnemyKind::ALL.len())];
            spawns.push(EnemySpawn {
                kind,
                position: WorldPoint::new(x, player.y()),
                speed: kind.base_speed() * difficulty.speed_multiplier,
            });
        }
        spawns
    }

    /// Plans a wave and emits the command that spawns it.
    pub fn start_wave(
        &mut self,
        wave: u32,
        level: u32,
        player: WorldPoint,
        camera_right: f32,
        out: &mut Vec<Command>,
    ) {
        let spawns = self.plan_wave(level, player, camera_right);
        let roster: Vec<&str> = spawns.iter().map(|spawn| spawn.kind.label()).collect();
        debug!("planned wave {wave} of level {level}: {}", roster.join(", "));
        out.push(Command::StartWave { wave, spawns });
    }

    /// Consumes world events and the current enemy view, emitting passed
    /// latches and the wave clear command. Returns the number of enemies the
    /// active wave still waits for.
    pub fn handle(
        &mut self,
        events: &[Event],
        player_x: f32,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) -> usize {
        for event in events {
            match event {
                Event::LevelStarted { level, .. } => self.reseed(*level),
                Event::WaveStarted { enemies, .. } => {
                    self.pending = enemies.iter().copied().collect();
                    self.active = true;
                    self.complete = false;
                }
                Event::EnemyDestroyed { enemy } | Event::EnemyExited { enemy } => {
                    if self.pending.remove(enemy) {
                        trace!("enemy {} resolved by removal", enemy.get());
                    }
                }
                _ => {}
            }
        }

        for snapshot in enemies.iter() {
            if snapshot.position.x() >= player_x {
                continue;
            }
            if !snapshot.has_passed {
                out.push(Command::MarkEnemyPassed { enemy: snapshot.id });
            }
            if self.pending.remove(&snapshot.id) {
                trace!("enemy {} resolved by passing the player", snapshot.id.get());
            }
        }
        self.pending.retain(|enemy| enemies.get(*enemy).is_some());

        if self.active && self.pending.is_empty() {
            self.active = false;
            self.complete = true;
            out.push(Command::ClearWave);
        }

        self.pending.len()
    }

    /// Reports whether the most recently started wave has been resolved.
    #[must_use]
    pub const fn is_wave_complete(&self) -> bool {
        self.complete
    }

    fn reseed(&mut self, level: u32) {
        self.level = level;
        self.rng = level_rng(self.global_seed, level);
        self.pending.clear();
        self.active = false;
        self.complete = false;
    }
}

fn level_rng(global_seed: u64, level: u32) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(SEED_DOMAIN);
    hasher.update(global_seed.to_le_bytes());
    hasher.update(level.to_le_bytes());
    let seed: [u8; 32] = hasher.finalize().into();
    ChaCha8Rng::from_seed(seed)
}
