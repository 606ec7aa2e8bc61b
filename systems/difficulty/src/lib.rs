#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure difficulty curve mapping a level number onto spawn parameters.

use std::time::Duration;

use delivery_rush_core::Difficulty;

/// Level beyond which difficulty stops scaling.
pub const DIFFICULTY_CAP_LEVEL: u32 = 10;

const EARLY_LEVELS: u32 = 3;
const BASE_SPAWN_INTERVAL_MS: u64 = 1_500;
const MIN_SPAWN_INTERVAL_MS: u64 = 700;
const SPAWN_INTERVAL_STEP_MS: u64 = 100;
const SPEED_STEP: f32 = 0.1;

/// Computes the spawn parameters for the provided level.
///
/// Levels are one-based; a level of zero is treated as the first level.
#[must_use]
pub fn difficulty(level: u32) -> Difficulty {
    let capped = level.clamp(1, DIFFICULTY_CAP_LEVEL);
    let speed_multiplier = 1.0 + SPEED_STEP * (capped - 1) as f32;

    if capped <= EARLY_LEVELS {
        return Difficulty {
            min_enemies: 2,
            max_enemies: 3,
            spawn_interval: Duration::from_millis(BASE_SPAWN_INTERVAL_MS),
            speed_multiplier,
        };
    }

    let reduction = u64::from(capped - EARLY_LEVELS) * SPAWN_INTERVAL_STEP_MS;
    let interval = BASE_SPAWN_INTERVAL_MS
        .saturating_sub(reduction)
        .max(MIN_SPAWN_INTERVAL_MS);

    Difficulty {
        min_enemies: 3,
        max_enemies: 5,
        spawn_interval: Duration::from_millis(interval),
        speed_multiplier,
    }
}
