//! Tunable session parameters and their TOML representation.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Parameters shared by every level of a session.
///
/// Every field falls back to its default when omitted from a config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Lives the defense starts every level with.
    pub starting_lives: u32,
    /// Waves per level before the delivery house appears.
    pub max_waves: u32,
    /// Seed from which every level's wave randomness is derived.
    pub global_seed: u64,
    /// Delay before the first wave of a level, in milliseconds.
    pub intro_delay_ms: u64,
    /// Delay between a cleared wave and what follows, in milliseconds.
    pub wave_gap_ms: u64,
    /// Invincibility granted after each defense hit, in milliseconds.
    pub invincibility_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_lives: 7,
            max_waves: 12,
            global_seed: 0x0de1_1fe5,
            intro_delay_ms: 2_500,
            wave_gap_ms: 2_000,
            invincibility_ms: 1_500,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can drive a level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }
        if self.max_waves == 0 {
            return Err(ConfigError::NoWaves);
        }
        Ok(())
    }

    /// Delay before the first wave.
    #[must_use]
    pub const fn intro_delay(&self) -> Duration {
        Duration::from_millis(self.intro_delay_ms)
    }

    /// Delay after a cleared wave.
    #[must_use]
    pub const fn wave_gap(&self) -> Duration {
        Duration::from_millis(self.wave_gap_ms)
    }

    /// Invincibility window after a hit.
    #[must_use]
    pub const fn invincibility(&self) -> Duration {
        Duration::from_millis(self.invincibility_ms)
    }
}

/// Errors raised while loading a [`SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse session config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Levels must start with at least one life.
    #[error("starting_lives must be positive")]
    NoLives,

    /// Levels must contain at least one wave.
    #[error("max_waves must be positive")]
    NoWaves,
}
