#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Level state machine driving waves, the delivery house and terminal transitions.

use std::time::Duration;

use delivery_rush_core::{Bounds, Collidable, Command, Event, TimerKind};
use log::{debug, info};

/// Phases a level moves through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LevelPhase {
    /// Waiting for the first wave.
    #[default]
    Intro,
    /// A wave is on the street.
    WaveInProgress,
    /// The last wave was resolved and the next one is scheduled.
    WaveCleared,
    /// The final wave was resolved and the delivery house is scheduled.
    DeliveryPending,
    /// The delivery house stands at the end of the street.
    DeliveryHouseSpawned,
    /// The player reached the delivery house.
    LevelComplete,
    /// The defense ran out of lives.
    GameOver,
}

impl LevelPhase {
    /// Reports whether the level reached a final phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::LevelComplete | Self::GameOver)
    }
}

/// Configuration parameters required to construct the level flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    intro_delay: Duration,
    wave_gap: Duration,
    max_waves: u32,
}

impl Config {
    /// Creates a new configuration from the level timings and wave count.
    #[must_use]
    pub const fn new(intro_delay: Duration, wave_gap: Duration, max_waves: u32) -> Self {
        Self {
            intro_delay,
            wave_gap,
            max_waves,
        }
    }
}

/// Pure system that sequences a level from intro to its terminal phase.
#[derive(Debug)]
pub struct LevelFlow {
    config: Config,
    phase: LevelPhase,
    house_spawned: bool,
    completion_requested: bool,
}

impl LevelFlow {
    /// Creates a level flow waiting for a level to start.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            phase: LevelPhase::Intro,
            house_spawned: false,
            completion_requested: false,
        }
    }

    /// Current phase of the level.
    #[must_use]
    pub const fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// Consumes world events and emits the commands that advance the level.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelStarted { level, .. } => {
                    self.phase = LevelPhase::Intro;
                    self.house_spawned = false;
                    self.completion_requested = false;
                    debug!("level {level} intro, first wave in {:?}", self.config.intro_delay);
                    out.push(Command::ScheduleTimer {
                        delay: self.config.intro_delay,
                        timer: TimerKind::WaveStart { wave: 1 },
                    });
                }
                _ if self.phase.is_terminal() => {}
                Event::WaveStarted { .. } => self.phase = LevelPhase::WaveInProgress,
                Event::WaveCleared { wave } => self.on_wave_cleared(*wave, out),
                Event::TimerFired {
                    timer: TimerKind::DeliveryHouse,
                } => {
                    if !self.house_spawned {
                        out.push(Command::SpawnDeliveryHouse);
                    }
                }
                Event::DeliveryHouseSpawned { .. } => {
                    self.house_spawned = true;
                    self.phase = LevelPhase::DeliveryHouseSpawned;
                }
                Event::LivesExhausted => {
                    self.phase = LevelPhase::GameOver;
                    out.push(Command::EndRun);
                }
                Event::LevelCompleted { .. } => self.phase = LevelPhase::LevelComplete,
                Event::RunEnded { .. } => self.phase = LevelPhase::GameOver,
                _ => {}
            }
        }
    }

    /// Requests level completion once the player touches the delivery house.
    pub fn check_delivery(
        &mut self,
        player: Bounds,
        house: Option<Bounds>,
        out: &mut Vec<Command>,
    ) {
        if self.phase != LevelPhase::DeliveryHouseSpawned || self.completion_requested {
            return;
        }

        let Some(house) = house else {
            return;
        };

        if player.overlaps(&house) {
            self.completion_requested = true;
            out.push(Command::CompleteLevel);
        }
    }

    fn on_wave_cleared(&mut self, wave: u32, out: &mut Vec<Command>) {
        if wave < self.config.max_waves {
            self.phase = LevelPhase::WaveCleared;
            out.push(Command::ScheduleTimer {
                delay: self.config.wave_gap,
                timer: TimerKind::WaveStart { wave: wave + 1 },
            });
        } else if wave == self.config.max_waves && !self.house_spawned {
            info!("final wave {wave} cleared, delivery house incoming");
            self.phase = LevelPhase::DeliveryPending;
            out.push(Command::ScheduleTimer {
                delay: self.config.wave_gap,
                timer: TimerKind::DeliveryHouse,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_rush_core::{Extent, WorldPoint};

    fn flow(max_waves: u32) -> LevelFlow {
        LevelFlow::new(Config::new(
            Duration::from_millis(2_500),
            Duration::from_millis(2_000),
            max_waves,
        ))
    }

    fn started() -> Event {
        Event::LevelStarted {
            level: 1,
            lives: 7,
            world_width: 1_600,
        }
    }

    fn bounds(x: f32, width: f32, height: f32) -> Bounds {
        Bounds::centered(WorldPoint::new(x, 300.0), Extent::new(width, height))
    }

    #[test]
    fn level_start_schedules_first_wave_after_intro() {
        let mut flow = flow(12);
        let mut out = Vec::new();
        flow.handle(&[started()], &mut out);

        assert_eq!(flow.phase(), LevelPhase::Intro);
        assert_eq!(
            out,
            vec![Command::ScheduleTimer {
                delay: Duration::from_millis(2_500),
                timer: TimerKind::WaveStart { wave: 1 },
            }]
        );
    }

    #[test]
    fn cleared_wave_schedules_the_next_one() {
        let mut flow = flow(12);
        let mut out = Vec::new();
        flow.handle(
            &[
                started(),
                Event::WaveStarted {
                    wave: 4,
                    enemies: Vec::new(),
                },
                Event::WaveCleared { wave: 4 },
            ],
            &mut out,
        );

        assert_eq!(flow.phase(), LevelPhase::WaveCleared);
        assert_eq!(
            out.last(),
            Some(&Command::ScheduleTimer {
                delay: Duration::from_millis(2_000),
                timer: TimerKind::WaveStart { wave: 5 },
            })
        );
    }

    #[test]
    fn final_wave_schedules_delivery_house_once() {
        let mut flow = flow(3);
        let mut out = Vec::new();
        flow.handle(&[started(), Event::WaveCleared { wave: 3 }], &mut out);
        assert_eq!(flow.phase(), LevelPhase::DeliveryPending);
        assert_eq!(
            out.last(),
            Some(&Command::ScheduleTimer {
                delay: Duration::from_millis(2_000),
                timer: TimerKind::DeliveryHouse,
            })
        );

        out.clear();
        flow.handle(
            &[
                Event::TimerFired {
                    timer: TimerKind::DeliveryHouse,
                },
                Event::DeliveryHouseSpawned {
                    position: WorldPoint::new(1_580.0, 300.0),
                },
                Event::TimerFired {
                    timer: TimerKind::DeliveryHouse,
                },
            ],
            &mut out,
        );
        assert_eq!(out, vec![Command::SpawnDeliveryHouse]);
        assert_eq!(flow.phase(), LevelPhase::DeliveryHouseSpawned);
    }

    #[test]
    fn delivery_completes_level_once() {
        let mut flow = flow(1);
        let mut out = Vec::new();
        flow.handle(
            &[
                started(),
                Event::DeliveryHouseSpawned {
                    position: WorldPoint::new(1_580.0, 300.0),
                },
            ],
            &mut out,
        );
        out.clear();

        let house = Some(bounds(1_580.0, 40.0, 80.0));
        flow.check_delivery(bounds(1_000.0, 16.0, 32.0), house, &mut out);
        assert!(out.is_empty(), "player far from the house");

        flow.check_delivery(bounds(1_552.0, 16.0, 32.0), house, &mut out);
        flow.check_delivery(bounds(1_560.0, 16.0, 32.0), house, &mut out);
        assert_eq!(out, vec![Command::CompleteLevel]);
    }

    #[test]
    fn exhausted_lives_end_the_run_from_any_phase() {
        let mut flow = flow(12);
        let mut out = Vec::new();
        flow.handle(
            &[started(), Event::LivesExhausted, Event::WaveCleared { wave: 1 }],
            &mut out,
        );

        assert_eq!(flow.phase(), LevelPhase::GameOver);
        assert_eq!(out.last(), Some(&Command::EndRun));
        assert_eq!(
            out.iter()
                .filter(|command| matches!(command, Command::EndRun))
                .count(),
            1
        );
    }
}
