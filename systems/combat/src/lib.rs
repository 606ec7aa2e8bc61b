#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system resolving overlaps between enemies and the player's orbiting defense.

use std::time::Duration;

use delivery_rush_core::{Bounds, Collidable, Command, EnemyView, Event, TimerKind};
use log::trace;

/// Default window during which the defense ignores further hits.
pub const DEFAULT_INVINCIBILITY: Duration = Duration::from_millis(1_500);

/// Combat system that turns defense overlaps into damage commands.
#[derive(Debug)]
pub struct CombatResolver {
    invincibility: Duration,
    invincible: bool,
    defeated: bool,
}

impl CombatResolver {
    /// Creates a resolver granting the provided invincibility window per hit.
    #[must_use]
    pub const fn new(invincibility: Duration) -> Self {
        Self {
            invincibility,
            invincible: false,
            defeated: false,
        }
    }

    /// Reports whether the resolver currently treats the defense as invincible.
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        self.invincible
    }

    /// Consumes world events and the current geometry to emit damage commands.
    ///
    /// At most one hit lands per call since the first hit makes the defense
    /// invincible.
    pub fn handle(
        &mut self,
        events: &[Event],
        defense: Bounds,
        player: Bounds,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::LevelStarted { .. } => {
                    self.invincible = false;
                    self.defeated = false;
                }
                Event::DefenseHit { .. } => self.invincible = true,
                Event::InvincibilityEnded => self.invincible = false,
                Event::LivesExhausted => self.defeated = true,
                Event::TimerFired {
                    timer: TimerKind::InvincibilityEnd,
                } => {
                    self.invincible = false;
                    out.push(Command::EndInvincibility);
                }
                _ => {}
            }
        }

        if self.defeated {
            return;
        }

        for enemy in enemies.iter() {
            if !self.invincible && enemy.overlaps(&defense) {
                self.invincible = true;
                out.push(Command::DamageDefense { enemy: enemy.id });
                out.push(Command::ScheduleTimer {
                    delay: self.invincibility,
                    timer: TimerKind::InvincibilityEnd,
                });
            }
            if enemy.overlaps(&player) {
                trace!("enemy {} brushed past the player", enemy.id.get());
            }
        }
    }
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::new(DEFAULT_INVINCIBILITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_rush_core::{EnemyId, EnemyKind, EnemySnapshot, Extent, WorldPoint};

    fn enemy(id: u32, x: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::SmallRobber,
            position: WorldPoint::new(x, 300.0),
            speed: 120.0,
            has_passed: false,
        }
    }

    fn defense_at(x: f32) -> Bounds {
        Bounds::centered(WorldPoint::new(x, 300.0), Extent::new(12.0, 12.0))
    }

    fn player_at(x: f32) -> Bounds {
        Bounds::centered(WorldPoint::new(x, 300.0), Extent::new(16.0, 32.0))
    }

    #[test]
    fn overlapping_enemy_damages_defense() {
        let mut combat = CombatResolver::default();
        let view = EnemyView::from_snapshots(vec![enemy(3, 105.0)]);
        let mut out = Vec::new();

        combat.handle(&[], defense_at(100.0), player_at(60.0), &view, &mut out);

        assert_eq!(
            out,
            vec![
                Command::DamageDefense {
                    enemy: EnemyId::new(3)
                },
                Command::ScheduleTimer {
                    delay: Duration::from_millis(1_500),
                    timer: TimerKind::InvincibilityEnd,
                },
            ]
        );
        assert!(combat.is_invincible());
    }

    #[test]
    fn only_one_hit_lands_per_tick() {
        let mut combat = CombatResolver::default();
        let view = EnemyView::from_snapshots(vec![enemy(1, 100.0), enemy(2, 104.0)]);
        let mut out = Vec::new();

        combat.handle(&[], defense_at(100.0), player_at(60.0), &view, &mut out);

        let hits = out
            .iter()
            .filter(|command| matches!(command, Command::DamageDefense { .. }))
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn invincible_defense_ignores_overlaps_until_timer_fires() {
        let mut combat = CombatResolver::default();
        let view = EnemyView::from_snapshots(vec![enemy(1, 100.0)]);
        let mut out = Vec::new();

        combat.handle(
            &[Event::DefenseHit {
                enemy: EnemyId::new(0),
                lives_remaining: 6,
            }],
            defense_at(100.0),
            player_at(60.0),
            &view,
            &mut out,
        );
        assert!(out.is_empty());

        combat.handle(
            &[Event::TimerFired {
                timer: TimerKind::InvincibilityEnd,
            }],
            defense_at(100.0),
            player_at(60.0),
            &view,
            &mut out,
        );
        assert_eq!(out[0], Command::EndInvincibility);
        assert_eq!(
            out[1],
            Command::DamageDefense {
                enemy: EnemyId::new(1)
            }
        );
    }

    #[test]
    fn player_overlap_has_no_effect() {
        let mut combat = CombatResolver::default();
        let view = EnemyView::from_snapshots(vec![enemy(1, 60.0)]);
        let mut out = Vec::new();

        combat.handle(&[], defense_at(100.0), player_at(60.0), &view, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn exhausted_lives_silence_combat() {
        let mut combat = CombatResolver::default();
        let view = EnemyView::from_snapshots(vec![enemy(1, 100.0)]);
        let mut out = Vec::new();

        combat.handle(
            &[Event::LivesExhausted, Event::InvincibilityEnded],
            defense_at(100.0),
            player_at(60.0),
            &view,
            &mut out,
        );

        assert!(out.is_empty());
    }
}
