//! Authoritative enemy state management utilities.

use std::{collections::BTreeMap, time::Duration};

use delivery_rush_core::{EnemyId, EnemyKind, EnemySnapshot, EnemySpawn, WorldPoint};

use crate::actors::Advance;

/// Enemy record stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: WorldPoint,
    speed: f32,
    has_passed: bool,
}

impl Enemy {
    /// Reports whether the enemy's right edge left the world on the left.
    fn has_exited(&self) -> bool {
        self.position.x() < -self.kind.extent().width()
    }

    /// Latches the passed flag. Returns `true` only on the first call.
    pub(crate) fn mark_passed(&mut self) -> bool {
        let newly_passed = !self.has_passed;
        self.has_passed = true;
        newly_passed
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            speed: self.speed,
            has_passed: self.has_passed,
        }
    }
}

impl Advance for Enemy {
    fn advance(&mut self, dt: Duration) {
        self.position = self.position.offset_x(-self.speed * dt.as_secs_f32());
    }
}

/// Registry that stores live enemies and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    /// Creates an empty enemy registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Inserts a new enemy and returns its identifier.
    pub(crate) fn spawn(&mut self, spawn: &EnemySpawn) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        let enemy = Enemy {
            id,
            kind: spawn.kind,
            position: spawn.position,
            speed: spawn.speed,
            has_passed: false,
        };
        let _ = self.entries.insert(id, enemy);
        id
    }

    pub(crate) fn remove(&mut self, enemy: EnemyId) -> Option<EnemyId> {
        self.entries.remove(&enemy).map(|removed| removed.id)
    }

    pub(crate) fn get_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.entries.get_mut(&enemy)
    }

    /// Moves every enemy and removes the ones that left the world.
    pub(crate) fn advance_all(&mut self, dt: Duration, exited: &mut Vec<EnemyId>) {
        for enemy in self.entries.values_mut() {
            enemy.advance(dt);
            if enemy.has_exited() {
                exited.push(enemy.id);
            }
        }

        for id in exited.iter() {
            let _ = self.entries.remove(id);
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.entries.values().map(Enemy::snapshot).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_at(registry: &mut EnemyRegistry, x: f32, kind: EnemyKind) -> EnemyId {
        registry.spawn(&EnemySpawn {
            kind,
            position: WorldPoint::new(x, 300.0),
            speed: kind.base_speed(),
        })
    }

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = EnemyRegistry::new();
        let first = spawn_at(&mut registry, 900.0, EnemyKind::SmallRobber);
        let second = spawn_at(&mut registry, 930.0, EnemyKind::FastThief);
        assert_eq!(first, EnemyId::new(0));
        assert_eq!(second, EnemyId::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn enemies_exit_once_right_edge_leaves_world() {
        let mut registry = EnemyRegistry::new();
        let id = spawn_at(&mut registry, 10.0, EnemyKind::LargeRobber);
        let mut exited = Vec::new();

        registry.advance_all(Duration::from_millis(250), &mut exited);
        assert!(exited.is_empty(), "x = -10 is still inside the margin");

        registry.advance_all(Duration::from_millis(250), &mut exited);
        assert_eq!(exited, vec![id]);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn passed_flag_latches_once() {
        let mut registry = EnemyRegistry::new();
        let id = spawn_at(&mut registry, 500.0, EnemyKind::MasterThief);
        let enemy = registry.get_mut(id).expect("enemy");
        assert!(enemy.mark_passed());
        assert!(!enemy.mark_passed());
    }
}
