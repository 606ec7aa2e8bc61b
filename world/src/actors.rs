//! Player-owned entities: the courier, its orbiting defense box and the delivery house.

use std::{f32::consts::TAU, time::Duration};

use delivery_rush_core::{Bounds, Collidable, Extent, MovementIntent, WorldPoint};

const PLAYER_SPAWN: WorldPoint = WorldPoint::new(60.0, 300.0);
const PLAYER_SPEED: f32 = 200.0;
const PLAYER_EXTENT: Extent = Extent::new(16.0, 32.0);

const ORBIT_RADIUS: f32 = 40.0;
const ORBIT_ANGULAR_SPEED: f32 = 2.0;
const ORBIT_EXTENT: Extent = Extent::new(12.0, 12.0);

const HOUSE_INSET: f32 = 20.0;
const HOUSE_CENTER_Y: f32 = 300.0;
const HOUSE_EXTENT: Extent = Extent::new(40.0, 80.0);

/// Entities whose state evolves with simulated time.
pub(crate) trait Advance {
    /// Integrates the entity's motion over `dt`.
    fn advance(&mut self, dt: Duration);
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    position: WorldPoint,
    velocity_x: f32,
}

impl Player {
    pub(crate) fn spawn() -> Self {
        Self {
            position: PLAYER_SPAWN,
            velocity_x: 0.0,
        }
    }

    pub(crate) fn steer(&mut self, intent: MovementIntent) {
        self.velocity_x = intent.direction() * PLAYER_SPEED;
    }

    /// Moves the player and keeps it inside `[0, world_width]`.
    pub(crate) fn step(&mut self, dt: Duration, world_width: u32) {
        let moved = self.position.x() + self.velocity_x * dt.as_secs_f32();
        let clamped = moved.clamp(0.0, world_width as f32);
        self.position = WorldPoint::new(clamped, self.position.y());
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }

    pub(crate) fn velocity_x(&self) -> f32 {
        self.velocity_x
    }
}

impl Collidable for Player {
    fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, PLAYER_EXTENT)
    }
}

/// Hazard-absorbing box circling the player.
#[derive(Clone, Debug)]
pub(crate) struct OrbitBox {
    angle: f32,
    radius: f32,
    angular_speed: f32,
    position: WorldPoint,
}

impl OrbitBox {
    pub(crate) fn around(anchor: WorldPoint) -> Self {
        let mut orbit = Self {
            angle: 0.0,
            radius: ORBIT_RADIUS,
            angular_speed: ORBIT_ANGULAR_SPEED,
            position: anchor,
        };
        orbit.follow(anchor);
        orbit
    }

    /// Re-derives the box position from the anchor and the current angle.
    pub(crate) fn follow(&mut self, anchor: WorldPoint) {
        self.position = WorldPoint::new(
            anchor.x() + self.radius * self.angle.cos(),
            anchor.y() + self.radius * self.angle.sin(),
        );
    }

}

impl Advance for OrbitBox {
    fn advance(&mut self, dt: Duration) {
        let mut angle = (self.angle + self.angular_speed * dt.as_secs_f32()).rem_euclid(TAU);
        if angle >= TAU {
            angle = 0.0;
        }
        self.angle = angle;
    }
}

impl Collidable for OrbitBox {
    fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, ORBIT_EXTENT)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct DeliveryHouse {
    position: WorldPoint,
}

impl DeliveryHouse {
    /// Places the house just inside the right edge of the world.
    pub(crate) fn near_right_edge(world_width: u32) -> Self {
        Self {
            position: WorldPoint::new(world_width as f32 - HOUSE_INSET, HOUSE_CENTER_Y),
        }
    }

    pub(crate) fn position(&self) -> WorldPoint {
        self.position
    }
}

impl Collidable for DeliveryHouse {
    fn bounds(&self) -> Bounds {
        Bounds::centered(self.position, HOUSE_EXTENT)
    }
}
