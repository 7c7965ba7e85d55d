//! The player ship: one rigid body with a triangular hull.
//!
//! Created once at startup and never destroyed. Thrust and rotation are
//! driven by the input mapper; this module only owns creation and
//! accessors.

use crate::config::ShipConfig;
use crate::physics::PhysicsWorld;
use glam::Vec2;
use rapier2d::prelude::*;

pub struct Ship {
    body: RigidBodyHandle,
    /// Mirrors the input thrust state so the renderer can show the engine
    /// glow without reaching into the input mapper.
    pub engine_glow: bool,
}

impl Ship {
    /// Spawn the ship body: an equilateral triangle pointing along +x,
    /// rotated to the configured spawn heading.
    pub fn spawn(physics: &mut PhysicsWorld, config: &ShipConfig) -> Self {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![config.spawn_x, config.spawn_y])
            .rotation(config.spawn_rotation)
            .linear_damping(config.linear_damping)
            .angular_damping(config.angular_damping)
            .build();
        let collider = ColliderBuilder::triangle(
            point![config.hull_radius, 0.0],
            point![-config.hull_radius / 2.0, -config.hull_radius * 0.866],
            point![-config.hull_radius / 2.0, config.hull_radius * 0.866],
        )
        .density(config.density)
        .friction(config.friction)
        .restitution(config.restitution)
        .build();

        Self {
            body: physics.insert_body(body, collider),
            engine_glow: false,
        }
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn position(&self, physics: &PhysicsWorld) -> Vec2 {
        physics.position(self.body).unwrap_or(Vec2::ZERO)
    }

    pub fn angle(&self, physics: &PhysicsWorld) -> f32 {
        physics.rotation(self.body).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ShipConfig, WorldConfig};

    #[test]
    fn test_spawn_position_and_heading() {
        let config = ShipConfig::default();
        let mut physics = PhysicsWorld::new(&WorldConfig::default());
        let ship = Ship::spawn(&mut physics, &config);

        let pos = ship.position(&physics);
        assert_eq!(pos, Vec2::new(config.spawn_x, config.spawn_y));
        assert!((ship.angle(&physics) - config.spawn_rotation).abs() < 1e-5);
    }
}
