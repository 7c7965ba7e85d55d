//! Physics stepping and world bounds.
//!
//! Wraps the rapier2d structures behind the handful of primitives the rest
//! of the scene needs: body creation, per-tick forces and velocities, the
//! simulation step, and the post-step bounds guard. Gravity is zero; the
//! engine is used for integration, collision response and damping only.

use crate::config::WorldConfig;
use glam::Vec2;
use rapier2d::prelude::*;

/// Material properties for created bodies.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.1,
            restitution: 0.2,
        }
    }
}

/// Axis-aligned world limits used by the bounds guard.
#[derive(Debug, Clone, Copy)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl From<&WorldConfig> for WorldBounds {
    fn from(world: &WorldConfig) -> Self {
        Self {
            min_x: world.min_x(),
            max_x: world.max_x(),
            min_y: world.min_y(),
            max_y: world.max_y(),
        }
    }
}

pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    gravity: Vector<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    bounds: WorldBounds,
}

impl PhysicsWorld {
    /// Create an empty zero-gravity world plus the boundary walls.
    pub fn new(world: &WorldConfig) -> Self {
        let mut physics = Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            bounds: WorldBounds::from(world),
        };
        physics.create_walls(world);
        physics
    }

    /// Static walls along the four world edges. The bounds guard backs
    /// these up; fast bodies can tunnel through thin static geometry.
    fn create_walls(&mut self, world: &WorldConfig) {
        let material = Material {
            restitution: world.wall_restitution,
            ..Material::default()
        };
        let half_t = world.wall_thickness / 2.0;
        let half_w = world.width / 2.0;
        let half_h = world.height / 2.0;

        // Top, bottom, left, right
        self.add_static_cuboid(Vec2::new(0.0, world.min_y()), Vec2::new(half_w, half_t), material);
        self.add_static_cuboid(Vec2::new(0.0, world.max_y()), Vec2::new(half_w, half_t), material);
        self.add_static_cuboid(Vec2::new(world.min_x(), 0.0), Vec2::new(half_t, half_h), material);
        self.add_static_cuboid(Vec2::new(world.max_x(), 0.0), Vec2::new(half_t, half_h), material);
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    /// Insert a body/collider pair. All creation helpers funnel through
    /// here; `ship` uses it directly for its triangle hull.
    pub fn insert_body(&mut self, body: RigidBody, collider: Collider) -> RigidBodyHandle {
        let handle = self.rigid_body_set.insert(body);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        handle
    }

    pub fn add_static_cuboid(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        material: Material,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        self.insert_body(body, collider)
    }

    /// Static convex polygon from arbitrary vertices (relative to `center`).
    /// Returns `None` for degenerate vertex lists; the caller decides
    /// whether to skip the entity.
    pub fn add_static_polygon(
        &mut self,
        center: Vec2,
        vertices: &[Vec2],
        material: Material,
    ) -> Option<RigidBodyHandle> {
        let points: Vec<Point<f32>> = vertices.iter().map(|v| point![v.x, v.y]).collect();
        let collider = ColliderBuilder::convex_hull(&points)?
            .friction(material.friction)
            .restitution(material.restitution)
            .density(material.density)
            .build();
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        Some(self.insert_body(body, collider))
    }

    pub fn add_dynamic_ball(
        &mut self,
        center: Vec2,
        radius: f32,
        material: Material,
        linear_damping: f32,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center.x, center.y])
            .linear_damping(linear_damping)
            .build();
        let collider = ColliderBuilder::ball(radius)
            .density(material.density)
            .friction(material.friction)
            .restitution(material.restitution)
            .build();
        self.insert_body(body, collider)
    }

    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let body = self.rigid_body_set.get(handle)?;
        let t = body.translation();
        Some(Vec2::new(t.x, t.y))
    }

    pub fn rotation(&self, handle: RigidBodyHandle) -> Option<f32> {
        Some(self.rigid_body_set.get(handle)?.rotation().angle())
    }

    pub fn linear_velocity(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        let v = self.rigid_body_set.get(handle)?.linvel();
        Some(Vec2::new(v.x, v.y))
    }

    pub fn angular_velocity(&self, handle: RigidBodyHandle) -> Option<f32> {
        Some(self.rigid_body_set.get(handle)?.angvel())
    }

    pub fn set_angular_velocity(&mut self, handle: RigidBodyHandle, angvel: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_angvel(angvel, true);
        }
    }

    /// Replace the body's force accumulator for this tick. Rapier forces
    /// persist across steps, so callers re-apply (or clear) every tick.
    pub fn set_tick_force(&mut self, handle: RigidBodyHandle, force: Vec2) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.reset_forces(true);
            if force != Vec2::ZERO {
                body.add_force(vector![force.x, force.y], true);
            }
        }
    }

    /// Advance the simulation by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
    }

    /// Post-step safety net: clamp the body back inside the world limits
    /// and zero the outward velocity component on the clamped axis only, so
    /// sliding along a boundary is preserved. Idempotent.
    pub fn keep_in_bounds(&mut self, handle: RigidBodyHandle) {
        let Some(body) = self.rigid_body_set.get_mut(handle) else {
            return;
        };
        let bounds = self.bounds;
        let pos = *body.translation();
        let vel = *body.linvel();
        let mut clamped = pos;
        let mut new_vel = vel;

        if pos.x < bounds.min_x {
            clamped.x = bounds.min_x;
            new_vel.x = 0.0;
        } else if pos.x > bounds.max_x {
            clamped.x = bounds.max_x;
            new_vel.x = 0.0;
        }
        if pos.y < bounds.min_y {
            clamped.y = bounds.min_y;
            new_vel.y = 0.0;
        } else if pos.y > bounds.max_y {
            clamped.y = bounds.max_y;
            new_vel.y = 0.0;
        }

        if clamped != pos {
            body.set_translation(clamped, true);
            body.set_linvel(new_vel, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> PhysicsWorld {
        PhysicsWorld::new(&WorldConfig::default())
    }

    fn spawn_ball(physics: &mut PhysicsWorld, pos: Vec2, vel: Vec2) -> RigidBodyHandle {
        let handle = physics.add_dynamic_ball(pos, 10.0, Material::default(), 0.0);
        physics
            .rigid_body_set
            .get_mut(handle)
            .unwrap()
            .set_linvel(vector![vel.x, vel.y], true);
        handle
    }

    #[test]
    fn test_bounds_clamp_zeroes_outward_axis_only() {
        let mut physics = test_world();
        let max_x = physics.bounds().max_x;
        let handle = spawn_ball(
            &mut physics,
            Vec2::new(max_x + 500.0, 0.0),
            Vec2::new(120.0, -80.0),
        );

        physics.keep_in_bounds(handle);

        let pos = physics.position(handle).unwrap();
        let vel = physics.linear_velocity(handle).unwrap();
        assert_eq!(pos.x, max_x);
        assert_eq!(vel.x, 0.0);
        // Perpendicular component preserved: sliding along the edge works
        assert_eq!(vel.y, -80.0);
    }

    #[test]
    fn test_bounds_clamp_idempotent() {
        let mut physics = test_world();
        let bounds = physics.bounds();
        let handle = spawn_ball(
            &mut physics,
            Vec2::new(bounds.min_x - 300.0, bounds.max_y + 300.0),
            Vec2::new(-50.0, 50.0),
        );

        physics.keep_in_bounds(handle);
        let pos_once = physics.position(handle).unwrap();
        let vel_once = physics.linear_velocity(handle).unwrap();

        physics.keep_in_bounds(handle);
        assert_eq!(physics.position(handle).unwrap(), pos_once);
        assert_eq!(physics.linear_velocity(handle).unwrap(), vel_once);
        assert_eq!(pos_once, Vec2::new(bounds.min_x, bounds.max_y));
        assert_eq!(vel_once, Vec2::ZERO);
    }

    #[test]
    fn test_bounds_clamp_noop_inside() {
        let mut physics = test_world();
        let handle = spawn_ball(&mut physics, Vec2::new(10.0, -20.0), Vec2::new(5.0, 5.0));
        physics.keep_in_bounds(handle);
        assert_eq!(physics.position(handle).unwrap(), Vec2::new(10.0, -20.0));
        assert_eq!(physics.linear_velocity(handle).unwrap(), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_step_integrates_velocity() {
        let mut physics = test_world();
        let handle = spawn_ball(&mut physics, Vec2::ZERO, Vec2::new(60.0, 0.0));
        for _ in 0..60 {
            physics.step(1.0 / 60.0);
        }
        let pos = physics.position(handle).unwrap();
        // One second at 60 units/s, no damping
        assert!((pos.x - 60.0).abs() < 1.0);
        assert!(pos.y.abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_polygon_rejected() {
        let mut physics = test_world();
        // Collinear points have no convex hull area
        let result = physics.add_static_polygon(
            Vec2::ZERO,
            &[Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
            Material::default(),
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_tick_force_replaced_not_accumulated() {
        let mut physics = test_world();
        let handle = spawn_ball(&mut physics, Vec2::ZERO, Vec2::ZERO);
        physics.set_tick_force(handle, Vec2::new(1000.0, 0.0));
        physics.set_tick_force(handle, Vec2::new(1000.0, 0.0));
        physics.step(1.0 / 60.0);
        let vel_single = physics.linear_velocity(handle).unwrap();

        let handle2 = spawn_ball(&mut physics, Vec2::new(200.0, 200.0), Vec2::ZERO);
        physics.set_tick_force(handle2, Vec2::new(1000.0, 0.0));
        physics.step(1.0 / 60.0);
        let vel_other = physics.linear_velocity(handle2).unwrap();

        // Setting the force twice in one tick must not double it
        assert!((vel_single.x - vel_other.x).abs() < 1e-3);
    }
}
