//! Input mapping: pointer and keyboard events become world-space intent.
//!
//! Event handlers mutate plain fields (`target_rotation`, thrust and
//! modifier flags) as events arrive; `apply_vehicle_controls` consumes that
//! snapshot exactly once per tick and drives the ship's rigid body. The
//! control loop never mutates this state itself.

use crate::camera::Camera;
use crate::config::ShipConfig;
use crate::physics::PhysicsWorld;
use crate::ship::Ship;
use glam::Vec2;

pub struct InputState {
    /// World-space angle from the ship toward the pointer, radians
    pub target_rotation: f32,
    pub is_thrusting: bool,
    pub is_slow_modifier: bool,
    pub is_fast_modifier: bool,
    /// Last pointer position in screen coordinates
    pub pointer_pos: Vec2,
    config: ShipConfig,
}

impl InputState {
    pub fn new(config: ShipConfig) -> Self {
        Self {
            target_rotation: config.spawn_rotation,
            is_thrusting: false,
            is_slow_modifier: false,
            is_fast_modifier: false,
            pointer_pos: Vec2::ZERO,
            config,
        }
    }

    /// Pointer moved: inverse-map through the camera and re-aim the ship.
    pub fn pointer_moved(
        &mut self,
        screen_pos: Vec2,
        camera: &Camera,
        vehicle_pos: Vec2,
    ) {
        self.pointer_pos = screen_pos;
        let world = camera.screen_to_world(screen_pos);
        let delta = world - vehicle_pos;
        self.target_rotation = delta.y.atan2(delta.x);
    }

    /// Pointer pressed: thrust starts only while the camera is plainly
    /// following the ship. Focus and freecam both suppress it.
    pub fn pointer_pressed(&mut self, camera: &Camera) {
        if matches!(camera.mode(), crate::camera::CameraMode::Follow) {
            self.is_thrusting = true;
        }
    }

    /// Pointer released or left the window: thrust ends.
    pub fn end_thrust(&mut self) {
        self.is_thrusting = false;
    }

    pub fn set_slow_modifier(&mut self, held: bool) {
        self.is_slow_modifier = held;
    }

    pub fn set_fast_modifier(&mut self, held: bool) {
        self.is_fast_modifier = held;
    }

    /// Thrust force magnitude after speed modifiers. Holding both
    /// modifiers cancels exactly to the unmodified base force.
    pub fn effective_thrust_force(&self) -> f32 {
        let base = self.config.thrust_force;
        match (self.is_slow_modifier, self.is_fast_modifier) {
            (true, false) => base * self.config.slow_multiplier,
            (false, true) => base * self.config.fast_multiplier,
            _ => base,
        }
    }

    /// Once-per-tick application of the current intent to the ship body.
    /// In freecam mode no new controls are applied, but the force
    /// accumulator is still cleared: rapier forces persist across steps,
    /// and the last follow-mode thrust must not keep pushing the ship.
    pub fn apply_vehicle_controls(
        &self,
        physics: &mut PhysicsWorld,
        ship: &Ship,
        camera: &Camera,
    ) {
        if camera.is_freecam() {
            physics.set_tick_force(ship.body(), Vec2::ZERO);
            return;
        }

        let angle = ship.angle(physics);
        let diff = normalize_angle(self.target_rotation - angle);
        // Proportional snap controller, not integrated torque
        physics.set_angular_velocity(ship.body(), diff * self.config.angular_gain);

        let force = if self.is_thrusting {
            let magnitude = self.effective_thrust_force();
            Vec2::new(angle.cos(), angle.sin()) * magnitude
        } else {
            Vec2::ZERO
        };
        physics.set_tick_force(ship.body(), force);
    }
}

/// Normalize an angle difference to (-PI, PI] by repeated ±2π adjustment,
/// so the ship always turns the short way around.
pub fn normalize_angle(mut diff: f32) -> f32 {
    use std::f32::consts::PI;
    while diff > PI {
        diff -= 2.0 * PI;
    }
    while diff <= -PI {
        diff += 2.0 * PI;
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::f32::consts::PI;

    fn test_setup() -> (PhysicsWorld, Ship, Camera, InputState) {
        let config = Config::default();
        let mut physics = PhysicsWorld::new(&config.world);
        let ship = Ship::spawn(&mut physics, &config.ship);
        let camera = Camera::new(800.0, 600.0, config.camera, config.zoom_area);
        let input = InputState::new(config.ship);
        (physics, ship, camera, input)
    }

    fn unlocked_camera(camera: &mut Camera) {
        camera.follow(Vec2::ZERO);
        assert!(camera.manual_controls_unlocked());
    }

    #[test]
    fn test_angle_wrap_takes_short_way() {
        // From 3.0 rad to -3.0 rad the short way is ~ +0.283, not -6.0
        let diff = normalize_angle(-3.0 - 3.0);
        assert!((diff - (2.0 * PI - 6.0)).abs() < 1e-5);
        assert!(diff > 0.0 && diff < 0.3);

        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI) - 0.0).abs() < 1e-5);
        assert!((normalize_angle(-2.5 * PI) + 0.5 * PI).abs() < 1e-4);
    }

    #[test]
    fn test_modifier_cancellation() {
        let config = Config::default();
        let mut input = InputState::new(config.ship);
        let base = config.ship.thrust_force;

        assert_eq!(input.effective_thrust_force(), base);

        input.set_slow_modifier(true);
        assert_eq!(input.effective_thrust_force(), base * config.ship.slow_multiplier);

        input.set_fast_modifier(true);
        // Both held: exact cancellation, not a product or a min/max
        assert_eq!(input.effective_thrust_force(), base);

        input.set_slow_modifier(false);
        assert_eq!(input.effective_thrust_force(), base * config.ship.fast_multiplier);
    }

    #[test]
    fn test_thrust_suppressed_outside_follow_mode() {
        let (_, _, mut camera, mut input) = test_setup();
        unlocked_camera(&mut camera);

        camera.set_focus(1, Vec2::new(100.0, 100.0));
        input.pointer_pressed(&camera);
        assert!(!input.is_thrusting);

        camera.reset_focus();
        camera.toggle_freecam();
        input.pointer_pressed(&camera);
        assert!(!input.is_thrusting);

        camera.toggle_freecam();
        input.pointer_pressed(&camera);
        assert!(input.is_thrusting);

        input.end_thrust();
        assert!(!input.is_thrusting);
    }

    #[test]
    fn test_freecam_applies_nothing() {
        let (mut physics, ship, mut camera, mut input) = test_setup();
        unlocked_camera(&mut camera);
        camera.toggle_freecam();

        input.is_thrusting = true;
        input.target_rotation = 2.0;
        input.apply_vehicle_controls(&mut physics, &ship, &camera);

        assert_eq!(physics.angular_velocity(ship.body()).unwrap(), 0.0);
        physics.step(1.0 / 60.0);
        assert_eq!(physics.linear_velocity(ship.body()).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_freecam_clears_pending_thrust_force() {
        let (mut physics, ship, mut camera, mut input) = test_setup();
        input.is_thrusting = true;
        input.target_rotation = ship.angle(&physics);
        // Follow-mode tick leaves a force on the body
        input.apply_vehicle_controls(&mut physics, &ship, &camera);

        unlocked_camera(&mut camera);
        camera.toggle_freecam();
        // The freecam tick must wipe it, not leave it accelerating
        input.apply_vehicle_controls(&mut physics, &ship, &camera);

        physics.step(1.0 / 60.0);
        assert_eq!(physics.linear_velocity(ship.body()).unwrap(), Vec2::ZERO);
    }

    #[test]
    fn test_controls_turn_toward_pointer() {
        let (mut physics, ship, camera, mut input) = test_setup();
        // Spawn heading is -PI/2; aim straight along +x
        input.target_rotation = 0.0;
        input.apply_vehicle_controls(&mut physics, &ship, &camera);

        let angvel = physics.angular_velocity(ship.body()).unwrap();
        let expected = normalize_angle(0.0 - ship.angle(&physics)) * ShipConfig::default().angular_gain;
        assert!((angvel - expected).abs() < 1e-4);
        // Short way from -PI/2 to 0 is counterclockwise-positive
        assert!(angvel > 0.0);
    }

    #[test]
    fn test_thrust_accelerates_along_facing() {
        let (mut physics, ship, camera, mut input) = test_setup();
        input.is_thrusting = true;
        // Aim where the ship already points so the angvel stays ~0
        input.target_rotation = ship.angle(&physics);

        for _ in 0..30 {
            input.apply_vehicle_controls(&mut physics, &ship, &camera);
            physics.step(1.0 / 60.0);
        }

        let vel = physics.linear_velocity(ship.body()).unwrap();
        let facing = Vec2::new(ship.angle(&physics).cos(), ship.angle(&physics).sin());
        assert!(vel.length() > 0.0);
        assert!(vel.normalize().dot(facing) > 0.99);
    }

    #[test]
    fn test_pointer_move_sets_target_rotation() {
        let (physics, ship, mut camera, mut input) = test_setup();
        unlocked_camera(&mut camera);
        for _ in 0..400 {
            camera.update();
        }
        // Pointer at screen center +x maps to world +x of the pivot (the
        // ship spawn), so the target angle is 0
        let center = Vec2::new(camera.viewport_width / 2.0, camera.viewport_height / 2.0);
        input.pointer_moved(center + Vec2::new(100.0, 0.0), &camera, ship.position(&physics));
        assert!(input.target_rotation.abs() < 1e-3);

        // Screen-down maps to world +y, angle PI/2
        input.pointer_moved(center + Vec2::new(0.0, 100.0), &camera, ship.position(&physics));
        assert!((input.target_rotation - PI / 2.0).abs() < 1e-3);
    }
}
