//! The control loop: owns the ship and ticks every subsystem in order.
//!
//! Tick order is fixed and load-bearing: physics advances first, input acts
//! on the fresh state, the camera observes the post-physics ship position
//! before smoothing, and the bounds guard runs last so nothing downstream
//! ever sees an out-of-bounds ship.

use crate::camera::Camera;
use crate::components::{BodyRef, Poi, Rotation, Translation};
use crate::config::Config;
use crate::input::InputState;
use crate::physics::PhysicsWorld;
use crate::ship::Ship;
use crate::spawning;
use glam::Vec2;
use hecs::World;
use tracing::info;

pub struct Scene {
    pub physics: PhysicsWorld,
    pub ship: Ship,
    pub camera: Camera,
    pub input: InputState,
    pub world: World,
    /// Short-circuits the whole tick while the intro overlay is up.
    pub paused: bool,
}

impl Scene {
    pub fn new(viewport_width: f32, viewport_height: f32, config: Config) -> Self {
        let mut physics = PhysicsWorld::new(&config.world);
        let ship = Ship::spawn(&mut physics, &config.ship);
        let camera = Camera::new(viewport_width, viewport_height, config.camera, config.zoom_area);
        let input = InputState::new(config.ship);

        let mut world = World::new();
        spawning::spawn_world(&mut world, &mut physics, &config);
        info!("scene ready");

        Self {
            physics,
            ship,
            camera,
            input,
            world,
            paused: true,
        }
    }

    /// One frame of simulation, in the fixed order described above.
    pub fn tick(&mut self, dt: f32) {
        if self.paused {
            return;
        }

        self.physics.step(dt);
        self.input
            .apply_vehicle_controls(&mut self.physics, &self.ship, &self.camera);
        self.camera.follow(self.ship.position(&self.physics));
        self.camera.update();
        self.physics.keep_in_bounds(self.ship.body());

        self.ship.engine_glow = self.input.is_thrusting;
        self.sync_bodies();
    }

    /// Copy dynamic body transforms back into the render components.
    fn sync_bodies(&mut self) {
        for (_, (translation, rotation, body)) in self
            .world
            .query_mut::<(&mut Translation, &mut Rotation, &BodyRef)>()
        {
            if let Some(pos) = self.physics.position(body.0) {
                translation.0 = pos;
            }
            if let Some(angle) = self.physics.rotation(body.0) {
                rotation.0 = angle;
            }
        }
    }

    /// Topmost POI under a world-space point, if any.
    pub fn poi_at(&self, point: Vec2) -> Option<(u32, Vec2)> {
        self.world
            .query::<(&Poi, &Translation)>()
            .iter()
            .find(|(_, (poi, translation))| poi.contains(translation.0, point))
            .map(|(_, (poi, translation))| (poi.id, translation.0))
    }

    /// Title and blurb of the currently focused POI, for the tooltip.
    pub fn focused_poi(&self) -> Option<(&'static str, &'static str)> {
        let target = self.camera.focus_target()?;
        self.world
            .query::<&Poi>()
            .iter()
            .find(|(_, poi)| poi.id == target.id)
            .map(|(_, poi)| (poi.title, poi.blurb))
    }
}
