//! Scene placement: asteroids, points of interest, and the playground.
//!
//! This is the placement collaborator around the core loop. It only ever
//! supplies spawn coordinates and collision shapes to the physics world at
//! setup time; nothing here runs per tick.

use crate::components::{BodyRef, Fill, Poi, Rotation, Shape, Translation};
use crate::config::Config;
use crate::physics::{Material, PhysicsWorld};
use glam::{Vec2, Vec3};
use hecs::World;
use rand::Rng;
use tracing::{info, warn};

const ASTEROID_COUNT: usize = 30;
const ASTEROID_MIN_SIZE: f32 = 20.0;
const ASTEROID_MAX_SIZE: f32 = 70.0;
const ASTEROID_MIN_SEGMENTS: usize = 5;
const ASTEROID_MAX_SEGMENTS: usize = 10;
/// Keep asteroids away from the ship spawn
const ASTEROID_SAFE_RADIUS: f32 = 400.0;

const ASTEROID_COLOR: Vec3 = Vec3::new(0.53, 0.53, 0.53);
const WALL_COLOR: Vec3 = Vec3::new(0.25, 0.42, 0.78);
const BALL_COLOR: Vec3 = Vec3::new(0.85, 0.25, 0.25);
const POI_COLOR: Vec3 = Vec3::new(0.0, 0.8, 0.8);
const BOUNDARY_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Definition of one point of interest.
pub struct PoiDef {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: &'static str,
    pub blurb: &'static str,
}

pub const POI_DEFS: &[PoiDef] = &[
    PoiDef {
        x: 1000.0,
        y: 1000.0,
        width: 100.0,
        height: 100.0,
        title: "Research Station Alpha",
        blurb: "A research facility studying the stellar phenomena in this sector.",
    },
    PoiDef {
        x: -1200.0,
        y: 800.0,
        width: 150.0,
        height: 80.0,
        title: "Mining Outpost Beta",
        blurb: "An asteroid mining rig supplying the nearby colonies.",
    },
    PoiDef {
        x: 1800.0,
        y: -900.0,
        width: 120.0,
        height: 120.0,
        title: "Relay Gamma",
        blurb: "A long-range communications relay, still blinking.",
    },
];

/// Populate the scene. Entities get render components; anything solid also
/// registers a collision shape with the physics world.
pub fn spawn_world(world: &mut World, physics: &mut PhysicsWorld, config: &Config) {
    let mut rng = rand::thread_rng();
    spawn_pois(world, physics);
    spawn_asteroids(world, physics, &mut rng);
    spawn_playground(world, physics, Vec2::new(-1400.0, 580.0));
    spawn_boundary_frame(world, config);
    info!(entities = world.len(), "scene populated");
}

fn spawn_pois(world: &mut World, physics: &mut PhysicsWorld) {
    for (index, def) in POI_DEFS.iter().enumerate() {
        let center = Vec2::new(def.x, def.y);
        let half_extents = Vec2::new(def.width / 2.0, def.height / 2.0);
        physics.add_static_cuboid(center, half_extents, Material::default());
        world.spawn((
            Translation(center),
            Rotation(0.0),
            Shape::Rect { half_extents },
            Fill(POI_COLOR),
            Poi {
                id: index as u32,
                title: def.title,
                blurb: def.blurb,
                half_extents,
            },
        ));
    }
}

/// Random jagged static polygons, kept clear of the ship spawn and the
/// POI rectangles.
fn spawn_asteroids(world: &mut World, physics: &mut PhysicsWorld, rng: &mut impl Rng) {
    let bounds = physics.bounds();
    let material = Material {
        density: 0.002,
        friction: 0.05,
        restitution: 0.6,
    };

    let mut spawned = 0;
    while spawned < ASTEROID_COUNT {
        let pos = Vec2::new(
            rng.gen_range(bounds.min_x..bounds.max_x),
            rng.gen_range(bounds.min_y..bounds.max_y),
        );
        if pos.length() < ASTEROID_SAFE_RADIUS || overlaps_poi(pos) {
            continue;
        }

        let size = rng.gen_range(ASTEROID_MIN_SIZE..ASTEROID_MAX_SIZE);
        let segments = rng.gen_range(ASTEROID_MIN_SEGMENTS..=ASTEROID_MAX_SEGMENTS);
        let vertices = jagged_polygon(size, segments, rng);

        // A degenerate hull is the placement layer's problem, not the
        // core's: skip the asteroid and keep going.
        match physics.add_static_polygon(pos, &vertices, material) {
            Some(_) => {
                world.spawn((
                    Translation(pos),
                    Rotation(0.0),
                    Shape::Polygon { vertices },
                    Fill(ASTEROID_COLOR),
                ));
                spawned += 1;
            }
            None => {
                warn!(?pos, segments, "skipping asteroid with degenerate hull");
            }
        }
    }
}

fn overlaps_poi(pos: Vec2) -> bool {
    POI_DEFS.iter().any(|def| {
        (pos.x - def.x).abs() < def.width && (pos.y - def.y).abs() < def.height
    })
}

fn jagged_polygon(size: f32, segments: usize, rng: &mut impl Rng) -> Vec<Vec2> {
    (0..segments)
        .map(|i| {
            let angle = (i as f32 / segments as f32) * std::f32::consts::TAU;
            let radius = size * rng.gen_range(0.7..1.0);
            Vec2::new(angle.cos() * radius, angle.sin() * radius)
        })
        .collect()
}

/// A bowling lane: two static walls, one heavy ball, a triangular
/// formation of pins. Exercises every solid-shape creation path.
fn spawn_playground(world: &mut World, physics: &mut PhysicsWorld, origin: Vec2) {
    const WALL_WIDTH: f32 = 1000.0;
    const WALL_HEIGHT: f32 = 10.0;
    const LANE_WIDTH: f32 = 400.0;
    const BALL_RADIUS: f32 = 75.0;
    const PIN_RADIUS: f32 = 15.0;
    const PIN_ROWS: usize = 6;
    const PIN_SPACING: f32 = 75.0;

    let wall_material = Material {
        restitution: 0.8,
        ..Material::default()
    };

    // Lane boundaries
    for wall_y in [origin.y, origin.y + LANE_WIDTH + 2.0 * WALL_HEIGHT] {
        let center = Vec2::new(origin.x, wall_y);
        let half_extents = Vec2::new(WALL_WIDTH / 2.0, WALL_HEIGHT / 2.0);
        physics.add_static_cuboid(center, half_extents, wall_material);
        world.spawn((
            Translation(center),
            Rotation(0.0),
            Shape::Rect { half_extents },
            Fill(WALL_COLOR),
        ));
    }

    // The ball waits at the right end of the lane
    let ball_pos = Vec2::new(
        origin.x + WALL_WIDTH / 2.0 - BALL_RADIUS,
        origin.y + LANE_WIDTH / 2.0,
    );
    spawn_ball(world, physics, ball_pos, BALL_RADIUS, 0.004);

    // Pin triangle at the left end
    for row in (1..=PIN_ROWS).rev() {
        let row_x_offset = (PIN_ROWS - row) as f32 * PIN_SPACING;
        for pin in 1..=row {
            let pin_pos = Vec2::new(
                origin.x - WALL_WIDTH / 2.0 + row_x_offset + PIN_RADIUS,
                origin.y + (pin as f32 * LANE_WIDTH) / (row as f32 + 1.0),
            );
            spawn_ball(world, physics, pin_pos, PIN_RADIUS, 0.001);
        }
    }
}

fn spawn_ball(world: &mut World, physics: &mut PhysicsWorld, pos: Vec2, radius: f32, density: f32) {
    let material = Material {
        density,
        friction: 0.05,
        restitution: 0.7,
    };
    let handle = physics.add_dynamic_ball(pos, radius, material, 0.5);
    world.spawn((
        Translation(pos),
        Rotation(0.0),
        Shape::Circle { radius },
        Fill(BALL_COLOR),
        BodyRef(handle),
    ));
}

/// Render-only frame marking the world limits.
fn spawn_boundary_frame(world: &mut World, config: &Config) {
    const LINE_HALF_WIDTH: f32 = 4.0;
    let w = &config.world;
    let half_w = w.width / 2.0;
    let half_h = w.height / 2.0;

    let edges = [
        (Vec2::new(0.0, w.min_y()), Vec2::new(half_w, LINE_HALF_WIDTH)),
        (Vec2::new(0.0, w.max_y()), Vec2::new(half_w, LINE_HALF_WIDTH)),
        (Vec2::new(w.min_x(), 0.0), Vec2::new(LINE_HALF_WIDTH, half_h)),
        (Vec2::new(w.max_x(), 0.0), Vec2::new(LINE_HALF_WIDTH, half_h)),
    ];
    for (center, half_extents) in edges {
        world.spawn((
            Translation(center),
            Rotation(0.0),
            Shape::Rect { half_extents },
            Fill(BOUNDARY_COLOR),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_world_populates_scene() {
        let config = Config::default();
        let mut world = World::new();
        let mut physics = PhysicsWorld::new(&config.world);
        spawn_world(&mut world, &mut physics, &config);

        let poi_count = world.query::<&Poi>().iter().count();
        assert_eq!(poi_count, POI_DEFS.len());

        let asteroid_count = world
            .query::<&Shape>()
            .iter()
            .filter(|(_, s)| matches!(s, Shape::Polygon { .. }))
            .count();
        assert_eq!(asteroid_count, ASTEROID_COUNT);

        // Bowling ball + pins are dynamic bodies
        let dynamic_count = world.query::<&BodyRef>().iter().count();
        assert_eq!(dynamic_count, 1 + (1..=6).sum::<usize>());
    }

    #[test]
    fn test_asteroids_avoid_ship_spawn() {
        let config = Config::default();
        let mut world = World::new();
        let mut physics = PhysicsWorld::new(&config.world);
        let mut rng = rand::thread_rng();
        spawn_asteroids(&mut world, &mut physics, &mut rng);

        for (_, (translation, shape)) in world.query::<(&Translation, &Shape)>().iter() {
            if matches!(shape, Shape::Polygon { .. }) {
                assert!(translation.0.length() >= ASTEROID_SAFE_RADIUS);
            }
        }
    }
}
