use glam::{Vec2, Vec3};
use rapier2d::prelude::RigidBodyHandle;

/// World-space position component.
#[derive(Debug, Clone, Copy)]
pub struct Translation(pub Vec2);

/// Orientation in radians.
#[derive(Debug, Clone, Copy)]
pub struct Rotation(pub f32);

/// Renderable outline, centered on the entity's translation.
#[derive(Debug, Clone)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
    Polygon { vertices: Vec<Vec2> },
}

/// Flat fill color.
#[derive(Debug, Clone, Copy)]
pub struct Fill(pub Vec3);

/// Link to the entity's rigid body; present on anything the physics world
/// moves, so the scene can sync translation/rotation after each step.
#[derive(Debug, Clone, Copy)]
pub struct BodyRef(pub RigidBodyHandle);

/// Point of interest: a static landmark the camera can focus on.
#[derive(Debug, Clone)]
pub struct Poi {
    pub id: u32,
    pub title: &'static str,
    pub blurb: &'static str,
    pub half_extents: Vec2,
}

impl Poi {
    /// Pointer hit test in world space.
    pub fn contains(&self, center: Vec2, point: Vec2) -> bool {
        (point.x - center.x).abs() <= self.half_extents.x
            && (point.y - center.y).abs() <= self.half_extents.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poi_hit_test() {
        let poi = Poi {
            id: 0,
            title: "t",
            blurb: "b",
            half_extents: Vec2::new(50.0, 25.0),
        };
        let center = Vec2::new(100.0, 100.0);
        assert!(poi.contains(center, Vec2::new(100.0, 100.0)));
        assert!(poi.contains(center, Vec2::new(149.0, 124.0)));
        assert!(!poi.contains(center, Vec2::new(151.0, 100.0)));
        assert!(!poi.contains(center, Vec2::new(100.0, 126.0)));
    }
}
