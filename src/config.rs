//! Load-time tuning constants.
//!
//! Every gameplay number lives here: camera damping and zoom limits, the
//! position-based zoom area, ship thrust and material properties, and the
//! world rectangle. Defaults are compiled in; a `stardrift.json` next to the
//! working directory can override any subset of them.

use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Camera follow/zoom tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Pivot smoothing factor per frame (0..1, higher = tighter)
    pub follow_damping: f32,
    /// Zoom smoothing factor per frame
    pub zoom_damping: f32,
    pub zoom_default: f32,
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Zoom change per scroll notch
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            follow_damping: 0.1,
            zoom_damping: 0.1,
            zoom_default: 1.0,
            zoom_min: 0.3,
            zoom_max: 2.0,
            zoom_step: 0.1,
        }
    }
}

/// Position-based auto-zoom region: zoom is tightest inside the rectangle
/// and relaxes to `outer_zoom` over `transition_distance` beyond it.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ZoomAreaConfig {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub inner_zoom: f32,
    pub outer_zoom: f32,
    pub transition_distance: f32,
}

impl Default for ZoomAreaConfig {
    fn default() -> Self {
        Self {
            min_x: -600.0,
            max_x: 600.0,
            min_y: -400.0,
            max_y: 400.0,
            inner_zoom: 1.0,
            outer_zoom: 0.4,
            transition_distance: 1500.0,
        }
    }
}

/// Ship thrust and material tuning.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Force applied along the facing vector while thrusting
    pub thrust_force: f32,
    /// Proportional gain turning angle error into angular velocity
    pub angular_gain: f32,
    /// Thrust fraction while only the slow modifier is held
    pub slow_multiplier: f32,
    /// Thrust fraction while only the fast modifier is held
    pub fast_multiplier: f32,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Drag standing in for Matter.js frictionAir
    pub linear_damping: f32,
    /// frictionAir damps spin too; without this, residual angular
    /// velocity from the snap controller would persist in freecam
    pub angular_damping: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub spawn_rotation: f32,
    /// Circumradius of the triangular hull
    pub hull_radius: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            thrust_force: 700.0,
            angular_gain: 12.0,
            slow_multiplier: 0.3,
            fast_multiplier: 2.0,
            density: 0.001,
            friction: 0.01,
            restitution: 0.3,
            linear_damping: 1.8,
            angular_damping: 1.8,
            spawn_x: 0.0,
            spawn_y: 0.0,
            spawn_rotation: -std::f32::consts::FRAC_PI_2,
            hull_radius: 15.0,
        }
    }
}

/// World rectangle and boundary wall geometry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub wall_restitution: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 12000.0,
            height: 8000.0,
            wall_thickness: 50.0,
            wall_restitution: 0.2,
        }
    }
}

impl WorldConfig {
    pub fn min_x(&self) -> f32 {
        -self.width / 2.0
    }

    pub fn max_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn min_y(&self) -> f32 {
        -self.height / 2.0
    }

    pub fn max_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// Top-level configuration aggregate.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub zoom_area: ZoomAreaConfig,
    pub ship: ShipConfig,
    pub world: WorldConfig,
}

impl Config {
    /// Load from a JSON file, falling back to defaults if the file is
    /// missing or malformed. Startup must not fail on bad tuning data.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded config");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "bad config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = Config::default();
        assert!(config.camera.zoom_min < config.camera.zoom_max);
        assert!(config.camera.zoom_default >= config.camera.zoom_min);
        assert!(config.camera.zoom_default <= config.camera.zoom_max);
        assert!(config.zoom_area.transition_distance > 0.0);
        assert!(config.world.min_x() < config.world.max_x());
    }

    #[test]
    fn test_partial_override() {
        let config: Config =
            serde_json::from_str(r#"{"camera": {"zoom_step": 0.25}}"#).unwrap();
        assert_eq!(config.camera.zoom_step, 0.25);
        // Untouched fields keep their defaults
        assert_eq!(config.camera.zoom_min, CameraConfig::default().zoom_min);
        assert_eq!(config.ship.slow_multiplier, 0.3);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Path::new("/nonexistent/stardrift.json"));
        assert_eq!(config.camera.zoom_default, 1.0);
    }
}
