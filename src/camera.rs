//! Camera control: follow smoothing, zoom, focus targets, and freecam.
//!
//! The camera owns a `pivot` (the world point centered on screen) and a
//! `zoom` scale, each of which smooths toward a target value every frame.
//! Exactly one of three modes is active at a time:
//!
//! - `Follow`: the pivot tracks the ship (default).
//! - `Focus`: the pivot tracks a point of interest instead.
//! - `Freecam`: the pivot is driven by drag events; automatic updates stop.
//!
//! Manual zoom and freecam are gated behind `manual_controls_unlocked`,
//! which flips permanently the first time the ship enters the inner zoom
//! rectangle. Until then, zoom is computed from the ship's distance to that
//! rectangle.

use crate::config::{CameraConfig, ZoomAreaConfig};
use glam::{Mat4, Vec2};
use tracing::debug;

/// A focused point of interest. POIs are static, so the position is cached
/// when focus is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusTarget {
    pub id: u32,
    pub position: Vec2,
}

/// Camera interaction mode. Exactly one is active; the variants are
/// mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraMode {
    /// Track the ship (default).
    Follow,
    /// Track a point of interest instead of the ship.
    Focus(FocusTarget),
    /// User pans/zooms freely; automatic pivot updates are suppressed.
    Freecam,
}

pub struct Camera {
    pub viewport_width: f32,
    pub viewport_height: f32,
    pivot: Vec2,
    target_pivot: Vec2,
    zoom: f32,
    target_zoom: f32,
    mode: CameraMode,
    /// Set permanently the first time the ship enters the zoom area.
    manual_controls_unlocked: bool,
    /// Ship position cached every `follow()`; used when exiting freecam
    /// and for the position-based zoom.
    last_vehicle_pos: Vec2,
    // Freecam drag state
    dragging: bool,
    drag_start_pointer: Vec2,
    drag_start_pivot: Vec2,
    config: CameraConfig,
    zoom_area: ZoomAreaConfig,
}

impl Camera {
    pub fn new(
        viewport_width: f32,
        viewport_height: f32,
        config: CameraConfig,
        zoom_area: ZoomAreaConfig,
    ) -> Self {
        Self {
            viewport_width,
            viewport_height,
            pivot: Vec2::ZERO,
            target_pivot: Vec2::ZERO,
            zoom: config.zoom_default,
            target_zoom: config.zoom_default,
            mode: CameraMode::Follow,
            manual_controls_unlocked: false,
            last_vehicle_pos: Vec2::ZERO,
            dragging: false,
            drag_start_pointer: Vec2::ZERO,
            drag_start_pivot: Vec2::ZERO,
            config,
            zoom_area,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn target_zoom(&self) -> f32 {
        self.target_zoom
    }

    pub fn target_pivot(&self) -> Vec2 {
        self.target_pivot
    }

    pub fn manual_controls_unlocked(&self) -> bool {
        self.manual_controls_unlocked
    }

    pub fn is_freecam(&self) -> bool {
        matches!(self.mode, CameraMode::Freecam)
    }

    /// Read-only query for UI collaborators: is this POI the focus target?
    pub fn is_focused_on(&self, id: u32) -> bool {
        matches!(self.mode, CameraMode::Focus(target) if target.id == id)
    }

    pub fn focus_target(&self) -> Option<FocusTarget> {
        match self.mode {
            CameraMode::Focus(target) => Some(target),
            _ => None,
        }
    }

    /// Lock the camera onto a point of interest. Ignored in freecam mode;
    /// freecam keeps control until the user toggles out of it.
    pub fn set_focus(&mut self, id: u32, position: Vec2) {
        if self.is_freecam() {
            return;
        }
        debug!(poi = id, "camera focus set");
        self.mode = CameraMode::Focus(FocusTarget { id, position });
    }

    /// Return to following the ship.
    pub fn reset_focus(&mut self) {
        if matches!(self.mode, CameraMode::Focus(_)) {
            debug!("camera focus reset");
            self.mode = CameraMode::Follow;
        }
    }

    /// Flip freecam mode on/off. Silently dropped until manual controls are
    /// unlocked. Exiting re-centers on the ship's last known position rather
    /// than wherever freecam was left.
    pub fn toggle_freecam(&mut self) -> bool {
        if !self.manual_controls_unlocked {
            return false;
        }
        if self.is_freecam() {
            self.mode = CameraMode::Follow;
            self.dragging = false;
            self.target_pivot = self.last_vehicle_pos;
            debug!("freecam off");
        } else {
            self.mode = CameraMode::Freecam;
            debug!("freecam on");
        }
        true
    }

    /// Per-tick target computation. Always caches the ship position; while
    /// manual controls are locked, drives the zoom from the ship's distance
    /// to the zoom area; in freecam the pivot target is left alone.
    pub fn follow(&mut self, vehicle_pos: Vec2) {
        self.last_vehicle_pos = vehicle_pos;

        if !self.manual_controls_unlocked {
            let (zoom, inside) = self.position_based_zoom(vehicle_pos);
            self.set_target_zoom(zoom);
            if inside {
                self.manual_controls_unlocked = true;
                debug!("manual camera controls unlocked");
            }
        }

        if self.is_freecam() {
            return;
        }

        self.target_pivot = match self.mode {
            CameraMode::Focus(target) => target.position,
            _ => vehicle_pos,
        };
    }

    /// Zoom for a ship position under the position-based policy, plus
    /// whether the position is fully inside the zoom area.
    fn position_based_zoom(&self, pos: Vec2) -> (f32, bool) {
        let area = &self.zoom_area;
        if pos.x >= area.min_x && pos.x <= area.max_x && pos.y >= area.min_y && pos.y <= area.max_y
        {
            return (area.inner_zoom, true);
        }

        let dist_x = if pos.x < area.min_x {
            area.min_x - pos.x
        } else if pos.x > area.max_x {
            pos.x - area.max_x
        } else {
            0.0
        };
        let dist_y = if pos.y < area.min_y {
            area.min_y - pos.y
        } else if pos.y > area.max_y {
            pos.y - area.max_y
        } else {
            0.0
        };

        // The larger axis distance gives a smooth transition around corners
        let distance = dist_x.max(dist_y);
        let t = (distance / area.transition_distance).min(1.0);
        (area.inner_zoom - (area.inner_zoom - area.outer_zoom) * t, false)
    }

    /// Advance the smoothed pivot and zoom one frame toward their targets.
    pub fn update(&mut self) {
        self.pivot = self.pivot.lerp(self.target_pivot, self.config.follow_damping);
        self.zoom = lerp(self.zoom, self.target_zoom, self.config.zoom_damping);
    }

    /// Manual wheel zoom: one step per notch, positive = zoom in. Ignored
    /// entirely while manual controls are locked.
    pub fn zoom_by_steps(&mut self, notches: f32) {
        if !self.manual_controls_unlocked {
            return;
        }
        let direction = if notches > 0.0 { 1.0 } else { -1.0 };
        self.set_target_zoom(self.target_zoom + direction * self.config.zoom_step);
    }

    fn set_target_zoom(&mut self, value: f32) {
        self.target_zoom = value.clamp(self.config.zoom_min, self.config.zoom_max);
    }

    /// Begin a freecam drag from a screen-space pointer position.
    pub fn begin_drag(&mut self, pointer: Vec2) {
        if !self.is_freecam() || !self.manual_controls_unlocked {
            return;
        }
        self.dragging = true;
        self.drag_start_pointer = pointer;
        self.drag_start_pivot = self.pivot;
    }

    /// Continue a freecam drag: 1:1 screen-space panning regardless of zoom.
    pub fn drag_to(&mut self, pointer: Vec2) {
        if !self.is_freecam() || !self.dragging {
            return;
        }
        self.target_pivot = self.drag_start_pivot - (pointer - self.drag_start_pointer) / self.zoom;
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Inverse-map a screen position through the current pivot and zoom.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let screen_size = Vec2::new(self.viewport_width, self.viewport_height);
        screen / self.zoom + self.pivot - screen_size / self.zoom / 2.0
    }

    /// Orthographic projection centering the pivot on screen. World Y grows
    /// downward to match the pointer mapping, so top/bottom are flipped.
    pub fn projection_matrix(&self) -> Mat4 {
        let half_width = self.viewport_width / (2.0 * self.zoom);
        let half_height = self.viewport_height / (2.0 * self.zoom);

        Mat4::orthographic_rh(
            self.pivot.x - half_width,
            self.pivot.x + half_width,
            self.pivot.y + half_height,
            self.pivot.y - half_height,
            -1.0,
            1.0,
        )
    }
}

fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start * (1.0 - t) + end * t
}
