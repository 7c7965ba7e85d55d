//! Overlay UI rendering using egui.
//!
//! The overlay is a pure consumer of scene state: it reads the camera mode
//! and focus target to decide what to show, and feeds back only through
//! `UiActions` (start and reset-focus requests) handled in the main loop.

use crate::camera::CameraMode;
use crate::scene::Scene;

/// Actions requested by the UI this frame.
#[derive(Default)]
pub struct UiActions {
    pub start_clicked: bool,
    pub reset_focus: bool,
}

pub fn draw_overlay(ctx: &egui::Context, scene: &Scene) -> UiActions {
    let mut actions = UiActions::default();

    if scene.paused {
        draw_intro(ctx, &mut actions);
        return actions;
    }

    draw_instructions(ctx, scene);

    if let Some((title, blurb)) = scene.focused_poi() {
        draw_focus_tooltip(ctx, title, blurb, &mut actions);
    }

    if matches!(scene.camera.mode(), CameraMode::Freecam) {
        draw_freecam_banner(ctx);
    }

    actions
}

fn draw_intro(ctx: &egui::Context, actions: &mut UiActions) {
    egui::Area::new(egui::Id::new("intro"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Stardrift");
                ui.label("Steer the ship with your pointer.");
                ui.label("Hold the mouse button to thrust.");
                ui.add_space(12.0);
                if ui.button("Launch").clicked() {
                    actions.start_clicked = true;
                }
            });
        });
}

fn draw_instructions(ctx: &egui::Context, scene: &Scene) {
    egui::Area::new(egui::Id::new("instructions"))
        .anchor(egui::Align2::LEFT_TOP, [16.0, 16.0])
        .show(ctx, |ui| {
            ui.label("Point to steer, hold to thrust");
            ui.label("Ctrl: slow  Shift: fast");
            ui.label("Click a landmark to focus the camera");
            if scene.camera.manual_controls_unlocked() {
                ui.label("Scroll: zoom  Space: freecam");
            }
        });
}

fn draw_focus_tooltip(ctx: &egui::Context, title: &str, blurb: &str, actions: &mut UiActions) {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -24.0])
        .show(ctx, |ui| {
            ui.label(blurb);
            if ui.button("Back to ship").clicked() {
                actions.reset_focus = true;
            }
        });
}

fn draw_freecam_banner(ctx: &egui::Context) {
    egui::Area::new(egui::Id::new("freecam"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 16.0])
        .show(ctx, |ui| {
            ui.label("Freecam - drag to pan, Space to return");
        });
}
