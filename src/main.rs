#![allow(dead_code)]

mod app;
mod camera;
mod components;
mod config;
mod input;
mod physics;
mod renderer;
mod scene;
mod ship;
mod spawning;
mod ui;

use config::Config;
use glam::Vec2;
use renderer::Renderer;
use scene::Scene;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use app::WindowContext;
use tracing::info;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

/// Cap dt so a long frame (window drag, debugger pause) doesn't fling the
/// simulation.
const MAX_TICK_DT: f32 = 0.1;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let event_loop = EventLoop::new()?;
    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}

struct App {
    state: Option<AppState>,
}

struct AppState {
    // Window and GL
    ctx: WindowContext,

    // Rendering
    renderer: Renderer,

    // Simulation
    config: Config,
    scene: Scene,

    // Timing
    last_frame_time: Instant,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let ctx = WindowContext::create(event_loop);

        let config = Config::load(Path::new("stardrift.json"));
        let size = ctx.window.inner_size();
        let scene = Scene::new(size.width as f32, size.height as f32, config);
        let renderer = Renderer::new(Arc::clone(&ctx.gl)).expect("Failed to create renderer");
        info!("window and scene initialized");

        self.state = Some(AppState {
            ctx,
            renderer,
            config,
            scene,
            last_frame_time: Instant::now(),
        });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let state = match &mut self.state {
            Some(s) => s,
            None => return,
        };

        // Let egui handle the event first
        let egui_consumed = state.ctx.egui_glow.on_window_event(&state.ctx.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.ctx.resize_surface(size.width, size.height);
                state.renderer.resize(size.width as i32, size.height as i32);
                state.scene.camera.resize(size.width as f32, size.height as f32);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !egui_consumed.consumed && !event.repeat {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        state.handle_key(event_loop, key, event.state);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let pointer = Vec2::new(position.x as f32, position.y as f32);
                state.handle_pointer_moved(pointer);
            }
            WindowEvent::MouseInput { state: btn_state, button, .. } => {
                if button == MouseButton::Left {
                    match btn_state {
                        ElementState::Pressed => {
                            if !egui_consumed.consumed {
                                state.handle_pointer_pressed();
                            }
                        }
                        // Release always lands, even over egui, so thrust and
                        // drags can't get stuck on
                        ElementState::Released => {
                            state.scene.input.end_thrust();
                            state.scene.camera.end_drag();
                        }
                    }
                }
            }
            WindowEvent::CursorLeft { .. } => {
                state.scene.input.end_thrust();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if !egui_consumed.consumed {
                    let notches = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                    };
                    if notches != 0.0 {
                        state.scene.camera.zoom_by_steps(notches);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                state.update_and_render();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.ctx.window.request_redraw();
        }
    }
}

impl AppState {
    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode, key_state: ElementState) {
        let pressed = key_state == ElementState::Pressed;
        match key {
            KeyCode::Escape if pressed => event_loop.exit(),
            KeyCode::Space if pressed => {
                // The camera drops the toggle silently while manual controls
                // are locked; thrust ends either way
                self.scene.camera.toggle_freecam();
                self.scene.input.end_thrust();
            }
            KeyCode::ControlLeft | KeyCode::ControlRight => {
                self.scene.input.set_slow_modifier(pressed);
            }
            KeyCode::ShiftLeft | KeyCode::ShiftRight => {
                self.scene.input.set_fast_modifier(pressed);
            }
            _ => {}
        }
    }

    fn handle_pointer_moved(&mut self, pointer: Vec2) {
        let ship_pos = self.scene.ship.position(&self.scene.physics);
        self.scene
            .input
            .pointer_moved(pointer, &self.scene.camera, ship_pos);
        // No-op unless a freecam drag is active
        self.scene.camera.drag_to(pointer);
    }

    fn handle_pointer_pressed(&mut self) {
        let scene = &mut self.scene;
        if scene.paused {
            return;
        }

        if scene.camera.is_freecam() {
            scene.camera.begin_drag(scene.input.pointer_pos);
            return;
        }

        // A press on a landmark focuses it; a press anywhere else either
        // clears an active focus or starts thrusting
        let world_pos = scene.camera.screen_to_world(scene.input.pointer_pos);
        if let Some((id, pos)) = scene.poi_at(world_pos) {
            scene.camera.set_focus(id, pos);
        } else if scene.camera.focus_target().is_some() {
            scene.camera.reset_focus();
        } else {
            scene.input.pointer_pressed(&scene.camera);
        }
    }

    fn update_and_render(&mut self) {
        let current_time = Instant::now();
        let raw_dt = (current_time - self.last_frame_time).as_secs_f32();
        self.last_frame_time = current_time;
        let dt = raw_dt.min(MAX_TICK_DT);

        self.scene.tick(dt);

        let scene = &self.scene;
        let mut actions = ui::UiActions::default();
        self.ctx.egui_glow.run(&self.ctx.window, |ctx| {
            actions = ui::draw_overlay(ctx, scene);
        });

        if actions.start_clicked {
            self.scene.paused = false;
            info!("intro dismissed, simulation running");
        }
        if actions.reset_focus {
            self.scene.camera.reset_focus();
        }

        let ship_pos = self.scene.ship.position(&self.scene.physics);
        let ship_angle = self.scene.ship.angle(&self.scene.physics);
        if let Err(e) = self.renderer.render(
            &self.scene.camera,
            &self.scene.world,
            ship_pos,
            ship_angle,
            self.scene.ship.engine_glow,
            &self.config.ship,
        ) {
            tracing::error!(error = %e, "render failed");
        }

        self.ctx.egui_glow.paint(&self.ctx.window);

        if let Err(e) = self.ctx.swap_buffers() {
            tracing::error!(error = %e, "swap_buffers failed");
        }
    }
}
