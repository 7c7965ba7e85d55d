use crate::camera::Camera;
use crate::components::{Fill, Rotation, Shape, Translation};
use crate::config::ShipConfig;
use glam::Vec2;
use glow::*;
use std::mem;
use std::sync::Arc;

const VERTEX_SHADER_SRC: &str = r#"#version 330 core
layout (location = 0) in vec2 aPos;
layout (location = 1) in vec3 aColor;

uniform mat4 uProjection;

out vec3 vColor;

void main() {
    gl_Position = uProjection * vec4(aPos, 0.0, 1.0);
    vColor = aColor;
}
"#;

const FRAGMENT_SHADER_SRC: &str = r#"#version 330 core
in vec3 vColor;
out vec4 FragColor;

void main() {
    FragColor = vec4(vColor, 1.0);
}
"#;

const CIRCLE_SEGMENTS: usize = 24;
const SHIP_COLOR: [f32; 3] = [0.29, 0.66, 0.89];
const ENGINE_GLOW_COLOR: [f32; 3] = [0.97, 0.40, 0.40];

/// Flat-color renderer: every entity is a filled convex shape, batched
/// into one triangle buffer per frame and drawn through the camera's
/// projection.
pub struct Renderer {
    gl: Arc<glow::Context>,
    program: NativeProgram,
    vao: NativeVertexArray,
    vbo: NativeBuffer,
    projection_loc: NativeUniformLocation,
    /// Scratch vertex data, reused across frames
    vertices: Vec<f32>,
}

impl Renderer {
    pub fn new(gl: Arc<glow::Context>) -> Result<Self, String> {
        unsafe {
            let vertex_shader = gl
                .create_shader(VERTEX_SHADER)
                .map_err(|e| format!("Failed to create vertex shader: {}", e))?;
            gl.shader_source(vertex_shader, VERTEX_SHADER_SRC);
            gl.compile_shader(vertex_shader);
            if !gl.get_shader_compile_status(vertex_shader) {
                return Err(gl.get_shader_info_log(vertex_shader));
            }

            let fragment_shader = gl
                .create_shader(FRAGMENT_SHADER)
                .map_err(|e| format!("Failed to create fragment shader: {}", e))?;
            gl.shader_source(fragment_shader, FRAGMENT_SHADER_SRC);
            gl.compile_shader(fragment_shader);
            if !gl.get_shader_compile_status(fragment_shader) {
                return Err(gl.get_shader_info_log(fragment_shader));
            }

            let program = gl
                .create_program()
                .map_err(|e| format!("Failed to create program: {}", e))?;
            gl.attach_shader(program, vertex_shader);
            gl.attach_shader(program, fragment_shader);
            gl.link_program(program);
            if !gl.get_program_link_status(program) {
                return Err(gl.get_program_info_log(program));
            }

            gl.delete_shader(vertex_shader);
            gl.delete_shader(fragment_shader);

            let projection_loc = gl
                .get_uniform_location(program, "uProjection")
                .ok_or("Failed to get projection uniform location")?;

            let vao = gl
                .create_vertex_array()
                .map_err(|e| format!("Failed to create VAO: {}", e))?;
            gl.bind_vertex_array(Some(vao));

            let vbo = gl
                .create_buffer()
                .map_err(|e| format!("Failed to create VBO: {}", e))?;
            gl.bind_buffer(ARRAY_BUFFER, Some(vbo));

            // Interleaved: position (2 floats) + color (3 floats)
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, FLOAT, false, 20, 0);
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, FLOAT, false, 20, 8);

            gl.bind_vertex_array(None);

            // Deep space background
            gl.clear_color(0.0, 0.0, 0.12, 1.0);
            gl.enable(BLEND);
            gl.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);

            Ok(Self {
                gl,
                program,
                vao,
                vbo,
                projection_loc,
                vertices: Vec::new(),
            })
        }
    }

    pub fn resize(&self, width: i32, height: i32) {
        unsafe {
            self.gl.viewport(0, 0, width, height);
        }
    }

    /// Draw the whole scene: every shape entity, then the ship on top.
    pub fn render(
        &mut self,
        camera: &Camera,
        world: &hecs::World,
        ship_pos: Vec2,
        ship_angle: f32,
        engine_glow: bool,
        ship_config: &ShipConfig,
    ) -> Result<(), String> {
        self.vertices.clear();

        for (_, (translation, rotation, shape, fill)) in world
            .query::<(&Translation, &Rotation, &Shape, &Fill)>()
            .iter()
        {
            let color = [fill.0.x, fill.0.y, fill.0.z];
            match shape {
                Shape::Circle { radius } => {
                    self.push_circle(translation.0, *radius, color);
                }
                Shape::Rect { half_extents } => {
                    let he = *half_extents;
                    let corners = [
                        Vec2::new(-he.x, -he.y),
                        Vec2::new(he.x, -he.y),
                        Vec2::new(he.x, he.y),
                        Vec2::new(-he.x, he.y),
                    ];
                    self.push_fan(translation.0, rotation.0, &corners, color);
                }
                Shape::Polygon { vertices } => {
                    self.push_fan(translation.0, rotation.0, vertices, color);
                }
            }
        }

        // Engine glow sits behind the hull's aft edge
        if engine_glow {
            let aft = ship_pos
                - Vec2::new(ship_angle.cos(), ship_angle.sin()) * ship_config.hull_radius * 0.7;
            self.push_circle(aft, ship_config.hull_radius * 0.4, ENGINE_GLOW_COLOR);
        }
        let r = ship_config.hull_radius;
        let hull = [
            Vec2::new(r, 0.0),
            Vec2::new(-r / 2.0, -r * 0.866),
            Vec2::new(-r / 2.0, r * 0.866),
        ];
        self.push_fan(ship_pos, ship_angle, &hull, SHIP_COLOR);

        unsafe {
            self.gl.clear(COLOR_BUFFER_BIT);
            self.gl.use_program(Some(self.program));
            self.gl.bind_vertex_array(Some(self.vao));

            self.gl.bind_buffer(ARRAY_BUFFER, Some(self.vbo));
            self.gl
                .buffer_data_u8_slice(ARRAY_BUFFER, as_u8_slice(&self.vertices), DYNAMIC_DRAW);

            let projection = camera.projection_matrix();
            self.gl.uniform_matrix_4_f32_slice(
                Some(&self.projection_loc),
                false,
                projection.as_ref(),
            );

            self.gl
                .draw_arrays(TRIANGLES, 0, (self.vertices.len() / 5) as i32);
            self.gl.bind_vertex_array(None);
        }

        Ok(())
    }

    /// Triangle-fan a convex outline around its centroid vertex order.
    fn push_fan(&mut self, center: Vec2, angle: f32, outline: &[Vec2], color: [f32; 3]) {
        if outline.len() < 3 {
            return;
        }
        let (sin, cos) = angle.sin_cos();
        let transform = |p: Vec2| -> Vec2 {
            center + Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
        };
        let first = transform(outline[0]);
        for window in outline[1..].windows(2) {
            for point in [first, transform(window[0]), transform(window[1])] {
                self.vertices.extend_from_slice(&[
                    point.x, point.y, color[0], color[1], color[2],
                ]);
            }
        }
    }

    fn push_circle(&mut self, center: Vec2, radius: f32, color: [f32; 3]) {
        let outline: Vec<Vec2> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = (i as f32 / CIRCLE_SEGMENTS as f32) * std::f32::consts::TAU;
                Vec2::new(angle.cos() * radius, angle.sin() * radius)
            })
            .collect();
        self.push_fan(center, 0.0, &outline, color);
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.program);
            self.gl.delete_vertex_array(self.vao);
            self.gl.delete_buffer(self.vbo);
        }
    }
}

fn as_u8_slice<T>(data: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(data.as_ptr() as *const u8, data.len() * mem::size_of::<T>())
    }
}
