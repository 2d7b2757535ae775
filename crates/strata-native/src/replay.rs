// replay.rs
//
// Draws a frame's `DrawCommand`s with macroquad. The engine uses glam 0.30,
// macroquad re-exports an older glam, so values cross over as plain floats.

use macroquad::camera::{set_camera, set_default_camera, Camera3D as MqCamera, Projection as MqProjection};
use macroquad::color::Color as MqColor;
use macroquad::input::show_mouse;
use macroquad::math::{vec3, Vec3 as MqVec3};
use macroquad::models::{draw_cube, draw_cube_wires, draw_grid, draw_line_3d, draw_sphere, draw_sphere_wires};
use macroquad::shapes::{draw_rectangle, draw_rectangle_lines};
use macroquad::text::{draw_text, measure_text};
use macroquad::time::get_fps;
use macroquad::window::clear_background;
use strata_engine::glam::{Mat4, Vec3};
use strata_engine::{Camera3D, Color, DrawCommand, Projection};

fn mq_color(c: Color) -> MqColor {
    MqColor::from_rgba(c.r, c.g, c.b, c.a)
}

fn mq_vec3(v: Vec3) -> MqVec3 {
    vec3(v.x, v.y, v.z)
}

fn mq_camera(camera: &Camera3D) -> MqCamera {
    MqCamera {
        position: mq_vec3(camera.position),
        target: mq_vec3(camera.target),
        up: mq_vec3(camera.up),
        fovy: camera.fovy.to_radians(),
        projection: match camera.projection {
            Projection::Perspective => MqProjection::Perspective,
            Projection::Orthographic => MqProjection::Orthographics,
        },
        ..Default::default()
    }
}

/// Replays draw lists, keeping the model matrix stack and cursor state
/// between commands.
pub struct Replayer {
    matrices: Vec<Mat4>,
    cursor_visible: bool,
}

impl Replayer {
    pub fn new() -> Self {
        Self {
            matrices: Vec::new(),
            cursor_visible: true,
        }
    }

    fn model(&self) -> Mat4 {
        self.matrices.last().copied().unwrap_or(Mat4::IDENTITY)
    }

    pub fn replay(&mut self, commands: &[DrawCommand]) {
        self.matrices.clear();
        for command in commands {
            self.draw(command);
        }
        // A frame that ends inside 3D mode would leave the camera on for the
        // next frame's 2D pass.
        set_default_camera();
    }

    fn draw(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Clear(color) => clear_background(mq_color(*color)),
            DrawCommand::BeginMode3D(camera) => set_camera(&mq_camera(camera)),
            DrawCommand::EndMode3D => {
                self.matrices.clear();
                set_default_camera();
            }
            DrawCommand::PushMatrix(matrix) => {
                let top = self.model() * *matrix;
                self.matrices.push(top);
            }
            DrawCommand::PopMatrix => {
                self.matrices.pop();
            }
            DrawCommand::Cube { position, size, color } => {
                // Rotation of the model matrix is not applied to solid cubes.
                let (scale, _, _) = self.model().to_scale_rotation_translation();
                let center = self.model().transform_point3(*position);
                draw_cube(mq_vec3(center), mq_vec3(*size * scale), None, mq_color(*color));
            }
            DrawCommand::CubeWires { position, size, color } => {
                self.cube_wires(*position, *size, *color);
            }
            DrawCommand::Sphere { center, radius, color } => {
                let (center, radius) = self.transform_sphere(*center, *radius);
                draw_sphere(mq_vec3(center), radius, None, mq_color(*color));
            }
            DrawCommand::SphereWires { center, radius, color } => {
                let (center, radius) = self.transform_sphere(*center, *radius);
                draw_sphere_wires(mq_vec3(center), radius, None, mq_color(*color));
            }
            DrawCommand::Grid { slices, spacing } => {
                draw_grid(*slices, *spacing, mq_color(Color::DARKGRAY), mq_color(Color::GRAY));
            }
            DrawCommand::Line3D { start, end, color } => {
                let m = self.model();
                draw_line_3d(
                    mq_vec3(m.transform_point3(*start)),
                    mq_vec3(m.transform_point3(*end)),
                    mq_color(*color),
                );
            }
            DrawCommand::Text { text, position, size, color } => {
                let dims = measure_text(text, None, *size as u16, 1.0);
                draw_text(text, position.x, position.y + dims.offset_y, *size, mq_color(*color));
            }
            DrawCommand::Rect { position, size, color } => {
                draw_rectangle(position.x, position.y, size.x, size.y, mq_color(*color));
            }
            DrawCommand::RectLines { position, size, thickness, color } => {
                draw_rectangle_lines(position.x, position.y, size.x, size.y, *thickness, mq_color(*color));
            }
            DrawCommand::Fps { position } => {
                let text = format!("{} FPS", get_fps());
                let dims = measure_text(&text, None, 20, 1.0);
                draw_text(&text, position.x, position.y + dims.offset_y, 20.0, mq_color(Color::LIME));
            }
            DrawCommand::ShowCursor(visible) => {
                if *visible != self.cursor_visible {
                    show_mouse(*visible);
                    self.cursor_visible = *visible;
                }
            }
        }
    }

    fn transform_sphere(&self, center: Vec3, radius: f32) -> (Vec3, f32) {
        let m = self.model();
        let (scale, _, _) = m.to_scale_rotation_translation();
        (m.transform_point3(center), radius * scale.max_element())
    }

    /// Twelve edges of the box, each corner through the model matrix.
    fn cube_wires(&self, position: Vec3, size: Vec3, color: Color) {
        let m = self.model();
        if m == Mat4::IDENTITY {
            draw_cube_wires(mq_vec3(position), mq_vec3(size), mq_color(color));
            return;
        }
        let half = size * 0.5;
        let corner = |i: usize| {
            let sign = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            mq_vec3(m.transform_point3(position + half * sign))
        };
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    draw_line_3d(corner(i), corner(i | bit), mq_color(color));
                }
            }
        }
    }
}

impl Default for Replayer {
    fn default() -> Self {
        Self::new()
    }
}
