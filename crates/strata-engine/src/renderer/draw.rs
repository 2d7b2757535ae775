// renderer/draw.rs
//
// Frame draw list. Systems push commands during the render phases; the native
// shell replays them in order against the real graphics backend. Nothing here
// touches a GPU, so tests can inspect exactly what a frame would draw.

use glam::{Mat4, Vec2, Vec3};

use super::camera::Camera3D;
use super::color::Color;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole framebuffer.
    Clear(Color),
    /// Start drawing in world space through `camera`.
    BeginMode3D(Camera3D),
    EndMode3D,
    /// Multiply the model matrix stack by `matrix` (3D mode only).
    PushMatrix(Mat4),
    PopMatrix,
    Cube { position: Vec3, size: Vec3, color: Color },
    CubeWires { position: Vec3, size: Vec3, color: Color },
    Sphere { center: Vec3, radius: f32, color: Color },
    SphereWires { center: Vec3, radius: f32, color: Color },
    /// Ground grid centred on the origin: `slices` cells of `spacing` per side.
    Grid { slices: u32, spacing: f32 },
    Line3D { start: Vec3, end: Vec3, color: Color },
    /// Screen-space text; `position` is the top-left corner in pixels.
    Text { text: String, position: Vec2, size: f32, color: Color },
    Rect { position: Vec2, size: Vec2, color: Color },
    RectLines { position: Vec2, size: Vec2, thickness: f32, color: Color },
    /// Frames-per-second counter at `position`.
    Fps { position: Vec2 },
    ShowCursor(bool),
}

impl DrawCommand {
    /// True for commands that only make sense between `BeginMode3D` and `EndMode3D`.
    pub fn is_3d(&self) -> bool {
        matches!(
            self,
            DrawCommand::PushMatrix(_)
                | DrawCommand::PopMatrix
                | DrawCommand::Cube { .. }
                | DrawCommand::CubeWires { .. }
                | DrawCommand::Sphere { .. }
                | DrawCommand::SphereWires { .. }
                | DrawCommand::Grid { .. }
                | DrawCommand::Line3D { .. }
        )
    }
}

/// Structural problems found by `DrawList::validate`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DrawListError {
    #[error("command {0}: BeginMode3D while already in 3D mode")]
    NestedMode3D(usize),
    #[error("command {0}: EndMode3D outside 3D mode")]
    UnmatchedEndMode3D(usize),
    #[error("command {0}: 3D command outside 3D mode")]
    OutsideMode3D(usize),
    #[error("command {0}: PopMatrix with an empty matrix stack")]
    UnmatchedPopMatrix(usize),
    #[error("{0} matrix push(es) left open at EndMode3D or end of frame")]
    UnbalancedMatrix(usize),
    #[error("3D mode left open at end of frame")]
    UnclosedMode3D,
}

/// Singleton: the commands recorded for the current frame.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    drawing: bool,
    frames_drawn: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = DrawCommand>) {
        self.commands.extend(commands);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Mark the start of a frame's drawing.
    pub fn begin_drawing(&mut self) {
        self.drawing = true;
    }

    /// Mark the frame complete.
    pub fn end_drawing(&mut self) {
        if self.drawing {
            self.frames_drawn += 1;
        }
        self.drawing = false;
    }

    /// True between `begin_drawing` and `end_drawing`.
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Frames closed with `end_drawing` since creation.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Take the commands out, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.push(DrawCommand::Text {
            text: text.into(),
            position: Vec2::new(x, y),
            size,
            color,
        });
    }

    pub fn fps(&mut self, x: f32, y: f32) {
        self.push(DrawCommand::Fps {
            position: Vec2::new(x, y),
        });
    }

    pub fn cube(&mut self, position: Vec3, size: Vec3, color: Color) {
        self.push(DrawCommand::Cube { position, size, color });
    }

    pub fn cube_wires(&mut self, position: Vec3, size: Vec3, color: Color) {
        self.push(DrawCommand::CubeWires { position, size, color });
    }

    pub fn sphere(&mut self, center: Vec3, radius: f32, color: Color) {
        self.push(DrawCommand::Sphere { center, radius, color });
    }

    pub fn sphere_wires(&mut self, center: Vec3, radius: f32, color: Color) {
        self.push(DrawCommand::SphereWires { center, radius, color });
    }

    pub fn grid(&mut self, slices: u32, spacing: f32) {
        self.push(DrawCommand::Grid { slices, spacing });
    }

    /// Check 3D-mode nesting and matrix push/pop balance.
    pub fn validate(&self) -> Result<(), DrawListError> {
        let mut in_3d = false;
        let mut depth = 0usize;
        for (i, cmd) in self.commands.iter().enumerate() {
            match cmd {
                DrawCommand::BeginMode3D(_) => {
                    if in_3d {
                        return Err(DrawListError::NestedMode3D(i));
                    }
                    in_3d = true;
                }
                DrawCommand::EndMode3D => {
                    if !in_3d {
                        return Err(DrawListError::UnmatchedEndMode3D(i));
                    }
                    if depth != 0 {
                        return Err(DrawListError::UnbalancedMatrix(depth));
                    }
                    in_3d = false;
                }
                DrawCommand::PushMatrix(_) if in_3d => depth += 1,
                DrawCommand::PopMatrix if in_3d => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or(DrawListError::UnmatchedPopMatrix(i))?;
                }
                c if c.is_3d() && !in_3d => return Err(DrawListError::OutsideMode3D(i)),
                _ => {}
            }
        }
        if in_3d {
            return Err(DrawListError::UnclosedMode3D);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_frame_validates() {
        let mut list = DrawList::new();
        list.push(DrawCommand::Clear(Color::RAYWHITE));
        list.push(DrawCommand::BeginMode3D(Camera3D::default()));
        list.push(DrawCommand::PushMatrix(Mat4::IDENTITY));
        list.cube_wires(Vec3::ZERO, Vec3::ONE, Color::RED);
        list.push(DrawCommand::PopMatrix);
        list.grid(10, 1.0);
        list.push(DrawCommand::EndMode3D);
        list.fps(10.0, 10.0);
        assert_eq!(list.validate(), Ok(()));
    }

    #[test]
    fn nesting_errors_are_reported() {
        let mut list = DrawList::new();
        list.push(DrawCommand::BeginMode3D(Camera3D::default()));
        list.push(DrawCommand::BeginMode3D(Camera3D::default()));
        assert_eq!(list.validate(), Err(DrawListError::NestedMode3D(1)));

        let mut list = DrawList::new();
        list.sphere(Vec3::ZERO, 1.0, Color::RED);
        assert_eq!(list.validate(), Err(DrawListError::OutsideMode3D(0)));

        let mut list = DrawList::new();
        list.push(DrawCommand::BeginMode3D(Camera3D::default()));
        assert_eq!(list.validate(), Err(DrawListError::UnclosedMode3D));

        let mut list = DrawList::new();
        list.push(DrawCommand::EndMode3D);
        assert_eq!(list.validate(), Err(DrawListError::UnmatchedEndMode3D(0)));
    }

    #[test]
    fn matrix_stack_must_balance() {
        let mut list = DrawList::new();
        list.push(DrawCommand::BeginMode3D(Camera3D::default()));
        list.push(DrawCommand::PushMatrix(Mat4::IDENTITY));
        list.push(DrawCommand::EndMode3D);
        assert_eq!(list.validate(), Err(DrawListError::UnbalancedMatrix(1)));

        let mut list = DrawList::new();
        list.push(DrawCommand::BeginMode3D(Camera3D::default()));
        list.push(DrawCommand::PopMatrix);
        assert_eq!(list.validate(), Err(DrawListError::UnmatchedPopMatrix(1)));
    }

    #[test]
    fn take_empties_the_list() {
        let mut list = DrawList::new();
        list.text("hi", 0.0, 0.0, 20.0, Color::DARKGRAY);
        assert_eq!(list.take().len(), 1);
        assert!(list.is_empty());
    }
}
