// controllers/fly_camera.rs
//
// Free-fly camera: right mouse looks around, WASD flies along the view,
// Space/LeftShift go up/down, the wheel scales the speed.

use std::f32::consts::PI;

use glam::Vec3;

use crate::ecs::SystemContext;
use crate::gui::Gui;
use crate::input::{InputState, Key, MouseButton};
use crate::renderer::{Camera3D, DrawCommand, DrawList, MainContext};

/// Radians per pixel of mouse movement.
pub const LOOK_SENSITIVITY: f32 = 0.003;
pub const PITCH_LIMIT: f32 = PI * 0.49;
/// Speed multiplier per wheel notch.
pub const SPEED_STEP: f32 = 1.5;
/// Bounds on `speed * speed_multiplier`, in units per second.
pub const SPEED_MIN: f32 = 1.0;
pub const SPEED_MAX: f32 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    pub yaw: f32,
    pub pitch: f32,
    /// Base speed in units per second.
    pub speed: f32,
    pub speed_multiplier: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            speed: 10.0,
            speed_multiplier: 1.0,
        }
    }
}

impl FlyCamera {
    /// Yaw and pitch that make `forward()` point from `position` at `target`.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let d = target - position;
        let len = d.length();
        let pitch = if len > 0.0 { (d.y / len).clamp(-1.0, 1.0).asin() } else { 0.0 };
        Self {
            yaw: d.x.atan2(d.z),
            pitch: pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            ..Self::default()
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    /// Horizontal side vector. Points to screen-left of `forward`, which is
    /// why A adds it.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn effective_speed(&self) -> f32 {
        self.speed * self.speed_multiplier
    }

    /// Apply one frame of input to `camera`. `allow_look` gates mouse look
    /// (false while the GUI owns the pointer). Returns whether the cursor
    /// should be visible.
    pub fn update(&mut self, camera: &mut Camera3D, input: &InputState, dt: f32, allow_look: bool) -> bool {
        let looking = allow_look && input.is_mouse_down(MouseButton::Right);
        if looking {
            let delta = input.mouse_delta();
            self.yaw -= delta.x * LOOK_SENSITIVITY;
            self.pitch -= delta.y * LOOK_SENSITIVITY;
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        let forward = self.forward();
        let right = self.right();
        let mut dir = Vec3::ZERO;
        if input.is_key_down(Key::W) {
            dir += forward;
        }
        if input.is_key_down(Key::S) {
            dir -= forward;
        }
        if input.is_key_down(Key::A) {
            dir += right;
        }
        if input.is_key_down(Key::D) {
            dir -= right;
        }
        if input.is_key_down(Key::Space) {
            dir.y += 1.0;
        }
        if input.is_key_down(Key::LeftShift) {
            dir.y -= 1.0;
        }
        if dir.length_squared() > 0.0 {
            camera.position += dir.normalize() * self.effective_speed() * dt;
        }
        camera.target = camera.position + forward;

        let wheel = input.wheel();
        if wheel != 0.0 {
            self.speed_multiplier *= SPEED_STEP.powf(wheel);
            self.speed_multiplier = self
                .speed_multiplier
                .clamp(SPEED_MIN / self.speed, SPEED_MAX / self.speed);
        }

        !looking
    }
}

/// Drive `MainContext.camera` from the `FlyCamera` singleton.
pub fn fly_camera_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let (Some(mut fly), Some(mut main), Some(input)) = (
        ctx.singleton_mut::<FlyCamera>(),
        ctx.singleton_mut::<MainContext>(),
        ctx.singleton::<InputState>(),
    ) else {
        log::trace!("{}: missing FlyCamera/MainContext/InputState, skip", ctx.name());
        return;
    };
    let allow_look = !ctx.singleton::<Gui>().map(|g| g.wants_mouse()).unwrap_or(false);
    let cursor_visible = fly.update(&mut main.camera, &input, dt, allow_look);
    if let Some(mut list) = ctx.singleton_mut::<DrawList>() {
        list.push(DrawCommand::ShowCursor(cursor_visible));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn input_with(events: &[InputEvent]) -> InputState {
        let mut input = InputState::new();
        for e in events {
            input.apply(*e);
        }
        input
    }

    #[test]
    fn looking_at_points_forward_at_target() {
        let pos = Vec3::new(12.0, 10.0, 12.0);
        let fly = FlyCamera::looking_at(pos, Vec3::ZERO);
        assert!(approx(fly.yaw, (-12.0f32).atan2(-12.0)));
        let expected = (Vec3::ZERO - pos).normalize();
        assert!((fly.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn w_moves_along_forward_at_speed() {
        let mut fly = FlyCamera::default();
        let mut cam = Camera3D {
            position: Vec3::ZERO,
            ..Default::default()
        };
        let input = input_with(&[InputEvent::KeyDown(Key::W)]);
        fly.update(&mut cam, &input, 0.5, true);
        // yaw 0, pitch 0 faces +Z; 10 u/s for half a second.
        assert!((cam.position - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
        assert!((cam.target - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-4);
    }

    #[test]
    fn diagonal_movement_is_normalised() {
        let mut fly = FlyCamera::default();
        let mut cam = Camera3D {
            position: Vec3::ZERO,
            ..Default::default()
        };
        let input = input_with(&[InputEvent::KeyDown(Key::W), InputEvent::KeyDown(Key::Space)]);
        fly.update(&mut cam, &input, 1.0, true);
        assert!(approx(cam.position.length(), 10.0));
    }

    #[test]
    fn right_drag_rotates_and_hides_cursor() {
        let mut fly = FlyCamera::default();
        let mut cam = Camera3D::default();
        let mut input = input_with(&[
            InputEvent::MouseMove { x: 0.0, y: 0.0 },
            InputEvent::MouseDown(MouseButton::Right),
        ]);
        input.begin_frame();
        input.apply(InputEvent::MouseMove { x: 100.0, y: 10000.0 });
        let visible = fly.update(&mut cam, &input, 0.016, true);
        assert!(!visible);
        assert!(approx(fly.yaw, -0.3));
        assert!(approx(fly.pitch, -PITCH_LIMIT));

        // Same drag while the GUI has the pointer does nothing.
        let before = fly;
        assert!(fly.update(&mut cam, &input, 0.016, false));
        assert_eq!(fly.yaw, before.yaw);
    }

    #[test]
    fn wheel_scales_speed_within_bounds() {
        let mut fly = FlyCamera::default();
        let mut cam = Camera3D::default();
        let input = input_with(&[InputEvent::Wheel(2.0)]);
        fly.update(&mut cam, &input, 0.0, true);
        assert!(approx(fly.speed_multiplier, 2.25));

        let input = input_with(&[InputEvent::Wheel(100.0)]);
        fly.update(&mut cam, &input, 0.0, true);
        assert!(approx(fly.effective_speed(), SPEED_MAX));

        let input = input_with(&[InputEvent::Wheel(-100.0)]);
        fly.update(&mut cam, &input, 0.0, true);
        assert!(approx(fly.effective_speed(), SPEED_MIN));
    }
}
