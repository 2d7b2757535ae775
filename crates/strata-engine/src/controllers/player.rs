// controllers/player.rs
//
// Camera-relative player control. `PlayerController` names the entity the
// keyboard drives; movement is along the camera's view projected onto XZ.

use glam::{Quat, Vec3};
use hecs::Entity;

use crate::components::Shape;
use crate::ecs::SystemContext;
use crate::extensions::transform::Transform3D;
use crate::gui::Gui;
use crate::input::{InputState, Key, MouseButton};
use crate::renderer::{Camera3D, MainContext};

/// Units per second.
pub const PLAYER_SPEED: f32 = 5.0;
/// Radians per pixel for mouse rotation in `transform_player_system`.
pub const ROTATE_SENSITIVITY: f32 = 0.003;

/// Singleton: the entity under keyboard control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerController {
    pub target: Entity,
}

/// Singleton: entities selectable with the number keys (One, Two, Three).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerChoices(pub Vec<Entity>);

/// Linear velocity in units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec3);

/// Unit direction from WASD relative to `camera`, flattened onto XZ.
/// Zero when no key is held or the keys cancel out.
pub fn camera_relative_direction(camera: &Camera3D, input: &InputState) -> Vec3 {
    let forward = camera.flat_forward();
    let right = camera.right();
    let mut dir = Vec3::ZERO;
    if input.is_key_down(Key::W) {
        dir += forward;
    }
    if input.is_key_down(Key::S) {
        dir -= forward;
    }
    if input.is_key_down(Key::A) {
        dir -= right;
    }
    if input.is_key_down(Key::D) {
        dir += right;
    }
    dir.normalize_or_zero()
}

/// Write the controlled entity's `Velocity` from the keyboard.
pub fn player_input_system(ctx: &mut SystemContext<'_>) {
    let (Some(pc), Some(main), Some(input)) = (
        ctx.singleton::<PlayerController>(),
        ctx.singleton::<MainContext>(),
        ctx.singleton::<InputState>(),
    ) else {
        return;
    };
    let velocity = camera_relative_direction(&main.camera, &input) * PLAYER_SPEED;
    let target = pc.target;
    drop((pc, main, input));

    let entities = ctx.world.entities_mut();
    if !entities.contains(target) {
        log::trace!("player target {:?} is gone", target);
        return;
    }
    let updated = match entities.get::<&mut Velocity>(target) {
        Ok(mut v) => {
            v.0 = velocity;
            true
        }
        Err(_) => false,
    };
    if !updated {
        let _ = entities.insert_one(target, Velocity(velocity));
    }
}

/// Euler step: `position += velocity * dt` for shapes and transforms.
pub fn movement_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let world = ctx.entities();
    for (_, (velocity, shape, transform)) in world
        .query::<(&Velocity, Option<&mut Shape>, Option<&mut Transform3D>)>()
        .iter()
    {
        if velocity.0 == Vec3::ZERO {
            continue;
        }
        let delta = velocity.0 * dt;
        match (shape, transform) {
            (_, Some(t)) => t.translate(delta),
            (Some(s), None) => s.position += delta,
            (None, None) => {}
        }
    }
}

/// Hierarchy-demo control: number keys pick the entity, left drag yaws,
/// right drag pitches, WASD moves it in its own rotated frame.
pub fn transform_player_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let Some(mut pc) = ctx.singleton_mut::<PlayerController>() else { return };
    let Some(input) = ctx.singleton::<InputState>() else { return };

    if let Some(choices) = ctx.singleton::<PlayerChoices>() {
        for (key, choice) in [Key::One, Key::Two, Key::Three].into_iter().zip(choices.0.iter()) {
            if input.is_key_pressed(key) {
                log::info!("player control -> {:?}", choice);
                pc.target = *choice;
                return;
            }
        }
    }

    let Some(main) = ctx.singleton::<MainContext>() else { return };
    let world = ctx.entities();
    let Ok(mut t) = world.get::<&mut Transform3D>(pc.target) else { return };

    let move_delta = camera_relative_direction(&main.camera, &input) * PLAYER_SPEED * dt;

    let gui_has_mouse = ctx.singleton::<Gui>().map(|g| g.wants_mouse()).unwrap_or(false);
    let do_yaw = !gui_has_mouse && input.is_mouse_down(MouseButton::Left);
    let do_pitch = !gui_has_mouse && input.is_mouse_down(MouseButton::Right);
    if do_yaw || do_pitch {
        let delta = input.mouse_delta();
        let yaw = if do_yaw {
            Quat::from_axis_angle(Vec3::Y, -delta.x * ROTATE_SENSITIVITY)
        } else {
            Quat::IDENTITY
        };
        let pitch = if do_pitch {
            Quat::from_axis_angle(Vec3::X, -delta.y * ROTATE_SENSITIVITY)
        } else {
            Quat::IDENTITY
        };
        let rotation = (t.rotation * (pitch * yaw)).normalize();
        t.set_rotation(rotation);
    }

    if move_delta.length_squared() > 0.0 {
        let local = t.rotation * move_delta;
        t.translate(local);
    }
}
