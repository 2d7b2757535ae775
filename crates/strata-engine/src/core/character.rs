// core/character.rs
//
// Virtual character: a capsule that is not a rigid body, moved each frame by
// rapier's kinematic character controller against the physics world.

use glam::{Quat, Vec3};
use rapier3d::control::{CharacterCollision, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use crate::core::physics::{isometry, na_to_vec3, vec3_to_na, ObjectLayer, PhysicsWorld, ShapeDesc};
use crate::input::{InputState, Key};

/// Tunables for a `Character`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterSettings {
    /// Length of the capsule's cylinder part.
    pub height: f32,
    pub radius: f32,
    /// Steepest slope the character can walk up, in degrees.
    pub max_slope_degrees: f32,
    /// Used when pushing dynamic bodies.
    pub mass: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
}

impl Default for CharacterSettings {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.3,
            max_slope_degrees: 45.0,
            mass: 80.0,
            walk_speed: 5.0,
            run_speed: 9.0,
            jump_speed: 8.0,
            gravity: -9.8,
        }
    }
}

impl CharacterSettings {
    /// Distance from the capsule centre to its lowest point.
    pub fn half_extent(&self) -> f32 {
        self.height * 0.5 + self.radius
    }
}

/// One frame of intent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CharacterInput {
    /// Horizontal direction; only X and Z are used.
    pub movement: Vec3,
    pub run: bool,
    pub jump: bool,
}

impl CharacterInput {
    /// W/S move along ±Z, A/D along ±X, LeftShift runs, Space jumps.
    pub fn from_keys(input: &InputState) -> Self {
        let mut movement = Vec3::ZERO;
        if input.is_key_down(Key::W) {
            movement.z += 1.0;
        }
        if input.is_key_down(Key::S) {
            movement.z -= 1.0;
        }
        if input.is_key_down(Key::A) {
            movement.x += 1.0;
        }
        if input.is_key_down(Key::D) {
            movement.x -= 1.0;
        }
        Self {
            movement,
            run: input.is_key_down(Key::LeftShift),
            jump: input.is_key_pressed(Key::Space),
        }
    }
}

pub struct Character {
    settings: CharacterSettings,
    controller: KinematicCharacterController,
    shape: SharedShape,
    position: Vec3,
    velocity: Vec3,
    supported: bool,
}

impl Character {
    pub fn new(settings: CharacterSettings, position: Vec3) -> Self {
        let controller = KinematicCharacterController {
            offset: CharacterLength::Absolute(0.01),
            slide: true,
            autostep: None,
            max_slope_climb_angle: settings.max_slope_degrees.to_radians(),
            min_slope_slide_angle: settings.max_slope_degrees.to_radians(),
            snap_to_ground: None,
            ..KinematicCharacterController::default()
        };
        let shape = ShapeDesc::Capsule {
            half_height: settings.height * 0.5,
            radius: settings.radius,
        }
        .shared_shape();
        Self {
            settings,
            controller,
            shape,
            position,
            velocity: Vec3::ZERO,
            supported: false,
        }
    }

    pub fn settings(&self) -> &CharacterSettings {
        &self.settings
    }

    /// Capsule centre.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Standing on something walkable after the last update.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Advance the character by `dt` seconds.
    pub fn update(&mut self, physics: &mut PhysicsWorld, input: &CharacterInput, dt: f32) {
        let speed = if input.run {
            self.settings.run_speed
        } else {
            self.settings.walk_speed
        };
        let horizontal = Vec3::new(input.movement.x, 0.0, input.movement.z).normalize_or_zero() * speed;

        let mut vertical = self.velocity.y;
        if self.supported && input.jump {
            vertical = self.settings.jump_speed;
        }
        vertical += self.settings.gravity * dt;

        let desired = Vec3::new(horizontal.x, vertical, horizontal.z) * dt;
        let filter = QueryFilter::default().groups(ObjectLayer::Moving.groups());

        physics.update_queries();
        let mut collisions: Vec<CharacterCollision> = Vec::new();
        let movement = self.controller.move_shape(
            dt,
            &physics.bodies,
            &physics.colliders,
            &physics.query_pipeline,
            self.shape.as_ref(),
            &isometry(self.position, Quat::IDENTITY),
            vec3_to_na(desired),
            filter,
            |collision| collisions.push(collision),
        );

        self.position += na_to_vec3(&movement.translation);
        let was_supported = self.supported;
        self.supported = movement.grounded;
        if self.supported && vertical < 0.0 {
            vertical = 0.0;
        }
        if self.supported != was_supported {
            log::debug!("character {}", if self.supported { "landed" } else { "airborne" });
        }
        self.velocity = Vec3::new(horizontal.x, vertical, horizontal.z);

        if !collisions.is_empty() {
            self.controller.solve_character_collision_impulses(
                dt,
                &mut physics.bodies,
                &physics.colliders,
                &physics.query_pipeline,
                self.shape.as_ref(),
                self.settings.mass,
                &collisions,
                filter,
            );
        }
    }
}
