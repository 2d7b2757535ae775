pub mod api;
pub mod components;
pub mod controllers;
pub mod core;
pub mod ecs;
pub mod extensions;
pub mod gui;
pub mod input;
pub mod renderer;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::runner::{HeadlessRunner, Runner};
pub use crate::core::error::{EngineError, Result};
pub use crate::core::time::{FixedTimestep, FrameStats};
pub use ecs::{trace_system, Children, Name, Parent, PhaseId, SystemContext, World};
pub use input::{InputEvent, InputQueue, InputState, Key, MouseButton};
pub use renderer::{
    Camera3D, ClearColor, Color, DrawCommand, DrawList, DrawListError, MainContext, Projection,
    RenderPhases,
};
pub use gui::{Gui, Ui};
pub use components::{render_shapes_system, Shape};
pub use controllers::{
    fly_camera_system, movement_system, player_input_system, transform_player_system, FlyCamera,
    PlayerChoices, PlayerController, Velocity,
};
pub use extensions::{propagate_transforms, transform_system, Transform3D};

#[cfg(feature = "physics")]
pub use crate::core::physics::{
    physics_step_system, BodyActivation, BodyDesc, BodyType, BroadPhaseLayer, ColliderMaterial,
    Contact, ObjectLayer, PhysicsBody, PhysicsWorld, ShapeDesc,
};
#[cfg(feature = "physics")]
pub use crate::core::character::{Character, CharacterInput, CharacterSettings};

// Third-party crates the public API is written in terms of.
pub use glam;
pub use hecs;
