pub mod fly_camera;
pub mod player;

pub use fly_camera::{fly_camera_system, FlyCamera};
pub use player::{
    movement_system, player_input_system, transform_player_system, PlayerChoices, PlayerController,
    Velocity,
};
