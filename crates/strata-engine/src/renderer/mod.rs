pub mod camera;
pub mod color;
pub mod draw;
pub mod phases;

pub use camera::{Camera3D, MainContext, Projection};
pub use color::Color;
pub use draw::{DrawCommand, DrawList, DrawListError};
pub use phases::{ClearColor, RenderPhases};
