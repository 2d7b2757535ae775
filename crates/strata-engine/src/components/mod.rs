pub mod shape;

pub use shape::{render_shapes_system, Shape};
