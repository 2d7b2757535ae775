pub mod queue;
pub mod state;

pub use queue::{InputEvent, InputQueue, Key, MouseButton};
pub use state::InputState;
