pub mod game;
pub mod runner;

pub use game::{Game, GameConfig};
pub use runner::{HeadlessRunner, Runner};
