pub mod error;
pub mod time;
#[cfg(feature = "physics")]
pub mod physics;
#[cfg(feature = "physics")]
pub mod character;
