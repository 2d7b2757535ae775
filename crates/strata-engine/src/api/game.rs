use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::ecs::World;
use crate::renderer::color::Color;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsWorld;
#[cfg(feature = "physics")]
use crate::core::time::FixedTimestep;

/// Configuration for the engine, provided by the game.
///
/// Every field has a default, so a JSON overlay only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window title.
    pub title: String,
    /// Window width in pixels (default: 800).
    pub window_width: u32,
    /// Window height in pixels (default: 450).
    pub window_height: u32,
    /// Fixed physics timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Upper bound on fixed steps run in one frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Gravity for the physics world, Y up.
    pub gravity: [f32; 3],
    /// Background color, stored as the `ClearColor` singleton.
    pub clear_color: Color,
    /// Whether the demo draws an FPS counter.
    pub show_fps: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "strata".to_string(),
            window_width: 800,
            window_height: 450,
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            gravity: [0.0, -9.81, 0.0],
            clear_color: Color::RAYWHITE,
            show_fps: true,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON object on top of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::default().overlay_json(json)
    }

    /// Parse a (possibly partial) JSON object on top of `self`.
    pub fn overlay_json(&self, json: &str) -> Result<Self> {
        let mut base = serde_json::to_value(self)?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        match (&mut base, patch) {
            (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
                for (key, value) in patch {
                    if !base.contains_key(&key) {
                        log::warn!("config: unknown key `{}` ignored", key);
                        continue;
                    }
                    base.insert(key, value);
                }
            }
            // Anything but an object is not a config; let serde say why.
            (_, patch) => return Ok(serde_json::from_value(patch)?),
        }
        Ok(serde_json::from_value(base)?)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Window aspect ratio, guarded against a zero height.
    pub fn aspect(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }

    /// A physics world using this config's gravity and timestep.
    #[cfg(feature = "physics")]
    pub fn physics_world(&self) -> PhysicsWorld {
        PhysicsWorld::new(glam::Vec3::from_array(self.gravity))
            .with_timestep(FixedTimestep::with_max_steps(self.fixed_dt, self.max_steps_per_frame))
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state: singletons, phases, systems, entities.
    fn init(&mut self, world: &mut World) -> Result<()>;

    /// Per-frame hook, run before the world's systems. Demos that do all of
    /// their work in systems leave this alone.
    fn update(&mut self, _world: &mut World, _dt: f32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "title": "demo", "window_width": 1200 }"#).unwrap();
        assert_eq!(config.title, "demo");
        assert_eq!(config.window_width, 1200);
        assert_eq!(config.window_height, 450);
        assert_eq!(config.max_steps_per_frame, 10);
        assert_eq!(config.gravity, [0.0, -9.81, 0.0]);
    }

    #[test]
    fn overlay_keeps_the_base_config() {
        let base = GameConfig::default()
            .with_title("physics")
            .with_window_size(1200, 800);
        let config = base
            .overlay_json(r#"{ "show_fps": false, "clear_color": { "r": 0, "g": 0, "b": 0, "a": 255 } }"#)
            .unwrap();
        assert_eq!(config.title, "physics");
        assert_eq!(config.window_width, 1200);
        assert!(!config.show_fps);
        assert_eq!(config.clear_color, Color::BLACK);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        use crate::core::error::EngineError;
        assert!(matches!(GameConfig::from_json("{ nope"), Err(EngineError::Config(_))));
        assert!(matches!(GameConfig::from_json("[1, 2]"), Err(EngineError::Config(_))));
        assert!(matches!(
            GameConfig::from_json(r#"{ "window_width": "wide" }"#),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn aspect_ratio() {
        let config = GameConfig::default().with_window_size(1200, 800);
        assert!((config.aspect() - 1.5).abs() < 1e-6);
    }
}
