pub mod input;
pub mod replay;

use macroquad::window::Conf;
use macroquad::time::get_frame_time;
use macroquad::window::next_frame;
use strata_engine::{Game, GameConfig, InputQueue, Runner};

pub use input::sample_input;
pub use replay::Replayer;

// Re-exported for `native_main!`.
pub use log;
pub use macroquad;
pub use strata_engine;

/// Environment variable naming an optional JSON config overlay.
pub const CONFIG_ENV: &str = "STRATA_CONFIG";

/// Start logging. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // A second call keeps the first logger.
    let _ = env_logger::Builder::from_env(env).try_init();
}

pub fn window_conf(config: &GameConfig) -> Conf {
    Conf {
        window_title: config.title.clone(),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        ..Default::default()
    }
}

/// Apply the `STRATA_CONFIG` overlay, if set, on top of `config`.
/// A missing or broken file keeps `config` as it is.
pub fn load_config(config: GameConfig) -> GameConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return config;
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("{}: cannot read {}: {}", CONFIG_ENV, path, err);
            return config;
        }
    };
    match config.overlay_json(&json) {
        Ok(overlaid) => {
            log::info!("config loaded from {}", path);
            overlaid
        }
        Err(err) => {
            log::warn!("{}: {}: {}", CONFIG_ENV, path, err);
            config
        }
    }
}

/// Run `game` until it asks to quit, with its own config plus any overlay.
pub async fn run<G: Game>(game: G) {
    let config = load_config(game.config());
    run_with_config(game, config).await;
}

pub async fn run_with_config<G: Game>(game: G, config: GameConfig) {
    let mut runner = Runner::with_config(game, config);
    if let Err(err) = runner.init() {
        log::error!("init failed: {}", err);
        return;
    }

    let mut queue = InputQueue::new();
    let mut replayer = Replayer::new();
    loop {
        sample_input(&mut queue);
        let commands = match runner.tick(get_frame_time(), queue.drain()) {
            Ok(commands) => commands,
            Err(err) => {
                log::error!("frame failed: {}", err);
                break;
            }
        };
        replayer.replay(&commands);
        if runner.quit_requested() {
            break;
        }
        next_frame().await;
    }
    log::info!("{}: closed", runner.config().title);
}

/// Generate `main` for a demo binary.
///
/// # Usage
///
/// ```ignore
/// mod game;
/// use game::PlayerCubes;
///
/// strata_native::native_main!(PlayerCubes, "player-cubes");
/// ```
///
/// `$game_type` must have a `new()` constructor and implement `strata_engine::Game`.
#[macro_export]
macro_rules! native_main {
    ($game_type:ty, $game_name:literal) => {
        fn main() {
            $crate::init_logging();
            let game = <$game_type>::new();
            let config = $crate::load_config(<$game_type as $crate::strata_engine::Game>::config(&game));
            let conf = $crate::window_conf(&config);
            $crate::macroquad::Window::from_config(conf, async move {
                $crate::log::info!("{}: starting", $game_name);
                $crate::run_with_config(game, config).await;
            });
        }
    };
}
