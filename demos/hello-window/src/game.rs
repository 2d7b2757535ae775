use strata_engine::*;

const MESSAGE: &str = "Congrats! You created your first strata window!";

/// Text and an FPS counter, drawn straight from `Game::update`.
pub struct HelloWindow;

impl HelloWindow {
    pub fn new() -> Self {
        Self
    }
}

impl Game for HelloWindow {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - Hello World")
            .with_window_size(800, 450)
    }

    fn init(&mut self, _world: &mut World) -> Result<()> {
        log::info!("hello-window: entering loop");
        Ok(())
    }

    fn update(&mut self, world: &mut World, _dt: f32) {
        let show_fps = world.get::<GameConfig>().map(|c| c.show_fps).unwrap_or(true);
        let clear = world.get::<ClearColor>().map(|c| c.0).unwrap_or(Color::RAYWHITE);
        let Some(mut list) = world.get_mut::<DrawList>() else { return };

        list.begin_drawing();
        list.push(DrawCommand::Clear(clear));
        list.text(MESSAGE, 40.0, 200.0, 20.0, Color::DARKGRAY);
        if show_fps {
            list.fps(10.0, 10.0);
        }
        list.end_drawing();
    }
}
