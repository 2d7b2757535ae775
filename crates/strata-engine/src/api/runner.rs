use std::cell::Ref;

use crate::api::game::{Game, GameConfig};
use crate::core::error::Result;
use crate::core::time::FrameStats;
use crate::ecs::World;
use crate::gui::Gui;
use crate::input::{InputEvent, InputQueue, InputState, Key, MouseButton};
use crate::renderer::draw::{DrawCommand, DrawList};
use crate::renderer::phases::ClearColor;

/// Generic game runner that wires up the engine loop.
///
/// A window shell samples input, calls `tick` once per displayed frame and
/// replays the returned draw commands. Nothing here touches a window.
pub struct Runner<G: Game> {
    game: G,
    world: World,
    config: GameConfig,
    initialized: bool,
    quit_requested: bool,
}

impl<G: Game> Runner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self::with_config(game, config)
    }

    /// Use `config` instead of the game's own, e.g. after an overlay.
    pub fn with_config(game: G, config: GameConfig) -> Self {
        Self {
            game,
            world: World::new(),
            config,
            initialized: false,
            quit_requested: false,
        }
    }

    /// Install the engine singletons and initialize the game. Call once.
    pub fn init(&mut self) -> Result<()> {
        self.world.set(self.config.clone());
        self.world.set(InputState::new());
        self.world.set(DrawList::new());
        self.world.set(Gui::new());
        self.world.set(ClearColor(self.config.clear_color));
        self.world.set(FrameStats::default());
        self.game.init(&mut self.world)?;
        self.initialized = true;
        log::info!("{}: initialized", self.config.title);
        Ok(())
    }

    /// Run one frame: feed input, update the game, run every system.
    /// Returns the frame's draw commands.
    pub fn tick(&mut self, dt: f32, events: impl IntoIterator<Item = InputEvent>) -> Result<Vec<DrawCommand>> {
        if !self.initialized {
            return Ok(Vec::new());
        }

        let escape = {
            let Some(mut input) = self.world.get_mut::<InputState>() else {
                return Ok(Vec::new());
            };
            input.begin_frame();
            for event in events {
                input.apply(event);
            }
            let position = input.mouse_position();
            if let Some(mut gui) = self.world.get_mut::<Gui>() {
                gui.set_pointer(position);
            }
            input.is_key_pressed(Key::Escape)
        };
        if escape && !self.quit_requested {
            log::info!("{}: escape pressed, quitting", self.config.title);
            self.quit_requested = true;
        }

        if let Some(mut list) = self.world.get_mut::<DrawList>() {
            list.clear();
        }
        if let Some(mut stats) = self.world.get_mut::<FrameStats>() {
            stats.record(dt);
        }

        self.game.update(&mut self.world, dt);
        self.world.progress(dt)?;

        Ok(self
            .world
            .get_mut::<DrawList>()
            .map(|mut list| list.take())
            .unwrap_or_default())
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }
}

/// A `Runner` driven by scripted frames, for tests.
///
/// Input is queued between frames and delivered on the next `frame` call,
/// the way a window shell would deliver it.
pub struct HeadlessRunner<G: Game> {
    runner: Runner<G>,
    input: InputQueue,
    dt: f32,
    last_frame: Vec<DrawCommand>,
}

impl<G: Game> HeadlessRunner<G> {
    /// Build and initialize a runner ticking at 60 Hz.
    pub fn new(game: G) -> Result<Self> {
        let mut runner = Runner::new(game);
        runner.init()?;
        Ok(Self {
            runner,
            input: InputQueue::new(),
            dt: 1.0 / 60.0,
            last_frame: Vec::new(),
        })
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.input.push(event);
        self
    }

    pub fn key_down(&mut self, key: Key) -> &mut Self {
        self.push(InputEvent::KeyDown(key))
    }

    pub fn key_up(&mut self, key: Key) -> &mut Self {
        self.push(InputEvent::KeyUp(key))
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) -> &mut Self {
        self.push(InputEvent::MouseMove { x, y })
    }

    pub fn mouse_down(&mut self, button: MouseButton) -> &mut Self {
        self.push(InputEvent::MouseDown(button))
    }

    pub fn mouse_up(&mut self, button: MouseButton) -> &mut Self {
        self.push(InputEvent::MouseUp(button))
    }

    /// Run one frame with the queued input.
    pub fn frame(&mut self) -> Result<&[DrawCommand]> {
        let events = self.input.drain();
        self.last_frame = self.runner.tick(self.dt, events)?;
        Ok(&self.last_frame)
    }

    /// Run `n` frames; the first one gets the queued input.
    pub fn frames(&mut self, n: usize) -> Result<&[DrawCommand]> {
        for _ in 0..n {
            self.frame()?;
        }
        Ok(&self.last_frame)
    }

    /// Draw commands of the most recent frame.
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn singleton<T: 'static>(&self) -> Option<Ref<'_, T>> {
        self.runner.world().get::<T>()
    }

    pub fn world(&self) -> &World {
        self.runner.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.runner.world_mut()
    }

    pub fn game(&self) -> &G {
        self.runner.game()
    }

    pub fn runner(&self) -> &Runner<G> {
        &self.runner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::PhaseId;
    use crate::renderer::color::Color;

    #[derive(Default)]
    struct Counter {
        updates: u32,
    }

    struct CountingGame;

    impl Game for CountingGame {
        fn config(&self) -> GameConfig {
            GameConfig::default()
                .with_title("counting")
                .with_clear_color(Color::BLACK)
        }

        fn init(&mut self, world: &mut World) -> Result<()> {
            world.set(Counter::default());
            world.add_system("count", PhaseId::ON_UPDATE, |ctx| {
                if let Some(mut c) = ctx.singleton_mut::<Counter>() {
                    c.updates += 1;
                }
                if let Some(mut list) = ctx.singleton_mut::<DrawList>() {
                    list.text("hi", 10.0, 10.0, 20.0, Color::DARKGRAY);
                }
            })
        }

        fn update(&mut self, world: &mut World, _dt: f32) {
            if let Some(mut list) = world.get_mut::<DrawList>() {
                list.fps(10.0, 40.0);
            }
        }
    }

    #[test]
    fn init_installs_engine_singletons() {
        let headless = HeadlessRunner::new(CountingGame).unwrap();
        let world = headless.world();
        assert!(world.has::<InputState>());
        assert!(world.has::<DrawList>());
        assert!(world.has::<Gui>());
        assert!(world.has::<FrameStats>());
        assert_eq!(world.get::<ClearColor>().unwrap().0, Color::BLACK);
        assert_eq!(world.get::<GameConfig>().unwrap().title, "counting");
    }

    #[test]
    fn tick_runs_update_then_systems() {
        let mut headless = HeadlessRunner::new(CountingGame).unwrap();
        let frame = headless.frame().unwrap().to_vec();
        assert_eq!(frame.len(), 2);
        assert!(matches!(frame[0], DrawCommand::Fps { .. }));
        assert!(matches!(frame[1], DrawCommand::Text { .. }));

        headless.frames(2).unwrap();
        assert_eq!(headless.singleton::<Counter>().unwrap().updates, 3);
        assert_eq!(headless.singleton::<FrameStats>().unwrap().frame, 3);
        // The draw list starts empty every frame.
        assert_eq!(headless.last_frame().len(), 2);
    }

    #[test]
    fn input_reaches_the_state_singleton() {
        let mut headless = HeadlessRunner::new(CountingGame).unwrap();
        headless.key_down(Key::W).mouse_move(5.0, 6.0);
        headless.frame().unwrap();
        {
            let input = headless.singleton::<InputState>().unwrap();
            assert!(input.is_key_pressed(Key::W));
            assert_eq!(input.mouse_position(), glam::Vec2::new(5.0, 6.0));
        }

        headless.frame().unwrap();
        let input = headless.singleton::<InputState>().unwrap();
        assert!(input.is_key_down(Key::W));
        assert!(!input.is_key_pressed(Key::W));
    }

    #[test]
    fn escape_requests_quit() {
        let mut headless = HeadlessRunner::new(CountingGame).unwrap();
        headless.frame().unwrap();
        assert!(!headless.runner().quit_requested());
        headless.key_down(Key::Escape);
        headless.frame().unwrap();
        assert!(headless.runner().quit_requested());
    }

    #[test]
    fn uninitialized_runner_does_nothing() {
        let mut runner = Runner::new(CountingGame);
        assert!(runner.tick(0.016, Vec::new()).unwrap().is_empty());
        assert_eq!(runner.world().frame(), 0);
    }
}
