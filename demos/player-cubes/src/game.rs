use glam::Vec3;
use hecs::Entity;
use strata_engine::*;

/// Singleton: values edited by the test window.
#[derive(Debug, Clone, PartialEq)]
pub struct GuiTestState {
    pub open: bool,
    pub value: f32,
    pub clear_color: [f32; 3],
}

impl Default for GuiTestState {
    fn default() -> Self {
        Self {
            open: true,
            value: 0.0,
            clear_color: [0.45, 0.55, 0.60],
        }
    }
}

fn gui_test_window_system(ctx: &mut SystemContext<'_>) {
    let (Some(mut gui), Some(mut state)) = (
        ctx.singleton_mut::<Gui>(),
        ctx.singleton_mut::<GuiTestState>(),
    ) else {
        return;
    };
    let state = &mut *state;
    gui.window("Test Window", &mut state.open, |ui| {
        ui.text("Test Text.");
        ui.slider_f32("float", &mut state.value, 0.0, 1.0);
        ui.color_edit3("clear color", &mut state.clear_color);
        if ui.button("Button") {
            log::info!("Click");
        }
    });
}

/// Two wire cubes; WASD moves the red one relative to the camera.
pub struct PlayerCubes {
    red: Option<Entity>,
    green: Option<Entity>,
}

impl PlayerCubes {
    pub fn new() -> Self {
        Self { red: None, green: None }
    }

    pub fn red(&self) -> Option<Entity> {
        self.red
    }

    pub fn green(&self) -> Option<Entity> {
        self.green
    }
}

impl Game for PlayerCubes {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - player cubes")
            .with_window_size(800, 450)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        let phases = RenderPhases::install(world)?;
        phases.install_default_systems(world)?;

        // Input writes the velocity the move system integrates in the same phase.
        world.add_system("player_input_system", phases.update, player_input_system)?;
        world.add_system("movement_system", phases.update, movement_system)?;
        world.add_system("render_shapes_system", phases.render_3d, render_shapes_system)?;
        world.add_system("gui_test_window_system", phases.gui_render, gui_test_window_system)?;

        world.set(MainContext {
            camera: Camera3D::perspective(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, 45.0),
        });

        let red = world.spawn_named("red", (Shape::cube(Vec3::ZERO, 1.0, Color::RED),));
        let green = world.spawn_named("green", (Shape::cube(Vec3::new(3.0, 0.0, 0.0), 1.0, Color::GREEN),));
        world.set(PlayerController { target: red });
        world.set(GuiTestState::default());
        self.red = Some(red);
        self.green = Some(green);
        Ok(())
    }
}
