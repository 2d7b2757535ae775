use glam::Vec3;
use strata_engine::*;

/// Singleton: whether the test window is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestWindow {
    pub open: bool,
}

fn render_3d_system(ctx: &mut SystemContext<'_>) {
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.cube_wires(Vec3::ZERO, Vec3::splat(2.0), Color::MAROON);
}

fn gui_render_system(ctx: &mut SystemContext<'_>) {
    let (Some(mut gui), Some(mut window)) = (
        ctx.singleton_mut::<Gui>(),
        ctx.singleton_mut::<TestWindow>(),
    ) else {
        return;
    };
    gui.window("Test Window", &mut window.open, |ui| {
        ui.text("Test Text.");
    });
}

fn render_2d_system(ctx: &mut SystemContext<'_>) {
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.fps(10.0, 10.0);
}

/// The full render phase chain with one system in each drawing phase.
pub struct RenderPhasesDemo;

impl RenderPhasesDemo {
    pub fn new() -> Self {
        Self
    }
}

impl Game for RenderPhasesDemo {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - render phases")
            .with_window_size(800, 450)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        let phases = RenderPhases::install(world)?;
        phases.install_default_systems(world)?;

        world.add_system("update_trace_system", phases.update, trace_system)?;
        world.add_system("render_3d_system", phases.render_3d, render_3d_system)?;
        world.add_system("gui_render_system", phases.gui_render, gui_render_system)?;
        world.add_system("render_2d_system", phases.render_2d, render_2d_system)?;

        world.set(MainContext {
            camera: Camera3D::perspective(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, 45.0),
        });
        world.set(TestWindow { open: true });
        log::info!("render-phases: {} systems registered", world.pipeline().system_count());
        Ok(())
    }
}
