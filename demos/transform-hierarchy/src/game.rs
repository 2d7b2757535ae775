use glam::Vec3;
use strata_engine::*;

/// Singleton: whether the help window is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpWindow {
    pub open: bool,
}

fn help_window_system(ctx: &mut SystemContext<'_>) {
    let (Some(mut gui), Some(mut help)) = (
        ctx.singleton_mut::<Gui>(),
        ctx.singleton_mut::<HelpWindow>(),
    ) else {
        return;
    };
    let target = ctx
        .singleton::<PlayerController>()
        .and_then(|pc| ctx.entities().get::<&Name>(pc.target).ok().map(|n| n.0.clone()))
        .unwrap_or_else(|| "none".to_string());
    gui.window("Transform Hierarchy", &mut help.open, |ui| {
        ui.text(format!("Controlling: {}", target));
        ui.text("1 / 2: pick parent / child");
        ui.text("WASD: move, LMB: yaw, RMB: pitch");
    });
}

/// A red parent cube with a blue child and grandchild, each drawn through
/// its world matrix.
pub struct TransformHierarchy;

impl TransformHierarchy {
    pub fn new() -> Self {
        Self
    }
}

impl Game for TransformHierarchy {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - transform hierarchy")
            .with_window_size(800, 450)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        let phases = RenderPhases::install(world)?;
        phases.install_default_systems(world)?;

        world.add_system("transform_player_system", phases.update, transform_player_system)?;
        world.add_system("transform_system", phases.update, transform_system)?;
        world.add_system("render_shapes_system", phases.render_3d, render_shapes_system)?;
        world.add_system("help_window_system", phases.gui_render, help_window_system)?;

        world.set(MainContext {
            camera: Camera3D::perspective(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, 45.0),
        });

        let parent = world.spawn_named(
            "Parent",
            (Transform3D::new(), Shape::cube(Vec3::ZERO, 1.0, Color::RED)),
        );
        let child = world.spawn_named(
            "Child",
            (
                Transform3D::new()
                    .with_position(Vec3::new(2.0, 0.0, 0.0))
                    .with_scale(Vec3::splat(0.5)),
                Shape::cube(Vec3::ZERO, 1.0, Color::BLUE),
            ),
        );
        let grandchild = world.spawn_named(
            "ChildCube",
            (
                Transform3D::new()
                    .with_position(Vec3::new(2.0, 2.0, 0.0))
                    .with_scale(Vec3::splat(0.5)),
                Shape::cube(Vec3::ZERO, 1.0, Color::BLUE),
            ),
        );
        world.set_parent(child, parent)?;
        world.set_parent(grandchild, child)?;

        world.set(PlayerController { target: child });
        world.set(PlayerChoices(vec![parent, child]));
        world.set(HelpWindow { open: true });
        log::info!("transform-hierarchy: controlling the child cube");
        Ok(())
    }
}
