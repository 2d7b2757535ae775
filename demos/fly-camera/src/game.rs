use glam::Vec3;
use strata_engine::*;

pub const CAMERA_START: Vec3 = Vec3::new(12.0, 10.0, 12.0);

fn render_scene_system(ctx: &mut SystemContext<'_>) {
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.sphere(Vec3::ZERO, 1.0, Color::RED);
    list.sphere_wires(Vec3::ZERO, 1.1, Color::BLACK);
    list.grid(20, 5.0);
}

/// Frame-time readout, the camera position and the FPS counter.
fn hud_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let position = ctx
        .singleton::<MainContext>()
        .map(|m| m.camera.position)
        .unwrap_or(Vec3::ZERO);
    let speed = ctx.singleton::<FlyCamera>().map(|f| f.effective_speed()).unwrap_or(0.0);
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.text(
        format!(
            "Step: {:.0}   Pos: {:.2}, {:.2}, {:.2}",
            dt * 60.0,
            position.x,
            position.y,
            position.z
        ),
        10.0,
        10.0,
        20.0,
        Color::DARKGRAY,
    );
    list.text(format!("Speed: {:.1}", speed), 10.0, 70.0, 20.0, Color::DARKGRAY);
    list.fps(10.0, 40.0);
}

/// Free-fly camera around a sphere on a grid.
pub struct FlyCameraDemo;

impl FlyCameraDemo {
    pub fn new() -> Self {
        Self
    }
}

impl Game for FlyCameraDemo {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - fly camera")
            .with_window_size(1200, 800)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        let phases = RenderPhases::install(world)?;
        phases.install_default_systems(world)?;

        world.add_system("fly_camera_system", phases.update, fly_camera_system)?;
        world.add_system("render_scene_system", phases.render_3d, render_scene_system)?;
        world.add_system("hud_system", phases.render_2d, hud_system)?;

        world.set(MainContext {
            camera: Camera3D::perspective(CAMERA_START, Vec3::ZERO, 60.0),
        });
        // Facing the origin horizontally, level pitch.
        world.set(FlyCamera {
            yaw: (-CAMERA_START.x).atan2(-CAMERA_START.z),
            ..FlyCamera::default()
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(headless: &HeadlessRunner<FlyCameraDemo>) -> Camera3D {
        headless.singleton::<MainContext>().unwrap().camera
    }

    #[test]
    fn scene_and_hud_are_drawn() {
        let mut headless = HeadlessRunner::new(FlyCameraDemo::new()).unwrap();
        let frame = headless.frame().unwrap().to_vec();

        assert!(frame.contains(&DrawCommand::Sphere {
            center: Vec3::ZERO,
            radius: 1.0,
            color: Color::RED,
        }));
        assert!(frame.contains(&DrawCommand::Grid { slices: 20, spacing: 5.0 }));
        assert!(frame.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "Step: 1   Pos: 12.00, 10.00, 12.00"
        )));
        assert!(matches!(frame.last(), Some(DrawCommand::Fps { .. })));

        let mut list = DrawList::new();
        list.extend(frame);
        assert_eq!(list.validate(), Ok(()));
    }

    #[test]
    fn starts_looking_level_towards_the_origin() {
        let mut headless = HeadlessRunner::new(FlyCameraDemo::new()).unwrap();
        headless.frame().unwrap();
        let cam = camera(&headless);
        let forward = cam.target - cam.position;
        assert!(forward.y.abs() < 1e-5);
        let expected = Vec3::new(-1.0, 0.0, -1.0).normalize();
        assert!((forward - expected).length() < 1e-4);
    }

    #[test]
    fn w_flies_towards_the_origin() {
        let mut headless = HeadlessRunner::new(FlyCameraDemo::new()).unwrap().with_dt(1.0);
        headless.key_down(Key::W);
        headless.frame().unwrap();

        let moved = camera(&headless).position - CAMERA_START;
        assert!((moved.length() - 10.0).abs() < 1e-3);
        assert!(moved.x < 0.0 && moved.z < 0.0);
    }

    #[test]
    fn right_drag_hides_the_cursor() {
        let mut headless = HeadlessRunner::new(FlyCameraDemo::new()).unwrap();
        headless.mouse_move(600.0, 400.0).mouse_down(MouseButton::Right);
        headless.frame().unwrap();
        headless.mouse_move(700.0, 400.0);
        let frame = headless.frame().unwrap().to_vec();
        assert!(frame.contains(&DrawCommand::ShowCursor(false)));

        headless.mouse_up(MouseButton::Right);
        let frame = headless.frame().unwrap().to_vec();
        assert!(frame.contains(&DrawCommand::ShowCursor(true)));
    }
}
