use glam::{Quat, Vec3};
use hecs::Entity;
use strata_engine::*;

pub const CAMERA_START: Vec3 = Vec3::new(12.0, 10.0, 12.0);
pub const SPHERE_START: Vec3 = Vec3::new(0.0, 10.0, 0.0);
pub const SPHERE_VELOCITY: Vec3 = Vec3::new(0.0, -5.0, 0.0);
pub const SPHERE_RADIUS: f32 = 0.5;
/// Camera position relative to the sphere while following it.
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(12.0, 10.0, 12.0);

const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -1.0, 0.0);
const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(100.0, 1.0, 100.0);

/// Singleton: the bodies the demo drives directly.
#[derive(Debug, Clone, Copy)]
pub struct BallScene {
    pub sphere: Entity,
    pub sphere_body: PhysicsBody,
    pub floor: Entity,
}

/// Singleton: free-fly spectator, or a camera trailing the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraMode {
    pub spectator: bool,
}

/// R puts the sphere back at the top, falling again.
fn reset_sphere_system(ctx: &mut SystemContext<'_>) {
    let pressed = ctx
        .singleton::<InputState>()
        .map(|i| i.is_key_pressed(Key::R))
        .unwrap_or(false);
    if !pressed {
        return;
    }
    let (Some(scene), Some(mut physics)) = (ctx.singleton::<BallScene>(), ctx.singleton_mut::<PhysicsWorld>())
    else {
        return;
    };
    physics.set_position_and_rotation(&scene.sphere_body, SPHERE_START, Quat::IDENTITY);
    physics.set_linear_velocity(&scene.sphere_body, SPHERE_VELOCITY);
    physics.set_angular_velocity(&scene.sphere_body, Vec3::ZERO);
    log::info!("sphere reset");
}

/// Key One flips between spectator and follow camera.
fn camera_mode_system(ctx: &mut SystemContext<'_>) {
    let pressed = ctx
        .singleton::<InputState>()
        .map(|i| i.is_key_pressed(Key::One))
        .unwrap_or(false);
    if !pressed {
        return;
    }
    let (Some(mut mode), Some(main)) = (ctx.singleton_mut::<CameraMode>(), ctx.singleton::<MainContext>()) else {
        return;
    };
    mode.spectator = !mode.spectator;
    log::info!("is_spectator {}", mode.spectator);
    if mode.spectator {
        // Pick up the view where the follow camera left it.
        let speed_multiplier = ctx.singleton::<FlyCamera>().map(|f| f.speed_multiplier).unwrap_or(1.0);
        let fly = FlyCamera {
            speed_multiplier,
            ..FlyCamera::looking_at(main.camera.position, main.camera.target)
        };
        drop((mode, main));
        ctx.world.set(fly);
    }
}

fn camera_system(ctx: &mut SystemContext<'_>) {
    let spectator = ctx.singleton::<CameraMode>().map(|m| m.spectator).unwrap_or(false);
    if spectator {
        fly_camera_system(ctx);
        return;
    }

    let (Some(scene), Some(physics), Some(mut main)) = (
        ctx.singleton::<BallScene>(),
        ctx.singleton::<PhysicsWorld>(),
        ctx.singleton_mut::<MainContext>(),
    ) else {
        return;
    };
    let sphere = physics.center_of_mass_position(&scene.sphere_body);
    main.camera.target = sphere;
    main.camera.position = sphere + FOLLOW_OFFSET;
    if let Some(mut list) = ctx.singleton_mut::<DrawList>() {
        list.push(DrawCommand::ShowCursor(true));
    }
}

fn render_scene_system(ctx: &mut SystemContext<'_>) {
    let Some(scene) = ctx.singleton::<BallScene>() else { return };
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    let world = ctx.entities();

    if let Ok(floor) = world.get::<&Transform3D>(scene.floor) {
        let size = FLOOR_HALF_EXTENTS * 2.0;
        list.cube(floor.world_position(), size, Color::GREEN);
        list.cube_wires(floor.world_position(), size, Color::DARKGREEN);
    }
    if let Ok(sphere) = world.get::<&Transform3D>(scene.sphere) {
        list.sphere(sphere.world_position(), SPHERE_RADIUS, Color::RED);
    }
    list.grid(20, 5.0);
}

fn hud_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let (Some(scene), Some(physics)) = (ctx.singleton::<BallScene>(), ctx.singleton::<PhysicsWorld>()) else {
        return;
    };
    let pos = physics.center_of_mass_position(&scene.sphere_body);
    let spectator = ctx.singleton::<CameraMode>().map(|m| m.spectator).unwrap_or(false);
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.text(
        format!("Step: {:.0}   Pos: {:.2}, {:.2}, {:.2}", dt * 60.0, pos.x, pos.y, pos.z),
        10.0,
        10.0,
        20.0,
        Color::DARKGRAY,
    );
    list.fps(10.0, 40.0);
    let mode = if spectator { "spectator" } else { "follow" };
    list.text(
        format!("Camera: {}  (1 toggles, R resets)", mode),
        10.0,
        70.0,
        20.0,
        Color::DARKGRAY,
    );
}

/// A sphere dropped onto a static floor.
pub struct PhysicsCamera;

impl PhysicsCamera {
    pub fn new() -> Self {
        Self
    }
}

impl Game for PhysicsCamera {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - physics camera")
            .with_window_size(1200, 800)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        let phases = RenderPhases::install(world)?;
        phases.install_default_systems(world)?;

        world.add_system("reset_sphere_system", phases.update, reset_sphere_system)?;
        world.add_system("camera_mode_system", phases.update, camera_mode_system)?;
        world.add_system("physics_step_system", phases.update, physics_step_system)?;
        world.add_system("transform_system", phases.update, transform_system)?;
        world.add_system("camera_system", phases.update, camera_system)?;
        world.add_system("render_scene_system", phases.render_3d, render_scene_system)?;
        world.add_system("hud_system", phases.render_2d, hud_system)?;

        let mut physics = match world.get::<GameConfig>() {
            Some(config) => config.physics_world(),
            None => PhysicsWorld::default(),
        };

        let floor = world.spawn_named("floor", (Transform3D::new().with_position(FLOOR_POSITION),));
        let floor_body = physics.create_body_for(
            floor,
            &BodyDesc::fixed(ShapeDesc::Box {
                half_extents: FLOOR_HALF_EXTENTS,
            })
            .with_position(FLOOR_POSITION),
        );

        let sphere = world.spawn_named("sphere", (Transform3D::new().with_position(SPHERE_START),));
        let sphere_body = physics.create_body_for(
            sphere,
            &BodyDesc::dynamic(ShapeDesc::Sphere { radius: SPHERE_RADIUS })
                .with_position(SPHERE_START)
                .with_linear_velocity(SPHERE_VELOCITY)
                .with_restitution(0.5),
        );

        world.entities_mut().insert_one(floor, floor_body).map_err(|_| EngineError::NoSuchEntity(floor))?;
        world.entities_mut().insert_one(sphere, sphere_body).map_err(|_| EngineError::NoSuchEntity(sphere))?;
        log::info!("physics-camera: {} bodies", physics.body_count());

        world.set(physics);
        world.set(BallScene {
            sphere,
            sphere_body,
            floor,
        });
        world.set(CameraMode::default());
        world.set(MainContext {
            camera: Camera3D::perspective(CAMERA_START, Vec3::ZERO, 60.0),
        });
        world.set(FlyCamera::looking_at(CAMERA_START, Vec3::ZERO));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere_position(headless: &HeadlessRunner<PhysicsCamera>) -> Vec3 {
        let scene = *headless.singleton::<BallScene>().unwrap();
        let physics = headless.singleton::<PhysicsWorld>().unwrap();
        physics.center_of_mass_position(&scene.sphere_body)
    }

    fn camera(headless: &HeadlessRunner<PhysicsCamera>) -> Camera3D {
        headless.singleton::<MainContext>().unwrap().camera
    }

    #[test]
    fn sphere_falls_and_settles_on_the_floor() {
        let mut headless = HeadlessRunner::new(PhysicsCamera::new()).unwrap();
        headless.frames(30).unwrap();
        let falling = sphere_position(&headless);
        assert!(falling.y < 10.0 && falling.y > 0.5, "y = {}", falling.y);

        headless.frames(900).unwrap();
        let resting = sphere_position(&headless);
        assert!((resting.y - SPHERE_RADIUS).abs() < 0.05, "y = {}", resting.y);
        assert!(resting.x.abs() < 1e-3 && resting.z.abs() < 1e-3);
    }

    #[test]
    fn transform_follows_the_body() {
        let mut headless = HeadlessRunner::new(PhysicsCamera::new()).unwrap();
        headless.frames(20).unwrap();
        let body = sphere_position(&headless);
        let scene = *headless.singleton::<BallScene>().unwrap();
        let world = headless.world();
        let t = world.entities().get::<&Transform3D>(scene.sphere).unwrap();
        assert!((t.world_position() - body).length() < 1e-4);
    }

    #[test]
    fn r_resets_the_sphere() {
        let mut headless = HeadlessRunner::new(PhysicsCamera::new()).unwrap();
        headless.frames(120).unwrap();
        assert!(sphere_position(&headless).y < 5.0);

        headless.key_down(Key::R);
        headless.frame().unwrap();
        let y = sphere_position(&headless).y;
        // One step after the reset.
        assert!(y > 9.8 && y < 10.0, "y = {}", y);
    }

    #[test]
    fn follow_camera_tracks_the_sphere() {
        let mut headless = HeadlessRunner::new(PhysicsCamera::new()).unwrap();
        headless.frames(10).unwrap();
        let sphere = sphere_position(&headless);
        let cam = camera(&headless);
        assert!((cam.target - sphere).length() < 1e-4);
        assert!((cam.position - (sphere + FOLLOW_OFFSET)).length() < 1e-4);
    }

    #[test]
    fn key_one_switches_to_spectator() {
        let mut headless = HeadlessRunner::new(PhysicsCamera::new()).unwrap().with_dt(1.0 / 60.0);
        headless.key_down(Key::One);
        headless.frame().unwrap();
        assert!(headless.singleton::<CameraMode>().unwrap().spectator);

        // The spectator camera stays put while the sphere keeps falling.
        headless.key_up(Key::One);
        let before = camera(&headless).position;
        headless.frames(10).unwrap();
        assert!((camera(&headless).position - before).length() < 1e-4);

        // ...and flies with W.
        headless.key_down(Key::W);
        headless.frames(6).unwrap();
        let moved = (camera(&headless).position - before).length();
        assert!((moved - 1.0).abs() < 1e-2, "moved {}", moved);

        headless.key_up(Key::W).key_down(Key::One);
        headless.frame().unwrap();
        assert!(!headless.singleton::<CameraMode>().unwrap().spectator);
    }

    #[test]
    fn frame_draws_floor_sphere_and_hud() {
        let mut headless = HeadlessRunner::new(PhysicsCamera::new()).unwrap();
        let frame = headless.frame().unwrap().to_vec();
        assert!(frame.contains(&DrawCommand::Cube {
            position: FLOOR_POSITION,
            size: Vec3::new(200.0, 2.0, 200.0),
            color: Color::GREEN,
        }));
        assert!(frame.iter().any(|c| matches!(c, DrawCommand::Sphere { radius, .. } if *radius == SPHERE_RADIUS)));
        assert!(frame.iter().any(|c| matches!(c, DrawCommand::Text { text, .. } if text.starts_with("Step: 1   Pos: "))));

        let mut list = DrawList::new();
        list.extend(frame);
        assert_eq!(list.validate(), Ok(()));
    }
}
