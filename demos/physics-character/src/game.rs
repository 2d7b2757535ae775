use glam::{Quat, Vec3};
use hecs::Entity;
use strata_engine::*;

pub const SPHERE_START: Vec3 = Vec3::new(0.0, 10.0, 0.0);
pub const SPHERE_VELOCITY: Vec3 = Vec3::new(0.0, -5.0, 0.0);
pub const SPHERE_RADIUS: f32 = 0.5;
/// Beside the sphere's drop line, so the two never meet on the way down.
pub const CHARACTER_START: Vec3 = Vec3::new(0.0, 5.0, 3.0);

const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -1.0, 0.0);
const FLOOR_HALF_EXTENTS: Vec3 = Vec3::new(100.0, 1.0, 100.0);

/// Singleton: handles to the simulated bodies.
#[derive(Debug, Clone, Copy)]
pub struct CharacterScene {
    pub sphere: Entity,
    pub sphere_body: PhysicsBody,
}

fn character_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let (Some(input), Some(mut character), Some(mut physics)) = (
        ctx.singleton::<InputState>(),
        ctx.singleton_mut::<Character>(),
        ctx.singleton_mut::<PhysicsWorld>(),
    ) else {
        log::trace!("{}: missing Character/PhysicsWorld, skip", ctx.name());
        return;
    };
    let intent = CharacterInput::from_keys(&input);
    character.update(&mut physics, &intent, dt);
}

fn reset_sphere_system(ctx: &mut SystemContext<'_>) {
    let pressed = ctx
        .singleton::<InputState>()
        .map(|i| i.is_key_pressed(Key::R))
        .unwrap_or(false);
    if !pressed {
        return;
    }
    let (Some(scene), Some(mut physics)) = (
        ctx.singleton::<CharacterScene>(),
        ctx.singleton_mut::<PhysicsWorld>(),
    ) else {
        return;
    };
    physics.set_position_and_rotation(&scene.sphere_body, SPHERE_START, Quat::IDENTITY);
    physics.set_linear_velocity(&scene.sphere_body, SPHERE_VELOCITY);
    physics.set_angular_velocity(&scene.sphere_body, Vec3::ZERO);
    log::info!("sphere reset");
}

fn render_scene_system(ctx: &mut SystemContext<'_>) {
    let sphere = ctx.singleton::<CharacterScene>().map(|s| s.sphere);
    let character = ctx.singleton::<Character>().map(|c| c.position());
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };

    let size = FLOOR_HALF_EXTENTS * 2.0;
    list.cube(FLOOR_POSITION, size, Color::GREEN);
    list.cube_wires(FLOOR_POSITION, size, Color::DARKGREEN);
    if let Some(sphere) = sphere {
        if let Ok(t) = ctx.entities().get::<&Transform3D>(sphere) {
            list.sphere(t.position, SPHERE_RADIUS, Color::RED);
        }
    }
    if let Some(position) = character {
        list.sphere_wires(position, 1.0, Color::BLACK);
    }
    list.grid(20, 5.0);
}

fn hud_system(ctx: &mut SystemContext<'_>) {
    let dt = ctx.delta_time();
    let (Some(scene), Some(physics)) = (
        ctx.singleton::<CharacterScene>(),
        ctx.singleton::<PhysicsWorld>(),
    ) else {
        return;
    };
    let pos = physics.center_of_mass_position(&scene.sphere_body);
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    list.text(
        format!("Step: {:.0}   Pos: {:.2}, {:.2}, {:.2}", dt * 60.0, pos.x, pos.y, pos.z),
        10.0,
        10.0,
        20.0,
        Color::DARKGRAY,
    );
    list.fps(10.0, 40.0);
}

/// A virtual character on the floor next to a dropped sphere.
pub struct PhysicsCharacter;

impl PhysicsCharacter {
    pub fn new() -> Self {
        Self
    }
}

impl Game for PhysicsCharacter {
    fn config(&self) -> GameConfig {
        GameConfig::default()
            .with_title("strata - physics character")
            .with_window_size(1200, 800)
    }

    fn init(&mut self, world: &mut World) -> Result<()> {
        let phases = RenderPhases::install(world)?;
        phases.install_default_systems(world)?;

        // The character moves against last step's world, then physics steps.
        world.add_system("character_system", phases.update, character_system)?;
        world.add_system("reset_sphere_system", phases.update, reset_sphere_system)?;
        world.add_system("physics_step_system", phases.update, physics_step_system)?;
        world.add_system("render_scene_system", phases.render_3d, render_scene_system)?;
        world.add_system("hud_system", phases.render_2d, hud_system)?;

        let mut physics = match world.get::<GameConfig>() {
            Some(config) => config.physics_world(),
            None => PhysicsWorld::default(),
        };
        physics.create_body(
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
                .with_linear_velocity(SPHERE_VELOCITY),
        );
        world
            .entities_mut()
            .insert_one(sphere, sphere_body)
            .map_err(|_| EngineError::NoSuchEntity(sphere))?;

        world.set(physics);
        world.set(CharacterScene { sphere, sphere_body });
        world.set(Character::new(CharacterSettings::default(), CHARACTER_START));
        world.set(MainContext {
            camera: Camera3D::perspective(Vec3::new(15.0, 12.0, 15.0), Vec3::ZERO, 45.0),
        });
        log::info!("physics-character: init loop");
        Ok(())
    }
}
