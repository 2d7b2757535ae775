use glam::Vec3;

use crate::ecs::SystemContext;
use crate::extensions::transform::Transform3D;
use crate::renderer::{Color, DrawCommand, DrawList};

/// A box drawn as wireframe. Without a `Transform3D`, `position` places it in
/// world space; with one, the box is drawn in the transform's frame and
/// `position` is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub position: Vec3,
    pub size: Vec3,
    pub color: Color,
}

impl Shape {
    pub fn cube(position: Vec3, size: f32, color: Color) -> Self {
        Self {
            position,
            size: Vec3::splat(size),
            color,
        }
    }
}

/// Record every `Shape`. Needs to run inside 3D mode.
pub fn render_shapes_system(ctx: &mut SystemContext<'_>) {
    let Some(mut list) = ctx.singleton_mut::<DrawList>() else { return };
    let world = ctx.entities();
    for (_, (shape, transform)) in world.query::<(&Shape, Option<&Transform3D>)>().iter() {
        match transform {
            Some(t) => {
                list.push(DrawCommand::PushMatrix(t.world_matrix));
                list.cube_wires(Vec3::ZERO, shape.size, shape.color);
                list.push(DrawCommand::PopMatrix);
            }
            None => list.cube_wires(shape.position, shape.size, shape.color),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{PhaseId, World};

    #[test]
    fn shapes_with_transforms_use_the_matrix_stack() {
        let mut world = World::new();
        world.set(DrawList::new());
        world.spawn((Shape::cube(Vec3::new(3.0, 0.0, 0.0), 1.0, Color::GREEN),));
        world.spawn((
            Shape::cube(Vec3::ZERO, 1.0, Color::RED),
            Transform3D::new().with_position(Vec3::Y),
        ));
        world
            .add_system("render_shapes_system", PhaseId::ON_STORE, render_shapes_system)
            .unwrap();
        world.progress(0.0).unwrap();

        let list = world.get::<DrawList>().unwrap();
        let pushes = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::PushMatrix(_)))
            .count();
        assert_eq!(pushes, 1);
        assert!(list.commands().contains(&DrawCommand::CubeWires {
            position: Vec3::new(3.0, 0.0, 0.0),
            size: Vec3::ONE,
            color: Color::GREEN,
        }));
    }
}
