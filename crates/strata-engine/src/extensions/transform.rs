// extensions/transform.rs
//
// Hierarchical 3D transforms: local position/rotation/scale, cached local and
// world matrices, and a dirty flag that cascades from parent to children.
//
// Usage:
//   let parent = world.spawn((Transform3D::new().with_position(Vec3::ZERO),));
//   let child = world.spawn((Transform3D::new().with_position(Vec3::X * 2.0),));
//   world.set_parent(child, parent)?;
//   propagate_transforms(world.entities());   // or register `transform_system`

use glam::{Mat4, Quat, Vec3};
use hecs::{Entity, World};

use crate::ecs::hierarchy::{children_of, parent_of};
use crate::ecs::SystemContext;

/// Local transform plus cached matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Scale relative to the parent.
    pub scale: Vec3,
    /// `T * R * S` from the fields above, valid once clean.
    pub local_matrix: Mat4,
    /// `parent.world_matrix * local_matrix`, valid once clean.
    pub world_matrix: Mat4,
    /// Set when the matrices need recomputing.
    pub dirty: bool,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl Transform3D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.dirty = true;
    }

    /// Scale first, then rotate, then translate.
    pub fn compute_local(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Translation part of the cached world matrix.
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }
}

/// Flag `entity` and every descendant carrying a `Transform3D` as dirty.
/// A descendant without the component ends the cascade along its branch.
pub fn mark_hierarchy_dirty(world: &World, entity: Entity) {
    match world.get::<&mut Transform3D>(entity) {
        Ok(mut t) => t.dirty = true,
        Err(_) => return,
    }
    for child in children_of(world, entity) {
        mark_hierarchy_dirty(world, child);
    }
}

/// Recompute `entity` if dirty, cascading into its children.
/// Returns the number of transforms recomputed.
fn update_transform(world: &World, entity: Entity, parent_world: Option<Mat4>) -> usize {
    let (recomputed, world_matrix) = {
        let Ok(mut t) = world.get::<&mut Transform3D>(entity) else {
            return 0;
        };
        let recomputed = t.dirty;
        if recomputed {
            t.local_matrix = t.compute_local();
            t.world_matrix = match parent_world {
                Some(parent) => parent * t.local_matrix,
                None => t.local_matrix,
            };
            t.dirty = false;
        }
        (recomputed, t.world_matrix)
    };

    let mut count = usize::from(recomputed);
    for child in children_of(world, entity) {
        if recomputed {
            if let Ok(mut ct) = world.get::<&mut Transform3D>(child) {
                ct.dirty = true;
            }
        }
        count += update_transform(world, child, Some(world_matrix));
    }
    count
}

/// Update the subtree rooted at `root`. The root's world matrix is taken to
/// be its parent's (if the parent has a `Transform3D`) times its local matrix.
pub fn update_hierarchy(world: &World, root: Entity) -> usize {
    let parent_world = parent_of(world, root)
        .and_then(|p| world.get::<&Transform3D>(p).ok().map(|t| t.world_matrix));
    update_transform(world, root, parent_world)
}

/// True for transforms whose parent is missing or carries no `Transform3D`.
fn is_transform_root(world: &World, entity: Entity) -> bool {
    match parent_of(world, entity) {
        Some(parent) => world.get::<&Transform3D>(parent).is_err(),
        None => true,
    }
}

/// Walk every transform tree once. Returns how many transforms changed.
pub fn propagate_transforms(world: &World) -> usize {
    let roots: Vec<Entity> = world
        .query::<&Transform3D>()
        .iter()
        .map(|(e, _)| e)
        .collect();
    roots
        .into_iter()
        .filter(|&e| is_transform_root(world, e))
        .map(|root| update_transform(world, root, None))
        .sum()
}

/// System wrapper around `propagate_transforms`.
pub fn transform_system(ctx: &mut SystemContext<'_>) {
    let updated = propagate_transforms(ctx.entities());
    if updated > 0 {
        log::trace!("{}: {} transforms updated", ctx.name(), updated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::hierarchy::set_parent;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    fn cube_tree() -> (World, Entity, Entity, Entity) {
        let mut world = World::new();
        let parent = world.spawn((Transform3D::new(),));
        let child = world.spawn((Transform3D::new()
            .with_position(Vec3::new(2.0, 0.0, 0.0))
            .with_scale(Vec3::splat(0.5)),));
        let sub = world.spawn((Transform3D::new()
            .with_position(Vec3::new(2.0, 2.0, 0.0))
            .with_scale(Vec3::splat(0.5)),));
        set_parent(&mut world, child, parent).unwrap();
        set_parent(&mut world, sub, child).unwrap();
        (world, parent, child, sub)
    }

    fn get(world: &World, e: Entity) -> Transform3D {
        *world.get::<&Transform3D>(e).unwrap()
    }

    #[test]
    fn local_matrix_is_trs() {
        let t = Transform3D::new()
            .with_position(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::splat(2.0));
        // Scale then rotate +X onto -Z, then translate.
        let p = t.compute_local().transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(1.0, 2.0, 1.0)), "got {p:?}");
    }

    #[test]
    fn propagate_composes_parent_world() {
        let (world, parent, child, sub) = cube_tree();
        assert_eq!(propagate_transforms(&world), 3);

        assert!(approx(get(&world, parent).world_position(), Vec3::ZERO));
        assert!(approx(get(&world, child).world_position(), Vec3::new(2.0, 0.0, 0.0)));
        // Grandchild offset is scaled by the child's 0.5.
        assert!(approx(get(&world, sub).world_position(), Vec3::new(3.0, 1.0, 0.0)));

        for e in [parent, child, sub] {
            assert!(!get(&world, e).dirty);
        }
    }

    #[test]
    fn clean_tree_is_not_recomputed() {
        let (world, ..) = cube_tree();
        propagate_transforms(&world);
        assert_eq!(propagate_transforms(&world), 0);
    }

    #[test]
    fn dirty_parent_cascades_to_children() {
        let (world, parent, child, sub) = cube_tree();
        propagate_transforms(&world);

        world
            .get::<&mut Transform3D>(parent)
            .unwrap()
            .set_position(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(propagate_transforms(&world), 3);
        assert!(approx(get(&world, child).world_position(), Vec3::new(2.0, 5.0, 0.0)));
        assert!(approx(get(&world, sub).world_position(), Vec3::new(3.0, 6.0, 0.0)));
    }

    #[test]
    fn dirty_child_leaves_parent_alone() {
        let (world, parent, child, sub) = cube_tree();
        propagate_transforms(&world);

        world
            .get::<&mut Transform3D>(child)
            .unwrap()
            .translate(Vec3::new(0.0, 0.0, 1.0));
        // Child and grandchild only.
        assert_eq!(propagate_transforms(&world), 2);
        assert!(approx(get(&world, parent).world_position(), Vec3::ZERO));
        assert!(approx(get(&world, sub).world_position(), Vec3::new(3.0, 1.0, 1.0)));
    }

    #[test]
    fn world_matrix_invariant_holds() {
        let (world, parent, child, sub) = cube_tree();
        world
            .get::<&mut Transform3D>(parent)
            .unwrap()
            .set_rotation(Quat::from_rotation_z(0.3));
        propagate_transforms(&world);

        for (p, c) in [(parent, child), (child, sub)] {
            let pt = get(&world, p);
            let ct = get(&world, c);
            let expected = pt.world_matrix * ct.local_matrix;
            assert!(ct.world_matrix.abs_diff_eq(expected, 1e-5));
        }
    }

    #[test]
    fn mark_hierarchy_dirty_reaches_descendants() {
        let (world, parent, child, sub) = cube_tree();
        propagate_transforms(&world);
        mark_hierarchy_dirty(&world, parent);
        for e in [parent, child, sub] {
            assert!(get(&world, e).dirty);
        }
    }

    #[test]
    fn update_hierarchy_on_subtree_uses_parent_world() {
        let (world, parent, child, _) = cube_tree();
        world
            .get::<&mut Transform3D>(parent)
            .unwrap()
            .set_position(Vec3::new(10.0, 0.0, 0.0));
        propagate_transforms(&world);

        world.get::<&mut Transform3D>(child).unwrap().dirty = true;
        assert_eq!(update_hierarchy(&world, child), 2);
        assert!(approx(get(&world, child).world_position(), Vec3::new(12.0, 0.0, 0.0)));
    }

    #[test]
    fn transform_under_plain_entity_is_a_root() {
        let mut world = World::new();
        let group = world.spawn(());
        let cube = world.spawn((Transform3D::new().with_position(Vec3::Y),));
        set_parent(&mut world, cube, group).unwrap();
        assert_eq!(propagate_transforms(&world), 1);
        assert!(approx(get(&world, cube).world_position(), Vec3::Y));
    }
}
