// ecs/hierarchy.rs
//
// Parent/child relationships stored as plain components on the hecs world.
// `Parent` points up, `Children` lists direct children in insertion order.

use hecs::{Entity, World};

use crate::core::error::{EngineError, Result};

/// The entity this one is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Direct children, in the order they were attached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Children(pub Vec<Entity>);

pub fn parent_of(world: &World, entity: Entity) -> Option<Entity> {
    world.get::<&Parent>(entity).ok().map(|p| p.0)
}

pub fn children_of(world: &World, entity: Entity) -> Vec<Entity> {
    world
        .get::<&Children>(entity)
        .map(|c| c.0.clone())
        .unwrap_or_default()
}

/// True if `ancestor` appears on the parent chain of `entity`.
pub fn is_ancestor(world: &World, ancestor: Entity, entity: Entity) -> bool {
    let mut current = parent_of(world, entity);
    while let Some(p) = current {
        if p == ancestor {
            return true;
        }
        current = parent_of(world, p);
    }
    false
}

/// Attach `child` under `parent`, detaching it from any previous parent.
pub fn set_parent(world: &mut World, child: Entity, parent: Entity) -> Result<()> {
    if !world.contains(child) {
        return Err(EngineError::NoSuchEntity(child));
    }
    if !world.contains(parent) {
        return Err(EngineError::NoSuchEntity(parent));
    }
    if child == parent || is_ancestor(world, child, parent) {
        return Err(EngineError::HierarchyCycle { child, parent });
    }

    remove_parent(world, child);
    world
        .insert_one(child, Parent(parent))
        .map_err(|_| EngineError::NoSuchEntity(child))?;

    let has_children = world.get::<&Children>(parent).is_ok();
    if has_children {
        if let Ok(mut children) = world.get::<&mut Children>(parent) {
            children.0.push(child);
        }
    } else {
        world
            .insert_one(parent, Children(vec![child]))
            .map_err(|_| EngineError::NoSuchEntity(parent))?;
    }
    Ok(())
}

/// Detach `child` from its parent, making it a root. Returns the old parent.
pub fn remove_parent(world: &mut World, child: Entity) -> Option<Entity> {
    let parent = world.remove_one::<Parent>(child).ok()?.0;
    if let Ok(mut children) = world.get::<&mut Children>(parent) {
        children.0.retain(|&c| c != child);
    }
    Some(parent)
}

/// Every live entity without a `Parent`.
pub fn roots(world: &World) -> Vec<Entity> {
    world
        .iter()
        .filter(|e| !e.has::<Parent>())
        .map(|e| e.entity())
        .collect()
}

/// All descendants of `entity`, depth-first pre-order, excluding `entity`.
pub fn descendants(world: &World, entity: Entity) -> Vec<Entity> {
    let mut out = Vec::new();
    let mut stack: Vec<Entity> = children_of(world, entity).into_iter().rev().collect();
    while let Some(e) = stack.pop() {
        out.push(e);
        stack.extend(children_of(world, e).into_iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_levels() -> (World, Entity, Entity, Entity) {
        let mut world = World::new();
        let root = world.spawn(());
        let child = world.spawn(());
        let grandchild = world.spawn(());
        set_parent(&mut world, child, root).unwrap();
        set_parent(&mut world, grandchild, child).unwrap();
        (world, root, child, grandchild)
    }

    #[test]
    fn parent_child_relationship() {
        let (world, root, child, grandchild) = three_levels();
        assert_eq!(parent_of(&world, child), Some(root));
        assert_eq!(children_of(&world, root), vec![child]);
        assert_eq!(descendants(&world, root), vec![child, grandchild]);
        assert_eq!(roots(&world), vec![root]);
        assert!(is_ancestor(&world, root, grandchild));
    }

    #[test]
    fn reparent_moves_between_children_lists() {
        let (mut world, root, child, grandchild) = three_levels();
        set_parent(&mut world, grandchild, root).unwrap();
        assert_eq!(children_of(&world, root), vec![child, grandchild]);
        assert!(children_of(&world, child).is_empty());
    }

    #[test]
    fn cycles_are_rejected() {
        let (mut world, root, _child, grandchild) = three_levels();
        assert!(matches!(
            set_parent(&mut world, root, grandchild),
            Err(EngineError::HierarchyCycle { .. })
        ));
        assert!(matches!(
            set_parent(&mut world, root, root),
            Err(EngineError::HierarchyCycle { .. })
        ));
        assert_eq!(parent_of(&world, root), None);
    }

    #[test]
    fn dead_entities_are_rejected() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        world.despawn(b).unwrap();
        assert!(matches!(set_parent(&mut world, a, b), Err(EngineError::NoSuchEntity(e)) if e == b));
    }

    #[test]
    fn remove_parent_makes_root() {
        let (mut world, root, child, _) = three_levels();
        assert_eq!(remove_parent(&mut world, child), Some(root));
        assert!(children_of(&world, root).is_empty());
        assert_eq!(roots(&world).len(), 2);
    }
}
