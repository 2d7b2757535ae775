// extensions/mod.rs
//
// Optional systems layered on the ECS core. Games opt in by registering them.

pub mod transform;

pub use transform::{
    mark_hierarchy_dirty, propagate_transforms, transform_system, update_hierarchy, Transform3D,
};
