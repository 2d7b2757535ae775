// ecs/mod.rs
//
// Entity storage is hecs. On top of it: singletons, phase-ordered systems and
// parent/child links, which is everything the demos need from an ECS.

pub mod hierarchy;
pub mod pipeline;
pub mod singleton;
pub mod world;

pub use hierarchy::{Children, Parent};
pub use pipeline::{PhaseId, Pipeline, SystemFn};
pub use singleton::Singletons;
pub use world::{Name, SystemContext, World};

/// A system that only announces itself. Handy while wiring phases.
pub fn trace_system(ctx: &mut SystemContext<'_>) {
    log::info!("system {}", ctx.name());
}
