// ecs/world.rs
//
// The world: hecs entities, typed singletons and the system pipeline.

use std::cell::{Ref, RefMut};

use hecs::{DynamicBundle, Entity};

use crate::core::error::{EngineError, Result};
use crate::ecs::hierarchy;
use crate::ecs::pipeline::{PhaseId, Pipeline, SystemFn};
use crate::ecs::singleton::Singletons;

/// Human-readable entity name, used by `World::lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// Entities, singletons and the system pipeline in one place.
///
/// Entity storage is a plain `hecs::World`; reach for `entities()` when a
/// query is needed. Singletons are typed, one value per type.
pub struct World {
    entities: hecs::World,
    singletons: Singletons,
    pipeline: Pipeline,
    frame: u64,
}

/// What a system sees while it runs.
pub struct SystemContext<'a> {
    pub world: &'a mut World,
    name: &'a str,
    delta_time: f32,
}

impl<'a> SystemContext<'a> {
    /// Seconds since the previous `progress` call.
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Name the running system was registered under.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Frame number of the running `progress` call, starting at zero.
    pub fn frame(&self) -> u64 {
        self.world.frame
    }

    pub fn entities(&self) -> &hecs::World {
        &self.world.entities
    }

    pub fn has<T: 'static>(&self) -> bool {
        self.world.has::<T>()
    }

    pub fn singleton<T: 'static>(&self) -> Option<Ref<'_, T>> {
        self.world.get::<T>()
    }

    pub fn singleton_mut<T: 'static>(&self) -> Option<RefMut<'_, T>> {
        self.world.get_mut::<T>()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            entities: hecs::World::new(),
            singletons: Singletons::new(),
            pipeline: Pipeline::new(),
            frame: 0,
        }
    }

    // -- Entities --

    pub fn entities(&self) -> &hecs::World {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut hecs::World {
        &mut self.entities
    }

    pub fn spawn(&mut self, components: impl DynamicBundle) -> Entity {
        self.entities.spawn(components)
    }

    /// Spawn an entity carrying a `Name` in addition to `components`.
    pub fn spawn_named(&mut self, name: &str, components: impl DynamicBundle) -> Entity {
        let e = self.entities.spawn(components);
        // The entity was just spawned, so the insert cannot miss.
        let _ = self.entities.insert_one(e, Name(name.to_string()));
        e
    }

    pub fn lookup(&self, name: &str) -> Option<Entity> {
        self.entities
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(e, _)| e)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    /// Attach `child` under `parent`. See `hierarchy::set_parent`.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<()> {
        hierarchy::set_parent(&mut self.entities, child, parent)
    }

    /// Despawn `entity` and everything below it.
    pub fn despawn(&mut self, entity: Entity) -> Result<()> {
        if !self.entities.contains(entity) {
            return Err(EngineError::NoSuchEntity(entity));
        }
        let doomed = hierarchy::descendants(&self.entities, entity);
        hierarchy::remove_parent(&mut self.entities, entity);
        for e in doomed.into_iter().rev() {
            let _ = self.entities.despawn(e);
        }
        self.entities
            .despawn(entity)
            .map_err(|_| EngineError::NoSuchEntity(entity))
    }

    // -- Singletons --

    pub fn set<T: 'static>(&mut self, value: T) -> Option<T> {
        self.singletons.set(value)
    }

    pub fn has<T: 'static>(&self) -> bool {
        self.singletons.has::<T>()
    }

    pub fn get<T: 'static>(&self) -> Option<Ref<'_, T>> {
        self.singletons.get::<T>()
    }

    pub fn get_mut<T: 'static>(&self) -> Option<RefMut<'_, T>> {
        self.singletons.get_mut::<T>()
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.singletons.remove::<T>()
    }

    // -- Pipeline --

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut Pipeline {
        &mut self.pipeline
    }

    pub fn add_phase(&mut self, name: &str) -> Result<PhaseId> {
        self.pipeline.add_phase(name)
    }

    pub fn depends_on(&mut self, phase: PhaseId, dependency: PhaseId) -> Result<()> {
        self.pipeline.depends_on(phase, dependency)
    }

    pub fn add_system<F>(&mut self, name: &str, phase: PhaseId, system: F) -> Result<()>
    where
        F: FnMut(&mut SystemContext<'_>) + 'static,
    {
        self.pipeline.add_system(name, phase, Box::new(system) as SystemFn)
    }

    pub fn set_system_enabled(&mut self, name: &str, enabled: bool) -> bool {
        self.pipeline.set_enabled(name, enabled)
    }

    /// Number of completed `progress` calls.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run every enabled system once, in pipeline order.
    /// Returns how many systems ran.
    pub fn progress(&mut self, delta_time: f32) -> Result<usize> {
        let order = self.pipeline.system_order()?;

        let mut ran = 0;
        for index in order {
            // Read the flag live: an earlier system may have toggled this one.
            let entry = &mut self.pipeline.systems[index];
            if !entry.enabled {
                continue;
            }
            let Some(mut run) = entry.run.take() else { continue };
            let name = entry.name.clone();
            let mut ctx = SystemContext {
                world: self,
                name: &name,
                delta_time,
            };
            run(&mut ctx);
            self.pipeline.systems[index].run = Some(run);
            ran += 1;
        }

        self.frame += 1;
        Ok(ran)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
