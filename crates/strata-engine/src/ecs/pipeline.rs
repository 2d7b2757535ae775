// ecs/pipeline.rs
//
// Phases and systems. A phase is a named bucket of systems; phases are ordered
// by their `depends_on` edges, systems inside a phase run in registration order.
//
// Usage:
//   let update = world.add_phase("Update")?;
//   world.depends_on(update, PhaseId::ON_UPDATE)?;
//   world.add_system("player_input_system", update, player_input_system)?;
//   world.progress(dt)?;

use std::collections::BTreeSet;

use crate::core::error::{EngineError, Result};
use crate::ecs::world::SystemContext;

/// Handle to a registered phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhaseId(pub(crate) u32);

impl PhaseId {
    pub const ON_LOAD: PhaseId = PhaseId(0);
    pub const POST_LOAD: PhaseId = PhaseId(1);
    pub const PRE_UPDATE: PhaseId = PhaseId(2);
    pub const ON_UPDATE: PhaseId = PhaseId(3);
    pub const ON_VALIDATE: PhaseId = PhaseId(4);
    pub const POST_UPDATE: PhaseId = PhaseId(5);
    pub const PRE_STORE: PhaseId = PhaseId(6);
    pub const ON_STORE: PhaseId = PhaseId(7);
}

const BUILTIN_PHASES: [&str; 8] = [
    "OnLoad",
    "PostLoad",
    "PreUpdate",
    "OnUpdate",
    "OnValidate",
    "PostUpdate",
    "PreStore",
    "OnStore",
];

/// A system body. Receives the world, the frame delta and its own name.
pub type SystemFn = Box<dyn FnMut(&mut SystemContext<'_>)>;

struct PhaseNode {
    name: String,
    depends_on: Vec<PhaseId>,
}

pub(crate) struct SystemEntry {
    pub(crate) name: String,
    pub(crate) phase: PhaseId,
    pub(crate) enabled: bool,
    /// Lent out to `World::progress` while the system runs.
    pub(crate) run: Option<SystemFn>,
}

pub struct Pipeline {
    phases: Vec<PhaseNode>,
    pub(crate) systems: Vec<SystemEntry>,
    /// Cached execution order (indices into `systems`). `None` = stale.
    order: Option<Vec<usize>>,
}

impl Pipeline {
    /// A pipeline holding only the built-in phases, chained in order.
    pub fn new() -> Self {
        let phases = BUILTIN_PHASES
            .iter()
            .enumerate()
            .map(|(i, name)| PhaseNode {
                name: (*name).to_string(),
                depends_on: if i == 0 { Vec::new() } else { vec![PhaseId(i as u32 - 1)] },
            })
            .collect();
        Self {
            phases,
            systems: Vec::new(),
            order: None,
        }
    }

    /// Register a new phase with no dependencies.
    pub fn add_phase(&mut self, name: &str) -> Result<PhaseId> {
        if self.phase_id(name).is_some() {
            return Err(EngineError::DuplicatePhase(name.to_string()));
        }
        let id = PhaseId(self.phases.len() as u32);
        self.phases.push(PhaseNode {
            name: name.to_string(),
            depends_on: Vec::new(),
        });
        self.order = None;
        Ok(id)
    }

    /// Make `phase` run after `dependency`. Rejected if it would close a cycle.
    pub fn depends_on(&mut self, phase: PhaseId, dependency: PhaseId) -> Result<()> {
        self.check_phase(phase)?;
        self.check_phase(dependency)?;

        let node = &mut self.phases[phase.0 as usize];
        if node.depends_on.contains(&dependency) {
            return Ok(());
        }
        node.depends_on.push(dependency);

        if let Err(err) = self.phase_order() {
            self.phases[phase.0 as usize].depends_on.retain(|&d| d != dependency);
            return Err(err);
        }
        self.order = None;
        Ok(())
    }

    pub fn phase_id(&self, name: &str) -> Option<PhaseId> {
        self.phases
            .iter()
            .position(|p| p.name == name)
            .map(|i| PhaseId(i as u32))
    }

    pub fn phase_name(&self, phase: PhaseId) -> Option<&str> {
        self.phases.get(phase.0 as usize).map(|p| p.name.as_str())
    }

    /// Register a system in `phase`. Names need not be unique, but
    /// `set_enabled` addresses every system sharing the name.
    pub fn add_system(&mut self, name: &str, phase: PhaseId, run: SystemFn) -> Result<()> {
        self.check_phase(phase)?;
        log::debug!(
            "register system `{}` in phase `{}`",
            name,
            self.phases[phase.0 as usize].name
        );
        self.systems.push(SystemEntry {
            name: name.to_string(),
            phase,
            enabled: true,
            run: Some(run),
        });
        self.order = None;
        Ok(())
    }

    /// Enable or disable every system called `name`. Returns false if none matched.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        let mut found = false;
        for system in self.systems.iter_mut().filter(|s| s.name == name) {
            system.enabled = enabled;
            found = true;
        }
        found
    }

    pub fn is_enabled(&self, name: &str) -> Option<bool> {
        self.systems.iter().find(|s| s.name == name).map(|s| s.enabled)
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Phases in execution order: topological over `depends_on`, ties broken
    /// by creation order.
    pub fn phase_order(&self) -> Result<Vec<PhaseId>> {
        let n = self.phases.len();
        let mut pending: Vec<usize> = self.phases.iter().map(|p| p.depends_on.len()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
        for (i, node) in self.phases.iter().enumerate() {
            for dep in &node.depends_on {
                dependents[dep.0 as usize].push(i);
            }
        }

        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(i) = ready.pop_first() {
            order.push(PhaseId(i as u32));
            for &next in &dependents[i] {
                pending[next] -= 1;
                if pending[next] == 0 {
                    ready.insert(next);
                }
            }
        }

        if order.len() < n {
            return Err(EngineError::PhaseCycle(self.find_cycle(&pending)));
        }
        Ok(order)
    }

    /// Indices into `systems`, in execution order. Cached until phases or
    /// systems change.
    pub(crate) fn system_order(&mut self) -> Result<Vec<usize>> {
        if let Some(order) = &self.order {
            return Ok(order.clone());
        }

        let phases = self.phase_order()?;
        let mut order = Vec::with_capacity(self.systems.len());
        for phase in &phases {
            log::debug!("phase `{}`", self.phases[phase.0 as usize].name);
            order.extend(
                self.systems
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| s.phase == *phase)
                    .map(|(i, _)| i),
            );
        }
        self.order = Some(order.clone());
        Ok(order)
    }

    /// Names of enabled systems in the order `progress` would run them.
    pub fn system_names(&mut self) -> Result<Vec<String>> {
        let order = self.system_order()?;
        Ok(order
            .into_iter()
            .filter(|&i| self.systems[i].enabled)
            .map(|i| self.systems[i].name.clone())
            .collect())
    }

    fn check_phase(&self, phase: PhaseId) -> Result<()> {
        if (phase.0 as usize) < self.phases.len() {
            Ok(())
        } else {
            Err(EngineError::UnknownPhase(format!("#{}", phase.0)))
        }
    }

    /// Walk dependency edges among the unresolved phases until one repeats.
    fn find_cycle(&self, pending: &[usize]) -> Vec<String> {
        let Some(start) = pending.iter().position(|&p| p > 0) else {
            return Vec::new();
        };
        let mut path = vec![start];
        let mut current = start;
        loop {
            let next = self.phases[current]
                .depends_on
                .iter()
                .map(|d| d.0 as usize)
                .find(|&d| pending[d] > 0);
            let Some(next) = next else { break };
            if let Some(pos) = path.iter().position(|&p| p == next) {
                let mut cycle: Vec<String> = path[pos..]
                    .iter()
                    .map(|&i| self.phases[i].name.clone())
                    .collect();
                cycle.push(self.phases[next].name.clone());
                return cycle;
            }
            path.push(next);
            current = next;
        }
        path.into_iter().map(|i| self.phases[i].name.clone()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> SystemFn {
        Box::new(|_ctx| {})
    }

    #[test]
    fn builtin_phases_are_chained() {
        let p = Pipeline::new();
        let order = p.phase_order().unwrap();
        assert_eq!(order.first(), Some(&PhaseId::ON_LOAD));
        assert_eq!(order.last(), Some(&PhaseId::ON_STORE));
        assert_eq!(p.phase_name(PhaseId::ON_UPDATE), Some("OnUpdate"));
    }

    #[test]
    fn custom_phase_runs_after_dependency() {
        let mut p = Pipeline::new();
        let draw = p.add_phase("Draw").unwrap();
        let update = p.add_phase("Update").unwrap();
        p.depends_on(update, PhaseId::ON_UPDATE).unwrap();
        p.depends_on(draw, update).unwrap();

        let order = p.phase_order().unwrap();
        let pos = |id| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(PhaseId::ON_UPDATE) < pos(update));
        assert!(pos(update) < pos(draw));
    }

    #[test]
    fn systems_follow_phase_then_registration_order() {
        let mut p = Pipeline::new();
        let late = p.add_phase("Late").unwrap();
        p.depends_on(late, PhaseId::ON_STORE).unwrap();

        p.add_system("c", late, noop()).unwrap();
        p.add_system("a", PhaseId::ON_UPDATE, noop()).unwrap();
        p.add_system("b", PhaseId::ON_UPDATE, noop()).unwrap();
        p.add_system("first", PhaseId::ON_LOAD, noop()).unwrap();

        assert_eq!(p.system_names().unwrap(), vec!["first", "a", "b", "c"]);
    }

    #[test]
    fn cycle_is_rejected_and_rolled_back() {
        let mut p = Pipeline::new();
        let a = p.add_phase("A").unwrap();
        let b = p.add_phase("B").unwrap();
        p.depends_on(b, a).unwrap();

        let err = p.depends_on(a, b).unwrap_err();
        match err {
            EngineError::PhaseCycle(names) => {
                assert!(names.contains(&"A".to_string()));
                assert!(names.contains(&"B".to_string()));
            }
            other => panic!("expected PhaseCycle, got {other:?}"),
        }
        // Graph still usable after the rejected edge.
        assert!(p.phase_order().is_ok());
    }

    #[test]
    fn duplicate_and_unknown_phases() {
        let mut p = Pipeline::new();
        assert!(matches!(p.add_phase("OnUpdate"), Err(EngineError::DuplicatePhase(_))));
        assert!(matches!(
            p.add_system("x", PhaseId(99), noop()),
            Err(EngineError::UnknownPhase(_))
        ));
        assert!(matches!(
            p.depends_on(PhaseId(42), PhaseId::ON_LOAD),
            Err(EngineError::UnknownPhase(_))
        ));
    }

    #[test]
    fn disabled_systems_are_skipped_in_names() {
        let mut p = Pipeline::new();
        p.add_system("a", PhaseId::ON_UPDATE, noop()).unwrap();
        p.add_system("b", PhaseId::ON_UPDATE, noop()).unwrap();
        assert!(p.set_enabled("a", false));
        assert!(!p.set_enabled("missing", false));
        assert_eq!(p.system_names().unwrap(), vec!["b"]);
        assert_eq!(p.is_enabled("a"), Some(false));
    }

    #[test]
    fn cached_order_picks_up_new_phases_and_systems() {
        let mut p = Pipeline::new();
        p.add_system("update", PhaseId::ON_UPDATE, noop()).unwrap();
        p.add_system("store", PhaseId::ON_STORE, noop()).unwrap();
        assert_eq!(p.system_names().unwrap(), vec!["update", "store"]);

        let validate = p.add_phase("LateValidate").unwrap();
        p.depends_on(validate, PhaseId::ON_VALIDATE).unwrap();
        p.depends_on(PhaseId::POST_UPDATE, validate).unwrap();
        p.add_system("check", validate, noop()).unwrap();
        assert_eq!(p.system_names().unwrap(), vec!["update", "check", "store"]);
    }
}
