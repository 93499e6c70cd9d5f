//=========================================================================
// Systems Manager
//=========================================================================
//
// Owns the game's systems and runs them once per tick.
//
// Execution order is ascending priority; systems with equal priority run
// in the order they were added. Priority is sampled once, on `add`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::World;
use crate::core::memory::IdMap;

//=== System ==============================================================

/// Per-tick behavior operating on the [`World`].
pub trait System: Send {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn on_attach(&mut self, _world: &mut World) {}

    fn update(&mut self, world: &mut World, dt: f64);

    fn on_detach(&mut self, _world: &mut World) {}
}

/// Handle returned by [`SystemsManager::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(u64);

//=== SystemsManager ======================================================

struct SystemEntry {
    system: Box<dyn System>,
    priority: i32,
    enabled: bool,
}

#[derive(Default)]
pub struct SystemsManager {
    systems: IdMap<SystemEntry>,
    order: Vec<u64>,
}

impl SystemsManager {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Registration -----------------------------------------------------

    /// Adds `system`, running its `on_attach` hook immediately.
    pub fn add<S: System + 'static>(&mut self, world: &mut World, system: S) -> SystemId {
        self.add_boxed(world, Box::new(system))
    }

    pub fn add_boxed(&mut self, world: &mut World, mut system: Box<dyn System>) -> SystemId {
        system.on_attach(world);
        let priority = system.priority();
        debug!(target: "ecs", "attached system '{}' (priority {})", system.name(), priority);

        let id = self.systems.insert(SystemEntry {
            system,
            priority,
            enabled: true,
        });
        self.order.push(id);
        self.resort();
        SystemId(id)
    }

    /// Removes a system, running its `on_detach` hook.
    pub fn remove(&mut self, world: &mut World, id: SystemId) -> Option<Box<dyn System>> {
        let mut entry = self.systems.remove(id.0)?;
        self.order.retain(|&other| other != id.0);

        entry.system.on_detach(world);
        debug!(target: "ecs", "detached system '{}'", entry.system.name());
        Some(entry.system)
    }

    /// Detaches every system, last-run first.
    pub fn clear(&mut self, world: &mut World) {
        for id in std::mem::take(&mut self.order).into_iter().rev() {
            if let Some(mut entry) = self.systems.remove(id) {
                entry.system.on_detach(world);
            }
        }
    }

    fn resort(&mut self) {
        let systems = &self.systems;
        self.order.sort_by_key(|&id| {
            let priority = systems.get(id).map(|entry| entry.priority).unwrap_or(0);
            (priority, id)
        });
    }

    //--- Enable / Disable -------------------------------------------------

    /// Returns `false` if `id` is unknown.
    pub fn set_enabled(&mut self, id: SystemId, enabled: bool) -> bool {
        match self.systems.get_mut(id.0) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, id: SystemId) -> bool {
        self.systems.get(id.0).map(|entry| entry.enabled).unwrap_or(false)
    }

    //--- Execution --------------------------------------------------------

    /// Runs every enabled system once. Returns how many ran.
    pub fn update_all(&mut self, world: &mut World, dt: f64) -> usize {
        let mut ran = 0;
        for &id in &self.order {
            let Some(entry) = self.systems.get_mut(id) else {
                continue;
            };
            if !entry.enabled {
                continue;
            }
            trace!(target: "ecs", "running system '{}'", entry.system.name());
            entry.system.update(world, dt);
            ran += 1;
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder {
        label: &'static str,
        priority: i32,
        log: Log,
    }

    impl System for Recorder {
        fn name(&self) -> &str {
            self.label
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_attach(&mut self, _world: &mut World) {
            self.log.lock().unwrap().push(format!("attach {}", self.label));
        }

        fn update(&mut self, _world: &mut World, _dt: f64) {
            self.log.lock().unwrap().push(self.label.to_string());
        }

        fn on_detach(&mut self, _world: &mut World) {
            self.log.lock().unwrap().push(format!("detach {}", self.label));
        }
    }

    fn recorder(label: &'static str, priority: i32, log: &Log) -> Recorder {
        Recorder {
            label,
            priority,
            log: Arc::clone(log),
        }
    }

    fn updates(log: &Log) -> Vec<String> {
        log.lock()
            .unwrap()
            .iter()
            .filter(|entry| !entry.contains(' '))
            .cloned()
            .collect()
    }

    #[test]
    fn runs_in_priority_then_insertion_order() {
        let log = Log::default();
        let mut world = World::default();
        let mut systems = SystemsManager::new();

        systems.add(&mut world, recorder("render", 10, &log));
        systems.add(&mut world, recorder("input", -5, &log));
        systems.add(&mut world, recorder("physics", 0, &log));
        systems.add(&mut world, recorder("ai", 0, &log));

        assert_eq!(systems.update_all(&mut world, 0.016), 4);
        assert_eq!(updates(&log), vec!["input", "physics", "ai", "render"]);
    }

    #[test]
    fn disabled_systems_are_skipped() {
        let log = Log::default();
        let mut world = World::default();
        let mut systems = SystemsManager::new();

        let a = systems.add(&mut world, recorder("a", 0, &log));
        systems.add(&mut world, recorder("b", 0, &log));

        assert!(systems.set_enabled(a, false));
        assert!(!systems.is_enabled(a));
        assert_eq!(systems.update_all(&mut world, 0.0), 1);
        assert_eq!(updates(&log), vec!["b"]);
    }

    #[test]
    fn lifecycle_hooks_run_on_add_and_remove() {
        let log = Log::default();
        let mut world = World::default();
        let mut systems = SystemsManager::new();

        let id = systems.add(&mut world, recorder("a", 0, &log));
        let removed = systems.remove(&mut world, id);

        assert_eq!(removed.map(|s| s.name().to_string()), Some("a".to_string()));
        assert!(systems.remove(&mut world, id).is_none());
        assert!(!systems.set_enabled(id, true));
        assert!(systems.is_empty());
        assert_eq!(*log.lock().unwrap(), vec!["attach a", "detach a"]);
    }

    #[test]
    fn clear_detaches_in_reverse_order() {
        let log = Log::default();
        let mut world = World::default();
        let mut systems = SystemsManager::new();

        systems.add(&mut world, recorder("first", 0, &log));
        systems.add(&mut world, recorder("second", 1, &log));
        log.lock().unwrap().clear();

        systems.clear(&mut world);
        assert_eq!(*log.lock().unwrap(), vec!["detach second", "detach first"]);
        assert_eq!(systems.len(), 0);
    }

    #[test]
    fn systems_can_mutate_world() {
        struct Spawner;
        impl System for Spawner {
            fn update(&mut self, world: &mut World, _dt: f64) {
                world.spawn();
            }
        }

        let mut world = World::default();
        let mut systems = SystemsManager::new();
        systems.add(&mut world, Spawner);

        systems.update_all(&mut world, 0.0);
        systems.update_all(&mut world, 0.0);
        assert_eq!(world.entities().len(), 2);
    }
}
