//! The stage interface and the ordered collection the worker drives.

use std::fmt;

use delve_component::Components;
use tracing::trace;

/// One simulation stage.
///
/// `update` is called once per tick, under the session lock, and must run
/// to completion without blocking.
pub trait System: Send {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn update(&mut self, components: &mut Components, tick: u64);
}

/// Stages executed in a fixed order every tick.
///
/// A stage always sees every mutation made by the stages before it in the
/// same tick.
#[derive(Default)]
pub struct SystemCollection {
    systems: Vec<Box<dyn System>>,
}

impl SystemCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, builder style.
    #[must_use]
    pub fn with(mut self, system: impl System + 'static) -> Self {
        self.push(system);
        self
    }

    /// Append a stage after the existing ones.
    pub fn push(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Run every stage once, in order.
    pub fn update(&mut self, components: &mut Components, tick: u64) {
        for system in &mut self.systems {
            trace!(tick, system = system.name(), "running stage");
            system.update(components, tick);
        }
    }
}

impl fmt::Debug for SystemCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemCollection")
            .field("systems", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use delve_component::{Health, Position};

    use super::*;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<(&'static str, u64)>>>,
    }

    impl System for Record {
        fn name(&self) -> &'static str {
            self.name
        }

        fn update(&mut self, _components: &mut Components, tick: u64) {
            self.log.lock().unwrap().push((self.name, tick));
        }
    }

    /// Moves every positioned entity one step right.
    struct Step;

    impl System for Step {
        fn name(&self) -> &'static str {
            "step"
        }

        fn update(&mut self, components: &mut Components, _tick: u64) {
            for position in components.components_mut::<Position>() {
                position.x += 1;
            }
        }
    }

    /// Copies the x coordinate into health, to observe what `Step` did.
    struct Observe;

    impl System for Observe {
        fn name(&self) -> &'static str {
            "observe"
        }

        fn update(&mut self, components: &mut Components, _tick: u64) {
            for e in components.entities_with::<Position>() {
                let x = components.get::<Position>(e).map_or(0, |p| p.x);
                if let Some(health) = components.get_mut::<Health>(e) {
                    health.hp = x;
                }
            }
        }
    }

    #[test]
    fn test_empty_collection() {
        let mut systems = SystemCollection::new();
        assert!(systems.is_empty());
        systems.update(&mut Components::new(), 1);
    }

    #[test]
    fn test_runs_in_insertion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut systems = SystemCollection::new()
            .with(Record {
                name: "a",
                log: Arc::clone(&log),
            })
            .with(Record {
                name: "b",
                log: Arc::clone(&log),
            });
        systems.push(Record {
            name: "c",
            log: Arc::clone(&log),
        });
        assert_eq!(systems.names(), vec!["a", "b", "c"]);

        let mut components = Components::new();
        systems.update(&mut components, 1);
        systems.update(&mut components, 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec![("a", 1), ("b", 1), ("c", 1), ("a", 2), ("b", 2), ("c", 2)]
        );
    }

    #[test]
    fn test_later_stage_sees_earlier_mutations() {
        let mut components = Components::new();
        let e = components.create_entity();
        components.create::<Position>(e);
        components.create::<Health>(e);

        let mut systems = SystemCollection::new().with(Step).with(Observe);
        systems.update(&mut components, 1);
        assert_eq!(components.get::<Health>(e).unwrap().hp, 1);
        systems.update(&mut components, 2);
        assert_eq!(components.get::<Health>(e).unwrap().hp, 2);
    }

    #[test]
    fn test_debug_lists_names() {
        let systems = SystemCollection::new().with(Step);
        assert_eq!(
            format!("{systems:?}"),
            r#"SystemCollection { systems: ["step"] }"#
        );
    }
}
