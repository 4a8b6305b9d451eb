//! Per-kind storage cells.
//!
//! A [`ComponentStore<T>`] owns a growable array of records of one concrete
//! type together with that kind's [`KillPolicy`]. The registry holds one
//! cell per kind behind the object-safe [`ErasedStore`] trait, so the
//! entity-wide operations (kill, destroy, contains) dispatch without knowing
//! `T`.
//!
//! Records are kept in creation order. Erasing shifts later records down,
//! so indices are not stable across mutations; callers resolve an entity to
//! its record on every access instead of holding on to positions.

use std::any::Any;

use tracing::warn;

use crate::component::sealed::Sealed;
use crate::component::{Component, ComponentKind, KillPolicy};
use crate::entity::Entity;

/// Backing array and kill policy for one component kind.
#[derive(Debug)]
pub struct ComponentStore<T: Component> {
    items: Vec<T>,
    kill: KillPolicy<T>,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store using the kind's own kill policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(T::kill_policy())
    }

    /// Create an empty store with an explicit kill policy.
    #[must_use]
    pub fn with_policy(kill: KillPolicy<T>) -> Self {
        Self {
            items: Vec::new(),
            kill,
        }
    }

    /// Append a default-initialised record owned by `entity`.
    ///
    /// Duplicates are not rejected. Lookups only ever return the first
    /// record for an entity, so a second one stays hidden until the first
    /// is erased.
    pub fn create(&mut self, entity: Entity) -> &mut T {
        if cfg!(debug_assertions) && self.position(entity).is_some() {
            warn!(kind = %T::KIND, %entity, "entity already has a component of this kind");
        }
        let mut record = T::default();
        record.bind(entity);
        self.items.push(record);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    /// All records, in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// All records, mutably. The slice cannot outlive the borrow of the
    /// store, so it cannot be held across a create or erase.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Iterate over `(owner, record)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.items.iter().map(|c| (c.entity(), c))
    }

    /// Index of the first record owned by `entity`.
    #[must_use]
    pub fn position(&self, entity: Entity) -> Option<usize> {
        self.items.iter().position(|c| c.entity() == entity)
    }

    /// First record owned by `entity`.
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.items.iter().find(|c| c.entity() == entity)
    }

    /// First record owned by `entity`, mutably.
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.items.iter_mut().find(|c| c.entity() == entity)
    }

    /// Remove and return the first record owned by `entity`.
    pub fn erase(&mut self, entity: Entity) -> Option<T> {
        let index = self.position(entity)?;
        Some(self.items.remove(index))
    }

    /// Keep only the records matching `keep`, preserving order. Returns
    /// the removed records.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> Vec<T> {
        let (kept, removed): (Vec<T>, Vec<T>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|record| keep(record));
        self.items = kept;
        removed
    }

    /// Apply this kind's kill policy to `entity`.
    pub fn kill(&mut self, entity: Entity) {
        match self.kill {
            KillPolicy::Erase => {
                self.erase(entity);
            }
            KillPolicy::Flag(mark) => {
                if let Some(record) = self.get_mut(entity) {
                    mark(record);
                }
            }
        }
    }

    /// The kill policy this store was built with.
    #[must_use]
    pub fn kill_policy(&self) -> KillPolicy<T> {
        self.kill
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStore`].
///
/// This is the uniform interface the registry uses to treat every cell the
/// same way. Typed access goes through [`ErasedStore::as_any`] and a
/// downcast to the concrete store.
pub trait ErasedStore: Send + Sync {
    /// The kind held by this store.
    fn kind(&self) -> ComponentKind;

    /// Number of records.
    fn len(&self) -> usize;

    /// Returns `true` if the store holds no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a default-initialised record for `entity` and return it for
    /// downcasting to the kind's record type.
    fn create_default(&mut self, entity: Entity) -> &mut dyn Any;

    /// Returns `true` if `entity` has a record here.
    fn contains(&self, entity: Entity) -> bool;

    /// Erase the first record owned by `entity`. Returns whether one existed.
    fn erase(&mut self, entity: Entity) -> bool;

    /// Apply the kill policy to `entity`.
    fn kill(&mut self, entity: Entity);

    /// Owners of every record, in storage order.
    fn entities(&self) -> Vec<Entity>;

    /// JSON snapshot of the first record owned by `entity`.
    fn snapshot(&self, entity: Entity) -> Option<serde_json::Value>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn kind(&self) -> ComponentKind {
        T::KIND
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn create_default(&mut self, entity: Entity) -> &mut dyn Any {
        self.create(entity)
    }

    fn contains(&self, entity: Entity) -> bool {
        self.position(entity).is_some()
    }

    fn erase(&mut self, entity: Entity) -> bool {
        ComponentStore::erase(self, entity).is_some()
    }

    fn kill(&mut self, entity: Entity) {
        ComponentStore::kill(self, entity);
    }

    fn entities(&self) -> Vec<Entity> {
        self.items.iter().map(|c| c.entity()).collect()
    }

    fn snapshot(&self, entity: Entity) -> Option<serde_json::Value> {
        let record = self.get(entity)?;
        match serde_json::to_value(record) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(kind = %T::KIND, %entity, error = %e, "failed to snapshot component");
                None
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{Health, Position, Tile};

    #[test]
    fn test_create_stamps_entity_and_defaults() {
        let mut store = ComponentStore::<Position>::new();
        let pos = store.create(Entity(3));
        assert_eq!(pos.entity(), Entity(3));
        assert_eq!((pos.x, pos.y), (0, 0));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_returns_first_match() {
        let mut store = ComponentStore::<Health>::new();
        store.create(Entity(1)).hp = 5;
        store.create(Entity(1)).hp = 9;
        assert_eq!(store.get(Entity(1)).map(|h| h.hp), Some(5));

        store.erase(Entity(1));
        assert_eq!(store.get(Entity(1)).map(|h| h.hp), Some(9));
    }

    #[test]
    fn test_erase_preserves_order() {
        let mut store = ComponentStore::<Health>::new();
        for id in 1..=4 {
            store.create(Entity(id)).hp = id as i32;
        }
        assert_eq!(store.erase(Entity(2)).map(|h| h.hp), Some(2));
        let hps: Vec<i32> = store.as_slice().iter().map(|h| h.hp).collect();
        assert_eq!(hps, vec![1, 3, 4]);
    }

    #[test]
    fn test_erase_absent_is_noop() {
        let mut store = ComponentStore::<Health>::new();
        store.create(Entity(1));
        assert!(store.erase(Entity(2)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_retain_removes_matching_records_only() {
        let mut store = ComponentStore::<Tile>::new();
        store.create(Entity(1)).name = "live".to_string();
        store.create(Entity(1)).destroyed = true;
        store.create(Entity(2)).destroyed = true;
        store.create(Entity(3)).name = "other".to_string();

        let removed = store.retain(|tile| !tile.destroyed);
        let owners: Vec<Entity> = removed.iter().map(|t| t.entity()).collect();
        assert_eq!(owners, vec![Entity(1), Entity(2)]);

        let names: Vec<&str> = store.as_slice().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["live", "other"]);
    }

    #[test]
    fn test_kill_erase_policy_removes() {
        let mut store = ComponentStore::<Health>::new();
        store.create(Entity(1));
        store.kill(Entity(1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_kill_flag_policy_keeps_record() {
        let mut store = ComponentStore::<Tile>::new();
        store.create(Entity(1));
        store.kill(Entity(1));
        assert_eq!(store.len(), 1);
        assert!(store.as_slice()[0].destroyed);
    }

    #[test]
    fn test_explicit_policy_overrides_kind_default() {
        let mut store = ComponentStore::<Tile>::with_policy(KillPolicy::Erase);
        store.create(Entity(1));
        store.kill(Entity(1));
        assert!(store.is_empty());
    }

    #[test]
    fn test_erased_interface() {
        let mut store: Box<dyn ErasedStore> = Box::new(ComponentStore::<Position>::new());
        store.create_default(Entity(4));
        store
            .create_default(Entity(5))
            .downcast_mut::<Position>()
            .unwrap()
            .x = 9;
        assert_eq!(store.kind(), ComponentKind::Position);
        assert!(store.contains(Entity(4)));
        assert_eq!(store.entities(), vec![Entity(4), Entity(5)]);
        assert!(store.erase(Entity(4)));
        assert!(!store.erase(Entity(4)));
        assert_eq!(store.len(), 1);

        let typed = store
            .as_any()
            .downcast_ref::<ComponentStore<Position>>()
            .unwrap();
        assert_eq!(typed.as_slice()[0].entity(), Entity(5));
        assert_eq!(typed.as_slice()[0].x, 9);
    }

    #[test]
    fn test_snapshot() {
        let mut store = ComponentStore::<Position>::new();
        let pos = store.create(Entity(2));
        pos.x = 4;
        pos.y = -1;
        let value = ErasedStore::snapshot(&store, Entity(2)).unwrap();
        assert_eq!(value["entity"], 2);
        assert_eq!(value["x"], 4);
        assert_eq!(value["y"], -1);
        assert!(ErasedStore::snapshot(&store, Entity(3)).is_none());
    }
}
