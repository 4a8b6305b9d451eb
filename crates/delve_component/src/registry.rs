//! The component registry.
//!
//! [`Components`] owns the entity allocator and one storage cell per
//! [`ComponentKind`]. It is the whole mutable state of a game session: the
//! worker's stages and the network input path reach every record through
//! it, always while holding the session lock.
//!
//! Typed operations (`create::<T>`, `get::<T>`, ...) resolve the cell by
//! `T::KIND` and downcast it. Tag-dispatched operations (`create_of_kind`,
//! `destroy_of_kind`, ...) go through [`ErasedStore`] and serve callers that
//! only know the kind at runtime.

use std::any::Any;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::component::{Component, ComponentKind, KillPolicy};
use crate::entity::{Entity, EntityAllocator};
use crate::error::ComponentError;
use crate::kinds::{
    Collider, Generator, Health, Hero, Input, Monster, Pickup, Position, Reward, Tile, Weapon,
};
use crate::store::{ComponentStore, ErasedStore};

/// Entity allocator plus one storage cell per component kind.
pub struct Components {
    allocator: EntityAllocator,
    cells: HashMap<ComponentKind, Box<dyn ErasedStore>>,
}

impl Components {
    /// Create a registry with every kind registered under its own kill
    /// policy.
    #[must_use]
    pub fn new() -> Self {
        let mut components = Self::empty();
        components.insert_cell(ComponentStore::<Collider>::new());
        components.insert_cell(ComponentStore::<Generator>::new());
        components.insert_cell(ComponentStore::<Health>::new());
        components.insert_cell(ComponentStore::<Hero>::new());
        components.insert_cell(ComponentStore::<Input>::new());
        components.insert_cell(ComponentStore::<Monster>::new());
        components.insert_cell(ComponentStore::<Pickup>::new());
        components.insert_cell(ComponentStore::<Position>::new());
        components.insert_cell(ComponentStore::<Reward>::new());
        components.insert_cell(ComponentStore::<Tile>::new());
        components.insert_cell(ComponentStore::<Weapon>::new());
        debug!(kinds = components.cells.len(), "component registry built");
        components
    }

    /// Create a registry with no kinds registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            cells: HashMap::new(),
        }
    }

    /// Register storage for `T` with an explicit kill policy.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::AlreadyRegistered`] if `T` already has a
    /// cell.
    pub fn register<T: Component>(&mut self, kill: KillPolicy<T>) -> Result<(), ComponentError> {
        if self.cells.contains_key(&T::KIND) {
            return Err(ComponentError::AlreadyRegistered(T::KIND));
        }
        self.insert_cell(ComponentStore::with_policy(kill));
        Ok(())
    }

    fn insert_cell<T: Component>(&mut self, store: ComponentStore<T>) {
        self.cells.insert(T::KIND, Box::new(store));
    }

    /// Returns `true` if `kind` has a storage cell.
    #[must_use]
    pub fn is_registered(&self, kind: ComponentKind) -> bool {
        self.cells.contains_key(&kind)
    }

    // -- Entities --

    /// Mint a new entity id. Ids start at 1 and are never reused.
    pub fn create_entity(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Number of entity ids handed out so far.
    #[must_use]
    pub fn entities_allocated(&self) -> u64 {
        self.allocator.count()
    }

    /// Apply every kind's kill policy to `entity`.
    ///
    /// Kinds with the default policy lose their record immediately; kinds
    /// with a flagging policy (tiles) keep a marked record until something
    /// destroys it explicitly.
    pub fn kill_entity(&mut self, entity: Entity) {
        trace!(%entity, "killing entity");
        for cell in self.cells.values_mut() {
            cell.kill(entity);
        }
    }

    /// Erase every component of `entity`, ignoring kill policies.
    pub fn destroy_entity(&mut self, entity: Entity) {
        trace!(%entity, "destroying entity");
        for cell in self.cells.values_mut() {
            cell.erase(entity);
        }
    }

    // -- Typed access --

    /// The storage cell for `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Unregistered`] if `T` has no cell.
    pub fn try_store<T: Component>(&self) -> Result<&ComponentStore<T>, ComponentError> {
        self.cells
            .get(&T::KIND)
            .ok_or(ComponentError::Unregistered(T::KIND))?
            .as_any()
            .downcast_ref::<ComponentStore<T>>()
            .ok_or(ComponentError::KindMismatch {
                kind: T::KIND,
                requested: std::any::type_name::<T>(),
            })
    }

    /// The storage cell for `T`, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::Unregistered`] if `T` has no cell.
    pub fn try_store_mut<T: Component>(
        &mut self,
    ) -> Result<&mut ComponentStore<T>, ComponentError> {
        self.cells
            .get_mut(&T::KIND)
            .ok_or(ComponentError::Unregistered(T::KIND))?
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .ok_or(ComponentError::KindMismatch {
                kind: T::KIND,
                requested: std::any::type_name::<T>(),
            })
    }

    /// The storage cell for `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered. [`Components::new`] registers
    /// every kind, so this only happens with a hand-assembled registry.
    #[must_use]
    pub fn store<T: Component>(&self) -> &ComponentStore<T> {
        match self.try_store() {
            Ok(store) => store,
            Err(e) => panic!("{e}"),
        }
    }

    /// The storage cell for `T`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `T` was never registered.
    pub fn store_mut<T: Component>(&mut self) -> &mut ComponentStore<T> {
        match self.try_store_mut() {
            Ok(store) => store,
            Err(e) => panic!("{e}"),
        }
    }

    /// Append a default record of type `T` for `entity` and return it.
    pub fn create<T: Component>(&mut self, entity: Entity) -> &mut T {
        self.store_mut::<T>().create(entity)
    }

    /// Every record of type `T`, valid until the next mutation of the
    /// registry.
    #[must_use]
    pub fn components<T: Component>(&self) -> &[T] {
        self.store::<T>().as_slice()
    }

    /// Every record of type `T`, mutably.
    pub fn components_mut<T: Component>(&mut self) -> &mut [T] {
        self.store_mut::<T>().as_mut_slice()
    }

    /// Owners of every `T` record, in storage order. The returned list is
    /// detached from the store, so a stage can walk it while creating or
    /// destroying components.
    #[must_use]
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.store::<T>().iter().map(|(entity, _)| entity).collect()
    }

    /// The first `T` record owned by `entity`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>().get(entity)
    }

    /// The first `T` record owned by `entity`, mutably.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>().get_mut(entity)
    }

    /// Erase the first `T` record owned by `entity`, if any.
    pub fn destroy<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.store_mut::<T>().erase(entity)
    }

    /// Number of `T` records.
    #[must_use]
    pub fn count<T: Component>(&self) -> usize {
        self.store::<T>().len()
    }

    // -- Tag-dispatched access --

    fn cell(&self, kind: ComponentKind) -> &dyn ErasedStore {
        match self.cells.get(&kind) {
            Some(cell) => cell.as_ref(),
            None => panic!("{}", ComponentError::Unregistered(kind)),
        }
    }

    fn cell_mut(&mut self, kind: ComponentKind) -> &mut dyn ErasedStore {
        match self.cells.get_mut(&kind) {
            Some(cell) => cell.as_mut(),
            None => panic!("{}", ComponentError::Unregistered(kind)),
        }
    }

    /// Append a default record of `kind` for `entity` and return it.
    /// Downcast the result to the kind's record type to fill it in.
    pub fn create_of_kind(&mut self, kind: ComponentKind, entity: Entity) -> &mut dyn Any {
        self.cell_mut(kind).create_default(entity)
    }

    /// Erase the first record of `kind` owned by `entity`. Returns whether
    /// one existed.
    pub fn destroy_of_kind(&mut self, kind: ComponentKind, entity: Entity) -> bool {
        self.cell_mut(kind).erase(entity)
    }

    /// Returns `true` if `entity` has a record of `kind`.
    #[must_use]
    pub fn contains(&self, kind: ComponentKind, entity: Entity) -> bool {
        self.cell(kind).contains(entity)
    }

    /// Number of records of `kind`.
    #[must_use]
    pub fn len_of_kind(&self, kind: ComponentKind) -> usize {
        self.cell(kind).len()
    }

    /// Kinds `entity` currently has a record of.
    #[must_use]
    pub fn kinds_of(&self, entity: Entity) -> Vec<ComponentKind> {
        let mut kinds: Vec<ComponentKind> = self
            .cells
            .values()
            .filter(|cell| cell.contains(entity))
            .map(|cell| cell.kind())
            .collect();
        kinds.sort();
        kinds
    }

    /// JSON snapshot of the first record of `kind` owned by `entity`.
    #[must_use]
    pub fn snapshot(&self, kind: ComponentKind, entity: Entity) -> Option<serde_json::Value> {
        self.cell(kind).snapshot(entity)
    }
}

impl Default for Components {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Components {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut counts: Vec<(ComponentKind, usize)> = self
            .cells
            .iter()
            .map(|(kind, cell)| (*kind, cell.len()))
            .collect();
        counts.sort();
        f.debug_struct("Components")
            .field("allocator", &self.allocator)
            .field("counts", &counts)
            .finish()
    }
}
