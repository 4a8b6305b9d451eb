//! # delve_component
//!
//! The entity-component store behind a game session.
//!
//! This crate provides:
//!
//! - [`Entity`] and [`EntityAllocator`]: non-reusable `u64` identities.
//! - [`ComponentKind`]: the closed set of component kinds, and the sealed
//!   [`Component`] trait their record types implement.
//! - [`ComponentStore`]: the per-kind storage cell, with its
//!   [`KillPolicy`], behind the type-erased [`ErasedStore`] interface.
//! - [`Components`]: the registry, with entity creation, per-kind create / list /
//!   get / destroy, entity-wide kill, and the collider grid queries.
//!
//! Lookups that find nothing return `None`. Views returned by the registry
//! are borrows, so none of them can be kept across a mutating call.

pub mod component;
pub mod entity;
pub mod error;
pub mod kinds;
pub mod registry;
mod spatial;
pub mod store;

pub use component::{Component, ComponentKind, KillPolicy};
pub use entity::{Entity, EntityAllocator};
pub use error::ComponentError;
pub use kinds::{
    Collider, Generator, Health, Hero, Input, Monster, Pickup, PickupKind, Position, Reward, Tile,
    Weapon,
};
pub use registry::Components;
pub use store::{ComponentStore, ErasedStore};
