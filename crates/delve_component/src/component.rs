//! Core [`Component`] trait, the closed [`ComponentKind`] tag set and
//! per-kind [`KillPolicy`].
//!
//! The set of component kinds is closed: every kind is listed in
//! [`ComponentKind`] and its record type lives in [`crate::kinds`]. The
//! [`Component`] trait is sealed so that the tag of a record type and the
//! entity stamp on its records can only be produced by this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// The closed enumeration of component kinds the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Collider,
    Generator,
    Health,
    Hero,
    Input,
    Monster,
    Pickup,
    Position,
    Reward,
    Tile,
    Weapon,
}

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; 11] = [
        ComponentKind::Collider,
        ComponentKind::Generator,
        ComponentKind::Health,
        ComponentKind::Hero,
        ComponentKind::Input,
        ComponentKind::Monster,
        ComponentKind::Pickup,
        ComponentKind::Position,
        ComponentKind::Reward,
        ComponentKind::Tile,
        ComponentKind::Weapon,
    ];

    /// Human-readable name of the kind (e.g. `"Tile"`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ComponentKind::Collider => "Collider",
            ComponentKind::Generator => "Generator",
            ComponentKind::Health => "Health",
            ComponentKind::Hero => "Hero",
            ComponentKind::Input => "Input",
            ComponentKind::Monster => "Monster",
            ComponentKind::Pickup => "Pickup",
            ComponentKind::Position => "Position",
            ComponentKind::Reward => "Reward",
            ComponentKind::Tile => "Tile",
            ComponentKind::Weapon => "Weapon",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) mod sealed {
    use crate::entity::Entity;

    /// Stamps the owning entity onto a freshly created record. Only the
    /// storage cell calls this, exactly once per record.
    pub trait Sealed {
        fn bind(&mut self, entity: Entity);
    }
}

/// What "kill" means for one component kind.
///
/// [`KillPolicy::Erase`] removes the record outright. [`KillPolicy::Flag`]
/// leaves the record in storage and applies a marking function to it, so
/// stages ordered after the killer still see it once; a later explicit
/// destroy removes it.
pub enum KillPolicy<T> {
    /// Remove the first matching record.
    Erase,
    /// Mark the first matching record and keep it.
    Flag(fn(&mut T)),
}

impl<T> Clone for KillPolicy<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for KillPolicy<T> {}

impl<T> fmt::Debug for KillPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KillPolicy::Erase => f.write_str("Erase"),
            KillPolicy::Flag(_) => f.write_str("Flag(..)"),
        }
    }
}

/// The component trait.
///
/// Implemented by every record type in [`crate::kinds`]. Records are plain
/// data, zero/default-initialised on creation, and always carry the id of
/// the entity that owns them.
pub trait Component:
    sealed::Sealed + Default + Clone + fmt::Debug + Serialize + Send + Sync + 'static
{
    /// The tag identifying this record type.
    const KIND: ComponentKind;

    /// The entity this record belongs to. Fixed at creation.
    fn entity(&self) -> Entity;

    /// The kill policy registered for this kind by [`crate::Components::new`].
    fn kill_policy() -> KillPolicy<Self> {
        KillPolicy::Erase
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::kinds::{Health, Tile};

    #[test]
    fn test_all_kinds_are_distinct() {
        let set: HashSet<ComponentKind> = ComponentKind::ALL.iter().copied().collect();
        assert_eq!(set.len(), ComponentKind::ALL.len());
    }

    #[test]
    fn test_kind_names_match_display() {
        for kind in ComponentKind::ALL {
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_default_policy_is_erase() {
        assert!(matches!(Health::kill_policy(), KillPolicy::Erase));
    }

    #[test]
    fn test_tile_policy_flags() {
        let KillPolicy::Flag(mark) = Tile::kill_policy() else {
            panic!("tile kill policy should flag, not erase");
        };
        let mut tile = Tile::default();
        mark(&mut tile);
        assert!(tile.destroyed);
    }
}
