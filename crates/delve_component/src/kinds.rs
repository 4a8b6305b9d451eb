//! Concrete component record types.
//!
//! Each record carries the owning entity in a private field that only the
//! storage cell writes; everything else is plain public data.

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind, KillPolicy, sealed};
use crate::entity::Entity;

macro_rules! component {
    ($ty:ident) => {
        impl sealed::Sealed for $ty {
            fn bind(&mut self, entity: Entity) {
                self.entity = entity;
            }
        }

        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$ty;

            fn entity(&self) -> Entity {
                self.entity
            }
        }
    };
    ($ty:ident, kill = $policy:expr) => {
        impl sealed::Sealed for $ty {
            fn bind(&mut self, entity: Entity) {
                self.entity = entity;
            }
        }

        impl Component for $ty {
            const KIND: ComponentKind = ComponentKind::$ty;

            fn entity(&self) -> Entity {
                self.entity
            }

            fn kill_policy() -> KillPolicy<Self> {
                $policy
            }
        }
    };
}

/// Makes an entity an obstacle for movers whose mask overlaps this one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collider {
    entity: Entity,
    pub mask: u32,
}

impl Collider {
    /// Mask that collides with every other mask.
    pub const ALL: u32 = u32::MAX;
}

component!(Collider);

/// Spawns monsters next to itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Generator {
    entity: Entity,
    /// Probability per tick of spawning.
    pub spawn_chance: f64,
}

component!(Generator);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Health {
    entity: Entity,
    pub hp: i32,
}

impl Health {
    /// Returns `true` while hit points remain.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

component!(Health);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hero {
    entity: Entity,
    pub score: i32,
    pub potions: i32,
}

component!(Hero);

/// Latest input state for a player, written by the network side and
/// consumed by the stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Input {
    entity: Entity,
    /// Fire key currently held, if any.
    pub fire_key: Option<char>,
    pub fire_released: bool,
    /// Set when a fire press arrived since the last tick consumed it.
    pub fire_this_tick: bool,
    /// Move key currently held, if any.
    pub move_key: Option<char>,
    pub move_released: bool,
    /// Set when a move press arrived since the last tick consumed it.
    pub move_this_tick: bool,
    pub weapon_in_flight: bool,
    /// Ticks to wait before the next move is accepted.
    pub move_cooldown: u32,
    pub use_potion: bool,
}

component!(Input);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Monster {
    entity: Entity,
}

component!(Monster);

/// What a [`Pickup`] does when collected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Food,
    Potion,
    #[default]
    Treasure,
    Exit,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Pickup {
    entity: Entity,
    pub kind: PickupKind,
}

component!(Pickup);

/// Grid coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    entity: Entity,
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Returns `true` if this position is at `(x, y)`.
    #[must_use]
    pub fn is_at(&self, x: i32, y: i32) -> bool {
        self.x == x && self.y == y
    }
}

component!(Position);

/// Score granted to whoever destroys the entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reward {
    entity: Entity,
    pub score: i32,
}

component!(Reward);

/// A renderable sprite.
///
/// Killing an entity does not erase its tile: the tile is flagged
/// `destroyed` so the render stage can report the removal to the client
/// before erasing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tile {
    entity: Entity,
    /// Texture name.
    pub name: String,
    /// Draw order; higher is drawn on top.
    pub z: i32,
    pub phase: i32,
    pub spinning: bool,
    /// Changed since the last frame was sent.
    pub dirty: bool,
    /// Killed; erased after the next frame.
    pub destroyed: bool,
}

impl Tile {
    /// Kill policy for tiles.
    pub fn mark_destroyed(&mut self) {
        self.destroyed = true;
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self {
            entity: Entity::INVALID,
            name: String::new(),
            z: 0,
            phase: 0,
            spinning: false,
            dirty: true,
            destroyed: false,
        }
    }
}

component!(Tile, kill = KillPolicy::Flag(Tile::mark_destroyed));

/// A thrown weapon in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weapon {
    entity: Entity,
    pub dx: i32,
    pub dy: i32,
    /// Who threw it. May refer to an entity that no longer exists.
    pub owner: Entity,
}

component!(Weapon);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::sealed::Sealed;

    #[test]
    fn test_new_tile_is_dirty() {
        let tile = Tile::default();
        assert!(tile.dirty);
        assert!(!tile.destroyed);
    }

    #[test]
    fn test_bind_stamps_entity() {
        let mut health = Health::default();
        assert_eq!(health.entity(), Entity::INVALID);
        health.bind(Entity(9));
        assert_eq!(health.entity(), Entity(9));
    }

    #[test]
    fn test_kinds_match_types() {
        assert_eq!(Collider::KIND, ComponentKind::Collider);
        assert_eq!(Tile::KIND, ComponentKind::Tile);
        assert_eq!(Weapon::KIND, ComponentKind::Weapon);
    }

    #[test]
    fn test_pickup_defaults_to_treasure() {
        assert_eq!(Pickup::default().kind, PickupKind::Treasure);
    }

    #[test]
    fn test_health_alive() {
        let mut health = Health::default();
        assert!(!health.is_alive());
        health.hp = 1;
        assert!(health.is_alive());
    }
}
