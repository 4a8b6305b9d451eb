//! Grid queries derived from `Collider` and `Position` storage.
//!
//! Both queries scan every collider and look up its owner's position, so
//! they are linear in the number of colliders. Colliders whose owner has no
//! position are skipped.

use crate::component::Component;
use crate::kinds::{Collider, Position};
use crate::registry::Components;

impl Components {
    /// Returns `true` if a collider whose mask overlaps `mask` sits at
    /// `(x, y)`.
    #[must_use]
    pub fn is_obstacle_in_the_way(&self, x: i32, y: i32, mask: u32) -> bool {
        self.colliders_at(x, y)
            .any(|collider| collider.mask & mask != 0)
    }

    /// The first collider at `(x, y)`, regardless of mask. See
    /// [`Components::collider_at_mut`] to edit it in place.
    #[must_use]
    pub fn collider_at(&self, x: i32, y: i32) -> Option<&Collider> {
        self.colliders_at(x, y).next()
    }

    /// The first collider at `(x, y)`, mutably.
    pub fn collider_at_mut(&mut self, x: i32, y: i32) -> Option<&mut Collider> {
        let index = self
            .components::<Collider>()
            .iter()
            .position(|collider| self.is_placed_at(collider, x, y))?;
        self.components_mut::<Collider>().get_mut(index)
    }

    fn is_placed_at(&self, collider: &Collider, x: i32, y: i32) -> bool {
        self.get::<Position>(collider.entity())
            .is_some_and(|position| position.is_at(x, y))
    }

    fn colliders_at(&self, x: i32, y: i32) -> impl Iterator<Item = &Collider> {
        self.components::<Collider>()
            .iter()
            .filter(move |collider| self.is_placed_at(collider, x, y))
    }
}
