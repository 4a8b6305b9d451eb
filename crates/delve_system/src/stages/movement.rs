//! Moves input-driven entities one cell per step on the grid.

use delve_component::{Collider, Components, Entity, Input, Position, Tile};

use crate::system::System;

/// Applies held move keys: `j`/`l`/`i`/`k` step left/right/up/down.
///
/// After each step the entity rests for one tick. A step into a cell
/// holding a collider whose mask overlaps the mover's own is refused.
#[derive(Debug, Default)]
pub struct PlayerMovement;

impl PlayerMovement {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Grid offset for a move key.
fn direction(key: Option<char>) -> Option<(i32, i32)> {
    match key? {
        'j' => Some((-1, 0)),
        'l' => Some((1, 0)),
        'i' => Some((0, -1)),
        'k' => Some((0, 1)),
        _ => None,
    }
}

fn step(components: &mut Components, entity: Entity) {
    let Some(input) = components.get_mut::<Input>(entity) else {
        return;
    };
    if input.move_cooldown > 0 {
        input.move_cooldown -= 1;
        return;
    }
    let key = input.move_key;

    let Some((x, y)) = components.get::<Position>(entity).map(|p| (p.x, p.y)) else {
        return;
    };
    let mask = components.get::<Collider>(entity).map_or(0, |c| c.mask);

    if let Some((dx, dy)) = direction(key) {
        let (tx, ty) = (x + dx, y + dy);
        if !components.is_obstacle_in_the_way(tx, ty, mask) {
            if let Some(position) = components.get_mut::<Position>(entity) {
                position.x = tx;
                position.y = ty;
            }
        }
    }

    if let Some(input) = components.get_mut::<Input>(entity) {
        input.move_cooldown = 1;
        input.move_this_tick = false;
        if input.move_released {
            input.move_key = None;
        }
    }
    if let Some(tile) = components.get_mut::<Tile>(entity) {
        tile.dirty = true;
    }
}

impl System for PlayerMovement {
    fn name(&self) -> &'static str {
        "player_movement"
    }

    fn update(&mut self, components: &mut Components, _tick: u64) {
        for entity in components.entities_with::<Input>() {
            step(components, entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mover(components: &mut Components, x: i32, y: i32, key: char) -> Entity {
        let e = components.create_entity();
        let position = components.create::<Position>(e);
        position.x = x;
        position.y = y;
        components.create::<Collider>(e).mask = 1;
        components.create::<Tile>(e).dirty = false;
        let input = components.create::<Input>(e);
        input.move_key = Some(key);
        input.move_this_tick = true;
        e
    }

    fn wall(components: &mut Components, x: i32, y: i32, mask: u32) {
        let e = components.create_entity();
        let position = components.create::<Position>(e);
        position.x = x;
        position.y = y;
        components.create::<Collider>(e).mask = mask;
    }

    fn at(components: &Components, e: Entity) -> (i32, i32) {
        let p = components.get::<Position>(e).unwrap();
        (p.x, p.y)
    }

    #[test]
    fn test_each_key_moves_one_cell() {
        for (key, expected) in [('j', (4, 5)), ('l', (6, 5)), ('i', (5, 4)), ('k', (5, 6))] {
            let mut components = Components::new();
            let e = mover(&mut components, 5, 5, key);
            PlayerMovement.update(&mut components, 1);
            assert_eq!(at(&components, e), expected, "key {key}");
        }
    }

    #[test]
    fn test_step_sets_cooldown_and_marks_tile() {
        let mut components = Components::new();
        let e = mover(&mut components, 1, 1, 'l');
        PlayerMovement.update(&mut components, 1);

        let input = components.get::<Input>(e).unwrap();
        assert_eq!(input.move_cooldown, 1);
        assert!(!input.move_this_tick);
        assert_eq!(input.move_key, Some('l'));
        assert!(components.get::<Tile>(e).unwrap().dirty);
    }

    #[test]
    fn test_cooldown_skips_one_tick() {
        let mut components = Components::new();
        let e = mover(&mut components, 1, 1, 'l');
        let mut stage = PlayerMovement::new();

        stage.update(&mut components, 1);
        stage.update(&mut components, 2);
        assert_eq!(at(&components, e), (2, 1));
        assert_eq!(components.get::<Input>(e).unwrap().move_cooldown, 0);

        stage.update(&mut components, 3);
        assert_eq!(at(&components, e), (3, 1));
    }

    #[test]
    fn test_blocked_by_overlapping_mask() {
        let mut components = Components::new();
        wall(&mut components, 2, 1, Collider::ALL);
        let e = mover(&mut components, 1, 1, 'l');
        PlayerMovement.update(&mut components, 1);

        assert_eq!(at(&components, e), (1, 1));
        assert_eq!(components.get::<Input>(e).unwrap().move_cooldown, 1);
    }

    #[test]
    fn test_passes_non_overlapping_mask() {
        let mut components = Components::new();
        wall(&mut components, 2, 1, 2);
        let e = mover(&mut components, 1, 1, 'l');
        PlayerMovement.update(&mut components, 1);
        assert_eq!(at(&components, e), (2, 1));
    }

    #[test]
    fn test_released_key_is_cleared_after_step() {
        let mut components = Components::new();
        let e = mover(&mut components, 1, 1, 'k');
        components.get_mut::<Input>(e).unwrap().move_released = true;
        PlayerMovement.update(&mut components, 1);

        assert_eq!(at(&components, e), (1, 2));
        assert_eq!(components.get::<Input>(e).unwrap().move_key, None);
    }

    #[test]
    fn test_unknown_key_does_not_move() {
        let mut components = Components::new();
        let e = mover(&mut components, 3, 3, 'x');
        PlayerMovement.update(&mut components, 1);
        assert_eq!(at(&components, e), (3, 3));
    }

    #[test]
    fn test_input_without_position_is_skipped() {
        let mut components = Components::new();
        let e = components.create_entity();
        components.create::<Input>(e).move_key = Some('l');
        PlayerMovement.update(&mut components, 1);
        assert_eq!(components.get::<Input>(e).unwrap().move_cooldown, 0);
    }
}
