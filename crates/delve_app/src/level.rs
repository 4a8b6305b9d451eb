//! Prefabs and the starting level.

use delve_component::{
    Collider, Components, Entity, Generator, Health, Hero, Input, Monster, Pickup, PickupKind,
    Position, Reward, Tile,
};

/// Level width in cells.
pub const WIDTH: i32 = 15;
/// Level height in cells.
pub const HEIGHT: i32 = 13;

const INTERIOR_WALLS: [(i32, i32); 3] = [(5, 5), (6, 5), (5, 6)];
const MONSTERS: [(i32, i32); 2] = [(6, 2), (1, 7)];
const TREASURES: [(i32, i32); 5] = [(2, 10), (3, 10), (3, 11), (8, 8), (9, 8)];

/// Tiles in the starting level: one per grid cell plus the actors and
/// pickups placed on top.
pub const TILE_COUNT: usize =
    (WIDTH * HEIGHT) as usize + 1 + MONSTERS.len() + 1 + TREASURES.len() + 3;

fn placed(components: &mut Components, x: i32, y: i32, texture: &str, z: i32) -> Entity {
    let e = components.create_entity();
    let position = components.create::<Position>(e);
    position.x = x;
    position.y = y;
    let tile = components.create::<Tile>(e);
    tile.name = texture.to_string();
    tile.z = z;
    e
}

/// The player: input-driven, 100 hp, collides on mask 1.
pub fn player(components: &mut Components, x: i32, y: i32) -> Entity {
    let e = placed(components, x, y, "hero", 2);
    components.create::<Collider>(e).mask = 1;
    components.create::<Health>(e).hp = 100;
    components.create::<Hero>(e);
    components.create::<Input>(e);
    e
}

pub fn monster(components: &mut Components, x: i32, y: i32) -> Entity {
    let e = placed(components, x, y, "monster", 2);
    components.create::<Collider>(e).mask = 2;
    components.create::<Health>(e).hp = 1;
    components.create::<Monster>(e);
    components.create::<Reward>(e).score = 10;
    e
}

/// A monster spawner; blocks everything.
pub fn generator(components: &mut Components, x: i32, y: i32) -> Entity {
    let e = placed(components, x, y, "bones", 1);
    components.create::<Collider>(e).mask = Collider::ALL;
    components.create::<Generator>(e).spawn_chance = 0.05;
    components.create::<Health>(e).hp = 10;
    components.create::<Reward>(e).score = 250;
    e
}

pub fn wall(components: &mut Components, x: i32, y: i32) -> Entity {
    let e = placed(components, x, y, "wall", 1);
    components.create::<Collider>(e).mask = Collider::ALL;
    e
}

pub fn floor(components: &mut Components, x: i32, y: i32) -> Entity {
    placed(components, x, y, "floor", 0)
}

/// A pickup; the texture is named after its kind.
pub fn pickup(components: &mut Components, kind: PickupKind, x: i32, y: i32) -> Entity {
    let texture = match kind {
        PickupKind::Food => "food",
        PickupKind::Potion => "potion",
        PickupKind::Treasure => "treasure",
        PickupKind::Exit => "exit",
    };
    let e = placed(components, x, y, texture, 1);
    components.create::<Pickup>(e).kind = kind;
    e
}

fn is_wall(x: i32, y: i32) -> bool {
    x == 0 || y == 0 || x == WIDTH - 1 || y == HEIGHT - 1 || INTERIOR_WALLS.contains(&(x, y))
}

/// Populate the starting level and return the player.
pub fn spawn_level(components: &mut Components) -> Entity {
    let hero = player(components, 1, 1);
    for (x, y) in MONSTERS {
        monster(components, x, y);
    }
    generator(components, 8, 4);
    for (x, y) in TREASURES {
        pickup(components, PickupKind::Treasure, x, y);
    }
    pickup(components, PickupKind::Food, 12, 9);
    pickup(components, PickupKind::Potion, 6, 6);
    pickup(components, PickupKind::Exit, 13, 11);

    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            if is_wall(x, y) {
                wall(components, x, y);
            } else {
                floor(components, x, y);
            }
        }
    }
    hero
}

#[cfg(test)]
mod tests {
    use delve_component::Component;

    use super::*;

    fn level() -> (Components, Entity) {
        let mut components = Components::new();
        let hero = spawn_level(&mut components);
        (components, hero)
    }

    #[test]
    fn test_player_is_first_entity() {
        let (components, hero) = level();
        assert_eq!(hero, Entity::from_raw(1));
        assert_eq!(components.get::<Health>(hero).unwrap().hp, 100);
        assert_eq!(components.get::<Collider>(hero).unwrap().mask, 1);
        assert_eq!(components.count::<Input>(), 1);
    }

    #[test]
    fn test_counts() {
        let (components, _) = level();
        assert_eq!(components.count::<Tile>(), TILE_COUNT);
        assert_eq!(components.count::<Monster>(), 2);
        assert_eq!(components.count::<Generator>(), 1);
        assert_eq!(components.count::<Pickup>(), 8);
        assert_eq!(components.entities_allocated(), TILE_COUNT as u64);

        let walls = components
            .components::<Tile>()
            .iter()
            .filter(|t| t.name == "wall")
            .count();
        assert_eq!(walls, 2 * WIDTH as usize + 2 * (HEIGHT as usize - 2) + 3);
    }

    #[test]
    fn test_walls_block_player_but_floor_does_not() {
        let (components, _) = level();
        assert!(components.is_obstacle_in_the_way(0, 1, 1));
        assert!(components.is_obstacle_in_the_way(5, 6, 1));
        assert!(!components.is_obstacle_in_the_way(2, 1, 1));
        // Monsters collide on mask 2 only.
        assert!(!components.is_obstacle_in_the_way(6, 2, 1));
        assert!(components.is_obstacle_in_the_way(6, 2, 2));
    }

    #[test]
    fn test_pickup_textures() {
        let (components, _) = level();
        let exit = components
            .components::<Pickup>()
            .iter()
            .find(|p| p.kind == PickupKind::Exit)
            .unwrap()
            .entity();
        assert_eq!(components.get::<Tile>(exit).unwrap().name, "exit");
        let at = components.get::<Position>(exit).unwrap();
        assert_eq!((at.x, at.y), (13, 11));
    }
}
