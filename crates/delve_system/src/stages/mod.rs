//! The stages a session runs every tick.

mod movement;
mod render;

pub use movement::PlayerMovement;
pub use render::{Render, collect_frame, settle_tiles};

use delve_net::FrameSink;

use crate::system::SystemCollection;

/// The standard stage order: movement, then render.
#[must_use]
pub fn default_systems<S: FrameSink + 'static>(sink: S) -> SystemCollection {
    SystemCollection::new()
        .with(PlayerMovement::new())
        .with(Render::new(sink))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let systems = default_systems(Vec::new());
        assert_eq!(systems.names(), vec!["player_movement", "render"]);
    }
}
