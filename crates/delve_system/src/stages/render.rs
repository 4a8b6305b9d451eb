//! Sends the client a frame describing what changed this tick.

use delve_component::{Component, Components, Health, Input, Position, Tile};
use delve_net::{FrameSink, RenderFrame, Sprite, encode};
use tracing::{debug, warn};

use crate::system::System;

/// Emits one [`RenderFrame`] per tick to a [`FrameSink`].
///
/// Frames are deltas. A tile is sent when it is `dirty` or `destroyed`;
/// once the frame is out, dirty flags are cleared and destroyed tiles are
/// erased, completing their two-phase removal. A destroyed tile is always
/// reported, even if its position is already gone; other tiles need a
/// position to be drawn.
#[derive(Debug)]
pub struct Render<S> {
    sink: S,
    frames_sent: u64,
}

impl<S: FrameSink> Render<S> {
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            frames_sent: 0,
        }
    }

    /// Frames handed to the sink so far.
    #[must_use]
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Build the frame for the current state without changing it.
#[must_use]
pub fn collect_frame(components: &Components) -> RenderFrame {
    let sprites = components
        .components::<Tile>()
        .iter()
        .filter(|tile| tile.dirty || tile.destroyed)
        .filter_map(|tile| {
            let position = components.get::<Position>(tile.entity());
            let (x, y) = match position {
                Some(p) => (p.x, p.y),
                None if tile.destroyed => (0, 0),
                None => return None,
            };
            Some(Sprite {
                id: tile.entity(),
                texture: tile.name.clone(),
                x,
                y,
                z: tile.z,
                destroyed: tile.destroyed,
            })
        })
        .collect();

    let health = match components.components::<Input>() {
        [player] => components.get::<Health>(player.entity()).map(|h| h.hp),
        _ => None,
    };

    RenderFrame { sprites, health }
}

/// Clear dirty flags and erase destroyed tiles. Returns how many tiles
/// were erased.
pub fn settle_tiles(components: &mut Components) -> usize {
    let tiles = components.store_mut::<Tile>();
    let erased = tiles.retain(|tile| !tile.destroyed).len();
    for tile in tiles.as_mut_slice() {
        tile.dirty = false;
    }
    erased
}

impl<S: FrameSink> System for Render<S> {
    fn name(&self) -> &'static str {
        "render"
    }

    fn update(&mut self, components: &mut Components, tick: u64) {
        let frame = collect_frame(components);
        match encode(&frame) {
            Ok(text) => {
                self.sink.send_frame(text);
                self.frames_sent += 1;
            }
            Err(e) => warn!(tick, error = %e, "failed to encode render frame"),
        }
        let erased = settle_tiles(components);
        if erased > 0 {
            debug!(tick, erased, "erased destroyed tiles");
        }
    }
}
