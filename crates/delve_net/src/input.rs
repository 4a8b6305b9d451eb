//! Network input handling.
//!
//! The transport hands inbound text to an [`InputHandler`], which decodes
//! it and queues an [`InputCommand`] without touching the store. The worker
//! drains the queue with [`apply_pending`] at the top of each tick, under
//! the session lock, so a tick never sees half of an input update and the
//! transport never waits for a tick to finish.

use delve_component::{Components, Entity, Input};
use tokio::sync::mpsc;
use tracing::debug;

use crate::codec::decode;
use crate::error::NetError;
use crate::messages::ClientMessage;

/// A decoded client message addressed to one entity's [`Input`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputCommand {
    pub entity: Entity,
    pub message: ClientMessage,
}

impl InputCommand {
    /// Apply the message to the entity's `Input`. Returns `false` if the
    /// entity has none.
    pub fn apply(&self, components: &mut Components) -> bool {
        match components.get_mut::<Input>(self.entity) {
            Some(input) => {
                apply_message(&self.message, input);
                true
            }
            None => false,
        }
    }
}

/// Update input state for one client message.
///
/// A press sets the key and the `*_this_tick` flag. A release sets the
/// `*_released` flag and clears the key only if no press is still waiting
/// to be seen by a tick, so a tap shorter than a tick is not lost.
pub fn apply_message(message: &ClientMessage, input: &mut Input) {
    match message {
        ClientMessage::Fire { key } => match key.chars().next() {
            Some(key) => {
                input.fire_released = false;
                input.fire_this_tick = true;
                input.fire_key = Some(key);
            }
            None => {
                input.fire_released = true;
                if !input.fire_this_tick {
                    input.fire_key = None;
                }
            }
        },
        ClientMessage::Move { key } => match key.chars().next() {
            Some(key) => {
                input.move_released = false;
                input.move_this_tick = true;
                input.move_key = Some(key);
            }
            None => {
                input.move_released = true;
                if !input.move_this_tick {
                    input.move_key = None;
                }
            }
        },
        ClientMessage::Potion => input.use_potion = true,
    }
}

/// Queue of input commands waiting for the next tick.
pub type InputReceiver = mpsc::UnboundedReceiver<InputCommand>;

/// Create the channel between an [`InputHandler`] and the worker.
#[must_use]
pub fn input_channel(entity: Entity) -> (InputHandler, InputReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        InputHandler {
            entity,
            commands: tx,
        },
        rx,
    )
}

/// Apply every queued command. Returns how many reached an `Input`.
pub fn apply_pending(commands: &mut InputReceiver, components: &mut Components) -> usize {
    let mut applied = 0;
    while let Ok(command) = commands.try_recv() {
        if command.apply(components) {
            applied += 1;
        } else {
            debug!(entity = %command.entity, "dropping input for entity without Input");
        }
    }
    applied
}

/// Translates inbound client text into queued [`InputCommand`]s for the
/// session's player entity. Cheap to clone; safe to call from any thread.
#[derive(Debug, Clone)]
pub struct InputHandler {
    entity: Entity,
    commands: mpsc::UnboundedSender<InputCommand>,
}

impl InputHandler {
    /// The entity whose input this handler drives.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Decode a JSON text message and queue it.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Decode`] for malformed or unknown messages and
    /// [`NetError::Closed`] once the session's worker is gone.
    pub fn handle_text(&self, text: &str) -> Result<(), NetError> {
        let message: ClientMessage = decode(text)?;
        self.handle(message)
    }

    /// Queue an already-decoded message.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Closed`] once the session's worker is gone.
    pub fn handle(&self, message: ClientMessage) -> Result<(), NetError> {
        self.commands
            .send(InputCommand {
                entity: self.entity,
                message,
            })
            .map_err(|_| NetError::Closed)
    }
}
