//! # delve_net
//!
//! Client-facing message plumbing for a game session.
//!
//! This crate provides:
//!
//! - [`messages`]: JSON messages exchanged with the client.
//! - [`codec`]: JSON encode/decode helpers.
//! - [`input`]: the [`InputHandler`] that turns client text into queued
//!   input commands, and the drain the worker runs each tick.
//! - [`frames`]: the [`FrameSink`] seam render frames are written to.
//! - [`error`]: network-layer error types.

pub mod codec;
pub mod error;
pub mod frames;
pub mod input;
pub mod messages;

pub use codec::{decode, encode};
pub use error::NetError;
pub use frames::FrameSink;
pub use input::{
    InputCommand, InputHandler, InputReceiver, apply_message, apply_pending, input_channel,
};
pub use messages::{ClientMessage, RenderFrame, Sprite};
