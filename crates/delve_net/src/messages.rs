//! Message types exchanged with the browser client.
//!
//! Inbound messages are JSON objects tagged by a `"type"` field. The only
//! outbound message is the per-tick [`RenderFrame`].

use delve_component::Entity;
use serde::{Deserialize, Serialize};

// ── Inbound ─────────────────────────────────────────────────────────────────

/// A key event sent by the client.
///
/// An empty `key` means the key was released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Fire key pressed (`{"type":"fire","key":"w"}`) or released (`"key":""`).
    Fire {
        #[serde(default)]
        key: String,
    },
    /// Move key pressed or released.
    Move {
        #[serde(default)]
        key: String,
    },
    /// Drink a potion.
    Potion,
}

// ── Outbound ────────────────────────────────────────────────────────────────

/// One sprite in a [`RenderFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    /// The entity the sprite belongs to; stable across frames.
    pub id: Entity,
    pub texture: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// The entity died; the client should drop the sprite.
    #[serde(default)]
    pub destroyed: bool,
}

/// Sprites that changed since the previous frame, plus the player's health.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "render")]
pub struct RenderFrame {
    pub sprites: Vec<Sprite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
}
