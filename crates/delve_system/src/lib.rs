//! # delve_system
//!
//! The per-tick simulation stages of a game session.
//!
//! A [`SystemCollection`] holds [`System`]s in a fixed order; the session
//! worker calls [`SystemCollection::update`] once per tick while holding the
//! session lock. [`default_systems`] builds the standard collection.

pub mod stages;
pub mod system;

pub use stages::{PlayerMovement, Render, default_systems};
pub use system::{System, SystemCollection};
