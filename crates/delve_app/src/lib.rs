//! # delve_app
//!
//! Hosts game sessions.
//!
//! - [`Session`]: one populated component store ticked by a dedicated
//!   worker thread, fed by an input channel and emitting render frames.
//! - [`TickLoop`]: the fixed-rate loop the worker runs.
//! - [`SessionRegistry`]: active sessions keyed by UUID.
//! - [`level`]: prefabs and the starting level.

pub mod config;
pub mod level;
pub mod registry;
pub mod session;
pub mod tick;

pub use config::TickConfig;
pub use registry::SessionRegistry;
pub use session::{Session, SessionError};
pub use tick::{StatsSummary, TickLoop, TickStats};
