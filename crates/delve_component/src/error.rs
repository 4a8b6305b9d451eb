//! Registry contract violations.
//!
//! Missing components are not errors; lookups return `None`. These variants
//! describe programming mistakes in how the registry was assembled.

use crate::component::ComponentKind;

/// Errors raised by the component registry.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// No storage cell was registered for the kind.
    #[error("component kind {0} is not registered")]
    Unregistered(ComponentKind),

    /// A storage cell for the kind already exists.
    #[error("component kind {0} is already registered")]
    AlreadyRegistered(ComponentKind),

    /// The cell registered under a kind holds a different record type.
    #[error("storage for {kind} does not hold {requested}")]
    KindMismatch {
        /// The tag that was looked up.
        kind: ComponentKind,
        /// The Rust type the caller asked for.
        requested: &'static str,
    },
}
