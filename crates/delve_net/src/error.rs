//! Network-boundary error types.

/// Errors that can occur between the transport and a session.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// Failed to encode an outbound message to JSON.
    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// Failed to decode an inbound message from JSON.
    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),

    /// The session on the other end of a channel has shut down.
    #[error("session channel closed")]
    Closed,
}
