//! Error types for the protocol layer.
//!
//! Each crate in Parlor defines its own error enum, so a `ProtocolError`
//! always means the problem is in the bytes or the message shape, never
//! in networking or room management.

/// Errors that can occur in the protocol layer.
///
/// A decode failure on bytes a client sent is that client's protocol
/// violation: the server answers with an `Error` message and keeps the
/// connection open. It is never treated as a transport fault.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a message into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, a missing field, an
    /// unknown message type, or the wrong payload shape for the type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed fine but is not legitimate right now, for
    /// example a second join sent before the first was answered.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
