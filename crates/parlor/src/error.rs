//! Unified error type for the Parlor server.

use parlor_protocol::ProtocolError;
use parlor_room::RoomError;
use parlor_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Embedders deal with this single type instead of importing errors
/// from each sub-crate; `#[from]` on every variant lets `?` lift the
/// sub-crate errors without explicit conversions.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (routing, invariants).
    #[error(transparent)]
    Room(#[from] RoomError),
}
