//! Codec trait and implementations for serializing messages.
//!
//! A codec converts between protocol types and raw bytes. Nothing else
//! in the server cares how that happens — connections hand bytes to a
//! [`Codec`] and get typed messages back, so the encoding can change
//! without touching the room or player logic.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes and decodes wire messages.
///
/// `Send + Sync + 'static` because a codec is shared by tasks that live
/// for the whole connection.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if the value cannot be
    /// represented in this format.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Parlor messages are small and infrequent — a turn every few seconds
/// at most — so a human-readable encoding costs nothing that matters
/// and means a whole session can be followed, or faked, with any plain
/// WebSocket client.
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use parlor_protocol::{ClientMessage, Codec, JsonCodec, RoomCode};
///
/// let codec = JsonCodec;
///
/// let msg = ClientMessage::JoinRoom {
///     room_code: RoomCode::new("kitchen-table"),
/// };
///
/// let bytes = codec.encode(&msg).unwrap();
/// let decoded: ClientMessage = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, msg);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
