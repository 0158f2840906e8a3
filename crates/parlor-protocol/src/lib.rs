//! Wire protocol for Parlor.
//!
//! This crate defines the language clients and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`RoomCode`]) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while encoding,
//!   decoding, or interpreting a message.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! layer (match state). It doesn't know about connections or rooms —
//! it only knows the shape of messages. Game boards and turns are
//! defined in `parlor-game` and re-exported here because their
//! serialized form is part of the wire contract.
//!
//! ```text
//! Transport (bytes) → Protocol (messages) → Room (match state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientMessage, RoomCode, ServerMessage};

// Game values ride inside protocol messages, so their types are part of
// the wire contract and worth reaching without a second import.
pub use parlor_game::{
    Coords, Direction, Game, GameKind, GameResult, GameStatus, PlayerSlot, Turn,
};
