//! # Parlor
//!
//! A two-player board-game match server. Clients connect over
//! WebSockets, meet in named rooms, pick a game (tic-tac-toe or
//! checkers), and exchange validated moves until someone wins, draws,
//! or walks away.
//!
//! The server is a small stack of actors: an accept loop spawns one
//! connection actor per client, a hub task owns the room-code
//! namespace, and each room runs as its own task arbitrating one
//! match. See `parlor-room` for the room side and `parlor-protocol`
//! for the wire format.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ServerError> {
//!     let server = ServerBuilder::new().bind("127.0.0.1:8080").build().await?;
//!     server.run().await
//! }
//! ```

mod error;
mod player;
mod server;

pub use error::ServerError;
pub use server::{Server, ServerBuilder};

/// Everything an embedder or test client typically needs.
pub mod prelude {
    pub use crate::{Server, ServerBuilder, ServerError};
    pub use parlor_game::{CheckersGame, Piece, PieceColor, Square, TicTacToeGame};
    pub use parlor_protocol::{
        ClientMessage, Coords, Direction, Game, GameKind, GameResult, GameStatus,
        PlayerSlot, RoomCode, ServerMessage, Turn,
    };
}
