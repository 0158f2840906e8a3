//! Turn-based board game engines for Parlor.
//!
//! This crate holds the pure rule logic: boards, turns, move validation,
//! and win detection. It performs no I/O and knows nothing about rooms or
//! connections. The room layer drives it one validated turn at a time and
//! ships snapshot clones of the [`Game`] value to clients, so the
//! serialized form of these types is part of the wire protocol.
//!
//! # Key types
//!
//! - [`Game`] — a match in progress (one variant per supported game)
//! - [`Turn`] — a player's requested move, as it arrives off the wire
//! - [`GameStatus`] — ongoing, won, or drawn
//! - [`PlayerSlot`] — which of the two seats is acting
//!
//! Every engine exposes the same capability set: validate a turn, apply a
//! validated turn, report status, and render a plain-text board for
//! clients that want one.

mod checkers;
mod error;
mod game;
mod tic_tac_toe;
mod types;

pub use checkers::{CheckersGame, Direction, Piece, PieceColor};
pub use error::{GameError, TurnError};
pub use game::{Game, Turn};
pub use tic_tac_toe::{Square, TicTacToeGame};
pub use types::{Coords, GameKind, GameResult, GameStatus, PlayerSlot};
