//! Error types for the game engines.

use crate::types::{Coords, GameKind};

/// A move rejected during validation.
///
/// These are ordinary, player-recoverable outcomes: the board is
/// untouched and the same player stays on turn. The room forwards the
/// message text to the offending client and nothing else changes, so
/// the `Display` strings here are exactly what players read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// Tic-tac-toe: the target square is off the 3x3 board.
    #[error("selected square is out of bounds")]
    SquareOutOfBounds,

    /// Tic-tac-toe: the target square already holds a mark.
    #[error("square is occupied")]
    SquareOccupied,

    /// Checkers: the acting player has no piece on the named square.
    #[error("player has no piece at square {0}")]
    NoPieceAt(Coords),

    /// Checkers: men may only move toward the opponent.
    #[error("only kings can move backwards")]
    BackwardsMove,

    /// Checkers: the move (or the landing square of a jump) would leave
    /// the board.
    #[error("destination is out of bounds")]
    DestinationOutOfBounds,

    /// Checkers: the move (or the landing square of a jump) is taken.
    #[error("destination is occupied")]
    DestinationOccupied,

    /// The turn addresses a different game than the one in progress.
    #[error("turn is for {turn} but the current game is {game}")]
    WrongGame { game: GameKind, turn: GameKind },
}

/// Violation of the validate-before-apply contract.
///
/// [`Game::apply`](crate::Game::apply) assumes the turn already passed
/// [`Game::validate`](crate::Game::validate). When it is handed one that
/// would have been rejected, that is a server defect rather than a client
/// mistake, and it surfaces as this error so the caller can log it and
/// shut the match down instead of playing on from a corrupt position.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("turn applied without validation: {0}")]
    UnvalidatedTurn(TurnError),
}
