//! The [`Game`] wrapper: one enum over every engine this crate ships.
//!
//! Rooms hold a `Game` and drive it through a fixed capability set
//! (validate, apply, status, instructions, render) without caring which
//! variant is inside. Snapshot clones of the same value go out to
//! clients, so the serialized form is part of the wire protocol: a map
//! tagged by `gameType` carrying the variant's board and status.

use serde::{Deserialize, Serialize};

use crate::checkers::{CheckersGame, Direction};
use crate::error::{GameError, TurnError};
use crate::tic_tac_toe::TicTacToeGame;
use crate::types::{Coords, GameKind, GameStatus, PlayerSlot};

/// A match in progress.
///
/// ```json
/// {"gameType": "TicTacToe", "board": [...], "status": "Ongoing"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gameType")]
pub enum Game {
    TicTacToe(TicTacToeGame),
    Checkers(CheckersGame),
}

/// One player's requested move, exactly as it arrives off the wire.
///
/// ```json
/// {"gameType": "Checkers",
///  "turnPayload": {"pieceCoords": {"row": 5, "col": 1}, "direction": "Left"}}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "gameType", content = "turnPayload", rename_all_fields = "camelCase")]
pub enum Turn {
    TicTacToe { coords: Coords },
    Checkers { piece_coords: Coords, direction: Direction },
}

impl Turn {
    /// The game this turn addresses.
    pub fn kind(&self) -> GameKind {
        match self {
            Turn::TicTacToe { .. } => GameKind::TicTacToe,
            Turn::Checkers { .. } => GameKind::Checkers,
        }
    }
}

impl Game {
    /// Starts a fresh match of the requested game.
    pub fn new(kind: GameKind) -> Game {
        match kind {
            GameKind::TicTacToe => Game::TicTacToe(TicTacToeGame::new()),
            GameKind::Checkers => Game::Checkers(CheckersGame::new()),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Game::TicTacToe(_) => GameKind::TicTacToe,
            Game::Checkers(_) => GameKind::Checkers,
        }
    }

    pub fn status(&self) -> GameStatus {
        match self {
            Game::TicTacToe(game) => game.status,
            Game::Checkers(game) => game.status,
        }
    }

    /// Force-sets the status, bypassing the rules. This is how a
    /// concession is recorded: the room writes a win for the other
    /// seat and runs the usual finish broadcast.
    pub fn override_status(&mut self, status: GameStatus) {
        match self {
            Game::TicTacToe(game) => game.status = status,
            Game::Checkers(game) => game.status = status,
        }
    }

    /// Checks `turn` against the rules without touching the board.
    pub fn validate(&self, turn: &Turn, slot: PlayerSlot) -> Result<(), TurnError> {
        match (self, turn) {
            (Game::TicTacToe(game), Turn::TicTacToe { coords }) => {
                game.validate(*coords)
            }
            (Game::Checkers(game), Turn::Checkers { piece_coords, direction }) => {
                game.validate(*piece_coords, *direction, slot)
            }
            (game, turn) => Err(TurnError::WrongGame {
                game: game.kind(),
                turn: turn.kind(),
            }),
        }
    }

    /// Applies a turn that [`Game::validate`] accepted.
    ///
    /// Returns an optional note describing a side effect of the move
    /// (a capture, for example). Handing this an unvalidated turn comes
    /// back as [`GameError`].
    pub fn apply(
        &mut self,
        turn: &Turn,
        slot: PlayerSlot,
    ) -> Result<Option<String>, GameError> {
        match (self, turn) {
            (Game::TicTacToe(game), Turn::TicTacToe { coords }) => {
                game.apply(*coords, slot).map(|()| None)
            }
            (Game::Checkers(game), Turn::Checkers { piece_coords, direction }) => {
                game.apply(*piece_coords, *direction, slot)
            }
            (game, turn) => Err(GameError::UnvalidatedTurn(TurnError::WrongGame {
                game: game.kind(),
                turn: turn.kind(),
            })),
        }
    }

    /// How-to-play text shown to players when the match starts.
    pub fn instructions(&self) -> &'static str {
        match self {
            Game::TicTacToe(_) => TicTacToeGame::instructions(),
            Game::Checkers(_) => CheckersGame::instructions(),
        }
    }

    /// Plain-text rendering of the current board.
    pub fn render_board(&self) -> String {
        match self {
            Game::TicTacToe(game) => game.render(),
            Game::Checkers(game) => game.render(),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
