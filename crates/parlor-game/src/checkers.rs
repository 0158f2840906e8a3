//! Checkers: capture every opposing piece to win.
//!
//! The board is the standard 8x8 grid with play on the dark squares,
//! which under our orientation are the squares where `row % 2 == col % 2`.
//! Black starts on rows 0-2 and belongs to player 2; white starts on
//! rows 5-7 and belongs to player 1. White moves toward row 0, black
//! toward row 7, and the directions in a turn are always expressed
//! relative to the acting player's own facing.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, TurnError};
use crate::types::{Coords, GameStatus, PlayerSlot};

const BOARD_SIZE: usize = 8;
/// Each color opens with its first three rows filled.
const STARTING_ROWS: usize = 3;

// ---------------------------------------------------------------------------
// Pieces
// ---------------------------------------------------------------------------

/// Piece color. White belongs to player 1, black to player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PieceColor {
    White,
    Black,
}

impl PieceColor {
    /// The color `slot` commands.
    pub fn of(slot: PlayerSlot) -> PieceColor {
        if slot == PlayerSlot::ONE {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }

    pub fn opponent(self) -> PieceColor {
        match self {
            PieceColor::White => PieceColor::Black,
            PieceColor::Black => PieceColor::White,
        }
    }

    /// The far row where this color's men are crowned.
    fn crowning_row(self) -> usize {
        match self {
            PieceColor::White => 0,
            PieceColor::Black => BOARD_SIZE - 1,
        }
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PieceColor::White => "white",
            PieceColor::Black => "black",
        };
        f.write_str(name)
    }
}

/// A single piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Piece {
    pub color: PieceColor,
    pub is_king: bool,
}

impl Piece {
    fn man(color: PieceColor) -> Piece {
        Piece { color, is_king: false }
    }

    fn symbol(self) -> char {
        match (self.color, self.is_king) {
            (PieceColor::White, false) => 'w',
            (PieceColor::White, true) => 'W',
            (PieceColor::Black, false) => 'b',
            (PieceColor::Black, true) => 'B',
        }
    }
}

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// A move direction relative to the acting player's own facing.
///
/// "Forward" is toward the opponent, so the same wire value maps to
/// opposite board vectors for the two colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    BackLeft,
    BackRight,
}

impl Direction {
    fn is_backward(self) -> bool {
        matches!(self, Direction::BackLeft | Direction::BackRight)
    }

    /// Rewrites a black-relative direction into the white frame. Black
    /// faces the opposite way, so its forward-left is white's
    /// backward-right and so on; doing the mirror once up front lets
    /// the movement math run in a single frame.
    fn white_frame(self, color: PieceColor) -> Direction {
        match color {
            PieceColor::White => self,
            PieceColor::Black => match self {
                Direction::Left => Direction::BackRight,
                Direction::Right => Direction::BackLeft,
                Direction::BackLeft => Direction::Right,
                Direction::BackRight => Direction::Left,
            },
        }
    }

    /// (row, col) vector in the white frame. White moves toward row 0.
    fn vector(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, -1),
            Direction::Right => (-1, 1),
            Direction::BackLeft => (1, -1),
            Direction::BackRight => (1, 1),
        }
    }
}

/// One diagonal step from `from`, or `None` if it leaves the board.
fn step(from: Coords, vector: (isize, isize)) -> Option<Coords> {
    let row = from.row as isize + vector.0;
    let col = from.col as isize + vector.1;
    let bounds = 0..BOARD_SIZE as isize;
    if bounds.contains(&row) && bounds.contains(&col) {
        Some(Coords::new(row as usize, col as usize))
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// The game
// ---------------------------------------------------------------------------

/// A fully-resolved move: where the piece ends up and what it jumps over.
struct MovePlan {
    from: Coords,
    landing: Coords,
    capture: Option<Coords>,
    piece: Piece,
}

/// A game of checkers in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersGame {
    pub board: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    pub status: GameStatus,
}

impl Default for CheckersGame {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckersGame {
    pub fn new() -> Self {
        let mut board = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (row, squares) in board.iter_mut().enumerate() {
            for (col, square) in squares.iter_mut().enumerate() {
                if row % 2 != col % 2 {
                    continue; // light square, never occupied
                }
                if row < STARTING_ROWS {
                    *square = Some(Piece::man(PieceColor::Black));
                } else if row >= BOARD_SIZE - STARTING_ROWS {
                    *square = Some(Piece::man(PieceColor::White));
                }
            }
        }
        Self { board, status: GameStatus::Ongoing }
    }

    /// Live pieces of one color. Captures shrink this toward zero.
    pub fn piece_count(&self, color: PieceColor) -> usize {
        self.board
            .iter()
            .flatten()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }

    fn at(&self, coords: Coords) -> Option<Piece> {
        self.board[coords.row][coords.col]
    }

    /// The acting color's piece at `coords`, bounds-checked.
    fn own_piece_at(&self, coords: Coords, color: PieceColor) -> Option<Piece> {
        if coords.row >= BOARD_SIZE || coords.col >= BOARD_SIZE {
            return None;
        }
        self.at(coords).filter(|piece| piece.color == color)
    }

    /// Checks a move without touching the board.
    pub fn validate(
        &self,
        piece_coords: Coords,
        direction: Direction,
        slot: PlayerSlot,
    ) -> Result<(), TurnError> {
        self.plan_move(piece_coords, direction, slot).map(|_| ())
    }

    /// Executes a validated move and recomputes the status.
    ///
    /// Returns a human-readable note when the move captured a piece.
    pub fn apply(
        &mut self,
        piece_coords: Coords,
        direction: Direction,
        slot: PlayerSlot,
    ) -> Result<Option<String>, GameError> {
        let plan = self
            .plan_move(piece_coords, direction, slot)
            .map_err(GameError::UnvalidatedTurn)?;

        let mut note = None;
        if let Some(captured) = plan.capture {
            self.board[captured.row][captured.col] = None;
            let color = PieceColor::of(slot).opponent();
            note = Some(format!("captured a {color} piece!"));
        }

        let mut piece = plan.piece;
        if plan.landing.row == piece.color.crowning_row() {
            piece.is_king = true;
        }
        self.board[plan.from.row][plan.from.col] = None;
        self.board[plan.landing.row][plan.landing.col] = Some(piece);

        self.status = self.compute_status();
        Ok(note)
    }

    /// Resolves a requested move into source, landing, and capture
    /// squares, rejecting it the moment any rule fails. Shared by
    /// validation (which discards the plan) and execution.
    fn plan_move(
        &self,
        from: Coords,
        direction: Direction,
        slot: PlayerSlot,
    ) -> Result<MovePlan, TurnError> {
        let color = PieceColor::of(slot);
        let piece = self
            .own_piece_at(from, color)
            .ok_or(TurnError::NoPieceAt(from))?;

        if direction.is_backward() && !piece.is_king {
            return Err(TurnError::BackwardsMove);
        }

        let vector = direction.white_frame(color).vector();
        let dest = step(from, vector).ok_or(TurnError::DestinationOutOfBounds)?;
        match self.at(dest) {
            None => Ok(MovePlan { from, landing: dest, capture: None, piece }),
            Some(occupant) if occupant.color == color => {
                Err(TurnError::DestinationOccupied)
            }
            Some(_) => {
                // An enemy piece ahead turns this move into a jump. The
                // square one step beyond it must be open board.
                let landing =
                    step(dest, vector).ok_or(TurnError::DestinationOutOfBounds)?;
                if self.at(landing).is_some() {
                    return Err(TurnError::DestinationOccupied);
                }
                Ok(MovePlan { from, landing, capture: Some(dest), piece })
            }
        }
    }

    /// A color with no pieces left has lost.
    fn compute_status(&self) -> GameStatus {
        if self.piece_count(PieceColor::Black) == 0 {
            GameStatus::PlayerOneWin
        } else if self.piece_count(PieceColor::White) == 0 {
            GameStatus::PlayerTwoWin
        } else {
            GameStatus::Ongoing
        }
    }

    /// How-to-play text shown to players when the match starts.
    pub fn instructions() -> &'static str {
        "when it is your turn, enter move <row-num> <col-num> <direction>. \
         possible directions are 'l', 'r', 'bl', and 'br'. \
         note that only kings can move backwards."
    }

    /// Plain-text board. Men print lowercase, kings uppercase.
    pub fn render(&self) -> String {
        let mut out = String::from("    0 1 2 3 4 5 6 7\n");
        for (row, squares) in self.board.iter().enumerate() {
            let _ = write!(out, "{row}  ");
            for square in squares {
                let symbol = square.map_or('.', Piece::symbol);
                let _ = write!(out, " {symbol}");
            }
            out.push('\n');
        }
        out
    }
}

// ===========================================================================
// Tests
// ===========================================================================
