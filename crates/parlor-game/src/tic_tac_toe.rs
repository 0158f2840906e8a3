//! Tic-tac-toe: 3x3 grid, three in a row wins.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, TurnError};
use crate::types::{Coords, GameStatus, PlayerSlot};

const BOARD_SIZE: usize = 3;

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Square {
    Empty,
    X,
    O,
}

impl Square {
    /// The mark `slot` plays with. Player 1 is always X and moves first.
    pub fn mark_of(slot: PlayerSlot) -> Square {
        if slot == PlayerSlot::ONE { Square::X } else { Square::O }
    }

    fn symbol(self) -> char {
        match self {
            Square::Empty => ' ',
            Square::X => 'X',
            Square::O => 'O',
        }
    }
}

/// A game of tic-tac-toe in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeGame {
    pub board: [[Square; BOARD_SIZE]; BOARD_SIZE],
    pub status: GameStatus,
}

impl Default for TicTacToeGame {
    fn default() -> Self {
        Self::new()
    }
}

impl TicTacToeGame {
    pub fn new() -> Self {
        Self {
            board: [[Square::Empty; BOARD_SIZE]; BOARD_SIZE],
            status: GameStatus::Ongoing,
        }
    }

    /// Checks a move without touching the board.
    pub fn validate(&self, coords: Coords) -> Result<(), TurnError> {
        if coords.row >= BOARD_SIZE || coords.col >= BOARD_SIZE {
            return Err(TurnError::SquareOutOfBounds);
        }
        if self.board[coords.row][coords.col] != Square::Empty {
            return Err(TurnError::SquareOccupied);
        }
        Ok(())
    }

    /// Places `slot`'s mark and recomputes the status.
    pub fn apply(&mut self, coords: Coords, slot: PlayerSlot) -> Result<(), GameError> {
        self.validate(coords).map_err(GameError::UnvalidatedTurn)?;
        self.board[coords.row][coords.col] = Square::mark_of(slot);
        self.status = self.compute_status();
        Ok(())
    }

    fn compute_status(&self) -> GameStatus {
        if self.has_line(Square::X) {
            return GameStatus::PlayerOneWin;
        }
        if self.has_line(Square::O) {
            return GameStatus::PlayerTwoWin;
        }
        let full = self.board.iter().flatten().all(|&s| s != Square::Empty);
        if full { GameStatus::Draw } else { GameStatus::Ongoing }
    }

    /// Any full row, column, or diagonal of `mark`.
    fn has_line(&self, mark: Square) -> bool {
        let b = &self.board;
        (0..BOARD_SIZE).any(|r| (0..BOARD_SIZE).all(|c| b[r][c] == mark))
            || (0..BOARD_SIZE).any(|c| (0..BOARD_SIZE).all(|r| b[r][c] == mark))
            || (0..BOARD_SIZE).all(|i| b[i][i] == mark)
            || (0..BOARD_SIZE).all(|i| b[i][BOARD_SIZE - 1 - i] == mark)
    }

    /// How-to-play text shown to players when the match starts.
    pub fn instructions() -> &'static str {
        "when it is your turn, enter move <row-num> <col-num>."
    }

    /// Plain-text board for clients that render in a terminal.
    pub fn render(&self) -> String {
        let mut out = String::from("    0   1   2\n");
        for (r, row) in self.board.iter().enumerate() {
            if r > 0 {
                out.push_str("   ---+---+---\n");
            }
            let _ = writeln!(
                out,
                "{}   {} | {} | {}",
                r,
                row[0].symbol(),
                row[1].symbol(),
                row[2].symbol(),
            );
        }
        out
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(row: usize, col: usize) -> Coords {
        Coords::new(row, col)
    }

    #[test]
    fn test_new_board_is_empty_and_ongoing() {
        let game = TicTacToeGame::new();
        assert_eq!(game.status, GameStatus::Ongoing);
        assert!(game.board.iter().flatten().all(|&s| s == Square::Empty));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds_square() {
        let game = TicTacToeGame::new();
        let err = game.validate(coords(3, 0)).unwrap_err();
        assert_eq!(err.to_string(), "selected square is out of bounds");
        assert!(game.validate(coords(0, 7)).is_err());
    }

    #[test]
    fn test_validate_rejects_occupied_square() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(1, 1), PlayerSlot::ONE).unwrap();
        let err = game.validate(coords(1, 1)).unwrap_err();
        assert_eq!(err.to_string(), "square is occupied");
    }

    #[test]
    fn test_apply_places_the_acting_players_mark() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(0, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(2, 2), PlayerSlot::TWO).unwrap();
        assert_eq!(game.board[0][0], Square::X);
        assert_eq!(game.board[2][2], Square::O);
        assert_eq!(game.status, GameStatus::Ongoing);
    }

    #[test]
    fn test_row_win_goes_to_player_one() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(0, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(1, 0), PlayerSlot::TWO).unwrap();
        game.apply(coords(0, 1), PlayerSlot::ONE).unwrap();
        game.apply(coords(1, 1), PlayerSlot::TWO).unwrap();
        game.apply(coords(0, 2), PlayerSlot::ONE).unwrap();
        assert_eq!(game.status, GameStatus::PlayerOneWin);
    }

    #[test]
    fn test_column_win_goes_to_player_two() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(0, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(0, 2), PlayerSlot::TWO).unwrap();
        game.apply(coords(1, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(1, 2), PlayerSlot::TWO).unwrap();
        game.apply(coords(2, 1), PlayerSlot::ONE).unwrap();
        game.apply(coords(2, 2), PlayerSlot::TWO).unwrap();
        assert_eq!(game.status, GameStatus::PlayerTwoWin);
    }

    #[test]
    fn test_diagonal_win() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(0, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(0, 1), PlayerSlot::TWO).unwrap();
        game.apply(coords(1, 1), PlayerSlot::ONE).unwrap();
        game.apply(coords(0, 2), PlayerSlot::TWO).unwrap();
        game.apply(coords(2, 2), PlayerSlot::ONE).unwrap();
        assert_eq!(game.status, GameStatus::PlayerOneWin);
    }

    #[test]
    fn test_anti_diagonal_win() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(1, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(0, 2), PlayerSlot::TWO).unwrap();
        game.apply(coords(1, 2), PlayerSlot::ONE).unwrap();
        game.apply(coords(1, 1), PlayerSlot::TWO).unwrap();
        game.apply(coords(2, 1), PlayerSlot::ONE).unwrap();
        game.apply(coords(2, 0), PlayerSlot::TWO).unwrap();
        assert_eq!(game.status, GameStatus::PlayerTwoWin);
    }

    #[test]
    fn test_full_board_without_a_line_is_a_draw() {
        // X O X
        // X O O
        // O X X
        let mut game = TicTacToeGame::new();
        let script = [
            (coords(0, 0), PlayerSlot::ONE),
            (coords(0, 1), PlayerSlot::TWO),
            (coords(0, 2), PlayerSlot::ONE),
            (coords(1, 1), PlayerSlot::TWO),
            (coords(1, 0), PlayerSlot::ONE),
            (coords(1, 2), PlayerSlot::TWO),
            (coords(2, 1), PlayerSlot::ONE),
            (coords(2, 0), PlayerSlot::TWO),
            (coords(2, 2), PlayerSlot::ONE),
        ];
        for (mv, slot) in script {
            assert_eq!(game.status, GameStatus::Ongoing);
            game.apply(mv, slot).unwrap();
        }
        assert_eq!(game.status, GameStatus::Draw);
    }

    #[test]
    fn test_apply_without_validation_is_a_contract_violation() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(0, 0), PlayerSlot::ONE).unwrap();
        let err = game.apply(coords(0, 0), PlayerSlot::TWO).unwrap_err();
        assert_eq!(
            err,
            GameError::UnvalidatedTurn(TurnError::SquareOccupied),
        );
        // The board keeps player one's mark.
        assert_eq!(game.board[0][0], Square::X);
    }

    #[test]
    fn test_render_shows_marks_in_place() {
        let mut game = TicTacToeGame::new();
        game.apply(coords(1, 0), PlayerSlot::ONE).unwrap();
        game.apply(coords(1, 1), PlayerSlot::TWO).unwrap();
        let text = game.render();
        assert!(text.contains("X | O"));
    }
}
