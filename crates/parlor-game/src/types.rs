//! Shared vocabulary used by every game engine.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Player slots
// ---------------------------------------------------------------------------

/// One of the two seats in a match.
///
/// Serializes as a plain number (`1` or `2`) so clients see the same
/// player number the room assigned them at join time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerSlot(u8);

impl PlayerSlot {
    /// The first player to join a room. Plays X in tic-tac-toe and
    /// white in checkers.
    pub const ONE: PlayerSlot = PlayerSlot(1);
    /// The second player to join. Plays O / black.
    pub const TWO: PlayerSlot = PlayerSlot(2);

    /// Returns the opposing seat.
    pub fn other(self) -> PlayerSlot {
        if self == Self::ONE { Self::TWO } else { Self::ONE }
    }

    /// Returns the wire-visible player number.
    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Game kind, status, and per-recipient result
// ---------------------------------------------------------------------------

/// Which game a room is playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    TicTacToe,
    Checkers,
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameKind::TicTacToe => "TicTacToe",
            GameKind::Checkers => "Checkers",
        };
        f.write_str(name)
    }
}

/// Where a match stands after the most recent turn.
///
/// Status only ever moves away from `Ongoing`; once a game is won or
/// drawn the room broadcasts the finish and tears itself down, so no
/// engine is ever asked to move a finished game forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

impl GameStatus {
    /// True once the match can accept no further turns.
    pub fn is_terminal(self) -> bool {
        self != GameStatus::Ongoing
    }

    /// The winning seat, if the match has one.
    pub fn winner(self) -> Option<PlayerSlot> {
        match self {
            GameStatus::PlayerOneWin => Some(PlayerSlot::ONE),
            GameStatus::PlayerTwoWin => Some(PlayerSlot::TWO),
            GameStatus::Ongoing | GameStatus::Draw => None,
        }
    }

    /// The status describing a win for `slot`.
    pub fn win_for(slot: PlayerSlot) -> GameStatus {
        if slot == PlayerSlot::ONE {
            GameStatus::PlayerOneWin
        } else {
            GameStatus::PlayerTwoWin
        }
    }

    /// Maps the shared status onto one recipient's point of view, which
    /// is how finish notifications are phrased on the wire: the winner
    /// is told `PlayerWin`, the loser `PlayerLose`, and a draw reads the
    /// same for both. Returns `None` while the match is still ongoing.
    pub fn result_for(self, recipient: PlayerSlot) -> Option<GameResult> {
        match self {
            GameStatus::Ongoing => None,
            GameStatus::Draw => Some(GameResult::Draw),
            GameStatus::PlayerOneWin | GameStatus::PlayerTwoWin => {
                if self.winner() == Some(recipient) {
                    Some(GameResult::PlayerWin)
                } else {
                    Some(GameResult::PlayerLose)
                }
            }
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameStatus::Ongoing => "ongoing",
            GameStatus::PlayerOneWin => "player one win",
            GameStatus::PlayerTwoWin => "player two win",
            GameStatus::Draw => "draw",
        };
        f.write_str(name)
    }
}

/// A finished match from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    PlayerWin,
    PlayerLose,
    Draw,
}

// ---------------------------------------------------------------------------
// Board coordinates
// ---------------------------------------------------------------------------

/// A board coordinate. Row 0 is the top row, column 0 the left column.
///
/// Coordinates arrive straight off the wire, so nothing about a `Coords`
/// value is trusted: every engine bounds-checks before indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords {
    pub row: usize,
    pub col: usize,
}

impl Coords {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.row, self.col)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_slot_other_flips_between_seats() {
        assert_eq!(PlayerSlot::ONE.other(), PlayerSlot::TWO);
        assert_eq!(PlayerSlot::TWO.other(), PlayerSlot::ONE);
    }

    #[test]
    fn test_player_slot_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerSlot::TWO).unwrap();
        assert_eq!(json, "2");
    }

    #[test]
    fn test_win_for_each_slot() {
        assert_eq!(GameStatus::win_for(PlayerSlot::ONE), GameStatus::PlayerOneWin);
        assert_eq!(GameStatus::win_for(PlayerSlot::TWO), GameStatus::PlayerTwoWin);
    }

    #[test]
    fn test_result_for_maps_win_to_each_recipient() {
        let status = GameStatus::PlayerOneWin;
        assert_eq!(status.result_for(PlayerSlot::ONE), Some(GameResult::PlayerWin));
        assert_eq!(status.result_for(PlayerSlot::TWO), Some(GameResult::PlayerLose));
    }

    #[test]
    fn test_result_for_draw_reads_the_same_for_both() {
        let status = GameStatus::Draw;
        assert_eq!(status.result_for(PlayerSlot::ONE), Some(GameResult::Draw));
        assert_eq!(status.result_for(PlayerSlot::TWO), Some(GameResult::Draw));
    }

    #[test]
    fn test_result_for_ongoing_is_none() {
        assert_eq!(GameStatus::Ongoing.result_for(PlayerSlot::ONE), None);
        assert!(!GameStatus::Ongoing.is_terminal());
        assert!(GameStatus::Draw.is_terminal());
    }

    #[test]
    fn test_coords_display_matches_error_text() {
        assert_eq!(Coords::new(4, 7).to_string(), "4, 7");
    }
}
