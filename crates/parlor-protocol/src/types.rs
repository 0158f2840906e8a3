//! Core protocol types: everything that travels on the wire.
//!
//! Every message is a JSON object tagged by a `"type"` field, with
//! camelCase field names. The tag is the variant name, so the Rust
//! definitions below double as the protocol reference:
//!
//! ```json
//! {"type": "JoinRoom", "roomCode": "kitchen-table"}
//! {"type": "RoomJoined", "playerNumber": 1}
//! ```
//!
//! Board snapshots and turns are defined in `parlor-game` (their shape
//! is part of the game rules); this module owns the envelope around
//! them.

use std::fmt;

use serde::{Deserialize, Serialize};

use parlor_game::{Game, GameKind, GameResult, PlayerSlot, Turn};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The client-chosen name of a room.
///
/// Codes are opaque to the server: the first player to ask for a code
/// opens the room, the second fills it, and once the room ends the same
/// code can be used again for a brand-new room.
///
/// `#[serde(transparent)]` makes it serialize as a bare string rather
/// than a wrapper object, so the wire sees `"kitchen-table"` and the
/// code stays a distinct type in Rust.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// Everything a client may say to the server.
///
/// Which of these are legitimate at a given moment depends on where the
/// player is in the session (not joined, waiting, selecting, playing);
/// the connection actor enforces that, not the decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Join the room named `room_code`, creating it if it doesn't exist.
    JoinRoom { room_code: RoomCode },

    /// Pick which game the room will play. Only player 1 may do this.
    SelectGameType { game_type: GameKind },

    /// Play a move. The turn carries its own `gameType` tag plus the
    /// game-specific payload, flattened into this envelope:
    ///
    /// ```json
    /// {"type": "SendTurn", "gameType": "TicTacToe",
    ///  "turnPayload": {"coords": {"row": 0, "col": 2}}}
    /// ```
    SendTurn {
        #[serde(flatten)]
        turn: Turn,
    },

    /// Leave the room. Ends the match for both players.
    QuitRoom,

    /// Give up: the opponent is awarded the win.
    Concede,
}

impl ClientMessage {
    /// The wire tag, for logs and error text.
    pub fn name(&self) -> &'static str {
        match self {
            ClientMessage::JoinRoom { .. } => "JoinRoom",
            ClientMessage::SelectGameType { .. } => "SelectGameType",
            ClientMessage::SendTurn { .. } => "SendTurn",
            ClientMessage::QuitRoom => "QuitRoom",
            ClientMessage::Concede => "Concede",
        }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// Everything the server may say to a client.
///
/// Broadcast messages (`GameStarted`, `TurnResult`, `GameFinished`) carry
/// a full snapshot of the game rather than a delta: boards are tiny and
/// a stateless client can always render from the latest message alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// You are in the room, seated as `player_number`.
    RoomJoined { player_number: PlayerSlot },

    /// Both seats are filled; player 1 is choosing the game.
    EnteredGameSelection,

    /// The match has begun. `player_turn` says who moves first.
    GameStarted { game: Game, player_turn: PlayerSlot },

    /// Outcome of a `SendTurn`. On a valid move every player receives
    /// the updated board and whose turn is next. On a rejected move only
    /// the sender hears back: `error_message` carries the reason and the
    /// board and turn are unchanged.
    TurnResult {
        game: Game,
        player_turn: PlayerSlot,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
    },

    /// The match is over. `game_result` is from the recipient's point
    /// of view, so the two players of one match receive different
    /// values. `game` is absent when the match ended before a game
    /// existed (a quit during game selection), and
    /// `quitting_player_number` is present only when a quit ended it.
    GameFinished {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game: Option<Game>,
        game_result: GameResult,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quitting_player_number: Option<PlayerSlot>,
    },

    /// The room is gone. Sent as the acknowledgement to the player
    /// whose quit closed it.
    RoomClosed,

    /// The room vanished without a closing handshake; synthesized by
    /// the connection actor when the room's channel drops mid-session.
    RoomDisconnected,

    /// The join was refused: the room is already full or already past
    /// the joining phase.
    RoomUnavailable,

    /// A request was understood but rejected (or couldn't be decoded).
    /// The session continues; nothing about the match changed.
    Error { error_message: String },
}

impl ServerMessage {
    /// The wire tag, for logs and error text.
    pub fn name(&self) -> &'static str {
        match self {
            ServerMessage::RoomJoined { .. } => "RoomJoined",
            ServerMessage::EnteredGameSelection => "EnteredGameSelection",
            ServerMessage::GameStarted { .. } => "GameStarted",
            ServerMessage::TurnResult { .. } => "TurnResult",
            ServerMessage::GameFinished { .. } => "GameFinished",
            ServerMessage::RoomClosed => "RoomClosed",
            ServerMessage::RoomDisconnected => "RoomDisconnected",
            ServerMessage::RoomUnavailable => "RoomUnavailable",
            ServerMessage::Error { .. } => "Error",
        }
    }

    /// Builds the generic error reply.
    pub fn error(message: impl Into<String>) -> ServerMessage {
        ServerMessage::Error { error_message: message.into() }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_game::{Coords, Direction, GameStatus};

    // -- room codes ---------------------------------------------------------

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let code = RoomCode::new("kitchen-table");
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"kitchen-table\"");
        assert_eq!(code.to_string(), "kitchen-table");
    }

    // -- client messages ----------------------------------------------------

    #[test]
    fn test_join_room_wire_shape() {
        let msg = ClientMessage::JoinRoom { room_code: "attic".into() };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "JoinRoom");
        assert_eq!(value["roomCode"], "attic");
    }

    #[test]
    fn test_select_game_type_wire_shape() {
        let msg = ClientMessage::SelectGameType { game_type: GameKind::Checkers };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "SelectGameType");
        assert_eq!(value["gameType"], "Checkers");
    }

    #[test]
    fn test_send_turn_flattens_the_turn_into_the_envelope() {
        let msg = ClientMessage::SendTurn {
            turn: Turn::Checkers {
                piece_coords: Coords::new(5, 1),
                direction: Direction::Left,
            },
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "SendTurn");
        assert_eq!(value["gameType"], "Checkers");
        assert_eq!(value["turnPayload"]["pieceCoords"]["row"], 5);
        assert_eq!(value["turnPayload"]["direction"], "Left");
    }

    #[test]
    fn test_bare_client_messages_have_no_payload() {
        let value = serde_json::to_value(&ClientMessage::QuitRoom).unwrap();
        assert_eq!(value, serde_json::json!({"type": "QuitRoom"}));
        let value = serde_json::to_value(&ClientMessage::Concede).unwrap();
        assert_eq!(value, serde_json::json!({"type": "Concede"}));
    }

    #[test]
    fn test_client_messages_decode_from_wire_json() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type": "JoinRoom", "roomCode": "den"}"#,
        )
        .unwrap();
        assert_eq!(msg, ClientMessage::JoinRoom { room_code: "den".into() });

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type": "SendTurn", "gameType": "TicTacToe",
                "turnPayload": {"coords": {"row": 2, "col": 0}}}"#,
        )
        .unwrap();
        assert_eq!(
            msg,
            ClientMessage::SendTurn {
                turn: Turn::TicTacToe { coords: Coords::new(2, 0) },
            },
        );
    }

    // -- server messages ----------------------------------------------------

    #[test]
    fn test_room_joined_wire_shape() {
        let msg = ServerMessage::RoomJoined { player_number: PlayerSlot::ONE };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "RoomJoined");
        assert_eq!(value["playerNumber"], 1);
    }

    #[test]
    fn test_game_started_carries_a_full_snapshot() {
        let msg = ServerMessage::GameStarted {
            game: Game::new(GameKind::TicTacToe),
            player_turn: PlayerSlot::ONE,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "GameStarted");
        assert_eq!(value["playerTurn"], 1);
        assert_eq!(value["game"]["gameType"], "TicTacToe");
        assert_eq!(value["game"]["status"], "Ongoing");
    }

    #[test]
    fn test_turn_result_omits_error_message_on_success() {
        let msg = ServerMessage::TurnResult {
            game: Game::new(GameKind::TicTacToe),
            player_turn: PlayerSlot::TWO,
            error_message: None,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "TurnResult");
        assert_eq!(value["playerTurn"], 2);
        assert!(value.get("errorMessage").is_none());
    }

    #[test]
    fn test_turn_result_carries_the_rejection_reason() {
        let msg = ServerMessage::TurnResult {
            game: Game::new(GameKind::TicTacToe),
            player_turn: PlayerSlot::TWO,
            error_message: Some("square is occupied".into()),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["errorMessage"], "square is occupied");
    }

    #[test]
    fn test_game_finished_wire_shape_for_a_quit() {
        let msg = ServerMessage::GameFinished {
            game: Some(Game::new(GameKind::Checkers)),
            game_result: GameResult::PlayerWin,
            quitting_player_number: Some(PlayerSlot::ONE),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "GameFinished");
        assert_eq!(value["gameResult"], "PlayerWin");
        assert_eq!(value["quittingPlayerNumber"], 1);
        assert_eq!(value["game"]["gameType"], "Checkers");
    }

    #[test]
    fn test_game_finished_before_any_game_has_no_board() {
        let msg = ServerMessage::GameFinished {
            game: None,
            game_result: GameResult::PlayerWin,
            quitting_player_number: Some(PlayerSlot::TWO),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value.get("game").is_none());
        assert_eq!(value["quittingPlayerNumber"], 2);
    }

    #[test]
    fn test_notification_messages_are_bare() {
        for (msg, tag) in [
            (ServerMessage::EnteredGameSelection, "EnteredGameSelection"),
            (ServerMessage::RoomClosed, "RoomClosed"),
            (ServerMessage::RoomDisconnected, "RoomDisconnected"),
            (ServerMessage::RoomUnavailable, "RoomUnavailable"),
        ] {
            let value = serde_json::to_value(&msg).unwrap();
            assert_eq!(value, serde_json::json!({"type": tag}));
            assert_eq!(msg.name(), tag);
        }
    }

    #[test]
    fn test_error_reply_wire_shape() {
        let msg = ServerMessage::error("not your turn");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "Error");
        assert_eq!(value["errorMessage"], "not your turn");
    }

    #[test]
    fn test_server_message_round_trips_with_optional_fields() {
        let msg = ServerMessage::GameFinished {
            game: None,
            game_result: GameResult::Draw,
            quitting_player_number: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ServerMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    // -- decode failures ----------------------------------------------------

    #[test]
    fn test_decode_rejects_garbage() {
        let result: Result<ClientMessage, _> =
            serde_json::from_slice(b"\x00\x01not json");
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_message_type() {
        let result: Result<ClientMessage, _> =
            serde_json::from_str(r#"{"type": "LaunchMissiles"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_rejects_wrong_payload_shape() {
        // A checkers payload under a tic-tac-toe tag.
        let result: Result<ClientMessage, _> = serde_json::from_str(
            r#"{"type": "SendTurn", "gameType": "TicTacToe",
                "turnPayload": {"pieceCoords": {"row": 1, "col": 1},
                                "direction": "Left"}}"#,
        );
        assert!(result.is_err());
    }
}
