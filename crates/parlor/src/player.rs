//! The connection actor: one task per client, bridging socket and room.
//!
//! The actor owns a small state machine mirroring the player's place in
//! the session (not joined, waiting, selecting, playing) and enforces
//! it locally: a request that makes no sense in the current phase gets
//! an `Error` reply and never reaches a room. A dedicated read-pump
//! task owns the inbound half of the connection, so the client is
//! always being read even while the actor waits on its room.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use parlor_protocol::{ClientMessage, Codec, ProtocolError, RoomCode, ServerMessage};
use parlor_room::{seat, HubHandle, RoomError, SeatHandle};
use parlor_transport::{Connection, WebSocketConnection};

use crate::ServerError;

/// Where a connection stands in the session protocol.
///
/// Transitions are driven by room broadcasts, so this view can lag the
/// room by an in-flight message but never disagree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerPhase {
    NotInRoom,
    WaitingRoom,
    GameSelection,
    InRoom,
}

impl PlayerPhase {
    /// Whether a client may legitimately send `msg` in this phase.
    fn permits(self, msg: &ClientMessage) -> bool {
        match self {
            PlayerPhase::NotInRoom => matches!(msg, ClientMessage::JoinRoom { .. }),
            PlayerPhase::WaitingRoom => matches!(msg, ClientMessage::QuitRoom),
            PlayerPhase::GameSelection => matches!(
                msg,
                ClientMessage::SelectGameType { .. } | ClientMessage::QuitRoom,
            ),
            PlayerPhase::InRoom => matches!(
                msg,
                ClientMessage::SendTurn { .. }
                    | ClientMessage::Concede
                    | ClientMessage::QuitRoom,
            ),
        }
    }

    /// The phase as it reads in a rejection text.
    fn describe(self) -> &'static str {
        match self {
            PlayerPhase::NotInRoom => "while not in a room",
            PlayerPhase::WaitingRoom => "while waiting for an opponent",
            PlayerPhase::GameSelection => "during game selection",
            PlayerPhase::InRoom => "during a running game",
        }
    }
}

impl fmt::Display for PlayerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlayerPhase::NotInRoom => "NotInRoom",
            PlayerPhase::WaitingRoom => "WaitingRoom",
            PlayerPhase::GameSelection => "GameSelection",
            PlayerPhase::InRoom => "InRoom",
        };
        f.write_str(name)
    }
}

/// What a handled message means for the actor's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

/// Handles one client connection from accept to hangup.
pub(crate) async fn handle_connection<C: Codec + Clone>(
    conn: WebSocketConnection,
    hub: HubHandle,
    codec: C,
    capacity: usize,
) -> Result<(), ServerError> {
    let conn = Arc::new(conn);
    let inbound = spawn_read_pump(Arc::clone(&conn), codec.clone(), capacity);
    let mut player = Player {
        conn,
        codec,
        hub,
        capacity,
        inbound,
        phase: PlayerPhase::NotInRoom,
        seat: None,
    };
    tracing::info!(conn = %player.conn.id(), "client connected");
    let result = player.serve().await;
    player.hang_up().await;
    tracing::info!(conn = %player.conn.id(), "client gone");
    result
}

/// Owns the inbound half of the connection: reads frames, decodes
/// them, and feeds the actor. Decode failures travel the channel too:
/// they are protocol violations for the actor to answer, not transport
/// failures.
fn spawn_read_pump<C: Codec>(
    conn: Arc<WebSocketConnection>,
    codec: C,
    capacity: usize,
) -> mpsc::Receiver<Result<ClientMessage, ProtocolError>> {
    let (tx, rx) = mpsc::channel(capacity);
    tokio::spawn(async move {
        loop {
            match conn.recv().await {
                Ok(Some(bytes)) => {
                    if tx.send(codec.decode(&bytes)).await.is_err() {
                        break; // actor gone
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::debug!(conn = %conn.id(), error = %e, "read failed");
                    break;
                }
            }
        }
    });
    rx
}

struct Player<C: Codec> {
    conn: Arc<WebSocketConnection>,
    codec: C,
    hub: HubHandle,
    capacity: usize,
    inbound: mpsc::Receiver<Result<ClientMessage, ProtocolError>>,
    phase: PlayerPhase,
    seat: Option<SeatHandle>,
}

impl<C: Codec> Player<C> {
    async fn serve(&mut self) -> Result<(), ServerError> {
        loop {
            let flow = tokio::select! {
                msg = self.inbound.recv() => match msg {
                    Some(Ok(msg)) => self.handle_client(msg).await?,
                    Some(Err(e)) => {
                        tracing::debug!(conn = %self.conn.id(), error = %e, "bad client message");
                        self.send(&ServerMessage::error(e.to_string())).await?;
                        Flow::Continue
                    }
                    // Connection gone, cleanly or not. `hang_up` tells
                    // the room, if we hold a seat.
                    None => return Ok(()),
                },
                msg = Self::next_broadcast(&mut self.seat) => match msg {
                    Some(msg) => self.handle_room(msg).await?,
                    None => {
                        // The room vanished without a closing handshake.
                        tracing::warn!(conn = %self.conn.id(), "room dropped its seat");
                        self.seat = None;
                        self.send(&ServerMessage::RoomDisconnected).await?;
                        Flow::Close
                    }
                },
            };
            if flow == Flow::Close {
                return Ok(());
            }
        }
    }

    /// Waits on the room, or parks forever when no seat is held.
    async fn next_broadcast(seat: &mut Option<SeatHandle>) -> Option<ServerMessage> {
        match seat {
            Some(seat) => seat.recv().await,
            None => std::future::pending().await,
        }
    }

    // -- client requests ------------------------------------------------

    async fn handle_client(&mut self, msg: ClientMessage) -> Result<Flow, ServerError> {
        tracing::debug!(conn = %self.conn.id(), msg = msg.name(), phase = %self.phase, "client request");
        if !self.phase.permits(&msg) {
            let text = format!("{} is not allowed {}", msg.name(), self.phase.describe());
            self.send(&ServerMessage::error(text)).await?;
            return Ok(Flow::Continue);
        }
        match msg {
            ClientMessage::JoinRoom { room_code } => self.join(room_code).await,
            msg => self.forward(msg).await,
        }
    }

    /// Asks the hub for a seat in the named room. The phase advances
    /// only when `RoomJoined` comes back, so a refused join leaves the
    /// client free to try another code.
    async fn join(&mut self, code: RoomCode) -> Result<Flow, ServerError> {
        if self.seat.is_some() {
            // The previous join hasn't been answered yet.
            let err = ProtocolError::InvalidMessage("a join is already pending".to_owned());
            self.send(&ServerMessage::error(err.to_string())).await?;
            return Ok(Flow::Continue);
        }
        let (seat, handle) = seat(self.capacity);
        match self.hub.join(code, seat).await {
            Ok(()) => {
                self.seat = Some(handle);
                Ok(Flow::Continue)
            }
            Err(e) => {
                // Hub gone: the server is shutting down and nothing
                // will ever seat this player.
                tracing::warn!(conn = %self.conn.id(), error = %e, "join failed");
                self.send(&ServerMessage::RoomUnavailable).await?;
                Ok(Flow::Close)
            }
        }
    }

    async fn forward(&mut self, msg: ClientMessage) -> Result<Flow, ServerError> {
        let Some(seat) = &self.seat else {
            // permits() keeps room traffic out of seatless phases.
            return Err(RoomError::Invariant(
                "phase allows room traffic but no seat is held".to_owned(),
            )
            .into());
        };
        if seat.send(msg).await.is_err() {
            // The room hung up with broadcasts possibly still queued;
            // let the loop drain those rather than cut the client off.
            tracing::debug!(conn = %self.conn.id(), "request dropped, room closing");
        }
        Ok(Flow::Continue)
    }

    // -- room broadcasts --------------------------------------------------

    async fn handle_room(&mut self, msg: ServerMessage) -> Result<Flow, ServerError> {
        tracing::debug!(conn = %self.conn.id(), msg = msg.name(), "room message");
        match &msg {
            ServerMessage::RoomJoined { player_number } => {
                tracing::info!(conn = %self.conn.id(), player = %player_number, "seated");
                self.advance(PlayerPhase::WaitingRoom);
            }
            ServerMessage::EnteredGameSelection => {
                self.advance(PlayerPhase::GameSelection);
            }
            ServerMessage::GameStarted { .. } => {
                self.advance(PlayerPhase::InRoom);
            }
            ServerMessage::RoomUnavailable => {
                // Join refused. The phase never advanced, so dropping
                // the dead seat is all it takes to allow another try.
                self.seat = None;
            }
            ServerMessage::GameFinished { .. } | ServerMessage::RoomClosed => {
                // The match is over; the session ends with it.
                self.send(&msg).await?;
                self.seat = None;
                return Ok(Flow::Close);
            }
            _ => {}
        }
        self.send(&msg).await?;
        Ok(Flow::Continue)
    }

    fn advance(&mut self, to: PlayerPhase) {
        tracing::debug!(conn = %self.conn.id(), from = %self.phase, to = %to, "phase change");
        self.phase = to;
    }

    // -- plumbing ---------------------------------------------------------

    /// Encodes and writes one message to the client.
    async fn send(&self, msg: &ServerMessage) -> Result<(), ServerError> {
        let bytes = self.codec.encode(msg)?;
        self.conn.send(&bytes).await?;
        Ok(())
    }

    /// Final cleanup. A still-held seat means the client left without
    /// quitting; the room must hear a quit so the opponent isn't left
    /// waiting forever.
    async fn hang_up(&mut self) {
        if let Some(seat) = self.seat.take() {
            if seat.send(ClientMessage::QuitRoom).await.is_err() {
                tracing::debug!(conn = %self.conn.id(), "room already gone at hangup");
            }
        }
        let _ = self.conn.close().await;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_protocol::{Coords, GameKind, Turn};

    fn a_turn() -> ClientMessage {
        ClientMessage::SendTurn {
            turn: Turn::TicTacToe {
                coords: Coords::new(0, 0),
            },
        }
    }

    fn a_selection() -> ClientMessage {
        ClientMessage::SelectGameType {
            game_type: GameKind::TicTacToe,
        }
    }

    fn a_join() -> ClientMessage {
        ClientMessage::JoinRoom {
            room_code: "den".into(),
        }
    }

    #[test]
    fn test_not_in_room_permits_only_joining() {
        let phase = PlayerPhase::NotInRoom;
        assert!(phase.permits(&a_join()));
        assert!(!phase.permits(&a_turn()));
        assert!(!phase.permits(&a_selection()));
        assert!(!phase.permits(&ClientMessage::QuitRoom));
        assert!(!phase.permits(&ClientMessage::Concede));
    }

    #[test]
    fn test_waiting_room_permits_only_quitting() {
        let phase = PlayerPhase::WaitingRoom;
        assert!(phase.permits(&ClientMessage::QuitRoom));
        assert!(!phase.permits(&a_join()));
        assert!(!phase.permits(&a_turn()));
        assert!(!phase.permits(&a_selection()));
    }

    #[test]
    fn test_game_selection_permits_selecting_and_quitting() {
        let phase = PlayerPhase::GameSelection;
        assert!(phase.permits(&a_selection()));
        assert!(phase.permits(&ClientMessage::QuitRoom));
        assert!(!phase.permits(&a_join()));
        assert!(!phase.permits(&a_turn()));
        assert!(!phase.permits(&ClientMessage::Concede));
    }

    #[test]
    fn test_in_room_permits_match_traffic() {
        let phase = PlayerPhase::InRoom;
        assert!(phase.permits(&a_turn()));
        assert!(phase.permits(&ClientMessage::Concede));
        assert!(phase.permits(&ClientMessage::QuitRoom));
        assert!(!phase.permits(&a_join()));
        assert!(!phase.permits(&a_selection()));
    }

    #[test]
    fn test_rejection_texts_name_the_phase() {
        assert_eq!(
            PlayerPhase::NotInRoom.describe(),
            "while not in a room",
        );
        assert_eq!(
            PlayerPhase::WaitingRoom.describe(),
            "while waiting for an opponent",
        );
        assert_eq!(
            PlayerPhase::GameSelection.describe(),
            "during game selection",
        );
        assert_eq!(
            PlayerPhase::InRoom.describe(),
            "during a running game",
        );
    }
}
