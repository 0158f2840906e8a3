//! The room actor: one task per room, owning all match state.
//!
//! A room's whole life is a single select loop over three inputs — the
//! hub's join channel and the two seats. Because the loop handles one
//! message at a time, every rule check and board mutation is naturally
//! serialized without a lock anywhere.

use tokio::sync::mpsc;

use parlor_protocol::{
    ClientMessage, Game, GameKind, GameStatus, PlayerSlot, RoomCode, ServerMessage,
    Turn,
};

use crate::error::RoomError;
use crate::lifecycle::RoomPhase;
use crate::seat::Seat;

/// What a handled message means for the room's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Close,
}

/// The hub's sending half for routing joiners into a room.
#[derive(Debug, Clone)]
pub(crate) struct RoomHandle {
    joins: mpsc::Sender<Seat>,
}

impl RoomHandle {
    /// Hands a seat to the room. Gives the seat back if the room's
    /// inbox already closed, so the caller can refuse the join.
    pub(crate) async fn route(&self, seat: Seat) -> Result<(), Seat> {
        self.joins.send(seat).await.map_err(|e| e.0)
    }
}

/// Spawns a room task and returns the handle the hub keeps in its map.
///
/// The room pushes `code` into `reclaim` exactly once when it ends, no
/// matter how it ends; until then the hub keeps routing joiners here.
pub(crate) fn spawn_room(
    code: RoomCode,
    reclaim: mpsc::Sender<RoomCode>,
    capacity: usize,
) -> RoomHandle {
    let (joins_tx, joins_rx) = mpsc::channel(capacity);
    let room = Room {
        code,
        phase: RoomPhase::WaitingForPlayerOne,
        joins: Some(joins_rx),
        seat_one: None,
        seat_two: None,
        game: None,
        player_turn: PlayerSlot::ONE,
        reclaim,
    };
    tokio::spawn(room.run());
    RoomHandle { joins: joins_tx }
}

struct Room {
    code: RoomCode,
    phase: RoomPhase,
    /// Join inbox; `None` once the hub is gone and no more can arrive.
    joins: Option<mpsc::Receiver<Seat>>,
    seat_one: Option<Seat>,
    seat_two: Option<Seat>,
    game: Option<Game>,
    player_turn: PlayerSlot,
    reclaim: mpsc::Sender<RoomCode>,
}

impl Room {
    async fn run(mut self) {
        tracing::info!(room_code = %self.code, "room opened");
        if let Err(e) = self.serve().await {
            // No closure handshake on this path: the seats drop with the
            // room, and each player task reports the lost room to its
            // client as a forced disconnect.
            tracing::error!(room_code = %self.code, error = %e, "room aborted");
        }
        // The code must be handed back exactly once however the room
        // ended, or it could never be reused.
        if self.reclaim.send(self.code.clone()).await.is_err() {
            tracing::warn!(room_code = %self.code, "hub gone, code not reclaimed");
        }
        tracing::info!(room_code = %self.code, "room closed");
    }

    async fn serve(&mut self) -> Result<(), RoomError> {
        loop {
            let flow = tokio::select! {
                seat = Self::next_join(&mut self.joins) => match seat {
                    Some(seat) => self.handle_join(seat).await?,
                    None => {
                        // Hub gone (server shutting down). No more joins
                        // can arrive; a seated match plays on to its end.
                        self.joins = None;
                        Flow::Continue
                    }
                },
                msg = Self::next_request(&mut self.seat_one) => {
                    self.handle_seat(PlayerSlot::ONE, msg).await?
                }
                msg = Self::next_request(&mut self.seat_two) => {
                    self.handle_seat(PlayerSlot::TWO, msg).await?
                }
            };
            if flow == Flow::Close {
                return Ok(());
            }
        }
    }

    /// Waits on the join inbox, or parks forever once it's gone.
    async fn next_join(joins: &mut Option<mpsc::Receiver<Seat>>) -> Option<Seat> {
        match joins {
            Some(joins) => joins.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Waits on a seat that may not be filled yet; an empty seat never
    /// yields, keeping the select loop parked on the other inputs.
    async fn next_request(seat: &mut Option<Seat>) -> Option<ClientMessage> {
        match seat {
            Some(seat) => seat.recv().await,
            None => std::future::pending().await,
        }
    }

    // -- joining ------------------------------------------------------------

    async fn handle_join(&mut self, seat: Seat) -> Result<Flow, RoomError> {
        match self.phase {
            RoomPhase::WaitingForPlayerOne => {
                seat.send(ServerMessage::RoomJoined {
                    player_number: PlayerSlot::ONE,
                })
                .await;
                self.seat_one = Some(seat);
                self.advance(RoomPhase::WaitingForPlayerTwo)?;
                tracing::info!(room_code = %self.code, "player 1 seated");
                Ok(Flow::Continue)
            }
            RoomPhase::WaitingForPlayerTwo => {
                seat.send(ServerMessage::RoomJoined {
                    player_number: PlayerSlot::TWO,
                })
                .await;
                self.seat_two = Some(seat);
                self.advance(RoomPhase::GameSelection)?;
                tracing::info!(room_code = %self.code, "player 2 seated, selecting game");
                self.broadcast(ServerMessage::EnteredGameSelection).await;
                Ok(Flow::Continue)
            }
            RoomPhase::GameSelection | RoomPhase::Running => {
                tracing::debug!(room_code = %self.code, phase = %self.phase, "join refused, room full");
                seat.notify_unavailable();
                Ok(Flow::Continue)
            }
            RoomPhase::Closed => Err(RoomError::Invariant(format!(
                "join routed to closed room {}",
                self.code,
            ))),
        }
    }

    // -- player requests ----------------------------------------------------

    async fn handle_seat(
        &mut self,
        slot: PlayerSlot,
        msg: Option<ClientMessage>,
    ) -> Result<Flow, RoomError> {
        match msg {
            Some(msg) => self.handle_request(slot, msg).await,
            // A dead request channel means the player task is gone;
            // treat it as that player quitting.
            None => {
                tracing::info!(room_code = %self.code, player = %slot, "seat channel dropped");
                self.quit(slot).await
            }
        }
    }

    async fn handle_request(
        &mut self,
        slot: PlayerSlot,
        msg: ClientMessage,
    ) -> Result<Flow, RoomError> {
        tracing::debug!(room_code = %self.code, player = %slot, msg = msg.name(), "room request");
        match self.phase {
            RoomPhase::WaitingForPlayerOne => Err(RoomError::Invariant(format!(
                "request from {slot} before any seat was filled in room {}",
                self.code,
            ))),
            RoomPhase::WaitingForPlayerTwo => match msg {
                ClientMessage::QuitRoom => self.quit(slot).await,
                other => {
                    self.reject(
                        slot,
                        format!(
                            "{} is not allowed while waiting for an opponent",
                            other.name(),
                        ),
                    )
                    .await;
                    Ok(Flow::Continue)
                }
            },
            RoomPhase::GameSelection => match msg {
                ClientMessage::SelectGameType { game_type } => {
                    self.start_game(slot, game_type).await
                }
                ClientMessage::QuitRoom => self.quit(slot).await,
                other => {
                    self.reject(
                        slot,
                        format!("{} is not allowed during game selection", other.name()),
                    )
                    .await;
                    Ok(Flow::Continue)
                }
            },
            RoomPhase::Running => match msg {
                ClientMessage::SendTurn { turn } => self.play_turn(slot, turn).await,
                ClientMessage::Concede => self.concede(slot).await,
                ClientMessage::QuitRoom => self.quit(slot).await,
                other => {
                    self.reject(
                        slot,
                        format!("{} is not allowed during a running game", other.name()),
                    )
                    .await;
                    Ok(Flow::Continue)
                }
            },
            RoomPhase::Closed => Err(RoomError::Invariant(format!(
                "request from {slot} after room {} closed",
                self.code,
            ))),
        }
    }

    async fn start_game(
        &mut self,
        slot: PlayerSlot,
        kind: GameKind,
    ) -> Result<Flow, RoomError> {
        if slot != PlayerSlot::ONE {
            self.reject(slot, "only player 1 may select the game".to_owned())
                .await;
            return Ok(Flow::Continue);
        }

        let game = Game::new(kind);
        self.player_turn = PlayerSlot::ONE;
        tracing::info!(room_code = %self.code, game = %kind, "game selected");
        self.broadcast(ServerMessage::GameStarted {
            game: game.clone(),
            player_turn: self.player_turn,
        })
        .await;
        self.game = Some(game);
        self.advance(RoomPhase::Running)?;
        Ok(Flow::Continue)
    }

    async fn play_turn(&mut self, slot: PlayerSlot, turn: Turn) -> Result<Flow, RoomError> {
        let Some(game) = &self.game else {
            return Err(RoomError::Invariant(format!(
                "turn with no game running in room {}",
                self.code,
            )));
        };

        // Turn order and rules are checked against the current board;
        // a rejected move goes back to the sender alone, with the board
        // and turn unchanged so the client can tell nothing moved.
        let rejection = if slot != self.player_turn {
            Some("not your turn".to_owned())
        } else {
            game.validate(&turn, slot).err().map(|e| e.to_string())
        };
        if let Some(reason) = rejection {
            tracing::debug!(room_code = %self.code, player = %slot, %reason, "move rejected");
            let reply = ServerMessage::TurnResult {
                game: game.clone(),
                player_turn: self.player_turn,
                error_message: Some(reason),
            };
            self.send_to(slot, reply).await;
            return Ok(Flow::Continue);
        }

        // Apply on a working copy and write it back; the broadcast
        // needs its own snapshot anyway.
        let mut game = game.clone();
        let note = game.apply(&turn, slot)?;
        if let Some(note) = &note {
            tracing::debug!(room_code = %self.code, player = %slot, %note, "turn note");
        }
        tracing::debug!(room_code = %self.code, board = %game.render_board(), "board after turn");
        let update = game.clone();
        let status = game.status();
        self.game = Some(game);

        if status.is_terminal() {
            tracing::info!(room_code = %self.code, status = %status, "game over");
            return self.finish_match(Some(update), status, None).await;
        }

        self.player_turn = slot.other();
        self.broadcast(ServerMessage::TurnResult {
            game: update,
            player_turn: self.player_turn,
            error_message: None,
        })
        .await;
        Ok(Flow::Continue)
    }

    async fn concede(&mut self, slot: PlayerSlot) -> Result<Flow, RoomError> {
        let Some(game) = self.game.as_mut() else {
            return Err(RoomError::Invariant(format!(
                "concession with no game running in room {}",
                self.code,
            )));
        };
        tracing::info!(room_code = %self.code, player = %slot, "player conceded");
        let status = GameStatus::win_for(slot.other());
        game.override_status(status);
        let snapshot = self.game.clone();
        self.finish_match(snapshot, status, None).await
    }

    /// Any quit ends the room for everyone. The remaining player (if
    /// any) is told the match is theirs; the quitter gets a best-effort
    /// closure acknowledgement, since a quit synthesized from a dead
    /// connection has nobody left to read it.
    async fn quit(&mut self, slot: PlayerSlot) -> Result<Flow, RoomError> {
        tracing::info!(room_code = %self.code, player = %slot, phase = %self.phase, "player quit");
        match self.phase {
            RoomPhase::WaitingForPlayerTwo => {
                self.ack_quit(slot);
                self.advance(RoomPhase::Closed)?;
                Ok(Flow::Close)
            }
            RoomPhase::GameSelection => {
                let status = GameStatus::win_for(slot.other());
                self.finish_match(None, status, Some(slot)).await
            }
            RoomPhase::Running => {
                let status = GameStatus::win_for(slot.other());
                if let Some(game) = self.game.as_mut() {
                    game.override_status(status);
                }
                let snapshot = self.game.clone();
                self.finish_match(snapshot, status, Some(slot)).await
            }
            RoomPhase::WaitingForPlayerOne | RoomPhase::Closed => {
                Err(RoomError::Invariant(format!(
                    "quit from {slot} while room {} is {}",
                    self.code, self.phase,
                )))
            }
        }
    }

    /// Per-recipient finish broadcast, then the room is done. The same
    /// status reads as `PlayerWin` to one seat and `PlayerLose` to the
    /// other, so each seat gets its own message, player 1 first.
    async fn finish_match(
        &mut self,
        game: Option<Game>,
        status: GameStatus,
        quitter: Option<PlayerSlot>,
    ) -> Result<Flow, RoomError> {
        for slot in [PlayerSlot::ONE, PlayerSlot::TWO] {
            if Some(slot) == quitter {
                continue; // the quitter gets the closure ack instead
            }
            let Some(result) = status.result_for(slot) else {
                return Err(RoomError::Invariant(format!(
                    "match finished while status is {status} in room {}",
                    self.code,
                )));
            };
            self.send_to(
                slot,
                ServerMessage::GameFinished {
                    game: game.clone(),
                    game_result: result,
                    quitting_player_number: quitter,
                },
            )
            .await;
        }
        if let Some(slot) = quitter {
            self.ack_quit(slot);
        }
        self.advance(RoomPhase::Closed)?;
        Ok(Flow::Close)
    }

    // -- delivery helpers ---------------------------------------------------

    /// Error reply to one seat; the match state is untouched.
    async fn reject(&self, slot: PlayerSlot, reason: String) {
        tracing::debug!(room_code = %self.code, player = %slot, %reason, "request rejected");
        self.send_to(slot, ServerMessage::error(reason)).await;
    }

    async fn send_to(&self, slot: PlayerSlot, msg: ServerMessage) {
        let seat = if slot == PlayerSlot::ONE {
            &self.seat_one
        } else {
            &self.seat_two
        };
        if let Some(seat) = seat {
            seat.send(msg).await;
        }
    }

    /// Delivers `msg` to both seats, always player 1 first.
    async fn broadcast(&self, msg: ServerMessage) {
        self.send_to(PlayerSlot::ONE, msg.clone()).await;
        self.send_to(PlayerSlot::TWO, msg).await;
    }

    /// Best-effort closure ack for a quitting (possibly dead) player.
    fn ack_quit(&self, slot: PlayerSlot) {
        let seat = if slot == PlayerSlot::ONE {
            &self.seat_one
        } else {
            &self.seat_two
        };
        if let Some(seat) = seat {
            seat.notify_closed();
        }
    }

    fn advance(&mut self, to: RoomPhase) -> Result<(), RoomError> {
        if !self.phase.can_transition_to(to) {
            return Err(RoomError::Invariant(format!(
                "illegal phase change {} -> {to} in room {}",
                self.phase, self.code,
            )));
        }
        tracing::debug!(room_code = %self.code, from = %self.phase, to = %to, "phase change");
        self.phase = to;
        Ok(())
    }
}
