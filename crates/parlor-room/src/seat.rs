//! The paired channels tying one player task to its room.
//!
//! A seat is created by the joining side and split in two: the [`Seat`]
//! travels to the room (through the hub), the [`SeatHandle`] stays with
//! the player's connection task. Both directions are bounded, so a
//! room handing out a broadcast waits for the player task to be ready
//! rather than queueing without limit.

use tokio::sync::mpsc;

use parlor_protocol::{ClientMessage, ServerMessage};

use crate::error::RoomError;

/// Creates a connected seat pair with the given channel capacity.
pub fn seat(capacity: usize) -> (Seat, SeatHandle) {
    let (outbound_tx, outbound_rx) = mpsc::channel(capacity);
    let (inbound_tx, inbound_rx) = mpsc::channel(capacity);
    (
        Seat { outbound: outbound_tx, inbound: inbound_rx },
        SeatHandle { requests: inbound_tx, broadcasts: outbound_rx },
    )
}

/// The room's end of one player seat.
///
/// Dropping a `Seat` is how a room lets go of a player: the player task
/// observes the closed broadcast channel.
#[derive(Debug)]
pub struct Seat {
    outbound: mpsc::Sender<ServerMessage>,
    inbound: mpsc::Receiver<ClientMessage>,
}

impl Seat {
    /// Delivers a room message, waiting until the player task can take
    /// it. A player that died mid-send is not an error here: the loss
    /// is reported separately by its closed request channel.
    pub(crate) async fn send(&self, msg: ServerMessage) {
        if self.outbound.send(msg).await.is_err() {
            tracing::debug!("player gone, dropping room message");
        }
    }

    /// Best-effort closure notice. Never waits, so a wedged or
    /// half-closed peer cannot keep a dying room alive.
    pub(crate) fn notify_closed(&self) {
        let _ = self.outbound.try_send(ServerMessage::RoomClosed);
    }

    /// Best-effort join refusal, used by the hub when a seat cannot be
    /// placed at all. Never waits: the hub must not block on one client.
    pub(crate) fn notify_unavailable(&self) {
        let _ = self.outbound.try_send(ServerMessage::RoomUnavailable);
    }

    /// The player's next request; `None` once the player task is gone.
    pub(crate) async fn recv(&mut self) -> Option<ClientMessage> {
        self.inbound.recv().await
    }
}

/// The player's end of one seat.
#[derive(Debug)]
pub struct SeatHandle {
    requests: mpsc::Sender<ClientMessage>,
    broadcasts: mpsc::Receiver<ServerMessage>,
}

impl SeatHandle {
    /// Forwards a client request to the room.
    ///
    /// # Errors
    /// Returns [`RoomError::Unavailable`] when the room task is gone.
    pub async fn send(&self, msg: ClientMessage) -> Result<(), RoomError> {
        self.requests
            .send(msg)
            .await
            .map_err(|_| RoomError::Unavailable)
    }

    /// The next room message. `None` means the room dropped the seat;
    /// if no terminal message came first, the room died abnormally.
    pub async fn recv(&mut self) -> Option<ServerMessage> {
        self.broadcasts.recv().await
    }
}
