//! The hub: the single owner of the room-code namespace.
//!
//! Every join goes through the hub task, so "create the room" and
//! "route into the existing room" are one atomic step and two players
//! naming the same code always land in the same room. Rooms hand their
//! code back through the reclaim channel when they end, which frees
//! the code for a brand-new room.

use std::collections::HashMap;

use tokio::sync::mpsc;

use parlor_protocol::RoomCode;

use crate::error::RoomError;
use crate::room::{spawn_room, RoomHandle};
use crate::seat::Seat;

/// Starts the hub task. `capacity` bounds every channel the hub and
/// its rooms create.
pub fn spawn_hub(capacity: usize) -> HubHandle {
    let (requests_tx, requests_rx) = mpsc::channel(capacity);
    let (reclaim_tx, reclaim_rx) = mpsc::channel(capacity);
    let hub = Hub {
        rooms: HashMap::new(),
        requests: requests_rx,
        reclaim_tx,
        reclaim_rx,
        capacity,
    };
    tokio::spawn(hub.run());
    HubHandle {
        requests: requests_tx,
    }
}

/// A cloneable handle for joining rooms; one per connection task.
#[derive(Debug, Clone)]
pub struct HubHandle {
    requests: mpsc::Sender<JoinRequest>,
}

impl HubHandle {
    /// Asks the hub to seat `seat` in the room named `code`, creating
    /// the room if the code is free. The outcome arrives on the seat
    /// itself: `RoomJoined` on success, `RoomUnavailable` if the room
    /// is full or shutting down.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::HubClosed`] if the hub task has stopped.
    pub async fn join(&self, code: RoomCode, seat: Seat) -> Result<(), RoomError> {
        self.requests
            .send(JoinRequest { code, seat })
            .await
            .map_err(|_| RoomError::HubClosed)
    }
}

struct JoinRequest {
    code: RoomCode,
    seat: Seat,
}

struct Hub {
    rooms: HashMap<RoomCode, RoomHandle>,
    requests: mpsc::Receiver<JoinRequest>,
    reclaim_tx: mpsc::Sender<RoomCode>,
    reclaim_rx: mpsc::Receiver<RoomCode>,
    capacity: usize,
}

impl Hub {
    async fn run(mut self) {
        tracing::info!("hub started");
        loop {
            tokio::select! {
                req = self.requests.recv() => match req {
                    Some(req) => self.route(req).await,
                    // Every handle dropped: the server is going down.
                    None => break,
                },
                code = self.reclaim_rx.recv() => {
                    // The hub keeps a sender half, so the reclaim
                    // channel outlives every room.
                    if let Some(code) = code {
                        self.reclaim(code);
                    }
                }
            }
        }
        tracing::info!(open_rooms = self.rooms.len(), "hub stopped");
    }

    async fn route(&mut self, JoinRequest { code, seat }: JoinRequest) {
        let room = self.rooms.entry(code.clone()).or_insert_with(|| {
            tracing::info!(room_code = %code, "creating room");
            spawn_room(code.clone(), self.reclaim_tx.clone(), self.capacity)
        });
        if let Err(seat) = room.route(seat).await {
            // The room stopped reading joins but its reclaim hasn't
            // landed yet. The stale entry goes when it does; this
            // joiner is simply refused.
            tracing::debug!(room_code = %code, "join raced a terminating room");
            seat.notify_unavailable();
        }
    }

    fn reclaim(&mut self, code: RoomCode) {
        if self.rooms.remove(&code).is_some() {
            tracing::info!(room_code = %code, "room code reclaimed");
        } else {
            tracing::error!(room_code = %code, "reclaim for a code the hub does not know");
        }
    }
}
