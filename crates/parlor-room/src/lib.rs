//! Room and hub actors for Parlor.
//!
//! Every room runs as its own Tokio task owning all of one match's
//! state, and the hub is a single routing task owning the code → room
//! map. Nothing here is locked or shared: players talk to rooms over
//! bounded channels, and a room handles one message at a time, so two
//! moves can never interleave.
//!
//! # Key types
//!
//! - [`HubHandle`] — route a join to a room by code, creating the room
//!   when the code is new
//! - [`Seat`] / [`SeatHandle`] — the channel pair tying one player task
//!   to its room
//! - [`RoomPhase`] — the forward-only room lifecycle
//! - [`RoomError`] — what can go wrong, including invariant breaches

mod error;
mod hub;
mod lifecycle;
mod room;
mod seat;

pub use error::RoomError;
pub use hub::{spawn_hub, HubHandle};
pub use lifecycle::RoomPhase;
pub use seat::{seat, Seat, SeatHandle};

/// Default bound for seat and hub channels. Kept small so a room
/// handing a broadcast to a stalled player blocks instead of queueing
/// an unbounded backlog.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 8;
