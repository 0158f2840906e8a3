//! Error types for rooms and the hub.

/// Errors from room and hub operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room's task is gone and can take no more requests.
    #[error("room is unavailable")]
    Unavailable,

    /// The hub's task is gone, so joins cannot be routed anywhere.
    #[error("hub is shut down")]
    HubClosed,

    /// A game engine reported a validate-before-apply contract breach.
    #[error(transparent)]
    Game(#[from] parlor_game::GameError),

    /// A state the room's own message discipline should make
    /// impossible. Logged at error level and terminates the room that
    /// raised it; other rooms are untouched.
    #[error("room invariant violated: {0}")]
    Invariant(String),
}
