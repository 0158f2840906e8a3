//! The room lifecycle state machine.

use std::fmt;

/// The phases of a room's life, in the order they occur.
///
/// ```text
/// WaitingForPlayerOne → WaitingForPlayerTwo → GameSelection → Running → Closed
/// ```
///
/// - **WaitingForPlayerOne**: Just created; the creating player has not
///   been seated yet.
/// - **WaitingForPlayerTwo**: One player seated, the second seat open.
/// - **GameSelection**: Both seats filled; player 1 is choosing the game.
/// - **Running**: A match is being played.
/// - **Closed**: Terminal. The room task is unwinding and handing its
///   code back to the hub.
///
/// Transitions are strictly forward and never revisited. The one
/// shortcut is `Closed`, reachable from any live phase: a quit or a
/// failure can end a room at any point in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    WaitingForPlayerOne,
    WaitingForPlayerTwo,
    GameSelection,
    Running,
    Closed,
}

impl RoomPhase {
    /// The next phase in the nominal (no-quit) progression.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::WaitingForPlayerOne => Some(Self::WaitingForPlayerTwo),
            Self::WaitingForPlayerTwo => Some(Self::GameSelection),
            Self::GameSelection => Some(Self::Running),
            Self::Running => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid: either the
    /// nominal next step, or a jump straight to `Closed`.
    pub fn can_transition_to(self, target: Self) -> bool {
        if target == Self::Closed {
            return self != Self::Closed;
        }
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WaitingForPlayerOne => write!(f, "WaitingForPlayerOne"),
            Self::WaitingForPlayerTwo => write!(f, "WaitingForPlayerTwo"),
            Self::GameSelection => write!(f, "GameSelection"),
            Self::Running => write!(f, "Running"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_phase_next_follows_strict_order() {
        assert_eq!(
            RoomPhase::WaitingForPlayerOne.next(),
            Some(RoomPhase::WaitingForPlayerTwo)
        );
        assert_eq!(
            RoomPhase::WaitingForPlayerTwo.next(),
            Some(RoomPhase::GameSelection)
        );
        assert_eq!(RoomPhase::GameSelection.next(), Some(RoomPhase::Running));
        assert_eq!(RoomPhase::Running.next(), Some(RoomPhase::Closed));
        assert_eq!(RoomPhase::Closed.next(), None);
    }

    #[test]
    fn test_room_phase_never_moves_backward() {
        assert!(!RoomPhase::GameSelection
            .can_transition_to(RoomPhase::WaitingForPlayerTwo));
        assert!(!RoomPhase::Running.can_transition_to(RoomPhase::GameSelection));
        assert!(!RoomPhase::Closed
            .can_transition_to(RoomPhase::WaitingForPlayerOne));
    }

    #[test]
    fn test_room_phase_cannot_skip_forward_except_to_closed() {
        assert!(!RoomPhase::WaitingForPlayerOne
            .can_transition_to(RoomPhase::GameSelection));
        assert!(!RoomPhase::WaitingForPlayerTwo
            .can_transition_to(RoomPhase::Running));
    }

    #[test]
    fn test_closed_is_reachable_from_any_live_phase() {
        assert!(RoomPhase::WaitingForPlayerOne.can_transition_to(RoomPhase::Closed));
        assert!(RoomPhase::WaitingForPlayerTwo.can_transition_to(RoomPhase::Closed));
        assert!(RoomPhase::GameSelection.can_transition_to(RoomPhase::Closed));
        assert!(RoomPhase::Running.can_transition_to(RoomPhase::Closed));
        assert!(!RoomPhase::Closed.can_transition_to(RoomPhase::Closed));
    }

    #[test]
    fn test_room_phase_display() {
        assert_eq!(RoomPhase::WaitingForPlayerTwo.to_string(), "WaitingForPlayerTwo");
        assert_eq!(RoomPhase::Running.to_string(), "Running");
    }
}
