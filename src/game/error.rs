//! Error Taxonomy
//!
//! Every action fails fast with a typed error whose `Display` form is the
//! short human-readable message shown to the user. No partial mutation is
//! ever committed - a failing transaction aborts whole.
//!
//! Concurrency conflicts are not represented here: the store retries them
//! transparently and they never surface on success.

use crate::store::StoreError;

/// Coarse classification of a failure, for callers that route
/// validation problems and precondition problems differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape or range; the request itself was malformed.
    Validation,
    /// The request was well-formed but the room is in the wrong state.
    Precondition,
    /// The document store itself failed.
    Store,
}

/// Everything that can go wrong applying an action to a room.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GameError {
    /// Room code did not normalize to 6 alphanumerics.
    #[error("enter a valid 6-character room code")]
    InvalidRoomCode,

    /// Create hit an existing room code.
    #[error("room code already in use")]
    RoomCodeTaken,

    /// No document behind the room code.
    #[error("room not found")]
    RoomNotFound,

    /// Join hit the player cap.
    #[error("room is full")]
    RoomFull,

    /// Join from an identity already in the room.
    #[error("already in this room")]
    AlreadyJoined,

    /// The acting player is not in the room.
    #[error("player not found in room")]
    PlayerNotFound,

    /// Host-only action attempted by a non-host.
    #[error("only the host can do that")]
    NotHost,

    /// Action attempted in the wrong phase.
    #[error("wrong phase: expected {expected}, room is {found}")]
    WrongPhase {
        /// Phase the action requires
        expected: crate::game::state::Phase,
        /// Phase the room is actually in
        found: crate::game::state::Phase,
    },

    /// Explicit phase change outside the allowed transitions.
    #[error("cannot change phase from {from} to {to}")]
    PhaseChange {
        /// Phase the room is in
        from: crate::game::state::Phase,
        /// Phase that was requested
        to: crate::game::state::Phase,
    },

    /// A game action needs at least two players.
    #[error("need 2+ players")]
    NotEnoughPlayers,

    /// Start attempted before everyone finished placement.
    #[error("all players must finish placement and be ready")]
    PlayersNotReady,

    /// Roll attempted out of turn.
    #[error("not your turn - it's {name}'s turn")]
    NotYourTurn {
        /// Display name of the player whose turn it is
        name: String,
    },

    /// Roll attempted while a move animation is still running.
    #[error("animation in progress")]
    AnimationInProgress,

    /// Roll attempted after the game finished.
    #[error("game already finished")]
    GameFinished,

    /// Placement cap for this kind already reached.
    #[error("you can only have {limit} {kind}s")]
    PlacementLimit {
        /// "ladder" or "snake"
        kind: &'static str,
        /// The cap that was hit
        limit: usize,
    },

    /// Ladder placed downward or snake placed upward.
    #[error("{kind} must go {direction} (to a {direction_cell} number)")]
    WrongDirection {
        /// "ladder" or "snake"
        kind: &'static str,
        /// "up" or "down"
        direction: &'static str,
        /// "higher" or "lower"
        direction_cell: &'static str,
    },

    /// A placement cell is off the board, or `from == to`.
    #[error("placement cells must be distinct board cells")]
    InvalidPlacementCells,

    /// Placement edit attempted while marked ready.
    #[error("unready yourself to edit placements")]
    LockedWhileReady,

    /// The store transport failed.
    #[error("store unavailable: {0}")]
    Store(StoreError),
}

impl GameError {
    /// Classify this error for routing.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::InvalidRoomCode
            | GameError::PlacementLimit { .. }
            | GameError::WrongDirection { .. }
            | GameError::InvalidPlacementCells => ErrorKind::Validation,

            GameError::RoomCodeTaken
            | GameError::RoomNotFound
            | GameError::RoomFull
            | GameError::AlreadyJoined
            | GameError::PlayerNotFound
            | GameError::NotHost
            | GameError::WrongPhase { .. }
            | GameError::PhaseChange { .. }
            | GameError::NotEnoughPlayers
            | GameError::PlayersNotReady
            | GameError::NotYourTurn { .. }
            | GameError::AnimationInProgress
            | GameError::GameFinished
            | GameError::LockedWhileReady => ErrorKind::Precondition,

            GameError::Store(_) => ErrorKind::Store,
        }
    }
}

/// Store failures with a game-level meaning become the matching game
/// error; everything else carries through as a store failure.
impl From<StoreError> for GameError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => GameError::RoomNotFound,
            StoreError::AlreadyExists => GameError::RoomCodeTaken,
            other => GameError::Store(other),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
