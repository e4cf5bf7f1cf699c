//! Game Events
//!
//! Informational side channel produced alongside state transitions. The
//! UI layer turns these into toasts and floating comments; none of them
//! affect the committed document.

use serde::{Deserialize, Serialize};

use crate::game::state::{PlayerId, Power};

/// One informational event from an action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A die was rolled (after REROLL/BOOST adjustments).
    DieRolled {
        /// Roller
        player_id: PlayerId,
        /// Effective roll value
        roll: u8,
    },

    /// The roll overshot the goal; the token stayed put.
    ExactRollNeeded {
        /// The stuck player
        player_id: PlayerId,
        /// Roll value that would win
        needed: u8,
    },

    /// The token climbed a ladder at its landing cell.
    LadderClimbed {
        /// The moving player
        player_id: PlayerId,
        /// Ladder foot
        from: u8,
        /// Ladder top
        to: u8,
    },

    /// The token slid down a snake.
    SnakeBit {
        /// The moving player
        player_id: PlayerId,
        /// Snake head
        from: u8,
        /// Snake tail
        to: u8,
    },

    /// A shield negated a snake and was consumed.
    ShieldBlocked {
        /// The shielded player
        player_id: PlayerId,
        /// Snake head that was negated
        cell: u8,
    },

    /// A mystery box granted a power and locked the box system.
    BoxCollected {
        /// The collector
        player_id: PlayerId,
        /// Cell of the box
        cell: u8,
        /// Power granted
        power: Power,
    },

    /// A held power was activated.
    PowerUsed {
        /// The activating player
        player_id: PlayerId,
        /// Which power
        power: Power,
    },

    /// SWAP_LEADER exchanged two positions.
    PositionsSwapped {
        /// The activating player
        player_id: PlayerId,
        /// The displaced leader
        leader_id: PlayerId,
    },

    /// SWAP_LEADER found no one strictly ahead.
    AlreadyLeader {
        /// The activating player
        player_id: PlayerId,
    },

    /// A player reached the goal cell.
    GameWon {
        /// The winner
        player_id: PlayerId,
    },
}

impl GameEvent {
    /// Player the event is about, for filtering.
    pub fn player_id(&self) -> PlayerId {
        match self {
            GameEvent::DieRolled { player_id, .. }
            | GameEvent::ExactRollNeeded { player_id, .. }
            | GameEvent::LadderClimbed { player_id, .. }
            | GameEvent::SnakeBit { player_id, .. }
            | GameEvent::ShieldBlocked { player_id, .. }
            | GameEvent::BoxCollected { player_id, .. }
            | GameEvent::PowerUsed { player_id, .. }
            | GameEvent::PositionsSwapped { player_id, .. }
            | GameEvent::AlreadyLeader { player_id }
            | GameEvent::GameWon { player_id } => *player_id,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
