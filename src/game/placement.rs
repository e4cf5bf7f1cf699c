//! Hazard and Mystery-Box Placement
//!
//! The placement phase: each player owns up to two ladders, two snakes
//! and one mystery box. Every function here is a pure
//! `Room -> Result<Room, _>` transition scoped to the acting player;
//! other players' placements are untouched by construction, so a request
//! naming someone else's item is a no-op rather than an error.

use crate::game::error::GameError;
use crate::game::state::{
    is_board_cell, BoardLink, MysteryBox, Phase, PlacementId, Player, PlayerId, Power, Room,
};
use crate::{MAX_LADDERS, MAX_SNAKES};

/// Which directed hazard a placement targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardKind {
    /// Moves the token up: `to > from`
    Ladder,
    /// Moves the token down: `to < from`
    Snake,
}

impl HazardKind {
    /// Lowercase noun for messages.
    pub fn noun(self) -> &'static str {
        match self {
            HazardKind::Ladder => "ladder",
            HazardKind::Snake => "snake",
        }
    }

    /// Per-player cap for this kind.
    pub fn limit(self) -> usize {
        match self {
            HazardKind::Ladder => MAX_LADDERS,
            HazardKind::Snake => MAX_SNAKES,
        }
    }

    /// Whether `from -> to` runs the right way for this kind.
    pub fn direction_ok(self, from: u8, to: u8) -> bool {
        match self {
            HazardKind::Ladder => to > from,
            HazardKind::Snake => to < from,
        }
    }

    /// The error for a link running the wrong way.
    pub fn direction_error(self) -> GameError {
        match self {
            HazardKind::Ladder => GameError::WrongDirection {
                kind: "ladder",
                direction: "up",
                direction_cell: "higher",
            },
            HazardKind::Snake => GameError::WrongDirection {
                kind: "snake",
                direction: "down",
                direction_cell: "lower",
            },
        }
    }
}

/// One deletable placement item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementRef {
    /// A ladder, by item id
    Ladder(PlacementId),
    /// A snake, by item id
    Snake(PlacementId),
    /// The player's mystery box
    MysteryBox,
}

/// Shared gates for every placement edit: right phase, known player,
/// not currently marked ready.
fn editable_player<'a>(room: &'a Room, actor: &PlayerId) -> Result<&'a Player, GameError> {
    if room.status != Phase::Placing {
        return Err(GameError::WrongPhase {
            expected: Phase::Placing,
            found: room.status,
        });
    }
    let player = room.find_player(actor).ok_or(GameError::PlayerNotFound)?;
    if player.ready {
        return Err(GameError::LockedWhileReady);
    }
    Ok(player)
}

/// Append a ladder or snake to the acting player's set.
///
/// Fails when the player already owns [`HazardKind::limit`] items of
/// `kind`. Direction is the caller's contract: `actions::placing`
/// validates it before committing, and an inverted link here is a bug in
/// the caller, not user input.
pub fn commit_ladder_snake(
    room: &Room,
    actor: &PlayerId,
    kind: HazardKind,
    link: BoardLink,
) -> Result<Room, GameError> {
    debug_assert!(
        kind.direction_ok(link.from, link.to),
        "direction must be validated before commit"
    );

    let player = editable_player(room, actor)?;
    if !is_board_cell(link.from) || !is_board_cell(link.to) || link.from == link.to {
        return Err(GameError::InvalidPlacementCells);
    }

    let owned = match kind {
        HazardKind::Ladder => &player.placements.ladders,
        HazardKind::Snake => &player.placements.snakes,
    };
    if owned.len() >= kind.limit() {
        return Err(GameError::PlacementLimit {
            kind: kind.noun(),
            limit: kind.limit(),
        });
    }

    let mut next = room.clone();
    let player = next.find_player_mut(actor).ok_or(GameError::PlayerNotFound)?;
    match kind {
        HazardKind::Ladder => player.placements.ladders.push(link),
        HazardKind::Snake => player.placements.snakes.push(link),
    }
    Ok(next)
}

/// Set the acting player's mystery box, replacing any previous one.
pub fn commit_box(
    room: &Room,
    actor: &PlayerId,
    cell: u8,
    power: Option<Power>,
) -> Result<Room, GameError> {
    editable_player(room, actor)?;
    if !is_board_cell(cell) {
        return Err(GameError::InvalidPlacementCells);
    }

    let mut next = room.clone();
    let player = next.find_player_mut(actor).ok_or(GameError::PlayerNotFound)?;
    player.placements.mystery_box = Some(MysteryBox { cell, power });
    Ok(next)
}

/// Remove one of the acting player's placements.
///
/// An id that does not match anything the actor owns (including ids of
/// other players' items) leaves the room unchanged.
pub fn delete_placement(
    room: &Room,
    actor: &PlayerId,
    target: PlacementRef,
) -> Result<Room, GameError> {
    editable_player(room, actor)?;

    let mut next = room.clone();
    let player = next.find_player_mut(actor).ok_or(GameError::PlayerNotFound)?;
    match target {
        PlacementRef::Ladder(id) => player.placements.ladders.retain(|l| l.id != id),
        PlacementRef::Snake(id) => player.placements.snakes.retain(|s| s.id != id),
        PlacementRef::MysteryBox => player.placements.mystery_box = None,
    }
    Ok(next)
}

/// Flip the acting player's ready flag.
///
/// No completeness validation happens here; placement counts are only
/// enforced when the host starts the game.
pub fn toggle_ready(room: &Room, actor: &PlayerId) -> Result<Room, GameError> {
    if room.status != Phase::Placing {
        return Err(GameError::WrongPhase {
            expected: Phase::Placing,
            found: room.status,
        });
    }
    let mut next = room.clone();
    let player = next
        .find_player_mut(actor)
        .ok_or(GameError::PlayerNotFound)?;
    player.ready = !player.ready;
    Ok(next)
}

// =============================================================================
// TESTS
// =============================================================================
