//! Room Lifecycle
//!
//! Creating, joining and leaving rooms, and the host-only controls:
//! phase change, game start, reset and deletion.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::core::rng::DeterministicRng;
use crate::core::room_code::RoomCode;
use crate::game::color::{choose_unique_color, random_name, COLOR_PALETTE};
use crate::game::error::GameError;
use crate::game::state::{Phase, Player, PlayerId, Room};
use crate::store::DocumentStore;
use crate::MIN_PLAYERS;

/// A supplied display name, or a generated one when blank.
fn display_name(name: &str, rng: &mut DeterministicRng) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        random_name(rng)
    } else {
        trimmed.to_string()
    }
}

/// Create a room and enter it as host.
///
/// The document starts as a default LOBBY with the host as its only
/// player. Fails with [`GameError::RoomCodeTaken`] when the code is
/// already in use.
pub fn create_room<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    host: &PlayerId,
    name: &str,
    preferred_color: &str,
    rng: &mut DeterministicRng,
    now: DateTime<Utc>,
) -> Result<Room, GameError> {
    let name = display_name(name, rng);
    let fallback = rng.next_int(COLOR_PALETTE.len() as u32) as usize;
    let color = choose_unique_color(&[], preferred_color, fallback).to_string();

    let mut room = Room::new(*host, now);
    room.players.push(Player::new(*host, name, color));
    store.create(code, room.clone())?;

    info!("room {code} created by {host}");
    Ok(room)
}

/// Join an existing room.
///
/// Rejects duplicates and full rooms. The new player gets a
/// best-effort-unique color and goes to the back of the turn order.
pub fn join_room<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    player: &PlayerId,
    name: &str,
    preferred_color: &str,
    rng: &mut DeterministicRng,
) -> Result<Room, GameError> {
    let name = display_name(name, rng);
    let fallback = rng.next_int(COLOR_PALETTE.len() as u32) as usize;

    let (room, _) = store.transact(code, |room: &Room| {
        if room.find_player(player).is_some() {
            return Err(GameError::AlreadyJoined);
        }
        if room.is_full() {
            return Err(GameError::RoomFull);
        }

        let color = choose_unique_color(&room.players, preferred_color, fallback).to_string();
        let mut next = room.clone();
        next.players.push(Player::new(*player, name.clone(), color));
        Ok((next, ()))
    })?;

    info!("{player} joined room {code}");
    Ok(room)
}

/// Leave a room.
///
/// Removing an absent player, or leaving a room that no longer exists,
/// is a no-op.
pub fn leave_room<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
) -> Result<(), GameError> {
    let result: Result<(Room, ()), GameError> = store.transact(code, |room: &Room| {
        let mut next = room.clone();
        next.players.retain(|p| &p.id != actor);
        Ok((next, ()))
    });

    match result {
        Ok(_) => {
            info!("{actor} left room {code}");
            Ok(())
        }
        Err(GameError::RoomNotFound) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Host-only explicit phase change.
///
/// The only legal explicit transition is LOBBY -> PLACING, and it
/// requires at least [`MIN_PLAYERS`] players. Everything else moves
/// through [`start_game`], the movement resolver's win check, or
/// [`reset_room`].
pub fn change_phase<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    phase: Phase,
) -> Result<Room, GameError> {
    let (room, _) = store.transact(code, |room: &Room| {
        if &room.host_id != actor {
            return Err(GameError::NotHost);
        }
        if room.status != Phase::Lobby || phase != Phase::Placing {
            return Err(GameError::PhaseChange {
                from: room.status,
                to: phase,
            });
        }
        if room.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }

        let mut next = room.clone();
        next.status = Phase::Placing;
        Ok((next, ()))
    })?;

    info!("room {code} moved to {phase}");
    Ok(room)
}

/// Host-only game start.
///
/// Requires every player ready with a complete placement set (two
/// ladders, two snakes, one box). Resets the turn to the first player
/// and clears the animation and box locks.
pub fn start_game<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
) -> Result<Room, GameError> {
    let (room, _) = store.transact(code, |room: &Room| {
        if &room.host_id != actor {
            return Err(GameError::NotHost);
        }
        if room.status != Phase::Placing {
            return Err(GameError::WrongPhase {
                expected: Phase::Placing,
                found: room.status,
            });
        }
        if room.players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if !room.all_ready_for_start() {
            return Err(GameError::PlayersNotReady);
        }

        let mut next = room.clone();
        next.status = Phase::Playing;
        next.turn_index = 0;
        next.anim = None;
        next.box_locked_by = None;
        Ok((next, ()))
    })?;

    info!("room {code} started with {} players", room.players.len());
    Ok(room)
}

/// Host-only reset: back to a default LOBBY preserving only the host id.
pub fn reset_room<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    now: DateTime<Utc>,
) -> Result<Room, GameError> {
    let (room, _) = store.transact(code, |room: &Room| {
        if &room.host_id != actor {
            return Err(GameError::NotHost);
        }
        Ok((Room::new(room.host_id, now), ()))
    })?;

    info!("room {code} reset");
    Ok(room)
}

/// Host-only deletion: removes the document entirely.
pub fn delete_room<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
) -> Result<(), GameError> {
    let room = store.read(code)?;
    if &room.host_id != actor {
        return Err(GameError::NotHost);
    }
    store.delete(code)?;

    info!("room {code} deleted");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
