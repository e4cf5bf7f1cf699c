//! Play-Phase Actions
//!
//! Rolling the die, activating held powers, emoji reactions, and the
//! idempotent clearing of expired move animations.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::core::rng::DeterministicRng;
use crate::core::room_code::RoomCode;
use crate::game::error::GameError;
use crate::game::events::GameEvent;
use crate::game::movement::{resolve_roll, RollDraws};
use crate::game::power::use_held_power;
use crate::game::state::{PlayerId, Power, Reaction, Room};
use crate::store::DocumentStore;

/// Result of a committed roll.
#[derive(Clone, Debug)]
pub struct RollOutcome {
    /// The committed room document
    pub room: Room,
    /// Effective roll value (after REROLL/BOOST)
    pub roll: u8,
    /// Informational events for the UI
    pub events: Vec<GameEvent>,
}

/// Roll the die for the acting player.
///
/// All randomness is drawn before the transaction ([`RollDraws`]), so a
/// retried transaction replays the same dice.
pub fn roll<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    rng: &mut DeterministicRng,
    now: DateTime<Utc>,
) -> Result<RollOutcome, GameError> {
    let draws = RollDraws::draw(rng);

    let (room, events) = store.transact(code, |room: &Room| resolve_roll(room, actor, &draws, now))?;

    let roll = room.last_roll.unwrap_or(draws.die);
    info!("{actor} rolled {roll} in {code}");
    Ok(RollOutcome { room, roll, events })
}

/// Activate the acting player's held power.
///
/// A stale request (the held power does not match) commits nothing and
/// returns no events.
pub fn use_power<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    power: Power,
    now: DateTime<Utc>,
) -> Result<(Room, Vec<GameEvent>), GameError> {
    let (room, events) =
        store.transact(code, |room: &Room| use_held_power(room, actor, power, now))?;

    if !events.is_empty() {
        info!("{actor} used {power} in {code}");
    }
    Ok((room, events))
}

/// Broadcast an emoji reaction to the room.
pub fn send_reaction<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    emoji: &str,
    now: DateTime<Utc>,
) -> Result<Room, GameError> {
    let (room, _): (Room, ()) = store.transact::<_, GameError, _>(code, |room: &Room| {
        let player = room.find_player(actor).ok_or(GameError::PlayerNotFound)?;
        let mut next = room.clone();
        next.last_reaction = Some(Reaction {
            player_name: player.name.clone(),
            emoji: emoji.to_string(),
            timestamp: now,
            text: None,
        });
        Ok((next, ()))
    })?;

    debug!("{actor} reacted in {code}");
    Ok(room)
}

/// Clear the room's move animation if it has expired.
///
/// Any client may call this at any time; it is idempotent and only
/// touches the document when an expired animation is actually present.
/// Returns whether anything was cleared. This is the liveness safeguard
/// against a client that died before clearing its own animation.
pub fn clear_expired_anim<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    now: DateTime<Utc>,
) -> Result<bool, GameError> {
    // Cheap read-side check first; most calls find nothing to do
    let room = store.read(code)?;
    let expired = matches!(&room.anim, Some(anim) if anim.is_expired(now));
    if !expired {
        return Ok(false);
    }

    let (_, cleared): (Room, bool) = store.transact::<_, GameError, _>(code, |room: &Room| {
        // Re-check under the transaction; someone else may have cleared it
        match &room.anim {
            Some(anim) if anim.is_expired(now) => {
                let mut next = room.clone();
                next.anim = None;
                Ok((next, true))
            }
            _ => Ok((room.clone(), false)),
        }
    })?;

    if cleared {
        debug!("cleared expired animation in {code}");
    }
    Ok(cleared)
}

// =============================================================================
// TESTS
// =============================================================================
