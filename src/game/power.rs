//! Single-Use Power Effects
//!
//! Players hold at most one power at a time. Activating it arms the
//! matching one-shot effect (consumed at the next roll resolution),
//! except SWAP_LEADER which applies immediately. Activation also releases
//! the game-wide mystery-box lock, whoever holds it.

use chrono::{DateTime, Utc};

use crate::game::error::GameError;
use crate::game::events::GameEvent;
use crate::game::state::{PlayerId, Power, Reaction, Room};

/// Indicator glyph used for power announcements in `last_reaction`.
const POWER_EMOJI: &str = "\u{26a1}";

/// Activate the acting player's held power.
///
/// A request whose `power` does not match the currently held one is a
/// benign race (stale UI state) and resolves as a silent no-op, not an
/// error. On success the held power is cleared, the matching effect is
/// armed, `box_locked_by` is cleared unconditionally (reactivating box
/// pickups for everyone), and an announcement line is written to
/// `last_reaction`.
pub fn use_held_power(
    room: &Room,
    actor: &PlayerId,
    power: Power,
    now: DateTime<Utc>,
) -> Result<(Room, Vec<GameEvent>), GameError> {
    let index = room.player_index(actor).ok_or(GameError::PlayerNotFound)?;

    if room.players[index].held_power != Some(power) {
        // Race condition protection
        return Ok((room.clone(), Vec::new()));
    }

    let mut next = room.clone();
    let mut events = vec![GameEvent::PowerUsed {
        player_id: *actor,
        power,
    }];

    let name = next.players[index].name.clone();
    let message = match power {
        Power::Boost => {
            next.players[index].temp_boost = true;
            format!("{name} used BOOST!")
        }
        Power::Reroll => {
            next.players[index].temp_reroll = true;
            format!("{name} used REROLL!")
        }
        Power::MiniLeap => {
            next.players[index].temp_mini_leap = true;
            format!("{name} used MINI_LEAP!")
        }
        Power::Shield => {
            next.players[index].shield = true;
            format!("{name} used SHIELD!")
        }
        Power::SwapLeader => match find_leader(&next, index) {
            Some(leader_index) => {
                let leader_name = next.players[leader_index].name.clone();
                let leader_pos = next.players[leader_index].pos;
                next.players[leader_index].pos = next.players[index].pos;
                next.players[index].pos = leader_pos;
                events.push(GameEvent::PositionsSwapped {
                    player_id: *actor,
                    leader_id: next.players[leader_index].id,
                });
                format!("{name} swapped with {leader_name}!")
            }
            None => {
                events.push(GameEvent::AlreadyLeader { player_id: *actor });
                format!("{name} is already the leader!")
            }
        },
    };

    next.players[index].held_power = None;
    next.box_locked_by = None; // Reactivate mystery boxes
    next.last_reaction = Some(Reaction {
        player_name: name,
        emoji: POWER_EMOJI.to_string(),
        timestamp: now,
        text: Some(message),
    });

    Ok((next, events))
}

/// Index of the player strictly ahead of everyone, if that is not the
/// actor. Ties go to the earliest index with the highest position.
fn find_leader(room: &Room, actor_index: usize) -> Option<usize> {
    let mut leader_index = None;
    let mut leader_pos = room.players[actor_index].pos;
    for (i, p) in room.players.iter().enumerate() {
        if p.pos > leader_pos {
            leader_pos = p.pos;
            leader_index = Some(i);
        }
    }
    leader_index.filter(|i| *i != actor_index)
}

// =============================================================================
// TESTS
// =============================================================================
