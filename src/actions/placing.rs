//! Placement-Phase Actions
//!
//! Thin transactional wrappers over the placement engine. Direction
//! validation happens here, before commit, which is the engine's
//! caller-side contract.

use tracing::debug;

use crate::core::room_code::RoomCode;
use crate::game::error::GameError;
use crate::game::placement::{self, HazardKind, PlacementRef};
use crate::game::state::{BoardLink, PlacementId, PlayerId, Power, Room};
use crate::store::DocumentStore;

/// Place a ladder or snake for the acting player.
///
/// Validates the direction (ladders go up, snakes go down) and commits
/// in one transaction. Returns the committed room and the new item's id.
pub fn place_ladder_or_snake<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    kind: HazardKind,
    from: u8,
    to: u8,
) -> Result<(Room, PlacementId), GameError> {
    if !kind.direction_ok(from, to) {
        return Err(kind.direction_error());
    }

    // Minted outside the transaction so retries keep the same id
    let link = BoardLink::new(from, to);
    let id = link.id;

    let (room, _) = store.transact(code, |room: &Room| {
        placement::commit_ladder_snake(room, actor, kind, link.clone()).map(|next| (next, ()))
    })?;

    debug!("{actor} placed {} {from}->{to} in {code}", kind.noun());
    Ok((room, id))
}

/// Place (or replace) the acting player's mystery box.
pub fn place_box<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    cell: u8,
    power: Option<Power>,
) -> Result<Room, GameError> {
    let (room, _) = store.transact(code, |room: &Room| {
        placement::commit_box(room, actor, cell, power).map(|next| (next, ()))
    })?;

    debug!("{actor} placed box on {cell} in {code}");
    Ok(room)
}

/// Delete one of the acting player's placements.
pub fn delete_placement<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
    target: PlacementRef,
) -> Result<Room, GameError> {
    let (room, _) = store.transact(code, |room: &Room| {
        placement::delete_placement(room, actor, target).map(|next| (next, ()))
    })?;

    debug!("{actor} deleted a placement in {code}");
    Ok(room)
}

/// Flip the acting player's ready flag.
pub fn toggle_ready<S: DocumentStore>(
    store: &S,
    code: &RoomCode,
    actor: &PlayerId,
) -> Result<Room, GameError> {
    let (room, _) = store.transact(code, |room: &Room| {
        placement::toggle_ready(room, actor).map(|next| (next, ()))
    })?;

    debug!("{actor} toggled ready in {code}");
    Ok(room)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::lobby::{change_phase, create_room, join_room};
    use crate::core::rng::DeterministicRng;
    use crate::game::state::Phase;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn placing_setup() -> (MemoryStore, RoomCode, PlayerId, PlayerId) {
        let store = MemoryStore::new();
        let code = RoomCode::parse("PL44CE").unwrap();
        let host = PlayerId::generate();
        let guest = PlayerId::generate();
        let mut rng = DeterministicRng::new(5);

        create_room(&store, &code, &host, "Host", "#ff6b6b", &mut rng, Utc::now()).unwrap();
        join_room(&store, &code, &guest, "Guest", "#4dd2ff", &mut rng).unwrap();
        change_phase(&store, &code, &host, Phase::Placing).unwrap();
        (store, code, host, guest)
    }

    #[test]
    fn test_direction_validated_before_commit() {
        let (store, code, host, _) = placing_setup();

        let err = place_ladder_or_snake(&store, &code, &host, HazardKind::Ladder, 30, 3)
            .unwrap_err();
        assert!(matches!(err, GameError::WrongDirection { kind: "ladder", .. }));

        let err =
            place_ladder_or_snake(&store, &code, &host, HazardKind::Snake, 3, 30).unwrap_err();
        assert!(matches!(err, GameError::WrongDirection { kind: "snake", .. }));

        // Nothing was committed
        let room = store.read(&code).unwrap();
        assert!(room.find_player(&host).unwrap().placements.ladders.is_empty());
        assert!(room.find_player(&host).unwrap().placements.snakes.is_empty());
    }

    #[test]
    fn test_place_and_delete_round_trip() {
        let (store, code, host, _) = placing_setup();

        let (_, id) =
            place_ladder_or_snake(&store, &code, &host, HazardKind::Ladder, 3, 30).unwrap();
        let room = store.read(&code).unwrap();
        assert_eq!(room.find_player(&host).unwrap().placements.ladders.len(), 1);

        let room = delete_placement(&store, &code, &host, PlacementRef::Ladder(id)).unwrap();
        assert!(room.find_player(&host).unwrap().placements.ladders.is_empty());
    }

    #[test]
    fn test_box_place_and_clear() {
        let (store, code, _, guest) = placing_setup();

        let room = place_box(&store, &code, &guest, 42, Some(Power::Reroll)).unwrap();
        let placed = room
            .find_player(&guest)
            .unwrap()
            .placements
            .mystery_box
            .clone()
            .unwrap();
        assert_eq!((placed.cell, placed.power), (42, Some(Power::Reroll)));

        let room = delete_placement(&store, &code, &guest, PlacementRef::MysteryBox).unwrap();
        assert!(room
            .find_player(&guest)
            .unwrap()
            .placements
            .mystery_box
            .is_none());
    }

    #[test]
    fn test_toggle_ready_via_store() {
        let (store, code, host, guest) = placing_setup();

        let room = toggle_ready(&store, &code, &host).unwrap();
        assert!(room.find_player(&host).unwrap().ready);
        assert!(!room.find_player(&guest).unwrap().ready);
    }
}
