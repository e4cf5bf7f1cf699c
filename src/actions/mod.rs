//! Action Entry Points
//!
//! Everything a client can do to a room, each expressed as exactly one
//! optimistic transaction against the document store. The signature
//! convention is `(store, room_code, acting_player, input) -> Result` -
//! no ambient globals, no hidden current-user state.
//!
//! Randomness and fresh ids are drawn *before* the transaction begins,
//! so the transaction closures stay pure and retry-safe.
//!
//! ## Module Structure
//!
//! - `lobby`: room lifecycle - create/join/leave/reset/delete/start
//! - `placing`: placement-phase actions
//! - `play`: rolls, powers, reactions, animation clearing

pub mod lobby;
pub mod placing;
pub mod play;

pub use lobby::{
    change_phase, create_room, delete_room, join_room, leave_room, reset_room, start_game,
};
pub use placing::{delete_placement, place_box, place_ladder_or_snake, toggle_ready};
pub use play::{clear_expired_anim, roll, send_reaction, use_power, RollOutcome};
