//! # Serpent Gambit Game Core
//!
//! Shared-room game logic for Serpent Gambit, a multiplayer snakes-and-ladders
//! variant where players place their own hazards and collect single-use powers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SERPENT GAMBIT CORE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  └── room_code.rs- 6-character room code type                │
//! │                                                              │
//! │  game/           - Game logic (pure, deterministic)          │
//! │  ├── state.rs    - Room document and player state            │
//! │  ├── color.rs    - Player color/name allocation              │
//! │  ├── placement.rs- Hazard and mystery-box placement          │
//! │  ├── movement.rs - Roll resolution and path computation      │
//! │  ├── power.rs    - Single-use power effects                  │
//! │  ├── events.rs   - Game events for UI messaging              │
//! │  └── error.rs    - Error taxonomy                            │
//! │                                                              │
//! │  store/          - Transactional document store              │
//! │  ├── mod.rs      - DocumentStore trait                       │
//! │  └── memory.rs   - In-memory optimistic-CAS store            │
//! │                                                              │
//! │  actions/        - Action entry points (one transact each)   │
//! │  ├── lobby.rs    - create/join/leave/reset/start             │
//! │  ├── placing.rs  - placement phase actions                   │
//! │  └── play.rs     - roll, powers, reactions                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity Guarantee
//!
//! The `core/` and `game/` modules are pure and deterministic:
//! - No system time reads - timestamps are passed in explicitly
//! - No ambient randomness - all draws come from a seeded Xorshift128+
//! - Every state transition is `Room -> Result<Room, GameError>`
//!
//! Action entry points draw randomness and mint ids *before* entering a
//! store transaction, so the transaction closure is pure and may be
//! retried any number of times under optimistic-concurrency conflicts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod actions;
pub mod core;
pub mod game;
pub mod store;

// Re-export commonly used types
pub use crate::core::rng::DeterministicRng;
pub use crate::core::room_code::RoomCode;
pub use crate::game::error::{ErrorKind, GameError};
pub use crate::game::events::GameEvent;
pub use crate::game::state::{Phase, Player, PlayerId, Power, Room};
pub use crate::store::{DocumentStore, MemoryStore, StoreError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// First cell of the board
pub const START_CELL: u8 = 1;

/// Final cell of the board; landing here exactly wins the game
pub const GOAL_CELL: u8 = 100;

/// Number of sides on the die
pub const DIE_SIDES: u8 = 6;

/// Maximum players per room
pub const MAX_PLAYERS: usize = 6;

/// Minimum players required to start a game
pub const MIN_PLAYERS: usize = 2;

/// Ladders each player must place
pub const MAX_LADDERS: usize = 2;

/// Snakes each player must place
pub const MAX_SNAKES: usize = 2;

/// Animation budget per path cell, in milliseconds
pub const STEP_MS: i64 = 180;
