//! Core deterministic primitives.
//!
//! Everything the game logic needs that must behave identically across
//! platforms and across replays: seeded randomness and room codes.

pub mod rng;
pub mod room_code;

// Re-export core types
pub use rng::DeterministicRng;
pub use room_code::RoomCode;
