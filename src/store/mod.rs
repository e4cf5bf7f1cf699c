//! Transactional Document Store
//!
//! The room document lives in a store with optimistic-concurrency
//! semantics: a transaction reads a snapshot, computes a successor
//! document purely from it, and commits only if nothing else committed
//! in between - otherwise the whole read-compute-write cycle is retried
//! transparently.
//!
//! The game core only ever talks to the [`DocumentStore`] trait; the
//! in-memory implementation in [`memory`] is what the tests and the demo
//! binary run against, and a real deployment would back the same trait
//! with its hosted document database.

pub mod memory;

use tokio::sync::broadcast;

use crate::core::room_code::RoomCode;
use crate::game::state::Room;

pub use memory::MemoryStore;

/// Failures of the store itself.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document behind the key.
    #[error("document not found")]
    NotFound,

    /// Create hit an existing document.
    #[error("document already exists")]
    AlreadyExists,

    /// Optimistic retries were exhausted without a clean commit.
    #[error("transaction contention after {attempts} attempts")]
    Contention {
        /// How many read-compute-write cycles were attempted
        attempts: u32,
    },

    /// Transport/connectivity failure.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A transactional store of room documents, addressed by room code.
pub trait DocumentStore {
    /// Create a document. Fails with [`StoreError::AlreadyExists`] if the
    /// code is taken.
    fn create(&self, code: &RoomCode, room: Room) -> Result<(), StoreError>;

    /// Read the current document.
    fn read(&self, code: &RoomCode) -> Result<Room, StoreError>;

    /// Remove the document entirely.
    fn delete(&self, code: &RoomCode) -> Result<(), StoreError>;

    /// Run one optimistic transaction.
    ///
    /// `f` receives the current snapshot and returns the successor
    /// document plus a caller-defined result, or an error to abort with.
    /// The commit is atomic compare-and-set; on conflict the whole cycle
    /// reruns with a fresh snapshot. `f` MUST therefore be pure - it may
    /// be invoked any number of times per call. An abort commits
    /// nothing.
    fn transact<T, E, F>(&self, code: &RoomCode, f: F) -> Result<(Room, T), E>
    where
        E: From<StoreError>,
        F: FnMut(&Room) -> Result<(Room, T), E>;

    /// Subscribe to committed documents for one room.
    ///
    /// Every successful `create`/`transact` commit is pushed to all
    /// subscribers. Dropping the receiver unsubscribes.
    fn subscribe(&self, code: &RoomCode) -> Result<broadcast::Receiver<Room>, StoreError>;
}
