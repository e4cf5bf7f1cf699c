//! In-Memory Document Store
//!
//! Reference implementation of [`DocumentStore`] with real
//! optimistic-concurrency semantics: every document carries a version
//! counter, commits are compare-and-set on that counter, and losing
//! transactions rerun against a fresh snapshot.

use std::collections::BTreeMap;
use std::sync::RwLock;

use tokio::sync::broadcast;

use crate::core::room_code::RoomCode;
use crate::game::state::Room;
use crate::store::{DocumentStore, StoreError};

/// Read-compute-write cycles attempted before giving up on a document
/// that keeps changing underneath us.
pub const MAX_TX_RETRIES: u32 = 64;

/// Buffered documents per subscription channel.
const WATCH_CAPACITY: usize = 64;

struct Entry {
    version: u64,
    room: Room,
    watchers: broadcast::Sender<Room>,
}

/// In-memory [`DocumentStore`] keyed by room code.
#[derive(Default)]
pub struct MemoryStore {
    rooms: RwLock<BTreeMap<RoomCode, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live documents.
    pub fn len(&self) -> usize {
        self.rooms.read().map(|rooms| rooms.len()).unwrap_or(0)
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn create(&self, code: &RoomCode, room: Room) -> Result<(), StoreError> {
        let mut rooms = self.rooms.write().map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        if rooms.contains_key(code) {
            return Err(StoreError::AlreadyExists);
        }
        let (watchers, _) = broadcast::channel(WATCH_CAPACITY);
        let _ = watchers.send(room.clone());
        rooms.insert(
            code.clone(),
            Entry {
                version: 1,
                room,
                watchers,
            },
        );
        Ok(())
    }

    fn read(&self, code: &RoomCode) -> Result<Room, StoreError> {
        let rooms = self.rooms.read().map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        rooms
            .get(code)
            .map(|e| e.room.clone())
            .ok_or(StoreError::NotFound)
    }

    fn delete(&self, code: &RoomCode) -> Result<(), StoreError> {
        let mut rooms = self.rooms.write().map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        // Dropping the entry drops the sender; subscribers observe Closed
        rooms.remove(code).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn transact<T, E, F>(&self, code: &RoomCode, mut f: F) -> Result<(Room, T), E>
    where
        E: From<StoreError>,
        F: FnMut(&Room) -> Result<(Room, T), E>,
    {
        for _attempt in 0..MAX_TX_RETRIES {
            // Snapshot outside any lock held across the computation
            let (seen_version, snapshot) = {
                let rooms = self.rooms.read().map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
                let entry = rooms.get(code).ok_or(StoreError::NotFound)?;
                (entry.version, entry.room.clone())
            };

            // The closure is pure; an error here aborts with no mutation
            let (next, result) = f(&snapshot)?;

            // Compare-and-set on the version counter
            let mut rooms = self.rooms.write().map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
            let entry = rooms.get_mut(code).ok_or(StoreError::NotFound)?;
            if entry.version == seen_version {
                entry.version += 1;
                entry.room = next.clone();
                let _ = entry.watchers.send(next.clone());
                return Ok((next, result));
            }
            // Lost the race; rerun against the new snapshot
        }

        Err(StoreError::Contention {
            attempts: MAX_TX_RETRIES,
        }
        .into())
    }

    fn subscribe(&self, code: &RoomCode) -> Result<broadcast::Receiver<Room>, StoreError> {
        let rooms = self.rooms.read().map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        rooms
            .get(code)
            .map(|e| e.watchers.subscribe())
            .ok_or(StoreError::NotFound)
    }
}

// =============================================================================
// TESTS
// =============================================================================
