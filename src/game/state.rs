//! Room Document and Player State
//!
//! All state types for one shared game room. The room is a single
//! document in the transactional store; every action reads it, computes a
//! successor, and commits it atomically.
//!
//! Legacy document shapes (pair-array ladders, bare-cell boxes) are folded
//! into the canonical types here, in `serde` impls - nothing deeper in the
//! logic ever branches on shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{GOAL_CELL, MIN_PLAYERS, START_CELL, STEP_MS};

/// Slack added to the per-cell animation budget, in milliseconds.
pub const ANIM_GRACE_MS: i64 = 100;

/// Hard ceiling on animation age regardless of path length, in
/// milliseconds. Recovers the room from a client that died before
/// clearing its animation.
pub const ANIM_MAX_AGE_MS: i64 = 5000;

// =============================================================================
// IDENTITIES
// =============================================================================

/// Unique player identifier, stable for the lifetime of a room.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlayerId(Uuid);

impl PlayerId {
    /// Mint a fresh identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a UUID string.
    pub fn parse_str(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self)
    }

    /// Raw bytes, for seed derivation.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of one placed ladder/snake, for targeted deletion.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PlacementId(Uuid);

impl PlacementId {
    /// Mint a fresh id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PlacementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// PHASE
// =============================================================================

/// Current phase of the room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for players to join
    #[default]
    Lobby,
    /// Players are placing hazards and boxes
    Placing,
    /// Game in progress
    Playing,
    /// Someone reached the goal
    Finished,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Lobby => "lobby",
            Phase::Placing => "placing",
            Phase::Playing => "playing",
            Phase::Finished => "finished",
        };
        f.write_str(s)
    }
}

// =============================================================================
// POWERS
// =============================================================================

/// Single-use powers granted by mystery boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Power {
    /// Add +2 to the roll, capped at 6
    Boost,
    /// Roll twice, keep the higher
    Reroll,
    /// Negate the next snake
    Shield,
    /// Swap positions with the leader
    SwapLeader,
    /// Jump forward 6 cells immediately
    MiniLeap,
}

impl Power {
    /// All powers, in the order mystery boxes draw from.
    pub const ALL: [Power; 5] = [
        Power::Boost,
        Power::Reroll,
        Power::Shield,
        Power::SwapLeader,
        Power::MiniLeap,
    ];

    /// Short UI description.
    pub fn description(self) -> &'static str {
        match self {
            Power::Boost => "Add +2 to your roll",
            Power::Reroll => "Roll twice, take the higher",
            Power::Shield => "Ignore the next snake",
            Power::SwapLeader => "Swap positions with the leader",
            Power::MiniLeap => "Jump forward 6 spaces immediately",
        }
    }

    /// Wire name, e.g. `SWAP_LEADER`.
    pub fn wire_name(self) -> &'static str {
        match self {
            Power::Boost => "BOOST",
            Power::Reroll => "REROLL",
            Power::Shield => "SHIELD",
            Power::SwapLeader => "SWAP_LEADER",
            Power::MiniLeap => "MINI_LEAP",
        }
    }
}

impl std::fmt::Display for Power {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

// =============================================================================
// PLACEMENTS
// =============================================================================

/// One placed ladder or snake: a directed link between two cells.
///
/// Ladders satisfy `to > from`, snakes `to < from`; the direction is
/// enforced at placement time, not here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardLink {
    /// Placement id, for deletion
    pub id: PlacementId,
    /// Cell the link triggers on
    pub from: u8,
    /// Cell the link moves the token to
    pub to: u8,
}

impl BoardLink {
    /// Build a link with a fresh id.
    pub fn new(from: u8, to: u8) -> Self {
        Self {
            id: PlacementId::generate(),
            from,
            to,
        }
    }
}

/// Accepts both the canonical object form and the legacy `[from, to]`
/// pair form (early documents stored bare pairs, with no item id).
impl<'de> Deserialize<'de> for BoardLink {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Pair(u8, u8),
            Full {
                #[serde(default)]
                id: Option<PlacementId>,
                from: u8,
                to: u8,
            },
        }

        match Shape::deserialize(deserializer)? {
            Shape::Pair(from, to) => Ok(BoardLink::new(from, to)),
            Shape::Full { id, from, to } => Ok(BoardLink {
                id: id.unwrap_or_else(PlacementId::generate),
                from,
                to,
            }),
        }
    }
}

/// A mystery box: grants `power` to whoever lands on `cell`, subject to
/// the game-wide box lock. `power: None` means "draw one at pickup time".
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MysteryBox {
    /// Cell the box sits on
    pub cell: u8,
    /// Configured power, or `None` for a random draw at pickup
    pub power: Option<Power>,
}

/// Accepts both the canonical object form and the legacy bare cell
/// number (early documents stored only the cell; those boxes draw their
/// power at pickup time).
impl<'de> Deserialize<'de> for MysteryBox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Cell(u8),
            Full {
                cell: u8,
                #[serde(default)]
                power: Option<Power>,
            },
        }

        match Shape::deserialize(deserializer)? {
            Shape::Cell(cell) => Ok(MysteryBox { cell, power: None }),
            Shape::Full { cell, power } => Ok(MysteryBox { cell, power }),
        }
    }
}

/// One player's owned placements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placements {
    /// Placed ladders, at most two
    #[serde(default)]
    pub ladders: Vec<BoardLink>,
    /// Placed snakes, at most two
    #[serde(default)]
    pub snakes: Vec<BoardLink>,
    /// Placed mystery box, at most one
    #[serde(default, rename = "box")]
    pub mystery_box: Option<MysteryBox>,
}

// =============================================================================
// PLAYER
// =============================================================================

/// One player inside a room. Position in `players` is turn order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Stable identity, unique per room
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Display color, unique among current players best-effort
    pub color: String,
    /// Board cell in `[1, 100]`
    #[serde(default = "start_cell")]
    pub pos: u8,
    /// Placement-phase readiness flag
    #[serde(default)]
    pub ready: bool,
    /// Owned hazard/box placements
    #[serde(default)]
    pub placements: Placements,
    /// Acquired but not yet activated power
    #[serde(default)]
    pub held_power: Option<Power>,
    /// One-shot: negates the next snake
    #[serde(default)]
    pub shield: bool,
    /// One-shot: +2 on the next roll
    #[serde(default)]
    pub temp_boost: bool,
    /// One-shot: next roll is the higher of two dice
    #[serde(default)]
    pub temp_reroll: bool,
    /// One-shot: +6 cells before the next roll resolves
    #[serde(default)]
    pub temp_mini_leap: bool,
}

fn start_cell() -> u8 {
    START_CELL
}

impl Player {
    /// Create a player at the start cell with empty placements.
    pub fn new(id: PlayerId, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            pos: START_CELL,
            ready: false,
            placements: Placements::default(),
            held_power: None,
            shield: false,
            temp_boost: false,
            temp_reroll: false,
            temp_mini_leap: false,
        }
    }

    /// Whether this player has placed everything the game requires.
    pub fn placements_complete(&self) -> bool {
        self.placements.ladders.len() == crate::MAX_LADDERS
            && self.placements.snakes.len() == crate::MAX_SNAKES
            && self.placements.mystery_box.is_some()
    }
}

// =============================================================================
// ANIMATION & REACTIONS
// =============================================================================

/// In-flight move animation. Acts as a soft lock: while present, no new
/// roll is accepted for any player.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveAnimation {
    /// Player whose token is moving
    pub actor_id: PlayerId,
    /// Cells the token steps through, in order
    pub path: Vec<u8>,
    /// When the move committed
    pub start: DateTime<Utc>,
}

impl MoveAnimation {
    /// Whether this animation has outlived its budget.
    ///
    /// The budget is one [`STEP_MS`] slot per path cell plus a small
    /// grace, with [`ANIM_MAX_AGE_MS`] as an absolute ceiling. Expiry is
    /// evaluated lazily by readers; any client observing an expired
    /// animation may clear it idempotently.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let elapsed = (now - self.start).num_milliseconds();
        let budget = self.path.len() as i64 * STEP_MS + ANIM_GRACE_MS;
        elapsed > budget || elapsed > ANIM_MAX_AGE_MS
    }
}

/// Ephemeral broadcast line: an emoji reaction or a power announcement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    /// Display name of the sender
    pub player_name: String,
    /// The emoji (or indicator glyph for power announcements)
    pub emoji: String,
    /// When it was sent
    pub timestamp: DateTime<Utc>,
    /// Optional announcement text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

// =============================================================================
// BOARD OVERLAY
// =============================================================================

/// Union of every player's placements, aggregated at resolution time.
/// Any player can land on any other player's ladder, snake or box.
#[derive(Clone, Debug, Default)]
pub struct BoardOverlay {
    /// All placed ladders
    pub ladders: Vec<BoardLink>,
    /// All placed snakes
    pub snakes: Vec<BoardLink>,
    /// All placed boxes
    pub boxes: Vec<MysteryBox>,
}

impl BoardOverlay {
    /// Ladder starting at `cell`, if any.
    pub fn ladder_from(&self, cell: u8) -> Option<&BoardLink> {
        self.ladders.iter().find(|l| l.from == cell)
    }

    /// Snake starting at `cell`, if any.
    pub fn snake_from(&self, cell: u8) -> Option<&BoardLink> {
        self.snakes.iter().find(|s| s.from == cell)
    }

    /// Mystery box sitting on `cell`, if any.
    pub fn box_at(&self, cell: u8) -> Option<&MysteryBox> {
        self.boxes.iter().find(|b| b.cell == cell)
    }
}

// =============================================================================
// ROOM
// =============================================================================

/// The shared room document: one per game instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Current phase
    pub status: Phase,
    /// Creator; authorizes phase changes, reset and deletion
    pub host_id: PlayerId,
    /// Index into `players` of whose turn it is; normalized on read
    #[serde(default)]
    pub turn_index: u32,
    /// Players in turn order; only ever appended to or filtered
    #[serde(default)]
    pub players: Vec<Player>,
    /// Last die value rolled
    #[serde(default)]
    pub last_roll: Option<u8>,
    /// Who rolled it
    #[serde(default)]
    pub last_actor: Option<PlayerId>,
    /// In-flight move animation; blocks rolls while present
    #[serde(default)]
    pub anim: Option<MoveAnimation>,
    /// Holder of the mystery-box lock; pickups are suspended game-wide
    /// until this player consumes their power
    #[serde(default)]
    pub box_locked_by: Option<PlayerId>,
    /// Ephemeral UI broadcast, not game-critical
    #[serde(default)]
    pub last_reaction: Option<Reaction>,
    /// When the room was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Room {
    /// Default lobby-state room with no players yet.
    pub fn new(host_id: PlayerId, now: DateTime<Utc>) -> Self {
        Self {
            status: Phase::Lobby,
            host_id,
            turn_index: 0,
            players: Vec::new(),
            last_roll: None,
            last_actor: None,
            anim: None,
            box_locked_by: None,
            last_reaction: None,
            created_at: Some(now),
        }
    }

    /// Turn index normalized into `[0, players.len())`.
    ///
    /// Player removal can leave the stored index out of range; reads
    /// always go through this wraparound.
    pub fn normalized_turn_index(&self) -> usize {
        if self.players.is_empty() {
            0
        } else {
            self.turn_index as usize % self.players.len()
        }
    }

    /// The player whose turn it is, if any players are present.
    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.normalized_turn_index())
    }

    /// Find a player by id.
    pub fn find_player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Find a player by id, mutably.
    pub fn find_player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Index of a player in turn order.
    pub fn player_index(&self, id: &PlayerId) -> Option<usize> {
        self.players.iter().position(|p| &p.id == id)
    }

    /// Whether the room has reached [`crate::MAX_PLAYERS`].
    pub fn is_full(&self) -> bool {
        self.players.len() >= crate::MAX_PLAYERS
    }

    /// Union of all players' placements.
    pub fn board_overlay(&self) -> BoardOverlay {
        let mut overlay = BoardOverlay::default();
        for player in &self.players {
            overlay.ladders.extend(player.placements.ladders.iter().cloned());
            overlay.snakes.extend(player.placements.snakes.iter().cloned());
            if let Some(b) = &player.placements.mystery_box {
                overlay.boxes.push(b.clone());
            }
        }
        overlay
    }

    /// Whether the game may start: enough players, all ready, all with a
    /// complete placement set.
    pub fn all_ready_for_start(&self) -> bool {
        self.players.len() >= MIN_PLAYERS
            && self
                .players
                .iter()
                .all(|p| p.ready && p.placements_complete())
    }
}

/// Whether `cell` is on the board.
pub fn is_board_cell(cell: u8) -> bool {
    (START_CELL..=GOAL_CELL).contains(&cell)
}

// =============================================================================
// TESTS
// =============================================================================
