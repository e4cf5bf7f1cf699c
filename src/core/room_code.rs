//! Room Codes
//!
//! Rooms are addressed by a 6-character code drawn from uppercase letters
//! and digits. Parsing is forgiving: lowercase input and separators are
//! normalized away before validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::game::error::GameError;

/// Characters a room code may contain.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every room code.
pub const CODE_LEN: usize = 6;

/// A validated 6-character room code.
///
/// Construction always goes through [`RoomCode::parse`] (or
/// [`RoomCode::generate`]), so a held value is guaranteed to be exactly
/// six uppercase alphanumerics.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse user input into a room code.
    ///
    /// Uppercases the input and strips any non-alphanumeric characters
    /// first; whatever remains must be exactly six characters.
    pub fn parse(input: &str) -> Result<Self, GameError> {
        let sanitized: String = input
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        if sanitized.len() == CODE_LEN {
            Ok(Self(sanitized))
        } else {
            Err(GameError::InvalidRoomCode)
        }
    }

    /// Generate a fresh random code.
    pub fn generate(rng: &mut DeterministicRng) -> Self {
        let code: String = (0..CODE_LEN)
            .map(|_| {
                let idx = rng.next_int(CODE_ALPHABET.len() as u32) as usize;
                CODE_ALPHABET[idx] as char
            })
            .collect();
        Self(code)
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomCode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for RoomCode {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
