//! Player Color and Name Allocation
//!
//! Joining players get a display color from a fixed palette, unique among
//! the current players on a best-effort basis, and a generated display
//! name when they did not pick one.

use crate::core::rng::DeterministicRng;
use crate::game::state::Player;

/// The fixed display palette. One entry per possible player.
pub const COLOR_PALETTE: [&str; 6] = [
    "#ff6b6b", "#4dd2ff", "#ffd166", "#06d6a0", "#f78c6b", "#c792ea",
];

const NAME_ADJECTIVES: [&str; 10] = [
    "Swift", "Bold", "Calm", "Lucky", "Neon", "Cosmic", "Turbo", "Zen", "Witty", "Merry",
];

const NAME_ANIMALS: [&str; 10] = [
    "Fox", "Otter", "Panda", "Koala", "Hawk", "Whale", "Tiger", "Yak", "Raven", "Moose",
];

/// Pick a color for a joining player.
///
/// Returns `preferred` if no current player uses it (case-insensitive),
/// else the first unused palette entry, else the palette entry at
/// `fallback_index` - with all six colors taken, duplicates are allowed
/// rather than treated as an error. The caller pre-draws
/// `fallback_index` uniformly so this function stays pure.
pub fn choose_unique_color<'a>(
    existing: &[Player],
    preferred: &'a str,
    fallback_index: usize,
) -> &'a str {
    let used: Vec<String> = existing.iter().map(|p| p.color.to_lowercase()).collect();

    if !used.contains(&preferred.to_lowercase()) {
        return preferred;
    }

    for color in COLOR_PALETTE {
        if !used.contains(&color.to_lowercase()) {
            return color;
        }
    }

    COLOR_PALETTE[fallback_index % COLOR_PALETTE.len()]
}

/// Generate an "Adjective Animal" display name.
pub fn random_name(rng: &mut DeterministicRng) -> String {
    let adjective = NAME_ADJECTIVES[rng.next_int(NAME_ADJECTIVES.len() as u32) as usize];
    let animal = NAME_ANIMALS[rng.next_int(NAME_ANIMALS.len() as u32) as usize];
    format!("{adjective} {animal}")
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::PlayerId;

    fn player_with_color(color: &str) -> Player {
        Player::new(PlayerId::generate(), "p", color)
    }

    #[test]
    fn test_preferred_when_unused() {
        let players = [player_with_color("#4dd2ff")];
        assert_eq!(choose_unique_color(&players, "#ff6b6b", 0), "#ff6b6b");
    }

    #[test]
    fn test_preferred_taken_case_insensitive() {
        let players = [player_with_color("#FF6B6B")];
        // Preferred is taken (case differs), first unused palette entry wins
        assert_eq!(choose_unique_color(&players, "#ff6b6b", 0), "#4dd2ff");
    }

    #[test]
    fn test_never_reuses_until_exhausted() {
        let mut players = Vec::new();
        for color in &COLOR_PALETTE[..5] {
            players.push(player_with_color(color));
        }
        let picked = choose_unique_color(&players, COLOR_PALETTE[0], 3);
        assert_eq!(picked, COLOR_PALETTE[5]);
    }

    #[test]
    fn test_exhausted_palette_uses_fallback() {
        let players: Vec<Player> = COLOR_PALETTE
            .iter()
            .map(|c| player_with_color(c))
            .collect();
        // All six taken: duplicates allowed, fallback index decides
        assert_eq!(
            choose_unique_color(&players, COLOR_PALETTE[0], 4),
            COLOR_PALETTE[4]
        );
        // Oversized fallback wraps
        assert_eq!(
            choose_unique_color(&players, COLOR_PALETTE[0], 10),
            COLOR_PALETTE[4]
        );
    }

    #[test]
    fn test_random_name_shape() {
        let mut rng = DeterministicRng::new(3);
        for _ in 0..20 {
            let name = random_name(&mut rng);
            let (adjective, animal) = name.split_once(' ').unwrap();
            assert!(NAME_ADJECTIVES.contains(&adjective));
            assert!(NAME_ANIMALS.contains(&animal));
        }
    }
}
