//! Random nickname generator.
//!
//! Produces nicknames in the format `AdjectiveNounNN` (e.g. `NeonFox42`)
//! for servers configured without one.

use rand::RngExt;

const ADJECTIVES: &[&str] = &[
    "Shadow", "Neon", "Cyber", "Lunar", "Solar", "Frost", "Storm", "Dark", "Pixel", "Ghost",
    "Hyper", "Turbo", "Stealth", "Cosmic", "Iron", "Velvet", "Crimson", "Silent", "Rogue",
    "Mystic", "Atomic", "Rapid", "Zero", "Nova", "Onyx", "Cobalt", "Azure", "Hex", "Glitch",
    "Wired", "Chrome", "Prism",
];

const NOUNS: &[&str] = &[
    "Fox", "Wolf", "Hawk", "Raven", "Lynx", "Viper", "Shark", "Falcon", "Panda", "Tiger", "Cobra",
    "Owl", "Phoenix", "Dragon", "Jaguar", "Mantis", "Sphinx", "Kraken", "Otter", "Hound", "Crow",
    "Bear", "Panther", "Coyote", "Moth", "Newt", "Crane", "Bison", "Dingo", "Reef", "Byte", "Node",
];

/// Generate a random nickname like `NeonFox42`.
pub fn generate_nickname() -> String {
    let mut rng = rand::rng();
    let adj = ADJECTIVES[rng.random_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.random_range(0..NOUNS.len())];
    let num: u8 = rng.random_range(0..100);
    format!("{}{}{}", adj, noun, num)
}

/// Characters IRC allows in a nickname besides ASCII letters and digits.
const SPECIAL: &str = "[]\\`_^{|}-";

/// Loose RFC 2812 check: a letter or special first, then letters, digits
/// and specials.
pub fn is_valid_nickname(nick: &str) -> bool {
    let mut chars = nick.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || SPECIAL.contains(first)) && chars.all(is_nick_char)
}

pub fn is_nick_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || SPECIAL.contains(c)
}
