//! Artist name generator
//!
//! The genre decides which kinds of act are plausible (a jazz trio, a
//! hip-hop crew); the kind decides which name templates apply. Every word
//! comes from the fixed tables below.

use museai_common::{Customization, Genre};
use rand::Rng;
use serde::Serialize;

use crate::pick;

pub const PREFIXES: &[&str] = &[
    "DJ", "MC", "Lil", "Big", "The", "Young", "Old", "Major", "Minor", "King", "Queen", "Prince",
    "Lady", "Sir", "Captain", "Professor",
];

pub const FIRST_NAMES: &[&str] = &[
    "Alex", "Jordan", "Taylor", "Morgan", "Casey", "Riley", "Avery", "Phoenix", "Sage", "River",
    "Sky", "Storm", "Raven", "Luna", "Nova", "Atlas", "Orion", "Echo", "Kai", "Zara", "Indie",
    "Blaze",
];

pub const LAST_NAMES: &[&str] = &[
    "Steel", "Stone", "Fire", "Ice", "Storm", "Rain", "Thunder", "Lightning", "Shadow", "Light",
    "Moon", "Star", "Sun", "Wolf", "Eagle", "Lion", "Dragon", "Phoenix", "Raven", "Fox", "Bear",
    "Hawk",
];

pub const BAND_WORDS: &[&str] = &[
    "Electric", "Cosmic", "Neon", "Crystal", "Velvet", "Golden", "Silver", "Midnight", "Morning",
    "Sunset", "Sonic", "Psychic", "Magic", "Wild", "Sacred", "Ancient", "Future", "Digital",
    "Analog", "Retro",
];

pub const BAND_NOUNS: &[&str] = &[
    "Dreams", "Echoes", "Voices", "Souls", "Hearts", "Minds", "Spirits", "Angels", "Demons",
    "Knights", "Warriors", "Prophets", "Wanderers", "Rebels", "Kings", "Queens", "Wizards",
    "Legends", "Heroes",
];

/// Kind of act a name is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtistKind {
    Solo,
    Duo,
    Band,
    Ensemble,
    Trio,
    Crew,
}

impl ArtistKind {
    /// Kinds of act plausible for a genre
    pub fn allowed_for(genre: Genre) -> &'static [ArtistKind] {
        use ArtistKind::*;
        match genre {
            Genre::Pop => &[Solo, Duo],
            Genre::Rock => &[Band, Solo],
            Genre::Jazz => &[Ensemble, Solo, Trio],
            Genre::Classical => &[Ensemble, Solo],
            Genre::Electronic => &[Solo, Duo],
            Genre::HipHop => &[Solo, Crew],
            Genre::Country => &[Solo, Band],
            Genre::Blues => &[Solo, Band],
        }
    }
}

/// A generated name and the kind of act it names
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistName {
    pub name: String,
    pub kind: ArtistKind,
}

/// Generate an artist name for the customization's genre
pub fn generate<R: Rng + ?Sized>(customization: &Customization, rng: &mut R) -> ArtistName {
    let kind = *pick(rng, ArtistKind::allowed_for(customization.genre));
    ArtistName {
        name: name_for(kind, rng),
        kind,
    }
}

fn name_for<R: Rng + ?Sized>(kind: ArtistKind, rng: &mut R) -> String {
    match kind {
        ArtistKind::Solo | ArtistKind::Duo => match rng.gen_range(0..3) {
            0 => format!("{} {}", pick(rng, PREFIXES), pick(rng, FIRST_NAMES)),
            1 => format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
            _ => pick(rng, FIRST_NAMES).to_string(),
        },
        ArtistKind::Trio => format!("The {} Trio", pick(rng, FIRST_NAMES)),
        ArtistKind::Crew => format!("{} {} Crew", pick(rng, BAND_WORDS), pick(rng, BAND_NOUNS)),
        ArtistKind::Ensemble => format!("{} Ensemble", pick(rng, BAND_WORDS)),
        ArtistKind::Band => match rng.gen_range(0..3) {
            0 => format!("{} {}", pick(rng, BAND_WORDS), pick(rng, BAND_NOUNS)),
            1 => format!("The {}", pick(rng, BAND_NOUNS)),
            _ => format!("{}{}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)),
        },
    }
}

/// Whether `name` could have been produced for `kind`
pub fn matches_kind(name: &str, kind: ArtistKind) -> bool {
    let words: Vec<&str> = name.split(' ').collect();
    match kind {
        ArtistKind::Solo | ArtistKind::Duo => match words.as_slice() {
            [single] => FIRST_NAMES.contains(single),
            [first, second] => {
                (PREFIXES.contains(first) && FIRST_NAMES.contains(second))
                    || (FIRST_NAMES.contains(first) && LAST_NAMES.contains(second))
            }
            _ => false,
        },
        ArtistKind::Trio => {
            matches!(words.as_slice(), ["The", first, "Trio"] if FIRST_NAMES.contains(first))
        }
        ArtistKind::Crew => matches!(
            words.as_slice(),
            [word, noun, "Crew"] if BAND_WORDS.contains(word) && BAND_NOUNS.contains(noun)
        ),
        ArtistKind::Ensemble => {
            matches!(words.as_slice(), [word, "Ensemble"] if BAND_WORDS.contains(word))
        }
        ArtistKind::Band => match words.as_slice() {
            ["The", noun] => BAND_NOUNS.contains(noun),
            [word, noun] => BAND_WORDS.contains(word) && BAND_NOUNS.contains(noun),
            [compound] => FIRST_NAMES.iter().any(|first| {
                compound
                    .strip_prefix(first)
                    .is_some_and(|rest| LAST_NAMES.contains(&rest))
            }),
            _ => false,
        },
    }
}
