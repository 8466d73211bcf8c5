//! Customization parameters
//!
//! Two views of the same five fields:
//! - [`CustomizationRequest`]: what the client sent, echoed back verbatim and
//!   tallied by the evolution engine
//! - [`Customization`]: the resolved, fully-typed parameters handed to the
//!   generators, with defaults substituted for anything missing or unknown

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A customization value that matches none of the known options
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! option_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every option, in presentation order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical wire name
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            /// Case-insensitive, surrounding whitespace ignored
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| UnknownOption {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

option_enum! {
    /// Musical genre
    Genre ("genre") {
        Pop => "pop",
        Rock => "rock",
        Jazz => "jazz",
        Classical => "classical",
        Electronic => "electronic",
        HipHop => "hip-hop",
        Country => "country",
        Blues => "blues",
    }
}

option_enum! {
    /// Emotional mood
    Mood ("mood") {
        Happy => "happy",
        Sad => "sad",
        Energetic => "energetic",
        Calm => "calm",
        Romantic => "romantic",
        Dark => "dark",
        Uplifting => "uplifting",
    }
}

option_enum! {
    /// Tempo class
    Tempo ("tempo") {
        Slow => "slow",
        Medium => "medium",
        Fast => "fast",
        Variable => "variable",
    }
}

option_enum! {
    /// Tonic pitch class
    Key ("key") {
        C => "C",
        CSharp => "C#",
        D => "D",
        DSharp => "D#",
        E => "E",
        F => "F",
        FSharp => "F#",
        G => "G",
        GSharp => "G#",
        A => "A",
        ASharp => "A#",
        B => "B",
    }
}

option_enum! {
    /// Instrumentation style
    Style ("style") {
        Acoustic => "acoustic",
        Electric => "electric",
        Orchestral => "orchestral",
        Synthetic => "synthetic",
        Mixed => "mixed",
    }
}

impl Key {
    /// Semitones above C (0-11)
    pub fn pitch_class(&self) -> u8 {
        Key::ALL.iter().position(|k| k == self).unwrap_or(0) as u8
    }
}

impl Default for Genre {
    fn default() -> Self {
        Genre::Pop
    }
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Happy
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo::Medium
    }
}

impl Default for Key {
    fn default() -> Self {
        Key::C
    }
}

/// Client-supplied customization, kept exactly as received
///
/// Only string values are retained; anything else is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl CustomizationRequest {
    /// Build from an arbitrary JSON value, dropping non-string fields
    pub fn from_json(value: &Value) -> Self {
        let field = |name: &str| {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            genre: field("genre"),
            mood: field("mood"),
            tempo: field("tempo"),
            key: field("key"),
            style: field("style"),
        }
    }

    /// Genre, if present and recognized
    pub fn genre(&self) -> Option<Genre> {
        parse_field(self.genre.as_deref())
    }

    /// Mood, if present and recognized
    pub fn mood(&self) -> Option<Mood> {
        parse_field(self.mood.as_deref())
    }

    /// Tempo, if present and recognized
    pub fn tempo(&self) -> Option<Tempo> {
        parse_field(self.tempo.as_deref())
    }

    /// Key, if present and recognized
    pub fn key(&self) -> Option<Key> {
        parse_field(self.key.as_deref())
    }

    /// Style, if present and recognized
    pub fn style(&self) -> Option<Style> {
        parse_field(self.style.as_deref())
    }
}

fn parse_field<T: FromStr<Err = UnknownOption>>(raw: Option<&str>) -> Option<T> {
    match raw?.parse() {
        Ok(value) => Some(value),
        Err(err) => {
            debug!("Ignoring customization field: {}", err);
            None
        }
    }
}

/// Resolved generation parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Customization {
    pub genre: Genre,
    pub mood: Mood,
    pub tempo: Tempo,
    pub key: Key,
    pub style: Option<Style>,
}

impl Customization {
    /// Substitute defaults for missing or unrecognized fields
    pub fn resolve(request: &CustomizationRequest) -> Self {
        Self {
            genre: request.genre().unwrap_or_default(),
            mood: request.mood().unwrap_or_default(),
            tempo: request.tempo().unwrap_or_default(),
            key: request.key().unwrap_or_default(),
            style: request.style(),
        }
    }

    pub fn with_genre(mut self, genre: Genre) -> Self {
        self.genre = genre;
        self
    }

    pub fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = mood;
        self
    }
}

impl From<&CustomizationRequest> for Customization {
    fn from(request: &CustomizationRequest) -> Self {
        Customization::resolve(request)
    }
}
