//! Shared API request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::customization::{CustomizationRequest, Genre, Key, Mood, Style, Tempo};

// ========================================
// Content Types
// ========================================

/// Kind of artifact a generate request can ask for
///
/// Declaration order is the order in which generators run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Artist,
    Lyrics,
    Song,
    Picture,
    Video,
}

impl ContentType {
    /// Every content type, in generation order
    pub const ALL: [ContentType; 5] = [
        ContentType::Artist,
        ContentType::Lyrics,
        ContentType::Song,
        ContentType::Picture,
        ContentType::Video,
    ];

    /// Requested when the client does not say otherwise
    pub const DEFAULT: [ContentType; 3] =
        [ContentType::Song, ContentType::Lyrics, ContentType::Artist];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Artist => "artist",
            ContentType::Lyrics => "lyrics",
            ContentType::Song => "song",
            ContentType::Picture => "picture",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ContentType::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown content type '{}'", s))
    }
}

// ========================================
// Generate Request
// ========================================

/// POST /api/generate request, after lenient parsing
///
/// # Examples
///
/// ```
/// use museai_common::api::types::{ContentType, GenerateRequest};
///
/// let body = serde_json::json!({ "quantity": 2, "content_types": ["artist"] });
/// let request = GenerateRequest::from_json(&body);
/// assert_eq!(request.quantity, 2);
/// assert_eq!(request.content_types, vec![ContentType::Artist]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Number of items, at least 1
    pub quantity: u32,
    /// Requested content types, deduplicated, in generation order
    pub content_types: Vec<ContentType>,
    /// Customization exactly as the client sent it
    pub customization: CustomizationRequest,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            quantity: 1,
            content_types: normalize(ContentType::DEFAULT.to_vec()),
            customization: CustomizationRequest::default(),
        }
    }
}

impl GenerateRequest {
    /// Parse a request body, substituting defaults for malformed fields
    ///
    /// - `quantity`: positive integer, otherwise 1
    /// - `content_types`: array of known names, otherwise the default set;
    ///   unknown names are skipped
    /// - `customization`: object; non-string fields are dropped
    pub fn from_json(body: &Value) -> Self {
        let defaults = GenerateRequest::default();

        let quantity = match body.get("quantity") {
            None | Some(Value::Null) => defaults.quantity,
            Some(raw) => match raw.as_u64().filter(|q| *q > 0) {
                Some(q) => u32::try_from(q).unwrap_or(u32::MAX),
                None => {
                    debug!("Invalid quantity {}, using {}", raw, defaults.quantity);
                    defaults.quantity
                }
            },
        };

        let content_types = match body.get("content_types").and_then(Value::as_array) {
            Some(items) => normalize(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter_map(|s| match s.parse() {
                        Ok(ct) => Some(ct),
                        Err(err) => {
                            debug!("Skipping {}", err);
                            None
                        }
                    })
                    .collect(),
            ),
            None => defaults.content_types,
        };

        let customization = body
            .get("customization")
            .map(CustomizationRequest::from_json)
            .unwrap_or_default();

        Self {
            quantity,
            content_types,
            customization,
        }
    }

    /// Whether the given content type was requested
    pub fn wants(&self, content_type: ContentType) -> bool {
        self.content_types.contains(&content_type)
    }
}

fn normalize(mut types: Vec<ContentType>) -> Vec<ContentType> {
    types.sort();
    types.dedup();
    types
}

// ========================================
// Customization Options
// ========================================

/// GET /api/customization-options response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomizationOptions {
    pub genres: Vec<Genre>,
    pub moods: Vec<Mood>,
    pub tempos: Vec<Tempo>,
    pub keys: Vec<Key>,
    pub styles: Vec<Style>,
}

impl CustomizationOptions {
    /// The fixed enumerations
    pub fn all() -> Self {
        Self {
            genres: Genre::ALL.to_vec(),
            moods: Mood::ALL.to_vec(),
            tempos: Tempo::ALL.to_vec(),
            keys: Key::ALL.to_vec(),
            styles: Style::ALL.to_vec(),
        }
    }
}

// ========================================
// Tests
// ========================================
