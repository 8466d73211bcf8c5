//! Response payloads produced by the generation workflow

use museai_common::CustomizationRequest;
use serde::{Deserialize, Serialize};

/// Artifacts produced for one item; each present only if requested
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics: Option<String>,
    /// Saved copy of `lyrics`, relative to the output directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyrics_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
}

/// One generated item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// `<unix seconds>_<index within the request>`
    pub id: String,
    /// RFC 3339
    pub timestamp: String,
    /// Customization as the client sent it
    pub customization: CustomizationRequest,
    #[serde(flatten)]
    pub content: GeneratedContent,
}

/// POST /api/generate success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub results: Vec<GenerationRecord>,
    pub evolution_score: u64,
}
