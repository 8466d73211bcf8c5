//! # MuseAI Common Library
//!
//! Shared code for the MuseAI generator service:
//! - Customization enums and request resolution
//! - API request/response types
//! - Configuration loading
//! - Error types and time helpers

pub mod api;
pub mod config;
pub mod customization;
pub mod error;
pub mod time;

pub use customization::{Customization, CustomizationRequest, Genre, Key, Mood, Style, Tempo};
pub use error::{Error, Result};
