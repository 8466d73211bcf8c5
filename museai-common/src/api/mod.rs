//! API module for shared HTTP API types
//!
//! Contains ONLY plain data types and their lenient parsing; the service
//! crate wraps them with framework-specific handlers.

pub mod types;

pub use types::{ContentType, CustomizationOptions, GenerateRequest};
