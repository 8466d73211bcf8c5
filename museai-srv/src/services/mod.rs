//! Service layer behind the HTTP handlers

pub mod orchestrator;

pub use orchestrator::{GenerationOutcome, Orchestrator};
