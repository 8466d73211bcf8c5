//! # MuseAI Generators
//!
//! Four independent content generators. Each takes a resolved
//! [`Customization`](museai_common::Customization) and a caller-supplied
//! random source, so tests can pass a seeded `StdRng`:
//!
//! - [`artist`]: artist or band name
//! - [`lyrics`]: song lyrics with verse/chorus/bridge structure
//! - [`melody`]: two-voice Standard MIDI File
//! - [`artwork`]: PNG album art
//!
//! The [`artifacts`] module owns the output directory that file-producing
//! generators write into.

pub mod artifacts;
pub mod artist;
pub mod artwork;
mod glyphs;
pub mod lyrics;
pub mod melody;

pub use artifacts::{ArtifactKind, ArtifactStamp, ArtifactStore};

/// Reference returned for video requests; no video is generated
pub const VIDEO_PLACEHOLDER: &str = "video_placeholder.mp4";

use rand::Rng;

/// Uniform choice from a fixed, non-empty table
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}
