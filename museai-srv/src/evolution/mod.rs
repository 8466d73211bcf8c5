//! Evolution: durable usage statistics
//!
//! Every generated item is recorded against the genre, mood and tempo the
//! client asked for. A recompute after each request derives the evolution
//! score and the preferred genre and mood, then persists the whole state.
//!
//! The score is a plain function of the counts:
//! `total / 10 + (distinct genres + distinct moods) / 2` (integer division).

mod engine;
mod store;

pub use engine::{
    EvolutionEngine, EvolutionHandle, EvolutionSnapshot, EvolutionStats, GenerationEvent,
    HistoryEntry, Recommendations, HISTORY_LIMIT, RECENT_HISTORY, UNKNOWN,
};
pub use store::{JsonFileStore, MemoryStatsStore, StatsStore};
