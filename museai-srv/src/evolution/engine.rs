//! Evolution engine state and operations

use chrono::{DateTime, Utc};
use museai_common::{time, CustomizationRequest, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

use super::StatsStore;

/// Count-map key for a missing or unrecognized field
pub const UNKNOWN: &str = "unknown";

/// Maximum number of history entries kept
pub const HISTORY_LIMIT: usize = 100;

/// Number of history entries included in a snapshot
pub const RECENT_HISTORY: usize = 10;

/// One entry of the generation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub genre: String,
    pub mood: String,
    pub tempo: String,
}

/// Persisted aggregate state
///
/// Count maps are ordered so the file is stable and ties between equally
/// popular values resolve to the lexically smallest key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionStats {
    pub total_generations: u64,
    pub genre_counts: BTreeMap<String, u64>,
    pub mood_counts: BTreeMap<String, u64>,
    pub tempo_counts: BTreeMap<String, u64>,
    pub evolution_score: u64,
    /// Oldest first
    pub generation_history: VecDeque<HistoryEntry>,
    pub preferred_genre: Option<String>,
    pub preferred_mood: Option<String>,
}

/// A generated item, as reported to the engine
#[derive(Debug, Clone)]
pub struct GenerationEvent {
    pub customization: CustomizationRequest,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/evolution-stats response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvolutionSnapshot {
    pub total_generations: u64,
    pub evolution_score: u64,
    pub genre_counts: BTreeMap<String, u64>,
    pub mood_counts: BTreeMap<String, u64>,
    pub tempo_counts: BTreeMap<String, u64>,
    pub preferred_genre: String,
    pub preferred_mood: String,
    /// Most recent entries, newest last
    pub recent_generations: Vec<HistoryEntry>,
}

/// GET /api/recommendations response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendations {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<String>,
}

/// Usage aggregator
pub struct EvolutionEngine {
    stats: EvolutionStats,
    store: Box<dyn StatsStore>,
}

impl EvolutionEngine {
    /// Load saved state, or start fresh if none was saved
    ///
    /// Saved state that cannot be read is an error; it is never silently
    /// replaced.
    pub fn open(store: Box<dyn StatsStore>) -> Result<Self> {
        let mut stats = store.load()?.unwrap_or_default();
        while stats.generation_history.len() > HISTORY_LIMIT {
            stats.generation_history.pop_front();
        }

        info!(
            "Evolution state from {}: {} generations, score {}",
            store.describe(),
            stats.total_generations,
            stats.evolution_score
        );
        Ok(Self { stats, store })
    }

    /// Count one generated item
    pub fn record(&mut self, event: &GenerationEvent) {
        let request = &event.customization;
        let genre = canonical(request.genre().map(|g| g.as_str()));
        let mood = canonical(request.mood().map(|m| m.as_str()));
        let tempo = canonical(request.tempo().map(|t| t.as_str()));

        self.stats.total_generations += 1;
        *self.stats.genre_counts.entry(genre.clone()).or_insert(0) += 1;
        *self.stats.mood_counts.entry(mood.clone()).or_insert(0) += 1;
        *self.stats.tempo_counts.entry(tempo.clone()).or_insert(0) += 1;

        self.stats.generation_history.push_back(HistoryEntry {
            timestamp: time::to_rfc3339(&event.timestamp),
            genre,
            mood,
            tempo,
        });
        while self.stats.generation_history.len() > HISTORY_LIMIT {
            self.stats.generation_history.pop_front();
        }
    }

    /// Derive score and preferences from the counts, then persist
    ///
    /// Returns the new score. On a persistence failure the in-memory state
    /// is already updated and stays usable; the error is retryable.
    pub fn recompute(&mut self) -> Result<u64> {
        let stats = &mut self.stats;
        let diversity = (stats.genre_counts.len() + stats.mood_counts.len()) as u64 / 2;
        stats.evolution_score = stats.total_generations / 10 + diversity;

        if let Some(genre) = mode(&stats.genre_counts) {
            stats.preferred_genre = Some(genre);
        }
        if let Some(mood) = mode(&stats.mood_counts) {
            stats.preferred_mood = Some(mood);
        }

        if let Err(e) = self.store.save(&self.stats) {
            error!(
                "Failed to persist evolution state to {}: {}",
                self.store.describe(),
                e
            );
            return Err(e);
        }
        Ok(self.stats.evolution_score)
    }

    /// Score as of the last recompute
    pub fn current_score(&self) -> u64 {
        self.stats.evolution_score
    }

    pub fn stats(&self) -> &EvolutionStats {
        &self.stats
    }

    pub fn snapshot(&self) -> EvolutionSnapshot {
        let stats = &self.stats;
        let skip = stats.generation_history.len().saturating_sub(RECENT_HISTORY);
        EvolutionSnapshot {
            total_generations: stats.total_generations,
            evolution_score: stats.evolution_score,
            genre_counts: stats.genre_counts.clone(),
            mood_counts: stats.mood_counts.clone(),
            tempo_counts: stats.tempo_counts.clone(),
            preferred_genre: stats.preferred_genre.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            preferred_mood: stats.preferred_mood.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            recent_generations: stats.generation_history.iter().skip(skip).cloned().collect(),
        }
    }

    /// Suggested customization based on what has been asked for most
    pub fn recommendations(&self) -> Recommendations {
        Recommendations {
            genre: self.stats.preferred_genre.clone(),
            mood: self.stats.preferred_mood.clone(),
            tempo: mode(&self.stats.tempo_counts),
        }
    }
}

fn canonical(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

/// Key with the highest count; the lexically smallest among ties
fn mode(counts: &BTreeMap<String, u64>) -> Option<String> {
    let mut best: Option<(&String, u64)> = None;
    for (key, &count) in counts {
        match best {
            Some((_, top)) if top >= count => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key.clone())
}

// ========================================
// Shared handle
// ========================================

/// Engine behind a mutex, shared between request handlers
#[derive(Clone)]
pub struct EvolutionHandle {
    inner: Arc<Mutex<EvolutionEngine>>,
}

impl EvolutionHandle {
    pub fn new(engine: EvolutionEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Exclusive access for a sequence of operations
    pub fn lock(&self) -> Result<MutexGuard<'_, EvolutionEngine>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("evolution state lock poisoned".to_string()))
    }

    pub fn snapshot(&self) -> Result<EvolutionSnapshot> {
        Ok(self.lock()?.snapshot())
    }

    pub fn recommendations(&self) -> Result<Recommendations> {
        Ok(self.lock()?.recommendations())
    }

    pub fn current_score(&self) -> Result<u64> {
        Ok(self.lock()?.current_score())
    }
}
