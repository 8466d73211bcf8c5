//! Persistence for evolution statistics

use museai_common::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::EvolutionStats;

/// Where evolution statistics are loaded from and saved to
pub trait StatsStore: Send {
    /// Previously saved statistics, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<EvolutionStats>>;

    /// Replace the saved statistics
    ///
    /// Write failures are reported as [`Error::Persistence`].
    fn save(&self, stats: &EvolutionStats) -> Result<()>;

    /// Human-readable location for log messages
    fn describe(&self) -> String;
}

// ========================================
// JSON file
// ========================================

/// Pretty-printed JSON file, rewritten wholesale on every save
///
/// Saves go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash mid-write leaves the previous file intact. The parent
/// directory must already exist.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "evolution_stats.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn corrupt(&self, message: impl ToString) -> Error {
        Error::CorruptState {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> Result<Option<EvolutionStats>> {
        // Only a definite "not found" means fresh state
        match self.path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                debug!("No stats file at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.corrupt(e)),
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.corrupt(e))?;
        let stats = serde_json::from_str(&content).map_err(|e| self.corrupt(e))?;
        Ok(Some(stats))
    }

    fn save(&self, stats: &EvolutionStats) -> Result<()> {
        let json = serde_json::to_string_pretty(stats)?;
        let temp = self.temp_path();

        std::fs::write(&temp, json).map_err(Error::Persistence)?;
        std::fs::rename(&temp, &self.path).map_err(Error::Persistence)?;

        debug!("Saved evolution stats to {}", self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ========================================
// In memory
// ========================================

/// Volatile store for tests and throwaway runs
///
/// Clones share the same contents, so a test can keep one clone to inspect
/// what the engine saved, or to make saves fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    saved: Option<EvolutionStats>,
    failing: bool,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with previously saved statistics
    pub fn with_stats(stats: EvolutionStats) -> Self {
        let store = Self::default();
        if let Ok(mut inner) = store.inner.lock() {
            inner.saved = Some(stats);
        }
        store
    }

    /// Last saved statistics
    pub fn saved(&self) -> Option<EvolutionStats> {
        self.inner.lock().ok().and_then(|inner| inner.saved.clone())
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failing = failing;
        }
    }

    fn inner(&self) -> Result<std::sync::MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| Error::Internal("memory stats store lock poisoned".to_string()))
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self) -> Result<Option<EvolutionStats>> {
        Ok(self.inner()?.saved.clone())
    }

    fn save(&self, stats: &EvolutionStats) -> Result<()> {
        let mut inner = self.inner()?;
        if inner.failing {
            return Err(Error::Persistence(std::io::Error::new(
                std::io::ErrorKind::Other,
                "memory store configured to fail",
            )));
        }
        inner.saved = Some(stats.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
