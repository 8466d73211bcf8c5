//! Generation workflow
//!
//! For each of the requested items, runs the requested generators in a
//! fixed order (artist, lyrics, song, picture, video), records the item
//! with the evolution engine, and finally recomputes the score once for the
//! whole request.
//!
//! A generator failure aborts the remaining items. Items finished before
//! the failure stay recorded in memory; they are persisted with the next
//! successful recompute.

use museai_common::api::{ContentType, GenerateRequest};
use museai_common::{time, Customization, Error, Result};
use museai_gen::{artist, artwork, lyrics, melody, ArtifactStamp, ArtifactStore, VIDEO_PLACEHOLDER};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use crate::evolution::{EvolutionHandle, GenerationEvent};
use crate::models::{GeneratedContent, GenerationRecord};

/// Records produced for one request
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub records: Vec<GenerationRecord>,
    pub evolution_score: u64,
}

/// Runs generation requests against the output directory and evolution state
pub struct Orchestrator {
    artifacts: ArtifactStore,
    evolution: EvolutionHandle,
    /// Parent generator; each request draws its own child from it
    rng: Mutex<StdRng>,
    max_quantity: u32,
}

impl Orchestrator {
    /// `rng_seed` makes every run reproducible; `None` seeds from entropy
    pub fn new(
        artifacts: ArtifactStore,
        evolution: EvolutionHandle,
        rng_seed: Option<u64>,
        max_quantity: u32,
    ) -> Self {
        let rng = match rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            artifacts,
            evolution,
            rng: Mutex::new(rng),
            max_quantity: max_quantity.max(1),
        }
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    pub fn evolution(&self) -> &EvolutionHandle {
        &self.evolution
    }

    /// Generate every requested item, then recompute the evolution score
    ///
    /// Blocking: file writes and encoding happen on the calling thread.
    pub fn run(&self, request: &GenerateRequest) -> Result<GenerationOutcome> {
        let quantity = request.quantity.clamp(1, self.max_quantity);
        if quantity < request.quantity {
            warn!(
                "Quantity {} exceeds limit, generating {}",
                request.quantity, quantity
            );
        }

        let customization = Customization::from(&request.customization);
        let mut rng = self.request_rng()?;
        let mut records = Vec::with_capacity(quantity as usize);

        for index in 0..quantity {
            let stamp = ArtifactStamp {
                created: time::now(),
                index,
            };
            let content = self.generate_item(request, &customization, &stamp, &mut rng)?;
            let record = GenerationRecord {
                id: format!("{}_{}", stamp.created.timestamp(), index),
                timestamp: time::to_rfc3339(&stamp.created),
                customization: request.customization.clone(),
                content,
            };

            self.evolution.lock()?.record(&GenerationEvent {
                customization: request.customization.clone(),
                timestamp: stamp.created,
            });
            debug!("Generated item {}", record.id);
            records.push(record);
        }

        let evolution_score = self.evolution.lock()?.recompute()?;
        info!(
            "Generated {} item(s), evolution score {}",
            records.len(),
            evolution_score
        );

        Ok(GenerationOutcome {
            records,
            evolution_score,
        })
    }

    fn request_rng(&self) -> Result<StdRng> {
        let seed = self
            .rng
            .lock()
            .map_err(|_| Error::Internal("random source lock poisoned".to_string()))?
            .gen::<u64>();
        Ok(StdRng::seed_from_u64(seed))
    }

    fn generate_item(
        &self,
        request: &GenerateRequest,
        customization: &Customization,
        stamp: &ArtifactStamp,
        rng: &mut StdRng,
    ) -> Result<GeneratedContent> {
        let mut content = GeneratedContent::default();
        let record_id = format!("{}_{}", stamp.created.timestamp(), stamp.index);

        let requested = ContentType::ALL
            .iter()
            .copied()
            .filter(|t| request.wants(*t));
        for content_type in requested {
            match content_type {
                ContentType::Artist => {
                    content.artist = Some(artist::generate(customization, rng).name);
                }
                ContentType::Lyrics => {
                    let text = lyrics::generate(customization, rng);
                    content.lyrics_file = Some(self.artifacts.save_lyrics(&record_id, &text)?);
                    content.lyrics = Some(text);
                }
                ContentType::Song => {
                    content.song =
                        Some(melody::generate(customization, rng, &self.artifacts, stamp)?);
                }
                ContentType::Picture => {
                    content.picture =
                        Some(artwork::generate(customization, rng, &self.artifacts, stamp)?);
                }
                ContentType::Video => {
                    content.video = Some(VIDEO_PLACEHOLDER.to_string());
                }
            }
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::{EvolutionEngine, MemoryStatsStore};
    use museai_common::CustomizationRequest;
    use tempfile::TempDir;

    fn orchestrator(root: &std::path::Path, seed: u64) -> (Orchestrator, MemoryStatsStore) {
        let store = MemoryStatsStore::new();
        let engine = EvolutionEngine::open(Box::new(store.clone())).unwrap();
        let orchestrator = Orchestrator::new(
            ArtifactStore::new(root),
            EvolutionHandle::new(engine),
            Some(seed),
            5,
        );
        (orchestrator, store)
    }

    fn request(quantity: u32, types: &[ContentType]) -> GenerateRequest {
        GenerateRequest {
            quantity,
            content_types: types.to_vec(),
            customization: CustomizationRequest {
                genre: Some("rock".to_string()),
                mood: Some("dark".to_string()),
                ..CustomizationRequest::default()
            },
        }
    }

    #[test]
    fn test_only_requested_content() {
        let dir = TempDir::new().unwrap();
        let (orch, _) = orchestrator(dir.path(), 1);

        let outcome = orch
            .run(&request(2, &[ContentType::Artist, ContentType::Video]))
            .unwrap();
        assert_eq!(outcome.records.len(), 2);
        for record in &outcome.records {
            assert!(record.content.artist.is_some());
            assert_eq!(record.content.video.as_deref(), Some(VIDEO_PLACEHOLDER));
            assert!(record.content.lyrics.is_none());
            assert!(record.content.song.is_none());
            assert!(record.content.picture.is_none());
        }
        assert!(outcome.records[1].id.ends_with("_1"));
    }

    #[test]
    fn test_files_written_for_file_content() {
        let dir = TempDir::new().unwrap();
        let (orch, _) = orchestrator(dir.path(), 2);

        let outcome = orch
            .run(&request(
                1,
                &[ContentType::Lyrics, ContentType::Song, ContentType::Picture],
            ))
            .unwrap();
        let content = &outcome.records[0].content;

        let lyrics_file = content.lyrics_file.as_deref().unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join(lyrics_file)).unwrap(),
            content.lyrics.clone().unwrap()
        );
        assert!(content.song.as_deref().unwrap().starts_with("songs/song_"));
        assert!(content.picture.as_deref().unwrap().starts_with("images/art_"));
        assert!(dir.path().join(content.song.as_deref().unwrap()).is_file());
        assert!(dir.path().join(content.picture.as_deref().unwrap()).is_file());
    }

    #[test]
    fn test_lyrics_files_from_parallel_runs_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let (a, _) = orchestrator(dir.path(), 8);
        let (b, _) = orchestrator(dir.path(), 9);

        let first = a.run(&request(1, &[ContentType::Lyrics])).unwrap();
        let second = b.run(&request(1, &[ContentType::Lyrics])).unwrap();
        let x = &first.records[0].content;
        let y = &second.records[0].content;

        assert_ne!(x.lyrics_file, y.lyrics_file);
        for content in [x, y] {
            let file = content.lyrics_file.as_deref().unwrap();
            assert_eq!(
                std::fs::read_to_string(dir.path().join(file)).unwrap(),
                content.lyrics.clone().unwrap()
            );
        }
    }

    #[test]
    fn test_unordered_content_types_run_in_fixed_order() {
        let dir = TempDir::new().unwrap();
        let (orch, _) = orchestrator(dir.path(), 10);
        let mut req = request(1, &[]);
        req.content_types = vec![ContentType::Video, ContentType::Artist];

        let outcome = orch.run(&req).unwrap();
        let content = &outcome.records[0].content;
        assert!(content.artist.is_some());
        assert_eq!(content.video.as_deref(), Some(VIDEO_PLACEHOLDER));
        assert!(content.lyrics.is_none());
    }

    #[test]
    fn test_records_once_per_item_and_persists_once() {
        let dir = TempDir::new().unwrap();
        let (orch, store) = orchestrator(dir.path(), 3);

        let outcome = orch.run(&request(3, &[ContentType::Artist])).unwrap();
        let saved = store.saved().unwrap();
        assert_eq!(saved.total_generations, 3);
        assert_eq!(saved.genre_counts.get("rock"), Some(&3));
        assert_eq!(outcome.evolution_score, saved.evolution_score);
    }

    #[test]
    fn test_quantity_clamped_to_limit() {
        let dir = TempDir::new().unwrap();
        let (orch, _) = orchestrator(dir.path(), 4);

        let outcome = orch.run(&request(50, &[ContentType::Video])).unwrap();
        assert_eq!(outcome.records.len(), 5);
    }

    #[test]
    fn test_same_seed_same_output() {
        let types = [ContentType::Artist, ContentType::Lyrics];
        let dir_a = TempDir::new().unwrap();
        let dir_b = TempDir::new().unwrap();
        let (a, _) = orchestrator(dir_a.path(), 42);
        let (b, _) = orchestrator(dir_b.path(), 42);

        let first = a.run(&request(2, &types)).unwrap();
        let second = b.run(&request(2, &types)).unwrap();
        for (x, y) in first.records.iter().zip(&second.records) {
            assert_eq!(x.content.artist, y.content.artist);
            assert_eq!(x.content.lyrics, y.content.lyrics);
        }
    }

    #[test]
    fn test_echoes_raw_customization() {
        let dir = TempDir::new().unwrap();
        let (orch, _) = orchestrator(dir.path(), 5);

        let mut req = request(1, &[ContentType::Artist]);
        req.customization.genre = Some("polka".to_string());
        let outcome = orch.run(&req).unwrap();
        assert_eq!(outcome.records[0].customization.genre.as_deref(), Some("polka"));
    }

    #[test]
    fn test_generator_failure_aborts_request() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let (orch, store) = orchestrator(&blocker, 6);

        assert!(orch.run(&request(2, &[ContentType::Song])).is_err());
        assert_eq!(orch.evolution().snapshot().unwrap().total_generations, 0);
        assert!(store.saved().is_none());
    }

    #[test]
    fn test_persistence_failure_is_retryable() {
        let dir = TempDir::new().unwrap();
        let (orch, store) = orchestrator(dir.path(), 7);
        store.set_failing(true);

        let err = orch.run(&request(1, &[ContentType::Artist])).unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(orch.evolution().snapshot().unwrap().total_generations, 1);
    }
}
