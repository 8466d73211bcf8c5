//! Integration tests for museai-srv API endpoints
//!
//! Tests cover:
//! - Content generation (requested subsets, defaults, malformed input)
//! - Customization options
//! - Evolution statistics and recommendations
//! - Serving generated files
//! - Health endpoint

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use museai_common::Genre;
use museai_gen::artist::{self, ArtistKind};
use museai_gen::lyrics::{BRIDGE, CHORUS, VERSE_1, VERSE_2};
use museai_gen::ArtifactStore;
use museai_srv::evolution::{EvolutionEngine, EvolutionHandle, MemoryStatsStore};
use museai_srv::services::Orchestrator;
use museai_srv::{build_router, AppState};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app writing into a scratch directory, stats kept in memory
fn setup_app(dir: &TempDir) -> (Router, MemoryStatsStore) {
    let artifacts = ArtifactStore::new(dir.path().join("output"));
    artifacts.ensure_directories().unwrap();

    let store = MemoryStatsStore::new();
    let engine = EvolutionEngine::open(Box::new(store.clone())).unwrap();
    let orchestrator = Orchestrator::new(artifacts, EvolutionHandle::new(engine), Some(7), 10);

    (build_router(AppState::new(orchestrator)), store)
}

/// Test helper: bodiless request
fn test_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: POST /api/generate with a raw body
fn generate_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/generate")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn generate(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(generate_request(body.to_string()))
        .await
        .unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Health and options
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "museai-srv");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_u64());
    assert!(body.get("last_error").is_none());
}

#[tokio::test]
async fn test_customization_options() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let response = app
        .oneshot(test_request("GET", "/api/customization-options"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["genres"].as_array().unwrap().len(), 8);
    assert_eq!(body["moods"].as_array().unwrap().len(), 7);
    assert_eq!(body["tempos"].as_array().unwrap().len(), 4);
    assert_eq!(body["keys"].as_array().unwrap().len(), 12);
    assert_eq!(body["styles"].as_array().unwrap().len(), 5);
    assert!(body["genres"].as_array().unwrap().contains(&json!("hip-hop")));
    assert!(body["keys"].as_array().unwrap().contains(&json!("C#")));
}

// =============================================================================
// Generation
// =============================================================================

#[tokio::test]
async fn test_generate_jazz_artist_and_lyrics() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let (status, body) = generate(
        &app,
        json!({
            "quantity": 1,
            "content_types": ["artist", "lyrics"],
            "customization": {"genre": "jazz"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    let item = &results[0];

    let name = item["artist"].as_str().unwrap();
    assert!(
        ArtistKind::allowed_for(Genre::Jazz)
            .iter()
            .any(|kind| artist::matches_kind(name, *kind)),
        "{} is not a jazz act name",
        name
    );

    let lyrics = item["lyrics"].as_str().unwrap();
    let positions: Vec<usize> = [VERSE_1, CHORUS, VERSE_2, BRIDGE]
        .iter()
        .map(|section| lyrics.find(section).expect("section present"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(item["lyrics_file"].as_str().unwrap().starts_with("lyrics_"));
    assert!(item.get("song").is_none());
    assert!(item.get("picture").is_none());
    assert_eq!(item["customization"], json!({"genre": "jazz"}));
    // one item, one genre, one (unknown) mood
    assert_eq!(body["evolution_score"], 1);
}

#[tokio::test]
async fn test_generate_defaults_and_serves_song() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let (status, body) = generate(&app, json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let item = &body["results"][0];
    assert!(item["artist"].is_string());
    assert!(item["lyrics"].is_string());
    assert!(item.get("picture").is_none());
    assert!(item.get("video").is_none());

    let song = item["song"].as_str().unwrap();
    assert!(song.starts_with("songs/") && song.ends_with(".mid"));

    let response = app
        .oneshot(test_request("GET", &format!("/output/{}", song)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let smf = midly::Smf::parse(&bytes).expect("valid MIDI");
    assert_eq!(smf.tracks.len(), 3);
}

#[tokio::test]
async fn test_generate_picture_and_video() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let (status, body) = generate(
        &app,
        json!({
            "quantity": 2,
            "content_types": ["picture", "video", "hologram"],
            "customization": {"genre": "electronic", "mood": "calm"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    for item in results {
        assert_eq!(item["video"], "video_placeholder.mp4");
        let picture = item["picture"].as_str().unwrap();
        assert!(picture.starts_with("images/art_") && picture.contains("_electronic_"));
        assert!(dir.path().join("output").join(picture).is_file());
        assert!(item.get("artist").is_none());
    }
    assert_ne!(results[0]["picture"], results[1]["picture"]);
}

#[tokio::test]
async fn test_malformed_fields_fall_back() {
    let dir = TempDir::new().unwrap();
    let (app, store) = setup_app(&dir);

    let (status, body) = generate(
        &app,
        json!({
            "quantity": -3,
            "content_types": "artist",
            "customization": {"genre": 5, "mood": "Sad"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0]["song"].is_string());
    assert_eq!(results[0]["customization"], json!({"mood": "Sad"}));

    let saved = store.saved().unwrap();
    assert_eq!(saved.genre_counts.get("unknown"), Some(&1));
    assert_eq!(saved.mood_counts.get("sad"), Some(&1));
}

#[tokio::test]
async fn test_empty_content_types_generates_nothing_but_counts() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let (status, body) = generate(&app, json!({"quantity": 2, "content_types": []})).await;
    assert_eq!(status, StatusCode::OK);

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].get("artist").is_none());
    assert!(results[0]["id"].is_string());
}

#[tokio::test]
async fn test_non_json_body_rejected() {
    let dir = TempDir::new().unwrap();
    let (app, store) = setup_app(&dir);

    let response = app.oneshot(generate_request("not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert!(store.saved().is_none());
}

#[tokio::test]
async fn test_empty_body_rejected() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let response = app.oneshot(generate_request("")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_persistence_failure_returns_503() {
    let dir = TempDir::new().unwrap();
    let (app, store) = setup_app(&dir);
    store.set_failing(true);

    let (status, body) = generate(&app, json!({"content_types": ["artist"]})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);

    // state stays queryable
    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/evolution-stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let stats = extract_json(response.into_body()).await;
    assert_eq!(stats["total_generations"], 1);

    let response = app.oneshot(test_request("GET", "/health")).await.unwrap();
    let health = extract_json(response.into_body()).await;
    assert!(health["last_error"].is_string());
}

// =============================================================================
// Evolution
// =============================================================================

#[tokio::test]
async fn test_evolution_stats_reflect_requests() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let request = |genre: &str, quantity: u32| {
        json!({
            "quantity": quantity,
            "content_types": ["artist"],
            "customization": {"genre": genre, "mood": "happy", "tempo": "fast"}
        })
    };
    generate(&app, request("rock", 2)).await;
    generate(&app, request("pop", 1)).await;

    let response = app
        .oneshot(test_request("GET", "/api/evolution-stats"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stats = extract_json(response.into_body()).await;
    assert_eq!(stats["total_generations"], 3);
    assert_eq!(stats["genre_counts"], json!({"pop": 1, "rock": 2}));
    assert_eq!(stats["tempo_counts"], json!({"fast": 3}));
    assert_eq!(stats["preferred_genre"], "rock");
    assert_eq!(stats["preferred_mood"], "happy");
    // 3 / 10 + (2 + 1) / 2
    assert_eq!(stats["evolution_score"], 1);
    assert_eq!(stats["recent_generations"].as_array().unwrap().len(), 3);
    assert_eq!(stats["recent_generations"][2]["genre"], "pop");
}

#[tokio::test]
async fn test_recommendations() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let response = app
        .clone()
        .oneshot(test_request("GET", "/api/recommendations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(extract_json(response.into_body()).await, json!({}));

    generate(
        &app,
        json!({
            "quantity": 2,
            "content_types": ["artist"],
            "customization": {"genre": "blues", "mood": "dark", "tempo": "slow"}
        }),
    )
    .await;

    let response = app
        .oneshot(test_request("GET", "/api/recommendations"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({"genre": "blues", "mood": "dark", "tempo": "slow"})
    );
}

#[tokio::test]
async fn test_unknown_output_file_is_404() {
    let dir = TempDir::new().unwrap();
    let (app, _) = setup_app(&dir);

    let response = app
        .oneshot(test_request("GET", "/output/songs/missing.mid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
