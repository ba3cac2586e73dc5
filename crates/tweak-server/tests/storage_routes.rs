//! Integration tests for the storage routes.
//!
//! These drive the full router the way a client would: every command goes
//! through `/storage/{command}` and the state is read back with `state`.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::ServiceExt;
use tweak_core::{PersistenceHook, SqliteHook, TweakError};
use tweak_server::{
    config::{Config, PersistenceMode},
    routes,
    state::AppState,
};

const TEST_WORD: &str = "qwert";

/// Hook that remembers every call it receives.
#[derive(Default)]
struct RecordingHook {
    calls: Mutex<Vec<(Vec<String>, String)>>,
}

impl PersistenceHook for RecordingHook {
    fn update(&self, entries: &[String], value: &str) -> tweak_core::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((entries.to_vec(), value.to_string()));
        Ok(())
    }
}

struct FailingHook;

impl PersistenceHook for FailingHook {
    fn update(&self, _entries: &[String], _value: &str) -> tweak_core::Result<()> {
        Err(TweakError::Persistence("database offline".into()))
    }
}

fn create_test_app(hook: Arc<dyn PersistenceHook>) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::with_hook(hook));
    (routes::router(state.clone()), state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Send a storage command and return its JSON body, asserting 200.
async fn command(app: &Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK, "{uri} returned {status}: {body}");
    serde_json::from_str(&body).unwrap()
}

async fn check_expected_state(app: &Router, expected: &str) {
    let body = command(app, "/storage/state").await;
    let res = body["res"].as_str().unwrap();
    assert!(
        res.starts_with(&format!("State: {expected}")),
        "expected state {expected}, got '{res}'"
    );
}

async fn move_to_error(app: &Router) {
    for i in 0..6 {
        command(app, &format!("/storage/add?string={i}")).await;
    }
}

// =============================================================================
// Service routes
// =============================================================================

#[tokio::test]
async fn test_root_status() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));
    let body = command(&app, "/").await;
    assert_eq!(body["res"], "Operational");
}

#[tokio::test]
async fn test_health() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));
    let body = command(&app, "/health").await;
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// State machine over HTTP
// =============================================================================

#[tokio::test]
async fn test_fresh_session_is_standby() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));
    let body = command(&app, "/storage/state").await;
    assert_eq!(body["res"], "State: StandBy");
    assert_eq!(body["state"], "StandBy");
    assert!(body.get("fault").is_none());
}

#[tokio::test]
async fn test_reference_scenario() {
    let (app, state) = create_test_app(Arc::new(RecordingHook::default()));

    let body = command(&app, "/storage/add?string=a").await;
    assert_eq!(body["state"], "Input");
    assert_eq!(body["res"], "a");

    for value in ["b", "c", "d", "e"] {
        let body = command(&app, &format!("/storage/add?string={value}")).await;
        assert_eq!(body["state"], "Input");
    }
    assert_eq!(state.storage.snapshot().unwrap().len(), 5);

    let body = command(&app, "/storage/add?string=f").await;
    assert_eq!(body["state"], "Error");
    assert_eq!(body["fault"]["kind"], "capacity_exceeded");

    check_expected_state(&app, "Error").await;
    assert_eq!(command(&app, "/storage/sorry").await["state"], "Query");

    let body = command(&app, "/storage/query?index=1").await;
    assert_eq!(body["state"], "Query");
    assert_eq!(body["res"], "a");

    let body = command(&app, "/storage/query?index=9").await;
    assert_eq!(body["state"], "Error");
    assert_eq!(body["fault"]["kind"], "index_out_of_range");

    assert_eq!(command(&app, "/storage/sorry").await["state"], "Query");
    assert_eq!(command(&app, "/storage/clear").await["state"], "Input");
    assert!(state.storage.snapshot().unwrap().is_empty());
    assert_eq!(command(&app, "/storage/stop").await["state"], "StandBy");
    check_expected_state(&app, "StandBy").await;
}

#[tokio::test]
async fn test_storage_full_walk() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));

    // Input -> clear -> stop -> Standby
    command(&app, "/storage/add?string=seed").await;
    command(&app, "/storage/clear").await;
    command(&app, "/storage/stop").await;
    check_expected_state(&app, "StandBy").await;

    // Standby -> Input -> Error -> sorry -> Query -> valid query
    move_to_error(&app).await;
    check_expected_state(&app, "Error").await;
    command(&app, "/storage/sorry").await;
    check_expected_state(&app, "Query").await;
    command(&app, "/storage/query?index=1").await;
    check_expected_state(&app, "Query").await;

    // Query -> invalid query -> Error -> Query -> stop
    command(&app, "/storage/query?index=9").await;
    check_expected_state(&app, "Error").await;
    command(&app, "/storage/sorry").await;
    check_expected_state(&app, "Query").await;
    command(&app, "/storage/stop").await;
    check_expected_state(&app, "StandBy").await;

    // Standby with a full store -> Error -> sorry -> Query -> clear -> Input
    move_to_error(&app).await;
    check_expected_state(&app, "Error").await;
    command(&app, "/storage/sorry").await;
    check_expected_state(&app, "Query").await;
    command(&app, "/storage/clear").await;
    check_expected_state(&app, "Input").await;

    // Input -> Error -> clear -> Input
    move_to_error(&app).await;
    check_expected_state(&app, "Error").await;
    command(&app, "/storage/clear").await;
    check_expected_state(&app, "Input").await;

    // Input -> Error -> stop -> Standby
    move_to_error(&app).await;
    check_expected_state(&app, "Error").await;
    command(&app, "/storage/stop").await;
    check_expected_state(&app, "StandBy").await;
}

#[tokio::test]
async fn test_sorry_outside_error_changes_nothing() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));

    let body = command(&app, "/storage/sorry").await;
    assert_eq!(body["state"], "StandBy");

    command(&app, "/storage/add?string=x").await;
    let body = command(&app, "/storage/sorry").await;
    assert_eq!(body["state"], "Input");
    check_expected_state(&app, "Input").await;
}

#[tokio::test]
async fn test_state_is_idempotent() {
    let (app, state) = create_test_app(Arc::new(RecordingHook::default()));
    command(&app, "/storage/add?string=x").await;

    for _ in 0..5 {
        check_expected_state(&app, "Input").await;
    }
    assert_eq!(state.storage.snapshot().unwrap(), vec!["x"]);
}

#[tokio::test]
async fn test_empty_string_is_a_valid_payload() {
    let (app, state) = create_test_app(Arc::new(RecordingHook::default()));
    let body = command(&app, "/storage/add?string=").await;
    assert_eq!(body["state"], "Input");
    assert_eq!(body["res"], "");
    assert_eq!(state.storage.snapshot().unwrap(), vec![""]);
}

#[tokio::test]
async fn test_query_index_zero_is_out_of_range() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));
    move_to_error(&app).await;
    command(&app, "/storage/sorry").await;

    let body = command(&app, "/storage/query?index=0").await;
    assert_eq!(body["state"], "Error");
}

// =============================================================================
// Persistence hook contract
// =============================================================================

#[tokio::test]
async fn test_add_calls_hook_with_store_and_value() {
    let hook = Arc::new(RecordingHook::default());
    let (app, _) = create_test_app(hook.clone());

    command(&app, &format!("/storage/add?string={TEST_WORD}")).await;

    let calls = hook.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, vec![TEST_WORD.to_string()]);
    assert_eq!(calls[0].1, TEST_WORD);
}

#[tokio::test]
async fn test_overflowing_add_is_not_persisted() {
    let hook = Arc::new(RecordingHook::default());
    let (app, state) = create_test_app(hook.clone());

    move_to_error(&app).await;

    assert_eq!(hook.calls.lock().unwrap().len(), 5);
    assert_eq!(
        state.storage.snapshot().unwrap(),
        vec!["0", "1", "2", "3", "4"]
    );
}

#[tokio::test]
async fn test_clear_does_not_call_hook() {
    let hook = Arc::new(RecordingHook::default());
    let (app, _) = create_test_app(hook.clone());

    command(&app, "/storage/add?string=a").await;
    command(&app, "/storage/clear").await;

    assert_eq!(hook.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_hook_failure_is_a_request_failure() {
    let (app, state) = create_test_app(Arc::new(FailingHook));

    let (status, body) = get(&app, "/storage/add?string=a").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("database offline"));
    // The append is not rolled back.
    assert_eq!(state.storage.snapshot().unwrap(), vec!["a"]);
    check_expected_state(&app, "Input").await;
}

#[tokio::test]
async fn test_sqlite_persistence_from_config() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("storage.db");
    let config = Config {
        persistence: PersistenceMode::Sqlite,
        db_path: db_path.clone(),
        ..Config::default()
    };
    let state = Arc::new(AppState::new(&config).expect("Failed to create AppState"));
    let app = routes::router(state);

    command(&app, "/storage/add?string=one").await;
    command(&app, "/storage/add?string=two").await;

    let hook = SqliteHook::open(&db_path).unwrap();
    assert_eq!(hook.recorded_values().unwrap(), vec!["one", "two"]);
}

// =============================================================================
// Malformed requests
// =============================================================================

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));

    let (status, body) = get(&app, "/storage/remove").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("remove"));
    check_expected_state(&app, "StandBy").await;
}

#[tokio::test]
async fn test_malformed_index_is_rejected_without_state_change() {
    let (app, _) = create_test_app(Arc::new(RecordingHook::default()));
    move_to_error(&app).await;
    command(&app, "/storage/sorry").await;

    for uri in [
        "/storage/query?index=-1",
        "/storage/query?index=abc",
        "/storage/query?index=1.5",
        "/storage/query?index=",
        "/storage/query",
    ] {
        let (status, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }

    check_expected_state(&app, "Query").await;
}

#[tokio::test]
async fn test_non_utf8_payload_is_rejected_without_storing() {
    let hook = Arc::new(RecordingHook::default());
    let (app, state) = create_test_app(hook.clone());
    command(&app, "/storage/add?string=kept").await;

    for uri in ["/storage/add?string=%FF", "/storage/add?string=ok%C3"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert!(body.contains("UTF-8"), "{uri}: {body}");
    }

    assert_eq!(state.storage.snapshot().unwrap(), vec!["kept"]);
    assert_eq!(hook.calls.lock().unwrap().len(), 1);
    check_expected_state(&app, "Input").await;
}

#[tokio::test]
async fn test_encoded_payload_is_decoded() {
    let (app, state) = create_test_app(Arc::new(RecordingHook::default()));

    let body = command(&app, "/storage/add?string=caf%C3%A9+au+lait%26more").await;

    assert_eq!(body["res"], "café au lait&more");
    assert_eq!(state.storage.snapshot().unwrap(), vec!["café au lait&more"]);
}

#[tokio::test]
async fn test_repeated_arguments_are_rejected_as_malformed() {
    let (app, state) = create_test_app(Arc::new(RecordingHook::default()));
    move_to_error(&app).await;
    command(&app, "/storage/sorry").await;

    let (status, body) = get(&app, "/storage/query?index=1&index=2").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("'index' given more than once"), "{body}");

    let (status, _) = get(&app, "/storage/add?string=a&string=b").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(state.storage.snapshot().unwrap().len(), 5);
    check_expected_state(&app, "Query").await;
}

#[tokio::test]
async fn test_add_without_string_is_rejected() {
    let hook = Arc::new(RecordingHook::default());
    let (app, _) = create_test_app(hook.clone());

    let (status, _) = get(&app, "/storage/add").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(hook.calls.lock().unwrap().is_empty());
    check_expected_state(&app, "StandBy").await;
}

#[tokio::test]
async fn test_concurrent_adds_never_exceed_capacity() {
    let (app, state) = create_test_app(Arc::new(RecordingHook::default()));

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { command(&app, &format!("/storage/add?string=c{i}")).await })
        })
        .collect();

    let mut accepted = 0;
    let mut faults = 0;
    for task in tasks {
        let body = task.await.unwrap();
        if body["state"] == "Input" {
            accepted += 1;
        }
        if body.get("fault").is_some() {
            faults += 1;
        }
    }

    // One overflow enters Error; the adds after it are ignored.
    assert_eq!(accepted, 5);
    assert_eq!(faults, 1);
    assert_eq!(state.storage.snapshot().unwrap().len(), 5);
    check_expected_state(&app, "Error").await;
}
