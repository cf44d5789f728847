//! Tests for the JSON HTTP API.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use number_duel::{DuelService, MemoryStore, Round, RoundStore, router};
use serde_json::{Value, json};
use tower::ServiceExt;

/// Router over a memory store seeded with a round whose secret is `secret`.
fn app_with_secret(secret: &str) -> (MemoryStore, Router) {
    let store = MemoryStore::new();
    store
        .save(&Round::new(secret.parse().expect("Invalid secret")), None)
        .expect("Seed save failed");
    let app = router(DuelService::new(Arc::new(store.clone())));
    (store, app)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Body read failed")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(
        app,
        Request::get(uri).body(Body::empty()).expect("Bad request"),
    )
    .await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Bad request"),
    )
    .await
}

#[tokio::test]
async fn test_health() {
    let (_store, app) = app_with_secret("1234");
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("Bad request"))
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_guess_returns_feedback() {
    let (_store, app) = app_with_secret("1234");
    let (status, body) =
        post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "1123" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["gameOver"], json!(false));
    assert_eq!(body["winner"], Value::Null);
    assert_eq!(body["guess"]["value"], json!("1123"));
    assert_eq!(
        body["guess"]["colors"],
        json!(["correct", "absent", "present", "present"])
    );
}

#[tokio::test]
async fn test_guess_accepts_string_player_id() {
    let (_store, app) = app_with_secret("1123");
    let (status, _) =
        post_json(&app, "/api/guess", json!({ "playerId": "2", "value": "0000" })).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_submissions_are_bad_requests() {
    let (store, app) = app_with_secret("1123");
    let before = store.load().expect("Load failed");

    let cases = [
        (json!({ "playerId": 3, "value": "1234" }), "invalid_player"),
        (json!({ "playerId": "one", "value": "1234" }), "invalid_player"),
        (json!({ "value": "1234" }), "invalid_player"),
        (json!({ "playerId": 1, "value": "12345" }), "invalid_guess"),
        (json!({ "playerId": 1, "value": "12 4" }), "invalid_guess"),
        (json!({ "playerId": 1 }), "invalid_guess"),
        (json!({ "playerId": true, "value": "1234" }), "invalid_player"),
        (json!({ "playerId": 1.0, "value": "1234" }), "invalid_player"),
        (json!({ "playerId": [1], "value": "1234" }), "invalid_player"),
        (json!({ "playerId": null, "value": "1234" }), "invalid_player"),
        (json!({ "playerId": 1, "value": 5678 }), "invalid_guess"),
        (json!({ "playerId": 1, "value": null }), "invalid_guess"),
        // Player is checked before the guess.
        (json!({ "playerId": false, "value": 5678 }), "invalid_player"),
        (json!({ "playerId": 3 }), "invalid_player"),
    ];
    for (request, reason) in cases {
        let (status, body) = post_json(&app, "/api/guess", request.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "request {}", request);
        assert_eq!(body["reason"], json!(reason), "request {}", request);
        assert!(body["error"].is_string());
    }

    assert_eq!(store.load().expect("Load failed"), before);
}

#[tokio::test]
async fn test_malformed_json_body_is_a_bad_request() {
    let (store, app) = app_with_secret("1123");
    let before = store.load().expect("Load failed");

    for raw in ["not json", "[1, \"1234\"]", ""] {
        let (status, body) = send(
            &app,
            Request::post("/api/guess")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(raw))
                .expect("Bad request"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {:?}", raw);
        assert_eq!(body["reason"], json!("invalid_input"), "body {:?}", raw);
        assert!(body["error"].is_string());
    }

    assert_eq!(store.load().expect("Load failed"), before);
}

#[tokio::test]
async fn test_win_then_round_over() {
    let (_store, app) = app_with_secret("8080");
    let (status, body) =
        post_json(&app, "/api/guess", json!({ "playerId": 2, "value": "8080" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["gameOver"], json!(true));
    assert_eq!(body["winner"], json!(2));

    let (status, body) =
        post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "8080" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], json!("round_over"));
}

#[tokio::test]
async fn test_no_guesses_left() {
    let (_store, app) = app_with_secret("8080");
    for _ in 0..number_duel::MAX_GUESSES {
        let (status, _) =
            post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "1111" })).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, body) =
        post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "1111" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], json!("no_guesses_left"));
}

#[tokio::test]
async fn test_state_hides_opponent_and_secret_while_live() {
    let (_store, app) = app_with_secret("5555");
    post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "5050" })).await;

    let (status, body) = get(&app, "/api/state?player=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], json!(2));
    assert_eq!(body["myGuesses"], json!([]));
    assert_eq!(body["myGuessCount"], json!(0));
    assert_eq!(body["otherGuessCount"], json!(1));
    assert_eq!(body["otherGuesses"], json!([]));
    assert_eq!(body["maxGuesses"], json!(6));
    assert_eq!(body["gameOver"], json!(false));
    assert_eq!(body["targetRevealed"], Value::Null);
    assert!(!body.to_string().contains("5555"));
}

#[tokio::test]
async fn test_state_reveals_everything_when_finished() {
    let (_store, app) = app_with_secret("5555");
    post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "5050" })).await;
    post_json(&app, "/api/guess", json!({ "playerId": 2, "value": "5555" })).await;

    let (_, body) = get(&app, "/api/state?player=1").await;
    assert_eq!(body["gameOver"], json!(true));
    assert_eq!(body["winner"], json!(2));
    assert_eq!(body["targetRevealed"], json!("5555"));
    assert_eq!(body["otherGuesses"][0]["value"], json!("5555"));
}

#[tokio::test]
async fn test_state_rejects_bad_player() {
    let (_store, app) = app_with_secret("5555");
    for uri in ["/api/state", "/api/state?player=0", "/api/state?player=x"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body["reason"], json!("invalid_player"));
    }
}

#[tokio::test]
async fn test_new_game_resets_round() {
    let (store, app) = app_with_secret("5555");
    post_json(&app, "/api/guess", json!({ "playerId": 1, "value": "1234" })).await;

    let (status, body) = post_json(&app, "/api/new-game", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let current = store.load().expect("Load failed").expect("Round missing");
    assert!(current.value().record(number_duel::PlayerId::One).is_empty());

    let (_, body) = get(&app, "/api/round").await;
    assert_eq!(body["guessCounts"], json!([0, 0]));
}

#[tokio::test]
async fn test_round_summary_creates_round() {
    let store = MemoryStore::new();
    let app = router(DuelService::new(Arc::new(store.clone())));

    let (status, body) = get(&app, "/api/round").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "gameOver": false, "winner": null, "guessCounts": [0, 0], "maxGuesses": 6 })
    );
    assert!(store.load().expect("Load failed").is_some());
}
