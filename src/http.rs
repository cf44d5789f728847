//! JSON HTTP API over the duel service.
//!
//! | Method | Path            | Purpose                          |
//! |--------|-----------------|----------------------------------|
//! | GET    | `/api/state`    | a player's filtered view         |
//! | POST   | `/api/guess`    | submit a guess                   |
//! | POST   | `/api/new-game` | force-start a new round          |
//! | GET    | `/api/round`    | create-or-fetch round summary    |
//! | GET    | `/health`       | liveness                         |

use crate::error::DuelError;
use crate::service::DuelService;
use crate::store::StoreError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use number_duel_core::{GuessRecord, MAX_GUESSES, PlayerId, PlayerView, RulesError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info, instrument, warn};

/// Query string of `GET /api/state`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateQuery {
    /// Requesting player, `1` or `2`.
    pub player: Option<String>,
}

/// A player id as sent by clients: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPlayerId {
    /// `1`
    Number(i64),
    /// `"1"`
    Text(String),
}

/// Body of `POST /api/guess`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    /// Submitting player.
    #[serde(default)]
    pub player_id: Option<RawPlayerId>,
    /// The 4-digit guess.
    #[serde(default)]
    pub value: Option<String>,
}

/// Reply to an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResponse {
    /// Always `true`.
    pub success: bool,
    /// Whether the round is over after this guess.
    pub game_over: bool,
    /// Winner, if any.
    pub winner: Option<PlayerId>,
    /// The recorded guess and its feedback.
    pub guess: GuessRecord,
}

/// Reply to `POST /api/new-game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGameResponse {
    /// Always `true`.
    pub success: bool,
}

/// Public summary of the current round; reveals no guesses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    /// Whether the round is over.
    pub game_over: bool,
    /// Winner, if any.
    pub winner: Option<PlayerId>,
    /// Guesses made by players 1 and 2.
    pub guess_counts: [usize; 2],
    /// Guess budget per player.
    pub max_guesses: usize,
}

/// Error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub error: String,
    /// Stable reason code.
    pub reason: String,
}

/// A [`DuelError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(DuelError);

impl<E: Into<DuelError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DuelError::Rules(_) => StatusCode::BAD_REQUEST,
            DuelError::Contention { .. } => StatusCode::CONFLICT,
            DuelError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, %status, "Request rejected");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
            reason: self.0.reason().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

fn parse_player(raw: &str) -> Result<i64, RulesError> {
    raw.trim()
        .parse()
        .map_err(|_| RulesError::InvalidPlayer(raw.to_string()))
}

/// Runs a blocking service call off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, DuelError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::backend(format!("Worker task failed: {}", e)))?
        .map_err(ApiError)
}

/// Builds the API router.
#[instrument(skip(service))]
pub fn router(service: DuelService) -> Router {
    debug!("Building API router");
    Router::new()
        .route("/health", get(health))
        .route("/api/state", get(player_state))
        .route("/api/round", get(round_summary))
        .route("/api/guess", post(submit_guess))
        .route("/api/new-game", post(new_game))
        .layer(middleware::from_fn(log_request))
        .with_state(service)
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    info!(%method, %uri, status = %response.status(), "Request handled");
    response
}

async fn health() -> &'static str {
    "ok"
}

async fn player_state(
    State(service): State<DuelService>,
    Query(query): Query<StateQuery>,
) -> Result<Json<PlayerView>, ApiError> {
    let player = parse_player(query.player.as_deref().unwrap_or_default())?;
    let view = run_blocking(move || service.view_for(player)).await?;
    Ok(Json(view))
}

async fn round_summary(State(service): State<DuelService>) -> Result<Json<RoundSummary>, ApiError> {
    let round = run_blocking(move || service.get_or_create_round()).await?;
    Ok(Json(RoundSummary {
        game_over: round.is_finished(),
        winner: round.status().winner(),
        guess_counts: PlayerId::ALL.map(|p| round.record(p).len()),
        max_guesses: MAX_GUESSES,
    }))
}

/// Pulls `playerId` and `value` out of a guess body.
///
/// Fields are read loosely so that any wrong shape becomes a rules error
/// with a reason code. The player is checked before the guess.
fn parse_guess_body(body: &Map<String, Value>) -> Result<(i64, String), RulesError> {
    let player = match body.get("playerId") {
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| RulesError::InvalidPlayer(n.to_string()))?,
        Some(Value::String(s)) => parse_player(s)?,
        None | Some(Value::Null) => return Err(RulesError::InvalidPlayer(String::new())),
        Some(other) => return Err(RulesError::InvalidPlayer(other.to_string())),
    };
    PlayerId::try_from(player)?;
    let value = match body.get("value") {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => return Err(RulesError::InvalidGuess(String::new())),
        Some(other) => return Err(RulesError::InvalidGuess(other.to_string())),
    };
    Ok((player, value))
}

async fn submit_guess(
    State(service): State<DuelService>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<GuessResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| RulesError::InvalidInput(rejection.body_text()))?;
    let (player, value) = parse_guess_body(&body)?;
    let outcome = run_blocking(move || service.submit_guess(player, &value)).await?;
    Ok(Json(GuessResponse {
        success: true,
        game_over: outcome.game_over(),
        winner: outcome.winner(),
        guess: *outcome.guess(),
    }))
}

async fn new_game(State(service): State<DuelService>) -> Result<Json<NewGameResponse>, ApiError> {
    run_blocking(move || service.start_new_round()).await?;
    Ok(Json(NewGameResponse { success: true }))
}
