//! HTTP request handlers

use super::assets::serve_index;
use super::types::{ErrorResponse, FeedbackRequest, SearchRequest, TurnResponse};
use super::AppState;
use crate::runtime::{AgentError, SessionSnapshot, SharedSession, TurnOutcome};
use crate::state_machine::{Feedback, TransitionError};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::sync::MutexGuard;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/session", get(get_session))
        .route("/api/search", post(search))
        .route("/api/feedback", post(feedback))
        .route("/api/reset", post(reset))
        .route("/version", get(get_version))
        .with_state(state)
}

/// Take the session, or fail fast if a turn is holding it
fn lock_session(state: &AppState) -> Result<MutexGuard<'_, SharedSession>, AppError> {
    state
        .session
        .try_lock()
        .map_err(|_| AppError::Conflict(TransitionError::AgentBusy.to_string()))
}

// ============================================================
// Session
// ============================================================

async fn get_session(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    let session = lock_session(&state)?;
    Ok(Json(session.snapshot()))
}

async fn reset(State(state): State<AppState>) -> Result<Json<SessionSnapshot>, AppError> {
    let mut session = lock_session(&state)?;
    session.reset();
    Ok(Json(session.snapshot()))
}

// ============================================================
// Turns
// ============================================================

async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let mut session = lock_session(&state)?;
    let outcome = session.submit_query(&req.text).await?;
    Ok(Json(turn_response(&session, outcome)))
}

async fn feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let mut session = lock_session(&state)?;
    let outcome = session
        .give_feedback(Feedback::from_approved(req.approved))
        .await?;
    Ok(Json(turn_response(&session, outcome)))
}

fn turn_response(session: &SharedSession, outcome: TurnOutcome) -> TurnResponse {
    tracing::info!(
        session_id = %session.id(),
        state = session.state().name(),
        "Turn finished"
    );
    TurnResponse {
        outcome,
        session: session.snapshot(),
    }
}

async fn get_version() -> &'static str {
    concat!("job-scout ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Conflict(String),
    Upstream(String),
    Internal(String),
}

impl From<AgentError> for AppError {
    fn from(err: AgentError) -> Self {
        let message = err.to_string();
        match err {
            AgentError::Transition(TransitionError::EmptyQuery) => AppError::BadRequest(message),
            AgentError::Transition(TransitionError::InvalidTransition(_)) => {
                AppError::Internal(message)
            }
            AgentError::Transition(_) => AppError::Conflict(message),
            AgentError::Llm(_) | AgentError::Tool { .. } | AgentError::UnknownTool(_) => {
                AppError::Upstream(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
