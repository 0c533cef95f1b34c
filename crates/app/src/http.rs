//! HTTP fulfillment endpoint for the voice platform.
//!
//! The platform posts one request per conversational turn with the recognized
//! intent and the session bag it stored last time; the reply carries the
//! speech to play, whether to keep listening, and the session bag to store.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use parrot_core::speech::EndStatus;
use serde::{Deserialize, Serialize};
use services::{FailureKind, Intent, SessionData, TurnHandler};
use tracing::debug;

pub struct AppState {
    pub turns: Arc<TurnHandler>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FulfillmentRequest {
    pub intent: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub confirm: Option<bool>,
    #[serde(default)]
    pub session: SessionData,
}

#[derive(Debug, Clone, Serialize)]
pub struct FulfillmentResponse {
    pub ssml: String,
    pub text: String,
    pub end_status: EndStatus,
    pub expect_user_response: bool,
    pub session: SessionData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureKind>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/fulfillment", post(fulfill))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Runs one turn. Unknown intents are rejected before any session state is touched.
pub async fn fulfill(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FulfillmentRequest>,
) -> Result<Json<FulfillmentResponse>, ApiError> {
    let intent = Intent::from_parts(&request.intent, request.answer, request.confirm)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown intent: {}", request.intent)))?;
    debug!(intent = intent.name(), "fulfillment request");

    let outcome = state.turns.handle(&request.session, intent).await;
    let status = outcome.plan.status();

    Ok(Json(FulfillmentResponse {
        ssml: outcome.plan.to_ssml(),
        text: outcome.plan.to_text(),
        end_status: status,
        expect_user_response: status.expects_user_response(),
        session: outcome.session,
        failure: outcome.failure,
    }))
}
