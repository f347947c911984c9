use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use scamshield_classifier::{ArtifactBundle, ScanResult};

use crate::coach::CoachService;
use crate::error::{ApiError, CallSite};
use crate::model::{CoachRequest, CoachResponse, DailyTip, QuizQuestions, ScanRequest};

pub const LIVENESS_MESSAGE: &str = "server is running";

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub bundle: Arc<ArtifactBundle>,
    pub coach: CoachService,
}

pub fn build_router(state: AppState, allowed_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .route("/", get(liveness))
        .route("/scan/text", post(scan_text))
        .route("/ask-coach", post(ask_coach))
        .route("/get-questions", get(get_questions))
        .route("/get-tip", get(get_tip))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> Json<&'static str> {
    Json(LIVENESS_MESSAGE)
}

async fn scan_text(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResult>, ApiError> {
    let Json(request) = payload?;
    let bundle = Arc::clone(&state.bundle);
    let result = tokio::task::spawn_blocking(move || bundle.scan(&request.text))
        .await
        .map_err(|e| ApiError::Internal(format!("scan worker failed: {e}")))?;
    Ok(Json(result))
}

async fn ask_coach(
    State(state): State<AppState>,
    payload: Result<Json<CoachRequest>, JsonRejection>,
) -> Result<Json<CoachResponse>, ApiError> {
    let Json(request) = payload?;
    state
        .coach
        .ask(&request.question, &request.text)
        .await
        .map(Json)
        .map_err(|error| ApiError::Generation {
            site: CallSite::Coach,
            error,
        })
}

async fn get_questions(State(state): State<AppState>) -> Result<Json<QuizQuestions>, ApiError> {
    state
        .coach
        .quiz()
        .await
        .map(Json)
        .map_err(|error| ApiError::Generation {
            site: CallSite::Quiz,
            error,
        })
}

async fn get_tip(State(state): State<AppState>) -> Result<Json<DailyTip>, ApiError> {
    state
        .coach
        .daily_tip()
        .await
        .map(Json)
        .map_err(|error| ApiError::Generation {
            site: CallSite::Tip,
            error,
        })
}
