//! Dialogue turn handler.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::intents::{IntentRequest, SkillResponse};
use crate::state::AppState;

/// Route one turn through the intent router.
///
/// Always answers 200 with speech for a well-formed turn; backend failures
/// are already rendered as an apology by the router.
#[instrument(skip_all, fields(intent = %request.name))]
pub async fn handle(
    State(state): State<AppState>,
    Json(request): Json<IntentRequest>,
) -> Result<Json<SkillResponse>> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("intent name is required".to_string()));
    }

    let session = state.session(request.session_id.as_deref()).await;
    let response = state.router().route(&request, &session).await;
    Ok(Json(response))
}
