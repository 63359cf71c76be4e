//! Catalog search diagnostics.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use voicecart_core::SearchResult;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for `/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Run the two-stage catalog search for a term.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<SearchResult>>> {
    let term = query.term.trim();
    if term.is_empty() {
        return Err(AppError::BadRequest("term is required".to_string()));
    }

    let session = state.session(query.session_id.as_deref()).await;
    let results = state.magento().search(&session, term).await?;
    Ok(Json(results))
}
