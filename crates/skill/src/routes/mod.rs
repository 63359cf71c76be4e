//! HTTP route handlers for the skill service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Liveness check
//! POST /intents           - Handle one dialogue turn (IntentRequest -> SkillResponse)
//! GET  /search?term=...   - Catalog search as the resolver sees it (operator diagnostics)
//! ```

pub mod intents;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/intents", post(intents::handle))
        .route("/search", get(search::search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::magento::MagentoClient;
    use crate::magento::testing::test_config;

    fn app() -> Router {
        let client = MagentoClient::new(&test_config()).unwrap();
        routes(AppState::new(client, Duration::from_secs(60)))
    }

    async fn post_intent(body: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(
                Request::post("/intents")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_launch_request_needs_no_backend() {
        let (status, body) = post_intent(r#"{"name": "LaunchRequest"}"#).await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["speech"], crate::intents::messages::WELCOME);
        assert_eq!(json["shouldEndSession"], false);
    }

    #[tokio::test]
    async fn test_malformed_slots_are_spoken_not_found() {
        let (status, body) = post_intent(
            r#"{
                "name": "AddToCartByNameIntent",
                "slots": {
                    "SEARCHTERM": {"resolutions": {"resolutionsPerAuthority": null}},
                    "QUANTITY": {"value": 3}
                }
            }"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["speech"], crate::intents::messages::product_not_found(""));
        assert_eq!(json["shouldEndSession"], false);
    }

    #[tokio::test]
    async fn test_blank_intent_name_is_rejected() {
        let (status, body) = post_intent(r#"{"name": "  "}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("intent name is required"));
    }

    #[tokio::test]
    async fn test_search_requires_term() {
        let response = app()
            .oneshot(Request::get("/search?term=%20").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
