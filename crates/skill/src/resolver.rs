//! Product resolution: turn what the shopper said into a catalog SKU.
//!
//! The language model's slot resolution is trusted first. Only when it did
//! not produce a SKU is the raw utterance sent to catalog search, and then
//! only the backend's best match is used.

use tracing::{debug, instrument};
use voicecart_core::{ResolutionRequest, SearchResult};

use crate::magento::{CommerceSession, HttpTransport, MagentoClient, MagentoError};

/// Resolve `request` to a single catalog product.
///
/// Returns `Ok(None)` when nothing matched; that is a normal outcome the
/// caller reports to the shopper, not a failure.
///
/// # Errors
///
/// Returns the search error if the catalog search itself fails.
#[instrument(skip_all, fields(
    structured = request.structured_sku.is_some(),
    term = %request.spoken_term(),
))]
pub async fn resolve_sku<T: HttpTransport>(
    client: &MagentoClient<T>,
    session: &CommerceSession,
    request: &ResolutionRequest,
) -> Result<Option<SearchResult>, MagentoError> {
    if let Some(sku) = &request.structured_sku {
        debug!(sku = %sku, "Resolved from slot");
        return Ok(Some(SearchResult {
            sku: sku.clone(),
            display_name: request
                .free_text_term
                .clone()
                .unwrap_or_else(|| sku.to_string()),
        }));
    }

    let Some(term) = request.free_text_term.as_deref() else {
        debug!("Nothing to resolve");
        return Ok(None);
    };

    let best = client.search(session, term).await?.into_iter().next();
    match &best {
        Some(hit) => debug!(sku = %hit.sku, "Resolved from catalog search"),
        None => debug!("No catalog match"),
    }
    Ok(best)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use reqwest::{Method, StatusCode};

    use super::*;
    use crate::magento::testing::{ScriptedTransport, test_config};

    const ADMIN_TOKEN: &str = "/rest/default/V1/integration/admin/token";
    const SEARCH: &str = "/rest/V1/search";
    const PRODUCTS: &str = "/rest/V1/products";

    fn backend(stage_one: &str, stage_two: &str) -> Arc<ScriptedTransport> {
        Arc::new(
            ScriptedTransport::new()
                .on(Method::POST, ADMIN_TOKEN, StatusCode::OK, "\"admin-token\"")
                .on(Method::GET, SEARCH, StatusCode::OK, stage_one)
                .on(Method::GET, PRODUCTS, StatusCode::OK, stage_two),
        )
    }

    async fn resolve(
        transport: &Arc<ScriptedTransport>,
        request: &ResolutionRequest,
    ) -> Result<Option<SearchResult>, MagentoError> {
        let client = MagentoClient::with_transport(&test_config(), Arc::clone(transport));
        resolve_sku(&client, &CommerceSession::new(), request).await
    }

    #[tokio::test]
    async fn test_structured_sku_short_circuits_search() {
        let transport = backend(r#"{"items": [{"id": 1}], "total_count": 1}"#, "{}");

        for request in [
            ResolutionRequest::from_parts(Some("MUG-BLU"), None, None),
            ResolutionRequest::from_parts(Some("MUG-BLU"), Some("blue mug"), Some("2")),
        ] {
            let result = resolve(&transport, &request).await.unwrap().unwrap();
            assert_eq!(result.sku.as_str(), "MUG-BLU");
        }

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_structured_display_name_prefers_spoken_term() {
        let transport = backend("{}", "{}");
        let request = ResolutionRequest::from_parts(Some("MUG-BLU"), Some("blue mug"), None);

        let result = resolve(&transport, &request).await.unwrap().unwrap();
        assert_eq!(result.display_name, "blue mug");

        let request = ResolutionRequest::from_parts(Some("MUG-BLU"), None, None);
        let result = resolve(&transport, &request).await.unwrap().unwrap();
        assert_eq!(result.display_name, "MUG-BLU");
    }

    #[tokio::test]
    async fn test_free_text_zero_matches_yields_none() {
        let transport = backend(r#"{"items": [], "total_count": 0}"#, "{}");
        let request = ResolutionRequest::from_parts(None, Some("xyzzy"), None);

        assert_eq!(resolve(&transport, &request).await.unwrap(), None);
        assert_eq!(transport.calls_to(SEARCH), 1);
    }

    #[tokio::test]
    async fn test_free_text_takes_first_result_only() {
        let transport = backend(
            r#"{"items": [{"id": 42}, {"id": 43}], "total_count": 2}"#,
            r#"{"items": [{"sku": "MUG-BLU", "name": "Blue Mug"}, {"sku": "MUG-RED", "name": "Red Mug"}]}"#,
        );
        let request = ResolutionRequest::from_parts(None, Some("mug"), None);

        let result = resolve(&transport, &request).await.unwrap().unwrap();
        assert_eq!(result.sku.as_str(), "MUG-BLU");
        assert_eq!(result.display_name, "Blue Mug");
    }

    #[tokio::test]
    async fn test_nothing_usable_yields_none_without_network() {
        let transport = backend("{}", "{}");

        for request in [
            ResolutionRequest::default(),
            ResolutionRequest::from_parts(Some(" "), Some("  "), Some("3")),
        ] {
            assert_eq!(resolve(&transport, &request).await.unwrap(), None);
        }
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_search_failure_propagates() {
        let transport = Arc::new(ScriptedTransport::new().on(
            Method::POST,
            ADMIN_TOKEN,
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom",
        ));
        let request = ResolutionRequest::from_parts(None, Some("mug"), None);

        let err = resolve(&transport, &request).await.unwrap_err();
        assert!(err.is_authentication_failure());
    }
}
