//! Magento REST client implementation.

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use voicecart_core::{CartAdditionResult, CartId, Quantity, SearchResult, Sku};

use super::queries::{
    CART_ITEMS_PATH, CART_PATH, product_by_id_path, quick_search_path, token_path,
};
use super::session::CommerceSession;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use super::types::{
    AddCartItemRequest, CartItemInput, CartItemResponse, ProductListResponse,
    QuickSearchResponse, TokenRequest,
};
use super::{MagentoError, TokenRole, body_snippet, sanitize_response};
use crate::config::{AccountCredentials, MagentoConfig};

// =============================================================================
// MagentoClient
// =============================================================================

/// Client for the Magento REST API.
///
/// Stateless apart from configuration: all credentials live on the
/// [`CommerceSession`] passed to each call.
pub struct MagentoClient<T = ReqwestTransport> {
    inner: Arc<MagentoClientInner<T>>,
}

struct MagentoClientInner<T> {
    transport: T,
    base_url: String,
    customer: AccountCredentials,
    admin: AccountCredentials,
}

impl<T> Clone for MagentoClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl MagentoClient<ReqwestTransport> {
    /// Create a client using `reqwest` with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `MagentoError::Http` if the HTTP client cannot be built.
    pub fn new(config: &MagentoConfig) -> Result<Self, MagentoError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> MagentoClient<T> {
    /// Create a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(config: &MagentoConfig, transport: T) -> Self {
        Self {
            inner: Arc::new(MagentoClientInner {
                transport,
                base_url: config.base_url.clone(),
                customer: config.customer.clone(),
                admin: config.admin.clone(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    fn account(&self, role: TokenRole) -> &AccountCredentials {
        match role {
            TokenRole::Customer => &self.inner.customer,
            TokenRole::Admin => &self.inner.admin,
        }
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add `quantity` of `sku` to the session's active cart.
    ///
    /// Authenticates the customer and acquires the cart first when the
    /// session does not hold them yet.
    ///
    /// # Errors
    ///
    /// Returns `MagentoError::AuthenticationFailed` if the customer token
    /// cannot be issued, `MagentoError::Unauthorized` if a cached token was
    /// rejected, and any transport, status or parse error from the calls.
    #[instrument(skip(self, session), fields(sku = %sku, quantity = %quantity))]
    pub async fn add_item(
        &self,
        session: &CommerceSession,
        sku: &Sku,
        quantity: Quantity,
    ) -> Result<CartAdditionResult, MagentoError> {
        let (token, cart_id) = self.ensure_customer_cart(session).await?;

        let body = serde_json::to_value(AddCartItemRequest {
            cart_item: CartItemInput {
                quote_id: cart_id.as_str(),
                sku: sku.as_str(),
                qty: quantity.get(),
            },
        })?;
        let request = HttpRequest::post(self.url(CART_ITEMS_PATH))
            .with_bearer(&token)
            .with_json(body);

        let response = self
            .send_authorized(session, TokenRole::Customer, request)
            .await?;
        let item: CartItemResponse = parse_json(&response)?;
        let result = item.into_result(quantity, sku);

        debug!(name = %result.name, quantity = %result.quantity, "Cart item added");
        Ok(result)
    }

    /// Make sure the session holds a customer token and a cart id.
    async fn ensure_customer_cart(
        &self,
        session: &CommerceSession,
    ) -> Result<(SecretString, CartId), MagentoError> {
        // Held across the prerequisite requests so one session never
        // authenticates twice concurrently.
        let mut credentials = session.lock().await;

        let token = if let Some(token) = &credentials.customer_token {
            token.clone()
        } else {
            let token = self.issue_token(TokenRole::Customer).await?;
            credentials.customer_token = Some(token.clone());
            token
        };

        let cart_id = if let Some(cart_id) = &credentials.cart_id {
            cart_id.clone()
        } else {
            match self.acquire_cart(&token).await {
                Ok(cart_id) => {
                    credentials.cart_id = Some(cart_id.clone());
                    cart_id
                }
                Err(err) => {
                    if matches!(err, MagentoError::Unauthorized { .. }) {
                        credentials.forget(TokenRole::Customer);
                    }
                    return Err(err);
                }
            }
        };

        Ok((token, cart_id))
    }

    /// Fetch or create the customer's active cart.
    #[instrument(skip_all)]
    async fn acquire_cart(&self, token: &SecretString) -> Result<CartId, MagentoError> {
        let request = HttpRequest::post(self.url(CART_PATH)).with_bearer(token);
        let response = self.inner.transport.send(request).await?;
        check_status(&response, TokenRole::Customer)?;

        let cart_id = sanitize_response(&response.body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_snippet(&response.body),
                "Unusable cart id body"
            );
            MagentoError::Parse(e)
        })?;
        let cart_id = CartId::new(cart_id).ok_or(MagentoError::EmptyValue("cart id"))?;
        debug!(cart_id = %cart_id, "Cart acquired");
        Ok(cart_id)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Search the catalog for `term`.
    ///
    /// Runs the quick search for ranked product ids, then fetches the full
    /// record of the best-ranked id. Both stages are limited to one result,
    /// so the returned list holds at most the single best match. No match is
    /// an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `MagentoError::AuthenticationFailed` if the admin token
    /// cannot be issued, `MagentoError::Unauthorized` if a cached token was
    /// rejected, and any transport, status or parse error from the calls.
    #[instrument(skip(self, session), fields(term = %term))]
    pub async fn search(
        &self,
        session: &CommerceSession,
        term: &str,
    ) -> Result<Vec<SearchResult>, MagentoError> {
        let token = self.ensure_admin_token(session).await?;

        let request = HttpRequest::get(self.url(&quick_search_path(term))).with_bearer(&token);
        let response = self
            .send_authorized(session, TokenRole::Admin, request)
            .await?;
        let hits: QuickSearchResponse = parse_json(&response)?;

        let Some(product_id) = hits.top_hit() else {
            debug!(total_count = hits.total_count, "No catalog match");
            return Ok(Vec::new());
        };

        let request =
            HttpRequest::get(self.url(&product_by_id_path(product_id))).with_bearer(&token);
        let response = self
            .send_authorized(session, TokenRole::Admin, request)
            .await?;
        let products: ProductListResponse = parse_json(&response)?;

        let results: Vec<SearchResult> = products
            .items
            .into_iter()
            .filter_map(|record| record.into_search_result())
            .collect();
        debug!(product_id = %product_id, results = results.len(), "Catalog search finished");
        Ok(results)
    }

    /// Make sure the session holds an admin token.
    async fn ensure_admin_token(
        &self,
        session: &CommerceSession,
    ) -> Result<SecretString, MagentoError> {
        let mut credentials = session.lock().await;
        if let Some(token) = &credentials.admin_token {
            return Ok(token.clone());
        }
        let token = self.issue_token(TokenRole::Admin).await?;
        credentials.admin_token = Some(token.clone());
        Ok(token)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Exchange the configured username and password for a bearer token.
    ///
    /// Every failure, including transport errors, is reported as
    /// `MagentoError::AuthenticationFailed`.
    #[instrument(skip(self), fields(username = %self.account(role).username))]
    async fn issue_token(&self, role: TokenRole) -> Result<SecretString, MagentoError> {
        let account = self.account(role);
        let failed = |reason: String| MagentoError::AuthenticationFailed { role, reason };

        let body = serde_json::to_value(TokenRequest {
            username: &account.username,
            password: account.password.expose_secret(),
        })?;
        let request = HttpRequest::post(self.url(&token_path(role))).with_json(body);

        let response = self
            .inner
            .transport
            .send(request)
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status.is_success() {
            tracing::warn!(status = %response.status, "Token request rejected");
            return Err(failed(format!(
                "HTTP {}: {}",
                response.status,
                body_snippet(&response.body)
            )));
        }

        let token = sanitize_response(&response.body).map_err(|_| {
            tracing::warn!(body = %body_snippet(&response.body), "Unusable token body");
            failed(format!("unusable token body: {}", body_snippet(&response.body)))
        })?;
        if token.is_empty() {
            return Err(failed("empty token".to_string()));
        }

        debug!("Token issued");
        Ok(SecretString::from(token))
    }

    /// Send a bearer-authenticated request.
    ///
    /// A 401 clears the role's credentials from the session so the next
    /// call starts from scratch, unless another call already replaced the
    /// rejected token.
    async fn send_authorized(
        &self,
        session: &CommerceSession,
        role: TokenRole,
        request: HttpRequest,
    ) -> Result<HttpResponse, MagentoError> {
        let sent = request.bearer.clone();
        let response = self.inner.transport.send(request).await?;
        if let Err(err) = check_status(&response, role) {
            if let (MagentoError::Unauthorized { .. }, Some(sent)) = (&err, &sent) {
                let cleared = session.invalidate(role, sent).await;
                tracing::warn!(role = %role, cleared, "Bearer token rejected");
            }
            return Err(err);
        }
        Ok(response)
    }
}

/// Map non-success statuses to errors.
fn check_status(response: &HttpResponse, role: TokenRole) -> Result<(), MagentoError> {
    if response.status == StatusCode::UNAUTHORIZED {
        return Err(MagentoError::Unauthorized { role });
    }
    if !response.status.is_success() {
        tracing::error!(
            status = %response.status,
            body = %body_snippet(&response.body),
            "Magento API returned non-success status"
        );
        return Err(MagentoError::Status {
            status: response.status,
            body: body_snippet(&response.body),
        });
    }
    Ok(())
}

/// Parse a JSON response body, logging the body on failure.
fn parse_json<R: DeserializeOwned>(response: &HttpResponse) -> Result<R, MagentoError> {
    serde_json::from_str(&response.body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %body_snippet(&response.body),
            "Failed to parse Magento response"
        );
        MagentoError::Parse(e)
    })
}
