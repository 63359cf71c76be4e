//! Integration tests for Voice Cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p voicecart-integration-tests
//! ```
//!
//! No external services are needed. [`FakeMagento`] serves the handful of
//! Magento REST endpoints the skill uses on an ephemeral local port, so the
//! real `reqwest` transport is exercised end to end.
//!
//! # Test Categories
//!
//! - `magento_session` - Credential caching, quoting and cart flows
//! - `skill_service` - The skill's HTTP surface over real sockets

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use voicecart_skill::config::{AccountCredentials, MagentoConfig};

pub const CUSTOMER_USERNAME: &str = "shopper@example.com";
pub const CUSTOMER_PASSWORD: &str = "customer-pass";
pub const ADMIN_USERNAME: &str = "integration";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// Token the fake issues to the customer account.
pub const CUSTOMER_TOKEN: &str = "abc123";
/// Token the fake issues to the admin account.
pub const ADMIN_TOKEN: &str = "admin-xyz";
/// Cart id the fake hands out.
pub const CART_ID: &str = "17";

const SEARCH_VALUE_KEY: &str = "searchCriteria[filter_groups][0][filters][0][value]";

/// One sellable product.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: i64,
    pub sku: &'static str,
    pub name: &'static str,
}

/// The default catalog.
#[must_use]
pub fn catalog() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry {
            id: 42,
            sku: "MUG-BLU",
            name: "Blue Mug",
        },
        CatalogEntry {
            id: 43,
            sku: "MUG-RED",
            name: "Red Mug",
        },
        CatalogEntry {
            id: 77,
            sku: "TEA-EARL",
            name: "Earl Grey Tea",
        },
    ]
}

/// Endpoint names used for call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CustomerToken,
    AdminToken,
    Cart,
    CartItems,
    Search,
    Products,
}

#[derive(Default)]
struct Recorder {
    calls: HashMap<Endpoint, usize>,
    authorization: Vec<(Endpoint, String)>,
    cart_items: Vec<Value>,
}

struct FakeState {
    catalog: Vec<CatalogEntry>,
    recorder: Mutex<Recorder>,
    reject_customer_token: Mutex<bool>,
}

impl FakeState {
    fn record(&self, endpoint: Endpoint, headers: &HeaderMap) {
        let mut recorder = self.recorder.lock().unwrap();
        *recorder.calls.entry(endpoint).or_default() += 1;
        if let Some(value) = headers.get(AUTHORIZATION) {
            let value = value.to_str().unwrap_or_default().to_string();
            recorder.authorization.push((endpoint, value));
        }
    }

    fn authorized(&self, headers: &HeaderMap, token: &str) -> bool {
        if token == CUSTOMER_TOKEN && *self.reject_customer_token.lock().unwrap() {
            return false;
        }
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {token}"))
    }
}

/// A Magento stand-in listening on `127.0.0.1`.
pub struct FakeMagento {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeMagento {
    /// Start a fake serving the default [`catalog`].
    pub async fn start() -> Self {
        Self::with_catalog(catalog()).await
    }

    /// Start a fake serving `catalog`.
    pub async fn with_catalog(catalog: Vec<CatalogEntry>) -> Self {
        let state = Arc::new(FakeState {
            catalog,
            recorder: Mutex::new(Recorder::default()),
            reject_customer_token: Mutex::new(false),
        });

        let app = Router::new()
            .route(
                "/rest/default/V1/integration/customer/token",
                post(customer_token),
            )
            .route("/rest/default/V1/integration/admin/token", post(admin_token))
            .route("/rest/V1/carts/mine", post(cart))
            .route("/rest/V1/carts/mine/items", post(cart_items))
            .route("/rest/V1/search", get(search))
            .route("/rest/V1/products", get(products))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Origin to use as `MAGENTO_BASE_URL`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Client configuration pointing at this fake.
    #[must_use]
    pub fn config(&self) -> MagentoConfig {
        MagentoConfig::new(
            &self.base_url(),
            AccountCredentials::new(CUSTOMER_USERNAME, CUSTOMER_PASSWORD),
            AccountCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// How many requests reached `endpoint`.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.state
            .recorder
            .lock()
            .unwrap()
            .calls
            .get(&endpoint)
            .copied()
            .unwrap_or(0)
    }

    /// `Authorization` headers received by `endpoint`, in order.
    #[must_use]
    pub fn authorization_headers(&self, endpoint: Endpoint) -> Vec<String> {
        self.state
            .recorder
            .lock()
            .unwrap()
            .authorization
            .iter()
            .filter(|(e, _)| *e == endpoint)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// `cart_item` bodies accepted so far.
    #[must_use]
    pub fn cart_items(&self) -> Vec<Value> {
        self.state.recorder.lock().unwrap().cart_items.clone()
    }

    /// Make every bearer call with the customer token answer 401, as if
    /// the token had expired.
    pub fn expire_customer_token(&self, expired: bool) {
        *self.state.reject_customer_token.lock().unwrap() = expired;
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct Login {
    username: String,
    password: String,
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "The consumer isn't authorized to access %resources."})),
    )
        .into_response()
}

async fn customer_token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(login): Json<Login>,
) -> Response {
    state.record(Endpoint::CustomerToken, &headers);
    if login.username != CUSTOMER_USERNAME || login.password != CUSTOMER_PASSWORD {
        return unauthorized();
    }
    // Magento answers with a JSON string, quotes included.
    Json(CUSTOMER_TOKEN).into_response()
}

async fn admin_token(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(login): Json<Login>,
) -> Response {
    state.record(Endpoint::AdminToken, &headers);
    if login.username != ADMIN_USERNAME || login.password != ADMIN_PASSWORD {
        return unauthorized();
    }
    Json(ADMIN_TOKEN).into_response()
}

async fn cart(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record(Endpoint::Cart, &headers);
    if !state.authorized(&headers, CUSTOMER_TOKEN) {
        return unauthorized();
    }
    Json(CART_ID).into_response()
}

#[derive(Deserialize)]
struct AddItem {
    cart_item: Value,
}

async fn cart_items(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Json(body): Json<AddItem>,
) -> Response {
    state.record(Endpoint::CartItems, &headers);
    if !state.authorized(&headers, CUSTOMER_TOKEN) {
        return unauthorized();
    }

    let sku = body.cart_item["sku"].as_str().unwrap_or_default().to_string();
    let Some(entry) = state.catalog.iter().find(|e| e.sku == sku) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "The product that was requested doesn't exist."})),
        )
            .into_response();
    };

    let qty = body.cart_item["qty"].clone();
    state
        .recorder
        .lock()
        .unwrap()
        .cart_items
        .push(body.cart_item);

    Json(json!({
        "item_id": 1,
        "sku": entry.sku,
        "name": entry.name,
        "qty": qty,
        "quote_id": CART_ID,
    }))
    .into_response()
}

async fn search(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record(Endpoint::Search, &headers);
    if !state.authorized(&headers, ADMIN_TOKEN) {
        return unauthorized();
    }

    let term = params
        .get(SEARCH_VALUE_KEY)
        .map(|v| v.trim_matches('%').to_lowercase())
        .unwrap_or_default();
    let hits: Vec<Value> = state
        .catalog
        .iter()
        .filter(|e| !term.is_empty() && e.name.to_lowercase().contains(&term))
        .map(|e| json!({"id": e.id, "score": 1.0}))
        .collect();

    Json(json!({
        "items": hits.iter().take(1).collect::<Vec<_>>(),
        "search_criteria": {"request_name": "quick_search_container"},
        "total_count": hits.len(),
    }))
    .into_response()
}

async fn products(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record(Endpoint::Products, &headers);
    if !state.authorized(&headers, ADMIN_TOKEN) {
        return unauthorized();
    }

    let id = params
        .get(SEARCH_VALUE_KEY)
        .and_then(|v| v.parse::<i64>().ok());
    let items: Vec<Value> = state
        .catalog
        .iter()
        .filter(|e| Some(e.id) == id)
        .map(|e| json!({"id": e.id, "sku": e.sku, "name": e.name, "type_id": "simple"}))
        .collect();

    Json(json!({"total_count": items.len(), "items": items})).into_response()
}
