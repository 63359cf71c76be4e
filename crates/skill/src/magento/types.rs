//! Request and response bodies of the Magento REST endpoints.

use serde::{Deserialize, Serialize};
use voicecart_core::{CartAdditionResult, ProductId, Quantity, SearchResult, Sku};

/// Body of the token issue endpoints.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body of `POST carts/mine/items`.
#[derive(Debug, Serialize)]
pub struct AddCartItemRequest<'a> {
    pub cart_item: CartItemInput<'a>,
}

/// The line item being added.
#[derive(Debug, Serialize)]
pub struct CartItemInput<'a> {
    pub quote_id: &'a str,
    pub sku: &'a str,
    pub qty: u32,
}

/// Bare scalar body of the token and cart endpoints.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ScalarBody {
    Text(String),
    Number(serde_json::Number),
}

/// Line item echoed back by `POST carts/mine/items`.
#[derive(Debug, Deserialize)]
pub struct CartItemResponse {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qty: Option<serde_json::Number>,
}

impl CartItemResponse {
    /// Convert to the caller-facing record.
    ///
    /// Magento reports `qty` as a JSON number that may carry a fractional
    /// part (`1.0`). When it is missing or not a positive whole number the
    /// requested quantity is echoed instead; a missing name falls back to the
    /// SKU.
    #[must_use]
    pub fn into_result(self, requested: Quantity, sku: &Sku) -> CartAdditionResult {
        let quantity = self
            .qty
            .as_ref()
            .and_then(whole_quantity)
            .unwrap_or(requested);
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .or(self.sku)
            .unwrap_or_else(|| sku.to_string());
        CartAdditionResult { name, quantity }
    }
}

fn whole_quantity(number: &serde_json::Number) -> Option<Quantity> {
    if let Some(n) = number.as_u64() {
        return u32::try_from(n).ok().and_then(Quantity::new);
    }
    let f = number.as_f64()?;
    if f.fract() != 0.0 || f < 1.0 || f > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked above
    let whole = f as u32;
    Quantity::new(whole)
}

/// Response of the quick search endpoint (stage one).
#[derive(Debug, Deserialize)]
pub struct QuickSearchResponse {
    #[serde(default)]
    pub items: Vec<QuickSearchHit>,
    #[serde(default)]
    pub total_count: u64,
}

/// One ranked match from the quick search.
#[derive(Debug, Deserialize)]
pub struct QuickSearchHit {
    pub id: ProductId,
}

impl QuickSearchResponse {
    /// The best-ranked product id, if the backend reported any match.
    #[must_use]
    pub fn top_hit(&self) -> Option<ProductId> {
        if self.total_count == 0 {
            return None;
        }
        self.items.first().map(|hit| hit.id)
    }
}

/// Response of the product list endpoint (stage two).
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    #[serde(default)]
    pub items: Vec<ProductRecord>,
}

/// A catalog product record; only the fields the skill needs.
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    pub sku: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProductRecord {
    /// Convert to a search result, skipping records with a blank SKU.
    #[must_use]
    pub fn into_search_result(self) -> Option<SearchResult> {
        let sku = Sku::parse(&self.sku).ok()?;
        let display_name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| sku.to_string());
        Some(SearchResult { sku, display_name })
    }
}
