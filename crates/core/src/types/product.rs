//! Records exchanged between the resolver, the session manager and callers.

use serde::{Deserialize, Serialize};

use super::{Quantity, Sku};

/// The structured input for one add-to-cart turn.
///
/// Either identifier may be absent. A request with neither a structured SKU
/// nor a usable free-text term resolves to "not found" rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// SKU matched by the language model's slot resolution, if it matched.
    pub structured_sku: Option<Sku>,
    /// The raw words the user said for the product.
    pub free_text_term: Option<String>,
    /// Number of items to add.
    #[serde(default)]
    pub quantity: Quantity,
}

impl ResolutionRequest {
    /// Build a request from raw slot values.
    ///
    /// Blank or malformed values are treated as absent.
    #[must_use]
    pub fn from_parts(
        structured_sku: Option<&str>,
        free_text_term: Option<&str>,
        quantity: Option<&str>,
    ) -> Self {
        Self {
            structured_sku: structured_sku.and_then(|s| Sku::parse(s).ok()),
            free_text_term: free_text_term
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
            quantity: Quantity::from_slot(quantity),
        }
    }

    /// The spoken term, or an empty string when none was captured.
    #[must_use]
    pub fn spoken_term(&self) -> &str {
        self.free_text_term.as_deref().unwrap_or("")
    }
}

/// A product resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Catalog-unique identifier.
    pub sku: Sku,
    /// Human readable product name.
    pub display_name: String,
}

/// Confirmation of a successful cart line addition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartAdditionResult {
    /// Product name as reported by the backend.
    pub name: String,
    /// Quantity the backend reports as added.
    pub quantity: Quantity,
}
