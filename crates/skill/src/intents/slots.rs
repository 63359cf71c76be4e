//! The structured input the dialogue platform sends for one user turn.
//!
//! Every level of the slot structure is optional. Extraction walks it with
//! `Option` combinators so a missing or partially filled structure reads as
//! "absent" instead of failing.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use voicecart_core::ResolutionRequest;

/// Slot holding the product words and their entity resolution.
pub const SEARCH_TERM_SLOT: &str = "SEARCHTERM";

/// Slot holding the spoken quantity.
pub const QUANTITY_SLOT: &str = "QUANTITY";

/// Entity resolution status meaning the value matched a catalog entry.
pub const RESOLUTION_MATCH: &str = "ER_SUCCESS_MATCH";

/// One user turn: an intent name plus its slot bag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    /// Dialogue session id, used to scope commerce credentials.
    #[serde(default, deserialize_with = "scalar")]
    pub session_id: Option<String>,
    /// Intent or request type name (e.g. `AddToCartByNameIntent`).
    pub name: String,
    /// Named slot values. A slot that is `null` or not an object is empty.
    #[serde(default, deserialize_with = "slot_map")]
    pub slots: HashMap<String, Slot>,
}

/// A named value extracted from speech.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Slot {
    /// The raw words the user said. Numbers are kept as their decimal text.
    #[serde(default, deserialize_with = "scalar")]
    pub value: Option<String>,
    /// Entity resolution against the language model's catalog.
    #[serde(default, deserialize_with = "lenient")]
    pub resolutions: Option<Resolutions>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolutions {
    #[serde(default, deserialize_with = "lenient")]
    pub resolutions_per_authority: Vec<Authority>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authority {
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<ResolutionStatus>,
    #[serde(default, deserialize_with = "lenient")]
    pub values: Vec<ResolutionValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolutionStatus {
    #[serde(default, deserialize_with = "scalar")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolutionValue {
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<ResolvedEntity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolvedEntity {
    #[serde(default, deserialize_with = "scalar")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar")]
    pub name: Option<String>,
}

/// Deserialize a nested level, reading `null` or a mistyped value as empty.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Deserialize a string or number as text; anything else is absent.
fn scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

/// Deserialize the slot bag one entry at a time so a broken slot does not
/// discard its neighbours.
fn slot_map<'de, D>(deserializer: D) -> Result<HashMap<String, Slot>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };
    Ok(entries
        .into_iter()
        .map(|(name, slot)| (name, Slot::deserialize(slot).unwrap_or_default()))
        .collect())
}

impl IntentRequest {
    /// Create a request with no slots.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a slot's raw value.
    #[must_use]
    pub fn with_slot_value(mut self, slot: &str, value: impl Into<String>) -> Self {
        self.slots.entry(slot.to_string()).or_default().value = Some(value.into());
        self
    }

    /// Attach a successful entity resolution to a slot.
    #[must_use]
    pub fn with_resolved_id(mut self, slot: &str, id: impl Into<String>) -> Self {
        self.slots.entry(slot.to_string()).or_default().resolutions = Some(Resolutions {
            resolutions_per_authority: vec![Authority {
                status: Some(ResolutionStatus {
                    code: Some(RESOLUTION_MATCH.to_string()),
                }),
                values: vec![ResolutionValue {
                    value: Some(ResolvedEntity {
                        id: Some(id.into()),
                        name: None,
                    }),
                }],
            }],
        });
        self
    }

    fn slot_value(&self, slot: &str) -> Option<&str> {
        self.slots.get(slot)?.value.as_deref()
    }

    /// The words the user said for the product, if any.
    #[must_use]
    pub fn product_utterance(&self) -> Option<&str> {
        self.slot_value(SEARCH_TERM_SLOT)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// The SKU the slot resolution matched, if it matched.
    ///
    /// Only the first value of the first authority is considered, and only
    /// when that authority reports a match (or reports no status at all).
    #[must_use]
    pub fn resolved_sku(&self) -> Option<&str> {
        let authority = self
            .slots
            .get(SEARCH_TERM_SLOT)?
            .resolutions
            .as_ref()?
            .resolutions_per_authority
            .first()?;

        let matched = authority
            .status
            .as_ref()
            .and_then(|s| s.code.as_deref())
            .is_none_or(|code| code == RESOLUTION_MATCH);
        if !matched {
            return None;
        }

        authority
            .values
            .first()?
            .value
            .as_ref()?
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Build the resolver input for this turn.
    #[must_use]
    pub fn resolution_request(&self) -> ResolutionRequest {
        ResolutionRequest::from_parts(
            self.resolved_sku(),
            self.product_utterance(),
            self.slot_value(QUANTITY_SLOT),
        )
    }
}
