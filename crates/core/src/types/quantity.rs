//! Cart line quantity type.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The input is not a base-10 integer.
    #[error("quantity must be a whole number, got {0:?}")]
    NotANumber(String),
    /// The input is zero or negative.
    #[error("quantity must be at least 1")]
    NotPositive,
}

/// A strictly positive item count for a cart line.
///
/// Spoken quantities arrive as optional strings; [`Quantity::from_slot`]
/// turns anything unusable into the default of one item.
///
/// ```
/// use voicecart_core::Quantity;
///
/// assert_eq!(Quantity::from_slot(Some("3")).get(), 3);
/// assert_eq!(Quantity::from_slot(Some("a few")).get(), 1);
/// assert_eq!(Quantity::from_slot(None).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single item.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        match NonZeroU32::new(value) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Parse a quantity from text.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotANumber`] if the trimmed input is not an
    /// integer and [`QuantityError::NotPositive`] if it is zero or negative.
    pub fn parse(s: &str) -> Result<Self, QuantityError> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| QuantityError::NotANumber(trimmed.to_owned()))?;
        u32::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(QuantityError::NotPositive)
    }

    /// Coerce an optional slot value into a quantity, defaulting to one.
    #[must_use]
    pub fn from_slot(value: Option<&str>) -> Self {
        value
            .and_then(|v| Self::parse(v).ok())
            .unwrap_or_default()
    }

    /// Get the underlying count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_slot_numeric() {
        assert_eq!(Quantity::from_slot(Some("3")).get(), 3);
        assert_eq!(Quantity::from_slot(Some(" 12 ")).get(), 12);
    }

    #[test]
    fn test_from_slot_defaults_to_one() {
        assert_eq!(Quantity::from_slot(None), Quantity::ONE);
        assert_eq!(Quantity::from_slot(Some("")), Quantity::ONE);
        assert_eq!(Quantity::from_slot(Some("?")), Quantity::ONE);
        assert_eq!(Quantity::from_slot(Some("0")), Quantity::ONE);
        assert_eq!(Quantity::from_slot(Some("-4")), Quantity::ONE);
        assert_eq!(Quantity::from_slot(Some("2.5")), Quantity::ONE);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Quantity::parse("many"),
            Err(QuantityError::NotANumber("many".to_string()))
        );
        assert_eq!(Quantity::parse("0"), Err(QuantityError::NotPositive));
        assert_eq!(Quantity::parse("-1"), Err(QuantityError::NotPositive));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&Quantity::from_slot(Some("7"))).ok();
        assert_eq!(json.as_deref(), Some("7"));
    }
}
