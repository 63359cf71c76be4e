//! Stock keeping unit type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkuError {
    /// The input is empty or whitespace only.
    #[error("sku cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("sku must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A catalog-unique stock keeping unit.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-64 characters (Magento's `sku` column limit)
///
/// ## Examples
///
/// ```
/// use voicecart_core::Sku;
///
/// assert_eq!(Sku::parse(" MUG-BLU ").map(|s| s.to_string()), Ok("MUG-BLU".to_string()));
/// assert!(Sku::parse("").is_err());
/// assert!(Sku::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl Sku {
    /// Maximum length of a SKU.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Sku` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty or longer than
    /// [`Sku::MAX_LENGTH`] characters.
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SkuError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = SkuError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sku> for String {
    fn from(sku: Sku) -> Self {
        sku.0
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let sku = Sku::parse("  24-MB01\t").unwrap();
        assert_eq!(sku.as_str(), "24-MB01");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Sku::parse(""), Err(SkuError::Empty));
        assert_eq!(Sku::parse(" \n "), Err(SkuError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let long = "X".repeat(Sku::MAX_LENGTH + 1);
        assert_eq!(
            Sku::parse(&long),
            Err(SkuError::TooLong {
                max: Sku::MAX_LENGTH
            })
        );
        assert!(Sku::parse(&"X".repeat(Sku::MAX_LENGTH)).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let sku: Sku = serde_json::from_str("\"MUG-BLU\"").unwrap();
        assert_eq!(sku.as_str(), "MUG-BLU");
        assert!(serde_json::from_str::<Sku>("\"\"").is_err());
    }
}
