//! # Commodity Identifier
//!
//! Normalised identifier of the commodity being hedged.
//!
//! Identifiers are case-insensitive and stored lowercase, so `"Wheat"` and
//! `"wheat"` name the same commodity. Whether a commodity is *supported* is a
//! configuration question answered by the floor calculator, not by this type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Commodity used when a request does not name one.
pub const DEFAULT_COMMODITY: &str = "wheat";

/// Error returned for malformed commodity identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommodityError {
    /// The identifier is empty or only whitespace.
    #[error("commodity identifier must not be empty")]
    Empty,
    /// The identifier contains characters outside `[a-z0-9_-]`.
    #[error("commodity identifier '{0}' contains invalid characters")]
    InvalidCharacters(String),
}

/// A lowercase commodity identifier such as `wheat` or `corn`.
///
/// # Examples
///
/// ```
/// use hedgefarm_pricer::domain::value_objects::commodity::Commodity;
///
/// let wheat = Commodity::new(" Wheat ").unwrap();
/// assert_eq!(wheat.as_str(), "wheat");
/// assert!(Commodity::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Commodity(String);

impl Commodity {
    /// Creates a commodity identifier, trimming and lowercasing the input.
    ///
    /// # Errors
    ///
    /// Returns `CommodityError` if the identifier is empty or contains
    /// characters other than ASCII letters, digits, `_` and `-`.
    pub fn new(id: impl AsRef<str>) -> Result<Self, CommodityError> {
        let normalised = id.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CommodityError::Empty);
        }
        if !normalised
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CommodityError::InvalidCharacters(normalised));
        }
        Ok(Self(normalised))
    }

    /// Returns the default commodity (`wheat`).
    #[must_use]
    pub fn wheat() -> Self {
        Self(DEFAULT_COMMODITY.to_string())
    }

    /// Returns the identifier.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Commodity {
    type Err = CommodityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Commodity {
    type Error = CommodityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Commodity> for String {
    fn from(value: Commodity) -> Self {
        value.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalises_case_and_whitespace() {
        let c = Commodity::new("  CORN ").unwrap();
        assert_eq!(c.as_str(), "corn");
        assert_eq!(c, Commodity::new("corn").unwrap());
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Commodity::new("   "), Err(CommodityError::Empty));
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            Commodity::new("wheat; drop"),
            Err(CommodityError::InvalidCharacters(_))
        ));
    }

    #[test]
    fn default_is_wheat() {
        assert_eq!(Commodity::wheat().as_str(), DEFAULT_COMMODITY);
    }

    #[test]
    fn serde_validates() {
        let c: Commodity = serde_json::from_str("\"Barley\"").unwrap();
        assert_eq!(c.as_str(), "barley");
        assert!(serde_json::from_str::<Commodity>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"barley\"");
    }
}
