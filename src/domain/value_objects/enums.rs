//! # Domain Enums
//!
//! - [`HedgeInstrument`] - The three hedging instruments a floor can be quoted for

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hedging instrument a floor price is computed for.
///
/// The discriminant is the canonical position of the instrument in every
/// floor sequence the engine produces: Futures, Put, Forward.
///
/// # Examples
///
/// ```
/// use hedgefarm_pricer::domain::value_objects::enums::HedgeInstrument;
///
/// assert_eq!(HedgeInstrument::Put.to_string(), "put");
/// assert_eq!(HedgeInstrument::Futures.canonical_index(), 0);
/// assert_eq!("forward".parse::<HedgeInstrument>().unwrap(), HedgeInstrument::Forward);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum HedgeInstrument {
    /// Exchange-traded futures contract.
    Futures = 0,
    /// Protective put option.
    Put = 1,
    /// Bilateral forward contract.
    Forward = 2,
}

impl HedgeInstrument {
    /// All instruments in canonical order.
    pub const CANONICAL_ORDER: [Self; 3] = [Self::Futures, Self::Put, Self::Forward];

    /// Returns the position of this instrument in the canonical order.
    #[inline]
    #[must_use]
    pub const fn canonical_index(self) -> usize {
        self as usize
    }

    /// Returns the tie-break preference of this instrument (lower is preferred).
    ///
    /// Forwards carry no margin-call liquidity risk for the producer, so they
    /// win ties, followed by futures, then puts.
    #[inline]
    #[must_use]
    pub const fn tie_break_preference(self) -> u8 {
        match self {
            Self::Forward => 0,
            Self::Futures => 1,
            Self::Put => 2,
        }
    }

    /// Returns true if holding this instrument exposes the producer to margin calls.
    #[inline]
    #[must_use]
    pub const fn requires_margin(self) -> bool {
        matches!(self, Self::Futures)
    }

    /// Returns the wire name used by the consumer contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Futures => "futures",
            Self::Put => "put",
            Self::Forward => "forward",
        }
    }
}

impl fmt::Display for HedgeInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HedgeInstrument {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "futures" | "future" => Ok(Self::Futures),
            "put" | "put_option" => Ok(Self::Put),
            "forward" => Ok(Self::Forward),
            _ => Err(ParseEnumError::InvalidValue(
                "HedgeInstrument",
                s.to_string(),
            )),
        }
    }
}

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEnumError {
    /// The string does not name a known variant.
    #[error("invalid {0} value: '{1}'")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod hedge_instrument {
        use super::*;

        #[test]
        fn canonical_order_matches_discriminants() {
            for (i, instrument) in HedgeInstrument::CANONICAL_ORDER.iter().enumerate() {
                assert_eq!(instrument.canonical_index(), i);
            }
        }

        #[test]
        fn tie_break_prefers_forward_then_futures_then_put() {
            assert!(
                HedgeInstrument::Forward.tie_break_preference()
                    < HedgeInstrument::Futures.tie_break_preference()
            );
            assert!(
                HedgeInstrument::Futures.tie_break_preference()
                    < HedgeInstrument::Put.tie_break_preference()
            );
        }

        #[test]
        fn only_futures_require_margin() {
            assert!(HedgeInstrument::Futures.requires_margin());
            assert!(!HedgeInstrument::Put.requires_margin());
            assert!(!HedgeInstrument::Forward.requires_margin());
        }

        #[test]
        fn from_str_accepts_aliases() {
            assert_eq!(
                "FUTURES".parse::<HedgeInstrument>().unwrap(),
                HedgeInstrument::Futures
            );
            assert_eq!(
                "put_option".parse::<HedgeInstrument>().unwrap(),
                HedgeInstrument::Put
            );
            assert!("swap".parse::<HedgeInstrument>().is_err());
        }

        #[test]
        fn serde_uses_wire_names() {
            let json = serde_json::to_string(&HedgeInstrument::Forward).unwrap();
            assert_eq!(json, "\"forward\"");
            let back: HedgeInstrument = serde_json::from_str("\"futures\"").unwrap();
            assert_eq!(back, HedgeInstrument::Futures);
        }
    }

    mod parse_enum_error {
        use super::*;

        #[test]
        fn display_format() {
            let err = ParseEnumError::InvalidValue("HedgeInstrument", "swap".to_string());
            assert_eq!(err.to_string(), "invalid HedgeInstrument value: 'swap'");
        }
    }
}
