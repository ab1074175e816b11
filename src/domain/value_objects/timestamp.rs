//! # Timestamp Value Object
//!
//! UTC point in time used to stamp market quotes and recommendations.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::domain::value_objects::timestamp::Timestamp;
//!
//! let quoted_at = Timestamp::from_secs(1_704_067_200).unwrap();
//! let now = quoted_at.add_secs(90);
//!
//! assert_eq!(quoted_at.age_secs_at(&now), 90);
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observation or calculation time, serialized as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Unix seconds, `None` if out of range.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Unix seconds.
    #[inline]
    #[must_use]
    pub fn unix_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Shifted forward by `secs`.
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Shifted back by `secs`.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Whole seconds elapsed between this timestamp and `now`.
    ///
    /// A timestamp ahead of `now` (clock skew at the source) has age zero.
    #[must_use]
    pub fn age_secs_at(&self, now: &Self) -> u64 {
        u64::try_from((now.0 - self.0).num_seconds()).unwrap_or(0)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}
