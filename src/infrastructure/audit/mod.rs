//! # Audit
//!
//! Extension point for forwarding completed recommendations to an audit
//! store for later reconciliation.
//!
//! The pricer never embeds a storage mechanism. It calls
//! [`AuditSink::record`] once per completed recommendation; any
//! `Fn(&AuditRecord) + Send + Sync` closure is a valid sink.
//!
//! # Examples
//!
//! ```
//! use hedgefarm_pricer::infrastructure::audit::{AuditRecord, AuditSink};
//! use std::sync::Arc;
//!
//! let sink: Arc<dyn AuditSink> = Arc::new(|record: &AuditRecord| {
//!     println!("{} -> {}", record.commodity, record.recommended);
//! });
//! # let _ = sink;
//! ```

use crate::domain::entities::HedgeRecommendation;
use crate::domain::value_objects::{Commodity, HedgeInstrument, Price, Timestamp};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One floor as recorded for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditFloor {
    /// Instrument priced.
    pub instrument: HedgeInstrument,
    /// Floor per tonne, `None` if unavailable.
    pub floor: Option<Price>,
}

/// Inputs and outcome of one completed recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    /// Unique record identifier.
    pub id: Uuid,
    /// Commodity requested.
    pub commodity: Commodity,
    /// Volume requested in tonnes.
    pub volume_tonnes: Decimal,
    /// Hedge term in months.
    pub term_months: u8,
    /// Floors in canonical order.
    pub floors: Vec<AuditFloor>,
    /// Recommended instrument.
    pub recommended: HedgeInstrument,
    /// When the market data was observed.
    pub quoted_at: Timestamp,
    /// When the recommendation was calculated.
    pub calculated_at: Timestamp,
}

impl AuditRecord {
    /// Builds the audit record for a recommendation.
    #[must_use]
    pub fn from_recommendation(recommendation: &HedgeRecommendation) -> Self {
        Self {
            id: Uuid::new_v4(),
            commodity: recommendation.commodity().clone(),
            volume_tonnes: recommendation.volume().get(),
            term_months: recommendation.term_months(),
            floors: recommendation
                .floors()
                .iter()
                .map(|f| AuditFloor {
                    instrument: f.instrument(),
                    floor: f.floor_price(),
                })
                .collect(),
            recommended: recommendation.recommended(),
            quoted_at: recommendation.quoted_at(),
            calculated_at: recommendation.calculated_at(),
        }
    }
}

/// Receiver of audit records.
pub trait AuditSink: Send + Sync {
    /// Records a completed recommendation. Must not block for long.
    fn record(&self, record: &AuditRecord);
}

impl<F> AuditSink for F
where
    F: Fn(&AuditRecord) + Send + Sync,
{
    fn record(&self, record: &AuditRecord) {
        self(record);
    }
}

/// Sink that emits each record as a structured `info` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, record: &AuditRecord) {
        let floors = serde_json::to_string(&record.floors).unwrap_or_default();
        tracing::info!(
            target: "hedgefarm::audit",
            id = %record.id,
            commodity = %record.commodity,
            volume_tonnes = %record.volume_tonnes,
            term_months = record.term_months,
            recommended = %record.recommended,
            quoted_at = %record.quoted_at,
            floors = %floors,
            "hedge recommendation"
        );
    }
}

/// Sink that keeps records in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all records.
    #[must_use]
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().clone()
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, record: &AuditRecord) {
        self.records.lock().push(record.clone());
    }
}
