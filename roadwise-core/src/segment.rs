//! Road segments and the condition evidence attached to them.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::RoadCondition;

/// A stretch of road that routes can be matched against.
///
/// Geometry is raw GeoJSON; segments whose geometry yields fewer than two
/// coordinates never match a route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RoadSegment {
    /// Persistent segment identifier.
    pub id: u64,
    /// Raw GeoJSON line geometry.
    pub geometry: Value,
    /// Pre-computed consensus, when the persistence layer caches one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cached_summary: Option<MergedConditionSummary>,
}

impl RoadSegment {
    /// Construct a segment without a cached summary.
    ///
    /// # Examples
    /// ```
    /// use roadwise_core::RoadSegment;
    /// use serde_json::json;
    ///
    /// let segment = RoadSegment::new(7, json!({"type": "LineString", "coordinates": []}));
    /// assert!(segment.cached_summary.is_none());
    /// ```
    #[must_use]
    pub const fn new(id: u64, geometry: Value) -> Self {
        Self {
            id,
            geometry,
            cached_summary: None,
        }
    }

    /// Attach a cached consensus summary.
    #[must_use]
    pub fn with_cached_summary(mut self, summary: MergedConditionSummary) -> Self {
        self.cached_summary = Some(summary);
        self
    }
}

/// One publishable observation of a segment's condition.
///
/// Status filtering happens upstream; every report reaching the engine
/// counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ConditionReport {
    /// Segment the report refers to.
    pub segment_id: u64,
    /// Reported condition.
    pub condition: RoadCondition,
    /// Creation time, when known.
    pub created_at: Option<DateTime<Utc>>,
}

impl ConditionReport {
    /// Construct a report.
    #[must_use]
    pub const fn new(
        segment_id: u64,
        condition: RoadCondition,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            segment_id,
            condition,
            created_at,
        }
    }
}

/// Weighted consensus over a segment's condition reports.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct MergedConditionSummary {
    /// Condition with the largest freshness-weighted tally.
    pub winning_condition: RoadCondition,
    /// Winner's share of the total tally in `0.0..=1.0`.
    pub confidence: f64,
    /// Number of reports merged.
    pub report_count: usize,
    /// Most recent report time, if any report carried one.
    pub latest_timestamp: Option<DateTime<Utc>>,
}
