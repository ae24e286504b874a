//! Route candidates and their ranked, scored form.
//!
//! A [`RouteCandidate`] is what a directions provider proposes. Ranking turns
//! each candidate into a [`RankedRoute`] carrying the composite score, a
//! 1-based rank, a [`ConfidenceLabel`] and a [`ScoreBreakdown`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One proposed path between an origin and a destination.
///
/// The geometry is kept as the raw GeoJSON value returned by the provider so
/// that a malformed shape can still be ranked with neutral defaults.
///
/// # Examples
/// ```
/// use roadwise_core::RouteCandidate;
/// use serde_json::json;
///
/// let route = RouteCandidate::new(
///     "r1",
///     "osrm",
///     1_000.0,
///     300.0,
///     json!({"type": "LineString", "coordinates": [[0.0, 0.0], [0.01, 0.0]]}),
/// );
/// assert_eq!(route.id, "r1");
/// assert_eq!(route.distance_m, 1_000.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RouteCandidate {
    /// Identifier unique within one ranking request.
    pub id: String,
    /// Label of the directions provider that proposed the route.
    pub provider: String,
    /// Route length in metres.
    pub distance_m: f64,
    /// Expected travel time in seconds.
    pub duration_s: f64,
    /// Raw GeoJSON line geometry.
    pub geometry: Value,
}

impl RouteCandidate {
    /// Construct a candidate.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<String>,
        distance_m: f64,
        duration_s: f64,
        geometry: Value,
    ) -> Self {
        Self {
            id: id.into(),
            provider: provider.into(),
            distance_m,
            duration_s,
            geometry,
        }
    }
}

/// Coarse reliability label for a route's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConfidenceLabel {
    /// Enough condition evidence backs the quality component.
    High,
    /// Little or no condition evidence; the quality component is mostly
    /// neutral.
    Low,
}

impl ConfidenceLabel {
    /// Return the label as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-component scores behind a route's composite score.
///
/// Every field lies in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreBreakdown {
    /// Distance/duration efficiency.
    pub effectiveness: f64,
    /// Road condition quality along the route.
    pub quality: f64,
    /// Strength of the condition evidence.
    pub evidence: f64,
}

/// A candidate after scoring and ranking.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RankedRoute {
    /// The original candidate.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub candidate: RouteCandidate,
    /// Composite score in `0.0..=1.0`.
    pub score: f64,
    /// 1-based position in the ranking.
    pub rank: usize,
    /// Reliability label derived from the evidence score.
    pub confidence: ConfidenceLabel,
    /// Component scores.
    pub breakdown: ScoreBreakdown,
}
