//! Route-level road quality from matched segments' consensus.
//!
//! Each matched segment contributes its condition score, weighted by how
//! fresh its newest report is and how much evidence backs its consensus. A
//! second, independent curve turns the average evidence into the route's
//! evidence score, which drives the confidence label.
#![expect(
    clippy::float_arithmetic,
    reason = "weighted averages and saturation curves are floating-point maths"
)]

use chrono::{DateTime, Utc};
use roadwise_core::{MergedConditionSummary, NEUTRAL, RoadCondition, clamp_unit};

use crate::decay::{evidence_weight, freshness_weight};

const EVIDENCE_SATURATION_RATE: f64 = 1.5;

/// Aggregate road quality for one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteQuality {
    /// Weighted mean condition score in `0.0..=1.0`.
    pub quality_score: f64,
    /// Strength of the underlying evidence in `0.0..=1.0`.
    pub evidence_score: f64,
    /// Number of segments that contributed evidence.
    pub matched_count: usize,
}

impl RouteQuality {
    /// Quality used when nothing is known about a route: neutral quality and
    /// no evidence.
    pub const NEUTRAL: Self = Self {
        quality_score: NEUTRAL,
        evidence_score: 0.0,
        matched_count: 0,
    };
}

/// Fixed score for a condition level.
///
/// # Examples
/// ```
/// use roadwise_core::RoadCondition;
/// use roadwise_scorer::condition_score;
///
/// assert_eq!(condition_score(RoadCondition::Sufficient), 0.45);
/// ```
#[must_use]
pub const fn condition_score(condition: RoadCondition) -> f64 {
    condition.score()
}

/// Score for a raw condition label, neutral when the label is unrecognised.
#[must_use]
pub fn condition_score_or_neutral(raw: &str) -> f64 {
    RoadCondition::score_label(raw)
}

/// Combine matched segments' summaries into a [`RouteQuality`].
///
/// An empty slice is absence of evidence and yields [`RouteQuality::NEUTRAL`].
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use roadwise_scorer::{RouteQuality, aggregate_route_quality};
///
/// assert_eq!(aggregate_route_quality(&[], Utc::now(), 30.0), RouteQuality::NEUTRAL);
/// ```
#[must_use]
pub fn aggregate_route_quality(
    summaries: &[MergedConditionSummary],
    now: DateTime<Utc>,
    half_life_days: f64,
) -> RouteQuality {
    if summaries.is_empty() {
        return RouteQuality::NEUTRAL;
    }
    let weighted: Vec<_> = summaries
        .iter()
        .map(|summary| SegmentWeight::of(summary, now, half_life_days))
        .collect();
    RouteQuality {
        quality_score: blend_quality(&weighted),
        evidence_score: evidence_score(&weighted),
        matched_count: summaries.len(),
    }
}

/// Per-segment inputs to the quality blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SegmentWeight {
    pub(crate) freshness: f64,
    pub(crate) evidence: f64,
    pub(crate) condition: RoadCondition,
}

impl SegmentWeight {
    fn of(summary: &MergedConditionSummary, now: DateTime<Utc>, half_life_days: f64) -> Self {
        Self {
            freshness: freshness_weight(summary.latest_timestamp, now, half_life_days),
            evidence: evidence_weight(summary.report_count, summary.confidence),
            condition: summary.winning_condition,
        }
    }
}

pub(crate) fn blend_quality(segments: &[SegmentWeight]) -> f64 {
    let (weighted_sum, total_weight) =
        segments
            .iter()
            .fold((0.0_f64, 0.0_f64), |(sum, total), segment| {
                let weight = segment.freshness * segment.evidence;
                (sum + weight * segment.condition.score(), total + weight)
            });
    if total_weight > 0.0 {
        clamp_unit(weighted_sum / total_weight)
    } else {
        NEUTRAL
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "matched segment counts are small"
)]
pub(crate) fn evidence_score(segments: &[SegmentWeight]) -> f64 {
    if segments.is_empty() {
        return 0.0;
    }
    let total: f64 = segments.iter().map(|s| s.evidence.min(1.0)).sum();
    let average = total / segments.len() as f64;
    clamp_unit(1.0 - (-EVIDENCE_SATURATION_RATE * average).exp())
}
