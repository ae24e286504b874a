//! Blend effectiveness and quality into a final ordering.
#![expect(
    clippy::float_arithmetic,
    reason = "the final score is a weighted sum"
)]

use std::cmp::Ordering;

use roadwise_core::{ConfidenceLabel, RankedRoute, RouteCandidate, ScoreBreakdown, clamp_unit};

use crate::{RankingConfig, RouteQuality};

/// A candidate together with its component scores, ready to rank.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The route being ranked.
    pub candidate: RouteCandidate,
    /// Effectiveness relative to the other candidates.
    pub effectiveness: f64,
    /// Road quality along the route.
    pub quality: RouteQuality,
}

/// Rank `scored` by blended score, best first.
///
/// Equal scores keep their input order. Ranks run from one to the number of
/// candidates without gaps.
///
/// # Examples
/// ```
/// use roadwise_core::{ConfidenceLabel, RouteCandidate};
/// use roadwise_scorer::{RankingConfig, RouteQuality, ScoredCandidate, rank_routes};
/// use serde_json::json;
///
/// let scored = vec![ScoredCandidate {
///     candidate: RouteCandidate::new("only", "osrm", 1_000.0, 300.0, json!(null)),
///     effectiveness: 0.775,
///     quality: RouteQuality::NEUTRAL,
/// }];
/// let ranked = rank_routes(scored, &RankingConfig::default());
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked.first().map(|r| r.rank), Some(1));
/// assert_eq!(ranked.first().map(|r| r.confidence), Some(ConfidenceLabel::Low));
/// ```
#[must_use]
pub fn rank_routes(scored: Vec<ScoredCandidate>, config: &RankingConfig) -> Vec<RankedRoute> {
    let mut ranked: Vec<RankedRoute> = scored
        .into_iter()
        .map(|entry| unranked(entry, config))
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    for (position, route) in ranked.iter_mut().enumerate() {
        route.rank = position + 1;
    }
    ranked
}

fn unranked(entry: ScoredCandidate, config: &RankingConfig) -> RankedRoute {
    let ScoredCandidate {
        candidate,
        effectiveness,
        quality,
    } = entry;
    let weights = config.weights;
    let score =
        clamp_unit(weights.effectiveness * effectiveness + weights.quality * quality.quality_score);
    let confidence = if quality.evidence_score < config.low_confidence_threshold {
        ConfidenceLabel::Low
    } else {
        ConfidenceLabel::High
    };
    RankedRoute {
        candidate,
        score,
        rank: 0,
        confidence,
        breakdown: ScoreBreakdown {
            effectiveness,
            quality: quality.quality_score,
            evidence: quality.evidence_score,
        },
    }
}
