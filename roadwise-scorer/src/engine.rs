//! `RouteQualityEngine`: the end-to-end ranking pipeline.
//!
//! For each candidate the engine parses its geometry, asks the segment store
//! for segments near the route, keeps those the route passes along, collects
//! their condition summaries and aggregates them into a [`RouteQuality`].
//! Effectiveness is computed across the whole candidate set and both scores
//! are blended by [`rank_routes`].
//!
//! Every candidate handed in comes back out. Malformed geometry and
//! unavailable collaborators degrade a candidate to neutral quality with
//! low confidence rather than dropping it.

use chrono::{DateTime, Utc};
use geo::{Coord, LineString};
use roadwise_core::geometry::extract_line_coordinates;
use roadwise_core::{
    RankedRoute, RoadSegment, RouteCandidate, RouteCandidateProvider, RouteProviderError,
    SegmentStore,
};

use crate::{
    ConfigError, EngineConfig, RouteQuality, ScoredCandidate, SummaryProvider,
    aggregate_route_quality, effectiveness_scores, match_segments, rank_routes, route_search_box,
};

/// Ranks route candidates by effectiveness and road quality.
///
/// The engine is generic over its read-only collaborators: a segment store
/// and a source of per-segment condition summaries.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use roadwise_core::RouteCandidate;
/// use roadwise_core::test_support::MemorySegmentStore;
/// use roadwise_scorer::{CachedSummaryProvider, RouteQualityEngine};
/// use serde_json::json;
///
/// let engine = RouteQualityEngine::new(MemorySegmentStore::default(), CachedSummaryProvider);
/// let candidate = RouteCandidate::new(
///     "r1",
///     "osrm",
///     1_000.0,
///     300.0,
///     json!({"type": "LineString", "coordinates": [[13.40, 52.52], [13.41, 52.52]]}),
/// );
/// let ranked = engine.rank(vec![candidate], Utc::now());
/// assert_eq!(ranked.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RouteQualityEngine<S, P>
where
    S: SegmentStore,
    P: SummaryProvider,
{
    segments: S,
    summaries: P,
    config: EngineConfig,
}

impl<S, P> RouteQualityEngine<S, P>
where
    S: SegmentStore,
    P: SummaryProvider,
{
    /// Construct an engine using default configuration.
    pub fn new(segments: S, summaries: P) -> Self {
        Self {
            segments,
            summaries,
            config: EngineConfig::default(),
        }
    }

    /// Construct an engine with explicit configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn with_config(segments: S, summaries: P, config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            segments,
            summaries,
            config: config.validate()?,
        })
    }

    /// The configuration in use.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Aggregate road quality along a single candidate.
    #[must_use]
    pub fn evaluate_route(&self, candidate: &RouteCandidate, now: DateTime<Utc>) -> RouteQuality {
        let route = extract_line_coordinates(&candidate.geometry);
        let Some(search_box) = route_search_box(&route, &self.config.matching) else {
            log::debug!(
                "route {} has no usable geometry; scoring with neutral quality",
                candidate.id
            );
            return RouteQuality::NEUTRAL;
        };
        let nearby = match self.segments.segments_near(&search_box) {
            Ok(segments) => segments,
            Err(err) => {
                log::warn!(
                    "segments near route {} unavailable, treating as no evidence: {err}",
                    candidate.id
                );
                return RouteQuality::NEUTRAL;
            }
        };
        self.quality_along(&route, &nearby, now, &candidate.id)
    }

    fn quality_along(
        &self,
        route: &LineString<f64>,
        nearby: &[RoadSegment],
        now: DateTime<Utc>,
        route_id: &str,
    ) -> RouteQuality {
        let merge = &self.config.merge;
        let matches = match_segments(route, nearby, &self.config.matching);
        let summaries: Vec<_> = matches
            .iter()
            .filter_map(|hit| self.summaries.summary(hit.segment, now, merge))
            .collect();
        log::debug!(
            "route {route_id}: {} nearby segments, {} matched, {} with evidence",
            nearby.len(),
            matches.len(),
            summaries.len()
        );
        aggregate_route_quality(&summaries, now, merge.half_life_days)
    }

    /// Rank `candidates`, best first. Every candidate appears exactly once.
    #[must_use]
    pub fn rank(&self, candidates: Vec<RouteCandidate>, now: DateTime<Utc>) -> Vec<RankedRoute> {
        let ranking = &self.config.ranking;
        let effectiveness = effectiveness_scores(&candidates, ranking.tied_normalization);
        let qualities = self.evaluate_all(&candidates, now);
        let scored = candidates
            .into_iter()
            .zip(effectiveness)
            .zip(qualities)
            .map(|((candidate, effectiveness), quality)| ScoredCandidate {
                candidate,
                effectiveness,
                quality,
            })
            .collect();
        rank_routes(scored, ranking)
    }

    /// Fetch candidates between two points from `provider` and rank them.
    ///
    /// # Errors
    /// Returns the provider's [`RouteProviderError`] unchanged.
    pub fn rank_between<R>(
        &self,
        provider: &R,
        origin: Coord<f64>,
        destination: Coord<f64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<RankedRoute>, RouteProviderError>
    where
        R: RouteCandidateProvider + ?Sized,
    {
        let candidates = provider.route_candidates(origin, destination)?;
        Ok(self.rank(candidates, now))
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&self, candidates: &[RouteCandidate], now: DateTime<Utc>) -> Vec<RouteQuality> {
        use rayon::prelude::*;

        candidates
            .par_iter()
            .map(|candidate| self.evaluate_route(candidate, now))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&self, candidates: &[RouteCandidate], now: DateTime<Utc>) -> Vec<RouteQuality> {
        candidates
            .iter()
            .map(|candidate| self.evaluate_route(candidate, now))
            .collect()
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
mod tests {
    use super::*;
    use crate::{
        CachedSummaryProvider, LiveMergeProvider, MergeConfig, RankingConfig, RankingWeights,
    };
    use chrono::TimeDelta;
    use roadwise_core::test_support::{
        FailingStore, FixedRouteProvider, MemoryReportStore, MemorySegmentStore,
    };
    use roadwise_core::{ConditionReport, ConfidenceLabel, MergedConditionSummary, RoadCondition};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).expect("valid fixed timestamp")
    }

    fn line(coords: &[[f64; 2]]) -> Value {
        json!({"type": "LineString", "coordinates": coords})
    }

    fn summary(condition: RoadCondition, at: DateTime<Utc>) -> MergedConditionSummary {
        MergedConditionSummary {
            winning_condition: condition,
            confidence: 1.0,
            report_count: 8,
            latest_timestamp: Some(at),
        }
    }

    /// Two parallel streets roughly 1.1 km apart: smooth along y = 52.52,
    /// rough along y = 52.53.
    fn streets(now: DateTime<Utc>) -> MemorySegmentStore {
        MemorySegmentStore::with_segments([
            RoadSegment::new(1, line(&[[13.400, 52.520], [13.410, 52.520]]))
                .with_cached_summary(summary(RoadCondition::Optimal, now)),
            RoadSegment::new(2, line(&[[13.400, 52.530], [13.410, 52.530]]))
                .with_cached_summary(summary(RoadCondition::Maintenance, now)),
        ])
    }

    fn candidate(id: &str, latitude: f64) -> RouteCandidate {
        RouteCandidate::new(
            id,
            "test",
            700.0,
            180.0,
            line(&[[13.401, latitude], [13.409, latitude]]),
        )
    }

    #[rstest]
    fn smoother_route_wins_when_costs_tie(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        let ranked = engine.rank(vec![candidate("rough", 52.530), candidate("smooth", 52.520)], now);
        let ids: Vec<_> = ranked.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["smooth", "rough"]);
        let best = ranked.first().expect("two routes");
        assert!((best.breakdown.quality - 1.0).abs() < 1e-12);
        assert_eq!(best.breakdown.effectiveness, 0.5);
        assert_eq!(best.confidence, ConfidenceLabel::High);
    }

    #[rstest]
    fn evaluate_route_matches_only_nearby_segments(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        let quality = engine.evaluate_route(&candidate("rough", 52.530), now);
        assert_eq!(quality.matched_count, 1);
        assert!((quality.quality_score - 0.1).abs() < 1e-12);
    }

    #[rstest]
    fn route_without_evidence_is_neutral_and_low_confidence(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        let ranked = engine.rank(vec![candidate("elsewhere", 52.600)], now);
        let route = ranked.first().expect("one route");
        assert_eq!(route.breakdown.quality, 0.5);
        assert_eq!(route.breakdown.evidence, 0.0);
        assert_eq!(route.confidence, ConfidenceLabel::Low);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!({"type": "LineString", "coordinates": [[13.40, 52.52]]}))]
    #[case(json!({"type": "LineString", "coordinates": [[13.40, "north"], [13.41, 52.52]]}))]
    fn malformed_geometry_fails_open(#[case] geometry: Value, now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        let broken = RouteCandidate::new("broken", "test", 700.0, 180.0, geometry);
        assert_eq!(engine.evaluate_route(&broken, now), RouteQuality::NEUTRAL);
        let ranked = engine.rank(vec![broken, candidate("smooth", 52.520)], now);
        assert_eq!(ranked.len(), 2);
        assert!(
            ranked
                .iter()
                .any(|r| r.candidate.id == "broken" && r.confidence == ConfidenceLabel::Low)
        );
    }

    #[rstest]
    fn failing_segment_store_still_ranks(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(FailingStore, CachedSummaryProvider);
        let ranked = engine.rank(vec![candidate("a", 52.520), candidate("b", 52.530)], now);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|r| r.breakdown.quality == 0.5));
        assert!(ranked.iter().all(|r| r.confidence == ConfidenceLabel::Low));
    }

    #[rstest]
    fn live_provider_merges_reports_per_segment(now: DateTime<Utc>) {
        let segments = MemorySegmentStore::with_segments([RoadSegment::new(
            1,
            line(&[[13.400, 52.520], [13.410, 52.520]]),
        )
        .with_cached_summary(summary(RoadCondition::Optimal, now))]);
        let reports = MemoryReportStore::with_reports([
            ConditionReport::new(1, RoadCondition::Sufficient, Some(now)),
            ConditionReport::new(1, RoadCondition::Sufficient, Some(now - TimeDelta::days(1))),
        ]);
        let engine = RouteQualityEngine::new(segments, LiveMergeProvider::new(reports));
        let quality = engine.evaluate_route(&candidate("smooth", 52.520), now);
        assert_eq!(quality.matched_count, 1);
        assert!((quality.quality_score - 0.45).abs() < 1e-12);
    }

    #[rstest]
    fn live_merge_follows_the_engine_report_cap(now: DateTime<Utc>) {
        let segments = MemorySegmentStore::with_segments([RoadSegment::new(
            1,
            line(&[[13.400, 52.520], [13.410, 52.520]]),
        )]);
        let reports = MemoryReportStore::with_reports([
            ConditionReport::new(1, RoadCondition::Optimal, Some(now)),
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(1))),
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(2))),
        ]);
        let config = EngineConfig {
            merge: MergeConfig {
                max_reports: 1,
                ..MergeConfig::default()
            },
            ..EngineConfig::default()
        };
        let engine =
            RouteQualityEngine::with_config(segments, LiveMergeProvider::new(reports), config)
                .expect("valid config");
        let quality = engine.evaluate_route(&candidate("smooth", 52.520), now);
        assert_eq!(quality.matched_count, 1);
        assert!((quality.quality_score - 1.0).abs() < 1e-12);
    }

    #[rstest]
    fn live_merge_follows_the_engine_half_life(now: DateTime<Utc>) {
        let segments = MemorySegmentStore::with_segments([RoadSegment::new(
            1,
            line(&[[13.400, 52.520], [13.410, 52.520]]),
        )]);
        // Fresh minority against a majority 10 days old: the short half-life
        // lets the fresh report win, the default one does not.
        let reports = MemoryReportStore::with_reports([
            ConditionReport::new(1, RoadCondition::Optimal, Some(now)),
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(10))),
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(10))),
        ]);
        let short = EngineConfig {
            merge: MergeConfig {
                half_life_days: 1.0,
                ..MergeConfig::default()
            },
            ..EngineConfig::default()
        };
        let fast_decay = RouteQualityEngine::with_config(
            segments.clone(),
            LiveMergeProvider::new(reports.clone()),
            short,
        )
        .expect("valid config");
        let default_decay = RouteQualityEngine::new(segments, LiveMergeProvider::new(reports));
        let route = candidate("smooth", 52.520);
        assert!((fast_decay.evaluate_route(&route, now).quality_score - 1.0).abs() < 1e-12);
        assert!((default_decay.evaluate_route(&route, now).quality_score - 0.1).abs() < 1e-12);
    }

    #[rstest]
    fn matched_segments_without_evidence_are_not_counted(now: DateTime<Utc>) {
        let segments = MemorySegmentStore::with_segments([
            RoadSegment::new(1, line(&[[13.400, 52.520], [13.405, 52.520]]))
                .with_cached_summary(summary(RoadCondition::Medium, now)),
            RoadSegment::new(2, line(&[[13.405, 52.520], [13.410, 52.520]])),
        ]);
        let engine = RouteQualityEngine::new(segments, CachedSummaryProvider);
        let quality = engine.evaluate_route(&candidate("smooth", 52.520), now);
        assert_eq!(quality.matched_count, 1);
        assert!((quality.quality_score - 0.7).abs() < 1e-12);
    }

    #[rstest]
    fn matched_segments_all_without_evidence_stay_neutral(now: DateTime<Utc>) {
        let segments = MemorySegmentStore::with_segments([RoadSegment::new(
            1,
            line(&[[13.400, 52.520], [13.410, 52.520]]),
        )]);
        let engine = RouteQualityEngine::new(segments, CachedSummaryProvider);
        let quality = engine.evaluate_route(&candidate("smooth", 52.520), now);
        assert_eq!(quality, RouteQuality::NEUTRAL);
    }

    #[rstest]
    fn empty_candidate_list_ranks_nothing(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        assert!(engine.rank(Vec::new(), now).is_empty());
    }

    #[rstest]
    fn rank_between_uses_provider_candidates(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        let provider = FixedRouteProvider::with_candidates([candidate("smooth", 52.520)]);
        let ranked = engine
            .rank_between(
                &provider,
                Coord { x: 13.401, y: 52.520 },
                Coord { x: 13.409, y: 52.520 },
                now,
            )
            .expect("provider has candidates");
        assert_eq!(ranked.len(), 1);
    }

    #[rstest]
    fn rank_between_surfaces_provider_errors(now: DateTime<Utc>) {
        let engine = RouteQualityEngine::new(streets(now), CachedSummaryProvider);
        let provider = FixedRouteProvider::default();
        let result = engine.rank_between(
            &provider,
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
            now,
        );
        assert!(matches!(result, Err(RouteProviderError::NoRoute)));
    }

    #[rstest]
    fn with_config_rejects_invalid_weights(now: DateTime<Utc>) {
        let config = EngineConfig {
            ranking: RankingConfig {
                weights: RankingWeights {
                    effectiveness: 0.0,
                    quality: 0.0,
                },
                ..RankingConfig::default()
            },
            ..EngineConfig::default()
        };
        let result = RouteQualityEngine::with_config(streets(now), CachedSummaryProvider, config);
        assert!(matches!(result, Err(ConfigError::InvalidWeights)));
    }
}
