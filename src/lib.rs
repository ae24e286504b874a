//! Facade crate for the Roadwise route quality engine.
//!
//! This crate re-exports the core domain types and the scoring engine, with
//! in-memory collaborators available behind the `test-support` feature.

#![forbid(unsafe_code)]

pub use roadwise_core::{
    ConditionReport, ConfidenceLabel, MergedConditionSummary, RankedRoute, ReportStore,
    RoadCondition, RoadSegment, RouteCandidate, RouteCandidateProvider, RouteProviderError,
    ScoreBreakdown, SegmentStore, StoreError, clamp_unit, geometry,
};
pub use roadwise_scorer::{
    CachedSummaryProvider, ConfigError, EngineConfig, LiveMergeProvider, MatchConfig, MergeConfig,
    RankingConfig, RankingWeights, RouteQuality, RouteQualityEngine, SummaryProvider,
    TiedNormalization, aggregate_route_quality, effectiveness_scores, merge_reports, rank_routes,
};

#[cfg(feature = "test-support")]
pub use roadwise_core::test_support;
