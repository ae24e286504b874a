//! Route quality scoring and road-condition aggregation for Roadwise.
//!
//! The crate turns a set of route candidates into a ranked list. Each
//! candidate is judged on two axes:
//! - **Effectiveness**: how short and fast the route is relative to its
//!   rivals, or against soft thresholds when it stands alone.
//! - **Road quality**: the freshness- and evidence-weighted consensus of rider
//!   condition reports on the road segments the route passes along.
//!
//! Segment consensus comes from a [`SummaryProvider`]: either the summaries
//! the persistence layer caches per segment ([`CachedSummaryProvider`]) or a
//! live merge of the segment's reports ([`LiveMergeProvider`]).
//!
//! Scoring never fails on bad input. Unusable geometry and unavailable
//! collaborators yield neutral quality with low confidence, so every candidate
//! is always ranked.
//!
//! # Examples
//!
//! ```
//! use chrono::Utc;
//! use roadwise_core::RouteCandidate;
//! use roadwise_core::test_support::MemorySegmentStore;
//! use roadwise_scorer::{CachedSummaryProvider, EngineConfig, RouteQualityEngine};
//! use serde_json::json;
//!
//! let engine = RouteQualityEngine::with_config(
//!     MemorySegmentStore::default(),
//!     CachedSummaryProvider,
//!     EngineConfig::default(),
//! )?;
//! let candidates = vec![
//!     RouteCandidate::new("direct", "osrm", 1_000.0, 240.0, json!(null)),
//!     RouteCandidate::new("detour", "osrm", 1_800.0, 420.0, json!(null)),
//! ];
//! let ranked = engine.rank(candidates, Utc::now());
//! assert_eq!(ranked.first().map(|r| r.candidate.id.as_str()), Some("direct"));
//! # Ok::<(), roadwise_scorer::ConfigError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod decay;
mod effectiveness;
mod engine;
mod error;
mod matcher;
mod merge;
mod quality;
mod ranker;
mod summary;

pub use config::{
    EngineConfig, MatchConfig, MergeConfig, RankingConfig, RankingWeights, TiedNormalization,
};
pub use decay::{DEFAULT_HALF_LIFE_DAYS, UNDATED_FRESHNESS, evidence_weight, freshness_weight};
pub use effectiveness::{
    DISTANCE_SOFT_THRESHOLD_M, DURATION_SOFT_THRESHOLD_S, effectiveness_scores,
    single_route_effectiveness,
};
pub use engine::RouteQualityEngine;
pub use error::ConfigError;
pub use matcher::{SegmentMatch, match_segments, route_search_box};
pub use merge::merge_reports;
pub use quality::{
    RouteQuality, aggregate_route_quality, condition_score, condition_score_or_neutral,
};
pub use ranker::{ScoredCandidate, rank_routes};
pub use summary::{CachedSummaryProvider, LiveMergeProvider, SummaryProvider};
