//! Core domain types for the Roadwise route quality engine.
//!
//! The crate defines the data model shared by the scoring crates: route
//! candidates and their ranked form, road segments, rider condition reports
//! and merged condition summaries. It also provides the approximate planar
//! [`geometry`] helpers used for route/segment matching, and the read-only
//! collaborator traits through which the engine receives its input snapshot.
//!
//! Nothing here performs I/O or fails on malformed geometry: bad shapes
//! degrade to empty lines and, further up, to neutral scores.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod condition;
pub mod geometry;
pub mod probability;
pub mod route;
pub mod segment;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use condition::{RoadCondition, UnknownCondition};
pub use probability::{NEUTRAL, clamp_unit};
pub use route::{ConfidenceLabel, RankedRoute, RouteCandidate, ScoreBreakdown};
pub use segment::{ConditionReport, MergedConditionSummary, RoadSegment};
pub use store::{
    DEFAULT_REPORT_LIMIT, ReportStore, RouteCandidateProvider, RouteProviderError, SegmentStore,
    StoreError,
};
