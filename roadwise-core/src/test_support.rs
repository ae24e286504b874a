//! Test-only, in-memory collaborator implementations used by unit and
//! behaviour tests.

use std::cmp::Reverse;

use geo::{Coord, Rect};

use crate::geometry::{bounding_box, boxes_intersect, extract_line_coordinates};
use crate::{
    ConditionReport, ReportStore, RoadSegment, RouteCandidate, RouteCandidateProvider,
    RouteProviderError, SegmentStore, StoreError,
};

/// In-memory `SegmentStore` implementation used in tests.
///
/// The store performs a linear scan and is intended only for small datasets.
#[derive(Default, Debug, Clone)]
pub struct MemorySegmentStore {
    segments: Vec<RoadSegment>,
}

impl MemorySegmentStore {
    /// Create a store from a collection of segments.
    pub fn with_segments<I>(segments: I) -> Self
    where
        I: IntoIterator<Item = RoadSegment>,
    {
        Self {
            segments: segments.into_iter().collect(),
        }
    }
}

impl SegmentStore for MemorySegmentStore {
    fn segments_near(&self, bbox: &Rect<f64>) -> Result<Vec<RoadSegment>, StoreError> {
        Ok(self
            .segments
            .iter()
            .filter(|segment| {
                bounding_box(&extract_line_coordinates(&segment.geometry))
                    .is_some_and(|own| boxes_intersect(&own, bbox))
            })
            .cloned()
            .collect())
    }
}

/// In-memory `ReportStore` returning reports newest first.
///
/// Reports without a timestamp sort after dated ones; ties keep insertion
/// order.
#[derive(Default, Debug, Clone)]
pub struct MemoryReportStore {
    reports: Vec<ConditionReport>,
}

impl MemoryReportStore {
    /// Create a store from a collection of reports.
    pub fn with_reports<I>(reports: I) -> Self
    where
        I: IntoIterator<Item = ConditionReport>,
    {
        Self {
            reports: reports.into_iter().collect(),
        }
    }
}

impl ReportStore for MemoryReportStore {
    fn publishable_reports(
        &self,
        segment_id: u64,
        limit: usize,
    ) -> Result<Vec<ConditionReport>, StoreError> {
        let mut matching: Vec<_> = self
            .reports
            .iter()
            .filter(|report| report.segment_id == segment_id)
            .cloned()
            .collect();
        matching.sort_by_key(|report| Reverse(report.created_at));
        matching.truncate(limit);
        Ok(matching)
    }
}

/// Store that fails every request; exercises the "absence of evidence" path.
#[derive(Default, Debug, Copy, Clone)]
pub struct FailingStore;

impl SegmentStore for FailingStore {
    fn segments_near(&self, _bbox: &Rect<f64>) -> Result<Vec<RoadSegment>, StoreError> {
        Err(StoreError::Unavailable {
            reason: "failing store".to_owned(),
        })
    }
}

impl ReportStore for FailingStore {
    fn publishable_reports(
        &self,
        _segment_id: u64,
        _limit: usize,
    ) -> Result<Vec<ConditionReport>, StoreError> {
        Err(StoreError::Unavailable {
            reason: "failing store".to_owned(),
        })
    }
}

/// `RouteCandidateProvider` that replays a fixed candidate list.
///
/// An empty list answers with [`RouteProviderError::NoRoute`].
#[derive(Default, Debug, Clone)]
pub struct FixedRouteProvider {
    candidates: Vec<RouteCandidate>,
}

impl FixedRouteProvider {
    /// Create a provider that always proposes `candidates`.
    pub fn with_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = RouteCandidate>,
    {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }
}

impl RouteCandidateProvider for FixedRouteProvider {
    fn route_candidates(
        &self,
        _origin: Coord<f64>,
        _destination: Coord<f64>,
    ) -> Result<Vec<RouteCandidate>, RouteProviderError> {
        if self.candidates.is_empty() {
            return Err(RouteProviderError::NoRoute);
        }
        Ok(self.candidates.clone())
    }
}
