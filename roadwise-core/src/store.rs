//! Read-only collaborator interfaces consumed by the engine.
//!
//! The engine performs no I/O. Segments and reports come from a persistence
//! layer through [`SegmentStore`] and [`ReportStore`]; candidate routes come
//! from a directions provider through [`RouteCandidateProvider`]. All of
//! these calls must complete before scoring starts.

use geo::{Coord, Rect};
use thiserror::Error;

use crate::{ConditionReport, RoadSegment, RouteCandidate};

/// Most recent reports considered per segment.
pub const DEFAULT_REPORT_LIMIT: usize = 200;

/// Failure reported by a persistence collaborator.
///
/// The engine treats these as absence of evidence rather than aborting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("segment store unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
    /// The store answered with data it could not decode.
    #[error("segment store returned malformed data: {reason}")]
    Malformed {
        /// Human-readable cause.
        reason: String,
    },
}

/// Failure reported by a directions provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteProviderError {
    /// The provider could not be reached or timed out.
    #[error("route provider unavailable: {reason}")]
    Unavailable {
        /// Human-readable cause.
        reason: String,
    },
    /// The provider found no route between the requested points.
    #[error("no route between origin and destination")]
    NoRoute,
}

/// Read-only access to road segments.
///
/// Implementers are expected to answer from a spatial index and to bound the
/// number of returned segments themselves (for example to 2000). The
/// bounding box uses WGS84 coordinates (`x = longitude`, `y = latitude`);
/// segments touching its boundary count as inside.
///
/// # Examples
///
/// ```rust
/// use geo::{Coord, Rect};
/// use roadwise_core::{RoadSegment, SegmentStore, StoreError};
/// use serde_json::json;
///
/// struct Empty;
///
/// impl SegmentStore for Empty {
///     fn segments_near(&self, _bbox: &Rect<f64>) -> Result<Vec<RoadSegment>, StoreError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let bbox = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 1.0 });
/// assert!(Empty.segments_near(&bbox)?.is_empty());
/// # Ok::<(), StoreError>(())
/// ```
pub trait SegmentStore: Send + Sync {
    /// Return a bounded list of segments near `bbox`.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot answer.
    fn segments_near(&self, bbox: &Rect<f64>) -> Result<Vec<RoadSegment>, StoreError>;
}

/// Read-only access to publishable condition reports.
pub trait ReportStore: Send + Sync {
    /// Return at most `limit` publishable reports for `segment_id`, most
    /// recent first.
    ///
    /// # Errors
    /// Returns [`StoreError`] when the store cannot answer.
    fn publishable_reports(
        &self,
        segment_id: u64,
        limit: usize,
    ) -> Result<Vec<ConditionReport>, StoreError>;
}

/// Source of candidate routes between two points.
pub trait RouteCandidateProvider: Send + Sync {
    /// Propose candidate routes from `origin` to `destination`.
    ///
    /// # Errors
    /// Returns [`RouteProviderError`] when no candidates can be produced.
    fn route_candidates(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<Vec<RouteCandidate>, RouteProviderError>;
}
