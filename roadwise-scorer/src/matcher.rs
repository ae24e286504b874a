//! Select the road segments a route geometrically passes along.
//!
//! Matching runs in two stages: a cheap bounding-box rejection against the
//! route's box grown by [`MatchConfig::bbox_expansion_deg`], then the
//! approximate line-to-line distance from [`roadwise_core::geometry`] against
//! [`MatchConfig::hit_threshold_m`].

use geo::{LineString, Rect};
use roadwise_core::RoadSegment;
use roadwise_core::geometry::{
    bounding_box, boxes_intersect, expand_box, extract_line_coordinates,
    min_distance_between_lines_with,
};

use crate::MatchConfig;

/// A segment accepted as lying on a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentMatch<'a> {
    /// The matched segment.
    pub segment: &'a RoadSegment,
    /// Approximate distance between route and segment in metres.
    pub distance_m: f64,
}

/// Return the expanded search box for `route`.
///
/// Routes with fewer than two coordinates have no search box and can never
/// match a segment.
#[must_use]
pub fn route_search_box(route: &LineString<f64>, config: &MatchConfig) -> Option<Rect<f64>> {
    if route.0.len() < 2 {
        return None;
    }
    bounding_box(route).map(|rect| expand_box(&rect, config.bbox_expansion_deg))
}

/// Filter `segments` down to those within the hit threshold of `route`.
///
/// Segments keep their input order. Segments whose geometry yields fewer than
/// two coordinates are skipped.
///
/// # Examples
/// ```
/// use roadwise_core::RoadSegment;
/// use roadwise_core::geometry::extract_line_coordinates;
/// use roadwise_scorer::{MatchConfig, match_segments};
/// use serde_json::json;
///
/// let route = extract_line_coordinates(&json!({
///     "type": "LineString",
///     "coordinates": [[13.400, 52.520], [13.410, 52.520]],
/// }));
/// let on_route = RoadSegment::new(1, json!({
///     "type": "LineString",
///     "coordinates": [[13.402, 52.5201], [13.405, 52.5201]],
/// }));
/// let elsewhere = RoadSegment::new(2, json!({
///     "type": "LineString",
///     "coordinates": [[13.50, 52.60], [13.51, 52.60]],
/// }));
///
/// let segments = [on_route, elsewhere];
/// let matches = match_segments(&route, &segments, &MatchConfig::default());
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].segment.id, 1);
/// ```
#[must_use]
pub fn match_segments<'a>(
    route: &LineString<f64>,
    segments: &'a [RoadSegment],
    config: &MatchConfig,
) -> Vec<SegmentMatch<'a>> {
    let Some(search_box) = route_search_box(route, config) else {
        return Vec::new();
    };
    segments
        .iter()
        .filter_map(|segment| match_one(route, &search_box, segment, config))
        .collect()
}

fn match_one<'a>(
    route: &LineString<f64>,
    search_box: &Rect<f64>,
    segment: &'a RoadSegment,
    config: &MatchConfig,
) -> Option<SegmentMatch<'a>> {
    let line = extract_line_coordinates(&segment.geometry);
    if line.0.len() < 2 {
        return None;
    }
    if !boxes_intersect(&bounding_box(&line)?, search_box) {
        return None;
    }
    let distance_m = min_distance_between_lines_with(route, &line, config.max_line_points);
    (distance_m <= config.hit_threshold_m).then_some(SegmentMatch {
        segment,
        distance_m,
    })
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point coordinates"
)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    fn line(coords: &[[f64; 2]]) -> Value {
        json!({"type": "LineString", "coordinates": coords})
    }

    #[fixture]
    fn route() -> LineString<f64> {
        extract_line_coordinates(&line(&[[13.400, 52.520], [13.410, 52.520]]))
    }

    #[rstest]
    fn accepts_segment_within_threshold(route: LineString<f64>) {
        // ~11 m north of the route.
        let segments = [RoadSegment::new(
            1,
            line(&[[13.402, 52.5201], [13.404, 52.5201]]),
        )];
        let matches = match_segments(&route, &segments, &MatchConfig::default());
        assert_eq!(matches.len(), 1);
        assert!(matches.iter().all(|m| m.distance_m < 12.0));
    }

    #[rstest]
    fn rejects_segment_beyond_threshold_inside_box(route: LineString<f64>) {
        // ~55 m north: inside the expanded box, outside the hit threshold.
        let segments = [RoadSegment::new(
            1,
            line(&[[13.402, 52.5205], [13.404, 52.5205]]),
        )];
        assert!(match_segments(&route, &segments, &MatchConfig::default()).is_empty());
    }

    #[rstest]
    fn box_rejection_precedes_distance_check(route: LineString<f64>) {
        let config = MatchConfig {
            hit_threshold_m: f64::MAX,
            ..MatchConfig::default()
        };
        let segments = [RoadSegment::new(1, line(&[[14.0, 53.0], [14.1, 53.0]]))];
        assert!(match_segments(&route, &segments, &config).is_empty());
    }

    #[rstest]
    fn degenerate_segments_are_skipped(route: LineString<f64>) {
        let segments = [
            RoadSegment::new(1, line(&[[13.402, 52.520]])),
            RoadSegment::new(2, json!({"type": "Polygon", "coordinates": []})),
            RoadSegment::new(3, line(&[[13.402, 52.520], [13.403, 52.520]])),
        ];
        let ids: Vec<_> = match_segments(&route, &segments, &MatchConfig::default())
            .iter()
            .map(|m| m.segment.id)
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[rstest]
    fn degenerate_route_matches_nothing() {
        let route = LineString::new(vec![Coord {
            x: 13.402,
            y: 52.520,
        }]);
        let segments = [RoadSegment::new(
            1,
            line(&[[13.402, 52.520], [13.403, 52.520]]),
        )];
        assert!(route_search_box(&route, &MatchConfig::default()).is_none());
        assert!(match_segments(&route, &segments, &MatchConfig::default()).is_empty());
    }

    #[rstest]
    fn search_box_grows_by_expansion(route: LineString<f64>) {
        let rect = route_search_box(&route, &MatchConfig::default()).expect("route has a box");
        assert!((rect.min().x - 13.3975).abs() < 1e-9);
        assert!((rect.max().y - 52.5225).abs() < 1e-9);
    }
}
