//! Approximate planar geometry for matching routes against road segments.
//!
//! Geometries arrive as raw GeoJSON values. Extraction never fails: anything
//! malformed becomes an empty [`LineString`], which callers treat as "no
//! geometry". Distances use an equirectangular projection that is accurate
//! enough for a single metropolitan route and explicitly not geodesically
//! exact at larger scales or near the poles.
//!
//! # Examples
//! ```
//! use roadwise_core::geometry::{extract_line_coordinates, min_distance_between_lines};
//! use serde_json::json;
//!
//! let line = extract_line_coordinates(&json!({
//!     "type": "LineString",
//!     "coordinates": [[13.40, 52.52], [13.41, 52.52]],
//! }));
//! assert_eq!(line.0.len(), 2);
//! assert!(min_distance_between_lines(&line, &line) < 1e-6);
//! ```
#![expect(
    clippy::float_arithmetic,
    reason = "planar projection and distance maths are floating-point by nature"
)]

use geo::{BoundingRect, Coord, Intersects, LineString, Rect};
use serde_json::Value;

/// Mean Earth radius in metres used by [`project_planar`].
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Upper bound on points per line considered by
/// [`min_distance_between_lines`].
pub const MAX_LINE_POINTS: usize = 60;

/// Extract an ordered sequence of `(longitude, latitude)` coordinates.
///
/// Supported shapes are `LineString`, `MultiLineString` (parts concatenated
/// in input order) and a `Feature` wrapping either of those. A feature nested
/// inside a feature is not unwrapped.
///
/// Malformed or unsupported input yields an empty line.
#[must_use]
pub fn extract_line_coordinates(geometry: &Value) -> LineString<f64> {
    LineString::new(parse_geometry(geometry, true).unwrap_or_default())
}

fn parse_geometry(value: &Value, unwrap_feature: bool) -> Option<Vec<Coord<f64>>> {
    let object = value.as_object()?;
    match object.get("type")?.as_str()? {
        "LineString" => parse_positions(object.get("coordinates")?),
        "MultiLineString" => {
            let mut coords = Vec::new();
            for part in object.get("coordinates")?.as_array()? {
                coords.extend(parse_positions(part)?);
            }
            Some(coords)
        }
        "Feature" if unwrap_feature => parse_geometry(object.get("geometry")?, false),
        _ => None,
    }
}

fn parse_positions(value: &Value) -> Option<Vec<Coord<f64>>> {
    value.as_array()?.iter().map(parse_position).collect()
}

fn parse_position(value: &Value) -> Option<Coord<f64>> {
    let position = value.as_array()?;
    let x = position.first()?.as_f64()?;
    let y = position.get(1)?.as_f64()?;
    (x.is_finite() && y.is_finite()).then_some(Coord { x, y })
}

/// Return the lon/lat bounding box of a line, or `None` when it is empty.
#[must_use]
pub fn bounding_box(line: &LineString<f64>) -> Option<Rect<f64>> {
    line.bounding_rect()
}

/// Report whether two boxes overlap.
///
/// Boxes that merely touch along an edge or corner count as intersecting;
/// only a strict gap on either axis separates them.
#[must_use]
pub fn boxes_intersect(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    a.intersects(b)
}

/// Grow a box by `degrees` on every side.
#[must_use]
pub fn expand_box(rect: &Rect<f64>, degrees: f64) -> Rect<f64> {
    let min = rect.min();
    let max = rect.max();
    Rect::new(
        Coord {
            x: min.x - degrees,
            y: min.y - degrees,
        },
        Coord {
            x: max.x + degrees,
            y: max.y + degrees,
        },
    )
}

/// Project a lon/lat coordinate onto a local plane in metres.
///
/// Uses `x = lon * R * cos(lat)` and `y = lat * R` with angles in radians.
#[must_use]
pub fn project_planar(coord: Coord<f64>) -> Coord<f64> {
    let lon = coord.x.to_radians();
    let lat = coord.y.to_radians();
    Coord {
        x: lon * EARTH_RADIUS_M * lat.cos(),
        y: lat * EARTH_RADIUS_M,
    }
}

/// Distance from `p` to the segment `[a, b]`, all in projected metres.
///
/// The scalar projection of `p` onto the segment is clamped to `0.0..=1.0`.
/// A zero-length segment degenerates to the point distance `|p - a|`.
#[must_use]
pub fn point_to_segment_distance(p: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return (p.x - a.x).hypot(p.y - a.y);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    let nearest = Coord {
        x: a.x + t * dx,
        y: a.y + t * dy,
    };
    (p.x - nearest.x).hypot(p.y - nearest.y)
}

/// Reduce `coords` to at most `max_points`, keeping the first and last point.
///
/// Retained points are evenly spaced by index. Inputs already within the
/// limit are returned unchanged. Limits below two are raised to two.
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "index spacing deliberately floors to whole positions"
)]
pub fn downsample(coords: &[Coord<f64>], max_points: usize) -> Vec<Coord<f64>> {
    let limit = max_points.max(2);
    if coords.len() <= limit {
        return coords.to_vec();
    }
    let last = coords.len() - 1;
    (0..limit)
        .filter_map(|i| coords.get(i * last / (limit - 1)).copied())
        .collect()
}

/// Approximate minimum distance in metres between two lon/lat lines.
///
/// Uses [`MAX_LINE_POINTS`]; see [`min_distance_between_lines_with`].
#[must_use]
pub fn min_distance_between_lines(a: &LineString<f64>, b: &LineString<f64>) -> f64 {
    min_distance_between_lines_with(a, b, MAX_LINE_POINTS)
}

/// Approximate minimum distance in metres between two lon/lat lines.
///
/// Each line is downsampled to `max_points` and projected; the result is the
/// smaller of the two vertex-to-polyline minima. Because only vertices are
/// probed, crossing segments whose vertices lie far apart can be
/// overestimated. Returns `f64::INFINITY` when either line is empty.
#[must_use]
pub fn min_distance_between_lines_with(
    a: &LineString<f64>,
    b: &LineString<f64>,
    max_points: usize,
) -> f64 {
    let projected_a = project_line(&a.0, max_points);
    let projected_b = project_line(&b.0, max_points);
    let a_to_b = vertices_to_polyline(&projected_a, &projected_b);
    let b_to_a = vertices_to_polyline(&projected_b, &projected_a);
    a_to_b.min(b_to_a)
}

fn project_line(coords: &[Coord<f64>], max_points: usize) -> Vec<Coord<f64>> {
    downsample(coords, max_points)
        .into_iter()
        .map(project_planar)
        .collect()
}

fn vertices_to_polyline(vertices: &[Coord<f64>], polyline: &[Coord<f64>]) -> f64 {
    vertices
        .iter()
        .map(|&p| point_to_polyline(p, polyline))
        .fold(f64::INFINITY, f64::min)
}

fn point_to_polyline(p: Coord<f64>, polyline: &[Coord<f64>]) -> f64 {
    match polyline {
        [] => f64::INFINITY,
        [only] => point_to_segment_distance(p, *only, *only),
        _ => polyline
            .windows(2)
            .filter_map(|pair| match pair {
                [a, b] => Some(point_to_segment_distance(p, *a, *b)),
                _ => None,
            })
            .fold(f64::INFINITY, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn coord(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[rstest]
    fn extracts_line_string() {
        let line = extract_line_coordinates(&json!({
            "type": "LineString",
            "coordinates": [[1.0, 2.0], [3.0, 4.0]],
        }));
        assert_eq!(line.0, vec![coord(1.0, 2.0), coord(3.0, 4.0)]);
    }

    #[rstest]
    fn concatenates_multi_line_parts_in_order() {
        let line = extract_line_coordinates(&json!({
            "type": "MultiLineString",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0]], [[5.0, 5.0], [6.0, 5.0]]],
        }));
        assert_eq!(
            line.0,
            vec![
                coord(0.0, 0.0),
                coord(1.0, 0.0),
                coord(5.0, 5.0),
                coord(6.0, 5.0)
            ]
        );
    }

    #[rstest]
    fn unwraps_one_feature_level() {
        let line = extract_line_coordinates(&json!({
            "type": "Feature",
            "properties": {},
            "geometry": {"type": "LineString", "coordinates": [[1.0, 1.0], [2.0, 2.0]]},
        }));
        assert_eq!(line.0.len(), 2);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("LineString"))]
    #[case(json!({"type": "Point", "coordinates": [1.0, 2.0]}))]
    #[case(json!({"type": "LineString"}))]
    #[case(json!({"type": "LineString", "coordinates": [[1.0], [2.0, 3.0]]}))]
    #[case(json!({"type": "LineString", "coordinates": [["a", "b"]]}))]
    #[case(json!({"type": "Feature", "geometry": null}))]
    #[case(json!({
        "type": "Feature",
        "geometry": {"type": "Feature", "geometry": {
            "type": "LineString", "coordinates": [[1.0, 1.0], [2.0, 2.0]]
        }}
    }))]
    fn malformed_geometry_is_empty(#[case] geometry: Value) {
        assert!(extract_line_coordinates(&geometry).0.is_empty());
    }

    #[rstest]
    fn bounding_box_is_none_for_empty_line() {
        assert!(bounding_box(&LineString::new(Vec::new())).is_none());
    }

    #[rstest]
    fn bounding_box_spans_all_points() {
        let line = LineString::new(vec![coord(3.0, -1.0), coord(-2.0, 4.0), coord(0.0, 0.0)]);
        let rect = bounding_box(&line).expect("non-empty line has a box");
        assert_eq!(rect.min(), coord(-2.0, -1.0));
        assert_eq!(rect.max(), coord(3.0, 4.0));
    }

    #[rstest]
    #[case(Rect::new(coord(1.0, 0.0), coord(2.0, 1.0)), true)] // shared edge
    #[case(Rect::new(coord(1.0, 1.0), coord(2.0, 2.0)), true)] // shared corner
    #[case(Rect::new(coord(0.5, 0.5), coord(0.6, 0.6)), true)] // contained
    #[case(Rect::new(coord(1.000_001, 0.0), coord(2.0, 1.0)), false)]
    #[case(Rect::new(coord(0.0, -2.0), coord(1.0, -0.000_001)), false)]
    fn boxes_intersect_unless_strictly_apart(#[case] other: Rect<f64>, #[case] expected: bool) {
        let unit = Rect::new(coord(0.0, 0.0), coord(1.0, 1.0));
        assert_eq!(boxes_intersect(&unit, &other), expected);
        assert_eq!(boxes_intersect(&other, &unit), expected);
    }

    #[rstest]
    fn expand_box_grows_every_side() {
        let rect = expand_box(&Rect::new(coord(0.0, 0.0), coord(1.0, 1.0)), 0.5);
        assert_eq!(rect.min(), coord(-0.5, -0.5));
        assert_eq!(rect.max(), coord(1.5, 1.5));
    }

    #[rstest]
    fn projection_matches_equirectangular_formula() {
        let projected = project_planar(coord(1.0, 0.0));
        let expected_x = 1.0_f64.to_radians() * EARTH_RADIUS_M;
        assert!((projected.x - expected_x).abs() < 1e-6);
        assert!(projected.y.abs() < 1e-9);
    }

    #[rstest]
    #[case(coord(5.0, 3.0), 3.0)] // perpendicular foot inside the segment
    #[case(coord(-4.0, 3.0), 5.0)] // clamps to the start
    #[case(coord(13.0, 4.0), 5.0)] // clamps to the end
    fn point_to_segment_uses_clamped_projection(#[case] p: Coord<f64>, #[case] expected: f64) {
        let d = point_to_segment_distance(p, coord(0.0, 0.0), coord(10.0, 0.0));
        assert!((d - expected).abs() < 1e-9, "expected {expected}, got {d}");
    }

    #[rstest]
    fn zero_length_segment_degenerates_to_point_distance() {
        let d = point_to_segment_distance(coord(3.0, 4.0), coord(0.0, 0.0), coord(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[rstest]
    fn downsample_keeps_endpoints_and_bounds_length() {
        let coords: Vec<_> = (0..500).map(|i| coord(f64::from(i), 0.0)).collect();
        let reduced = downsample(&coords, MAX_LINE_POINTS);
        assert_eq!(reduced.len(), MAX_LINE_POINTS);
        assert_eq!(reduced.first(), coords.first());
        assert_eq!(reduced.last(), coords.last());
    }

    #[rstest]
    fn downsample_leaves_short_lines_alone() {
        let coords = vec![coord(0.0, 0.0), coord(1.0, 1.0)];
        assert_eq!(downsample(&coords, MAX_LINE_POINTS), coords);
    }

    #[rstest]
    fn parallel_lines_report_their_separation() {
        // 0.0001 degrees of latitude is roughly 11.1 m.
        let a = LineString::new(vec![coord(13.0, 52.0), coord(13.001, 52.0)]);
        let b = LineString::new(vec![coord(13.0, 52.0001), coord(13.001, 52.0001)]);
        let d = min_distance_between_lines(&a, &b);
        assert!((d - 11.119).abs() < 0.05, "got {d}");
    }

    #[rstest]
    fn empty_line_is_infinitely_far() {
        let a = LineString::new(vec![coord(0.0, 0.0), coord(1.0, 1.0)]);
        let empty = LineString::new(Vec::new());
        assert!(min_distance_between_lines(&a, &empty).is_infinite());
    }
}
