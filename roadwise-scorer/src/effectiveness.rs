//! Route efficiency from distance and duration.
#![expect(
    clippy::float_arithmetic,
    reason = "normalisation and soft thresholds are floating-point maths"
)]

use roadwise_core::{NEUTRAL, RouteCandidate, clamp_unit};

use crate::TiedNormalization;

/// Distance at which a lone route's distance score drops to one half.
pub const DISTANCE_SOFT_THRESHOLD_M: f64 = 3_000.0;

/// Duration at which a lone route's duration score drops to one half.
pub const DURATION_SOFT_THRESHOLD_S: f64 = 1_200.0;

/// Effectiveness of a route judged on its own, without rivals.
///
/// `0.5 / (1 + distance / 3000) + 0.5 / (1 + duration / 1200)`. Negative
/// inputs count as zero; NaN inputs contribute a neutral half score.
///
/// # Examples
/// ```
/// use roadwise_scorer::single_route_effectiveness;
///
/// let score = single_route_effectiveness(1_000.0, 300.0);
/// assert!((score - 0.775).abs() < 1e-12);
/// ```
#[must_use]
pub fn single_route_effectiveness(distance_m: f64, duration_s: f64) -> f64 {
    let distance_score = soft_score(distance_m, DISTANCE_SOFT_THRESHOLD_M);
    let duration_score = soft_score(duration_s, DURATION_SOFT_THRESHOLD_S);
    clamp_unit(0.5 * distance_score + 0.5 * duration_score)
}

fn soft_score(value: f64, threshold: f64) -> f64 {
    if value.is_nan() {
        return NEUTRAL;
    }
    clamp_unit(1.0 / (1.0 + value.max(0.0) / threshold))
}

/// Effectiveness for every candidate, in input order.
///
/// A single candidate uses [`single_route_effectiveness`]. Larger sets
/// min–max normalise distance and duration across the set so that the
/// shortest and fastest route scores highest; when all candidates share a
/// value, `tied` decides its normalised value.
///
/// # Examples
/// ```
/// use roadwise_core::RouteCandidate;
/// use roadwise_scorer::{TiedNormalization, effectiveness_scores};
/// use serde_json::json;
///
/// let short = RouteCandidate::new("a", "p", 1_000.0, 200.0, json!(null));
/// let long = RouteCandidate::new("b", "p", 2_000.0, 400.0, json!(null));
/// let scores = effectiveness_scores(&[short, long], TiedNormalization::Neutral);
/// assert_eq!(scores, vec![1.0, 0.0]);
/// ```
#[must_use]
pub fn effectiveness_scores(candidates: &[RouteCandidate], tied: TiedNormalization) -> Vec<f64> {
    match candidates {
        [] => Vec::new(),
        [only] => vec![single_route_effectiveness(only.distance_m, only.duration_s)],
        _ => {
            let distances = Normaliser::over(candidates.iter().map(|c| c.distance_m), tied);
            let durations = Normaliser::over(candidates.iter().map(|c| c.duration_s), tied);
            candidates
                .iter()
                .map(|candidate| {
                    let distance = distances.normalise(candidate.distance_m);
                    let duration = durations.normalise(candidate.duration_s);
                    clamp_unit(0.5 * (1.0 - distance) + 0.5 * (1.0 - duration))
                })
                .collect()
        }
    }
}

/// Min–max normaliser over the finite values of one cost dimension.
#[derive(Debug, Clone, Copy)]
struct Normaliser {
    min: f64,
    max: f64,
    tied: TiedNormalization,
}

impl Normaliser {
    fn over(values: impl Iterator<Item = f64>, tied: TiedNormalization) -> Self {
        let (min, max) = values
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            });
        Self { min, max, tied }
    }

    fn normalise(self, value: f64) -> f64 {
        if self.max > self.min {
            clamp_unit((value - self.min) / (self.max - self.min))
        } else {
            self.tied.value()
        }
    }
}
