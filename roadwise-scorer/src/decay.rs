//! Recency and evidence-volume weights for condition consensus.
#![expect(
    clippy::float_arithmetic,
    reason = "exponential decay and saturation curves are floating-point maths"
)]

use chrono::{DateTime, Utc};
use roadwise_core::clamp_unit;

/// Default number of days over which a report's influence halves.
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 30.0;

/// Freshness assigned to evidence without a timestamp.
pub const UNDATED_FRESHNESS: f64 = 0.4;

const MILLIS_PER_DAY: f64 = 86_400_000.0;
const EVIDENCE_GAIN_RATE: f64 = 0.35;

/// Exponential decay factor for evidence created at `timestamp`.
///
/// Returns `0.5 ^ (age_days / half_life_days)` where the age is measured up
/// to `now` and never negative, so future timestamps weigh `1.0`. A missing
/// timestamp or an unusable half-life yields [`UNDATED_FRESHNESS`].
///
/// # Examples
/// ```
/// use chrono::{TimeDelta, Utc};
/// use roadwise_scorer::freshness_weight;
///
/// let now = Utc::now();
/// assert_eq!(freshness_weight(Some(now), now, 30.0), 1.0);
/// assert_eq!(freshness_weight(Some(now - TimeDelta::days(30)), now, 30.0), 0.5);
/// assert_eq!(freshness_weight(None, now, 30.0), 0.4);
/// ```
#[must_use]
pub fn freshness_weight(
    timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    half_life_days: f64,
) -> f64 {
    let Some(created_at) = timestamp else {
        return UNDATED_FRESHNESS;
    };
    if !(half_life_days.is_finite() && half_life_days > 0.0) {
        return UNDATED_FRESHNESS;
    }
    clamp_unit(0.5_f64.powf(age_in_days(created_at, now) / half_life_days))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "millisecond ages stay far below f64's exact integer range"
)]
fn age_in_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - created_at).num_milliseconds().max(0);
    millis as f64 / MILLIS_PER_DAY
}

/// Trust placed in a segment's consensus given its report volume and prior
/// confidence.
///
/// `0.5 * (1 - e^(-0.35 * report_count)) + 0.5 * prior_confidence`; the
/// first few reports contribute most of the gain. The prior is clamped to
/// `0.0..=1.0` (NaN counts as `0.5`).
///
/// # Examples
/// ```
/// use roadwise_scorer::evidence_weight;
///
/// assert_eq!(evidence_weight(0, 0.0), 0.0);
/// assert!(evidence_weight(3, 1.0) > evidence_weight(1, 1.0));
/// assert!(evidence_weight(1_000, 1.0) <= 1.0);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "report counts are bounded by the per-segment report limit"
)]
pub fn evidence_weight(report_count: usize, prior_confidence: f64) -> f64 {
    let volume = 1.0 - (-EVIDENCE_GAIN_RATE * report_count as f64).exp();
    clamp_unit(0.5 * volume + 0.5 * clamp_unit(prior_confidence))
}
