//! Guards for probability-like values.

/// Score representing "no information": neither penalising nor favouring.
pub const NEUTRAL: f64 = 0.5;

/// Clamp a probability-like value into `0.0..=1.0`.
///
/// `NaN` maps to [`NEUTRAL`]; infinities saturate at the matching bound.
///
/// # Examples
/// ```
/// use roadwise_core::clamp_unit;
///
/// assert_eq!(clamp_unit(1.7), 1.0);
/// assert_eq!(clamp_unit(f64::NAN), 0.5);
/// assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
/// ```
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return NEUTRAL;
    }
    value.clamp(0.0, 1.0)
}
