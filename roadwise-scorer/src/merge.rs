//! Collapse a segment's condition reports into one weighted consensus.
//!
//! Each report votes for its condition with its freshness weight. The
//! condition with the heaviest tally wins; its share of the total tally is the
//! summary's confidence.
//!
//! Ties are resolved explicitly: tallies are kept in the order conditions are
//! first seen, and a later condition must strictly exceed the leader to take
//! over. Because reports arrive newest first, a tie goes to the condition of
//! the most recent report among the tied conditions.
#![expect(
    clippy::float_arithmetic,
    reason = "tallies accumulate floating-point freshness weights"
)]

use chrono::{DateTime, Utc};
use roadwise_core::{ConditionReport, MergedConditionSummary, NEUTRAL, RoadCondition, clamp_unit};

use crate::MergeConfig;
use crate::decay::freshness_weight;

/// Merge `reports` into a consensus summary.
///
/// `reports` must be publishable and ordered newest first; only the first
/// [`MergeConfig::report_limit`] are considered. Returns `None` when there is
/// nothing to merge.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use roadwise_core::{ConditionReport, RoadCondition};
/// use roadwise_scorer::{MergeConfig, merge_reports};
///
/// let now = Utc::now();
/// let reports = [ConditionReport::new(1, RoadCondition::Optimal, Some(now))];
/// let summary = merge_reports(&reports, now, &MergeConfig::default()).expect("one report");
/// assert_eq!(summary.winning_condition, RoadCondition::Optimal);
/// assert_eq!(summary.confidence, 1.0);
///
/// assert!(merge_reports(&[], now, &MergeConfig::default()).is_none());
/// ```
#[must_use]
pub fn merge_reports(
    reports: &[ConditionReport],
    now: DateTime<Utc>,
    config: &MergeConfig,
) -> Option<MergedConditionSummary> {
    let considered = reports.get(..config.report_limit()).unwrap_or(reports);
    let tallies = tally(considered, now, config.half_life_days);
    let (winning_condition, winning_tally) = leader(&tallies)?;
    let total: f64 = tallies.iter().map(|&(_, weight)| weight).sum();
    let confidence = if total > 0.0 {
        clamp_unit(winning_tally / total)
    } else {
        NEUTRAL
    };
    Some(MergedConditionSummary {
        winning_condition,
        confidence,
        report_count: considered.len(),
        latest_timestamp: considered
            .iter()
            .filter_map(|report| report.created_at)
            .max(),
    })
}

fn tally(
    reports: &[ConditionReport],
    now: DateTime<Utc>,
    half_life_days: f64,
) -> Vec<(RoadCondition, f64)> {
    let mut tallies: Vec<(RoadCondition, f64)> = Vec::with_capacity(RoadCondition::ALL.len());
    for report in reports {
        let weight = freshness_weight(report.created_at, now, half_life_days);
        match tallies
            .iter_mut()
            .find(|(condition, _)| *condition == report.condition)
        {
            Some((_, total)) => *total += weight,
            None => tallies.push((report.condition, weight)),
        }
    }
    tallies
}

fn leader(tallies: &[(RoadCondition, f64)]) -> Option<(RoadCondition, f64)> {
    tallies
        .iter()
        .copied()
        .fold(None, |best, (condition, weight)| match best {
            Some((_, best_weight)) if weight <= best_weight => best,
            _ => Some((condition, weight)),
        })
}
