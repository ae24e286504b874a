//! Property-based tests for route ranking and condition merging.
//!
//! # Invariants tested
//!
//! - **Contiguous ranks:** ranks run from one to the number of candidates.
//! - **Ordering:** scores never increase down the ranking.
//! - **Bounded scores:** every score and component lies in `0.0..=1.0`,
//!   including for non-finite distances and durations.
//! - **Freshness decay:** older evidence never weighs more than newer.
//! - **Merge consistency:** the winner holds at least an even share of the tally.
#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]
#![expect(
    clippy::float_arithmetic,
    reason = "generators and bounds use floating-point maths"
)]

use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;
use roadwise_core::test_support::MemorySegmentStore;
use roadwise_core::{ConditionReport, RoadCondition, RoadSegment, RouteCandidate};
use roadwise_scorer::{
    CachedSummaryProvider, MergeConfig, RouteQualityEngine, freshness_weight, merge_reports,
};
use serde_json::json;

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_760_000_000, 0).expect("valid fixed timestamp")
}

fn cost() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.0_f64..50_000.0,
        1 => Just(f64::INFINITY),
        1 => Just(f64::NAN),
        1 => Just(-1.0_f64),
    ]
}

fn condition() -> impl Strategy<Value = RoadCondition> {
    prop::sample::select(RoadCondition::ALL.to_vec())
}

fn candidates() -> impl Strategy<Value = Vec<RouteCandidate>> {
    prop::collection::vec((cost(), cost(), -0.01_f64..0.01), 0..8).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (distance, duration, offset))| {
                RouteCandidate::new(
                    format!("route-{index}"),
                    "prop",
                    distance,
                    duration,
                    json!({
                        "type": "LineString",
                        "coordinates": [[13.40, 52.52 + offset], [13.41, 52.52 + offset]],
                    }),
                )
            })
            .collect()
    })
}

fn segments() -> Vec<RoadSegment> {
    let at = now();
    RoadCondition::ALL
        .iter()
        .zip(0_u32..)
        .map(|(&condition, index)| {
            let latitude = 52.515 + f64::from(index) * 0.004;
            RoadSegment::new(
                u64::from(index),
                json!({
                    "type": "LineString",
                    "coordinates": [[13.40, latitude], [13.41, latitude]],
                }),
            )
            .with_cached_summary(roadwise_core::MergedConditionSummary {
                winning_condition: condition,
                confidence: 0.8,
                report_count: 5,
                latest_timestamp: Some(at),
            })
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every candidate is ranked once, best first, with bounded scores.
    #[test]
    fn ranking_is_complete_ordered_and_bounded(candidates in candidates()) {
        let engine = RouteQualityEngine::new(
            MemorySegmentStore::with_segments(segments()),
            CachedSummaryProvider,
        );
        let count = candidates.len();
        let ranked = engine.rank(candidates, now());

        prop_assert_eq!(ranked.len(), count);
        let ranks: Vec<_> = ranked.iter().map(|r| r.rank).collect();
        prop_assert_eq!(ranks, (1..=count).collect::<Vec<_>>());
        for pair in ranked.windows(2) {
            if let [higher, lower] = pair {
                prop_assert!(higher.score >= lower.score);
            }
        }
        for route in &ranked {
            prop_assert!((0.0..=1.0).contains(&route.score));
            prop_assert!((0.0..=1.0).contains(&route.breakdown.effectiveness));
            prop_assert!((0.0..=1.0).contains(&route.breakdown.quality));
            prop_assert!((0.0..=1.0).contains(&route.breakdown.evidence));
        }
    }

    /// Freshness never increases with age and stays within the unit range.
    #[test]
    fn freshness_is_monotone_in_age(
        younger in 0_i64..10_000,
        extra in 0_i64..10_000,
        half_life in 0.5_f64..365.0,
    ) {
        let at = now();
        let newer = freshness_weight(Some(at - TimeDelta::hours(younger)), at, half_life);
        let older =
            freshness_weight(Some(at - TimeDelta::hours(younger + extra)), at, half_life);
        prop_assert!(older <= newer);
        prop_assert!((0.0..=1.0).contains(&newer));
        prop_assert!((0.0..=1.0).contains(&older));
    }

    /// The winning condition is among the reported ones and holds the
    /// largest share of the weighted tally.
    #[test]
    fn merged_winner_is_a_reported_condition(
        entries in prop::collection::vec((condition(), prop::option::of(0_i64..400)), 1..40),
    ) {
        let at = now();
        let reports: Vec<_> = entries
            .iter()
            .map(|&(condition, age)| {
                ConditionReport::new(7, condition, age.map(|days| at - TimeDelta::days(days)))
            })
            .collect();
        let summary = merge_reports(&reports, at, &MergeConfig::default())
            .expect("non-empty reports merge");
        prop_assert!(reports.iter().any(|r| r.condition == summary.winning_condition));
        prop_assert_eq!(summary.report_count, reports.len());
        prop_assert!((0.0..=1.0).contains(&summary.confidence));
        let distinct = RoadCondition::ALL
            .iter()
            .filter(|c| reports.iter().any(|r| r.condition == **c))
            .count();
        let floor = 1.0 / f64::from(u32::try_from(distinct).expect("at most four conditions"));
        prop_assert!(summary.confidence >= floor - 1e-9);
    }
}
