//! Interchangeable sources of per-segment condition consensus.
//!
//! [`CachedSummaryProvider`] trusts the summary the persistence layer attached
//! to each segment. [`LiveMergeProvider`] ignores any cache and merges the
//! segment's publishable reports on the fly. Callers choose one; neither
//! falls back to the other.
//!
//! The merge parameters belong to the caller: the engine hands its own
//! [`MergeConfig`] to the provider on every request, so the report cap and
//! half-life used for merging match those used for aggregation.

use chrono::{DateTime, Utc};
use roadwise_core::{MergedConditionSummary, ReportStore, RoadSegment};

use crate::{MergeConfig, merge_reports};

/// Produce the condition consensus for a segment.
///
/// Implementations must be thread-safe so segments can be summarised across
/// threads. Returning `None` means "no evidence" and is never an error.
///
/// # Examples
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use roadwise_core::{MergedConditionSummary, RoadSegment};
/// use roadwise_scorer::{MergeConfig, SummaryProvider};
/// use serde_json::json;
///
/// struct NoEvidence;
///
/// impl SummaryProvider for NoEvidence {
///     fn summary(
///         &self,
///         _segment: &RoadSegment,
///         _now: DateTime<Utc>,
///         _merge: &MergeConfig,
///     ) -> Option<MergedConditionSummary> {
///         None
///     }
/// }
///
/// let segment = RoadSegment::new(1, json!(null));
/// assert!(NoEvidence.summary(&segment, Utc::now(), &MergeConfig::default()).is_none());
/// ```
pub trait SummaryProvider: Send + Sync {
    /// Return the consensus for `segment` as of `now`, if any evidence
    /// exists. Providers that merge reports do so with `merge`.
    fn summary(
        &self,
        segment: &RoadSegment,
        now: DateTime<Utc>,
        merge: &MergeConfig,
    ) -> Option<MergedConditionSummary>;
}

/// Provider that returns the segment's cached summary, if any.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use roadwise_core::{MergedConditionSummary, RoadCondition, RoadSegment};
/// use roadwise_scorer::{CachedSummaryProvider, MergeConfig, SummaryProvider};
/// use serde_json::json;
///
/// let cached = MergedConditionSummary {
///     winning_condition: RoadCondition::Medium,
///     confidence: 0.9,
///     report_count: 4,
///     latest_timestamp: None,
/// };
/// let segment = RoadSegment::new(1, json!(null)).with_cached_summary(cached);
/// let summary = CachedSummaryProvider.summary(&segment, Utc::now(), &MergeConfig::default());
/// assert_eq!(summary, Some(cached));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CachedSummaryProvider;

impl SummaryProvider for CachedSummaryProvider {
    fn summary(
        &self,
        segment: &RoadSegment,
        _now: DateTime<Utc>,
        _merge: &MergeConfig,
    ) -> Option<MergedConditionSummary> {
        segment.cached_summary
    }
}

/// Provider that merges a segment's reports at request time.
///
/// Report store failures are logged and treated as absence of evidence.
#[derive(Debug, Clone)]
pub struct LiveMergeProvider<R>
where
    R: ReportStore,
{
    reports: R,
}

impl<R> LiveMergeProvider<R>
where
    R: ReportStore,
{
    /// Construct a provider reading from `reports`.
    pub const fn new(reports: R) -> Self {
        Self { reports }
    }
}

impl<R> SummaryProvider for LiveMergeProvider<R>
where
    R: ReportStore,
{
    fn summary(
        &self,
        segment: &RoadSegment,
        now: DateTime<Utc>,
        merge: &MergeConfig,
    ) -> Option<MergedConditionSummary> {
        match self
            .reports
            .publishable_reports(segment.id, merge.report_limit())
        {
            Ok(reports) => merge_reports(&reports, now, merge),
            Err(err) => {
                log::warn!(
                    "reports for segment {} unavailable, treating as no evidence: {err}",
                    segment.id
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use roadwise_core::test_support::{FailingStore, MemoryReportStore};
    use roadwise_core::{ConditionReport, RoadCondition};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000, 0).expect("valid fixed timestamp")
    }

    #[fixture]
    fn merge() -> MergeConfig {
        MergeConfig::default()
    }

    #[rstest]
    fn cached_provider_without_cache_has_no_evidence(now: DateTime<Utc>, merge: MergeConfig) {
        let segment = RoadSegment::new(1, json!(null));
        assert!(CachedSummaryProvider.summary(&segment, now, &merge).is_none());
    }

    #[rstest]
    fn live_provider_merges_newest_reports(now: DateTime<Utc>, merge: MergeConfig) {
        let store = MemoryReportStore::with_reports([
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(200))),
            ConditionReport::new(1, RoadCondition::Optimal, Some(now)),
            ConditionReport::new(2, RoadCondition::Maintenance, Some(now)),
        ]);
        let provider = LiveMergeProvider::new(store);
        let summary = provider
            .summary(&RoadSegment::new(1, json!(null)), now, &merge)
            .expect("segment 1 has reports");
        assert_eq!(summary.winning_condition, RoadCondition::Optimal);
        assert_eq!(summary.report_count, 2);
        assert_eq!(summary.latest_timestamp, Some(now));
    }

    #[rstest]
    fn live_provider_caps_reports_with_the_given_config(now: DateTime<Utc>) {
        let store = MemoryReportStore::with_reports([
            ConditionReport::new(1, RoadCondition::Optimal, Some(now)),
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(1))),
            ConditionReport::new(1, RoadCondition::Maintenance, Some(now - TimeDelta::days(2))),
        ]);
        let provider = LiveMergeProvider::new(store);
        let merge = MergeConfig {
            max_reports: 1,
            ..MergeConfig::default()
        };
        let summary = provider
            .summary(&RoadSegment::new(1, json!(null)), now, &merge)
            .expect("segment 1 has reports");
        assert_eq!(summary.winning_condition, RoadCondition::Optimal);
        assert_eq!(summary.report_count, 1);
    }

    #[rstest]
    fn live_provider_ignores_cached_summary(now: DateTime<Utc>, merge: MergeConfig) {
        let cached = MergedConditionSummary {
            winning_condition: RoadCondition::Optimal,
            confidence: 1.0,
            report_count: 10,
            latest_timestamp: Some(now),
        };
        let segment = RoadSegment::new(1, json!(null)).with_cached_summary(cached);
        let provider = LiveMergeProvider::new(MemoryReportStore::default());
        assert!(provider.summary(&segment, now, &merge).is_none());
    }

    #[rstest]
    fn live_provider_treats_store_failure_as_no_evidence(now: DateTime<Utc>, merge: MergeConfig) {
        let provider = LiveMergeProvider::new(FailingStore);
        assert!(
            provider
                .summary(&RoadSegment::new(1, json!(null)), now, &merge)
                .is_none()
        );
    }
}
