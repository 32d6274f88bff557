//! Settle-all aggregation of the three analytics sources.

use std::future::Future;
use std::sync::Arc;

use taskdash_client::AnalyticsSource;
use taskdash_core::{AggregateOutcome, CycleId, OutcomeStatus, SourceFailure, SourceKind, SourceResult};
use tracing::{debug, error, info, warn};

/// Fetches the three analytics summaries and folds them into one outcome.
pub struct Aggregator<S: AnalyticsSource> {
    source: Arc<S>,
}

impl<S: AnalyticsSource> Aggregator<S> {
    /// Create a new aggregator.
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Create an aggregator over a shared source.
    pub fn from_shared(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Run one aggregation cycle.
    ///
    /// All three reads are in flight at once and every one of them is awaited
    /// to completion; a failed read leaves its slot empty and never affects the
    /// other two. This never fails: the worst case is an `AllFailed` outcome.
    pub async fn aggregate(&self) -> AggregateOutcome {
        let cycle = CycleId::new();
        info!("Fetching analytics data (cycle {})", cycle);

        let (completion_stats, productivity_patterns, duration_analysis) = tokio::join!(
            settle(cycle, SourceKind::CompletionStats, self.source.completion_stats()),
            settle(cycle, SourceKind::ProductivityPatterns, self.source.productivity_patterns()),
            settle(cycle, SourceKind::DurationAnalysis, self.source.duration_analysis()),
        );

        let outcome =
            AggregateOutcome::from_results(completion_stats, productivity_patterns, duration_analysis)
                .with_cycle(cycle);

        match outcome.status {
            OutcomeStatus::AllOk => info!("Loaded all analytics sources (cycle {})", cycle),
            OutcomeStatus::PartialOk => warn!(
                "Loaded {} of {} analytics sources (cycle {})",
                outcome.loaded_count(),
                SourceKind::ALL.len(),
                cycle
            ),
            OutcomeStatus::AllFailed => error!("No analytics source could be loaded (cycle {})", cycle),
        }

        outcome
    }
}

/// Await one read and convert its error into a [`SourceFailure`].
async fn settle<T>(
    cycle: CycleId,
    kind: SourceKind,
    read: impl Future<Output = taskdash_client::Result<T>>,
) -> SourceResult<T> {
    match read.await {
        Ok(payload) => {
            debug!("Loaded {} (cycle {})", kind, cycle);
            Ok(payload)
        }
        Err(e) => {
            error!("Error fetching {} (cycle {}): {}", kind, cycle, e);
            Err(SourceFailure::new(kind, e))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use taskdash_client::ClientError;
    use taskdash_core::{
        CompletionStats, DurationAnalysis, ProductivityPatterns, StatusCount, ALL_FAILED_MESSAGE,
        PARTIAL_MESSAGE,
    };

    /// How a mock read behaves.
    #[derive(Clone, Copy)]
    pub(crate) enum Read {
        Ok,
        Fail,
        OkAfter(u64),
        FailAfter(u64),
    }

    impl Read {
        async fn run<T>(self, payload: T) -> taskdash_client::Result<T> {
            match self {
                Read::Ok => Ok(payload),
                Read::Fail => Err(unavailable()),
                Read::OkAfter(ms) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(payload)
                }
                Read::FailAfter(ms) => {
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Err(unavailable())
                }
            }
        }
    }

    fn unavailable() -> ClientError {
        ClientError::Status {
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    pub(crate) struct MockSource {
        completion: Read,
        productivity: Read,
        duration: Read,
        calls: AtomicUsize,
    }

    impl MockSource {
        pub(crate) fn new(completion: Read, productivity: Read, duration: Read) -> Self {
            Self {
                completion,
                productivity,
                duration,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AnalyticsSource for MockSource {
        async fn completion_stats(&self) -> taskdash_client::Result<CompletionStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.completion
                .run(CompletionStats {
                    status_distribution: Some(vec![
                        StatusCount::new("success", 7),
                        StatusCount::new("failure", 3),
                    ]),
                    weekly_completion: Some(Vec::new()),
                })
                .await
        }

        async fn productivity_patterns(&self) -> taskdash_client::Result<ProductivityPatterns> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.productivity
                .run(ProductivityPatterns {
                    avg_completion_time_hours: Some(2.5),
                    creation_hour_distribution: None,
                })
                .await
        }

        async fn duration_analysis(&self) -> taskdash_client::Result<DurationAnalysis> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.duration
                .run(DurationAnalysis(json!({ "buckets": [] })))
                .await
        }
    }

    #[tokio::test]
    async fn test_all_sources_ok() {
        let aggregator = Aggregator::new(MockSource::new(Read::Ok, Read::Ok, Read::Ok));
        let outcome = aggregator.aggregate().await;

        assert_eq!(outcome.status, OutcomeStatus::AllOk);
        assert_eq!(outcome.loaded_count(), 3);
        assert!(outcome.message().is_none());
    }

    #[tokio::test]
    async fn test_all_sources_failed() {
        let aggregator = Aggregator::new(MockSource::new(Read::Fail, Read::Fail, Read::Fail));
        let outcome = aggregator.aggregate().await;

        assert_eq!(outcome.status, OutcomeStatus::AllFailed);
        assert_eq!(outcome.message(), Some(ALL_FAILED_MESSAGE));
        assert!(outcome.completion_stats.is_none());
        assert!(outcome.productivity_patterns.is_none());
        assert!(outcome.duration_analysis.is_none());
        assert_eq!(outcome.failures.len(), 3);
    }

    #[tokio::test]
    async fn test_productivity_failure_is_partial() {
        let aggregator = Aggregator::new(MockSource::new(Read::Ok, Read::Fail, Read::Ok));
        let outcome = aggregator.aggregate().await;

        assert_eq!(outcome.status, OutcomeStatus::PartialOk);
        assert_eq!(outcome.message(), Some(PARTIAL_MESSAGE));
        assert!(outcome.completion_stats.is_some());
        assert!(outcome.productivity_patterns.is_none());
        assert!(outcome.duration_analysis.is_some());
        assert_eq!(outcome.failures[0].kind, SourceKind::ProductivityPatterns);
        assert!(outcome.failures[0].cause.contains("503"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_run_concurrently() {
        let aggregator = Aggregator::new(MockSource::new(
            Read::OkAfter(100),
            Read::OkAfter(100),
            Read::OkAfter(100),
        ));

        let start = tokio::time::Instant::now();
        let outcome = aggregator.aggregate().await;
        let elapsed = start.elapsed();

        assert_eq!(outcome.status, OutcomeStatus::AllOk);
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(200), "reads ran sequentially: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_failure_does_not_cancel_slow_reads() {
        let aggregator = Aggregator::new(MockSource::new(
            Read::OkAfter(300),
            Read::Fail,
            Read::OkAfter(50),
        ));

        let start = tokio::time::Instant::now();
        let outcome = aggregator.aggregate().await;

        assert!(start.elapsed() >= Duration::from_millis(300));
        assert_eq!(outcome.status, OutcomeStatus::PartialOk);
        assert!(outcome.completion_stats.is_some());
        assert!(outcome.duration_analysis.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_order_does_not_matter() {
        let fast_first = Aggregator::new(MockSource::new(
            Read::OkAfter(10),
            Read::FailAfter(20),
            Read::OkAfter(30),
        ))
        .aggregate()
        .await;
        let slow_first = Aggregator::new(MockSource::new(
            Read::OkAfter(30),
            Read::FailAfter(20),
            Read::OkAfter(10),
        ))
        .aggregate()
        .await;

        assert_eq!(fast_first.status, slow_first.status);
        assert_eq!(fast_first.completion_stats, slow_first.completion_stats);
        assert_eq!(fast_first.productivity_patterns, slow_first.productivity_patterns);
        assert_eq!(fast_first.duration_analysis, slow_first.duration_analysis);
        assert_eq!(fast_first.failures, slow_first.failures);
    }

    #[tokio::test]
    async fn test_each_cycle_is_fresh() {
        let source = Arc::new(MockSource::new(Read::Ok, Read::Fail, Read::Ok));
        let aggregator = Aggregator::from_shared(source.clone());

        let first = aggregator.aggregate().await;
        let second = aggregator.aggregate().await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 6);
        assert_ne!(first.cycle, second.cycle);
        assert_eq!(first.status, second.status);
        assert_eq!(second.failures.len(), 1);
    }
}
