use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::{ interval, Duration, MissedTickBehavior };

use crate::alerts::AlertEvaluator;
use crate::models::RunOutcome;
use crate::services::MetricsService;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub alerts_evaluated: u64,
    pub alerts_triggered: u64,
    pub duration_ms: i64,
}

/// One evaluation run followed by folding its counts into the counters store.
///
/// Runs on the same job never overlap: a caller arriving mid-run waits for it
/// to finish and then performs its own run.
pub struct AlertJob {
    evaluator: Arc<AlertEvaluator>,
    metrics: Arc<MetricsService>,
    run_lock: Mutex<()>,
}

impl AlertJob {
    pub fn new(evaluator: Arc<AlertEvaluator>, metrics: Arc<MetricsService>) -> Self {
        Self {
            evaluator,
            metrics,
            run_lock: Mutex::new(()),
        }
    }

    pub async fn run_once(&self) -> RunReport {
        let _guard = self.run_lock.lock().await;

        let started = Instant::now();
        let outcome = self.evaluator.run().await;
        let duration_ms = started.elapsed().as_millis() as i64;
        let metrics = outcome.metrics();

        let error = match outcome {
            RunOutcome::Completed(_) => {
                // Counter failures never fail the run itself.
                if let Err(e) = self.metrics.record_run(metrics, duration_ms, Utc::now()).await {
                    tracing::warn!("Failed to record alert run metrics: {}", e);
                }
                None
            }
            RunOutcome::Failed { error } => Some(error),
        };

        RunReport {
            success: error.is_none(),
            error,
            alerts_evaluated: metrics.alerts_evaluated,
            alerts_triggered: metrics.alerts_triggered,
            duration_ms,
        }
    }

    /// Run forever on a fixed period. Ticks missed during a slow run are
    /// skipped, so runs never overlap or bunch up.
    pub async fn start(self: Arc<Self>, period: Duration) {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let report = self.run_once().await;
            if !report.success {
                tracing::error!(
                    "Scheduled alert run failed: {}",
                    report.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::CooldownGuard;
    use crate::enums::AlertOperator;
    use crate::notifications::NotificationDispatcher;
    use crate::services::metrics_service::RUNS_TOTAL;
    use crate::testing::*;

    fn job(alerts: InMemoryAlertRepository, counters: Arc<InMemoryCountersStore>) -> AlertJob {
        let dispatcher = Arc::new(
            NotificationDispatcher::new(
                Arc::new(RecordingNotificationRepository::default()),
                None,
                vec![]
            )
        );
        let evaluator = Arc::new(
            AlertEvaluator::new(
                Arc::new(alerts),
                Arc::new(InMemorySnapshotRepository::default()),
                Arc::new(StaticPriceOracle::with(&[("eth", 150.0)])),
                dispatcher,
                CooldownGuard::default()
            )
        );
        AlertJob::new(evaluator, Arc::new(MetricsService::new(counters)))
    }

    #[tokio::test]
    async fn test_completed_run_is_recorded() {
        let counters = Arc::new(InMemoryCountersStore::default());
        let job = job(
            InMemoryAlertRepository::with(vec![price_alert("eth", AlertOperator::Above, 100.0)]),
            counters.clone()
        );

        let report = job.run_once().await;
        assert!(report.success);
        assert_eq!(report.error, None);
        assert_eq!(report.alerts_evaluated, 1);
        assert_eq!(report.alerts_triggered, 1);

        assert_eq!(counters.values.lock().await.get(RUNS_TOTAL).copied(), Some(1));
    }

    #[tokio::test]
    async fn test_concurrent_runs_do_not_double_fire() {
        let counters = Arc::new(InMemoryCountersStore::default());
        let job = job(
            InMemoryAlertRepository::with(vec![price_alert("eth", AlertOperator::Above, 100.0)]),
            counters.clone()
        );

        let (first, second) = tokio::join!(job.run_once(), job.run_once());

        assert_eq!(first.alerts_triggered + second.alerts_triggered, 1);
        assert_eq!(counters.values.lock().await.get(RUNS_TOTAL).copied(), Some(2));
    }

    #[tokio::test]
    async fn test_failed_run_is_not_recorded() {
        let counters = Arc::new(InMemoryCountersStore::default());
        let job = job(
            InMemoryAlertRepository { fail_load: true, ..Default::default() },
            counters.clone()
        );

        let report = job.run_once().await;
        assert!(!report.success);
        assert!(report.error.is_some());
        assert_eq!(report.alerts_evaluated, 0);
        assert_eq!(report.alerts_triggered, 0);

        assert!(counters.values.lock().await.is_empty());
    }
}
