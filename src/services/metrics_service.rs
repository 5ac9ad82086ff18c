use std::sync::Arc;

use chrono::{ DateTime, Utc };
use serde::Serialize;

use crate::db::CountersStore;
use crate::error::Result;
use crate::models::AlertProcessingMetrics;

pub const EVALUATED_TOTAL: &str = "evaluated_total";
pub const TRIGGERED_TOTAL: &str = "triggered_total";
pub const RUNS_TOTAL: &str = "runs_total";
pub const DURATION_TOTAL_MS: &str = "duration_total_ms";
pub const LAST_RUN_AT: &str = "last_run_at";
pub const LAST_DURATION_MS: &str = "last_duration_ms";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStats {
    pub evaluated_total: i64,
    pub triggered_total: i64,
    pub runs_total: i64,
    pub duration_total_ms: i64,
    pub avg_duration_ms: Option<i64>,
    pub last_run_at: Option<DateTime<Utc>>,
    pub last_duration_ms: Option<i64>,
}

/// Folds per-run counts into cumulative counters.
///
/// Each counter is read, incremented and written back separately, so runs
/// from two processes sharing a store can lose an update.
pub struct MetricsService {
    store: Arc<dyn CountersStore>,
}

impl MetricsService {
    pub fn new(store: Arc<dyn CountersStore>) -> Self {
        Self { store }
    }

    pub async fn record_run(
        &self,
        metrics: AlertProcessingMetrics,
        duration_ms: i64,
        finished_at: DateTime<Utc>
    ) -> Result<()> {
        self.increment(EVALUATED_TOTAL, metrics.alerts_evaluated as i64).await?;
        self.increment(TRIGGERED_TOTAL, metrics.alerts_triggered as i64).await?;
        self.increment(RUNS_TOTAL, 1).await?;
        self.increment(DURATION_TOTAL_MS, duration_ms).await?;
        self.store.set(LAST_RUN_AT, finished_at.timestamp_millis()).await?;
        self.store.set(LAST_DURATION_MS, duration_ms).await?;
        Ok(())
    }

    pub async fn stats(&self) -> Result<AlertStats> {
        let evaluated_total = self.store.get(EVALUATED_TOTAL).await?.unwrap_or(0);
        let triggered_total = self.store.get(TRIGGERED_TOTAL).await?.unwrap_or(0);
        let runs_total = self.store.get(RUNS_TOTAL).await?.unwrap_or(0);
        let duration_total_ms = self.store.get(DURATION_TOTAL_MS).await?.unwrap_or(0);
        let last_run_at = self.store
            .get(LAST_RUN_AT).await?
            .and_then(DateTime::<Utc>::from_timestamp_millis);
        let last_duration_ms = self.store.get(LAST_DURATION_MS).await?;

        let avg_duration_ms = if runs_total > 0 {
            Some(duration_total_ms / runs_total)
        } else {
            None
        };

        Ok(AlertStats {
            evaluated_total,
            triggered_total,
            runs_total,
            duration_total_ms,
            avg_duration_ms,
            last_run_at,
            last_duration_ms,
        })
    }

    async fn increment(&self, key: &str, by: i64) -> Result<()> {
        let current = self.store.get(key).await?.unwrap_or(0);
        self.store.set(key, current.saturating_add(by)).await
    }
}
