use std::collections::HashMap;
use std::sync::Arc;

use chrono::{ DateTime, Utc };
use tokio::task::JoinSet;

use crate::alerts::condition;
use crate::alerts::cooldown::CooldownGuard;
use crate::alerts::crossing;
use crate::db::{ AlertRepository, SnapshotRepository };
use crate::enums::AlertType;
use crate::error::Result;
use crate::models::{ Alert, AlertProcessingMetrics, RunOutcome, TriggerContext };
use crate::notifications::NotificationDispatcher;
use crate::providers::PriceOracle;

/// Sweeps every enabled alert once, fires the ones whose condition newly
/// holds and hands them to the notification dispatcher.
pub struct AlertEvaluator {
    alerts: Arc<dyn AlertRepository>,
    snapshots: Arc<dyn SnapshotRepository>,
    prices: Arc<dyn PriceOracle>,
    dispatcher: Arc<NotificationDispatcher>,
    cooldown: CooldownGuard,
}

impl AlertEvaluator {
    pub fn new(
        alerts: Arc<dyn AlertRepository>,
        snapshots: Arc<dyn SnapshotRepository>,
        prices: Arc<dyn PriceOracle>,
        dispatcher: Arc<NotificationDispatcher>,
        cooldown: CooldownGuard
    ) -> Self {
        Self {
            alerts,
            snapshots,
            prices,
            dispatcher,
            cooldown,
        }
    }

    /// Evaluate all enabled alerts.
    ///
    /// Failures on a single token or alert are logged and skipped. Only a
    /// failure to load the alert set ends the run, as `RunOutcome::Failed`.
    pub async fn run(&self) -> RunOutcome {
        let now = Utc::now();

        let alerts = match self.alerts.find_enabled().await {
            Ok(alerts) => alerts,
            Err(e) => {
                tracing::error!("Failed to load enabled alerts: {}", e);
                return RunOutcome::Failed { error: e.to_string() };
            }
        };

        let mut metrics = AlertProcessingMetrics {
            alerts_evaluated: alerts.len() as u64,
            alerts_triggered: 0,
        };

        let (price_alerts, portfolio_alerts): (Vec<Alert>, Vec<Alert>) = alerts
            .into_iter()
            .partition(|alert| alert.alert_type == AlertType::Price);

        metrics.alerts_triggered += self.process_price_alerts(price_alerts, now).await;
        metrics.alerts_triggered += self.process_portfolio_alerts(portfolio_alerts, now).await;

        tracing::info!(
            "Alert run complete: {} evaluated, {} triggered",
            metrics.alerts_evaluated,
            metrics.alerts_triggered
        );

        RunOutcome::Completed(metrics)
    }

    async fn process_price_alerts(&self, alerts: Vec<Alert>, now: DateTime<Utc>) -> u64 {
        let mut by_token: HashMap<String, Vec<Alert>> = HashMap::new();

        for alert in alerts {
            let symbol = alert.token_symbol
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty());

            match symbol {
                Some(symbol) => by_token.entry(symbol).or_default().push(alert),
                None => tracing::warn!("Price alert {} has no token symbol, skipping", alert.id),
            }
        }

        if by_token.is_empty() {
            return 0;
        }

        let prices = self.fetch_prices(by_token.keys().cloned().collect()).await;

        let mut triggered = 0;
        for (token, alerts) in by_token {
            // No price this run: every alert on the token is skipped.
            let price = match prices.get(&token) {
                Some(price) => *price,
                None => {
                    continue;
                }
            };

            for alert in alerts {
                match self.process_price_alert(&alert, &token, price, now).await {
                    Ok(true) => {
                        triggered += 1;
                    }
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Failed to process price alert {}: {}", alert.id, e),
                }
            }
        }

        triggered
    }

    /// One oracle call per distinct token, issued concurrently.
    async fn fetch_prices(&self, tokens: Vec<String>) -> HashMap<String, f64> {
        let mut lookups = JoinSet::new();

        for token in tokens {
            let oracle = Arc::clone(&self.prices);
            lookups.spawn(async move {
                let result = oracle.price_of(&token).await;
                (token, result)
            });
        }

        let mut prices = HashMap::new();
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((token, Ok(Some(price)))) if price.is_finite() => {
                    prices.insert(token, price);
                }
                Ok((token, Ok(_))) => {
                    tracing::warn!("No price available for {}, skipping its alerts", token);
                }
                Ok((token, Err(e))) => {
                    tracing::warn!("Price lookup failed for {}, skipping its alerts: {}", token, e);
                }
                Err(e) => {
                    tracing::warn!("Price lookup task aborted: {}", e);
                }
            }
        }

        prices
    }

    async fn process_price_alert(
        &self,
        alert: &Alert,
        token: &str,
        price: f64,
        now: DateTime<Utc>
    ) -> Result<bool> {
        if !condition::evaluate(alert.operator, alert.value, price) {
            return Ok(false);
        }

        if self.cooldown.is_within_cooldown(alert.last_triggered, now) {
            tracing::debug!("Price alert {} matched but is in cooldown", alert.id);
            return Ok(false);
        }

        let context = TriggerContext {
            alert_type: AlertType::Price,
            current_value: price,
            token_symbol: Some(token.to_string()),
            address: None,
        };

        self.fire(alert, &context, now).await?;
        Ok(true)
    }

    async fn process_portfolio_alerts(&self, alerts: Vec<Alert>, now: DateTime<Utc>) -> u64 {
        let mut triggered = 0;

        for alert in alerts {
            match self.process_portfolio_alert(&alert, now).await {
                Ok(true) => {
                    triggered += 1;
                }
                Ok(false) => {}
                Err(e) => tracing::warn!("Failed to process portfolio alert {}: {}", alert.id, e),
            }
        }

        triggered
    }

    async fn process_portfolio_alert(&self, alert: &Alert, now: DateTime<Utc>) -> Result<bool> {
        if alert.operator.is_percent() {
            tracing::debug!(
                "Portfolio alert {} uses unsupported operator {}",
                alert.id,
                alert.operator
            );
            return Ok(false);
        }

        let latest = match self.snapshots.latest(&alert.address).await? {
            Some(snapshot) => snapshot,
            None => {
                tracing::debug!("No portfolio snapshot for {}, skipping", alert.address);
                return Ok(false);
            }
        };

        let previous = self.snapshots.before(&alert.address, latest.created_at).await?;

        let current_value = latest.total_value;
        let matches = condition::evaluate(alert.operator, alert.value, current_value);
        let crossed = crossing::has_crossed(
            alert.operator,
            alert.value,
            previous.map(|snapshot| snapshot.total_value),
            current_value
        );

        if !(matches && crossed) {
            return Ok(false);
        }

        if self.cooldown.is_within_cooldown(alert.last_triggered, now) {
            tracing::debug!("Portfolio alert {} crossed but is in cooldown", alert.id);
            return Ok(false);
        }

        let context = TriggerContext {
            alert_type: AlertType::Portfolio,
            current_value,
            token_symbol: None,
            address: Some(alert.address.clone()),
        };

        self.fire(alert, &context, now).await?;
        Ok(true)
    }

    /// Persist the trigger time, then notify. The two writes are separate:
    /// if notification storage fails the trigger still stands.
    async fn fire(&self, alert: &Alert, context: &TriggerContext, now: DateTime<Utc>) -> Result<()> {
        self.alerts.mark_triggered(alert.id, now).await?;

        let report = self.dispatcher.dispatch(alert, context, now).await;
        if !report.notification_saved {
            tracing::warn!("Alert {} fired without a stored notification", alert.id);
        }

        tracing::info!(
            "Alert {} triggered ({} {} {} at {:.4})",
            alert.id,
            context.alert_type,
            alert.operator,
            alert.value,
            context.current_value
        );

        Ok(())
    }
}
