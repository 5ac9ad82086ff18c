//! In-memory collaborators used by unit tests.

use std::collections::{ HashMap, HashSet };

use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::{ AlertRepository, CountersStore, NotificationRepository, SnapshotRepository };
use crate::enums::{ AlertOperator, AlertType };
use crate::error::{ AppError, Result };
use crate::models::{ Alert, NewNotification, PortfolioSnapshot };
use crate::providers::{ EmailMessage, EmailSendResult, EmailSender, PriceOracle };

pub fn price_alert(symbol: &str, operator: AlertOperator, value: f64) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        address: "0xowner".to_string(),
        alert_type: AlertType::Price,
        token_symbol: Some(symbol.to_string()),
        operator,
        value,
        enabled: true,
        created_at: Utc::now(),
        last_triggered: None,
    }
}

pub fn portfolio_alert(address: &str, operator: AlertOperator, value: f64) -> Alert {
    Alert {
        id: Uuid::new_v4(),
        address: address.to_string(),
        alert_type: AlertType::Portfolio,
        token_symbol: None,
        operator,
        value,
        enabled: true,
        created_at: Utc::now(),
        last_triggered: None,
    }
}

#[derive(Default)]
pub struct InMemoryAlertRepository {
    pub alerts: Mutex<Vec<Alert>>,
    pub fail_load: bool,
    pub fail_mark: HashSet<Uuid>,
}

impl InMemoryAlertRepository {
    pub fn with(alerts: Vec<Alert>) -> Self {
        Self { alerts: Mutex::new(alerts), ..Default::default() }
    }

    pub async fn get(&self, id: Uuid) -> Option<Alert> {
        self.alerts.lock().await.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl AlertRepository for InMemoryAlertRepository {
    async fn find_enabled(&self) -> Result<Vec<Alert>> {
        if self.fail_load {
            return Err(AppError::Internal("alert store unavailable".to_string()));
        }
        Ok(self.alerts.lock().await.iter().filter(|a| a.enabled).cloned().collect())
    }

    async fn mark_triggered(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        if self.fail_mark.contains(&id) {
            return Err(AppError::Internal("write rejected".to_string()));
        }
        let mut alerts = self.alerts.lock().await;
        let alert = alerts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Alert {} not found", id)))?;
        if !matches!(alert.last_triggered, Some(previous) if previous > at) {
            alert.last_triggered = Some(at);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySnapshotRepository {
    pub snapshots: Mutex<Vec<PortfolioSnapshot>>,
    pub failing: HashSet<String>,
}

impl InMemorySnapshotRepository {
    pub fn with(snapshots: Vec<PortfolioSnapshot>) -> Self {
        Self { snapshots: Mutex::new(snapshots), ..Default::default() }
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn latest(&self, address: &str) -> Result<Option<PortfolioSnapshot>> {
        if self.failing.contains(address) {
            return Err(AppError::Internal("snapshot query failed".to_string()));
        }
        Ok(
            self.snapshots
                .lock().await
                .iter()
                .filter(|s| s.address == address)
                .max_by_key(|s| s.created_at)
                .cloned()
        )
    }

    async fn before(&self, address: &str, at: DateTime<Utc>) -> Result<Option<PortfolioSnapshot>> {
        Ok(
            self.snapshots
                .lock().await
                .iter()
                .filter(|s| s.address == address && s.created_at < at)
                .max_by_key(|s| s.created_at)
                .cloned()
        )
    }
}

pub fn snapshot(address: &str, total_value: f64, minutes_ago: i64) -> PortfolioSnapshot {
    PortfolioSnapshot {
        address: address.to_string(),
        total_value,
        created_at: Utc::now() - chrono::Duration::minutes(minutes_ago),
    }
}

#[derive(Default)]
pub struct StaticPriceOracle {
    pub prices: HashMap<String, f64>,
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticPriceOracle {
    pub fn with(prices: &[(&str, f64)]) -> Self {
        Self {
            prices: prices
                .iter()
                .map(|(symbol, price)| (symbol.to_string(), *price))
                .collect(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn price_of(&self, symbol: &str) -> Result<Option<f64>> {
        self.calls.lock().await.push(symbol.to_string());
        if self.failing.contains(symbol) {
            return Err(AppError::External("oracle timeout".to_string()));
        }
        Ok(self.prices.get(symbol).copied())
    }
}

#[derive(Default)]
pub struct RecordingNotificationRepository {
    pub created: Mutex<Vec<NewNotification>>,
    pub fail: bool,
}

#[async_trait]
impl NotificationRepository for RecordingNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<()> {
        if self.fail {
            return Err(AppError::Internal("insert failed".to_string()));
        }
        self.created.lock().await.push(notification);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEmailSender {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> EmailSendResult {
        self.sent.lock().await.push(message);
        if self.fail {
            EmailSendResult::failed("provider rejected message")
        } else {
            EmailSendResult::sent(Some("email_1".to_string()))
        }
    }
}

#[derive(Default)]
pub struct InMemoryCountersStore {
    pub values: Mutex<HashMap<String, i64>>,
}

#[async_trait]
impl CountersStore for InMemoryCountersStore {
    async fn get(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.values.lock().await.get(key).copied())
    }

    async fn set(&self, key: &str, value: i64) -> Result<()> {
        self.values.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_in_memory_mark_triggered_never_moves_backwards() {
        let alert = price_alert("eth", AlertOperator::Above, 100.0);
        let id = alert.id;
        let repo = InMemoryAlertRepository::with(vec![alert]);
        let now = Utc::now();

        repo.mark_triggered(id, now).await.unwrap();
        repo.mark_triggered(id, now - Duration::minutes(5)).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap().last_triggered, Some(now));

        let later = now + Duration::minutes(1);
        repo.mark_triggered(id, later).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap().last_triggered, Some(later));
    }
}
