use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use sea_orm::{ ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter };
use uuid::Uuid;

use crate::db::entity::alert;
use crate::enums::{ AlertOperator, AlertType };
use crate::error::{ AppError, Result };
use crate::models::Alert;

#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// All alerts with `enabled = true`.
    async fn find_enabled(&self) -> Result<Vec<Alert>>;

    /// Record that the alert fired at `at`. Never moves the timestamp backwards.
    async fn mark_triggered(&self, id: Uuid, at: DateTime<Utc>) -> Result<()>;
}

impl TryFrom<alert::Model> for Alert {
    type Error = AppError;

    fn try_from(model: alert::Model) -> Result<Self> {
        Ok(Alert {
            id: model.id,
            address: model.address.to_lowercase(),
            alert_type: model.alert_type.parse::<AlertType>()?,
            token_symbol: model.token_symbol,
            operator: model.operator.parse::<AlertOperator>()?,
            value: model.value,
            enabled: model.enabled,
            created_at: model.created_at,
            last_triggered: model.last_triggered,
        })
    }
}

#[derive(Clone)]
pub struct SeaOrmAlertRepository {
    db: DatabaseConnection,
}

impl SeaOrmAlertRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertRepository for SeaOrmAlertRepository {
    async fn find_enabled(&self) -> Result<Vec<Alert>> {
        let rows = alert::Entity
            ::find()
            .filter(alert::Column::Enabled.eq(true))
            .all(&self.db).await?;

        // A row with an unknown type or operator can never match, so it is
        // dropped here instead of failing the whole load.
        let alerts = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match Alert::try_from(row) {
                    Ok(alert) => Some(alert),
                    Err(e) => {
                        tracing::warn!("Skipping malformed alert {}: {}", id, e);
                        None
                    }
                }
            })
            .collect();

        Ok(alerts)
    }

    async fn mark_triggered(&self, id: Uuid, at: DateTime<Utc>) -> Result<()> {
        let row = alert::Entity
            ::find_by_id(id)
            .one(&self.db).await?
            .ok_or_else(|| AppError::NotFound(format!("Alert {} not found", id)))?;

        if matches!(row.last_triggered, Some(previous) if previous > at) {
            return Ok(());
        }

        let mut active: alert::ActiveModel = row.into();
        active.last_triggered = ActiveValue::Set(Some(at));
        active.update(&self.db).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sea_orm::{ DatabaseBackend, MockDatabase };

    fn row(alert_type: &str, operator: &str) -> alert::Model {
        alert::Model {
            id: Uuid::new_v4(),
            address: "0xABCdef".to_string(),
            alert_type: alert_type.to_string(),
            token_symbol: Some("ETH".to_string()),
            operator: operator.to_string(),
            value: 100.0,
            enabled: true,
            created_at: Utc::now(),
            last_triggered: None,
        }
    }

    #[test]
    fn test_model_conversion() {
        let alert = Alert::try_from(row("price", "above")).unwrap();
        assert_eq!(alert.alert_type, AlertType::Price);
        assert_eq!(alert.operator, AlertOperator::Above);
        assert_eq!(alert.address, "0xabcdef");
    }

    #[test]
    fn test_model_conversion_rejects_unknown_operator() {
        assert!(Alert::try_from(row("price", "equals")).is_err());
        assert!(Alert::try_from(row("volume", "above")).is_err());
    }

    #[tokio::test]
    async fn test_mark_triggered_keeps_newer_stored_timestamp() {
        let now = Utc::now();
        let stored = alert::Model { last_triggered: Some(now), ..row("price", "above") };
        let id = stored.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored]])
            .into_connection();
        let repo = SeaOrmAlertRepository::new(db.clone());

        repo.mark_triggered(id, now - Duration::minutes(5)).await.unwrap();

        // Only the lookup ran; no UPDATE was issued.
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_triggered_updates_older_stored_timestamp() {
        let now = Utc::now();
        let stored = alert::Model {
            last_triggered: Some(now - Duration::minutes(30)),
            ..row("price", "above")
        };
        let updated = alert::Model { last_triggered: Some(now), ..stored.clone() };
        let id = stored.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored], vec![updated]])
            .into_connection();
        let repo = SeaOrmAlertRepository::new(db.clone());

        repo.mark_triggered(id, now).await.unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 2);
        assert!(log[1].statements()[0].sql.starts_with("UPDATE \"alerts\""));
    }

    #[tokio::test]
    async fn test_mark_triggered_unknown_alert_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<alert::Model>::new()])
            .into_connection();
        let repo = SeaOrmAlertRepository::new(db);

        let result = repo.mark_triggered(Uuid::new_v4(), Utc::now()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_enabled_skips_malformed_rows() {
        let first = row("price", "above");
        let malformed = row("price", "equals");
        let last = row("portfolio", "percent_decrease");
        let expected = vec![first.id, last.id];

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![first, malformed, last]])
            .into_connection();
        let repo = SeaOrmAlertRepository::new(db);

        let alerts = repo.find_enabled().await.unwrap();
        assert_eq!(alerts.iter().map(|a| a.id).collect::<Vec<_>>(), expected);
    }
}
