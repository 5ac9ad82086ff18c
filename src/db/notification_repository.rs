use async_trait::async_trait;
use sea_orm::{ ActiveModelTrait, ActiveValue, DatabaseConnection };
use uuid::Uuid;

use crate::db::entity::notification;
use crate::error::Result;
use crate::models::NewNotification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: NewNotification) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmNotificationRepository {
    db: DatabaseConnection,
}

impl SeaOrmNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NotificationRepository for SeaOrmNotificationRepository {
    async fn create(&self, notification: NewNotification) -> Result<()> {
        let row = notification::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            alert_id: ActiveValue::Set(notification.alert_id),
            address: ActiveValue::Set(notification.address),
            title: ActiveValue::Set(notification.title),
            message: ActiveValue::Set(notification.message),
            notification_type: ActiveValue::Set(notification.notification_type.to_string()),
            is_read: ActiveValue::Set(false),
            triggered_at: ActiveValue::Set(notification.triggered_at),
            read_at: ActiveValue::Set(None),
        };

        row.insert(&self.db).await?;
        Ok(())
    }
}
