use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ sea_query::OnConflict, ActiveValue, DatabaseConnection, EntityTrait };

use crate::db::entity::counter;
use crate::error::Result;

/// Plain key-value store for cumulative run counters.
#[async_trait]
pub trait CountersStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<i64>>;
    async fn set(&self, key: &str, value: i64) -> Result<()>;
}

#[derive(Clone)]
pub struct SeaOrmCountersStore {
    db: DatabaseConnection,
}

impl SeaOrmCountersStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CountersStore for SeaOrmCountersStore {
    async fn get(&self, key: &str) -> Result<Option<i64>> {
        let row = counter::Entity::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(row.map(|r| r.value))
    }

    async fn set(&self, key: &str, value: i64) -> Result<()> {
        let row = counter::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            value: ActiveValue::Set(value),
            updated_at: ActiveValue::Set(Utc::now()),
        };

        counter::Entity
            ::insert(row)
            .on_conflict(
                OnConflict::column(counter::Column::Key)
                    .update_columns([counter::Column::Value, counter::Column::UpdatedAt])
                    .to_owned()
            )
            .exec(&self.db).await?;

        Ok(())
    }
}
