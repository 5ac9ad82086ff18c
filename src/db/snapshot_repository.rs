use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use sea_orm::{ ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder };

use crate::db::entity::portfolio_snapshot;
use crate::error::Result;
use crate::models::PortfolioSnapshot;

#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Most recent snapshot for `address`.
    async fn latest(&self, address: &str) -> Result<Option<PortfolioSnapshot>>;

    /// Most recent snapshot for `address` taken strictly before `at`.
    async fn before(&self, address: &str, at: DateTime<Utc>) -> Result<Option<PortfolioSnapshot>>;
}

impl From<portfolio_snapshot::Model> for PortfolioSnapshot {
    fn from(model: portfolio_snapshot::Model) -> Self {
        PortfolioSnapshot {
            address: model.address,
            total_value: model.total_value,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone)]
pub struct SeaOrmSnapshotRepository {
    db: DatabaseConnection,
}

impl SeaOrmSnapshotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnapshotRepository for SeaOrmSnapshotRepository {
    async fn latest(&self, address: &str) -> Result<Option<PortfolioSnapshot>> {
        let snapshot = portfolio_snapshot::Entity
            ::find()
            .filter(portfolio_snapshot::Column::Address.eq(address.to_lowercase()))
            .order_by_desc(portfolio_snapshot::Column::CreatedAt)
            .one(&self.db).await?;

        Ok(snapshot.map(PortfolioSnapshot::from))
    }

    async fn before(&self, address: &str, at: DateTime<Utc>) -> Result<Option<PortfolioSnapshot>> {
        let snapshot = portfolio_snapshot::Entity
            ::find()
            .filter(portfolio_snapshot::Column::Address.eq(address.to_lowercase()))
            .filter(portfolio_snapshot::Column::CreatedAt.lt(at))
            .order_by_desc(portfolio_snapshot::Column::CreatedAt)
            .one(&self.db).await?;

        Ok(snapshot.map(PortfolioSnapshot::from))
    }
}
