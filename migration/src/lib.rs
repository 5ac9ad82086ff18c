pub use sea_orm_migration::prelude::*;

mod m20240201_000001_create_alerts_table;
mod m20240201_000002_create_portfolio_snapshots_table;
mod m20240201_000003_create_notifications_table;
mod m20240201_000004_create_alert_counters_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240201_000001_create_alerts_table::Migration),
            Box::new(m20240201_000002_create_portfolio_snapshots_table::Migration),
            Box::new(m20240201_000003_create_notifications_table::Migration),
            Box::new(m20240201_000004_create_alert_counters_table::Migration)
        ]
    }
}
