use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(AlertCounters::Table)
                .if_not_exists()
                .col(ColumnDef::new(AlertCounters::Key).string().not_null().primary_key())
                .col(ColumnDef::new(AlertCounters::Value).big_integer().not_null().default(0))
                .col(ColumnDef::new(AlertCounters::UpdatedAt).timestamp_with_time_zone().not_null())
                .to_owned()
        ).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AlertCounters::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum AlertCounters {
    Table,
    Key,
    Value,
    UpdatedAt,
}
