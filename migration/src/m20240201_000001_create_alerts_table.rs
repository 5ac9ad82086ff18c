use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Alerts::Table)
                .if_not_exists()
                .col(ColumnDef::new(Alerts::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Alerts::Address).string().not_null())
                .col(ColumnDef::new(Alerts::AlertType).string().not_null()) // "price", "portfolio"
                .col(ColumnDef::new(Alerts::TokenSymbol).string())
                .col(ColumnDef::new(Alerts::Operator).string().not_null())
                .col(ColumnDef::new(Alerts::Value).double().not_null())
                .col(ColumnDef::new(Alerts::Enabled).boolean().not_null().default(true))
                .col(ColumnDef::new(Alerts::CreatedAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(Alerts::LastTriggered).timestamp_with_time_zone())
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_alerts_address")
                .table(Alerts::Table)
                .col(Alerts::Address)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_alerts_enabled")
                .table(Alerts::Table)
                .col(Alerts::Enabled)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Alerts::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Alerts {
    Table,
    Id,
    Address,
    AlertType,
    TokenSymbol,
    Operator,
    Value,
    Enabled,
    CreatedAt,
    LastTriggered,
}
