use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(PortfolioSnapshots::Table)
                .if_not_exists()
                .col(ColumnDef::new(PortfolioSnapshots::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(PortfolioSnapshots::Address).string().not_null())
                .col(ColumnDef::new(PortfolioSnapshots::TotalValue).double().not_null())
                .col(
                    ColumnDef::new(PortfolioSnapshots::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                )
                .to_owned()
        ).await?;

        // latest / latest-before lookups
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_portfolio_snapshots_address_created_at")
                .table(PortfolioSnapshots::Table)
                .col(PortfolioSnapshots::Address)
                .col(PortfolioSnapshots::CreatedAt)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PortfolioSnapshots::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum PortfolioSnapshots {
    Table,
    Id,
    Address,
    TotalValue,
    CreatedAt,
}
