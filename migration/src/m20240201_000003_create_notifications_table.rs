use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Notifications::Table)
                .if_not_exists()
                .col(ColumnDef::new(Notifications::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Notifications::AlertId).uuid().not_null())
                .col(ColumnDef::new(Notifications::Address).string().not_null())
                .col(ColumnDef::new(Notifications::Title).string().not_null())
                .col(ColumnDef::new(Notifications::Message).text().not_null())
                .col(ColumnDef::new(Notifications::Type).string().not_null())
                .col(ColumnDef::new(Notifications::IsRead).boolean().not_null().default(false))
                .col(
                    ColumnDef::new(Notifications::TriggeredAt).timestamp_with_time_zone().not_null()
                )
                .col(ColumnDef::new(Notifications::ReadAt).timestamp_with_time_zone())
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_notifications_address")
                .table(Notifications::Table)
                .col(Notifications::Address)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Notifications::Table).to_owned()).await
    }
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    AlertId,
    Address,
    Title,
    Message,
    Type,
    IsRead,
    TriggeredAt,
    ReadAt,
}
