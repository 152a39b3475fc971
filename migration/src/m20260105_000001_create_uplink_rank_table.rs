use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UplinkRank::Table)
                    .if_not_exists()
                    .col(pk_auto(UplinkRank::Id))
                    .col(string_uniq(UplinkRank::Title))
                    .col(big_integer_uniq(UplinkRank::RequiredPoints))
                    .col(timestamp(UplinkRank::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UplinkRank::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UplinkRank {
    Table,
    Id,
    Title,
    RequiredPoints,
    CreatedAt,
}
