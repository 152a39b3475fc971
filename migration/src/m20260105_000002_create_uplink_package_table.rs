use sea_orm_migration::{prelude::*, schema::*};

static DEFAULT_VALIDITY_DAYS: i32 = 365;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UplinkPackage::Table)
                    .if_not_exists()
                    .col(pk_auto(UplinkPackage::Id))
                    .col(string(UplinkPackage::Name))
                    .col(decimal_len(UplinkPackage::PackageAmount, 16, 2))
                    .col(decimal_len(UplinkPackage::PackageDirectCommission, 16, 2))
                    .col(decimal_len(UplinkPackage::PackageIndirectCommission, 16, 2))
                    .col(big_integer(UplinkPackage::PackagePoints))
                    .col(integer(UplinkPackage::ValidityDays).default(DEFAULT_VALIDITY_DAYS))
                    .col(timestamp(UplinkPackage::CreatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UplinkPackage::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UplinkPackage {
    Table,
    Id,
    Name,
    PackageAmount,
    PackageDirectCommission,
    PackageIndirectCommission,
    PackagePoints,
    ValidityDays,
    CreatedAt,
}
