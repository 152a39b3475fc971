use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260105_000003_create_uplink_user_table::UplinkUser,
    m20260105_000004_create_uplink_package_request_table::UplinkPackageRequest,
};

static IDX_EARNING_USER_ID: &str = "idx_uplink_earning_user_id";
static IDX_EARNING_PACKAGE_REQUEST_ID: &str = "idx_uplink_earning_package_request_id";
static FK_EARNING_USER_ID: &str = "fk_uplink_earning_user_id";
static FK_EARNING_PACKAGE_REQUEST_ID: &str = "fk_uplink_earning_package_request_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UplinkEarning::Table)
                    .if_not_exists()
                    .col(pk_auto(UplinkEarning::Id))
                    .col(integer(UplinkEarning::UserId))
                    .col(integer(UplinkEarning::PackageRequestId))
                    .col(decimal_len(UplinkEarning::Amount, 16, 2))
                    .col(string_len(UplinkEarning::EarningType, 32))
                    .col(text(UplinkEarning::Description))
                    .col(timestamp(UplinkEarning::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EARNING_USER_ID)
                    .table(UplinkEarning::Table)
                    .col(UplinkEarning::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_EARNING_PACKAGE_REQUEST_ID)
                    .table(UplinkEarning::Table)
                    .col(UplinkEarning::PackageRequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_EARNING_USER_ID)
                    .from_tbl(UplinkEarning::Table)
                    .from_col(UplinkEarning::UserId)
                    .to_tbl(UplinkUser::Table)
                    .to_col(UplinkUser::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_EARNING_PACKAGE_REQUEST_ID)
                    .from_tbl(UplinkEarning::Table)
                    .from_col(UplinkEarning::PackageRequestId)
                    .to_tbl(UplinkPackageRequest::Table)
                    .to_col(UplinkPackageRequest::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_EARNING_PACKAGE_REQUEST_ID)
                    .table(UplinkEarning::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_EARNING_USER_ID)
                    .table(UplinkEarning::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EARNING_PACKAGE_REQUEST_ID)
                    .table(UplinkEarning::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_EARNING_USER_ID)
                    .table(UplinkEarning::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UplinkEarning::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum UplinkEarning {
    Table,
    Id,
    UserId,
    PackageRequestId,
    Amount,
    EarningType,
    Description,
    CreatedAt,
}
