use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260105_000002_create_uplink_package_table::UplinkPackage,
    m20260105_000003_create_uplink_user_table::UplinkUser,
};

static IDX_PACKAGE_REQUEST_STATUS: &str = "idx_uplink_package_request_status";
static FK_PACKAGE_REQUEST_USER_ID: &str = "fk_uplink_package_request_user_id";
static FK_PACKAGE_REQUEST_PACKAGE_ID: &str = "fk_uplink_package_request_package_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UplinkPackageRequest::Table)
                    .if_not_exists()
                    .col(pk_auto(UplinkPackageRequest::Id))
                    .col(integer(UplinkPackageRequest::UserId))
                    .col(integer(UplinkPackageRequest::PackageId))
                    .col(string_len(UplinkPackageRequest::Status, 16).default("pending"))
                    .col(string_null(UplinkPackageRequest::TransactionId))
                    .col(text_null(UplinkPackageRequest::AdminNotes))
                    .col(timestamp(UplinkPackageRequest::CreatedAt))
                    .col(timestamp(UplinkPackageRequest::UpdatedAt))
                    .col(timestamp_null(UplinkPackageRequest::ProcessedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_PACKAGE_REQUEST_STATUS)
                    .table(UplinkPackageRequest::Table)
                    .col(UplinkPackageRequest::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGE_REQUEST_USER_ID)
                    .from_tbl(UplinkPackageRequest::Table)
                    .from_col(UplinkPackageRequest::UserId)
                    .to_tbl(UplinkUser::Table)
                    .to_col(UplinkUser::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_PACKAGE_REQUEST_PACKAGE_ID)
                    .from_tbl(UplinkPackageRequest::Table)
                    .from_col(UplinkPackageRequest::PackageId)
                    .to_tbl(UplinkPackage::Table)
                    .to_col(UplinkPackage::Id)
                    .on_delete(ForeignKeyAction::Restrict)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGE_REQUEST_PACKAGE_ID)
                    .table(UplinkPackageRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_PACKAGE_REQUEST_USER_ID)
                    .table(UplinkPackageRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_PACKAGE_REQUEST_STATUS)
                    .table(UplinkPackageRequest::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UplinkPackageRequest::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UplinkPackageRequest {
    Table,
    Id,
    UserId,
    PackageId,
    Status,
    TransactionId,
    AdminNotes,
    CreatedAt,
    UpdatedAt,
    ProcessedAt,
}
