use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260105_000001_create_uplink_rank_table::UplinkRank,
    m20260105_000002_create_uplink_package_table::UplinkPackage,
};

static IDX_USER_REFERRED_BY: &str = "idx_uplink_user_referred_by";
static FK_USER_RANK_ID: &str = "fk_uplink_user_rank_id";
static FK_USER_CURRENT_PACKAGE_ID: &str = "fk_uplink_user_current_package_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // `referred_by` holds a username with no foreign key, dangling and cyclic
        // values are stored as-is
        manager
            .create_table(
                Table::create()
                    .table(UplinkUser::Table)
                    .if_not_exists()
                    .col(pk_auto(UplinkUser::Id))
                    .col(string_uniq(UplinkUser::Username))
                    .col(string_null(UplinkUser::ReferredBy))
                    .col(big_integer(UplinkUser::Points).default(0))
                    .col(decimal_len(UplinkUser::Balance, 16, 2).default(0))
                    .col(decimal_len(UplinkUser::TotalEarnings, 16, 2).default(0))
                    .col(integer_null(UplinkUser::RankId))
                    .col(integer_null(UplinkUser::CurrentPackageId))
                    .col(timestamp_null(UplinkUser::PackageExpiryDate))
                    .col(integer(UplinkUser::ReferralCount).default(0))
                    .col(timestamp(UplinkUser::CreatedAt))
                    .col(timestamp(UplinkUser::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USER_REFERRED_BY)
                    .table(UplinkUser::Table)
                    .col(UplinkUser::ReferredBy)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_RANK_ID)
                    .from_tbl(UplinkUser::Table)
                    .from_col(UplinkUser::RankId)
                    .to_tbl(UplinkRank::Table)
                    .to_col(UplinkRank::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USER_CURRENT_PACKAGE_ID)
                    .from_tbl(UplinkUser::Table)
                    .from_col(UplinkUser::CurrentPackageId)
                    .to_tbl(UplinkPackage::Table)
                    .to_col(UplinkPackage::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_USER_CURRENT_PACKAGE_ID)
                    .table(UplinkUser::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_USER_RANK_ID)
                    .table(UplinkUser::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_USER_REFERRED_BY)
                    .table(UplinkUser::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UplinkUser::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UplinkUser {
    Table,
    Id,
    Username,
    ReferredBy,
    Points,
    Balance,
    TotalEarnings,
    RankId,
    CurrentPackageId,
    PackageExpiryDate,
    ReferralCount,
    CreatedAt,
    UpdatedAt,
}
