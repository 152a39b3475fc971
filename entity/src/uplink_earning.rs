use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::EarningType;

/// Append-only ledger row. Never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "uplink_earning")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub package_request_id: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    pub earning_type: EarningType,
    pub description: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::uplink_user::Entity",
        from = "Column::UserId",
        to = "super::uplink_user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UplinkUser,
    #[sea_orm(
        belongs_to = "super::uplink_package_request::Entity",
        from = "Column::PackageRequestId",
        to = "super::uplink_package_request::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UplinkPackageRequest,
}

impl Related<super::uplink_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkUser.def()
    }
}

impl Related<super::uplink_package_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkPackageRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
