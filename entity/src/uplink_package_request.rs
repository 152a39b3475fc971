use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::PackageRequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "uplink_package_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub package_id: i32,
    pub status: PackageRequestStatus,
    pub transaction_id: Option<String>,
    pub admin_notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
    pub processed_at: Option<DateTime>,
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
        belongs_to = "super::uplink_package::Entity",
        from = "Column::PackageId",
        to = "super::uplink_package::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    UplinkPackage,
    #[sea_orm(has_many = "super::uplink_earning::Entity")]
    UplinkEarning,
}

impl Related<super::uplink_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkUser.def()
    }
}

impl Related<super::uplink_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkPackage.def()
    }
}

impl Related<super::uplink_earning::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkEarning.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
