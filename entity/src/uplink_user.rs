use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "uplink_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// Username of the referrer. Not a foreign key: may be dangling, self-referential or cyclic.
    pub referred_by: Option<String>,
    pub points: i64,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total_earnings: Decimal,
    pub rank_id: Option<i32>,
    pub current_package_id: Option<i32>,
    pub package_expiry_date: Option<DateTime>,
    pub referral_count: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::uplink_rank::Entity",
        from = "Column::RankId",
        to = "super::uplink_rank::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    UplinkRank,
    #[sea_orm(
        belongs_to = "super::uplink_package::Entity",
        from = "Column::CurrentPackageId",
        to = "super::uplink_package::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    UplinkPackage,
    #[sea_orm(has_many = "super::uplink_package_request::Entity")]
    UplinkPackageRequest,
    #[sea_orm(has_many = "super::uplink_earning::Entity")]
    UplinkEarning,
}

impl Related<super::uplink_rank::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkRank.def()
    }
}

impl Related<super::uplink_package::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkPackage.def()
    }
}

impl Related<super::uplink_package_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkPackageRequest.def()
    }
}

impl Related<super::uplink_earning::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkEarning.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
