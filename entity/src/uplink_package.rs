use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "uplink_package")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub package_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub package_direct_commission: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub package_indirect_commission: Decimal,
    pub package_points: i64,
    pub validity_days: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::uplink_package_request::Entity")]
    UplinkPackageRequest,
}

impl Related<super::uplink_package_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkPackageRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
