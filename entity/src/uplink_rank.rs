use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "uplink_rank")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(unique)]
    pub required_points: i64,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::uplink_user::Entity")]
    UplinkUser,
}

impl Related<super::uplink_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UplinkUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
