use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder};

use crate::server::model::db::RankModel;

pub struct RankRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RankRepository<'a, C> {
    /// Creates a new instance of [`RankRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Every rank, highest threshold first
    pub async fn get_all(&self) -> Result<Vec<RankModel>, DbErr> {
        entity::prelude::UplinkRank::find()
            .order_by_desc(entity::uplink_rank::Column::RequiredPoints)
            .all(self.db)
            .await
    }
}
