use chrono::Utc;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{
    constant::{CONSULTANT_RANK, DIRECTOR_RANK, MANAGER_RANK},
    error::TestError,
    model::RankModel,
    TestContext,
};

impl TestContext {
    pub fn rank(&self) -> RankFixtures<'_> {
        RankFixtures { setup: self }
    }
}

pub struct RankFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> RankFixtures<'a> {
    pub async fn insert_rank(
        &self,
        title: &str,
        required_points: i64,
    ) -> Result<RankModel, TestError> {
        Ok(
            entity::prelude::UplinkRank::insert(entity::uplink_rank::ActiveModel {
                title: ActiveValue::Set(title.to_string()),
                required_points: ActiveValue::Set(required_points),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }

    /// Insert Consultant, Manager and Director, returned lowest tier first.
    pub async fn insert_standard_ladder(&self) -> Result<Vec<RankModel>, TestError> {
        let mut ranks = Vec::new();
        for (title, required_points) in [CONSULTANT_RANK, MANAGER_RANK, DIRECTOR_RANK] {
            ranks.push(self.insert_rank(title, required_points).await?);
        }

        Ok(ranks)
    }
}
