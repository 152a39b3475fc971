use std::collections::HashSet;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::server::{data::increment, model::db::UserModel};

pub struct UserRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::UplinkUser::find_by_id(user_id)
            .one(self.db)
            .await
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<UserModel>, DbErr> {
        entity::prelude::UplinkUser::find()
            .filter(entity::uplink_user::Column::Username.eq(username))
            .one(self.db)
            .await
    }

    /// A user followed by their referrers, nearest first.
    ///
    /// Stops after `limit` rows, at a root, at a referrer that does not exist, or at a
    /// referrer already in the chain. Returns an empty list if the user does not exist.
    pub async fn get_referral_chain(
        &self,
        user_id: i32,
        limit: usize,
    ) -> Result<Vec<UserModel>, DbErr> {
        let mut chain = Vec::new();
        let Some(mut current) = self.get(user_id).await? else {
            return Ok(chain);
        };

        let mut seen = HashSet::new();
        seen.insert(current.username.clone());

        loop {
            let referrer = current.referred_by.clone();
            chain.push(current);

            if chain.len() >= limit {
                break;
            }
            let Some(referrer) = referrer else {
                break;
            };
            if !seen.insert(referrer.clone()) {
                break;
            }

            match self.get_by_username(&referrer).await? {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(chain)
    }

    /// Every user ordered by ID, used to build the referral graph
    pub async fn get_all(&self) -> Result<Vec<UserModel>, DbErr> {
        entity::prelude::UplinkUser::find()
            .order_by_asc(entity::uplink_user::Column::Id)
            .all(self.db)
            .await
    }

    /// Attaches a purchased package and adds its points to the user.
    ///
    /// Returns `false` if the user does not exist.
    pub async fn credit_package(
        &self,
        user_id: i32,
        package_id: i32,
        points: i64,
        expires_at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(
                entity::uplink_user::Column::Points,
                increment(entity::uplink_user::Column::Points, points),
            )
            .col_expr(
                entity::uplink_user::Column::CurrentPackageId,
                Expr::value(Some(package_id)),
            )
            .col_expr(
                entity::uplink_user::Column::PackageExpiryDate,
                Expr::value(Some(expires_at)),
            )
            .col_expr(entity::uplink_user::Column::UpdatedAt, Expr::value(now))
            .filter(entity::uplink_user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn set_rank(
        &self,
        user_id: i32,
        rank_id: i32,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(entity::uplink_user::Column::RankId, Expr::value(Some(rank_id)))
            .col_expr(entity::uplink_user::Column::UpdatedAt, Expr::value(now))
            .filter(entity::uplink_user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Adds a commission to both `balance` and `total_earnings`.
    pub async fn credit_earnings(
        &self,
        user_id: i32,
        amount: Decimal,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(
                entity::uplink_user::Column::Balance,
                increment(entity::uplink_user::Column::Balance, amount),
            )
            .col_expr(
                entity::uplink_user::Column::TotalEarnings,
                increment(entity::uplink_user::Column::TotalEarnings, amount),
            )
            .col_expr(entity::uplink_user::Column::UpdatedAt, Expr::value(now))
            .filter(entity::uplink_user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Adds `delta` (which may be negative) to a user's `referral_count`.
    pub async fn adjust_referral_count(
        &self,
        user_id: i32,
        delta: i32,
        now: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(
                entity::uplink_user::Column::ReferralCount,
                increment(entity::uplink_user::Column::ReferralCount, delta),
            )
            .col_expr(entity::uplink_user::Column::UpdatedAt, Expr::value(now))
            .filter(entity::uplink_user::Column::Id.eq(user_id))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Replaces a user's referrer only while it still equals `expected`.
    ///
    /// Returns the number of rows changed, 0 once the referrer was already fixed.
    pub async fn replace_referrer(
        &self,
        user_id: i32,
        expected: &str,
        replacement: Option<&str>,
        now: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(
                entity::uplink_user::Column::ReferredBy,
                Expr::value(replacement.map(str::to_string)),
            )
            .col_expr(entity::uplink_user::Column::UpdatedAt, Expr::value(now))
            .filter(entity::uplink_user::Column::Id.eq(user_id))
            .filter(entity::uplink_user::Column::ReferredBy.eq(expected))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    /// Overwrites `referral_count` only while it still equals `expected`.
    pub async fn correct_referral_count(
        &self,
        user_id: i32,
        expected: i32,
        actual: i32,
        now: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(entity::uplink_user::Column::ReferralCount, Expr::value(actual))
            .col_expr(entity::uplink_user::Column::UpdatedAt, Expr::value(now))
            .filter(entity::uplink_user::Column::Id.eq(user_id))
            .filter(entity::uplink_user::Column::ReferralCount.eq(expected))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
