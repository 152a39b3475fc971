use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{sea_query::Expr, ActiveValue, ColumnTrait, EntityTrait, QueryFilter};

use crate::{error::TestError, model::UserModel, TestContext};

impl TestContext {
    pub fn user(&self) -> UserFixtures<'_> {
        UserFixtures { setup: self }
    }
}

pub struct UserFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> UserFixtures<'a> {
    /// Insert an unranked user with zeroed balances.
    ///
    /// If `referred_by` names an existing user, that user's `referral_count` is
    /// incremented the same way signup does.
    pub async fn insert_user(
        &self,
        username: &str,
        referred_by: Option<&str>,
    ) -> Result<UserModel, TestError> {
        self.insert(username, referred_by, None).await
    }

    /// Insert a user holding the provided rank.
    pub async fn insert_ranked_user(
        &self,
        username: &str,
        referred_by: Option<&str>,
        rank_id: i32,
    ) -> Result<UserModel, TestError> {
        self.insert(username, referred_by, Some(rank_id)).await
    }

    /// Overwrite a user's referrer without touching any referral counts.
    ///
    /// Used to build self-referrals and cycles which signup can never produce.
    pub async fn set_referred_by(
        &self,
        username: &str,
        referred_by: Option<&str>,
    ) -> Result<(), TestError> {
        let result = entity::prelude::UplinkUser::update_many()
            .col_expr(
                entity::uplink_user::Column::ReferredBy,
                Expr::value(referred_by.map(str::to_string)),
            )
            .filter(entity::uplink_user::Column::Username.eq(username))
            .exec(&self.setup.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(TestError::MissingFixture(username.to_string()));
        }

        Ok(())
    }

    /// Overwrite a user's balance and lifetime earnings.
    pub async fn set_balance(
        &self,
        username: &str,
        balance: Decimal,
        total_earnings: Decimal,
    ) -> Result<(), TestError> {
        entity::prelude::UplinkUser::update_many()
            .col_expr(entity::uplink_user::Column::Balance, Expr::value(balance))
            .col_expr(
                entity::uplink_user::Column::TotalEarnings,
                Expr::value(total_earnings),
            )
            .filter(entity::uplink_user::Column::Username.eq(username))
            .exec(&self.setup.db)
            .await?;

        Ok(())
    }

    /// Fetch a user by username, failing the test if it was never inserted.
    pub async fn get(&self, username: &str) -> Result<UserModel, TestError> {
        entity::prelude::UplinkUser::find()
            .filter(entity::uplink_user::Column::Username.eq(username))
            .one(&self.setup.db)
            .await?
            .ok_or_else(|| TestError::MissingFixture(username.to_string()))
    }

    async fn insert(
        &self,
        username: &str,
        referred_by: Option<&str>,
        rank_id: Option<i32>,
    ) -> Result<UserModel, TestError> {
        let now = Utc::now().naive_utc();

        let user = entity::prelude::UplinkUser::insert(entity::uplink_user::ActiveModel {
            username: ActiveValue::Set(username.to_string()),
            referred_by: ActiveValue::Set(referred_by.map(str::to_string)),
            points: ActiveValue::Set(0),
            balance: ActiveValue::Set(Decimal::ZERO),
            total_earnings: ActiveValue::Set(Decimal::ZERO),
            rank_id: ActiveValue::Set(rank_id),
            current_package_id: ActiveValue::Set(None),
            package_expiry_date: ActiveValue::Set(None),
            referral_count: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        })
        .exec_with_returning(&self.setup.db)
        .await?;

        if let Some(referrer) = referred_by.filter(|referrer| *referrer != username) {
            entity::prelude::UplinkUser::update_many()
                .col_expr(
                    entity::uplink_user::Column::ReferralCount,
                    sea_orm::sea_query::ExprTrait::add(
                        Expr::col(entity::uplink_user::Column::ReferralCount),
                        1,
                    ),
                )
                .filter(entity::uplink_user::Column::Username.eq(referrer))
                .exec(&self.setup.db)
                .await?;
        }

        Ok(user)
    }
}
