use chrono::Utc;
use entity::sea_orm_active_enums::EarningType;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
    QueryOrder,
};

use crate::server::model::db::EarningModel;

pub struct EarningRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EarningRepository<'a, C> {
    /// Creates a new instance of [`EarningRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Appends a ledger row. Earnings are never updated or deleted.
    pub async fn create(
        &self,
        user_id: i32,
        package_request_id: i32,
        amount: Decimal,
        earning_type: EarningType,
        description: String,
    ) -> Result<EarningModel, DbErr> {
        let earning = entity::uplink_earning::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            package_request_id: ActiveValue::Set(package_request_id),
            amount: ActiveValue::Set(amount),
            earning_type: ActiveValue::Set(earning_type),
            description: ActiveValue::Set(description),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        earning.insert(self.db).await
    }

    pub async fn get_by_request(&self, package_request_id: i32) -> Result<Vec<EarningModel>, DbErr> {
        entity::prelude::UplinkEarning::find()
            .filter(entity::uplink_earning::Column::PackageRequestId.eq(package_request_id))
            .order_by_asc(entity::uplink_earning::Column::Id)
            .all(self.db)
            .await
    }

    /// Sum of a user's direct and indirect commissions.
    ///
    /// Should always equal the user's `total_earnings` increase over the same rows.
    pub async fn monetary_total_for_user(&self, user_id: i32) -> Result<Decimal, DbErr> {
        let earnings = entity::prelude::UplinkEarning::find()
            .filter(entity::uplink_earning::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;

        Ok(earnings
            .iter()
            .filter(|earning| earning.earning_type.is_monetary())
            .map(|earning| earning.amount)
            .sum())
    }
}
