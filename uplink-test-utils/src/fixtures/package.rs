use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, EntityTrait};

use crate::{error::TestError, model::PackageModel, TestContext};

impl TestContext {
    pub fn package(&self) -> PackageFixtures<'_> {
        PackageFixtures { setup: self }
    }
}

pub struct PackageFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> PackageFixtures<'a> {
    /// Insert a package costing 1000 with a 365 day validity.
    pub async fn insert_package(
        &self,
        direct_commission: Decimal,
        indirect_commission: Decimal,
        points: i64,
    ) -> Result<PackageModel, TestError> {
        self.insert_package_with_validity(direct_commission, indirect_commission, points, 365)
            .await
    }

    /// Insert a package costing 1000 with the provided validity in days.
    pub async fn insert_package_with_validity(
        &self,
        direct_commission: Decimal,
        indirect_commission: Decimal,
        points: i64,
        validity_days: i32,
    ) -> Result<PackageModel, TestError> {
        Ok(
            entity::prelude::UplinkPackage::insert(entity::uplink_package::ActiveModel {
                name: ActiveValue::Set("Starter".to_string()),
                package_amount: ActiveValue::Set(Decimal::from(1000)),
                package_direct_commission: ActiveValue::Set(direct_commission),
                package_indirect_commission: ActiveValue::Set(indirect_commission),
                package_points: ActiveValue::Set(points),
                validity_days: ActiveValue::Set(validity_days),
                created_at: ActiveValue::Set(Utc::now().naive_utc()),
                ..Default::default()
            })
            .exec_with_returning(&self.setup.db)
            .await?,
        )
    }
}
