use chrono::Utc;
use entity::sea_orm_active_enums::PackageRequestStatus;
use sea_orm::{ActiveValue, ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    error::TestError,
    model::{EarningModel, PackageRequestModel},
    TestContext,
};

impl TestContext {
    pub fn package_request(&self) -> PackageRequestFixtures<'_> {
        PackageRequestFixtures { setup: self }
    }
}

pub struct PackageRequestFixtures<'a> {
    setup: &'a TestContext,
}

impl<'a> PackageRequestFixtures<'a> {
    /// Insert a pending purchase request.
    pub async fn insert_request(
        &self,
        user_id: i32,
        package_id: i32,
    ) -> Result<PackageRequestModel, TestError> {
        self.insert_request_with_status(user_id, package_id, PackageRequestStatus::Pending)
            .await
    }

    pub async fn insert_request_with_status(
        &self,
        user_id: i32,
        package_id: i32,
        status: PackageRequestStatus,
    ) -> Result<PackageRequestModel, TestError> {
        let now = Utc::now().naive_utc();

        Ok(entity::prelude::UplinkPackageRequest::insert(
            entity::uplink_package_request::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                package_id: ActiveValue::Set(package_id),
                status: ActiveValue::Set(status),
                transaction_id: ActiveValue::Set(Some(format!("txn-{}-{}", user_id, package_id))),
                admin_notes: ActiveValue::Set(None),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                processed_at: ActiveValue::Set(None),
                ..Default::default()
            },
        )
        .exec_with_returning(&self.setup.db)
        .await?)
    }

    /// Fetch a request by ID as currently stored.
    pub async fn get(&self, request_id: i32) -> Result<Option<PackageRequestModel>, TestError> {
        Ok(entity::prelude::UplinkPackageRequest::find_by_id(request_id)
            .one(&self.setup.db)
            .await?)
    }

    /// All earnings recorded against a request, oldest first.
    pub async fn earnings(&self, request_id: i32) -> Result<Vec<EarningModel>, TestError> {
        Ok(entity::prelude::UplinkEarning::find()
            .filter(entity::uplink_earning::Column::PackageRequestId.eq(request_id))
            .order_by_asc(entity::uplink_earning::Column::Id)
            .all(&self.setup.db)
            .await?)
    }

    /// Every earning row in the ledger.
    pub async fn all_earnings(&self) -> Result<Vec<EarningModel>, TestError> {
        Ok(entity::prelude::UplinkEarning::find()
            .order_by_asc(entity::uplink_earning::Column::Id)
            .all(&self.setup.db)
            .await?)
    }
}
