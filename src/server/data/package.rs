use sea_orm::{ConnectionTrait, DbErr, EntityTrait};

use crate::server::model::db::PackageModel;

pub struct PackageRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PackageRepository<'a, C> {
    /// Creates a new instance of [`PackageRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, package_id: i32) -> Result<Option<PackageModel>, DbErr> {
        entity::prelude::UplinkPackage::find_by_id(package_id)
            .one(self.db)
            .await
    }
}
