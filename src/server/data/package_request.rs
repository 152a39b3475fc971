use chrono::NaiveDateTime;
use entity::sea_orm_active_enums::PackageRequestStatus;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter,
};

use crate::server::model::db::PackageRequestModel;

pub struct PackageRequestRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PackageRequestRepository<'a, C> {
    /// Creates a new instance of [`PackageRequestRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn get(&self, request_id: i32) -> Result<Option<PackageRequestModel>, DbErr> {
        entity::prelude::UplinkPackageRequest::find_by_id(request_id)
            .one(self.db)
            .await
    }

    /// Moves a request out of `pending` in a single conditional update.
    ///
    /// The update only matches while the stored status is still `pending`, so of two
    /// concurrent callers exactly one sees `true`. Returns `false` when the request is
    /// missing or was already processed; `admin_notes` is only written on success.
    pub async fn transition_from_pending(
        &self,
        request_id: i32,
        status: PackageRequestStatus,
        admin_notes: Option<String>,
        processed_at: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let mut update = entity::prelude::UplinkPackageRequest::update_many()
            .col_expr(
                entity::uplink_package_request::Column::Status,
                Expr::value(status),
            )
            .col_expr(
                entity::uplink_package_request::Column::ProcessedAt,
                Expr::value(Some(processed_at)),
            )
            .col_expr(
                entity::uplink_package_request::Column::UpdatedAt,
                Expr::value(processed_at),
            );

        if let Some(notes) = admin_notes {
            update = update.col_expr(
                entity::uplink_package_request::Column::AdminNotes,
                Expr::value(Some(notes)),
            );
        }

        let result = update
            .filter(entity::uplink_package_request::Column::Id.eq(request_id))
            .filter(
                entity::uplink_package_request::Column::Status.eq(PackageRequestStatus::Pending),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
