use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::ActiveEnum;

use crate::{
    model::{
        api::ErrorDto,
        package_request::{
            ApprovalSummaryDto, DiagnosticDto, PackageRequestDto, PayoutDto, ProcessRequestDto,
        },
    },
    server::{
        error::Error,
        model::{app::AppState, db::PackageRequestModel},
        service::approval::{ApprovalSummary, PackageApprovalService},
    },
};

pub static PACKAGE_REQUEST_TAG: &str = "package-request";

impl From<ApprovalSummary> for ApprovalSummaryDto {
    fn from(summary: ApprovalSummary) -> Self {
        let total_paid = summary.total_paid();

        Self {
            request_id: summary.request_id,
            buyer: summary.buyer,
            points_awarded: summary.points_awarded,
            previous_rank: summary.previous_rank,
            new_rank: summary.new_rank,
            total_paid,
            payouts: summary
                .payouts
                .into_iter()
                .map(|payout| PayoutDto {
                    username: payout.username,
                    amount: payout.amount,
                    earning_type: payout.earning_type.to_value(),
                    reason: payout.reason,
                })
                .collect(),
            diagnostics: summary
                .diagnostics
                .iter()
                .map(|diagnostic| DiagnosticDto {
                    kind: diagnostic.kind().to_string(),
                    message: diagnostic.to_string(),
                })
                .collect(),
        }
    }
}

impl From<PackageRequestModel> for PackageRequestDto {
    fn from(request: PackageRequestModel) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            package_id: request.package_id,
            status: request.status.to_value(),
            admin_notes: request.admin_notes,
            processed_at: request.processed_at,
        }
    }
}

/// Approve a pending package request and pay its commissions
#[utoipa::path(
    post,
    path = "/api/package-requests/{id}/approve",
    tag = PACKAGE_REQUEST_TAG,
    params(("id" = i32, Path, description = "Package request ID")),
    request_body(content = ProcessRequestDto, description = "Optional admin notes"),
    responses(
        (status = 200, description = "Request approved and commissions paid", body = ApprovalSummaryDto),
        (status = 404, description = "Package request not found", body = ErrorDto),
        (status = 409, description = "Package request already processed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn approve_package_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<ProcessRequestDto>>,
) -> Result<impl IntoResponse, Error> {
    let admin_notes = body.and_then(|Json(body)| body.admin_notes);

    let summary = PackageApprovalService::new(&state.db, state.referral)
        .approve(id, admin_notes)
        .await?;

    Ok((StatusCode::OK, Json(ApprovalSummaryDto::from(summary))))
}

/// Reject a pending package request
#[utoipa::path(
    post,
    path = "/api/package-requests/{id}/reject",
    tag = PACKAGE_REQUEST_TAG,
    params(("id" = i32, Path, description = "Package request ID")),
    request_body(content = ProcessRequestDto, description = "Optional admin notes"),
    responses(
        (status = 200, description = "Request rejected", body = PackageRequestDto),
        (status = 404, description = "Package request not found", body = ErrorDto),
        (status = 409, description = "Package request already processed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn reject_package_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<ProcessRequestDto>>,
) -> Result<impl IntoResponse, Error> {
    let admin_notes = body.and_then(|Json(body)| body.admin_notes);

    let request = PackageApprovalService::new(&state.db, state.referral)
        .reject(id, admin_notes)
        .await?;

    Ok((StatusCode::OK, Json(PackageRequestDto::from(request))))
}
