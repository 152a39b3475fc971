use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Optional body for approving or rejecting a package request
#[derive(Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProcessRequestDto {
    /// Note stored on the request alongside the decision
    #[serde(default)]
    pub admin_notes: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PayoutDto {
    pub username: String,
    pub amount: Decimal,
    /// `direct_commission` or `indirect_commission`
    pub earning_type: String,
    pub reason: String,
}

/// A data-quality or policy condition met while paying commissions
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DiagnosticDto {
    pub kind: String,
    pub message: String,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ApprovalSummaryDto {
    pub request_id: i32,
    pub buyer: String,
    pub points_awarded: i64,
    pub previous_rank: Option<String>,
    pub new_rank: Option<String>,
    pub total_paid: Decimal,
    pub payouts: Vec<PayoutDto>,
    pub diagnostics: Vec<DiagnosticDto>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PackageRequestDto {
    pub id: i32,
    pub user_id: i32,
    pub package_id: i32,
    pub status: String,
    pub admin_notes: Option<String>,
    pub processed_at: Option<NaiveDateTime>,
}
