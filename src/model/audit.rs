use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditCheckDto {
    #[default]
    All,
    Orphans,
    SelfReferrals,
    CircularReferrals,
    MissingReferrers,
    ReferralCounts,
}

fn default_dry_run() -> bool {
    true
}

/// Parameters of an integrity audit
#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuditRequestDto {
    #[serde(default)]
    pub check: AuditCheckDto,
    /// Repair flagged rows, only honoured when `dry_run` is false
    #[serde(default)]
    pub fix_issues: bool,
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
    /// Reassign broken referrers to this user instead of clearing them
    #[serde(default)]
    pub reassign_to: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct OrphanDto {
    pub username: String,
    pub missing_referrer: String,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CycleDto {
    pub members: Vec<String>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MissingReferrerDto {
    pub referrer: String,
    pub affected_accounts: usize,
    pub usernames: Vec<String>,
    pub total_balance: Decimal,
    pub total_earnings: Decimal,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ReferralCountDto {
    pub username: String,
    pub recorded: i32,
    pub actual: i32,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuditFailureDto {
    pub username: String,
    pub reason: String,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AuditReportDto {
    pub check: AuditCheckDto,
    pub scanned_users: usize,
    pub orphans: Vec<OrphanDto>,
    pub self_referrals: Vec<String>,
    pub cycles: Vec<CycleDto>,
    pub missing_referrers: Vec<MissingReferrerDto>,
    pub referral_count_drift: Vec<ReferralCountDto>,
    pub flagged: usize,
    pub applied: bool,
    pub changed: u64,
    pub failed: usize,
    pub failures: Vec<AuditFailureDto>,
}
