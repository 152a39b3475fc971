use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{
        api::ErrorDto,
        audit::{
            AuditCheckDto, AuditFailureDto, AuditReportDto, AuditRequestDto, CycleDto,
            MissingReferrerDto, OrphanDto, ReferralCountDto,
        },
    },
    server::{
        error::Error,
        model::app::AppState,
        service::audit::{AuditCheck, AuditReport, AuditRequest, AuditService, Remediation},
    },
};

pub static AUDIT_TAG: &str = "audit";

impl From<AuditCheckDto> for AuditCheck {
    fn from(check: AuditCheckDto) -> Self {
        match check {
            AuditCheckDto::All => Self::All,
            AuditCheckDto::Orphans => Self::Orphans,
            AuditCheckDto::SelfReferrals => Self::SelfReferrals,
            AuditCheckDto::CircularReferrals => Self::CircularReferrals,
            AuditCheckDto::MissingReferrers => Self::MissingReferrers,
            AuditCheckDto::ReferralCounts => Self::ReferralCounts,
        }
    }
}

impl From<AuditCheck> for AuditCheckDto {
    fn from(check: AuditCheck) -> Self {
        match check {
            AuditCheck::All => Self::All,
            AuditCheck::Orphans => Self::Orphans,
            AuditCheck::SelfReferrals => Self::SelfReferrals,
            AuditCheck::CircularReferrals => Self::CircularReferrals,
            AuditCheck::MissingReferrers => Self::MissingReferrers,
            AuditCheck::ReferralCounts => Self::ReferralCounts,
        }
    }
}

impl From<AuditRequestDto> for AuditRequest {
    fn from(request: AuditRequestDto) -> Self {
        Self {
            check: request.check.into(),
            fix_issues: request.fix_issues,
            dry_run: request.dry_run,
            remediation: match request.reassign_to {
                Some(fallback) => Remediation::ReassignTo(fallback),
                None => Remediation::Detach,
            },
        }
    }
}

impl From<AuditReport> for AuditReportDto {
    fn from(report: AuditReport) -> Self {
        Self {
            check: report.check.into(),
            scanned_users: report.scanned_users,
            orphans: report
                .orphans
                .into_iter()
                .map(|orphan| OrphanDto {
                    username: orphan.username,
                    missing_referrer: orphan.missing_referrer,
                })
                .collect(),
            self_referrals: report
                .self_referrals
                .into_iter()
                .map(|issue| issue.username)
                .collect(),
            cycles: report
                .cycles
                .into_iter()
                .map(|cycle| CycleDto {
                    members: cycle.members,
                })
                .collect(),
            missing_referrers: report
                .missing_referrers
                .into_iter()
                .map(|group| MissingReferrerDto {
                    referrer: group.referrer,
                    affected_accounts: group.affected_accounts,
                    usernames: group.usernames,
                    total_balance: group.total_balance,
                    total_earnings: group.total_earnings,
                })
                .collect(),
            referral_count_drift: report
                .referral_count_drift
                .into_iter()
                .map(|drift| ReferralCountDto {
                    username: drift.username,
                    recorded: drift.recorded,
                    actual: drift.actual,
                })
                .collect(),
            flagged: report.flagged,
            applied: report.applied,
            changed: report.changed,
            failed: report.failed,
            failures: report
                .failures
                .into_iter()
                .map(|failure| AuditFailureDto {
                    username: failure.username,
                    reason: failure.reason,
                })
                .collect(),
        }
    }
}

/// Audit referral graph integrity, optionally repairing flagged rows
#[utoipa::path(
    post,
    path = "/api/audit",
    tag = AUDIT_TAG,
    request_body = AuditRequestDto,
    responses(
        (status = 200, description = "Audit report", body = AuditReportDto),
        (status = 400, description = "Invalid remediation", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn run_audit(
    State(state): State<AppState>,
    Json(request): Json<AuditRequestDto>,
) -> Result<impl IntoResponse, Error> {
    let request = AuditRequest::from(request);

    let report = AuditService::new(&state.db, state.referral.max_depth)
        .run(&request)
        .await?;

    Ok((StatusCode::OK, Json(AuditReportDto::from(report))))
}
