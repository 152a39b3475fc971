use sea_orm::DatabaseConnection;

use crate::server::{
    error::Error,
    referral::ReferralSettings,
    service::audit::{AuditCheck, AuditRequest, AuditService},
};

/// Runs a report-only audit of every graph check.
///
/// # Returns
/// - `Ok(usize)` - Number of flagged rows
/// - `Err(Error)` - Users could not be loaded
pub async fn run_scheduled_audit(
    db: DatabaseConnection,
    settings: ReferralSettings,
) -> Result<usize, Error> {
    let report = AuditService::new(&db, settings.max_depth)
        .run(&AuditRequest::dry_run(AuditCheck::All))
        .await?;

    for group in &report.missing_referrers {
        tracing::warn!(
            referrer = %group.referrer,
            affected_accounts = group.affected_accounts,
            total_balance = %group.total_balance,
            "Users refer to a referrer that does not exist"
        );
    }

    Ok(report.flagged)
}
