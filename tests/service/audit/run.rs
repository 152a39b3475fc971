//! Tests for AuditService::run.
//!
//! Covers report-only runs, idempotent remediation, reassignment to a fallback
//! referrer and the opt-in referral count check.

use rust_decimal::Decimal;
use uplink::server::{
    error::{referral::ReferralError, Error},
    service::audit::{AuditCheck, AuditRequest, AuditService, Remediation},
};

use super::*;

const MAX_DEPTH: usize = 15;

/// Builds a graph with one self-referral and one three member cycle hanging off a
/// healthy root.
async fn corrupted_graph() -> Result<TestContext, TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_user("root", None)
        .with_user("child", Some("root"))
        .with_user("selfish", None)
        .with_user("x", None)
        .with_user("y", Some("x"))
        .with_user("z", Some("y"))
        .build()
        .await?;
    test.user().set_referred_by("selfish", Some("selfish")).await?;
    test.user().set_referred_by("x", Some("z")).await?;

    Ok(test)
}

/// Tests a dry run over a self-referral and a cycle.
///
/// Verifies that exactly the two issues are reported and that no row changes.
///
/// Expected: Ok with flagged 2 and changed 0
#[tokio::test]
async fn dry_run_reports_without_changes() -> Result<(), TestError> {
    let test = corrupted_graph().await?;

    let report = AuditService::new(&test.db, MAX_DEPTH)
        .run(&AuditRequest::dry_run(AuditCheck::All))
        .await
        .expect("audit should run");

    assert_eq!(report.scanned_users, 6);
    assert_eq!(report.flagged, 2);
    assert!(!report.applied);
    assert_eq!(report.changed, 0);
    assert_eq!(report.self_referrals.len(), 1);
    assert_eq!(report.self_referrals[0].username, "selfish");
    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].members.len(), 3);
    assert_eq!(report.cycles[0].members[0], "x");
    assert!(report.orphans.is_empty());
    assert_eq!(
        test.user().get("selfish").await?.referred_by.as_deref(),
        Some("selfish")
    );
    assert_eq!(test.user().get("x").await?.referred_by.as_deref(), Some("z"));

    Ok(())
}

/// Tests that applying fixes is idempotent.
///
/// Verifies that the first apply changes exactly the flagged rows and a second
/// apply finds and changes nothing.
///
/// Expected: first run changed 2, second run flagged 0 and changed 0
#[tokio::test]
async fn apply_changes_flagged_rows_once() -> Result<(), TestError> {
    let test = corrupted_graph().await?;
    let service = AuditService::new(&test.db, MAX_DEPTH);
    let request = AuditRequest::apply(AuditCheck::All, Remediation::Detach);

    let first = service.run(&request).await.expect("audit should run");
    let second = service.run(&request).await.expect("audit should run");

    assert_eq!(first.flagged, 2);
    assert!(first.applied);
    assert_eq!(first.changed, 2);
    assert_eq!(first.failed, 0);
    assert_eq!(test.user().get("selfish").await?.referred_by, None);
    assert_eq!(test.user().get("x").await?.referred_by, None);
    assert_eq!(test.user().get("y").await?.referred_by.as_deref(), Some("x"));

    assert_eq!(second.flagged, 0);
    assert_eq!(second.changed, 0);

    Ok(())
}

/// Tests reassigning orphans to a fallback referrer.
///
/// Verifies that orphans point at the fallback afterwards and the fallback's
/// referral count grows by the number of reassigned users.
///
/// Expected: Ok with changed 2 and the fallback's referral count at 3
#[tokio::test]
async fn reassigns_orphans_to_fallback() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_user("company", None)
        .with_user("member", Some("company"))
        .with_user("lost1", Some("ghost"))
        .with_user("lost2", Some("ghost"))
        .build()
        .await?;

    let report = AuditService::new(&test.db, MAX_DEPTH)
        .run(&AuditRequest::apply(
            AuditCheck::Orphans,
            Remediation::ReassignTo("company".to_string()),
        ))
        .await
        .expect("audit should run");

    assert_eq!(report.orphans.len(), 2);
    assert_eq!(report.changed, 2);
    for username in ["lost1", "lost2"] {
        assert_eq!(
            test.user().get(username).await?.referred_by.as_deref(),
            Some("company")
        );
    }
    assert_eq!(test.user().get("company").await?.referral_count, 3);

    Ok(())
}

/// Tests reassigning to a fallback that does not exist.
///
/// Verifies that each row fails validation individually and nothing changes.
///
/// Expected: Ok with failed 1 and changed 0
#[tokio::test]
async fn records_failure_for_unknown_fallback() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_user("lost", Some("ghost"))
        .build()
        .await?;

    let report = AuditService::new(&test.db, MAX_DEPTH)
        .run(&AuditRequest::apply(
            AuditCheck::Orphans,
            Remediation::ReassignTo("nobody".to_string()),
        ))
        .await
        .expect("audit should run");

    assert_eq!(report.changed, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].username, "lost");
    assert_eq!(
        test.user().get("lost").await?.referred_by.as_deref(),
        Some("ghost")
    );

    Ok(())
}

/// Tests a blank fallback referrer.
///
/// Expected: Err(InvalidRemediation)
#[tokio::test]
async fn rejects_blank_fallback() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;

    let result = AuditService::new(&test.db, MAX_DEPTH)
        .run(&AuditRequest::apply(
            AuditCheck::All,
            Remediation::ReassignTo("  ".to_string()),
        ))
        .await;

    assert!(matches!(
        result,
        Err(Error::ReferralError(ReferralError::InvalidRemediation(_)))
    ));

    Ok(())
}

/// Tests aggregating orphans by missing referrer.
///
/// Verifies that groups are ordered by affected accounts and sum stored balances.
///
/// Expected: Ok with "ghost" first covering 2 accounts
#[tokio::test]
async fn groups_missing_referrers() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_user("a", Some("ghost"))
        .with_user("b", Some("ghost"))
        .with_user("c", Some("phantom"))
        .build()
        .await?;
    test.user()
        .set_balance("a", Decimal::from(10), Decimal::from(15))
        .await?;
    test.user()
        .set_balance("b", Decimal::from(5), Decimal::from(5))
        .await?;

    let report = AuditService::new(&test.db, MAX_DEPTH)
        .run(&AuditRequest::dry_run(AuditCheck::MissingReferrers))
        .await
        .expect("audit should run");

    assert_eq!(report.missing_referrers.len(), 2);
    let ghost = &report.missing_referrers[0];
    assert_eq!(ghost.referrer, "ghost");
    assert_eq!(ghost.affected_accounts, 2);
    assert_eq!(ghost.total_balance, Decimal::from(15));
    assert_eq!(ghost.total_earnings, Decimal::from(20));
    assert_eq!(report.missing_referrers[1].referrer, "phantom");
    assert_eq!(report.flagged, 3);

    Ok(())
}

/// Tests the referral count check.
///
/// Verifies that drift is only reported when asked for and that applying the fix
/// stores the number of users actually referring to the member.
///
/// Expected: drift ignored by All, corrected by ReferralCounts
#[tokio::test]
async fn corrects_referral_count_drift() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_user("parent", None)
        .with_user("kid", None)
        .build()
        .await?;
    // Pointer changed without maintaining the count
    test.user().set_referred_by("kid", Some("parent")).await?;
    let service = AuditService::new(&test.db, MAX_DEPTH);

    let all = service
        .run(&AuditRequest::dry_run(AuditCheck::All))
        .await
        .expect("audit should run");
    let fixed = service
        .run(&AuditRequest::apply(
            AuditCheck::ReferralCounts,
            Remediation::Detach,
        ))
        .await
        .expect("audit should run");

    assert!(all.referral_count_drift.is_empty());
    assert_eq!(fixed.referral_count_drift.len(), 1);
    assert_eq!(fixed.referral_count_drift[0].recorded, 0);
    assert_eq!(fixed.referral_count_drift[0].actual, 1);
    assert_eq!(fixed.changed, 1);
    assert_eq!(test.user().get("parent").await?.referral_count, 1);

    Ok(())
}
