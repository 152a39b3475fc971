//! Tests for PackageApprovalService::approve.
//!
//! Covers commission distribution up a healthy upline, tolerance of broken referral
//! data, idempotence of repeated approvals and ledger reconciliation.

use entity::sea_orm_active_enums::{EarningType, PackageRequestStatus};
use rust_decimal::Decimal;
use uplink::server::{
    error::{referral::ReferralError, Error},
    referral::{
        commission::{Diagnostic, TierFallback},
        ReferralSettings,
    },
    service::approval::PackageApprovalService,
};

use super::*;

/// Tests the three level C → B → A purchase.
///
/// Verifies that the direct referrer B receives the direct commission, that the
/// Manager A receives the indirect commission, and that the buyer C is credited
/// points and re-resolved to the base rank.
///
/// Expected: Ok with 500 to B, 200 to A and 50 points to C
#[tokio::test]
async fn pays_direct_and_indirect_commission() -> Result<(), TestError> {
    let test = TestBuilder::new().with_referral_tables().build().await?;
    let ladder = test.rank().insert_standard_ladder().await?;
    let (consultant, manager) = (&ladder[0], &ladder[1]);

    test.user()
        .insert_ranked_user("A", None, manager.id)
        .await?;
    test.user()
        .insert_ranked_user("B", Some("A"), consultant.id)
        .await?;
    let buyer = test.user().insert_user("C", Some("B")).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 50)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let summary = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, Some("paid by wire".to_string()))
        .await
        .expect("approval should succeed");

    assert_eq!(summary.buyer, "C");
    assert_eq!(summary.total_paid(), Decimal::from(700));
    assert_eq!(summary.new_rank.as_deref(), Some(consultant.title.as_str()));

    let a = test.user().get("A").await?;
    let b = test.user().get("B").await?;
    let c = test.user().get("C").await?;
    assert_eq!(b.balance, Decimal::from(500));
    assert_eq!(b.total_earnings, Decimal::from(500));
    assert_eq!(a.balance, Decimal::from(200));
    assert_eq!(a.total_earnings, Decimal::from(200));
    assert_eq!(c.points, 50);
    assert_eq!(c.rank_id, Some(consultant.id));
    assert_eq!(c.current_package_id, Some(package.id));
    assert!(c.package_expiry_date.is_some());

    let earnings = test.package_request().earnings(request.id).await?;
    assert_eq!(earnings.len(), 3);
    assert!(earnings.iter().any(|e| e.user_id == b.id
        && e.earning_type == EarningType::DirectCommission
        && e.amount == Decimal::from(500)));
    assert!(earnings.iter().any(|e| e.user_id == a.id
        && e.earning_type == EarningType::IndirectCommission
        && e.amount == Decimal::from(200)));
    assert!(earnings.iter().any(|e| e.user_id == c.id
        && e.earning_type == EarningType::Points
        && e.amount == Decimal::from(50)));

    let stored = test
        .package_request()
        .get(request.id)
        .await?
        .expect("request should exist");
    assert_eq!(stored.status, PackageRequestStatus::Approved);
    assert_eq!(stored.admin_notes.as_deref(), Some("paid by wire"));
    assert!(stored.processed_at.is_some());

    Ok(())
}

/// Tests a buyer whose referrer was deleted.
///
/// Verifies that the request is still approved and points are credited, but no
/// commission is paid to anybody.
///
/// Expected: Ok with no payouts and a DanglingReferrer diagnostic
#[tokio::test]
async fn approves_buyer_with_missing_referrer() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_standard_ladder()
        .build()
        .await?;
    let buyer = test.user().insert_user("C", Some("ghost")).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 50)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let summary = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, None)
        .await
        .expect("approval should succeed");

    assert!(summary.payouts.is_empty());
    assert!(summary
        .diagnostics
        .iter()
        .any(|diagnostic| diagnostic.kind() == "dangling_referrer"));

    let earnings = test.package_request().earnings(request.id).await?;
    assert_eq!(earnings.len(), 1);
    assert_eq!(earnings[0].earning_type, EarningType::Points);

    let stored = test.package_request().get(request.id).await?;
    assert_eq!(
        stored.map(|request| request.status),
        Some(PackageRequestStatus::Approved)
    );

    Ok(())
}

/// Tests a buyer at the root of the graph.
///
/// Expected: Ok with no payouts and points credited
#[tokio::test]
async fn approves_root_buyer_without_payouts() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_standard_ladder()
        .build()
        .await?;
    let buyer = test.user().insert_user("root", None).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 120)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let summary = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, None)
        .await
        .expect("approval should succeed");

    assert!(summary.payouts.is_empty());
    assert_eq!(summary.new_rank.as_deref(), Some("Manager"));
    assert_eq!(test.user().get("root").await?.points, 120);

    Ok(())
}

/// Tests approving the same request twice.
///
/// Verifies that the second approval fails before any write, leaving the ledger
/// and every balance exactly as the first approval left them.
///
/// Expected: Err(AlreadyProcessed) with no additional earnings
#[tokio::test]
async fn second_approval_changes_nothing() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_standard_ladder()
        .with_user("A", None)
        .with_user("B", Some("A"))
        .build()
        .await?;
    let buyer = test.user().insert_user("C", Some("B")).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 50)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;
    let service = PackageApprovalService::new(&test.db, ReferralSettings::default());

    service
        .approve(request.id, None)
        .await
        .expect("first approval should succeed");
    let earnings_before = test.package_request().all_earnings().await?.len();
    let b_before = test.user().get("B").await?;
    let c_before = test.user().get("C").await?;

    let result = service.approve(request.id, None).await;

    assert!(matches!(
        result,
        Err(Error::ReferralError(ReferralError::AlreadyProcessed {
            status: PackageRequestStatus::Approved,
            ..
        }))
    ));
    assert_eq!(
        test.package_request().all_earnings().await?.len(),
        earnings_before
    );
    assert_eq!(test.user().get("B").await?.balance, b_before.balance);
    assert_eq!(test.user().get("C").await?.points, c_before.points);

    Ok(())
}

/// Tests approving a rejected request.
///
/// Expected: Err(AlreadyProcessed) with status Rejected
#[tokio::test]
async fn fails_for_rejected_request() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_standard_ladder()
        .build()
        .await?;
    let buyer = test.user().insert_user("C", None).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 50)
        .await?;
    let request = test
        .package_request()
        .insert_request_with_status(buyer.id, package.id, PackageRequestStatus::Rejected)
        .await?;

    let result = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, None)
        .await;

    assert!(matches!(
        result,
        Err(Error::ReferralError(ReferralError::AlreadyProcessed {
            status: PackageRequestStatus::Rejected,
            ..
        }))
    ));
    assert_eq!(test.user().get("C").await?.points, 0);

    Ok(())
}

/// Tests approving a request that does not exist.
///
/// Expected: Err(RequestNotFound)
#[tokio::test]
async fn fails_for_unknown_request() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;

    let result = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(42, None)
        .await;

    assert!(matches!(
        result,
        Err(Error::ReferralError(ReferralError::RequestNotFound(42)))
    ));

    Ok(())
}

/// Tests the forfeit tier fallback through the service.
///
/// Verifies that with a Director above the buyer and no Manager in between, the
/// unfilled Manager tier is not rolled up when forfeiting.
///
/// Expected: Ok with the Director paid a single indirect commission
#[tokio::test]
async fn forfeit_policy_pays_single_indirect() -> Result<(), TestError> {
    let test = TestBuilder::new().with_referral_tables().build().await?;
    let ladder = test.rank().insert_standard_ladder().await?;
    let director = &ladder[2];

    test.user()
        .insert_ranked_user("A", None, director.id)
        .await?;
    test.user().insert_user("B", Some("A")).await?;
    let buyer = test.user().insert_user("C", Some("B")).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 0)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;
    let settings = ReferralSettings {
        tier_fallback: TierFallback::Forfeit,
        ..ReferralSettings::default()
    };

    PackageApprovalService::new(&test.db, settings)
        .approve(request.id, None)
        .await
        .expect("approval should succeed");

    assert_eq!(test.user().get("A").await?.balance, Decimal::from(200));
    // Zero points means no points earning
    assert_eq!(test.package_request().earnings(request.id).await?.len(), 2);

    Ok(())
}

/// Tests that the ledger reconciles with stored balances.
///
/// Verifies that after several approvals every user's `total_earnings` equals the
/// sum of their monetary earnings.
///
/// Expected: Ok with matching totals for every user
#[tokio::test]
async fn ledger_reconciles_with_total_earnings() -> Result<(), TestError> {
    let test = TestBuilder::new().with_referral_tables().build().await?;
    let ladder = test.rank().insert_standard_ladder().await?;

    test.user()
        .insert_ranked_user("A", None, ladder[1].id)
        .await?;
    test.user().insert_user("B", Some("A")).await?;
    let c = test.user().insert_user("C", Some("B")).await?;
    let d = test.user().insert_user("D", Some("C")).await?;
    let package = test
        .package()
        .insert_package(Decimal::new(12550, 2), Decimal::new(3075, 2), 30)
        .await?;
    let service = PackageApprovalService::new(&test.db, ReferralSettings::default());

    for buyer in [&c, &d, &c] {
        let request = test
            .package_request()
            .insert_request(buyer.id, package.id)
            .await?;
        service
            .approve(request.id, None)
            .await
            .expect("approval should succeed");
    }

    let earnings = test.package_request().all_earnings().await?;
    for username in ["A", "B", "C", "D"] {
        let user = test.user().get(username).await?;
        let ledger_total: Decimal = earnings
            .iter()
            .filter(|e| e.user_id == user.id && e.earning_type.is_monetary())
            .map(|e| e.amount)
            .sum();

        assert_eq!(user.total_earnings, ledger_total, "{}", username);
        assert_eq!(user.balance, ledger_total, "{}", username);
    }

    Ok(())
}

/// Tests the default roll-up tier fallback through the service.
///
/// Verifies that with a Director above the buyer and no Manager in between, the
/// unfilled Manager commission is added to the Director's payout, persisted as a
/// single earning and reflected in the Director's totals.
///
/// Expected: Ok with the Director paid 400 and a TierRolledUp diagnostic
#[tokio::test]
async fn roll_up_policy_doubles_higher_tier_payout() -> Result<(), TestError> {
    let test = TestBuilder::new().with_referral_tables().build().await?;
    let ladder = test.rank().insert_standard_ladder().await?;
    let director = &ladder[2];

    let a = test
        .user()
        .insert_ranked_user("A", None, director.id)
        .await?;
    test.user().insert_user("B", Some("A")).await?;
    let buyer = test.user().insert_user("C", Some("B")).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 0)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let summary = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, None)
        .await
        .expect("approval should succeed");

    assert!(summary.diagnostics.contains(&Diagnostic::TierRolledUp {
        from: "Manager".to_string(),
        into: "Director".to_string(),
        recipient: "A".to_string(),
    }));

    let earnings = test.package_request().earnings(request.id).await?;
    let indirect: Vec<_> = earnings
        .iter()
        .filter(|e| e.earning_type == EarningType::IndirectCommission)
        .collect();
    assert_eq!(indirect.len(), 1);
    assert_eq!(indirect[0].user_id, a.id);
    assert_eq!(indirect[0].amount, Decimal::from(400));

    let a = test.user().get("A").await?;
    assert_eq!(a.balance, Decimal::from(400));
    assert_eq!(a.total_earnings, Decimal::from(400));

    Ok(())
}

/// Tests a package whose validity overflows the expiry date.
///
/// Verifies that approval fails with an error instead of panicking and that the
/// transaction is rolled back, leaving the request pending and the buyer untouched.
///
/// Expected: Err(InvalidPackage) with the request still pending
#[tokio::test]
async fn fails_for_overflowing_validity() -> Result<(), TestError> {
    let test = TestBuilder::new()
        .with_referral_tables()
        .with_standard_ladder()
        .with_user("B", None)
        .build()
        .await?;
    let buyer = test.user().insert_user("C", Some("B")).await?;
    let package = test
        .package()
        .insert_package_with_validity(Decimal::from(500), Decimal::from(200), 50, i32::MAX)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let result = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, None)
        .await;

    assert!(matches!(
        result,
        Err(Error::ReferralError(ReferralError::InvalidPackage { package_id, .. }))
            if package_id == package.id
    ));
    let stored = test.package_request().get(request.id).await?;
    assert_eq!(
        stored.map(|request| request.status),
        Some(PackageRequestStatus::Pending)
    );
    let c = test.user().get("C").await?;
    assert_eq!(c.points, 0);
    assert_eq!(c.package_expiry_date, None);
    assert!(test.package_request().all_earnings().await?.is_empty());

    Ok(())
}

/// Tests a package with a negative validity.
///
/// Expected: Err(InvalidPackage) with no earnings written
#[tokio::test]
async fn fails_for_negative_validity() -> Result<(), TestError> {
    let test = test_setup_with_referral_tables!()?;
    let buyer = test.user().insert_user("C", None).await?;
    let package = test
        .package()
        .insert_package_with_validity(Decimal::from(500), Decimal::from(200), 50, -1)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;

    let result = PackageApprovalService::new(&test.db, ReferralSettings::default())
        .approve(request.id, None)
        .await;

    assert!(matches!(
        result,
        Err(Error::ReferralError(ReferralError::InvalidPackage { .. }))
    ));
    assert!(test.package_request().all_earnings().await?.is_empty());

    Ok(())
}

/// Tests the depth bound on an upline longer than the maximum depth.
///
/// Verifies that only the bounded upline is considered: a Director beyond the
/// bound is not paid and the walk reports the depth limit, not a missing referrer.
///
/// Expected: Ok with DepthLimitReached { depth: 3 } and the Director unpaid
#[tokio::test]
async fn stops_at_depth_limit_on_long_upline() -> Result<(), TestError> {
    let test = TestBuilder::new().with_referral_tables().build().await?;
    let ladder = test.rank().insert_standard_ladder().await?;

    test.user()
        .insert_ranked_user("u0", None, ladder[2].id)
        .await?;
    for i in 1..8 {
        let referrer = format!("u{}", i - 1);
        test.user()
            .insert_user(&format!("u{}", i), Some(referrer.as_str()))
            .await?;
    }
    let buyer = test.user().get("u7").await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 0)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;
    let settings = ReferralSettings {
        max_depth: 3,
        ..ReferralSettings::default()
    };

    let summary = PackageApprovalService::new(&test.db, settings)
        .approve(request.id, None)
        .await
        .expect("approval should succeed");

    assert!(summary
        .diagnostics
        .contains(&Diagnostic::DepthLimitReached { depth: 3 }));
    assert!(!summary
        .diagnostics
        .iter()
        .any(|diagnostic| diagnostic.kind() == "dangling_referrer"));
    assert_eq!(summary.payouts.len(), 1);
    assert_eq!(test.user().get("u6").await?.balance, Decimal::from(500));
    assert_eq!(test.user().get("u0").await?.balance, Decimal::ZERO);

    Ok(())
}

/// Tests two approvals of the same request in flight at once.
///
/// Verifies that the conditional status update lets exactly one approval through,
/// the other observing AlreadyProcessed, and that a single set of earnings is
/// written.
///
/// Expected: one Ok, one Err(AlreadyProcessed) and three earnings
#[tokio::test]
async fn concurrent_approvals_pay_once() -> Result<(), TestError> {
    let test = TestBuilder::new().with_referral_tables().build().await?;
    let ladder = test.rank().insert_standard_ladder().await?;
    test.user()
        .insert_ranked_user("A", None, ladder[1].id)
        .await?;
    test.user().insert_user("B", Some("A")).await?;
    let buyer = test.user().insert_user("C", Some("B")).await?;
    let package = test
        .package()
        .insert_package(Decimal::from(500), Decimal::from(200), 50)
        .await?;
    let request = test
        .package_request()
        .insert_request(buyer.id, package.id)
        .await?;
    let service = PackageApprovalService::new(&test.db, ReferralSettings::default());

    let (first, second) = tokio::join!(
        service.approve(request.id, None),
        service.approve(request.id, None)
    );

    let results = [first, second];
    let approved = results.iter().filter(|result| result.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|result| {
            matches!(
                result,
                Err(Error::ReferralError(ReferralError::AlreadyProcessed { .. }))
            )
        })
        .count();
    assert_eq!(approved, 1);
    assert_eq!(conflicts, 1);

    assert_eq!(test.package_request().all_earnings().await?.len(), 3);
    assert_eq!(test.user().get("B").await?.balance, Decimal::from(500));
    assert_eq!(test.user().get("A").await?.balance, Decimal::from(200));
    assert_eq!(test.user().get("C").await?.points, 50);

    Ok(())
}
