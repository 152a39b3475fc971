//! Package approval orchestration.
//!
//! Approving a request attaches the package to the buyer, credits points, re-resolves
//! the buyer's rank and pays the commission plan, all inside one transaction whose
//! first statement claims the request with a conditional status update.

use chrono::{Duration, NaiveDateTime, Utc};
use entity::sea_orm_active_enums::{EarningType, PackageRequestStatus};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::server::{
    data::{
        earning::EarningRepository, package::PackageRepository,
        package_request::PackageRequestRepository, rank::RankRepository, user::UserRepository,
    },
    error::{referral::ReferralError, Error},
    model::db::{PackageModel, PackageRequestModel},
    referral::{
        commission::{CommissionDistributor, Diagnostic, PackageTerms, Payout},
        graph::ReferralGraph,
        rank::RankLadder,
        ReferralSettings,
    },
    service::retry::RetryContext,
};

/// Result of a successful approval.
#[derive(Debug, Clone)]
pub struct ApprovalSummary {
    pub request_id: i32,
    pub buyer: String,
    pub points_awarded: i64,
    pub previous_rank: Option<String>,
    pub new_rank: Option<String>,
    pub payouts: Vec<Payout>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ApprovalSummary {
    pub fn total_paid(&self) -> Decimal {
        self.payouts.iter().map(|payout| payout.amount).sum()
    }
}

pub struct PackageApprovalService<'a> {
    db: &'a DatabaseConnection,
    settings: ReferralSettings,
}

impl<'a> PackageApprovalService<'a> {
    /// Creates a new instance of [`PackageApprovalService`]
    pub fn new(db: &'a DatabaseConnection, settings: ReferralSettings) -> Self {
        Self { db, settings }
    }

    /// Approves a pending package request and pays its commissions.
    ///
    /// Runs [`approve_within`] in its own transaction, retrying transient connection
    /// failures. Diagnostics are logged once the transaction has committed.
    ///
    /// # Returns
    /// - `Ok(ApprovalSummary)` - Request approved and every payout persisted
    /// - `Err(Error::ReferralError(AlreadyProcessed))` - Request was no longer pending, nothing changed
    /// - `Err(Error::ReferralError(RequestNotFound))` - No request with this ID
    /// - `Err(Error::DbErr)` - Database failure, the whole approval was rolled back
    pub async fn approve(
        &self,
        request_id: i32,
        admin_notes: Option<String>,
    ) -> Result<ApprovalSummary, Error> {
        let description = format!("approval of package request {}", request_id);

        let summary = RetryContext::new()
            .execute_with_retry(&description, || {
                let admin_notes = admin_notes.clone();
                async move {
                    let txn = self.db.begin().await?;
                    let summary =
                        approve_within(&txn, self.settings, request_id, admin_notes).await?;
                    txn.commit().await?;

                    Ok(summary)
                }
            })
            .await?;

        for diagnostic in &summary.diagnostics {
            if diagnostic.is_anomaly() {
                tracing::warn!(
                    request_id = %request_id,
                    kind = diagnostic.kind(),
                    "{}",
                    diagnostic
                );
            } else {
                tracing::info!(
                    request_id = %request_id,
                    kind = diagnostic.kind(),
                    "{}",
                    diagnostic
                );
            }
        }

        tracing::info!(
            request_id = %request_id,
            buyer = %summary.buyer,
            payouts = summary.payouts.len(),
            total_paid = %summary.total_paid(),
            "Approved package request"
        );

        Ok(summary)
    }

    /// Rejects a pending package request. No balances, points or earnings change.
    pub async fn reject(
        &self,
        request_id: i32,
        admin_notes: Option<String>,
    ) -> Result<PackageRequestModel, Error> {
        let txn = self.db.begin().await?;
        let request = reject_within(&txn, request_id, admin_notes).await?;
        txn.commit().await?;

        tracing::info!(request_id = %request_id, "Rejected package request");

        Ok(request)
    }
}

/// Approves a request using a caller-supplied connection or transaction.
///
/// Nothing is committed here; the caller decides whether the work persists. Every
/// write happens after the request was claimed, so a second call for the same request
/// fails with `AlreadyProcessed` before touching any balance.
pub async fn approve_within<C: ConnectionTrait>(
    conn: &C,
    settings: ReferralSettings,
    request_id: i32,
    admin_notes: Option<String>,
) -> Result<ApprovalSummary, Error> {
    let now = Utc::now().naive_utc();
    let request = claim_pending(
        conn,
        request_id,
        PackageRequestStatus::Approved,
        admin_notes,
        now,
    )
    .await?;

    let package = PackageRepository::new(conn)
        .get(request.package_id)
        .await?
        .ok_or(ReferralError::PackageNotFound(request.package_id))?;
    let terms = PackageTerms::from(&package);

    let buyer_not_found = || ReferralError::BuyerNotFound {
        request_id,
        user_id: request.user_id,
    };

    let user_repo = UserRepository::new(conn);
    let expires_at = package_expiry(&package, now)?;
    if !user_repo
        .credit_package(request.user_id, package.id, terms.points, expires_at, now)
        .await?
    {
        return Err(buyer_not_found().into());
    }

    let ladder = RankLadder::from_models(RankRepository::new(conn).get_all().await?)?;
    // Buyer, referrer, `max_depth` ancestors and the parent of the deepest one, so
    // the walk can tell a depth limit apart from a missing referrer
    let chain = user_repo
        .get_referral_chain(request.user_id, settings.max_depth.saturating_add(3))
        .await?;
    let graph = ReferralGraph::new(chain);
    let buyer_node = graph
        .node_ids()
        .find(|&node| graph.member(node).id == request.user_id)
        .ok_or_else(buyer_not_found)?;
    let buyer = graph.member(buyer_node);

    // Ranks only move up; an admin-assigned rank above the resolved one is kept
    let previous_rank = buyer.rank_id.and_then(|rank_id| ladder.get(rank_id));
    let new_rank = match (previous_rank, ladder.resolve(buyer.points)) {
        (current, None) => current,
        (Some(current), Some(resolved))
            if ladder.position(current.id) >= ladder.position(resolved.id) =>
        {
            Some(current)
        }
        (_, Some(resolved)) => {
            user_repo.set_rank(buyer.id, resolved.id, now).await?;
            Some(resolved)
        }
    };

    let plan = CommissionDistributor::new(&graph, &ladder, settings).plan(buyer_node, &terms);

    let earning_repo = EarningRepository::new(conn);
    for payout in &plan.payouts {
        let recipient = graph.member(payout.recipient);
        earning_repo
            .create(
                recipient.id,
                request_id,
                payout.amount,
                payout.earning_type,
                payout.reason.clone(),
            )
            .await?;
        user_repo
            .credit_earnings(recipient.id, payout.amount, now)
            .await?;
    }

    if terms.points > 0 {
        earning_repo
            .create(
                buyer.id,
                request_id,
                Decimal::from(terms.points),
                EarningType::Points,
                format!("{} points from {} package", terms.points, package.name),
            )
            .await?;
    }

    Ok(ApprovalSummary {
        request_id,
        buyer: buyer.username.clone(),
        points_awarded: terms.points,
        previous_rank: previous_rank.map(|tier| tier.title.clone()),
        new_rank: new_rank.map(|tier| tier.title.clone()),
        payouts: plan.payouts,
        diagnostics: plan.diagnostics,
    })
}

/// Rejects a request using a caller-supplied connection or transaction.
pub async fn reject_within<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    admin_notes: Option<String>,
) -> Result<PackageRequestModel, Error> {
    claim_pending(
        conn,
        request_id,
        PackageRequestStatus::Rejected,
        admin_notes,
        Utc::now().naive_utc(),
    )
    .await
}

/// Expiry of a package approved at `now`.
fn package_expiry(
    package: &PackageModel,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, ReferralError> {
    let invalid = |reason: &str| ReferralError::InvalidPackage {
        package_id: package.id,
        reason: reason.to_string(),
    };

    if package.validity_days < 0 {
        return Err(invalid("validity_days is negative"));
    }

    Duration::try_days(i64::from(package.validity_days))
        .and_then(|validity| now.checked_add_signed(validity))
        .ok_or_else(|| invalid("validity_days overflows the expiry date"))
}

async fn claim_pending<C: ConnectionTrait>(
    conn: &C,
    request_id: i32,
    status: PackageRequestStatus,
    admin_notes: Option<String>,
    now: NaiveDateTime,
) -> Result<PackageRequestModel, Error> {
    let repo = PackageRequestRepository::new(conn);

    if !repo
        .transition_from_pending(request_id, status, admin_notes, now)
        .await?
    {
        let error = match repo.get(request_id).await? {
            Some(existing) => ReferralError::AlreadyProcessed {
                request_id,
                status: existing.status,
            },
            None => ReferralError::RequestNotFound(request_id),
        };

        return Err(error.into());
    }

    Ok(repo
        .get(request_id)
        .await?
        .ok_or(ReferralError::RequestNotFound(request_id))?)
}
