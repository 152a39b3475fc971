//! Referral graph integrity auditor.
//!
//! Scans every user for orphans (dangling referrers), self-referrals, circular
//! referral chains and drifted `referral_count` values. In apply mode each flagged row
//! is repaired in its own transaction with a conditional update that only matches the
//! still-broken value, so running the same audit twice never repairs a row twice.

use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::server::{
    data::user::UserRepository,
    error::{referral::ReferralError, Error},
    model::db::UserModel,
    referral::graph::{NodeId, Parent, ReferralGraph, WalkOutcome},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditCheck {
    /// Orphans, self-referrals, circular referrals and missing referrers
    All,
    Orphans,
    SelfReferrals,
    CircularReferrals,
    MissingReferrers,
    /// Denormalized `referral_count` drift, only run when asked for explicitly
    ReferralCounts,
}

impl AuditCheck {
    fn covers(self, check: AuditCheck) -> bool {
        match self {
            Self::All => check != Self::ReferralCounts,
            requested => requested == check,
        }
    }
}

/// How a broken referrer is repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Clear the referrer, making the user a root
    Detach,
    /// Point the user at an existing fallback referrer
    ReassignTo(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    pub check: AuditCheck,
    pub fix_issues: bool,
    pub dry_run: bool,
    pub remediation: Remediation,
}

impl AuditRequest {
    /// Report-only audit.
    pub fn dry_run(check: AuditCheck) -> Self {
        Self {
            check,
            fix_issues: false,
            dry_run: true,
            remediation: Remediation::Detach,
        }
    }

    /// Audit that repairs every flagged row with `remediation`.
    pub fn apply(check: AuditCheck, remediation: Remediation) -> Self {
        Self {
            check,
            fix_issues: true,
            dry_run: false,
            remediation,
        }
    }

    pub fn applies_fixes(&self) -> bool {
        self.fix_issues && !self.dry_run
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanIssue {
    pub user_id: i32,
    pub username: String,
    pub missing_referrer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfReferralIssue {
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleIssue {
    /// Members in referrer order, starting from the smallest username
    pub members: Vec<String>,
}

/// Orphans grouped by the referrer name they point at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReferrer {
    pub referrer: String,
    pub affected_accounts: usize,
    pub usernames: Vec<String>,
    pub total_balance: Decimal,
    pub total_earnings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralCountDrift {
    pub user_id: i32,
    pub username: String,
    pub recorded: i32,
    pub actual: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFailure {
    pub username: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub check: AuditCheck,
    pub scanned_users: usize,
    pub orphans: Vec<OrphanIssue>,
    pub self_referrals: Vec<SelfReferralIssue>,
    pub cycles: Vec<CycleIssue>,
    pub missing_referrers: Vec<MissingReferrer>,
    pub referral_count_drift: Vec<ReferralCountDrift>,
    /// Rows an apply run would change
    pub flagged: usize,
    /// Whether fixes were attempted
    pub applied: bool,
    /// Rows actually changed
    pub changed: u64,
    pub failed: usize,
    pub failures: Vec<AuditFailure>,
}

// A single row repair
enum Fix {
    Referrer {
        user_id: i32,
        username: String,
        broken: String,
        // Existing referrer losing this user as a direct referral
        old_referrer_id: Option<i32>,
    },
    ReferralCount {
        user_id: i32,
        username: String,
        recorded: i32,
        actual: i32,
    },
}

impl Fix {
    fn username(&self) -> &str {
        match self {
            Self::Referrer { username, .. } | Self::ReferralCount { username, .. } => username,
        }
    }
}

pub struct AuditService<'a> {
    db: &'a DatabaseConnection,
    max_depth: usize,
}

impl<'a> AuditService<'a> {
    /// Creates a new instance of [`AuditService`]
    ///
    /// `max_depth` bounds the upline walks used to find cycles and validate fallback
    /// referrers.
    pub fn new(db: &'a DatabaseConnection, max_depth: usize) -> Self {
        Self { db, max_depth }
    }

    /// Runs an audit, repairing flagged rows when the request applies fixes.
    ///
    /// # Returns
    /// - `Ok(AuditReport)` - Findings plus per-row fix results
    /// - `Err(Error::ReferralError(InvalidRemediation))` - Reassignment target is blank
    /// - `Err(Error::DbErr)` - Users could not be loaded
    pub async fn run(&self, request: &AuditRequest) -> Result<AuditReport, Error> {
        if let Remediation::ReassignTo(fallback) = &request.remediation {
            if request.applies_fixes() && fallback.trim().is_empty() {
                return Err(ReferralError::InvalidRemediation(
                    "fallback referrer username is empty".to_string(),
                )
                .into());
            }
        }

        let users = UserRepository::new(self.db).get_all().await?;
        let graph = ReferralGraph::new(users);

        let (mut report, fixes) = self.scan(&graph, request.check);

        if request.applies_fixes() {
            report.applied = true;
            for fix in &fixes {
                let result = match self.validate(&graph, fix, &request.remediation) {
                    Ok(fallback_id) => self.apply(fix, &request.remediation, fallback_id).await,
                    Err(reason) => Err(reason),
                };

                match result {
                    Ok(changed) => report.changed += changed,
                    Err(e) => {
                        tracing::warn!(username = %fix.username(), "Failed to repair referral: {}", e);

                        report.failed += 1;
                        report.failures.push(AuditFailure {
                            username: fix.username().to_string(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            check = ?request.check,
            scanned = report.scanned_users,
            flagged = report.flagged,
            changed = report.changed,
            failed = report.failed,
            "Referral audit complete"
        );

        Ok(report)
    }

    fn scan(&self, graph: &ReferralGraph<UserModel>, check: AuditCheck) -> (AuditReport, Vec<Fix>) {
        let mut report = AuditReport {
            check,
            scanned_users: graph.len(),
            orphans: Vec::new(),
            self_referrals: Vec::new(),
            cycles: Vec::new(),
            missing_referrers: Vec::new(),
            referral_count_drift: Vec::new(),
            flagged: 0,
            applied: false,
            changed: 0,
            failed: 0,
            failures: Vec::new(),
        };
        let mut fixes = Vec::new();

        let orphans = find_orphans(graph);
        if check.covers(AuditCheck::Orphans) || check == AuditCheck::MissingReferrers {
            fixes.extend(orphans.iter().map(|orphan| Fix::Referrer {
                user_id: orphan.user_id,
                username: orphan.username.clone(),
                broken: orphan.missing_referrer.clone(),
                old_referrer_id: None,
            }));
        }
        if check.covers(AuditCheck::MissingReferrers) {
            report.missing_referrers = group_missing_referrers(graph, &orphans);
        }
        if check.covers(AuditCheck::Orphans) {
            report.orphans = orphans;
        }

        if check.covers(AuditCheck::SelfReferrals) {
            for node in graph.node_ids() {
                if graph.parent(node) == &Parent::Node(node) {
                    let user = graph.member(node);
                    report.self_referrals.push(SelfReferralIssue {
                        user_id: user.id,
                        username: user.username.clone(),
                    });
                    fixes.push(Fix::Referrer {
                        user_id: user.id,
                        username: user.username.clone(),
                        broken: user.username.clone(),
                        old_referrer_id: None,
                    });
                }
            }
        }

        if check.covers(AuditCheck::CircularReferrals) {
            for members in find_cycles(graph, self.max_depth) {
                let head = graph.member(members[0]);
                let referrer = graph.member(members[1]);

                fixes.push(Fix::Referrer {
                    user_id: head.id,
                    username: head.username.clone(),
                    broken: referrer.username.clone(),
                    old_referrer_id: Some(referrer.id),
                });
                report.cycles.push(CycleIssue {
                    members: members
                        .iter()
                        .map(|&node| graph.username(node).to_string())
                        .collect(),
                });
            }
        }

        if check.covers(AuditCheck::ReferralCounts) {
            for node in graph.node_ids() {
                let user = graph.member(node);
                let actual = graph
                    .children(node)
                    .iter()
                    .filter(|&&child| child != node)
                    .count() as i32;

                if user.referral_count != actual {
                    report.referral_count_drift.push(ReferralCountDrift {
                        user_id: user.id,
                        username: user.username.clone(),
                        recorded: user.referral_count,
                        actual,
                    });
                    fixes.push(Fix::ReferralCount {
                        user_id: user.id,
                        username: user.username.clone(),
                        recorded: user.referral_count,
                        actual,
                    });
                }
            }
        }

        report.flagged = fixes.len();

        (report, fixes)
    }

    /// Checks a reassignment target, returning its user ID.
    fn validate(
        &self,
        graph: &ReferralGraph<UserModel>,
        fix: &Fix,
        remediation: &Remediation,
    ) -> Result<Option<i32>, Error> {
        let (Fix::Referrer { username, .. }, Remediation::ReassignTo(fallback)) = (fix, remediation)
        else {
            return Ok(None);
        };

        let invalid = |reason: String| -> Result<Option<i32>, Error> {
            Err(ReferralError::InvalidRemediation(reason).into())
        };

        let Some(fallback_node) = graph.find(fallback) else {
            return invalid(format!("fallback referrer {} does not exist", fallback));
        };
        if fallback == username {
            return invalid(format!("{} cannot be reassigned to themselves", username));
        }

        let upline = graph.collect_upline(fallback_node, self.max_depth);
        let creates_cycle = upline
            .ancestors
            .iter()
            .any(|&ancestor| graph.username(ancestor) == username);
        if creates_cycle {
            return invalid(format!(
                "reassigning {} to {} would create a referral cycle",
                username, fallback
            ));
        }

        Ok(Some(graph.member(fallback_node).id))
    }

    async fn apply(
        &self,
        fix: &Fix,
        remediation: &Remediation,
        fallback_id: Option<i32>,
    ) -> Result<u64, Error> {
        let now = Utc::now().naive_utc();
        let txn = self.db.begin().await?;
        let user_repo = UserRepository::new(&txn);

        let changed = match fix {
            Fix::Referrer {
                user_id,
                broken,
                old_referrer_id,
                ..
            } => {
                let replacement = match remediation {
                    Remediation::Detach => None,
                    Remediation::ReassignTo(fallback) => Some(fallback.as_str()),
                };

                let changed = user_repo
                    .replace_referrer(*user_id, broken, replacement, now)
                    .await?;

                if changed > 0 {
                    if let Some(old_referrer_id) = old_referrer_id {
                        user_repo
                            .adjust_referral_count(*old_referrer_id, -1, now)
                            .await?;
                    }
                    if let Some(fallback_id) = fallback_id {
                        user_repo.adjust_referral_count(fallback_id, 1, now).await?;
                    }
                }

                changed
            }
            Fix::ReferralCount {
                user_id,
                recorded,
                actual,
                ..
            } => {
                user_repo
                    .correct_referral_count(*user_id, *recorded, *actual, now)
                    .await?
            }
        };

        txn.commit().await?;

        Ok(changed)
    }
}

fn find_orphans(graph: &ReferralGraph<UserModel>) -> Vec<OrphanIssue> {
    graph
        .node_ids()
        .filter_map(|node| match graph.parent(node) {
            Parent::Dangling(missing) => {
                let user = graph.member(node);
                Some(OrphanIssue {
                    user_id: user.id,
                    username: user.username.clone(),
                    missing_referrer: missing.clone(),
                })
            }
            Parent::Root | Parent::Node(_) => None,
        })
        .collect()
}

/// Groups orphans by missing referrer, most affected accounts first.
fn group_missing_referrers(
    graph: &ReferralGraph<UserModel>,
    orphans: &[OrphanIssue],
) -> Vec<MissingReferrer> {
    let mut groups: BTreeMap<&str, MissingReferrer> = BTreeMap::new();

    for orphan in orphans {
        let Some(node) = graph.find(&orphan.username) else {
            continue;
        };
        let user = graph.member(node);

        let group = groups
            .entry(orphan.missing_referrer.as_str())
            .or_insert_with(|| MissingReferrer {
                referrer: orphan.missing_referrer.clone(),
                affected_accounts: 0,
                usernames: Vec::new(),
                total_balance: Decimal::ZERO,
                total_earnings: Decimal::ZERO,
            });
        group.affected_accounts += 1;
        group.usernames.push(user.username.clone());
        group.total_balance += user.balance;
        group.total_earnings += user.total_earnings;
    }

    let mut groups: Vec<MissingReferrer> = groups.into_values().collect();
    groups.sort_by(|a, b| b.affected_accounts.cmp(&a.affected_accounts));

    groups
}

/// Every distinct cycle of two or more members, each listed once.
///
/// Self-referrals are reported separately and members hanging off a cycle are not part
/// of it. Cycles longer than `max_depth` end in the depth limit and are not found.
fn find_cycles(graph: &ReferralGraph<UserModel>, max_depth: usize) -> Vec<Vec<NodeId>> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut cycles = Vec::new();

    for node in graph.node_ids() {
        if seen.contains(&node) || graph.parent(node) == &Parent::Node(node) {
            continue;
        }

        let WalkOutcome::Cycle { reentry, length } = graph.collect_upline(node, max_depth).outcome
        else {
            continue;
        };

        let mut members = graph.cycle_through(reentry, length + 1);
        if members.len() < 2 || seen.contains(&members[0]) {
            continue;
        }
        seen.extend(members.iter().copied());

        let Some(head) = members
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| graph.username(**a).cmp(graph.username(**b)))
            .map(|(position, _)| position)
        else {
            continue;
        };
        members.rotate_left(head);

        cycles.push(members);
    }

    cycles.sort_by(|a, b| graph.username(a[0]).cmp(graph.username(b[0])));
    cycles
}
