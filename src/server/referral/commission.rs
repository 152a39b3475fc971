//! Commission planning for a single approved package purchase.
//!
//! The distributor turns a buyer, their upline and the package terms into a list of
//! payouts plus the diagnostics encountered along the way. It writes nothing; the
//! approval service persists the plan.

use std::{collections::HashMap, fmt, str::FromStr};

use entity::sea_orm_active_enums::EarningType;
use rust_decimal::Decimal;

use super::{
    graph::{NodeId, Parent, ReferralGraph, ReferralMember, WalkOutcome},
    rank::RankLadder,
    ReferralSettings,
};
use crate::server::model::db::PackageModel;

/// What to do with an indirect tier that nobody in the upline holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TierFallback {
    /// Pay the unfilled tier to the nearest higher tier paid in the same event
    #[default]
    RollUp,
    /// Leave the unfilled tier unpaid
    Forfeit,
}

impl FromStr for TierFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "roll_up" | "rollup" => Ok(Self::RollUp),
            "forfeit" => Ok(Self::Forfeit),
            other => Err(format!(
                "expected \"roll_up\" or \"forfeit\", found {:?}",
                other
            )),
        }
    }
}

/// Monetary and point constants of a purchased package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageTerms {
    pub direct_commission: Decimal,
    pub indirect_commission: Decimal,
    pub points: i64,
}

impl From<&PackageModel> for PackageTerms {
    fn from(package: &PackageModel) -> Self {
        Self {
            direct_commission: package.package_direct_commission,
            indirect_commission: package.package_indirect_commission,
            points: package.package_points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub recipient: NodeId,
    pub username: String,
    pub amount: Decimal,
    pub earning_type: EarningType,
    pub reason: String,
}

/// Data-quality and policy conditions met while planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Buyer has no referrer so nobody earns a commission
    RootBuyer { buyer: String },
    /// `username` refers to `missing`, which does not exist
    DanglingReferrer { username: String, missing: String },
    /// Buyer refers to themselves
    SelfReferral { username: String },
    /// Upline walk stepped back onto `reentry`
    CycleDetected { reentry: String, length: usize },
    /// Upline walk stopped at the depth bound
    DepthLimitReached { depth: usize },
    /// No upline member holds `tier`
    TierUnfilled { tier: String },
    /// Commission for `from` was added to the payout for `into`
    TierRolledUp {
        from: String,
        into: String,
        recipient: String,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RootBuyer { .. } => "root_buyer",
            Self::DanglingReferrer { .. } => "dangling_referrer",
            Self::SelfReferral { .. } => "self_referral",
            Self::CycleDetected { .. } => "cycle_detected",
            Self::DepthLimitReached { .. } => "depth_limit_reached",
            Self::TierUnfilled { .. } => "tier_unfilled",
            Self::TierRolledUp { .. } => "tier_rolled_up",
        }
    }

    /// Whether the condition points at corrupted referral data.
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Self::DanglingReferrer { .. }
                | Self::SelfReferral { .. }
                | Self::CycleDetected { .. }
                | Self::DepthLimitReached { .. }
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootBuyer { buyer } => {
                write!(f, "buyer {} has no referrer, no commission paid", buyer)
            }
            Self::DanglingReferrer { username, missing } => write!(
                f,
                "{} is referred by {} which does not exist",
                username, missing
            ),
            Self::SelfReferral { username } => write!(f, "{} refers to themselves", username),
            Self::CycleDetected { reentry, length } => write!(
                f,
                "referral cycle re-entering {} after {} member(s)",
                reentry, length
            ),
            Self::DepthLimitReached { depth } => {
                write!(f, "upline walk stopped at depth limit {}", depth)
            }
            Self::TierUnfilled { tier } => write!(f, "no upline member holds {}", tier),
            Self::TierRolledUp {
                from,
                into,
                recipient,
            } => write!(
                f,
                "{} commission rolled up into {} paid to {}",
                from, into, recipient
            ),
        }
    }
}

/// Payouts and diagnostics for one purchase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommissionPlan {
    pub payouts: Vec<Payout>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CommissionPlan {
    pub fn total(&self) -> Decimal {
        self.payouts.iter().map(|payout| payout.amount).sum()
    }

    pub fn direct(&self) -> Option<&Payout> {
        self.payouts
            .iter()
            .find(|payout| payout.earning_type == EarningType::DirectCommission)
    }

    pub fn indirect(&self) -> impl Iterator<Item = &Payout> {
        self.payouts
            .iter()
            .filter(|payout| payout.earning_type == EarningType::IndirectCommission)
    }
}

pub struct CommissionDistributor<'a, T> {
    graph: &'a ReferralGraph<T>,
    ladder: &'a RankLadder,
    settings: ReferralSettings,
}

// Indirect payout for one tier, tracked while scanning the ladder
struct TierPayout {
    tier: String,
    payout: usize,
    absorbed: bool,
}

impl<'a, T: ReferralMember> CommissionDistributor<'a, T> {
    pub fn new(
        graph: &'a ReferralGraph<T>,
        ladder: &'a RankLadder,
        settings: ReferralSettings,
    ) -> Self {
        Self {
            graph,
            ladder,
            settings,
        }
    }

    /// Plans the direct and indirect commissions for `buyer` purchasing a package.
    ///
    /// The buyer's referrer receives the direct commission. Indirect commissions are
    /// paid per rank tier above the base tier, highest first, to the closest member of
    /// the upline holding exactly that tier, starting at the buyer's grandparent. Each
    /// tier is paid at most once.
    pub fn plan(&self, buyer: NodeId, terms: &PackageTerms) -> CommissionPlan {
        let mut plan = CommissionPlan::default();
        let buyer_name = self.graph.username(buyer);

        let referrer = match self.graph.parent(buyer) {
            Parent::Root => {
                plan.diagnostics.push(Diagnostic::RootBuyer {
                    buyer: buyer_name.to_string(),
                });
                return plan;
            }
            Parent::Dangling(missing) => {
                plan.diagnostics.push(Diagnostic::DanglingReferrer {
                    username: buyer_name.to_string(),
                    missing: missing.clone(),
                });
                return plan;
            }
            Parent::Node(referrer) if *referrer == buyer => {
                plan.diagnostics.push(Diagnostic::SelfReferral {
                    username: buyer_name.to_string(),
                });
                return plan;
            }
            Parent::Node(referrer) => *referrer,
        };

        plan.payouts.push(Payout {
            recipient: referrer,
            username: self.graph.username(referrer).to_string(),
            amount: terms.direct_commission,
            earning_type: EarningType::DirectCommission,
            reason: format!("Direct commission from {}", buyer_name),
        });

        let first_by_tier = self.first_member_per_tier(buyer, referrer, &mut plan.diagnostics);
        self.pay_tiers(buyer_name, &first_by_tier, terms, &mut plan);

        plan
    }

    // Closest upline member holding each rank, skipping the buyer and the referrer
    // should a corrupted graph lead back to them.
    fn first_member_per_tier(
        &self,
        buyer: NodeId,
        referrer: NodeId,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> HashMap<i32, NodeId> {
        let mut first_by_tier = HashMap::new();

        let mut walk = self.graph.walk_up(referrer, self.settings.max_depth);
        for ancestor in walk.by_ref() {
            if ancestor == buyer || ancestor == referrer {
                continue;
            }

            if let Some(rank_id) = self.graph.member(ancestor).rank_id() {
                first_by_tier.entry(rank_id).or_insert(ancestor);
            }
        }

        match walk.finish() {
            WalkOutcome::Root => {}
            WalkOutcome::Cycle { reentry, length } => {
                diagnostics.push(Diagnostic::CycleDetected {
                    reentry: self.graph.username(reentry).to_string(),
                    length,
                });
            }
            WalkOutcome::Dangling { from, missing } => {
                diagnostics.push(Diagnostic::DanglingReferrer {
                    username: self.graph.username(from).to_string(),
                    missing,
                });
            }
            WalkOutcome::DepthLimit { depth } => {
                diagnostics.push(Diagnostic::DepthLimitReached { depth });
            }
        }

        first_by_tier
    }

    fn pay_tiers(
        &self,
        buyer_name: &str,
        first_by_tier: &HashMap<i32, NodeId>,
        terms: &PackageTerms,
        plan: &mut CommissionPlan,
    ) {
        let mut paid: Vec<TierPayout> = Vec::new();

        for tier in self.ladder.tiers_above_base() {
            if let Some(&recipient) = first_by_tier.get(&tier.id) {
                paid.push(TierPayout {
                    tier: tier.title.clone(),
                    payout: plan.payouts.len(),
                    absorbed: false,
                });
                plan.payouts.push(Payout {
                    recipient,
                    username: self.graph.username(recipient).to_string(),
                    amount: terms.indirect_commission,
                    earning_type: EarningType::IndirectCommission,
                    reason: format!("{} indirect commission from {}", tier.title, buyer_name),
                });
                continue;
            }

            plan.diagnostics.push(Diagnostic::TierUnfilled {
                tier: tier.title.clone(),
            });

            if self.settings.tier_fallback == TierFallback::Forfeit {
                continue;
            }

            // Tiers are scanned highest first, so the latest unabsorbed entry is the
            // nearest higher tier.
            let Some(higher) = paid.iter_mut().rev().find(|entry| !entry.absorbed) else {
                continue;
            };
            higher.absorbed = true;

            let payout = &mut plan.payouts[higher.payout];
            payout.amount += terms.indirect_commission;
            payout.reason = format!(
                "{} indirect commission from {}, including unfilled {} tier",
                higher.tier, buyer_name, tier.title
            );

            plan.diagnostics.push(Diagnostic::TierRolledUp {
                from: tier.title.clone(),
                into: higher.tier.clone(),
                recipient: payout.username.clone(),
            });
        }
    }
}
