//! Referral graph traversal, rank resolution and commission planning.
//!
//! Everything in this module is pure: it operates on records already loaded from the
//! database and performs no I/O. The approval and audit services load users and ranks,
//! hand them to these types, and persist whatever plan comes back.

pub mod commission;
pub mod graph;
pub mod rank;

#[cfg(test)]
mod tests;

use self::commission::TierFallback;

/// Default bound on how many ancestors a single upline walk may visit.
pub const DEFAULT_MAX_REFERRAL_DEPTH: usize = 15;

/// Tunables shared by the approval and audit services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferralSettings {
    /// Maximum ancestors visited per upline walk
    pub max_depth: usize,
    /// What happens to an indirect tier nobody in the upline holds
    pub tier_fallback: TierFallback,
}

impl Default for ReferralSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_REFERRAL_DEPTH,
            tier_fallback: TierFallback::default(),
        }
    }
}
