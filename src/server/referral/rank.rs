//! Rank ladder built from the rank table.
//!
//! Ranks are ordered purely by `required_points`; titles carry no meaning to the engine.

use std::collections::HashSet;

use crate::server::{error::referral::ReferralError, model::db::RankModel};

/// One rung of the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    pub id: i32,
    pub title: String,
    pub required_points: i64,
}

impl From<RankModel> for Tier {
    fn from(rank: RankModel) -> Self {
        Self {
            id: rank.id,
            title: rank.title,
            required_points: rank.required_points,
        }
    }
}

/// Ranks sorted from the highest threshold down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankLadder {
    tiers: Vec<Tier>,
}

impl RankLadder {
    /// Builds a ladder, rejecting two ranks with the same threshold.
    pub fn new(ranks: impl IntoIterator<Item = Tier>) -> Result<Self, ReferralError> {
        let mut tiers: Vec<Tier> = ranks.into_iter().collect();

        let mut thresholds = HashSet::with_capacity(tiers.len());
        for tier in &tiers {
            if !thresholds.insert(tier.required_points) {
                return Err(ReferralError::InvalidRankLadder {
                    required_points: tier.required_points,
                });
            }
        }

        tiers.sort_by(|a, b| b.required_points.cmp(&a.required_points));

        Ok(Self { tiers })
    }

    pub fn from_models(ranks: Vec<RankModel>) -> Result<Self, ReferralError> {
        Self::new(ranks.into_iter().map(Tier::from))
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// The highest tier whose threshold is at or below `points`.
    ///
    /// Falls back to the base tier when `points` is below every threshold, and returns
    /// `None` only for an empty ladder.
    pub fn resolve(&self, points: i64) -> Option<&Tier> {
        self.tiers
            .iter()
            .find(|tier| tier.required_points <= points)
            .or_else(|| self.base())
    }

    /// The tier with the lowest threshold.
    pub fn base(&self) -> Option<&Tier> {
        self.tiers.last()
    }

    /// Every tier except the base one, highest first.
    pub fn tiers_above_base(&self) -> &[Tier] {
        match self.tiers.split_last() {
            Some((_, above)) => above,
            None => &[],
        }
    }

    pub fn get(&self, rank_id: i32) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.id == rank_id)
    }

    /// Position of a rank counted upward from the base tier (base = 0).
    pub fn position(&self, rank_id: i32) -> Option<usize> {
        self.tiers
            .iter()
            .position(|tier| tier.id == rank_id)
            .map(|index| self.tiers.len() - 1 - index)
    }
}
