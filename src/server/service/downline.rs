use sea_orm::DatabaseConnection;

use crate::server::{
    data::user::UserRepository,
    error::{referral::ReferralError, Error},
    referral::graph::ReferralGraph,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownlineMember {
    pub username: String,
    /// 1 for a direct referral
    pub depth: usize,
    pub rank_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownlineReport {
    pub username: String,
    pub total_members: usize,
    /// Members per depth, index 0 holding direct referrals
    pub level_counts: Vec<usize>,
    pub members: Vec<DownlineMember>,
    pub cycle_detected: bool,
}

pub struct DownlineService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DownlineService<'a> {
    /// Creates a new instance of [`DownlineService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Collects every direct and indirect referral of `username`.
    ///
    /// # Returns
    /// - `Ok(DownlineReport)` - Members ordered by depth
    /// - `Err(Error::ReferralError(UserNotFound))` - No user with this username
    pub async fn get_downline(&self, username: &str) -> Result<DownlineReport, Error> {
        let graph = ReferralGraph::new(UserRepository::new(self.db).get_all().await?);
        let start = graph
            .find(username)
            .ok_or_else(|| ReferralError::UserNotFound(username.to_string()))?;

        let downline = graph.walk_down(start);
        if downline.cycle_detected {
            tracing::warn!(username = %username, "Referral cycle found below user");
        }

        Ok(DownlineReport {
            username: username.to_string(),
            total_members: downline.members.len(),
            level_counts: downline.level_counts(),
            members: downline
                .members
                .iter()
                .map(|&(node, depth)| {
                    let member = graph.member(node);
                    DownlineMember {
                        username: member.username.clone(),
                        depth,
                        rank_id: member.rank_id,
                    }
                })
                .collect(),
            cycle_detected: downline.cycle_detected,
        })
    }
}
