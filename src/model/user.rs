use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DownlineMemberDto {
    pub username: String,
    pub depth: usize,
    pub rank_id: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DownlineDto {
    pub username: String,
    pub total_members: usize,
    /// Members per level, the first entry counting direct referrals
    pub level_counts: Vec<usize>,
    pub members: Vec<DownlineMemberDto>,
    pub cycle_detected: bool,
}
