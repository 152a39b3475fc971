
use super::graph::{ReferralGraph, ReferralMember};

/// Minimal graph member used by the pure referral tests.
#[derive(Debug, Clone)]
struct Member {
    username: String,
    referred_by: Option<String>,
    rank_id: Option<i32>,
}

impl ReferralMember for Member {
    fn username(&self) -> &str {
        &self.username
    }

    fn referred_by(&self) -> Option<&str> {
        self.referred_by.as_deref()
    }

    fn rank_id(&self) -> Option<i32> {
        self.rank_id
    }
}

fn member(username: &str, referred_by: Option<&str>) -> Member {
    Member {
        username: username.to_string(),
        referred_by: referred_by.map(str::to_string),
        rank_id: None,
    }
}

fn ranked(username: &str, referred_by: Option<&str>, rank_id: i32) -> Member {
    Member {
        rank_id: Some(rank_id),
        ..member(username, referred_by)
    }
}

/// Builds a graph from `(username, referred_by)` pairs.
fn graph(edges: &[(&str, Option<&str>)]) -> ReferralGraph<Member> {
    ReferralGraph::new(
        edges
            .iter()
            .map(|(username, referred_by)| member(username, *referred_by))
            .collect(),
    )
}
