//! In-memory referral graph built from user rows.
//!
//! Users point at their referrer by username with no referential integrity, so the
//! stored graph may contain dangling pointers, self-references and cycles. The graph
//! resolves every pointer once at build time into a [`Parent`] and assigns each user a
//! dense [`NodeId`]; walks then operate on indices instead of repeated string lookups.

use std::collections::{HashMap, HashSet, VecDeque};

/// A record that can be placed in a [`ReferralGraph`].
pub trait ReferralMember {
    /// Unique username, the key other members refer to.
    fn username(&self) -> &str;
    /// Username of this member's referrer, if any.
    fn referred_by(&self) -> Option<&str>;
    /// Current rank held by this member.
    fn rank_id(&self) -> Option<i32>;
}

impl ReferralMember for entity::uplink_user::Model {
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

/// Handle to a member of a [`ReferralGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A member's referrer as resolved at graph build time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    /// No referrer, the member is the root of a tree
    Root,
    /// Referrer exists; may be the member itself for a self-referral
    Node(NodeId),
    /// Referrer username has no matching member
    Dangling(String),
}

/// How an upline walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Reached a member with no referrer
    Root,
    /// Stepped back onto `reentry`, which had already been visited.
    ///
    /// `length` is the number of records yielded between the first and second visit of
    /// `reentry`, so a self-referral has length 0.
    Cycle { reentry: NodeId, length: usize },
    /// `from` refers to the username `missing`, which has no member
    Dangling { from: NodeId, missing: String },
    /// Stopped after yielding `depth` ancestors without reaching a root
    DepthLimit { depth: usize },
}

/// Ancestors of a member together with how the walk ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upline {
    /// Ancestors closest first, starting at the member's referrer
    pub ancestors: Vec<NodeId>,
    pub outcome: WalkOutcome,
}

/// Descendants of a member discovered breadth-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downline {
    /// `(member, depth)` pairs where depth 1 is a direct referral
    pub members: Vec<(NodeId, usize)>,
    /// Whether an edge back into already visited members was seen
    pub cycle_detected: bool,
}

impl Downline {
    /// Number of members found at each depth, index 0 holding depth 1.
    pub fn level_counts(&self) -> Vec<usize> {
        let mut counts: Vec<usize> = Vec::new();
        for &(_, depth) in &self.members {
            if counts.len() < depth {
                counts.resize(depth, 0);
            }
            counts[depth - 1] += 1;
        }

        counts
    }
}

pub struct ReferralGraph<T> {
    members: Vec<T>,
    parents: Vec<Parent>,
    children: Vec<Vec<NodeId>>,
    index: HashMap<String, NodeId>,
}

impl<T: ReferralMember> ReferralGraph<T> {
    /// Builds the graph, resolving every referrer pointer once.
    ///
    /// Usernames are expected to be unique; should a duplicate appear, lookups by that
    /// username resolve to the first member carrying it.
    pub fn new(members: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            index
                .entry(member.username().to_string())
                .or_insert(NodeId(position));
        }

        let mut children = vec![Vec::new(); members.len()];
        let parents = members
            .iter()
            .enumerate()
            .map(|(position, member)| match member.referred_by() {
                None => Parent::Root,
                Some(referrer) => match index.get(referrer) {
                    Some(&parent) => {
                        children[parent.0].push(NodeId(position));
                        Parent::Node(parent)
                    }
                    None => Parent::Dangling(referrer.to_string()),
                },
            })
            .collect();

        Self {
            members,
            parents,
            children,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn find(&self, username: &str) -> Option<NodeId> {
        self.index.get(username).copied()
    }

    pub fn member(&self, node: NodeId) -> &T {
        &self.members[node.0]
    }

    pub fn username(&self, node: NodeId) -> &str {
        self.members[node.0].username()
    }

    pub fn parent(&self, node: NodeId) -> &Parent {
        &self.parents[node.0]
    }

    /// Members whose referrer resolves to `node`, in build order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.children[node.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.members.len()).map(NodeId)
    }

    /// Lazily walks the ancestors of `start`, beginning with its referrer.
    ///
    /// The walk yields at most `max_depth` members and always terminates; call
    /// [`WalkUp::outcome`] once it is exhausted to learn why it stopped.
    pub fn walk_up(&self, start: NodeId, max_depth: usize) -> WalkUp<'_, T> {
        let mut visited = HashMap::new();
        visited.insert(start, 0);

        WalkUp {
            graph: self,
            current: start,
            depth: 0,
            max_depth,
            visited,
            outcome: None,
        }
    }

    /// Collects the whole upline of `start` in one call.
    pub fn collect_upline(&self, start: NodeId, max_depth: usize) -> Upline {
        let mut walk = self.walk_up(start, max_depth);
        let ancestors = walk.by_ref().collect();

        Upline {
            ancestors,
            outcome: walk.finish(),
        }
    }

    /// Breadth-first walk over every descendant of `start`.
    ///
    /// Uses an explicit queue and a visited set so arbitrarily deep or cyclic trees
    /// neither recurse nor loop.
    pub fn walk_down(&self, start: NodeId) -> Downline {
        let mut visited = HashSet::new();
        visited.insert(start);

        let mut queue = VecDeque::new();
        queue.push_back((start, 0));

        let mut members = Vec::new();
        let mut cycle_detected = false;

        while let Some((node, depth)) = queue.pop_front() {
            for &child in self.children(node) {
                if !visited.insert(child) {
                    cycle_detected = true;
                    continue;
                }

                members.push((child, depth + 1));
                queue.push_back((child, depth + 1));
            }
        }

        Downline {
            members,
            cycle_detected,
        }
    }

    /// Members of the cycle passing through `reentry`, in referrer order.
    ///
    /// Returns an empty list when `reentry` is not on a cycle within `max_len` steps.
    pub fn cycle_through(&self, reentry: NodeId, max_len: usize) -> Vec<NodeId> {
        let mut members = vec![reentry];
        let mut current = reentry;

        for _ in 0..max_len {
            match self.parent(current) {
                Parent::Node(next) if *next == reentry => return members,
                Parent::Node(next) => {
                    members.push(*next);
                    current = *next;
                }
                Parent::Root | Parent::Dangling(_) => break,
            }
        }

        Vec::new()
    }
}

/// Iterator over the ancestors of a member, see [`ReferralGraph::walk_up`].
pub struct WalkUp<'g, T> {
    graph: &'g ReferralGraph<T>,
    current: NodeId,
    depth: usize,
    max_depth: usize,
    // node -> depth at which it was yielded, the start node sits at 0
    visited: HashMap<NodeId, usize>,
    outcome: Option<WalkOutcome>,
}

impl<'g, T: ReferralMember> WalkUp<'g, T> {
    /// Why the walk stopped, `None` until the iterator is exhausted.
    pub fn outcome(&self) -> Option<&WalkOutcome> {
        self.outcome.as_ref()
    }

    /// Drains the walk and returns its outcome.
    pub fn finish(mut self) -> WalkOutcome {
        loop {
            if let Some(outcome) = self.outcome.take() {
                return outcome;
            }
            self.next();
        }
    }
}

impl<'g, T: ReferralMember> Iterator for WalkUp<'g, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.outcome.is_some() {
            return None;
        }

        let outcome = match self.graph.parent(self.current) {
            Parent::Root => WalkOutcome::Root,
            Parent::Dangling(missing) => WalkOutcome::Dangling {
                from: self.current,
                missing: missing.clone(),
            },
            Parent::Node(parent) => {
                if let Some(&first_seen) = self.visited.get(parent) {
                    WalkOutcome::Cycle {
                        reentry: *parent,
                        length: self.depth - first_seen,
                    }
                } else if self.depth >= self.max_depth {
                    WalkOutcome::DepthLimit { depth: self.depth }
                } else {
                    self.depth += 1;
                    self.visited.insert(*parent, self.depth);
                    self.current = *parent;

                    return Some(*parent);
                }
            }
        };

        self.outcome = Some(outcome);
        None
    }
}
