//! Symmetric friendship adjacency between user ids.
//!
//! Every edge is stored twice (a→b and b→a). All mutators write both
//! directions or neither, so `is_friend(a, b) == is_friend(b, a)` holds
//! after every call.

use std::collections::{HashMap, HashSet};

use crate::types::UserId;

#[derive(Debug, Clone, Default)]
pub struct FriendGraph {
    adjacency: HashMap<UserId, HashSet<UserId>>,
}

impl FriendGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a user with an empty friend set.
    pub fn register(&mut self, user_id: UserId) {
        self.adjacency.entry(user_id).or_default();
    }

    /// Insert the edge in both directions. Returns `false` if it already existed.
    pub fn connect(&mut self, a: UserId, b: UserId) -> bool {
        let inserted = self.adjacency.entry(a).or_default().insert(b);
        self.adjacency.entry(b).or_default().insert(a);
        inserted
    }

    /// Remove the edge in both directions. Returns `false` if there was none.
    pub fn disconnect(&mut self, a: UserId, b: UserId) -> bool {
        let removed = self
            .adjacency
            .get_mut(&a)
            .is_some_and(|friends| friends.remove(&b));
        if let Some(friends) = self.adjacency.get_mut(&b) {
            friends.remove(&a);
        }
        removed
    }

    /// Drop a user and every edge touching it.
    pub fn remove_node(&mut self, user_id: UserId) {
        let Some(friends) = self.adjacency.remove(&user_id) else {
            return;
        };
        for friend in friends {
            if let Some(theirs) = self.adjacency.get_mut(&friend) {
                theirs.remove(&user_id);
            }
        }
    }

    pub fn is_friend(&self, a: UserId, b: UserId) -> bool {
        self.adjacency
            .get(&a)
            .is_some_and(|friends| friends.contains(&b))
    }

    /// Friend ids of a user in ascending order (empty if untracked)
    pub fn friends_of(&self, user_id: UserId) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self
            .adjacency
            .get(&user_id)
            .map(|friends| friends.iter().copied().collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Ids that are friends of both `a` and `b`, ascending.
    pub fn common(&self, a: UserId, b: UserId) -> Vec<UserId> {
        let (Some(left), Some(right)) = (self.adjacency.get(&a), self.adjacency.get(&b)) else {
            return Vec::new();
        };
        // Walk the smaller set
        let (small, large) = if left.len() <= right.len() {
            (left, right)
        } else {
            (right, left)
        };
        let mut ids: Vec<UserId> = small.intersection(large).copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Total number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(HashSet::len).sum::<usize>() / 2
    }
}
