//! # Reverse Graph Module
//!
//! When a game adapter does not implement
//! [`crate::solver::adapter::TierGame::canonical_parent_positions`], the
//! retrograde worker cannot ask "who are my parents?" directly. Instead it
//! builds this adjacency on the fly while scanning a tier forward (child
//! `->` parents, the reverse of the game's own move relation), then consumes
//! it during the push-frontier-up phase, freeing each child's parent list as
//! soon as it has been fully drained so the graph's memory footprint tracks
//! only the positions not yet processed rather than the whole tier.

use std::collections::HashMap;

use crate::model::{Tier, TierPosition};

/// An on-demand, in-memory child-to-parents adjacency for a single
/// in-progress tier solve.
#[derive(Debug, Default)]
pub struct ReverseGraph {
    parents: HashMap<TierPosition, Vec<TierPosition>>,
}

impl ReverseGraph {
    /// Creates an empty reverse graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `parent` transitions to `child` in one move.
    pub fn add_edge(&mut self, parent: TierPosition, child: TierPosition) {
        self.parents.entry(child).or_default().push(parent);
    }

    /// Removes and returns every recorded parent of `child`, freeing the
    /// memory associated with its entry. Returns an empty vector if `child`
    /// has no recorded parents (or all of them have already been popped).
    pub fn pop_parents(&mut self, child: TierPosition) -> Vec<TierPosition> {
        self.parents.remove(&child).unwrap_or_default()
    }

    /// The number of distinct child positions still holding unpopped parent
    /// lists. Used by the test harness and diagnostics to confirm the graph
    /// was fully drained by the end of a solve.
    pub fn remaining_entries(&self) -> usize {
        self.parents.len()
    }

    /// Whether any parent edges were ever recorded for a position in `tier`.
    /// Used defensively by callers deciding whether to fall back further.
    pub fn has_any_parent_in(&self, tier: Tier) -> bool {
        self.parents.keys().any(|p| p.tier == tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_parents_drains_and_frees_the_entry() {
        let mut graph = ReverseGraph::new();
        let child = TierPosition::new(1, 0);
        let parent_a = TierPosition::new(0, 5);
        let parent_b = TierPosition::new(0, 6);
        graph.add_edge(parent_a, child);
        graph.add_edge(parent_b, child);

        assert_eq!(graph.remaining_entries(), 1);
        let mut parents = graph.pop_parents(child);
        parents.sort();
        assert_eq!(parents, vec![parent_a, parent_b]);
        assert_eq!(graph.remaining_entries(), 0);
        assert!(graph.pop_parents(child).is_empty());
    }
}
