//! # Tier Worker Module
//!
//! Solves a single tier given that all of its child tiers are already
//! solved. Two strategies are offered: [`retrograde`], correct whenever the
//! tier (together with its children) is loop-free, and [`iteration`], a
//! value-iteration fixed point that is correct regardless of loopiness but
//! requires repeated full scans of the tier to converge.

pub mod iteration;
pub mod retrograde;

use anyhow::Result;

use crate::database::TierDatabase;
use crate::model::{Tier, TierType};
use crate::solver::adapter::TierGame;
use crate::solver::report::Reporter;

/// Summary statistics returned by a successful tier solve, used by the
/// manager for progress reporting and by the test harness for sanity
/// checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierSolveSummary {
    pub win: u64,
    pub lose: u64,
    pub tie: u64,
    pub draw: u64,
}

impl TierSolveSummary {
    pub fn total(&self) -> u64 {
        self.win + self.lose + self.tie + self.draw
    }
}

/// Solves `tier` using the strategy appropriate to
/// [`TierGame::tier_type`], assuming every tier in
/// [`TierGame::child_tiers`] is already solved and flushed in `db`.
///
/// `memory_limit_bytes` bounds the combined size [`estimate_resource_bytes`]
/// reports for this tier's frontier(s) and (if used) reverse graph; a tier
/// whose estimate exceeds it fails fast with
/// [`crate::solver::error::SolverError::ResourceExhausted`] rather than
/// being attempted, per `spec.md` §5 "Memory budget".
pub fn solve_tier(
    game: &dyn TierGame,
    db: &dyn TierDatabase,
    tier: Tier,
    threads: usize,
    memory_limit_bytes: u64,
    reporter: &dyn Reporter,
) -> Result<TierSolveSummary> {
    match game.tier_type(tier) {
        TierType::ImmediateTransition | TierType::LoopFree => {
            retrograde::solve(game, db, tier, threads, memory_limit_bytes, reporter)
        },
        TierType::Loopy => {
            iteration::solve(game, db, tier, threads, memory_limit_bytes, reporter)
        },
    }
}

/// Bytes per position this solver estimates it needs to hold resident while
/// working on a tier, whether or not the adapter's actual footprint per
/// position matches exactly: a conservative heuristic, not an exact
/// accounting, used only to catch a tier whose resource use would be wildly
/// disproportionate to the configured limit before committing to it.
const ESTIMATED_BYTES_PER_COUNTER: u64 = 1;
const ESTIMATED_BYTES_PER_FRONTIER_ENTRY: u64 = 24;
const ESTIMATED_BYTES_PER_REVERSE_EDGE: u64 = 24;
const ESTIMATED_BRANCHING_FACTOR: u64 = 8;

/// A rough upper bound, in bytes, on the memory a retrograde solve of a tier
/// of `this_tier_size` positions (with child tiers of sizes `child_sizes`)
/// would hold resident at once: one frontier entry per loaded child
/// position, one undecided-child counter per own position, and (if
/// `use_reverse_graph`) one reverse-graph edge per own position times an
/// assumed average branching factor.
pub fn estimate_resource_bytes(
    this_tier_size: u64,
    child_sizes: &[u64],
    use_reverse_graph: bool,
) -> u64 {
    let own = this_tier_size
        .saturating_mul(ESTIMATED_BYTES_PER_COUNTER + ESTIMATED_BYTES_PER_FRONTIER_ENTRY);
    let children: u64 = child_sizes
        .iter()
        .map(|&size| size.saturating_mul(ESTIMATED_BYTES_PER_FRONTIER_ENTRY))
        .sum();
    let reverse = if use_reverse_graph {
        this_tier_size
            .saturating_mul(ESTIMATED_BRANCHING_FACTOR)
            .saturating_mul(ESTIMATED_BYTES_PER_REVERSE_EDGE)
    } else {
        0
    };
    own.saturating_add(children).saturating_add(reverse)
}

#[cfg(test)]
mod estimate_tests {
    use super::*;

    #[test]
    fn reverse_graph_usage_dominates_the_estimate_when_enabled() {
        let without = estimate_resource_bytes(1000, &[500, 500], false);
        let with = estimate_resource_bytes(1000, &[500, 500], true);
        assert!(with > without);
    }
}
