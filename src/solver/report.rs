//! # Reporter Module
//!
//! Threads tier-level progress out of the solver without committing it to
//! any particular logging framework, the same way the teacher crate threads
//! an explicit `quiet` flag through its CLI instead of reaching for `log` or
//! `tracing` (neither of which appears anywhere in its dependency graph).

use crate::model::{Tier, TierSize};
use crate::solver::tier_worker::TierSolveSummary;

/// A sink for solver progress. The default (no-op) implementation is used
/// whenever a caller has no interest in progress output, e.g. in tests.
pub trait Reporter: Send + Sync {
    fn tier_started(&self, _tier: Tier, _size: TierSize) {}

    fn tier_finished(&self, _tier: Tier, _summary: TierSolveSummary) {}

    fn message(&self, _text: &str) {}
}

/// A [`Reporter`] that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// A [`Reporter`] that writes to standard error, honoring a verbosity level
/// the way the teacher's CLI honors `--quiet`: level 0 prints nothing,
/// level 1 prints tier start/finish lines, level 2 additionally prints
/// free-form diagnostic messages.
#[derive(Debug, Clone, Copy)]
pub struct TerminalReporter {
    pub verbosity: i32,
}

impl Reporter for TerminalReporter {
    fn tier_started(&self, tier: Tier, size: TierSize) {
        if self.verbosity >= 1 {
            eprintln!("solving tier {tier} ({size} positions)");
        }
    }

    fn tier_finished(&self, tier: Tier, summary: TierSolveSummary) {
        if self.verbosity >= 1 {
            eprintln!(
                "tier {tier} solved: {} win, {} lose, {} tie, {} draw",
                summary.win, summary.lose, summary.tie, summary.draw
            );
        }
    }

    fn message(&self, text: &str) {
        if self.verbosity >= 2 {
            eprintln!("{text}");
        }
    }
}
