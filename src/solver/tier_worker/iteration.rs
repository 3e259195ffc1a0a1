//! # Value-Iteration Tier Worker
//!
//! Solves a single tier whose internal move relation may contain cycles
//! (its own positions can reach each other, directly or indirectly) by
//! repeated full scans rather than a single frontier push-up. Two phases,
//! mirroring [`crate::solver::tier_worker::retrograde`]'s Pass A/Pass B
//! split:
//!
//! - **Phase A (win/lose).** Repeatedly scan every still-undecided position:
//!   if it has a child already known `Lose`, it becomes `Win`; if every one
//!   of its children is known `Win` (none undecided, none `Tie`, none
//!   `Draw`), it becomes `Lose`. Repeat until a full scan commits nothing.
//! - **Phase B (tie).** Only once Phase A has reached its fixed point (so no
//!   position will ever newly become `Win` or `Lose` again) repeatedly scan
//!   the rest: a position becomes `Tie` as soon as it has a child already
//!   known `Tie`. Repeat until a full scan commits nothing.
//! - Anything still undecided after Phase B is `Draw`: by construction, its
//!   children never included a `Lose`, a fully-won set, or a `Tie` — they
//!   either loop back into the undecided set forever or are themselves
//!   `Draw`.
//!
//! Phase A must fully converge before Phase B starts for the same reason
//! [`retrograde`] runs its lose/win pass to completion before its tie pass:
//! a position may only be committed `Tie` once it is certain no child of it
//! will ever surface as `Lose` (which would make it `Win` instead), and a
//! `Lose` child can be discovered by Phase A at any point up to its fixed
//! point, not only "early".
//!
//! Unlike a child outside this tier (probed once and fixed for the rest of
//! the solve), a child inside this tier may still be `None` (not yet
//! decided) while its own commitment is pending in a later round; that is
//! why `Win`/`Lose`/`Tie` commitment rules below are careful to distinguish
//! "this child is known to be X" from "this child is not yet known to be
//! anything", rather than simply filtering `None` children out, which would
//! silently treat an undecided child as if it didn't exist.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::database::TierDatabase;
use crate::model::{Remoteness, Tier, TierPosition, Value};
use crate::solver::adapter::TierGame;
use crate::solver::error::SolverError;
use crate::solver::report::Reporter;
use crate::solver::tier_worker::{self, TierSolveSummary};

/// Solves `tier` by value iteration, assuming every tier in
/// `game.child_tiers(tier)` has already been solved and flushed into `db`.
/// Fails with [`SolverError::ResourceExhausted`] before allocating anything
/// if [`tier_worker::estimate_resource_bytes`] exceeds `memory_limit_bytes`
/// (value iteration holds no frontier or reverse graph, so only its own
/// per-position value array counts against the estimate).
pub fn solve(
    game: &dyn TierGame,
    db: &dyn TierDatabase,
    tier: Tier,
    _threads: usize,
    memory_limit_bytes: u64,
    reporter: &dyn Reporter,
) -> Result<TierSolveSummary> {
    let size = game.tier_size(tier);
    reporter.tier_started(tier, size);

    let estimate = tier_worker::estimate_resource_bytes(size, &[], false);
    if estimate > memory_limit_bytes {
        bail!(SolverError::ResourceExhausted { tier, requested_bytes: estimate });
    }

    db.create_solving_tier(tier, size)
        .with_context(|| format!("allocating tier {tier}"))?;

    let values: Vec<RwLock<Option<Value>>> = (0..size).map(|_| RwLock::new(None)).collect();

    // Seed primitive positions; they never change across passes.
    (0..size).into_par_iter().for_each(|position| {
        let tier_position = TierPosition::new(tier, position);
        if let Some(value) = game.primitive(tier_position) {
            *values[position as usize].write().unwrap() = Some(value);
        }
    });

    /* PHASE A: WIN / LOSE */

    run_to_fixed_point(size, |position| {
        if values[position as usize].read().unwrap().is_some() {
            return Ok(false);
        }
        let tier_position = TierPosition::new(tier, position);
        let children = child_values(game, db, &values, tier, tier_position)?;
        if let Some(value) = combine_win_lose(&children) {
            *values[position as usize].write().unwrap() = Some(value);
            return Ok(true);
        }
        Ok(false)
    })?;

    /* PHASE B: TIE */

    run_to_fixed_point(size, |position| {
        if values[position as usize].read().unwrap().is_some() {
            return Ok(false);
        }
        let tier_position = TierPosition::new(tier, position);
        let children = child_values(game, db, &values, tier, tier_position)?;
        if let Some(remoteness) = smallest_tie_child(&children) {
            *values[position as usize].write().unwrap() = Some(Value::Tie(remoteness + 1));
            return Ok(true);
        }
        Ok(false)
    })?;

    // Everything still undecided after both fixed points is a draw: its
    // children never included a Lose, a fully-decided all-Win set, or a Tie,
    // so no further iteration could ever commit it to anything else.
    let mut summary = TierSolveSummary::default();
    for position in 0..size {
        let value = values[position as usize].read().unwrap().unwrap_or(Value::Draw);
        db.set_value(TierPosition::new(tier, position), value)?;
        match value {
            Value::Win(_) => summary.win += 1,
            Value::Lose(_) => summary.lose += 1,
            Value::Tie(_) => summary.tie += 1,
            Value::Draw => summary.draw += 1,
        }
    }

    db.flush_solving_tier(tier)
        .with_context(|| format!("flushing tier {tier}"))?;
    db.free_solving_tier(tier)
        .with_context(|| format!("freeing tier {tier}"))?;

    reporter.tier_finished(tier, summary);
    Ok(summary)
}

/// Repeatedly invokes `scan_one(position)` in parallel over `0..size` until
/// an entire pass commits nothing. `scan_one` returns whether it committed a
/// value for `position` this round.
fn run_to_fixed_point(
    size: u64,
    scan_one: impl Fn(u64) -> Result<bool> + Sync,
) -> Result<()> {
    loop {
        let committed = AtomicU64::new(0);
        let result: Result<()> = (0..size).into_par_iter().try_for_each(|position| {
            if scan_one(position)? {
                committed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(())
        });
        result?;
        if committed.load(Ordering::Relaxed) == 0 {
            break;
        }
    }
    Ok(())
}

/// The values of `position`'s canonical children, probing the database for
/// children outside `tier` and reading the in-progress array for children
/// inside it. A child's slot being `None` (whether in-progress or
/// permanently undecided) is preserved as `None`, never silently dropped:
/// the commit rules below treat "not yet known" and "known to be X"
/// differently.
fn child_values(
    game: &dyn TierGame,
    db: &dyn TierDatabase,
    values: &[RwLock<Option<Value>>],
    tier: Tier,
    position: TierPosition,
) -> Result<Vec<Option<Value>>> {
    let mut out = Vec::new();
    for child in game.canonical_child_positions(position) {
        let value = if child.tier == tier {
            *values[child.position as usize].read().unwrap()
        } else {
            db.probe(child)
                .with_context(|| format!("probing child tier {}", child.tier))?
        };
        out.push(value);
    }
    Ok(out)
}

/// Phase A's commit rule: `Win` as soon as any child is known `Lose`
/// (remoteness is one past the *smallest* such child, i.e. the quickest
/// forced win); `Lose` only once every child is known `Win` with none still
/// unknown, with remoteness one past the *largest* child remoteness.
/// Neither case fires with no children at all, since a childless
/// non-primitive position cannot occur (it would have been caught as
/// primitive by the adapter).
fn combine_win_lose(children: &[Option<Value>]) -> Option<Value> {
    let mut fastest_lose_child: Option<Remoteness> = None;
    for child in children {
        if let Some(Value::Lose(r)) = child {
            fastest_lose_child = Some(fastest_lose_child.map_or(*r, |cur| cur.min(*r)));
        }
    }
    if let Some(r) = fastest_lose_child {
        return Some(Value::Win(r + 1));
    }

    if children.is_empty() {
        return None;
    }
    let mut slowest_win_child: Option<Remoteness> = None;
    for child in children {
        match child {
            Some(Value::Win(r)) => {
                slowest_win_child = Some(slowest_win_child.map_or(*r, |cur| cur.max(*r)));
            },
            _ => return None, // undecided, tie, or draw child blocks Lose
        }
    }
    slowest_win_child.map(|r| Value::Lose(r + 1))
}

/// Phase B's commit rule: the smallest remoteness among children already
/// known `Tie`, or `None` if no child is (yet) known `Tie`.
fn smallest_tie_child(children: &[Option<Value>]) -> Option<Remoteness> {
    children.iter().fold(None, |acc, child| match child {
        Some(Value::Tie(r)) => Some(acc.map_or(*r, |cur: Remoteness| cur.min(*r))),
        _ => acc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_fires_even_with_an_undecided_sibling() {
        let children = vec![Some(Value::Lose(2)), None];
        assert_eq!(combine_win_lose(&children), Some(Value::Win(3)));
    }

    #[test]
    fn lose_requires_every_child_decided_win() {
        let children = vec![Some(Value::Win(1)), None];
        assert_eq!(combine_win_lose(&children), None);
    }

    #[test]
    fn lose_fires_once_every_child_is_win() {
        let children = vec![Some(Value::Win(1)), Some(Value::Win(4))];
        assert_eq!(combine_win_lose(&children), Some(Value::Lose(5)));
    }

    #[test]
    fn a_draw_child_blocks_lose_like_an_undecided_one() {
        let children = vec![Some(Value::Win(1)), Some(Value::Draw)];
        assert_eq!(combine_win_lose(&children), None);
    }

    #[test]
    fn tie_uses_the_smallest_known_tie_child() {
        let children = vec![Some(Value::Tie(5)), Some(Value::Tie(1)), None];
        assert_eq!(smallest_tie_child(&children), Some(1));
    }

    #[test]
    fn no_tie_child_yet_defers() {
        let children = vec![Some(Value::Win(1)), None];
        assert_eq!(smallest_tie_child(&children), None);
    }
}
