//! # Retrograde Tier Worker
//!
//! Solves a single loop-free tier by backward induction from its primitive
//! positions and its already-solved child tiers, pushing values "up" the
//! move relation one remoteness at a time.
//!
//! 0. Initialize child tiers, the reverse graph (if the adapter does not
//!    enumerate parents itself), and per-thread frontiers.
//! 1. Load every already-solved, non-drawing position of every child tier
//!    into the frontier at its recorded remoteness.
//! 2. Allocate the tier's database slot and its undecided-child counters.
//! 3. Scan the tier once, recording primitive positions at remoteness zero
//!    and counting children for the rest.
//! 4. Push the frontier up: for each remoteness in increasing order, drain
//!    lose positions (assigning their parents Win), then win positions
//!    (decrementing parent counters, assigning Lose once exhausted), then
//!    tie positions (assigning their parents Tie).
//! 5. Mark every position with remaining undecided children as Draw.
//! 6. Flush the tier to the database and free its in-memory resources.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::database::TierDatabase;
use crate::model::{Position, Remoteness, Tier, TierPosition, Value, WideChildCount, R_MAX};
use crate::solver::adapter::TierGame;
use crate::solver::error::SolverError;
use crate::solver::frontier::Frontier;
use crate::solver::report::Reporter;
use crate::solver::reverse_graph::ReverseGraph;
use crate::solver::tier_worker::{self, TierSolveSummary};

/// Solves `tier` assuming every tier in `game.child_tiers(tier)` has already
/// been solved and flushed into `db`. Fails with
/// [`SolverError::ResourceExhausted`] before allocating anything if
/// [`tier_worker::estimate_resource_bytes`] exceeds `memory_limit_bytes`.
pub fn solve(
    game: &dyn TierGame,
    db: &dyn TierDatabase,
    tier: Tier,
    threads: usize,
    memory_limit_bytes: u64,
    reporter: &dyn Reporter,
) -> Result<TierSolveSummary> {
    let threads = threads.max(1);
    let this_tier_size = game.tier_size(tier);
    reporter.tier_started(tier, this_tier_size);

    /* STEP 0: INITIALIZE */

    let child_tiers = game.child_tiers(tier);
    let use_reverse_graph = !game.supports_parent_enumeration();
    let reverse_graph = Mutex::new(ReverseGraph::new());

    let child_sizes: Vec<u64> = child_tiers
        .iter()
        .map(|&c| db.tier_size(c).unwrap_or_else(|| game.tier_size(c)))
        .collect();
    let estimate =
        tier_worker::estimate_resource_bytes(this_tier_size, &child_sizes, use_reverse_graph);
    if estimate > memory_limit_bytes {
        bail!(SolverError::ResourceExhausted { tier, requested_bytes: estimate });
    }

    // The frontier's source-tier index space is every child tier, in order,
    // followed by `tier` itself at the last index: every parent a position
    // pushes up to during Step 4 lives in `tier`, regardless of which tier
    // the position being processed came from.
    let mut frontier_tiers = child_tiers.clone();
    frontier_tiers.push(tier);
    let this_tier_index = frontier_tiers.len() - 1;

    let num_remotenesses = R_MAX as usize + 1;
    let lanes = ThreadFrontiers::new(threads, num_remotenesses, &frontier_tiers);

    /* STEP 1: LOAD CHILDREN */

    for (child_index, &child_tier) in child_tiers.iter().enumerate() {
        let child_size =
            db.tier_size(child_tier).unwrap_or_else(|| game.tier_size(child_tier));
        (0..child_size).into_par_iter().try_for_each(|position| {
            let child_position = TierPosition::new(child_tier, position);
            let value = db
                .probe(child_position)
                .with_context(|| format!("probing child tier {child_tier}"))?;
            if let Some(value) = value {
                lanes.load(value, position, child_index);
            }
            Ok::<(), anyhow::Error>(())
        })?;
    }

    /* STEP 2: SETUP SOLVER ARRAYS */

    db.create_solving_tier(tier, this_tier_size)
        .with_context(|| format!("allocating tier {tier}"))?;
    let undecided: Vec<AtomicU16> = (0..this_tier_size).map(|_| AtomicU16::new(0)).collect();

    /* STEP 3: SCAN TIER */

    (0..this_tier_size).into_par_iter().try_for_each(|position| {
        let tier_position = TierPosition::new(tier, position);
        if !game.is_legal_position(tier_position)
            || game.canonical_position(tier_position) != position
        {
            return Ok::<(), anyhow::Error>(());
        }

        if let Some(value) = game.primitive(tier_position) {
            db.set_value(tier_position, value)?;
            lanes.load(value, position, this_tier_index);
            return Ok(());
        }

        let children = game.canonical_child_positions(tier_position);
        if use_reverse_graph {
            let mut graph = reverse_graph.lock().unwrap();
            for child in &children {
                graph.add_edge(tier_position, *child);
            }
        }
        let count: WideChildCount = WideChildCount::try_from(children.len()).map_err(|_| {
            SolverError::AdapterContract {
                tier,
                hint: format!(
                    "position {position} has {} canonical children, exceeding the \
                    {}-bit widened undecided-child counter; this adapter needs a \
                    wider counter type than any tier solved so far",
                    children.len(),
                    WideChildCount::BITS
                ),
            }
        })?;
        undecided[position as usize].store(count, Ordering::Relaxed);
        Ok(())
    })?;

    lanes.finalize_all(num_remotenesses as Remoteness);

    /* STEP 4: PUSH FRONTIER UP */

    // Pass A (lose/win), strictly ascending remoteness, lose before win at
    // each remoteness. Pass B (tie) below must not start until every
    // remoteness of Pass A has been drained: a parent can only be declared
    // Tie once it is certain no child of it will ever turn out to be Lose
    // (which would make it Win instead), and a Lose child can surface at any
    // remoteness up to R_MAX, not just at or below the remoteness a sibling
    // Tie child surfaced at. Interleaving the two passes per-remoteness would
    // let a premature Tie assignment beat a later, correctness-mandated Win.
    for remoteness in 0..=R_MAX {
        let lose_batch = lanes.drain_lose(remoteness);
        lose_batch.into_par_iter().try_for_each(|position| {
            process_pushed_position(
                game,
                db,
                tier,
                position,
                remoteness,
                PushedKind::Lose,
                &undecided,
                &reverse_graph,
                use_reverse_graph,
                &lanes,
                this_tier_index,
            )
        })?;

        let win_batch = lanes.drain_win(remoteness);
        win_batch.into_par_iter().try_for_each(|position| {
            process_pushed_position(
                game,
                db,
                tier,
                position,
                remoteness,
                PushedKind::Win,
                &undecided,
                &reverse_graph,
                use_reverse_graph,
                &lanes,
                this_tier_index,
            )
        })?;

        // Entries pushed for remoteness + 1 by this round must have their
        // dividers finalized before the next iteration drains them.
        if remoteness < R_MAX {
            lanes.finalize_remoteness(remoteness + 1);
        }
    }

    // Pass B (tie), only now that every counter reflects the outcome of
    // every win/lose child discovered in Pass A.
    for remoteness in 0..=R_MAX {
        let tie_batch = lanes.drain_tie(remoteness);
        tie_batch.into_par_iter().try_for_each(|position| {
            process_pushed_position(
                game,
                db,
                tier,
                position,
                remoteness,
                PushedKind::Tie,
                &undecided,
                &reverse_graph,
                use_reverse_graph,
                &lanes,
                this_tier_index,
            )
        })?;

        if remoteness < R_MAX {
            lanes.finalize_remoteness(remoteness + 1);
        }
    }

    /* STEP 5: MARK DRAW POSITIONS */

    // Illegal and non-canonical positions were skipped outright in Step 3:
    // they never received a counter, a primitive value, or a frontier
    // entry, and per spec.md §4.3 "consume no storage ... resolved at read
    // time by mapping through the canonical position." They must be
    // skipped here too, or every one of them reads back as undecided.
    let is_canonical = |position: Position| {
        let tier_position = TierPosition::new(tier, position);
        game.is_legal_position(tier_position)
            && game.canonical_position(tier_position) == position
    };

    for position in 0..this_tier_size {
        if !is_canonical(position) {
            continue;
        }
        if undecided[position as usize].load(Ordering::Relaxed) > 0 {
            db.set_value(TierPosition::new(tier, position), Value::Draw)?;
        }
    }

    let mut summary = TierSolveSummary::default();
    for position in 0..this_tier_size {
        if !is_canonical(position) {
            continue;
        }
        match db.probe(TierPosition::new(tier, position))? {
            Some(Value::Win(_)) => summary.win += 1,
            Some(Value::Lose(_)) => summary.lose += 1,
            Some(Value::Tie(_)) => summary.tie += 1,
            Some(Value::Draw) => summary.draw += 1,
            None => bail!(
                "position {position} of tier {tier} was left undecided \
                after a complete retrograde solve"
            ),
        }
    }

    /* STEP 6: SAVE VALUES */

    db.flush_solving_tier(tier)
        .with_context(|| format!("flushing tier {tier}"))?;
    db.free_solving_tier(tier)
        .with_context(|| format!("freeing tier {tier}"))?;

    reporter.tier_finished(tier, summary);
    Ok(summary)
}

/// Which of the three frontiers a drained position came from, determining
/// how its parents are notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushedKind {
    Lose,
    Win,
    Tie,
}

#[allow(clippy::too_many_arguments)]
fn process_pushed_position(
    game: &dyn TierGame,
    db: &dyn TierDatabase,
    tier: Tier,
    position: TierPosition,
    remoteness: Remoteness,
    kind: PushedKind,
    undecided: &[AtomicU16],
    reverse_graph: &Mutex<ReverseGraph>,
    use_reverse_graph: bool,
    lanes: &ThreadFrontiers,
    this_tier_index: usize,
) -> Result<()> {
    let parents = if use_reverse_graph {
        reverse_graph
            .lock()
            .unwrap()
            .pop_parents(position)
            .into_iter()
            .map(|p| p.position)
            .collect()
    } else {
        game.canonical_parent_positions(position, tier)
    };

    match kind {
        PushedKind::Win => {
            // `position` is a win for the player to move there, so every
            // parent's move into it was a bad one for the parent's mover.
            // Decrement each parent's undecided-child count; once every
            // child has been accounted for, the parent is a forced loss.
            for parent in parents {
                if decrement_if_nonzero(&undecided[parent as usize]) == 1 {
                    let value = Value::Lose(remoteness + 1);
                    db.set_value(TierPosition::new(tier, parent), value)?;
                    lanes.load(value, parent, this_tier_index);
                }
            }
        },
        PushedKind::Lose | PushedKind::Tie => {
            // A single losing (or tying) child is enough to immediately
            // decide the parent: exchange its counter to zero so this is
            // only ever done once, even if several children finish at the
            // same remoteness.
            for parent in parents {
                if undecided[parent as usize].swap(0, Ordering::Relaxed) == 0 {
                    continue;
                }
                let value = if kind == PushedKind::Lose {
                    Value::Win(remoteness + 1)
                } else {
                    Value::Tie(remoteness + 1)
                };
                db.set_value(TierPosition::new(tier, parent), value)?;
                lanes.load(value, parent, this_tier_index);
            }
        },
    }
    Ok(())
}

fn decrement_if_nonzero(counter: &AtomicU16) -> u16 {
    let mut current = counter.load(Ordering::Relaxed);
    while current != 0 {
        match counter.compare_exchange_weak(
            current,
            current - 1,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return current,
            Err(observed) => current = observed,
        }
    }
    0
}

/// One [`Frontier`] per worker thread per value kind (win/lose/tie), so that
/// every push during the parallel scan phases writes only to the slot owned
/// by the calling thread.
struct ThreadFrontiers {
    threads: usize,
    win: Vec<Mutex<Frontier>>,
    lose: Vec<Mutex<Frontier>>,
    tie: Vec<Mutex<Frontier>>,
}

impl ThreadFrontiers {
    fn new(threads: usize, num_remotenesses: usize, tiers: &[Tier]) -> Self {
        let build = || {
            (0..threads)
                .map(|_| Mutex::new(Frontier::new(num_remotenesses, tiers.to_vec())))
                .collect()
        };
        Self { threads, win: build(), lose: build(), tie: build() }
    }

    fn slot(&self) -> usize {
        rayon::current_thread_index().unwrap_or(0) % self.threads
    }

    fn load(&self, value: Value, position: Position, tier_index: usize) {
        let slot = self.slot();
        match value {
            Value::Win(r) => self.win[slot].lock().unwrap().push(r, tier_index, position),
            Value::Lose(r) => self.lose[slot].lock().unwrap().push(r, tier_index, position),
            Value::Tie(r) => self.tie[slot].lock().unwrap().push(r, tier_index, position),
            Value::Draw => {},
        }
    }

    fn finalize_remoteness(&self, remoteness: Remoteness) {
        for frontier in self.win.iter().chain(&self.lose).chain(&self.tie) {
            frontier.lock().unwrap().finalize(remoteness);
        }
    }

    fn finalize_all(&self, num_remotenesses: Remoteness) {
        for r in 0..num_remotenesses {
            self.finalize_remoteness(r);
        }
    }

    fn drain_kind(frontiers: &[Mutex<Frontier>], remoteness: Remoteness) -> Vec<TierPosition> {
        frontiers
            .iter()
            .flat_map(|f| f.lock().unwrap().drain(remoteness))
            .collect()
    }

    fn drain_win(&self, remoteness: Remoteness) -> Vec<TierPosition> {
        Self::drain_kind(&self.win, remoteness)
    }

    fn drain_lose(&self, remoteness: Remoteness) -> Vec<TierPosition> {
        Self::drain_kind(&self.lose, remoteness)
    }

    fn drain_tie(&self, remoteness: Remoteness) -> Vec<TierPosition> {
        Self::drain_kind(&self.tie, remoteness)
    }
}
