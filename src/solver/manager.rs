//! # Tier Manager Module
//!
//! Owns the thread pool and the database, walks the child-tier graph in
//! dependency order (children before parents, since retrograde analysis
//! needs every child tier already solved and flushed), and dispatches each
//! tier to [`crate::solver::tier_worker::solve_tier`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::database::volatile::VolatileDatabase;
use crate::database::{Persistence, TierDatabase};
use crate::model::{Tier, TierPosition, TierStatus, Value};
use crate::solver::adapter::{Move, TierGame};
use crate::solver::error::SolverError;
use crate::solver::report::{Reporter, SilentReporter, TerminalReporter};
use crate::solver::tier_worker::{self, TierSolveSummary};

/// One legal move available at a queried position, together with the child
/// it leads to, that child's solved value (if known), and whether playing it
/// is consistent with optimal play from the parent's own solved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveReport {
    pub mv: Move,
    pub child: TierPosition,
    pub value: Option<Value>,
    pub optimal: bool,
}

/// Whether a move leading to a child valued `child` is consistent with
/// optimal play from a parent valued `parent`, mirroring the backward-
/// induction rule in [`crate::solver::adapter::combine_child_values`]: a
/// `Win(r)` parent's optimal children are exactly those `Lose(r - 1)`; a
/// `Lose(r)` parent has no good move, so every move is equally "optimal"
/// (there is no way to do better than losing); a `Tie(r)` parent's optimal
/// children are those `Tie(r - 1)`; anything else (parent unsolved, or a
/// `Draw` parent with no informative children) calls every move optimal,
/// since there is nothing yet known to prefer one move over another.
fn is_optimal_move(parent: Option<Value>, child: Option<Value>) -> bool {
    match parent {
        Some(Value::Win(r)) => matches!(child, Some(Value::Lose(cr)) if cr + 1 == r),
        Some(Value::Lose(_)) => true,
        Some(Value::Tie(r)) => matches!(child, Some(Value::Tie(cr)) if cr + 1 == r),
        Some(Value::Draw) | None => true,
    }
}

/// Orchestrates a full solve of a game: builds the thread pool, opens the
/// configured database, and solves every tier reachable from the game's
/// initial tier in dependency order.
pub struct TierManager<'a> {
    game: &'a dyn TierGame,
    db: Box<dyn TierDatabase>,
    pool: rayon::ThreadPool,
    reporter: Box<dyn Reporter>,
    config: Config,

    /// Set the first time a tier solve fails; once set, no further tiers are
    /// attempted. Shared so a future coordinator (behind the `coordinator`
    /// feature) can request cancellation from outside the solve loop.
    cancelled: AtomicBool,
    failure: OnceLock<SolverError>,

    /// Lazily opened the first time [`TierManager::compare_tier_against_reference`]
    /// needs it, so a run with no `--compare-with-reference` flag never
    /// touches the reference path at all.
    reference_db: OnceLock<Box<dyn TierDatabase>>,
}

impl<'a> TierManager<'a> {
    pub fn new(game: &'a dyn TierGame, config: Config) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.resolved_threads())
            .build()
            .context("building the solver thread pool")?;

        let db: Box<dyn TierDatabase> = match &config.persistence {
            Persistence::Off => Box::new(VolatileDatabase::new()),
            Persistence::On(path) => Box::new(
                crate::database::sled_backed::SledDatabase::open(path)
                    .with_context(|| format!("opening database at {}", path.display()))?,
            ),
        };

        let reporter: Box<dyn Reporter> = if config.verbosity.as_level() > 0 {
            Box::new(TerminalReporter { verbosity: config.verbosity.as_level() })
        } else {
            Box::new(SilentReporter)
        };

        Ok(Self {
            game,
            db,
            pool,
            reporter,
            config,
            cancelled: AtomicBool::new(false),
            failure: OnceLock::new(),
            reference_db: OnceLock::new(),
        })
    }

    /// Requests that the solve stop after the tier currently in progress.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Solves every tier reachable from the game's initial tier, in
    /// dependency order, returning a per-tier summary. Stops at the first
    /// tier that fails or the first time [`TierManager::cancel`] is called.
    pub fn run(&self) -> Result<Vec<(Tier, TierSolveSummary)>> {
        let order = self.topological_order(self.game.initial_tier());
        let mut summaries = Vec::with_capacity(order.len());

        for tier in order {
            if self.cancelled.load(Ordering::SeqCst) {
                return Err(SolverError::Cancelled.into());
            }
            if let Some(failure) = self.failure.get() {
                return Err(anyhow::anyhow!("{failure}"));
            }

            if !self.config.force && self.db.tier_status(tier) == TierStatus::Solved {
                continue;
            }

            let threads = self.config.resolved_threads();
            let summary = self.pool.install(|| {
                tier_worker::solve_tier(
                    self.game,
                    self.db.as_ref(),
                    tier,
                    threads,
                    self.config.memory_limit_bytes,
                    self.reporter.as_ref(),
                )
            });

            match summary {
                Ok(summary) => {
                    if let Err(err) = self.compare_tier_against_reference(tier) {
                        let _ = self.failure.set(SolverError::AdapterContract {
                            tier,
                            hint: err.to_string(),
                        });
                        return Err(err);
                    }
                    summaries.push((tier, summary));
                },
                Err(err) => {
                    let _ = self.db.mark_corrupted(tier);
                    let _ = self.failure.set(SolverError::AdapterContract {
                        tier,
                        hint: err.to_string(),
                    });
                    return Err(err);
                },
            }
        }

        Ok(summaries)
    }

    /// When [`Config::compare_path`] names a reference database, checks
    /// every non-undecided record it holds for `tier` against this run's own
    /// record, per `spec.md` §8 property 8 ("Compare mode"). Positions the
    /// reference leaves undecided are skipped (the reference may simply not
    /// have solved this tier).
    fn compare_tier_against_reference(&self, tier: Tier) -> Result<()> {
        let Some(path) = self.config.compare_path.as_ref() else {
            return Ok(());
        };
        if self.reference_db.get().is_none() {
            let opened = crate::database::sled_backed::SledDatabase::open(path)
                .with_context(|| format!("opening reference database at {}", path.display()))?;
            let _ = self.reference_db.set(Box::new(opened));
        }
        let reference = self.reference_db.get().expect("just initialized above");

        let size = self.db.tier_size(tier).unwrap_or_else(|| self.game.tier_size(tier));
        for position in 0..size {
            let tier_position = TierPosition::new(tier, position);
            let Some(expected) = reference.probe(tier_position)? else {
                continue;
            };
            let actual = self.db.probe(tier_position)?;
            if actual != Some(expected) {
                return Err(SolverError::ReferenceMismatch {
                    tier,
                    position,
                    expected: format!("{expected:?}"),
                    actual: format!("{actual:?}"),
                }
                .into());
            }
        }
        Ok(())
    }

    /// The tier position actually holding `position`'s solved record: per
    /// spec.md §4.3, a non-canonical position "consume[s] no storage" and is
    /// "resolved at read time by mapping through the canonical position."
    fn canonicalize(&self, position: TierPosition) -> TierPosition {
        TierPosition::new(position.tier, self.game.canonical_position(position))
    }

    /// Probes the solved value of `tier`/`position`, if the tier has been
    /// solved. Used by the `info` front-end.
    pub fn query(&self, tier: Tier, position: u64) -> Result<Option<crate::model::Value>> {
        let tier_position = crate::model::TierPosition::new(tier, position);
        self.db.probe(self.canonicalize(tier_position))
    }

    pub fn tier_status(&self, tier: Tier) -> TierStatus {
        self.db.tier_status(tier)
    }

    /// Every legal move available at `tier`/`position`, paired with the
    /// child it leads to and that child's solved value (`None` if the child
    /// tier has not been solved yet). Lets the `info` front-end answer not
    /// just "what is this position worth" but "what should I play here",
    /// per `spec.md` §1's "report the outcome and enumerate optimal moves".
    pub fn moves(&self, tier: Tier, position: u64) -> Result<Vec<MoveReport>> {
        let tier_position = crate::model::TierPosition::new(tier, position);
        let own_value = self.db.probe(self.canonicalize(tier_position))?;

        let mut reports = Vec::new();
        for mv in self.game.generate_moves(tier_position) {
            let child = self.game.do_move(tier_position, mv);
            let value = self.db.probe(self.canonicalize(child))?;
            reports.push(MoveReport { mv, child, value });
        }
        for report in &mut reports {
            report.optimal = is_optimal_move(own_value, report.value);
        }
        Ok(reports)
    }

    /// Every tier reachable from `start`, in an order where every tier
    /// appears only after all of its children (post-order depth-first
    /// traversal over [`TierGame::child_tiers`]).
    fn topological_order(&self, start: Tier) -> Vec<Tier> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.visit(start, &mut visited, &mut order);
        order
    }

    fn visit(&self, tier: Tier, visited: &mut HashSet<Tier>, order: &mut Vec<Tier>) {
        if !visited.insert(tier) {
            return;
        }
        for child in self.game.child_tiers(tier) {
            self.visit(child, visited, order);
        }
        order.push(tier);
    }
}
