//! # Game Adapter Module
//!
//! Defines the [`TierGame`] trait: the contract a game must satisfy in order
//! to be handed to [`crate::solver::manager::TierManager`]. Required methods
//! have no default and must be implemented by every game; optional methods
//! are provided with a default fallback implementation (documented on each)
//! that is correct, but slower, than a game-specific override.
//!
//! This is the idiomatic-Rust rendering of what a C tier solver expresses as
//! a struct of function pointers (a "capability record"): required fields
//! become required trait methods, optional fields become default-provided
//! trait methods, and "not implemented" becomes "not overridden".

use std::collections::HashSet;

use crate::model::{Remoteness, Tier, TierPosition, TierSize, TierType, Value};

/// A move available at some position. Games are free to choose any encoding;
/// the solver core only ever threads a `Move` back into [`TierGame::do_move`].
pub type Move = u64;

/// A game whose state space can be partitioned into tiers suitable for
/// tier-decomposed retrograde or value-iteration solving.
///
/// # Required primitives
///
/// [`initial_tier`], [`initial_position`], [`tier_size`], [`generate_moves`],
/// [`primitive`], [`do_move`], [`is_legal_position`], and [`child_tiers`]
/// have no default implementation: the solver cannot function without them.
///
/// # Optional primitives
///
/// Every other method has a default that is expressed purely in terms of the
/// required primitives, at a performance cost documented on each.
pub trait TierGame: Send + Sync {
    /* REQUIRED */

    /// The tier containing the game's starting position.
    fn initial_tier(&self) -> Tier;

    /// The game's starting position, within [`TierGame::initial_tier`].
    fn initial_position(&self) -> Position;

    /// The number of positions in `tier`. The database allocates exactly
    /// this many records for `tier`; returning a value smaller than the true
    /// size is an adapter contract violation.
    fn tier_size(&self, tier: Tier) -> TierSize;

    /// All moves available at `position`, assumed legal.
    fn generate_moves(&self, position: TierPosition) -> Vec<Move>;

    /// `Some(value)` if `position` is primitive (no legal moves, or an
    /// adapter-defined terminal condition), `None` otherwise.
    fn primitive(&self, position: TierPosition) -> Option<Value>;

    /// The tier position reached by performing `mv` at `position`. Assumes
    /// `mv` was returned by [`TierGame::generate_moves`] for `position`.
    fn do_move(&self, position: TierPosition, mv: Move) -> TierPosition;

    /// Whether `position` is *possibly* legal. `false` is a strong
    /// guarantee ("definitely unreachable"); `true` is a weak one ("not
    /// disproven"). Used purely as a fast pre-filter, never for statistics.
    fn is_legal_position(&self, position: TierPosition) -> bool;

    /// Every tier reachable from `tier` by a single move from some position
    /// within it.
    fn child_tiers(&self, tier: Tier) -> Vec<Tier>;

    /* OPTIONAL: position symmetry removal */

    /// The canonical representative of `position`'s symmetry class within
    /// its own tier. Default: every position is its own canonical
    /// representative (symmetry removal disabled).
    fn canonical_position(&self, position: TierPosition) -> Position {
        position.position
    }

    /// The number of unique canonical child positions of `position`.
    /// Default: generate moves, apply them, and canonicalize, deduplicating
    /// the results. Overriding this is purely a performance optimization.
    fn canonical_child_count(&self, position: TierPosition) -> usize {
        self.canonical_child_positions(position).len()
    }

    /// The unique canonical child positions of `position`. Default:
    /// generate moves, apply them, and canonicalize, deduplicating results.
    fn canonical_child_positions(
        &self,
        position: TierPosition,
    ) -> Vec<TierPosition> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for mv in self.generate_moves(position) {
            let child = self.do_move(position, mv);
            let canonical = TierPosition::new(
                child.tier,
                self.canonical_position(child),
            );
            if seen.insert(canonical) {
                out.push(canonical);
            }
        }
        out
    }

    /* OPTIONAL: retrograde analysis */

    /// Whether this adapter implements [`TierGame::canonical_parent_positions`]
    /// for real. Default: `false`, meaning the solver must fall back to an
    /// in-memory reverse graph ([`crate::solver::reverse_graph`]) built by
    /// scanning each tier forward with
    /// [`TierGame::canonical_child_positions`] and recording the edges in
    /// reverse as it goes.
    fn supports_parent_enumeration(&self) -> bool {
        false
    }

    /// The unique canonical positions within `parent_tier` that transition
    /// to `child` in one move. Only called when
    /// [`TierGame::supports_parent_enumeration`] returns `true`; the default
    /// body is unreachable in that case and exists only so implementors who
    /// do not override it get a clear panic rather than silently wrong
    /// results if they forget to flip the capability flag.
    fn canonical_parent_positions(
        &self,
        _child: TierPosition,
        _parent_tier: Tier,
    ) -> Vec<Position> {
        unreachable!(
            "canonical_parent_positions was called but \
            supports_parent_enumeration() returns false"
        )
    }

    /* OPTIONAL: tier symmetry removal */

    /// The position in `symmetric` (a tier symmetric to `position.tier`)
    /// corresponding to `position`. Default: `None` (tier symmetry removal
    /// disabled; every tier is treated as its own canonical form).
    fn position_in_symmetric_tier(
        &self,
        _position: TierPosition,
        _symmetric: Tier,
    ) -> Option<Position> {
        None
    }

    /// The canonical tier symmetric to `tier`, or `tier` itself if it is
    /// already canonical. Default: every tier is canonical.
    fn canonical_tier(&self, tier: Tier) -> Tier {
        tier
    }

    /* OPTIONAL: classification and diagnostics */

    /// The transition-structure classification of `tier`. Default:
    /// [`TierType::Loopy`], the conservative choice that is always correct
    /// (value-iteration subsumes retrograde analysis on loop-free tiers).
    fn tier_type(&self, _tier: Tier) -> TierType {
        TierType::Loopy
    }

    /// A human-readable name for `tier`, used as its database file name.
    /// Default: the tier's numeric value formatted in decimal.
    fn tier_name(&self, tier: Tier) -> String {
        tier.to_string()
    }
}

/// Re-exported so that callers only need `use crate::solver::adapter::*` to
/// get both [`TierGame`] and the position type it operates on.
pub use crate::model::Position;

/// Combines the values of every child of a position into the value that
/// should be assigned to the parent, per the standard backward-induction
/// rule: a position is a win if any child is a loss, a loss if every child
/// is a win, and otherwise a tie if any child is a tie (with the minimal
/// such remoteness among ties, or the maximal among losses, plus one ply).
///
/// This realizes the resolution of Open Question (b) in `SPEC_FULL.md`:
/// tie remoteness is the smallest child-tie remoteness plus one.
pub fn combine_child_values(
    children: impl IntoIterator<Item = Value>,
) -> Option<Value> {
    let mut best_win: Option<Remoteness> = None;
    let mut best_tie: Option<Remoteness> = None;
    let mut worst_lose: Option<Remoteness> = None;
    let mut any_undecided = false;

    for child in children {
        match child {
            Value::Lose(r) => {
                best_win = Some(best_win.map_or(r, |cur| cur.min(r)));
            },
            Value::Tie(r) => {
                best_tie = Some(best_tie.map_or(r, |cur| cur.min(r)));
            },
            Value::Win(r) => {
                worst_lose = Some(worst_lose.map_or(r, |cur| cur.max(r)));
            },
            Value::Draw => any_undecided = true,
        }
    }

    if let Some(r) = best_win {
        Some(Value::Win(r + 1))
    } else if let Some(r) = best_tie {
        Some(Value::Tie(r + 1))
    } else if any_undecided {
        None
    } else {
        worst_lose.map(|r| Value::Lose(r + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_beats_tie_and_lose() {
        let children =
            vec![Value::Lose(4), Value::Tie(1), Value::Win(2)];
        assert_eq!(combine_child_values(children), Some(Value::Win(5)));
    }

    #[test]
    fn smallest_losing_child_wins_fastest() {
        let children = vec![Value::Lose(7), Value::Lose(2)];
        assert_eq!(combine_child_values(children), Some(Value::Win(3)));
    }

    #[test]
    fn tie_uses_smallest_child_tie_remoteness() {
        let children = vec![Value::Tie(6), Value::Tie(2), Value::Win(1)];
        assert_eq!(combine_child_values(children), Some(Value::Tie(3)));
    }

    #[test]
    fn lose_uses_largest_child_win_remoteness() {
        let children = vec![Value::Win(1), Value::Win(9)];
        assert_eq!(combine_child_values(children), Some(Value::Lose(10)));
    }

    #[test]
    fn any_undecided_child_defers_the_parent() {
        let children = vec![Value::Win(3), Value::Draw];
        assert_eq!(combine_child_values(children), None);
    }
}
