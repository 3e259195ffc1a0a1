//! # Test Harness Module
//!
//! Randomized consistency checks run against a [`TierGame`] adapter before
//! trusting it with a real solve, mirroring the sampling-based validation a
//! reference tier solver performs ahead of time rather than discovering an
//! adapter bug mid-solve. Positions are sampled with a seeded PRNG so a
//! failing run can be reproduced exactly by re-supplying the same seed.

use std::collections::HashSet;

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::{Tier, TierPosition};
use crate::solver::adapter::TierGame;
use crate::solver::error::{SolverError, TestFailureKind};

/// Runs the sampling-based consistency checks against `game` for `tier`,
/// drawing `sample_size` positions from a PRNG seeded with `seed`.
pub fn check_tier(
    game: &dyn TierGame,
    tier: Tier,
    sample_size: usize,
    seed: u64,
) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let size = game.tier_size(tier);
    if size == 0 {
        return Ok(());
    }

    check_tier_name(game, tier)?;
    check_child_tiers(game, tier)?;

    let samples = sample_size.min(size as usize);
    for _ in 0..samples {
        let position = rng.gen_range(0..size);
        let tier_position = TierPosition::new(tier, position);
        if !game.is_legal_position(tier_position) || game.primitive(tier_position).is_some() {
            continue;
        }
        check_tier_symmetry_self_mapping(game, tier_position)?;
        check_tier_symmetry_round_trip(game, tier_position)?;
        check_canonical_children(game, tier_position)?;

        if game.supports_parent_enumeration() {
            check_child_to_parent_matching(game, tier, tier_position)?;
            check_parent_to_child_matching(game, tier, tier_position)?;
        }
    }

    Ok(())
}

fn fail(kind: TestFailureKind, position: Option<TierPosition>, hint: impl Into<String>) -> Result<()> {
    bail!(SolverError::TestFailure { kind, position, hint: hint.into() })
}

fn check_tier_name(game: &dyn TierGame, tier: Tier) -> Result<()> {
    if game.tier_name(tier).trim().is_empty() {
        return fail(
            TestFailureKind::TierName,
            None,
            format!("tier {tier} has an empty name"),
        );
    }
    Ok(())
}

fn check_child_tiers(game: &dyn TierGame, tier: Tier) -> Result<()> {
    let declared: HashSet<Tier> = game.child_tiers(tier).into_iter().collect();
    let size = game.tier_size(tier);
    let probe = size.min(32);
    for position in 0..probe {
        let tier_position = TierPosition::new(tier, position);
        if !game.is_legal_position(tier_position) {
            continue;
        }
        for child in game.canonical_child_positions(tier_position) {
            if child.tier != tier && !declared.contains(&child.tier) {
                return fail(
                    TestFailureKind::IllegalChildTier,
                    Some(tier_position),
                    format!(
                        "move leads to tier {} which is not declared in \
                        child_tiers({tier})",
                        child.tier
                    ),
                );
            }
            if !game.is_legal_position(child) {
                return fail(
                    TestFailureKind::IllegalChildPosition,
                    Some(tier_position),
                    format!(
                        "child position {} of tier {} is not legal",
                        child.position, child.tier
                    ),
                );
            }
        }
    }
    Ok(())
}

fn check_tier_symmetry_self_mapping(game: &dyn TierGame, position: TierPosition) -> Result<()> {
    let canonical = game.canonical_position(position);
    let canonical_position = TierPosition::new(position.tier, canonical);
    if game.canonical_position(canonical_position) != canonical {
        return fail(
            TestFailureKind::TierSymmetrySelfMappingError,
            Some(position),
            "canonicalizing an already-canonical position did not return itself",
        );
    }
    Ok(())
}

fn check_tier_symmetry_round_trip(game: &dyn TierGame, position: TierPosition) -> Result<()> {
    let symmetric = game.canonical_tier(position.tier);
    if symmetric == position.tier {
        return Ok(());
    }
    let Some(mapped) = game.position_in_symmetric_tier(position, symmetric) else {
        return Ok(());
    };
    let mapped_position = TierPosition::new(symmetric, mapped);
    let Some(back) = game.position_in_symmetric_tier(mapped_position, position.tier) else {
        return fail(
            TestFailureKind::TierSymmetryInconsistent,
            Some(position),
            format!(
                "position mapped into symmetric tier {symmetric} has no \
                mapping back to tier {}",
                position.tier
            ),
        );
    };
    if back != game.canonical_position(position) {
        return fail(
            TestFailureKind::TierSymmetryInconsistent,
            Some(position),
            "round-tripping through the symmetric tier changed the position",
        );
    }
    Ok(())
}

/// Recomputes canonical children by the generate-moves/do-move/canonicalize
/// fallback and compares against whatever `game` actually returns, catching
/// adapters whose override of [`TierGame::canonical_child_positions`] or
/// [`TierGame::canonical_child_count`] disagrees with the naive derivation.
fn check_canonical_children(game: &dyn TierGame, position: TierPosition) -> Result<()> {
    let mut fallback = HashSet::new();
    for mv in game.generate_moves(position) {
        let child = game.do_move(position, mv);
        let canonical = TierPosition::new(child.tier, game.canonical_position(child));
        fallback.insert(canonical);
    }

    let reported: HashSet<TierPosition> =
        game.canonical_child_positions(position).into_iter().collect();
    if reported != fallback {
        return fail(
            TestFailureKind::CanonicalChildPositionsMismatch,
            Some(position),
            "canonical_child_positions disagrees with the generate-moves fallback",
        );
    }

    if game.canonical_child_count(position) != fallback.len() {
        return fail(
            TestFailureKind::CanonicalChildCountMismatch,
            Some(position),
            "canonical_child_count disagrees with canonical_child_positions",
        );
    }
    Ok(())
}

fn check_child_to_parent_matching(
    game: &dyn TierGame,
    tier: Tier,
    position: TierPosition,
) -> Result<()> {
    let canonical_self = game.canonical_position(position);
    for child in game.canonical_child_positions(position) {
        let parents = game.canonical_parent_positions(child, tier);
        if !parents.contains(&canonical_self) {
            return fail(
                TestFailureKind::ChildParentMismatch,
                Some(position),
                format!(
                    "child {} of tier {} does not list this position among \
                    its canonical parents",
                    child.position, child.tier
                ),
            );
        }
    }
    Ok(())
}

fn check_parent_to_child_matching(
    game: &dyn TierGame,
    tier: Tier,
    position: TierPosition,
) -> Result<()> {
    for child in game.canonical_child_positions(position) {
        for parent in game.canonical_parent_positions(child, tier) {
            let parent_position = TierPosition::new(tier, parent);
            if !game.is_legal_position(parent_position) {
                continue;
            }
            let grandchildren: HashSet<TierPosition> =
                game.canonical_child_positions(parent_position).into_iter().collect();
            if !grandchildren.contains(&child) {
                return fail(
                    TestFailureKind::ParentChildMismatch,
                    Some(parent_position),
                    format!(
                        "parent {parent} of child {} does not list it among \
                        its own canonical children",
                        child.position
                    ),
                );
            }
        }
    }
    Ok(())
}
