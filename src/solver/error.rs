//! # Solver Error Module
//!
//! Defines the error taxonomy produced by the tier solver: violations of the
//! game adapter contract, resource exhaustion, database I/O failures, test
//! harness failures, and cooperative cancellation.

use std::{error::Error, fmt};

use crate::model::{Tier, TierPosition};

/* TEST HARNESS SUB-CODES */

/// Specific invariant the test harness detected a violation of. Mirrors the
/// checks a reference tier solver runs over a game adapter before trusting
/// it with a real solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestFailureKind {
    /// A prior check already failed; this one was skipped as a consequence.
    Dependency,

    /// The adapter's tier-name formatter returned an invalid name.
    TierName,

    /// `child_tiers` produced a tier that is not reachable by any move.
    IllegalChildTier,

    /// A generated child position fails `is_legal_position`.
    IllegalChildPosition,

    /// `canonical_child_positions` disagrees with the
    /// generate-moves/do-move/canonicalize fallback.
    CanonicalChildPositionsMismatch,

    /// `canonical_child_count` disagrees with the fallback count.
    CanonicalChildCountMismatch,

    /// Canonicalizing a position within its own tier did not return itself.
    TierSymmetrySelfMappingError,

    /// Mapping a position into a symmetric tier and back did not round-trip.
    TierSymmetryInconsistent,

    /// A canonical child's canonical parents do not include the position
    /// under test.
    ChildParentMismatch,

    /// A canonical parent's canonical children do not include the position
    /// under test.
    ParentChildMismatch,
}

impl fmt::Display for TestFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Dependency => "a prior check failed",
            Self::TierName => "invalid tier name",
            Self::IllegalChildTier => "child tier is unreachable",
            Self::IllegalChildPosition => "child position is illegal",
            Self::CanonicalChildPositionsMismatch => {
                "canonical child positions mismatch"
            },
            Self::CanonicalChildCountMismatch => {
                "canonical child count mismatch"
            },
            Self::TierSymmetrySelfMappingError => {
                "tier symmetry self-mapping error"
            },
            Self::TierSymmetryInconsistent => "tier symmetry inconsistent",
            Self::ChildParentMismatch => "child/parent mismatch",
            Self::ParentChildMismatch => "parent/child mismatch",
        };
        write!(f, "{s}")
    }
}

/* SOLVER ERRORS */

/// The error taxonomy produced while solving, in correspondence with the
/// propagation policy of [`crate::solver::manager::TierManager`]:
///
/// - [`SolverError::AdapterContract`] is fatal to the tier being processed.
/// - [`SolverError::ResourceExhausted`] is propagated up to the manager,
///   which halts the run.
/// - [`SolverError::DatabaseIo`] marks the offending tier as corrupted; the
///   run continues unless the manager is configured to escalate.
/// - [`SolverError::TestFailure`] is non-fatal and is reported to the
///   caller for diagnosis.
/// - [`SolverError::Cancelled`] is treated as a successful, resultless stop.
#[derive(Debug)]
pub enum SolverError {
    /// A game adapter violated its documented contract (e.g. returned a
    /// position `is_legal_position` rejects, or an inconsistent tier size).
    AdapterContract { tier: Tier, hint: String },

    /// The configured memory limit was exceeded while solving.
    ResourceExhausted { tier: Tier, requested_bytes: u64 },

    /// A read or write against the tier database failed.
    DatabaseIo { tier: Tier, hint: String },

    /// The test harness detected a violation of a testable invariant.
    TestFailure {
        kind: TestFailureKind,
        position: Option<TierPosition>,
        hint: String,
    },

    /// Solving was cancelled cooperatively (coordinator `terminate`, or a
    /// local interrupt); no result is available, but this is not a failure.
    Cancelled,

    /// A solved value diverged from the reference database supplied via
    /// `--compare-with-reference`, per `spec.md` §8 property 8.
    ReferenceMismatch {
        tier: Tier,
        position: crate::model::Position,
        expected: String,
        actual: String,
    },
}

impl Error for SolverError {}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdapterContract { tier, hint } => {
                write!(
                    f,
                    "adapter contract violated while solving tier {tier}: \
                    {hint}"
                )
            },
            Self::ResourceExhausted {
                tier,
                requested_bytes,
            } => {
                write!(
                    f,
                    "solving tier {tier} would require {requested_bytes} \
                    bytes, exceeding the configured memory limit"
                )
            },
            Self::DatabaseIo { tier, hint } => {
                write!(f, "database I/O failed for tier {tier}: {hint}")
            },
            Self::TestFailure {
                kind,
                position,
                hint,
            } => {
                if let Some(p) = position {
                    write!(
                        f,
                        "test harness failure ({kind}) at tier {} position \
                        {}: {hint}",
                        p.tier, p.position
                    )
                } else {
                    write!(f, "test harness failure ({kind}): {hint}")
                }
            },
            Self::Cancelled => write!(f, "solving was cancelled"),
            Self::ReferenceMismatch { tier, position, expected, actual } => {
                write!(
                    f,
                    "reference mismatch at tier {tier} position {position}: \
                    expected {expected}, got {actual}"
                )
            },
        }
    }
}
