#![allow(dead_code)]
//! # Data Models Module
//!
//! Centralized definitions for the core data types shared by the solver,
//! database, and game-adapter modules.

/* PRIMARY TYPES */

/// Identifies a partition ("tier") of the state space of a game. Positions
/// within the same tier are expected to share a common size and a common set
/// of child tiers reachable by a single move.
pub type Tier = u64;

/// Identifies a position within a single tier. Combined with a `Tier`, a
/// `Position` uniquely identifies a game state.
pub type Position = u64;

/// A fully-qualified identifier for a game state: the tier it belongs to and
/// its index within that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TierPosition {
    pub tier: Tier,
    pub position: Position,
}

impl TierPosition {
    pub const fn new(tier: Tier, position: Position) -> Self {
        Self { tier, position }
    }
}

/// Expresses whose turn it is in a game, where every player is assigned to a
/// different integer. Note that the type imposes a natural (but unknown)
/// limitation to player count that is dependent on the target architecture.
pub type Turn = usize;

/// Used to count the number of players in a game.
pub type PlayerCount = Turn;

/* ATTRIBUTE TYPES */

/// The solved game-theoretic value of a position from the perspective of the
/// player to move, paired with its remoteness. `Lose`/`Win` are named from
/// the mover's perspective: `Lose(r)` means the player to move loses in `r`
/// ply under perfect play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Lose(Remoteness),
    Tie(Remoteness),
    Win(Remoteness),
    Draw,
}

impl Value {
    /// Returns the remoteness carried by this value, or `None` for `Draw`
    /// (which by definition has no finite remoteness).
    pub const fn remoteness(&self) -> Option<Remoteness> {
        match self {
            Value::Lose(r) | Value::Tie(r) | Value::Win(r) => Some(*r),
            Value::Draw => None,
        }
    }

    /// The value of a position one ply after `self`, from the perspective of
    /// the player who *made* the move into `self` (so wins and losses swap).
    pub fn backward(&self) -> Option<Value> {
        match self {
            Value::Lose(r) => Some(Value::Win(r + 1)),
            Value::Win(r) => Some(Value::Lose(r + 1)),
            Value::Tie(r) => Some(Value::Tie(r + 1)),
            Value::Draw => None,
        }
    }
}

/// Indicates the number of choices that players have to make to reach a
/// terminal state in a game under perfect play. Bounded above by [`R_MAX`].
pub type Remoteness = u16;

/// Upper bound on remoteness values recognized by this solver. A position
/// whose true remoteness would exceed this is not representable and is a
/// defect in the persisted record layout, not in any individual game.
pub const R_MAX: Remoteness = 1023;

/// The number of children of a position that have not yet been assigned a
/// value during retrograde analysis. Widened to 16 bits up front (rather
/// than defaulting to 8 and truncating on overflow) since no single adapter
/// branching factor is known ahead of time; [`crate::solver::tier_worker::retrograde::solve`]
/// rejects, rather than silently clamps, a position whose canonical child
/// count would not fit even after this widening.
pub type WideChildCount = u16;

/* TIER CLASSIFICATION */

/// Classifies the transition structure of a tier's child-tier graph, as
/// declared (optionally) by a game adapter via
/// [`crate::solver::adapter::TierGame::tier_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierType {
    /// Every move from this tier ends the game immediately (no child tiers).
    ImmediateTransition,

    /// The child-tier graph restricted to tiers reachable from this one
    /// contains no cycles, so retrograde analysis alone suffices.
    LoopFree,

    /// The tier (or a set of tiers including it) can reach a position in
    /// itself again, so value-iteration is required in addition to (or
    /// instead of) retrograde analysis.
    Loopy,
}

/// The outcome of attempting to solve or load a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierStatus {
    /// The tier has a complete, internally-consistent solution on disk.
    Solved,

    /// The tier's persisted records failed an internal consistency check and
    /// cannot be trusted; it must be recomputed.
    Corrupted,

    /// No record of the tier exists in the database.
    Missing,

    /// An error was encountered while checking the tier's status itself
    /// (e.g. an I/O failure reading its status record).
    CheckError,
}

/* SECONDARY TYPES */

/// Used to count the number of positions in a tier.
pub type TierSize = u64;

/// Encodes an identifier for a given partition within the space of states of
/// a game, matching the width of [`Tier`] since tiers are themselves a
/// partition.
pub type Partition = Tier;
