//! # Database Module
//!
//! Defines [`TierDatabase`], the storage collaborator consumed by the tier
//! solver. Two implementations are provided: [`volatile::VolatileDatabase`]
//! (in-memory, used when persistence is off or for tests) and
//! [`sled_backed::SledDatabase`] (persistent, backed by the `sled` embedded
//! database).

use anyhow::Result;
use std::path::PathBuf;

use crate::model::{Tier, TierPosition, TierSize, TierStatus, Value};

pub mod error;
pub mod sled_backed;
pub mod volatile;

/* DEFINITIONS */

/// Indicates whether the database implementation should store the data it is
/// managing to disk, or ensure nothing remains on disk after it is finished.
#[derive(Debug, Clone)]
pub enum Persistence {
    On(PathBuf),
    Off,
}

/* DATABASE INTERFACE */

/// The storage collaborator the tier solver reads from and writes to. All
/// methods take `&self`; implementations are expected to provide interior
/// mutability and to be safe to call concurrently from every worker thread
/// solving the same tier.
pub trait TierDatabase: Send + Sync {
    /// The persisted status of `tier`: solved, corrupted, missing, or
    /// indeterminate due to an error encountered while checking.
    fn tier_status(&self, tier: Tier) -> TierStatus;

    /// Allocates storage for `size` positions of `tier`, to be filled in by
    /// subsequent calls to [`TierDatabase::set_value`]. Must be called
    /// before any other mutating call for `tier`.
    fn create_solving_tier(&self, tier: Tier, size: TierSize) -> Result<()>;

    /// The value recorded for `position`, or `None` if undecided. Valid both
    /// for a tier currently being solved and for any previously-flushed
    /// tier (a prerequisite for loading children in retrograde analysis).
    fn probe(&self, position: TierPosition) -> Result<Option<Value>>;

    /// Records `value` for `position`. `position.tier` must currently be
    /// open via [`TierDatabase::create_solving_tier`].
    fn set_value(&self, position: TierPosition, value: Value) -> Result<()>;

    /// Persists every value set for `tier` since it was opened, and marks
    /// the tier [`TierStatus::Solved`].
    fn flush_solving_tier(&self, tier: Tier) -> Result<()>;

    /// Releases any in-memory resources associated with solving `tier`.
    /// Safe to call whether or not the tier was flushed.
    fn free_solving_tier(&self, tier: Tier) -> Result<()>;

    /// Marks `tier` as [`TierStatus::Corrupted`], used when a consistency
    /// check against it fails after the fact.
    fn mark_corrupted(&self, tier: Tier) -> Result<()>;

    /// The number of positions allocated for `tier`, if it has been opened
    /// (via solving or a previous flush) at some point in this database's
    /// lifetime.
    fn tier_size(&self, tier: Tier) -> Option<TierSize>;
}

/// Convenience alias used where a database is shared across worker threads.
pub type SharedDatabase = std::sync::Arc<dyn TierDatabase>;

