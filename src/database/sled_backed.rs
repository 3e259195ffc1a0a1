//! # Sled-Backed Database
//!
//! A persistent [`TierDatabase`] backed by the `sled` embedded key-value
//! store. Each tier is stored as its own `sled::Tree`, keyed by the
//! big-endian bytes of the position and valued by the bytes of a
//! [`crate::solver::record::ValueRemotenessRecord`]. A small metadata tree
//! tracks each tier's declared size and [`TierStatus`].

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::RwLock;

use crate::database::TierDatabase;
use crate::database::error::DatabaseError;
use crate::model::{Tier, TierPosition, TierSize, TierStatus, Value};
use crate::solver::record::ValueRemotenessRecord;

const META_TREE: &str = "__tier_meta";
const STATUS_SOLVED: u8 = 1;
const STATUS_CORRUPTED: u8 = 2;

/// A persistent tier database backed by `sled`.
pub struct SledDatabase {
    db: sled::Db,
    sizes: RwLock<std::collections::HashMap<Tier, TierSize>>,
}

impl SledDatabase {
    /// Opens (creating if necessary) a sled database rooted at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let db = sled::open(path)
            .with_context(|| format!("failed to open sled database at {path:?}"))?;
        Ok(Self {
            db,
            sizes: RwLock::new(std::collections::HashMap::new()),
        })
    }

    fn tree(&self, tier: Tier) -> Result<sled::Tree> {
        self.db
            .open_tree(tier.to_be_bytes())
            .with_context(|| format!("failed to open sled tree for tier {tier}"))
    }

    fn meta_tree(&self) -> Result<sled::Tree> {
        self.db
            .open_tree(META_TREE)
            .context("failed to open sled metadata tree")
    }
}

impl TierDatabase for SledDatabase {
    fn tier_status(&self, tier: Tier) -> TierStatus {
        let Ok(meta) = self.meta_tree() else {
            return TierStatus::CheckError;
        };
        match meta.get(tier.to_be_bytes()) {
            Ok(Some(bytes)) if bytes.first() == Some(&STATUS_SOLVED) => {
                TierStatus::Solved
            },
            Ok(Some(bytes)) if bytes.first() == Some(&STATUS_CORRUPTED) => {
                TierStatus::Corrupted
            },
            Ok(Some(_)) | Ok(None) => TierStatus::Missing,
            Err(_) => TierStatus::CheckError,
        }
    }

    fn create_solving_tier(&self, tier: Tier, size: TierSize) -> Result<()> {
        let tree = self.tree(tier)?;
        tree.clear()
            .with_context(|| format!("failed to clear sled tree for tier {tier}"))?;
        self.sizes.write().unwrap().insert(tier, size);
        Ok(())
    }

    fn probe(&self, position: TierPosition) -> Result<Option<Value>> {
        let tree = self.tree(position.tier)?;
        let Some(bytes) = tree
            .get(position.position.to_be_bytes())
            .with_context(|| {
                format!(
                    "failed to probe tier {} position {}",
                    position.tier, position.position
                )
            })?
        else {
            return Ok(None);
        };
        let record = ValueRemotenessRecord::from_bytes(&bytes).map_err(|e| {
            anyhow!(DatabaseError::Corrupt {
                tier: position.tier,
                hint: e.to_string(),
            })
        })?;
        Ok(record.value())
    }

    fn set_value(&self, position: TierPosition, value: Value) -> Result<()> {
        let tree = self.tree(position.tier)?;
        let record = ValueRemotenessRecord::new(value)
            .context("value could not be encoded into a record")?;
        tree.insert(position.position.to_be_bytes(), record.to_bytes())
            .with_context(|| {
                format!(
                    "failed to write tier {} position {}",
                    position.tier, position.position
                )
            })?;
        Ok(())
    }

    fn flush_solving_tier(&self, tier: Tier) -> Result<()> {
        let tree = self.tree(tier)?;
        tree.flush()
            .with_context(|| format!("failed to flush tier {tier}"))?;
        let meta = self.meta_tree()?;
        meta.insert(tier.to_be_bytes(), &[STATUS_SOLVED])
            .context("failed to update tier status metadata")?;
        meta.flush().context("failed to flush tier status metadata")?;
        Ok(())
    }

    fn free_solving_tier(&self, _tier: Tier) -> Result<()> {
        // sled trees are handle-based and cheap to keep open; nothing to do
        // beyond what `flush_solving_tier` already persisted.
        Ok(())
    }

    fn mark_corrupted(&self, tier: Tier) -> Result<()> {
        let meta = self.meta_tree()?;
        meta.insert(tier.to_be_bytes(), &[STATUS_CORRUPTED])
            .context("failed to mark tier corrupted")?;
        Ok(())
    }

    fn tier_size(&self, tier: Tier) -> Option<TierSize> {
        self.sizes.read().unwrap().get(&tier).copied()
    }
}
