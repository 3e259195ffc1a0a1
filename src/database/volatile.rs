//! # Volatile Database
//!
//! An in-memory [`TierDatabase`] backed by concurrent hash maps, used when
//! persistence is off ([`crate::database::Persistence::Off`]) and by tests
//! that should not touch disk.

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::sync::RwLock;

use crate::database::TierDatabase;
use crate::database::error::DatabaseError;
use crate::model::{Tier, TierPosition, TierSize, TierStatus, Value};

#[derive(Default)]
struct TierState {
    size: TierSize,
    values: Vec<RwLock<Option<Value>>>,
    status: TierStatus,
}

impl Default for TierStatus {
    fn default() -> Self {
        TierStatus::Missing
    }
}

/// A volatile, in-memory tier database. Every tier ever opened remains
/// resident for the lifetime of the database; [`TierDatabase::free_solving_tier`]
/// only drops the per-position lock array, not the flushed values, so that
/// parent tiers can still probe already-solved children after they free.
pub struct VolatileDatabase {
    tiers: RwLock<HashMap<Tier, TierState>>,
}

impl VolatileDatabase {
    pub fn new() -> Self {
        Self {
            tiers: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for VolatileDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl TierDatabase for VolatileDatabase {
    fn tier_status(&self, tier: Tier) -> TierStatus {
        self.tiers
            .read()
            .unwrap()
            .get(&tier)
            .map(|t| t.status)
            .unwrap_or(TierStatus::Missing)
    }

    fn create_solving_tier(&self, tier: Tier, size: TierSize) -> Result<()> {
        let mut tiers = self.tiers.write().unwrap();
        let mut values = Vec::with_capacity(size as usize);
        values.resize_with(size as usize, || RwLock::new(None));
        tiers.insert(
            tier,
            TierState {
                size,
                values,
                status: TierStatus::Missing,
            },
        );
        Ok(())
    }

    fn probe(&self, position: TierPosition) -> Result<Option<Value>> {
        let tiers = self.tiers.read().unwrap();
        let Some(state) = tiers.get(&position.tier) else {
            return Ok(None);
        };
        let Some(slot) = state.values.get(position.position as usize) else {
            bail!(DatabaseError::Io {
                tier: position.tier,
                hint: format!(
                    "position {} is out of bounds for a tier of size {}",
                    position.position, state.size
                ),
            });
        };
        Ok(*slot.read().unwrap())
    }

    fn set_value(&self, position: TierPosition, value: Value) -> Result<()> {
        let tiers = self.tiers.read().unwrap();
        let Some(state) = tiers.get(&position.tier) else {
            bail!(DatabaseError::NotOpen {
                tier: position.tier
            });
        };
        let Some(slot) = state.values.get(position.position as usize) else {
            bail!(DatabaseError::Io {
                tier: position.tier,
                hint: format!(
                    "position {} is out of bounds for a tier of size {}",
                    position.position, state.size
                ),
            });
        };
        *slot.write().unwrap() = Some(value);
        Ok(())
    }

    fn flush_solving_tier(&self, tier: Tier) -> Result<()> {
        let mut tiers = self.tiers.write().unwrap();
        let Some(state) = tiers.get_mut(&tier) else {
            bail!(DatabaseError::NotOpen { tier });
        };
        state.status = TierStatus::Solved;
        Ok(())
    }

    fn free_solving_tier(&self, _tier: Tier) -> Result<()> {
        // Values are kept resident: a volatile database has nowhere else to
        // recover them from once freed, and parent tiers may still need to
        // probe them during retrograde analysis.
        Ok(())
    }

    fn mark_corrupted(&self, tier: Tier) -> Result<()> {
        let mut tiers = self.tiers.write().unwrap();
        if let Some(state) = tiers.get_mut(&tier) {
            state.status = TierStatus::Corrupted;
        }
        Ok(())
    }

    fn tier_size(&self, tier: Tier) -> Option<TierSize> {
        self.tiers.read().unwrap().get(&tier).map(|t| t.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_value_through_the_database() {
        let db = VolatileDatabase::new();
        db.create_solving_tier(0, 4).unwrap();
        let pos = TierPosition::new(0, 2);
        assert_eq!(db.probe(pos).unwrap(), None);
        db.set_value(pos, Value::Win(3)).unwrap();
        assert_eq!(db.probe(pos).unwrap(), Some(Value::Win(3)));
    }

    #[test]
    fn flush_marks_the_tier_solved() {
        let db = VolatileDatabase::new();
        db.create_solving_tier(1, 1).unwrap();
        assert_eq!(db.tier_status(1), TierStatus::Missing);
        db.flush_solving_tier(1).unwrap();
        assert_eq!(db.tier_status(1), TierStatus::Solved);
    }

    #[test]
    fn setting_a_value_on_an_unopened_tier_fails() {
        let db = VolatileDatabase::new();
        let result = db.set_value(TierPosition::new(9, 0), Value::Draw);
        assert!(result.is_err());
    }
}
