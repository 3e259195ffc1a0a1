//! # Database Error Module
//!
//! Errors produced by [`crate::database::TierDatabase`] implementations.
//! Pertains only to the top-level database abstraction, not any one
//! storage engine's internal error type (those are wrapped via
//! `anyhow::Context` at the call site).

use std::{error::Error, fmt};

use crate::model::Tier;

/* ERROR WRAPPER */

#[derive(Debug)]
pub enum DatabaseError {
    /// The underlying storage engine reported an I/O failure.
    Io { tier: Tier, hint: String },

    /// A record read back from storage failed to decode.
    Corrupt { tier: Tier, hint: String },

    /// An operation was attempted against a tier that was never opened for
    /// solving (no call to `create_solving_tier` preceded it).
    NotOpen { tier: Tier },
}

impl Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { tier, hint } => {
                write!(f, "database I/O error on tier {tier}: {hint}")
            },
            Self::Corrupt { tier, hint } => {
                write!(f, "corrupt record in tier {tier}: {hint}")
            },
            Self::NotOpen { tier } => {
                write!(f, "tier {tier} was never opened for solving")
            },
        }
    }
}
