//! # Interface Module
//!
//! The front-ends consuming [`crate::solver::manager::TierManager`]: a
//! command-line surface ([`cli`]), human-legible terminal rendering
//! ([`terminal`]), and machine-legible JSON rendering ([`standard`]) of the
//! same underlying results.

use std::fmt;

use clap::ValueEnum;

pub mod cli;
pub mod error;
pub mod standard;
pub mod terminal;

/// The format `info`/`analyze` results are printed in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum InfoFormat {
    /// Legible output intended for human eyes.
    Legible,

    /// Machine-readable JSON.
    Json,
}

impl fmt::Display for InfoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoFormat::Legible => write!(f, "legible"),
            InfoFormat::Json => write!(f, "json"),
        }
    }
}

/// Specifies how a solve should interact with an existing database, mirrored
/// from [`crate::config::Config::force`] into a user-facing vocabulary.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum IOMode {
    /// Use existing tier databases and compute whatever is missing.
    Constructive,

    /// Recompute every tier from scratch, overwriting existing databases.
    Overwrite,
}

impl fmt::Display for IOMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IOMode::Constructive => write!(f, "constructive"),
            IOMode::Overwrite => write!(f, "overwrite"),
        }
    }
}
