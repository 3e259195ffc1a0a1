//! # Configuration Module
//!
//! Collects the flags a solve run is parameterized by into a single value,
//! constructed once from the CLI ([`crate::interface::cli`]) and threaded
//! into [`crate::solver::manager::TierManager`].

use std::path::PathBuf;

use crate::database::Persistence;

/// Verbosity level for solver progress output, honored by
/// [`crate::solver::report::TerminalReporter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    #[default]
    Silent,
    Tiers,
    Chatty,
}

impl Verbosity {
    pub fn as_level(self) -> i32 {
        match self {
            Verbosity::Silent => 0,
            Verbosity::Tiers => 1,
            Verbosity::Chatty => 2,
        }
    }

    pub fn from_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Silent,
            1 => Verbosity::Tiers,
            _ => Verbosity::Chatty,
        }
    }
}

/// Every knob a solve run can be tuned with.
#[derive(Debug, Clone)]
pub struct Config {
    /// How much progress output to produce.
    pub verbosity: Verbosity,

    /// Re-solve every tier even if the database reports it already solved.
    pub force: bool,

    /// Soft cap, in bytes, on the combined size of in-flight frontiers and
    /// reverse-graph edges. A tier whose resource estimate would exceed this
    /// fails with [`crate::solver::error::SolverError::ResourceExhausted`]
    /// rather than being attempted.
    pub memory_limit_bytes: u64,

    /// Which variant of the game to solve, if the adapter supports more than
    /// one. `None` selects the adapter's default variant.
    pub variant: Option<String>,

    /// Where tier databases are stored, or [`Persistence::Off`] for a
    /// purely in-memory run (used by `tiersolve test` and unit tests).
    pub persistence: Persistence,

    /// Number of worker threads to use for the tier-local parallel-for
    /// constructs. `None` defers to `rayon`'s default (available
    /// parallelism).
    pub threads: Option<usize>,

    /// Root of a previously-solved reference database. When set, every tier
    /// this run solves is checked against it after solving
    /// ([`crate::solver::manager::TierManager::run`]'s "compare mode"),
    /// failing the run on the first mismatch.
    pub compare_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Silent,
            force: false,
            memory_limit_bytes: u64::MAX,
            variant: None,
            persistence: Persistence::Off,
            threads: None,
            compare_path: None,
        }
    }
}

impl Config {
    /// The root directory tier databases are stored under, if persistence is
    /// enabled.
    pub fn data_path(&self) -> Option<&PathBuf> {
        match &self.persistence {
            Persistence::On(path) => Some(path),
            Persistence::Off => None,
        }
    }

    pub fn resolved_threads(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        })
    }
}
