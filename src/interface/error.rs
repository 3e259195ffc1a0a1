//! # Interface Error Module
//!
//! Errors that can happen while parsing or serving CLI requests, distinct
//! from [`crate::solver::error::SolverError`] (which concerns the solve
//! itself, not the surface presenting it).

use std::{error::Error, fmt};

#[derive(Debug)]
pub enum InterfaceError {
    /// The `--variant` string did not conform to the target game's protocol.
    BadVariant { game: &'static str, hint: String },

    /// Reading or writing the requested output path failed.
    Io { path: String, hint: String },
}

impl Error for InterfaceError {}

impl fmt::Display for InterfaceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::BadVariant { game, hint } => {
                write!(f, "invalid variant for game '{game}': {hint}")
            },
            Self::Io { path, hint } => {
                write!(f, "I/O error at '{path}': {hint}")
            },
        }
    }
}
