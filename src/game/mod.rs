//! # Game Module
//!
//! Ships the concrete game adapters this crate exercises its solver core
//! against. Each implements [`crate::solver::adapter::TierGame`].

use anyhow::{bail, Result};
use clap::ValueEnum;
use regex::Regex;

use crate::interface::error::InterfaceError;

pub mod tic_tac_tier;

/// Every shipped adapter's variant string must match this pattern: a
/// dash-separated run of alphanumeric tokens, e.g. `"default"` or
/// `"3-3-3"`. Mirrors the teacher's own `VARIANT_PATTERN` constants (see
/// `game::mnk::variants::VARIANT_PATTERN`,
/// `game::zero_by::variants::VARIANT_PATTERN`) at the level this crate's
/// single shipped adapter actually needs: a shape check at the CLI
/// boundary, not a per-game parameter grammar (no shipped adapter here
/// exposes more than its one default variant).
pub const VARIANT_PATTERN: &str = r"^[A-Za-z0-9]+(?:-[A-Za-z0-9]+)*$";

/// Selects which shipped adapter a CLI invocation targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum GameModule {
    /// A tier-partitioned rendition of Tic-Tac-Toe.
    TicTacTier,
}

impl GameModule {
    /// Checks `variant` (if supplied) against [`VARIANT_PATTERN`] and then
    /// against this game's own set of supported variants, returning a
    /// [`InterfaceError::BadVariant`] if either check fails.
    pub fn validate_variant(self, variant: &Option<String>) -> Result<()> {
        let Some(variant) = variant else {
            return Ok(());
        };
        let re = Regex::new(VARIANT_PATTERN).expect("VARIANT_PATTERN is a valid regex");
        if !re.is_match(variant) {
            bail!(InterfaceError::BadVariant {
                game: self.name(),
                hint: format!(
                    "'{variant}' does not match the required shape `{VARIANT_PATTERN}`"
                ),
            });
        }
        if !self.supports_variant(variant) {
            bail!(InterfaceError::BadVariant {
                game: self.name(),
                hint: format!(
                    "'{variant}' is not a variant {} supports (only 'default')",
                    self.name()
                ),
            });
        }
        Ok(())
    }

    fn supports_variant(self, variant: &str) -> bool {
        match self {
            GameModule::TicTacTier => variant == "default",
        }
    }

    pub fn build(self) -> Box<dyn crate::solver::adapter::TierGame> {
        match self {
            GameModule::TicTacTier => Box::new(tic_tac_tier::Session::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameModule::TicTacTier => "tic-tac-tier",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_variant_is_accepted() {
        assert!(GameModule::TicTacTier
            .validate_variant(&Some("default".to_string()))
            .is_ok());
    }

    #[test]
    fn no_variant_is_accepted() {
        assert!(GameModule::TicTacTier.validate_variant(&None).is_ok());
    }

    #[test]
    fn malformed_variant_string_is_rejected() {
        assert!(GameModule::TicTacTier
            .validate_variant(&Some("not valid!".to_string()))
            .is_err());
    }

    #[test]
    fn well_formed_but_unsupported_variant_is_rejected() {
        assert!(GameModule::TicTacTier
            .validate_variant(&Some("3-3-3".to_string()))
            .is_err());
    }
}
