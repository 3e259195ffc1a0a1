//! # Command Line Module
//!
//! UNIX-like CLI tooling for scripting and ergonomic interactive use, built
//! with [clap](https://docs.rs/clap/latest/clap/) following
//! [this](https://clig.dev/) guide, the same as the crate this was adapted
//! from does for its own CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::game::GameModule;
use crate::interface::{IOMode, InfoFormat};

/// `tiersolve`: a tier-decomposed retrograde solver for finite, two-player,
/// perfect-information games.
#[derive(Parser)]
#[command(author, version, about, long_about = None, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Send no output to STDOUT during successful execution.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity; may be repeated (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Solve a game, tier by tier, from its initial tier outward.
    Solve(SolveArgs),

    /// Run the adapter consistency checks without solving anything.
    Test(TestArgs),

    /// Report the solved status and value of a position.
    Info(InfoArgs),
}

#[derive(Args)]
pub struct SolveArgs {
    /// Target game to solve.
    pub target: GameModule,

    /// Solve a specific variant of the game, if it supports variants.
    #[arg(short = 'r', long)]
    pub variant: Option<String>,

    /// Whether to reuse an existing database or recompute from scratch.
    #[arg(short, long, default_value_t = IOMode::Constructive)]
    pub mode: IOMode,

    /// Root directory for persisted tier databases. Omit to solve entirely
    /// in memory without touching disk.
    #[arg(short, long)]
    pub data_path: Option<PathBuf>,

    /// Number of worker threads. Defaults to available parallelism.
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Soft cap, in bytes, on a single tier's estimated in-flight frontier
    /// and reverse-graph memory. A tier whose estimate would exceed this
    /// fails rather than being attempted. Defaults to unbounded.
    #[arg(short = 'l', long)]
    pub memory_limit: Option<u64>,

    /// Check every tier this run solves against the already-solved
    /// reference database at this path, failing on the first mismatch.
    #[arg(short = 'c', long)]
    pub compare_with_reference: Option<PathBuf>,

    /// Skip the overwrite confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct TestArgs {
    /// Target game to check.
    pub target: GameModule,

    /// Tier to check. Defaults to the game's initial tier.
    #[arg(short, long)]
    pub tier: Option<u64>,

    /// Number of positions to sample per tier.
    #[arg(short, long, default_value_t = 256)]
    pub sample_size: usize,

    /// PRNG seed, for reproducing a failing run.
    #[arg(short = 'e', long, default_value_t = 0)]
    pub seed: u64,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Target game to report on.
    pub target: GameModule,

    /// Tier to report on. Defaults to the game's initial tier.
    #[arg(short, long)]
    pub tier: Option<u64>,

    /// Position within the tier to report on.
    #[arg(short, long)]
    pub position: Option<u64>,

    /// Root directory the game's tier databases are stored under.
    #[arg(short, long)]
    pub data_path: Option<PathBuf>,

    /// Format to print the report in.
    #[arg(short, long, default_value_t = InfoFormat::Legible)]
    pub output: InfoFormat,

    /// Write the report to this file instead of standard output.
    #[arg(short = 'f', long)]
    pub output_path: Option<PathBuf>,
}
