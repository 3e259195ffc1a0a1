#![warn(missing_docs)]
//! # Tier Solver
//!
//! Entry point wiring the command-line surface ([`interface::cli`]) to the
//! solver core ([`solver::manager::TierManager`]) and its two result
//! renderings ([`interface::terminal`], [`interface::standard`]).

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{Config, Verbosity};
use crate::database::Persistence;
use crate::interface::cli::{Cli, Commands, InfoArgs, SolveArgs, TestArgs};
use crate::interface::InfoFormat;
use crate::solver::manager::TierManager;

mod config;
mod database;
mod game;
mod interface;
mod model;
mod solver;
mod util;

fn main() {
    let cli = Cli::parse();
    let verbosity = if cli.quiet {
        Verbosity::Silent
    } else {
        Verbosity::from_count(cli.verbose)
    };

    let result = match &cli.command {
        Commands::Solve(args) => solve(args, verbosity),
        Commands::Test(args) => test(args, verbosity),
        Commands::Info(args) => info(args),
    };

    if let Err(err) = result {
        if !cli.quiet {
            eprintln!("error: {err:#}");
        }
        process::exit(exitcode::SOFTWARE);
    }
    process::exit(exitcode::OK);
}

fn persistence_from(args: &SolveArgs) -> Persistence {
    match &args.data_path {
        Some(path) => Persistence::On(path.clone()),
        None => Persistence::Off,
    }
}

fn solve(args: &SolveArgs, verbosity: Verbosity) -> Result<()> {
    args.target
        .validate_variant(&args.variant)
        .context("invalid --variant")?;
    interface::terminal::confirm_potential_overwrite(args.yes, args.mode);

    let adapter = args.target.build();
    let config = Config {
        verbosity,
        force: args.mode == interface::IOMode::Overwrite,
        variant: args.variant.clone(),
        persistence: persistence_from(args),
        threads: args.threads,
        memory_limit_bytes: args.memory_limit.unwrap_or(u64::MAX),
        compare_path: args.compare_with_reference.clone(),
        ..Config::default()
    };

    let manager = TierManager::new(adapter.as_ref(), config)
        .context("failed to initialize the tier manager")?;
    let summaries = manager.run().context("solving failed")?;

    if verbosity != Verbosity::Silent {
        interface::terminal::print_solve_summary(&summaries);
    }
    Ok(())
}

fn test(args: &TestArgs, verbosity: Verbosity) -> Result<()> {
    let adapter = args.target.build();
    let tier = args.tier.unwrap_or_else(|| adapter.initial_tier());

    solver::harness::check_tier(adapter.as_ref(), tier, args.sample_size, args.seed)
        .with_context(|| format!("consistency check failed for tier {tier}"))?;

    if verbosity != Verbosity::Silent {
        println!("tier {tier} passed every consistency check");
    }
    Ok(())
}

fn info(args: &InfoArgs) -> Result<()> {
    let adapter = args.target.build();
    let tier = args.tier.unwrap_or_else(|| adapter.initial_tier());
    let position = args.position.unwrap_or_else(|| adapter.initial_position());

    let persistence = match &args.data_path {
        Some(path) => Persistence::On(path.clone()),
        None => Persistence::Off,
    };
    let config = Config { persistence, ..Config::default() };
    let manager = TierManager::new(adapter.as_ref(), config)
        .context("failed to initialize the tier manager")?;

    let tier_position = model::TierPosition::new(tier, position);
    let status = manager.tier_status(tier);
    let value = manager.query(tier, position).context("probing the database failed")?;
    let moves = manager.moves(tier, position).context("enumerating moves failed")?;

    match (&args.output_path, args.output) {
        (None, InfoFormat::Legible) => {
            interface::terminal::print_tier_status(tier, status);
            interface::terminal::print_value(tier_position, value);
            interface::terminal::print_moves(&moves);
        },
        (None, InfoFormat::Json) => {
            println!("{}", interface::standard::tier_status_to_json(tier, status));
            println!("{}", interface::standard::position_info_to_json(tier_position, value));
            println!("{}", interface::standard::moves_to_json(&moves));
        },
        (Some(path), format) => {
            let rendered = render_report(format, tier, status, tier_position, value, &moves);
            write_report(path, &rendered)?;
        },
    }
    Ok(())
}

/// Renders an `info` report as plain text (no terminal color codes, since the
/// destination is a file, not a TTY), in whichever format `format` selects.
fn render_report(
    format: InfoFormat,
    tier: model::Tier,
    status: model::TierStatus,
    position: model::TierPosition,
    value: Option<model::Value>,
    moves: &[solver::manager::MoveReport],
) -> String {
    match format {
        InfoFormat::Legible => {
            format!(
                "tier {tier}: {status:?}\ntier {} position {}: {value:?}\n{} move(s)\n",
                position.tier,
                position.position,
                moves.len(),
            )
        },
        InfoFormat::Json => {
            format!(
                "{}\n{}\n{}\n",
                interface::standard::tier_status_to_json(tier, status),
                interface::standard::position_info_to_json(position, value),
                interface::standard::moves_to_json(moves),
            )
        },
    }
}

/// Writes `contents` to `path`, wrapping any I/O failure as an
/// [`interface::error::InterfaceError::Io`] rather than a bare `anyhow`
/// string, so a scripted caller can match on the error kind.
fn write_report(path: &std::path::Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|err| {
        interface::error::InterfaceError::Io {
            path: path.display().to_string(),
            hint: err.to_string(),
        }
        .into()
    })
}
