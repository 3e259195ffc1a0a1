//! # Terminal Interface Module
//!
//! Human-legible rendering of solver results, colored via `colored` the same
//! way the crate this was adapted from colors its own terminal output.

use colored::Colorize;
use std::process;

use crate::interface::IOMode;
use crate::model::{TierStatus, TierPosition, Value};
use crate::solver::manager::MoveReport;
use crate::solver::tier_worker::TierSolveSummary;

/// Prompts for confirmation before an operation that would overwrite an
/// existing database, unless `yes` was already passed on the command line.
pub fn confirm_potential_overwrite(yes: bool, mode: IOMode) {
    if mode == IOMode::Overwrite && !yes {
        println!(
            "{} this will overwrite any existing solution database. \
            Continue? [y/N]: ",
            "warning:".yellow().bold()
        );
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .expect("failed to read confirmation from stdin");
        if !matches!(answer.trim(), "y" | "Y") {
            process::exit(exitcode::OK);
        }
    }
}

pub fn print_tier_status(tier: crate::model::Tier, status: TierStatus) {
    let label = match status {
        TierStatus::Solved => "solved".green(),
        TierStatus::Corrupted => "corrupted".red(),
        TierStatus::Missing => "missing".yellow(),
        TierStatus::CheckError => "check-error".red().bold(),
    };
    println!("tier {tier}: {label}");
}

pub fn print_value(position: TierPosition, value: Option<Value>) {
    let rendered = match value {
        Some(Value::Win(r)) => format!("{} in {r}", "win".green()),
        Some(Value::Lose(r)) => format!("{} in {r}", "lose".red()),
        Some(Value::Tie(r)) => format!("{} in {r}", "tie".yellow()),
        Some(Value::Draw) => "draw".cyan().to_string(),
        None => "undecided".dimmed().to_string(),
    };
    println!("tier {} position {}: {rendered}", position.tier, position.position);
}

/// Lists every legal move at a position, marking which ones are consistent
/// with optimal play (in bold) so an interactive user can tell a forced best
/// move from a move that merely doesn't lose.
pub fn print_moves(moves: &[MoveReport]) {
    if moves.is_empty() {
        println!("{}", "no legal moves".dimmed());
        return;
    }
    for report in moves {
        let rendered = match report.value {
            Some(Value::Win(r)) => format!("{} in {r}", "win".green()),
            Some(Value::Lose(r)) => format!("{} in {r}", "lose".red()),
            Some(Value::Tie(r)) => format!("{} in {r}", "tie".yellow()),
            Some(Value::Draw) => "draw".cyan().to_string(),
            None => "undecided".dimmed().to_string(),
        };
        let line = format!(
            "move {} -> tier {} position {}: {rendered}",
            report.mv, report.child.tier, report.child.position,
        );
        if report.optimal {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }
}

pub fn print_solve_summary(summaries: &[(crate::model::Tier, TierSolveSummary)]) {
    for (tier, summary) in summaries {
        println!(
            "tier {tier}: {} win, {} lose, {} tie, {} draw ({} total)",
            summary.win.to_string().green(),
            summary.lose.to_string().red(),
            summary.tie.to_string().yellow(),
            summary.draw.to_string().cyan(),
            summary.total(),
        );
    }
}
