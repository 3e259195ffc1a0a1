//! # Coordinator Module (feature `coordinator`)
//!
//! A minimal wire protocol for distributing tier solves across multiple
//! processes: a coordinator hands out tiers to workers polling for work.
//! This is intentionally thin — distributed coordination is out of scope for
//! a detailed design here — and is compiled out entirely unless the
//! `coordinator` feature is enabled.

use std::time::Duration;

use crate::model::Tier;

/// A request a worker sends to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// No tier is currently available; try again after the poll interval.
    Sleep,

    /// Solve `tier`, trusting the database's existing status.
    Solve(Tier),

    /// Solve `tier` even if the database reports it already solved.
    ForceSolve(Tier),

    /// No more work will ever be issued; the worker may exit.
    Terminate,
}

/// A worker's response to a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// The worker is idle and checking in for work.
    Check,

    /// `tier` was solved successfully.
    ReportSolved(Tier),

    /// `tier` was already solved and loaded from disk without recomputation.
    ReportLoaded(Tier),

    /// `tier` failed to solve.
    ReportError(Tier),
}

/// How long a worker waits between polls when told to [`Command::Sleep`].
pub const POLL_BACKOFF: Duration = Duration::from_secs(1);

/// Assigns tiers to workers on request. A real deployment would back this
/// with a network listener; this in-process implementation exists so the
/// protocol's state machine can be exercised without one.
pub struct Coordinator {
    pending: Vec<Tier>,
    force: bool,
}

impl Coordinator {
    pub fn new(pending: Vec<Tier>, force: bool) -> Self {
        Self { pending, force }
    }

    /// The next command a worker should act on, given its last reply.
    pub fn next_command(&mut self, reply: Reply) -> Command {
        match reply {
            Reply::ReportError(_) => Command::Terminate,
            _ => match self.pending.pop() {
                Some(tier) if self.force => Command::ForceSolve(tier),
                Some(tier) => Command::Solve(tier),
                None => Command::Terminate,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_every_pending_tier_then_terminates() {
        let mut coordinator = Coordinator::new(vec![1, 2], false);
        let first = coordinator.next_command(Reply::Check);
        assert!(matches!(first, Command::Solve(_)));
        let second = coordinator.next_command(Reply::ReportSolved(1));
        assert!(matches!(second, Command::Solve(_)));
        let third = coordinator.next_command(Reply::ReportSolved(2));
        assert_eq!(third, Command::Terminate);
    }

    #[test]
    fn a_reported_error_terminates_immediately() {
        let mut coordinator = Coordinator::new(vec![5], false);
        assert_eq!(
            coordinator.next_command(Reply::ReportError(5)),
            Command::Terminate
        );
    }
}
