//! # Frontier Module
//!
//! A frontier holds positions that have been assigned a value but whose
//! parents have not yet been notified of it. Entries are bucketed by
//! remoteness (so that positions can be drained in increasing remoteness
//! order, as required by retrograde analysis) and, within a bucket, grouped
//! contiguously by the source tier that produced them. A parallel "push"
//! phase (one frontier per worker thread, written only by that thread) is
//! followed by a "drain" phase that recovers `(source tier, position)` pairs
//! from a flat index using a prefix-sum table ("dividers") rather than
//! storing the tier alongside every position, which would otherwise double
//! the frontier's memory footprint.

use crate::model::{Remoteness, Tier, TierPosition};

/// Per-thread, per-remoteness collection of positions awaiting propagation
/// to their parents.
#[derive(Debug, Clone)]
pub struct Frontier {
    /// The fixed set of tiers this frontier may draw positions from: the
    /// tier being solved's own primitives plus each of its child tiers, in
    /// the order they were registered.
    tiers: Vec<Tier>,

    /// `buckets[r]` holds every position (from any source tier) that was
    /// assigned remoteness `r`, in the order entries were pushed.
    buckets: Vec<Vec<u64>>,

    /// `counts[r][i]` is the number of positions from `tiers[i]` pushed into
    /// `buckets[r]` so far. Used to build [`Frontier::dividers`] lazily.
    counts: Vec<Vec<usize>>,

    /// `dividers[r]` is a prefix-sum table over `counts[r]`, with one extra
    /// leading zero; `dividers[r][i]..dividers[r][i + 1]` is the half-open
    /// range of `buckets[r]` contributed by `tiers[i]`. Populated by
    /// [`Frontier::finalize`] once no more pushes at remoteness `r` will
    /// occur.
    dividers: Vec<Vec<usize>>,
}

impl Frontier {
    /// Creates an empty frontier with one bucket per remoteness in
    /// `0..num_remotenesses` and source tiers `tiers` (in the order callers
    /// will push from them).
    pub fn new(num_remotenesses: usize, tiers: Vec<Tier>) -> Self {
        let n = tiers.len();
        Self {
            tiers,
            buckets: vec![Vec::new(); num_remotenesses],
            counts: vec![vec![0; n]; num_remotenesses],
            dividers: vec![Vec::new(); num_remotenesses],
        }
    }

    /// Records that `position`, from the source tier registered at
    /// `tier_index`, was assigned `remoteness`.
    pub fn push(&mut self, remoteness: Remoteness, tier_index: usize, position: u64) {
        let r = remoteness as usize;
        self.buckets[r].push(position);
        self.counts[r][tier_index] += 1;
    }

    /// Materializes the divider table for `remoteness` from the counts
    /// accumulated so far. Must be called before
    /// [`Frontier::source_tier_at`] or [`Frontier::drain`] are used for that
    /// remoteness, and must not be followed by further pushes at it.
    pub fn finalize(&mut self, remoteness: Remoteness) {
        let r = remoteness as usize;
        let mut offsets = Vec::with_capacity(self.counts[r].len() + 1);
        let mut acc = 0usize;
        offsets.push(0);
        for &c in &self.counts[r] {
            acc += c;
            offsets.push(acc);
        }
        self.dividers[r] = offsets;
    }

    /// The number of positions held at `remoteness`.
    pub fn len_at(&self, remoteness: Remoteness) -> usize {
        self.buckets[remoteness as usize].len()
    }

    /// Recovers the source tier of the entry at `flat_index` within
    /// `remoteness`'s bucket. Requires [`Frontier::finalize`] to have been
    /// called for `remoteness`.
    pub fn source_tier_at(&self, remoteness: Remoteness, flat_index: usize) -> Tier {
        let dividers = &self.dividers[remoteness as usize];
        debug_assert!(
            !dividers.is_empty(),
            "frontier dividers not finalized for this remoteness"
        );
        let tier_index = dividers.partition_point(|&d| d <= flat_index) - 1;
        self.tiers[tier_index]
    }

    /// Drains every entry at `remoteness`, returning fully-qualified tier
    /// positions recovered via the divider table. Requires
    /// [`Frontier::finalize`] to have been called for `remoteness`.
    pub fn drain(&mut self, remoteness: Remoteness) -> Vec<TierPosition> {
        let r = remoteness as usize;
        let positions = std::mem::take(&mut self.buckets[r]);
        positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| {
                TierPosition::new(self.source_tier_at(remoteness, i), position)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_recovers_source_tier_from_flat_index() {
        let mut frontier = Frontier::new(2, vec![10, 20, 30]);
        frontier.push(0, 0, 1);
        frontier.push(0, 0, 2);
        frontier.push(0, 1, 3);
        frontier.push(0, 2, 4);
        frontier.finalize(0);

        let drained = frontier.drain(0);
        assert_eq!(
            drained,
            vec![
                TierPosition::new(10, 1),
                TierPosition::new(10, 2),
                TierPosition::new(20, 3),
                TierPosition::new(30, 4),
            ]
        );
    }

    #[test]
    fn empty_bucket_drains_to_nothing() {
        let mut frontier = Frontier::new(1, vec![1]);
        frontier.finalize(0);
        assert!(frontier.drain(0).is_empty());
    }
}
