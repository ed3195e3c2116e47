//! Deterministic probe-ownership partitioning.
//!
//! A probe's nodes must all live on one rank so that sampling needs no
//! communication, so probes are dealt out in contiguous blocks rather
//! than balanced exactly. Exact load balance is secondary to keeping
//! the mapping trivially reproducible on every rank.

use sonde_mesh::RankId;

/// Block size used by [`owning_rank`].
///
/// When there are at least as many probes as ranks, each rank's block
/// holds `num_probes / num_ranks` probes; otherwise blocks degenerate
/// to a single probe.
pub fn probes_per_rank(num_probes: usize, num_ranks: u32) -> usize {
    if num_ranks as usize > num_probes {
        1
    } else {
        num_probes / num_ranks as usize
    }
}

/// Owning rank for probe `index` out of `num_probes`, distributed over
/// `num_ranks`.
///
/// Block partition: probe `i` maps to block `i / probes_per_rank`, and
/// when `num_probes` does not divide evenly the trailing probes fold
/// into the last valid rank. The result is always in
/// `[0, num_ranks)` and monotonically non-decreasing in `index`.
///
/// # Examples
///
/// ```
/// use sonde_probes::partition::owning_rank;
/// use sonde_mesh::RankId;
///
/// // Four probes over two ranks split evenly.
/// let owners: Vec<RankId> = (0..4).map(|i| owning_rank(i, 4, 2)).collect();
/// assert_eq!(owners, vec![RankId(0), RankId(0), RankId(1), RankId(1)]);
/// ```
pub fn owning_rank(index: usize, num_probes: usize, num_ranks: u32) -> RankId {
    debug_assert!(num_ranks > 0);
    debug_assert!(index < num_probes);
    let block = probes_per_rank(num_probes, num_ranks);
    let rank = (index + block) / block - 1;
    RankId(rank.min(num_ranks as usize - 1) as u32)
}
