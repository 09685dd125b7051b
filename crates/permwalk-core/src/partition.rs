//! Static partitioning of walks across workers.
//!
//! Every walk costs the same (identical length, identical per-step gather),
//! so work is split once into contiguous ranges of near-equal size and never
//! rebalanced.

use std::ops::Range;

/// Effective worker count for a requested thread count: 0 and 1 both mean
/// "run on the calling thread".
#[inline]
#[must_use]
pub const fn workers_for(threads: usize) -> usize {
    if threads == 0 {
        1
    } else {
        threads
    }
}

/// Split `[0, n)` into exactly `workers` contiguous, ascending ranges.
///
/// Range sizes differ by at most one; the first `n % workers` ranges get the
/// extra item. When `workers > n` the trailing ranges are empty.
#[must_use]
pub fn static_ranges(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let base = n / workers;
    let extra = n % workers;
    let mut out = Vec::with_capacity(workers);
    let mut lo = 0;
    for k in 0..workers {
        let len = base + usize::from(k < extra);
        out.push(lo..lo + len);
        lo += len;
    }
    debug_assert_eq!(lo, n);
    out
}
