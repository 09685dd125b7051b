//! Permutation helpers.
//!
//! A permutation of `n` elements is a slice `p` of length `n` holding every
//! value in `[0, n)` exactly once. Applying `p` to a sequence `x` is a gather:
//! `y[i] = x[p[i]]`. This is the same convention the walk transition uses, so
//! tables built here can be fed straight into a [`GeneratorTable`].
//!
//! [`GeneratorTable`]: crate::GeneratorTable

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Result, WalkError};

/// The identity permutation `[0, 1, …, n-1]`.
#[must_use]
pub fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

/// Returns `true` if `p` is a bijection of `[0, p.len())`.
#[must_use]
pub fn is_permutation(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    for &v in p {
        match seen.get_mut(v) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}

/// Gather `x` through `p`: `out[i] = x[p[i]]`.
///
/// Panics if some `p[i]` is out of range for `x`.
#[must_use]
pub fn apply_permutation<T: Clone>(p: &[usize], x: &[T]) -> Vec<T> {
    p.iter().map(|&i| x[i].clone()).collect()
}

/// Composition `p1 ∘ p2`, i.e. `apply_permutation(p1, p2)`.
#[must_use]
pub fn compose(p1: &[usize], p2: &[usize]) -> Vec<usize> {
    apply_permutation(p1, p2)
}

/// Inverse permutation: `inverse(p)[p[i]] == i`.
///
/// Panics if `p` is not a permutation.
#[must_use]
pub fn inverse(p: &[usize]) -> Vec<usize> {
    let mut ans = vec![0; p.len()];
    for (i, &v) in p.iter().enumerate() {
        ans[v] = i;
    }
    ans
}

/// The transposition of `n` elements swapping `i1` and `i2`.
pub fn transposition(n: usize, i1: usize, i2: usize) -> Result<Vec<usize>> {
    if i1 >= n || i2 >= n {
        return Err(WalkError::domain(format!(
            "transposition ({i1} {i2}) out of range for n={n}"
        )));
    }
    if i1 == i2 {
        return Err(WalkError::domain(format!(
            "transposition needs two distinct positions, got ({i1} {i2})"
        )));
    }
    let mut perm = identity(n);
    perm.swap(i1, i2);
    Ok(perm)
}

/// Build a permutation of size `n` from disjoint cycles.
///
/// Each cycle `[c0, c1, …, ck]` maps `c0 → c1 → … → ck → c0`, stored as
/// `perm[c_i] = c_{i+1}`. Cycle entries are shifted down by `offset` first,
/// so one-based cycle notation can be passed with `offset = 1`.
pub fn from_cycles(n: usize, cycles: &[Vec<usize>], offset: usize) -> Result<Vec<usize>> {
    let mut perm = identity(n);
    let mut used = vec![false; n];
    for cycle in cycles {
        let shifted = cycle
            .iter()
            .map(|&c| {
                c.checked_sub(offset)
                    .filter(|&v| v < n)
                    .ok_or_else(|| {
                        WalkError::domain(format!(
                            "cycle element {c} out of range for n={n}, offset={offset}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        for (i, &c) in shifted.iter().enumerate() {
            if std::mem::replace(&mut used[c], true) {
                return Err(WalkError::domain(format!(
                    "cycles must not intersect (element {c} repeated)"
                )));
            }
            perm[c] = shifted[(i + 1) % shifted.len()];
        }
    }
    Ok(perm)
}

/// Every permutation of `[0, n)` whose cycle lengths are exactly `cycle_lengths`
/// (as a multiset, fixed points included as length-1 cycles).
///
/// Output order is canonical: cycles are listed by increasing minimal element
/// and each cycle starts at its minimum, so every permutation appears once.
pub fn with_cycle_lengths(n: usize, cycle_lengths: &[usize]) -> Result<Vec<Vec<usize>>> {
    if cycle_lengths.iter().sum::<usize>() != n {
        return Err(WalkError::domain(format!(
            "sum of cycle lengths {cycle_lengths:?} must equal n={n}"
        )));
    }
    if cycle_lengths.contains(&0) {
        return Err(WalkError::domain("cycle lengths must be positive"));
    }

    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for &k in cycle_lengths {
        *counts.entry(k).or_default() += 1;
    }

    let mut search = CycleSearch { n, cycles: Vec::new(), out: Vec::new() };
    search.backtrack(&(0..n).collect(), &mut counts)?;
    Ok(search.out)
}

struct CycleSearch {
    n: usize,
    cycles: Vec<Vec<usize>>,
    out: Vec<Vec<usize>>,
}

impl CycleSearch {
    /// Every search step builds the cycle through the smallest uncovered
    /// element, so cycles come out ordered by their minima.
    fn backtrack(
        &mut self,
        available: &BTreeSet<usize>,
        counts: &mut BTreeMap<usize, usize>,
    ) -> Result<()> {
        let Some(&m) = available.first() else {
            if counts.is_empty() {
                self.out.push(from_cycles(self.n, &self.cycles, 0)?);
            }
            return Ok(());
        };

        let pool: Vec<usize> = available.iter().copied().skip(1).collect();
        let lengths: Vec<usize> = counts.keys().copied().collect();
        for k in lengths {
            for comb in combinations(&pool, k - 1) {
                for order in permutations(&comb) {
                    let mut cycle = Vec::with_capacity(k);
                    cycle.push(m);
                    cycle.extend(order);

                    let taken: BTreeSet<usize> = cycle.iter().copied().collect();
                    let rest: BTreeSet<usize> = available.difference(&taken).copied().collect();
                    take_one(counts, k);
                    self.cycles.push(cycle);

                    self.backtrack(&rest, counts)?;

                    self.cycles.pop();
                    *counts.entry(k).or_default() += 1;
                }
            }
        }
        Ok(())
    }
}

fn take_one(counts: &mut BTreeMap<usize, usize>, k: usize) {
    if let Some(c) = counts.get_mut(&k) {
        *c -= 1;
        if *c == 0 {
            counts.remove(&k);
        }
    }
}

/// `k`-combinations of `items` in lexicographic (positional) order.
fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    fn go(items: &[usize], k: usize, start: usize, cur: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if cur.len() == k {
            out.push(cur.clone());
            return;
        }
        for i in start..items.len() {
            cur.push(items[i]);
            go(items, k, i + 1, cur, out);
            cur.pop();
        }
    }
    let mut out = Vec::new();
    go(items, k, 0, &mut Vec::with_capacity(k), &mut out);
    out
}

/// All orderings of `items` in lexicographic (positional) order.
fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}
