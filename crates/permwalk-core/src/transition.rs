//! State transition: one generator applied to one state.
//!
//! The generator is read as "position `k` of the next state comes from
//! position `generator[k]` of the current state". This is a gather, not a
//! scatter.

use crate::Token;

/// Write `generator` applied to `current` into `next`.
///
/// All three slices have length `state_size`. Panics if an index in
/// `generator` is out of range for `current`.
#[inline]
pub fn apply_into(current: &[Token], generator: &[usize], next: &mut [Token]) {
    debug_assert_eq!(generator.len(), next.len());
    debug_assert_eq!(current.len(), next.len());
    for (slot, &src) in next.iter_mut().zip(generator) {
        *slot = current[src];
    }
}

/// Allocating form of [`apply_into`].
#[must_use]
pub fn apply(current: &[Token], generator: &[usize]) -> Vec<Token> {
    let mut next = vec![0; generator.len()];
    apply_into(current, generator, &mut next);
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_cycle_rotates_right() {
        assert_eq!(apply(&[10, 20, 30], &[1, 2, 0]), vec![20, 30, 10]);
        assert_eq!(apply(&[10, 20, 30], &[2, 0, 1]), vec![30, 10, 20]);
    }

    #[test]
    fn identity_and_swap() {
        assert_eq!(apply(&[5, 7], &[0, 1]), vec![5, 7]);
        assert_eq!(apply(&[5, 7], &[1, 0]), vec![7, 5]);
    }

    #[test]
    fn writes_in_place() {
        let mut out = [0; 4];
        apply_into(&[1, 2, 3, 4], &[3, 3, 0, 1], &mut out);
        assert_eq!(out, [4, 4, 1, 2]);
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        let _ = apply(&[1, 2], &[0, 5]);
    }
}
