//! Walk and distance buffers.
//!
//! Layout is fixed at allocation:
//! - states: `[num_walks, walks_len, state_size]`, row-major, component fastest;
//! - distances: `[num_walks, walks_len]`.
//!
//! A walk's trajectory is one contiguous block of `walks_len * state_size`
//! tokens, so the slot written at step `s` is the read source of step `s + 1`
//! and no scratch state is needed. Both buffers are allocated once at their
//! final size and never grow.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkError};
use crate::Token;

/// A fully populated batch of walks.
///
/// Deserialization goes through [`Walks::from_parts`], so a decoded batch
/// always has buffers matching its shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWalks")]
pub struct Walks {
    num_walks: usize,
    walks_len: usize,
    state_size: usize,
    states: Vec<Token>,
    distances: Vec<Token>,
}

#[derive(Deserialize)]
struct RawWalks {
    num_walks: usize,
    walks_len: usize,
    state_size: usize,
    states: Vec<Token>,
    distances: Vec<Token>,
}

impl TryFrom<RawWalks> for Walks {
    type Error = WalkError;

    fn try_from(r: RawWalks) -> Result<Self> {
        Self::from_parts(r.num_walks, r.walks_len, r.state_size, r.states, r.distances)
    }
}

/// A disjoint, mutable slice of the batch covering walks `first_walk..`.
///
/// Regions are handed one per worker; no two regions alias.
#[derive(Debug)]
pub(crate) struct WalkRegion<'a> {
    pub first_walk: usize,
    pub states: &'a mut [Token],
    pub distances: &'a mut [Token],
}

impl Walks {
    /// Allocate zeroed buffers for the given shape.
    ///
    /// Fails with a domain error if the total size overflows `usize`.
    pub fn zeroed(num_walks: usize, walks_len: usize, state_size: usize) -> Result<Self> {
        let (n_states, n_dist) = Self::buffer_lens(num_walks, walks_len, state_size)?;
        Ok(Self {
            num_walks,
            walks_len,
            state_size,
            states: vec![0; n_states],
            distances: vec![0; n_dist],
        })
    }

    /// Reassemble a batch from flat buffers (e.g. after deserialization by a host).
    pub fn from_parts(
        num_walks: usize,
        walks_len: usize,
        state_size: usize,
        states: Vec<Token>,
        distances: Vec<Token>,
    ) -> Result<Self> {
        let expected = Self::buffer_lens(num_walks, walks_len, state_size)?;
        if states.len() != expected.0 || distances.len() != expected.1 {
            return Err(WalkError::shape(format!(
                "buffers hold {} states / {} distances, shape [{num_walks}, {walks_len}, {state_size}] needs {} / {}",
                states.len(),
                distances.len(),
                expected.0,
                expected.1
            )));
        }
        Ok(Self { num_walks, walks_len, state_size, states, distances })
    }

    fn buffer_lens(num_walks: usize, walks_len: usize, state_size: usize) -> Result<(usize, usize)> {
        let n_dist = num_walks
            .checked_mul(walks_len)
            .ok_or_else(|| WalkError::domain("num_walks * walks_len overflows usize"))?;
        let n_states = n_dist
            .checked_mul(state_size)
            .ok_or_else(|| WalkError::domain("num_walks * walks_len * state_size overflows usize"))?;
        Ok((n_states, n_dist))
    }

    /// `[num_walks, walks_len, state_size]`.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> [usize; 3] {
        [self.num_walks, self.walks_len, self.state_size]
    }

    /// `[num_walks, walks_len]`.
    #[inline]
    #[must_use]
    pub const fn distances_shape(&self) -> [usize; 2] {
        [self.num_walks, self.walks_len]
    }

    /// Number of walks.
    #[inline]
    #[must_use]
    pub const fn num_walks(&self) -> usize {
        self.num_walks
    }

    /// States per walk, central state included.
    #[inline]
    #[must_use]
    pub const fn walks_len(&self) -> usize {
        self.walks_len
    }

    /// Components per state.
    #[inline]
    #[must_use]
    pub const fn state_size(&self) -> usize {
        self.state_size
    }

    #[inline]
    const fn walk_stride(&self) -> usize {
        self.walks_len * self.state_size
    }

    #[inline]
    const fn state_offset(&self, walk: usize, step: usize) -> usize {
        (walk * self.walks_len + step) * self.state_size
    }

    /// State at `[walk, step, :]`.
    #[inline]
    #[must_use]
    pub fn state(&self, walk: usize, step: usize) -> &[Token] {
        assert!(step < self.walks_len, "step {step} out of range for walks_len {}", self.walks_len);
        let off = self.state_offset(walk, step);
        &self.states[off..off + self.state_size]
    }

    /// Whole trajectory of `walk` as one contiguous `[walks_len * state_size]` block.
    #[inline]
    #[must_use]
    pub fn trajectory(&self, walk: usize) -> &[Token] {
        let stride = self.walk_stride();
        &self.states[walk * stride..(walk + 1) * stride]
    }

    /// Iterate the states of `walk` in step order.
    pub fn steps(&self, walk: usize) -> impl ExactSizeIterator<Item = &[Token]> + '_ {
        // `max(1)` keeps chunks_exact valid for an empty trajectory.
        self.trajectory(walk).chunks_exact(self.state_size.max(1))
    }

    /// Distance labels of `walk`.
    #[inline]
    #[must_use]
    pub fn distances(&self, walk: usize) -> &[Token] {
        &self.distances[walk * self.walks_len..(walk + 1) * self.walks_len]
    }

    /// Flat row-major states buffer.
    #[inline]
    #[must_use]
    pub fn states_flat(&self) -> &[Token] {
        &self.states
    }

    /// Flat row-major distances buffer.
    #[inline]
    #[must_use]
    pub fn distances_flat(&self) -> &[Token] {
        &self.distances
    }

    /// Consume into `(states, distances)` flat buffers.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Token>, Vec<Token>) {
        (self.states, self.distances)
    }

    /// Split both buffers into one disjoint region per walk range.
    ///
    /// `ranges` must be contiguous, ascending, and cover `[0, num_walks)`
    /// exactly (as produced by [`crate::partition::static_ranges`]).
    pub(crate) fn regions_mut(&mut self, ranges: &[Range<usize>]) -> Vec<WalkRegion<'_>> {
        let stride = self.walk_stride();
        let walks_len = self.walks_len;
        let mut states: &mut [Token] = &mut self.states;
        let mut distances: &mut [Token] = &mut self.distances;
        let mut out = Vec::with_capacity(ranges.len());
        for r in ranges {
            let n = r.end - r.start;
            let (s_head, s_tail) = std::mem::take(&mut states).split_at_mut(n * stride);
            let (d_head, d_tail) = std::mem::take(&mut distances).split_at_mut(n * walks_len);
            out.push(WalkRegion { first_walk: r.start, states: s_head, distances: d_head });
            states = s_tail;
            distances = d_tail;
        }
        debug_assert!(states.is_empty() && distances.is_empty());
        out
    }
}
