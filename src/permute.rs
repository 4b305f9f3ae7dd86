//! # Permutations
//!
//! Lane rearrangements within a single vector, all expressed through one
//! index-map kernel: output lane `i` takes input lane `idx(i)`. The
//! named permutations are the closed set of maps the engine ships;
//! `permute_by` is the open seam for anything else.

use crate::element::SimdElement;
use crate::lanes::{LaneCount, SupportedLaneCount};
use crate::vector::Simd;

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Output lane `i` takes input lane `idx(i)`.
    ///
    /// Panics when the map produces an index at or above `N`.
    #[inline]
    pub fn permute_by(self, idx: impl Fn(usize) -> usize) -> Self {
        Self::from_fn(|i| self.0[idx(i)])
    }

    /// Lane order reversed.
    #[inline]
    pub fn reverse(self) -> Self {
        self.permute_by(|i| N - 1 - i)
    }

    /// Lanes rotated towards lane 0 by `K` (negative `K` rotates the
    /// other way): output lane `i` takes input lane `(i + K) mod N`.
    #[inline]
    pub fn rotate<const K: i32>(self) -> Self {
        let shift = (K as i64).rem_euclid(N as i64) as usize;
        self.permute_by(|i| (i + shift) % N)
    }

    /// Adjacent groups of `G` lanes swapped pairwise.
    #[inline]
    pub fn swap_neighbors<const G: usize>(self) -> Self {
        const {
            assert!(G >= 1, "group must be at least one lane");
            assert!(N % (2 * G) == 0, "lanes must divide into group pairs");
        }
        self.permute_by(|i| (i / G ^ 1) * G + i % G)
    }

    /// Every even lane doubled: `[a, a, c, c, ...]`.
    #[inline]
    pub fn duplicate_even(self) -> Self {
        self.permute_by(|i| i / 2 * 2)
    }

    /// Every odd lane doubled: `[b, b, d, d, ...]`.
    #[inline]
    pub fn duplicate_odd(self) -> Self {
        const { assert!(N % 2 == 0, "odd-lane duplication needs an even width") }
        self.permute_by(|i| i / 2 * 2 + 1)
    }

    /// All lanes set to lane `K`, checked at compile time.
    #[inline]
    pub fn broadcast_lane<const K: usize>(self) -> Self {
        const { assert!(K < N, "lane index out of range") }
        self.permute_by(|_| K)
    }

    /// All lanes set to lane 0.
    #[inline]
    pub fn broadcast_first(self) -> Self {
        self.permute_by(|_| 0)
    }

    /// All lanes set to the last lane.
    #[inline]
    pub fn broadcast_last(self) -> Self {
        self.permute_by(|_| N - 1)
    }
}
