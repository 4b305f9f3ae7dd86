//! # Width-Changing Combinators
//!
//! Operations that cross vector boundaries: round-robin interleave and
//! its inverse over a same-width group, exact splits, sub-range
//! extraction, and concatenation. Widths are const generics, so a
//! mismatched split or concatenation fails to compile.
//!
//! An uneven split has no heterogeneous return type in this shape
//! language; the narrower tail of one is expressed with `extract`, and
//! the round-trip law closes through `concat`.

use crate::element::SimdElement;
use crate::lanes::{LaneCount, SupportedLaneCount};
use crate::vector::Simd;

/// Round-robin distribution of `M` vectors: reading the outputs in lane
/// order yields lane 0 of every input, then lane 1 of every input, and
/// so on.
#[inline]
pub fn interleave<T: SimdElement, const N: usize, const M: usize>(
    inputs: [Simd<T, N>; M],
) -> [Simd<T, N>; M]
where
    LaneCount<N>: SupportedLaneCount,
{
    const { assert!(M >= 1, "interleave needs at least one vector") }
    core::array::from_fn(|j| {
        Simd::from_fn(|i| {
            let k = j * N + i;
            inputs[k % M].lane(k / M)
        })
    })
}

/// Inverse of [`interleave`]: output `j` collects every `M`-th lane of
/// the flattened inputs, starting at lane `j`.
#[inline]
pub fn deinterleave<T: SimdElement, const N: usize, const M: usize>(
    inputs: [Simd<T, N>; M],
) -> [Simd<T, N>; M]
where
    LaneCount<N>: SupportedLaneCount,
{
    const { assert!(M >= 1, "deinterleave needs at least one vector") }
    core::array::from_fn(|j| {
        Simd::from_fn(|i| {
            let k = i * M + j;
            inputs[k / N].lane(k % N)
        })
    })
}

impl<T: SimdElement, const N: usize> Simd<T, N>
where
    LaneCount<N>: SupportedLaneCount,
{
    /// Splits into `PARTS` vectors of `K` lanes. `K * PARTS` must equal
    /// `N`, checked at compile time.
    #[inline]
    pub fn split<const K: usize, const PARTS: usize>(self) -> [Simd<T, K>; PARTS]
    where
        LaneCount<K>: SupportedLaneCount,
    {
        const { assert!(K * PARTS == N, "split widths must cover the vector exactly") }
        core::array::from_fn(|p| Simd::from_fn(|i| self.0[p * K + i]))
    }

    /// The `LEN` lanes starting at `OFFSET`, checked at compile time.
    #[inline]
    pub fn extract<const OFFSET: usize, const LEN: usize>(self) -> Simd<T, LEN>
    where
        LaneCount<LEN>: SupportedLaneCount,
    {
        const { assert!(OFFSET + LEN <= N, "extract range out of bounds") }
        Simd::from_fn(|i| self.0[OFFSET + i])
    }

    /// Concatenation: `self` then `tail`. `OUT` must equal `N + M`,
    /// checked at compile time.
    #[inline]
    pub fn concat<const M: usize, const OUT: usize>(self, tail: Simd<T, M>) -> Simd<T, OUT>
    where
        LaneCount<M>: SupportedLaneCount,
        LaneCount<OUT>: SupportedLaneCount,
    {
        const { assert!(OUT == N + M, "concatenated width must be the sum of the parts") }
        Simd::from_fn(|i| if i < N { self.0[i] } else { tail.0[i - N] })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_then_concat_is_identity() {
        let v = Simd::<i32, 8>::iota();
        let [lo, hi] = v.split::<4, 2>();
        assert_eq!(lo.to_array(), [0, 1, 2, 3]);
        assert_eq!(hi.to_array(), [4, 5, 6, 7]);
        assert_eq!(lo.concat::<4, 8>(hi), v);
    }

    #[test]
    fn uneven_split_via_extract() {
        let v = Simd::<i32, 7>::iota();
        let head = v.extract::<0, 4>();
        let tail = v.extract::<4, 3>();
        assert_eq!(head.to_array(), [0, 1, 2, 3]);
        assert_eq!(tail.to_array(), [4, 5, 6]);
        assert_eq!(head.concat::<3, 7>(tail), v);
    }

    #[test]
    fn interleave_two_constants_alternates() {
        let [a, b] = interleave([Simd::<i32, 4>::splat(0), Simd::splat(1)]);
        assert_eq!(a.to_array(), [0, 1, 0, 1]);
        assert_eq!(b.to_array(), [0, 1, 0, 1]);
    }

    #[test]
    fn deinterleave_undoes_interleave() {
        let x = Simd::<i32, 4>::iota();
        let y = Simd::<i32, 4>::iota() + Simd::splat(10);
        let z = Simd::<i32, 4>::iota() + Simd::splat(20);
        assert_eq!(deinterleave(interleave([x, y])), [x, y]);
        assert_eq!(deinterleave(interleave([x, y, z])), [x, y, z]);
    }

    #[test]
    fn single_vector_interleave_is_identity() {
        let v = Simd::<u8, 7>::iota();
        assert_eq!(interleave([v]), [v]);
        assert_eq!(deinterleave([v]), [v]);
    }
}
